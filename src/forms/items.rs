use chrono::Utc;
use serde::Serialize;
use validator::Validate;

use crate::domain::item::{Item, NewItem};
use crate::domain::types::{
    CategoryId, CategoryName, ItemDescription, ItemName, ItemPrice, StockNumber,
    TypeConstraintError,
};
use crate::forms::{CategorySelection, InvalidForm, escape_markup, unescape_markup};

const FIELD_ORDER: &[&str] = &["name", "description", "category", "price", "stock_number"];

/// Item create/update form.
///
/// Built from the raw url-encoded pairs because the `category` key may be
/// repeated by a multi-select control.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Validate)]
pub struct ItemForm {
    #[validate(length(min = 3, message = "Item name must be at least 3 characters."))]
    pub name: String,
    #[validate(length(
        min = 10,
        max = 100,
        message = "Description must be between 10 and 100 characters."
    ))]
    pub description: String,
    #[validate(length(min = 1, message = "Category must be specified."))]
    pub category: Vec<String>,
    #[validate(length(min = 1, message = "Price must be specified."))]
    pub price: String,
    #[validate(length(min = 1, message = "Stock number must be specified."))]
    pub stock_number: String,
}

impl ItemForm {
    /// Collect the form from url-encoded key/value pairs. Unknown keys are
    /// ignored; for repeated scalar keys the last value wins.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut form = Self::default();
        let mut categories = Vec::new();
        for (key, value) in pairs {
            match key.as_str() {
                "name" => form.name = value,
                "description" => form.description = value,
                "category" => categories.push(value),
                "price" => form.price = value,
                "stock_number" => form.stock_number = value,
                _ => {}
            }
        }
        form.category = CategorySelection::from_values(categories).into_vec();
        form
    }

    /// Prefill the update form from a stored item, undoing the escaping
    /// applied on write.
    pub fn from_item(item: &Item, category_name: Option<&CategoryName>) -> Self {
        Self {
            name: unescape_markup(&item.name),
            description: unescape_markup(&item.description),
            category: category_name
                .map(|c| vec![unescape_markup(c)])
                .unwrap_or_default(),
            price: unescape_markup(&item.price),
            stock_number: unescape_markup(&item.stock_number),
        }
    }

    /// Trim every field; blank category entries are dropped.
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            category: self
                .category
                .into_iter()
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect(),
            price: self.price.trim().to_string(),
            stock_number: self.stock_number.trim().to_string(),
        }
    }
}

/// Validated and escaped item input.
///
/// `category` is the name to resolve; only the first selected entry is used.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemFormPayload {
    pub name: ItemName,
    pub description: ItemDescription,
    pub category: CategoryName,
    pub price: ItemPrice,
    pub stock_number: StockNumber,
}

impl ItemFormPayload {
    pub fn into_new_item(self, category_id: Option<CategoryId>) -> NewItem {
        let now = Utc::now().naive_utc();
        NewItem {
            name: self.name,
            description: self.description,
            category_id,
            price: self.price,
            stock_number: self.stock_number,
            created_at: now,
            updated_at: now,
        }
    }
}

fn build_payload(form: &ItemForm) -> Result<ItemFormPayload, (&'static str, TypeConstraintError)> {
    let first_category = form.category.first().map(String::as_str).unwrap_or_default();
    Ok(ItemFormPayload {
        name: ItemName::new(escape_markup(&form.name)).map_err(|e| ("name", e))?,
        description: ItemDescription::new(escape_markup(&form.description))
            .map_err(|e| ("description", e))?,
        category: CategoryName::new(escape_markup(first_category))
            .map_err(|e| ("category", e))?,
        price: ItemPrice::new(escape_markup(&form.price)).map_err(|e| ("price", e))?,
        stock_number: StockNumber::new(escape_markup(&form.stock_number))
            .map_err(|e| ("stock_number", e))?,
    })
}

impl TryFrom<ItemForm> for ItemFormPayload {
    type Error = InvalidForm<ItemForm>;

    fn try_from(value: ItemForm) -> Result<Self, Self::Error> {
        let value = value.normalized();
        if let Err(errors) = value.validate() {
            return Err(InvalidForm::from_validation(value, &errors, FIELD_ORDER));
        }

        build_payload(&value).map_err(|(field, e)| InvalidForm::from_constraint(value, field, e))
    }
}
