use chrono::Utc;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::category::{Category, NewCategory};
use crate::domain::types::CategoryName;
use crate::forms::{InvalidForm, escape_markup, unescape_markup};

const FIELD_ORDER: &[&str] = &["name"];

/// Category create/update form as submitted by the browser.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
#[serde(default)]
pub struct CategoryForm {
    #[validate(length(
        min = 3,
        max = 50,
        message = "Category name must be between 3 and 50 characters."
    ))]
    pub name: String,
}

impl CategoryForm {
    /// Prefill the update form from a stored category.
    pub fn from_category(category: &Category) -> Self {
        Self {
            name: unescape_markup(&category.name),
        }
    }

    /// Trim surrounding whitespace from every field.
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
        }
    }
}

/// Validated and escaped category input.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryFormPayload {
    pub name: CategoryName,
}

impl CategoryFormPayload {
    pub fn into_new_category(self) -> NewCategory {
        let now = Utc::now().naive_utc();
        NewCategory {
            name: self.name,
            created_at: now,
            updated_at: now,
        }
    }
}

impl TryFrom<CategoryForm> for CategoryFormPayload {
    type Error = InvalidForm<CategoryForm>;

    fn try_from(value: CategoryForm) -> Result<Self, Self::Error> {
        let value = value.normalized();
        if let Err(errors) = value.validate() {
            return Err(InvalidForm::from_validation(value, &errors, FIELD_ORDER));
        }

        match CategoryName::new(escape_markup(&value.name)) {
            Ok(name) => Ok(Self { name }),
            Err(e) => Err(InvalidForm::from_constraint(value, "name", e)),
        }
    }
}
