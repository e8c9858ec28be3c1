use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::item::{Item as DomainItem, NewItem as DomainNewItem};
use crate::domain::types::{
    CategoryId, ItemDescription, ItemName, ItemPrice, StockNumber, TypeConstraintError,
};

/// Diesel model representing the `items` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::items)]
pub struct Item {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub category_id: Option<i32>,
    pub price: String,
    pub stock_number: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable form of [`Item`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::items)]
pub struct NewItem {
    pub name: String,
    pub description: String,
    pub category_id: Option<i32>,
    pub price: String,
    pub stock_number: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Full replacement of an item's editable columns.
///
/// `category_id = None` clears the reference instead of leaving it untouched.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = crate::schema::items, treat_none_as_null = true)]
pub struct ItemChangeset {
    pub name: String,
    pub description: String,
    pub category_id: Option<i32>,
    pub price: String,
    pub stock_number: String,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Item> for DomainItem {
    type Error = TypeConstraintError;

    fn try_from(item: Item) -> Result<Self, Self::Error> {
        Ok(Self {
            id: item.id.try_into()?,
            name: ItemName::new(item.name)?,
            description: ItemDescription::new(item.description)?,
            category_id: item.category_id.map(CategoryId::new).transpose()?,
            price: ItemPrice::new(item.price)?,
            stock_number: StockNumber::new(item.stock_number)?,
            created_at: item.created_at,
            updated_at: item.updated_at,
        })
    }
}

impl From<DomainNewItem> for NewItem {
    fn from(item: DomainNewItem) -> Self {
        Self {
            name: item.name.into_inner(),
            description: item.description.into_inner(),
            category_id: item.category_id.map(CategoryId::get),
            price: item.price.into_inner(),
            stock_number: item.stock_number.into_inner(),
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

impl From<DomainNewItem> for ItemChangeset {
    fn from(item: DomainNewItem) -> Self {
        Self {
            name: item.name.into_inner(),
            description: item.description.into_inner(),
            category_id: item.category_id.map(CategoryId::get),
            price: item.price.into_inner(),
            stock_number: item.stock_number.into_inner(),
            updated_at: item.updated_at,
        }
    }
}
