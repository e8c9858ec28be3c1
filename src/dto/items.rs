use serde::Serialize;

use crate::domain::item::{ItemListEntry, ItemWithCategory};
use crate::dto::categories::CategoryDto;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemListEntryDto {
    pub id: i32,
    pub name: String,
    pub url: String,
    pub category: Option<CategoryDto>,
}

impl From<ItemListEntry> for ItemListEntryDto {
    fn from(value: ItemListEntry) -> Self {
        Self {
            id: value.id.get(),
            url: crate::domain::item::item_url(value.id),
            name: value.name.into_inner(),
            category: value.category.map(CategoryDto::from),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemDto {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: String,
    pub stock_number: String,
    pub url: String,
    pub category: Option<CategoryDto>,
}

impl From<ItemWithCategory> for ItemDto {
    fn from(value: ItemWithCategory) -> Self {
        let item = value.item;
        Self {
            id: item.id.get(),
            url: item.url(),
            name: item.name.into_inner(),
            description: item.description.into_inner(),
            price: item.price.into_inner(),
            stock_number: item.stock_number.into_inner(),
            category: value.category.map(CategoryDto::from),
        }
    }
}

/// Counts shown on the catalog home page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogSummaryDto {
    pub category_count: usize,
    pub item_count: usize,
}
