use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::category::Category;
use crate::domain::types::{CategoryId, ItemDescription, ItemId, ItemName, ItemPrice, StockNumber};

/// A rentable piece of equipment.
///
/// `category_id` is a weak reference: removing the category never removes the
/// item, and the item does not own the category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub id: ItemId,
    pub name: ItemName,
    pub description: ItemDescription,
    pub category_id: Option<CategoryId>,
    pub price: ItemPrice,
    pub stock_number: StockNumber,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Item {
    /// Detail page location of this item.
    pub fn url(&self) -> String {
        item_url(self.id)
    }
}

/// Information required to create or fully replace an [`Item`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewItem {
    pub name: ItemName,
    pub description: ItemDescription,
    pub category_id: Option<CategoryId>,
    pub price: ItemPrice,
    pub stock_number: StockNumber,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Name-only projection of an item, used when listing the items of a category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemSummary {
    pub id: ItemId,
    pub name: ItemName,
}

/// Row of the item list: name plus the populated category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemListEntry {
    pub id: ItemId,
    pub name: ItemName,
    pub category: Option<Category>,
}

/// An item with its category reference resolved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemWithCategory {
    pub item: Item,
    pub category: Option<Category>,
}

pub fn item_url(id: ItemId) -> String {
    format!("/catalog/item/{id}")
}
