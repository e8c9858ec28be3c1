use serde::Serialize;

use crate::domain::category::Category;
use crate::domain::item::ItemSummary;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryDto {
    pub id: i32,
    pub name: String,
    pub url: String,
}

impl From<Category> for CategoryDto {
    fn from(value: Category) -> Self {
        Self {
            id: value.id.get(),
            url: value.url(),
            name: value.name.into_inner(),
        }
    }
}

/// Item linked from a category page or blocking its deletion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemSummaryDto {
    pub id: i32,
    pub name: String,
    pub url: String,
}

impl From<ItemSummary> for ItemSummaryDto {
    fn from(value: ItemSummary) -> Self {
        Self {
            id: value.id.get(),
            url: crate::domain::item::item_url(value.id),
            name: value.name.into_inner(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryDetailDto {
    pub category: CategoryDto,
    pub items: Vec<ItemSummaryDto>,
}
