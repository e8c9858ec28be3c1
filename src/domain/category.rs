use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{CategoryId, CategoryName};

/// A grouping of rental items, e.g. "Winter" or "Summer".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: CategoryId,
    pub name: CategoryName,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Category {
    /// Detail page location of this category.
    pub fn url(&self) -> String {
        category_url(self.id)
    }
}

/// Data required to insert a new [`Category`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewCategory {
    pub name: CategoryName,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

pub fn category_url(id: CategoryId) -> String {
    format!("/catalog/category/{id}")
}
