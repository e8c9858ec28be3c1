use crate::db::{DbConnection, DbPool};
use crate::domain::category::{Category, NewCategory};
use crate::domain::item::{Item, ItemListEntry, ItemSummary, ItemWithCategory, NewItem};
use crate::domain::types::{CategoryId, CategoryName, ItemId};

pub mod category;
pub mod errors;
pub mod item;
#[cfg(test)]
pub mod test;

pub use errors::{RepositoryError, RepositoryResult};

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers. Every call checks out its own
/// connection, so independent reads may run on separate threads.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Read-only operations for category entities.
pub trait CategoryReader {
    /// List every category ordered by name.
    fn list_categories(&self) -> RepositoryResult<Vec<Category>>;
    /// Retrieve a category by its identifier.
    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>>;
    /// Retrieve a category by exact name.
    fn get_category_by_name(&self, name: &CategoryName) -> RepositoryResult<Option<Category>>;
    /// Number of stored categories.
    fn count_categories(&self) -> RepositoryResult<usize>;
}

/// Write operations for category entities.
pub trait CategoryWriter {
    /// Persist a new category and return the stored row.
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category>;
    /// Replace the category name.
    fn update_category(&self, id: CategoryId, name: &CategoryName) -> RepositoryResult<usize>;
    /// Delete a category by id. Referencing items are not touched.
    fn delete_category(&self, id: CategoryId) -> RepositoryResult<usize>;
}

/// Read-only operations for item entities.
pub trait ItemReader {
    /// List every item ordered by name with its category populated.
    fn list_items(&self) -> RepositoryResult<Vec<ItemListEntry>>;
    /// Retrieve an item with its category populated.
    fn get_item_by_id(&self, id: ItemId) -> RepositoryResult<Option<ItemWithCategory>>;
    /// Items referencing `category_id`, ordered by name.
    fn list_items_in_category(&self, category_id: CategoryId)
    -> RepositoryResult<Vec<ItemSummary>>;
    /// Number of stored items.
    fn count_items(&self) -> RepositoryResult<usize>;
}

/// Write operations for item entities.
pub trait ItemWriter {
    /// Persist a new item and return the stored row.
    fn create_item(&self, item: &NewItem) -> RepositoryResult<Item>;
    /// Replace every editable field of an existing item.
    fn update_item(&self, id: ItemId, item: &NewItem) -> RepositoryResult<usize>;
    /// Delete an item by id.
    fn delete_item(&self, id: ItemId) -> RepositoryResult<usize>;
}
