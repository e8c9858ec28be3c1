use std::sync::Mutex;

use chrono::DateTime;

use crate::domain::category::{Category, NewCategory};
use crate::domain::item::{Item, ItemListEntry, ItemSummary, ItemWithCategory, NewItem};
use crate::domain::types::{CategoryId, CategoryName, ItemId};
use crate::repository::{
    CategoryReader, CategoryWriter, ItemReader, ItemWriter, RepositoryError, RepositoryResult,
};

#[derive(Default)]
struct State {
    categories: Vec<Category>,
    items: Vec<Item>,
    next_category_id: i32,
    next_item_id: i32,
}

/// Simple in-memory repository used for unit tests.
///
/// Setting `failing` makes every call return a database error.
#[derive(Default)]
pub struct TestRepository {
    state: Mutex<State>,
    failing: bool,
}

impl TestRepository {
    pub fn new(categories: Vec<Category>, items: Vec<Item>) -> Self {
        let next_category_id = categories.iter().map(|c| c.id.get()).max().unwrap_or(0) + 1;
        let next_item_id = items.iter().map(|i| i.id.get()).max().unwrap_or(0) + 1;
        Self {
            state: Mutex::new(State {
                categories,
                items,
                next_category_id,
                next_item_id,
            }),
            failing: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn categories(&self) -> Vec<Category> {
        self.state.lock().unwrap().categories.clone()
    }

    pub fn items(&self) -> Vec<Item> {
        self.state.lock().unwrap().items.clone()
    }

    fn check(&self) -> RepositoryResult<()> {
        if self.failing {
            Err(RepositoryError::Database(diesel::result::Error::BrokenTransactionManager))
        } else {
            Ok(())
        }
    }
}

fn epoch() -> chrono::NaiveDateTime {
    DateTime::from_timestamp(0, 0).unwrap().naive_utc()
}

impl CategoryReader for TestRepository {
    fn list_categories(&self) -> RepositoryResult<Vec<Category>> {
        self.check()?;
        let mut categories = self.categories();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>> {
        self.check()?;
        Ok(self.categories().into_iter().find(|c| c.id == id))
    }

    fn get_category_by_name(&self, name: &CategoryName) -> RepositoryResult<Option<Category>> {
        self.check()?;
        Ok(self.categories().into_iter().find(|c| &c.name == name))
    }

    fn count_categories(&self) -> RepositoryResult<usize> {
        self.check()?;
        Ok(self.categories().len())
    }
}

impl CategoryWriter for TestRepository {
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category> {
        self.check()?;
        let mut state = self.state.lock().unwrap();
        let created = Category {
            id: CategoryId::new(state.next_category_id.max(1))?,
            name: category.name.clone(),
            created_at: category.created_at,
            updated_at: category.updated_at,
        };
        state.next_category_id = created.id.get() + 1;
        state.categories.push(created.clone());
        Ok(created)
    }

    fn update_category(&self, id: CategoryId, name: &CategoryName) -> RepositoryResult<usize> {
        self.check()?;
        let mut state = self.state.lock().unwrap();
        let mut affected = 0;
        for category in state.categories.iter_mut().filter(|c| c.id == id) {
            category.name = name.clone();
            category.updated_at = epoch();
            affected += 1;
        }
        Ok(affected)
    }

    fn delete_category(&self, id: CategoryId) -> RepositoryResult<usize> {
        self.check()?;
        let mut state = self.state.lock().unwrap();
        let before = state.categories.len();
        state.categories.retain(|c| c.id != id);
        Ok(before - state.categories.len())
    }
}

impl ItemReader for TestRepository {
    fn list_items(&self) -> RepositoryResult<Vec<ItemListEntry>> {
        self.check()?;
        let categories = self.categories();
        let mut items = self.items();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items
            .into_iter()
            .map(|item| ItemListEntry {
                id: item.id,
                name: item.name,
                category: item
                    .category_id
                    .and_then(|id| categories.iter().find(|c| c.id == id).cloned()),
            })
            .collect())
    }

    fn get_item_by_id(&self, id: ItemId) -> RepositoryResult<Option<ItemWithCategory>> {
        self.check()?;
        let categories = self.categories();
        Ok(self
            .items()
            .into_iter()
            .find(|i| i.id == id)
            .map(|item| ItemWithCategory {
                category: item
                    .category_id
                    .and_then(|cid| categories.iter().find(|c| c.id == cid).cloned()),
                item,
            }))
    }

    fn list_items_in_category(
        &self,
        category_id: CategoryId,
    ) -> RepositoryResult<Vec<ItemSummary>> {
        self.check()?;
        let mut items: Vec<ItemSummary> = self
            .items()
            .into_iter()
            .filter(|i| i.category_id == Some(category_id))
            .map(|i| ItemSummary {
                id: i.id,
                name: i.name,
            })
            .collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }

    fn count_items(&self) -> RepositoryResult<usize> {
        self.check()?;
        Ok(self.items().len())
    }
}

impl ItemWriter for TestRepository {
    fn create_item(&self, item: &NewItem) -> RepositoryResult<Item> {
        self.check()?;
        let mut state = self.state.lock().unwrap();
        let created = Item {
            id: ItemId::new(state.next_item_id.max(1))?,
            name: item.name.clone(),
            description: item.description.clone(),
            category_id: item.category_id,
            price: item.price.clone(),
            stock_number: item.stock_number.clone(),
            created_at: item.created_at,
            updated_at: item.updated_at,
        };
        state.next_item_id = created.id.get() + 1;
        state.items.push(created.clone());
        Ok(created)
    }

    fn update_item(&self, id: ItemId, item: &NewItem) -> RepositoryResult<usize> {
        self.check()?;
        let mut state = self.state.lock().unwrap();
        let mut affected = 0;
        for existing in state.items.iter_mut().filter(|i| i.id == id) {
            existing.name = item.name.clone();
            existing.description = item.description.clone();
            existing.category_id = item.category_id;
            existing.price = item.price.clone();
            existing.stock_number = item.stock_number.clone();
            existing.updated_at = item.updated_at;
            affected += 1;
        }
        Ok(affected)
    }

    fn delete_item(&self, id: ItemId) -> RepositoryResult<usize> {
        self.check()?;
        let mut state = self.state.lock().unwrap();
        let before = state.items.len();
        state.items.retain(|i| i.id != id);
        Ok(before - state.items.len())
    }
}
