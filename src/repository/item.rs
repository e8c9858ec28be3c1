use diesel::prelude::*;

use crate::domain::category::Category;
use crate::domain::item::{Item, ItemListEntry, ItemSummary, ItemWithCategory, NewItem};
use crate::domain::types::{CategoryId, ItemId, ItemName};
use crate::models::category::Category as DbCategory;
use crate::models::item::{Item as DbItem, ItemChangeset, NewItem as DbNewItem};
use crate::repository::{DieselRepository, ItemReader, ItemWriter, RepositoryResult};

fn populate(category: Option<DbCategory>) -> RepositoryResult<Option<Category>> {
    Ok(category.map(Category::try_from).transpose()?)
}

impl ItemReader for DieselRepository {
    fn list_items(&self) -> RepositoryResult<Vec<ItemListEntry>> {
        use crate::schema::{categories, items};

        let mut conn = self.conn()?;

        let rows = items::table
            .left_join(categories::table)
            .select((
                items::id,
                items::name,
                categories::all_columns.nullable(),
            ))
            .order(items::name.asc())
            .load::<(i32, String, Option<DbCategory>)>(&mut conn)?;

        rows.into_iter()
            .map(|(id, name, category)| {
                Ok(ItemListEntry {
                    id: ItemId::new(id)?,
                    name: ItemName::new(name)?,
                    category: populate(category)?,
                })
            })
            .collect()
    }

    fn get_item_by_id(&self, id: ItemId) -> RepositoryResult<Option<ItemWithCategory>> {
        use crate::schema::{categories, items};

        let mut conn = self.conn()?;

        let row = items::table
            .left_join(categories::table)
            .filter(items::id.eq(id.get()))
            .first::<(DbItem, Option<DbCategory>)>(&mut conn)
            .optional()?;

        let Some((item, category)) = row else {
            return Ok(None);
        };

        Ok(Some(ItemWithCategory {
            item: item.try_into()?,
            category: populate(category)?,
        }))
    }

    fn list_items_in_category(
        &self,
        category_id: CategoryId,
    ) -> RepositoryResult<Vec<ItemSummary>> {
        use crate::schema::items;

        let mut conn = self.conn()?;

        let rows = items::table
            .filter(items::category_id.eq(Some(category_id.get())))
            .select((items::id, items::name))
            .order(items::name.asc())
            .load::<(i32, String)>(&mut conn)?;

        rows.into_iter()
            .map(|(id, name)| {
                Ok(ItemSummary {
                    id: ItemId::new(id)?,
                    name: ItemName::new(name)?,
                })
            })
            .collect()
    }

    fn count_items(&self) -> RepositoryResult<usize> {
        use crate::schema::items;

        let mut conn = self.conn()?;

        let total = items::table.count().get_result::<i64>(&mut conn)?;
        Ok(total as usize)
    }
}

impl ItemWriter for DieselRepository {
    fn create_item(&self, item: &NewItem) -> RepositoryResult<Item> {
        use crate::schema::items;

        let mut conn = self.conn()?;
        let db_item: DbNewItem = item.clone().into();

        let created = diesel::insert_into(items::table)
            .values(db_item)
            .get_result::<DbItem>(&mut conn)?;

        Ok(created.try_into()?)
    }

    fn update_item(&self, id: ItemId, item: &NewItem) -> RepositoryResult<usize> {
        use crate::schema::items;

        let mut conn = self.conn()?;
        let changes: ItemChangeset = item.clone().into();

        let affected = diesel::update(items::table.filter(items::id.eq(id.get())))
            .set(changes)
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn delete_item(&self, id: ItemId) -> RepositoryResult<usize> {
        use crate::schema::items;

        let mut conn = self.conn()?;

        let affected =
            diesel::delete(items::table.filter(items::id.eq(id.get()))).execute(&mut conn)?;

        Ok(affected)
    }
}
