use crate::domain::item::Item;
use crate::domain::types::{CategoryId, CategoryName, ItemId};
use crate::dto::categories::CategoryDto;
use crate::dto::items::{ItemDto, ItemListEntryDto};
use crate::forms::FieldError;
use crate::forms::items::{ItemForm, ItemFormPayload};
use crate::models::config::UnknownCategoryPolicy;
use crate::repository::{CategoryReader, ItemReader, ItemWriter};

use super::categories::show_categories;
use super::{ServiceError, ServiceResult};

/// Resolve a submitted category name to an id, applying `policy` when no
/// category carries that name.
fn resolve_category<R>(
    name: &CategoryName,
    policy: UnknownCategoryPolicy,
    repo: &R,
) -> ServiceResult<Option<CategoryId>>
where
    R: CategoryReader,
{
    match repo.get_category_by_name(name) {
        Ok(Some(category)) => Ok(Some(category.id)),
        Ok(None) => match policy {
            UnknownCategoryPolicy::Reject => Err(ServiceError::Validation(vec![FieldError::new(
                "category",
                "Selected category does not exist.",
            )])),
            UnknownCategoryPolicy::Detach => {
                log::warn!("Category {name} does not exist; saving item without a category");
                Ok(None)
            }
        },
        Err(e) => {
            log::error!("Failed to look up category by name: {e}");
            Err(ServiceError::Internal)
        }
    }
}

fn load_item<R>(item_id: ItemId, repo: &R) -> ServiceResult<ItemDto>
where
    R: ItemReader,
{
    match repo.get_item_by_id(item_id) {
        Ok(Some(item)) => Ok(item.into()),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get item: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// All items ordered by name with their categories populated.
pub fn show_items<R>(repo: &R) -> ServiceResult<Vec<ItemListEntryDto>>
where
    R: ItemReader,
{
    match repo.list_items() {
        Ok(items) => Ok(items.into_iter().map(ItemListEntryDto::from).collect()),
        Err(e) => {
            log::error!("Failed to list items: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn show_item<R>(item_id: i32, repo: &R) -> ServiceResult<ItemDto>
where
    R: ItemReader,
{
    let item_id = ItemId::new(item_id).map_err(|_| ServiceError::NotFound)?;
    load_item(item_id, repo)
}

/// Categories offered by the item create form.
pub fn new_item_form<R>(repo: &R) -> ServiceResult<Vec<CategoryDto>>
where
    R: CategoryReader,
{
    show_categories(repo)
}

/// Prefilled update form and the category choices, loaded concurrently.
pub fn edit_item<R>(item_id: i32, repo: &R) -> ServiceResult<(ItemForm, Vec<CategoryDto>)>
where
    R: CategoryReader + ItemReader + Sync,
{
    let item_id = ItemId::new(item_id).map_err(|_| ServiceError::NotFound)?;

    let (item, categories) = rayon::join(
        || repo.get_item_by_id(item_id),
        || show_categories(repo),
    );

    let item = match item {
        Ok(Some(item)) => item,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get item: {e}");
            return Err(ServiceError::Internal);
        }
    };
    let categories = categories?;

    let form = ItemForm::from_item(&item.item, item.category.as_ref().map(|c| &c.name));
    Ok((form, categories))
}

pub fn create_item<R>(
    payload: ItemFormPayload,
    policy: UnknownCategoryPolicy,
    repo: &R,
) -> ServiceResult<Item>
where
    R: CategoryReader + ItemWriter,
{
    let category_id = resolve_category(&payload.category, policy, repo)?;

    let item = payload.into_new_item(category_id);
    match repo.create_item(&item) {
        Ok(created) => {
            log::info!("Created item {} ({})", created.id, created.name);
            Ok(created)
        }
        Err(e) => {
            log::error!("Failed to create item: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Replace every field of an existing item, keeping its id.
pub fn update_item<R>(
    item_id: i32,
    payload: ItemFormPayload,
    policy: UnknownCategoryPolicy,
    repo: &R,
) -> ServiceResult<Item>
where
    R: CategoryReader + ItemReader + ItemWriter,
{
    let item_id = ItemId::new(item_id).map_err(|_| ServiceError::NotFound)?;

    let existing = match repo.get_item_by_id(item_id) {
        Ok(Some(found)) => found.item,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get item: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let category_id = resolve_category(&payload.category, policy, repo)?;
    let replacement = payload.into_new_item(category_id);

    if let Err(e) = repo.update_item(existing.id, &replacement) {
        log::error!("Failed to update item: {e}");
        return Err(ServiceError::Internal);
    }

    Ok(Item {
        id: existing.id,
        name: replacement.name,
        description: replacement.description,
        category_id: replacement.category_id,
        price: replacement.price,
        stock_number: replacement.stock_number,
        created_at: existing.created_at,
        updated_at: replacement.updated_at,
    })
}

/// Data for the delete confirmation page, `None` when the item is gone.
pub fn show_item_delete<R>(item_id: i32, repo: &R) -> ServiceResult<Option<ItemDto>>
where
    R: ItemReader,
{
    let Ok(item_id) = ItemId::new(item_id) else {
        return Ok(None);
    };

    match load_item(item_id, repo) {
        Ok(item) => Ok(Some(item)),
        Err(ServiceError::NotFound) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Delete an item. Returns whether a row was removed; an absent id is not an
/// error.
pub fn delete_item<R>(item_id: i32, repo: &R) -> ServiceResult<bool>
where
    R: ItemWriter,
{
    let Ok(item_id) = ItemId::new(item_id) else {
        return Ok(false);
    };

    match repo.delete_item(item_id) {
        Ok(affected) => {
            if affected > 0 {
                log::info!("Deleted item {item_id}");
            }
            Ok(affected > 0)
        }
        Err(e) => {
            log::error!("Failed to delete item: {e}");
            Err(ServiceError::Internal)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::category::Category;
    use crate::domain::types::{ItemDescription, ItemName, ItemPrice, StockNumber};
    use crate::forms::items::ItemForm;
    use crate::repository::test::TestRepository;
    use chrono::DateTime;

    fn sample_category(id: i32, name: &str) -> Category {
        Category {
            id: CategoryId::new(id).unwrap(),
            name: CategoryName::new(name).unwrap(),
            created_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
            updated_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
        }
    }

    fn sample_item(id: i32, name: &str, category_id: Option<i32>) -> Item {
        Item {
            id: ItemId::new(id).unwrap(),
            name: ItemName::new(name).unwrap(),
            description: ItemDescription::new("Rental equipment in good shape").unwrap(),
            category_id: category_id.map(|c| CategoryId::new(c).unwrap()),
            price: ItemPrice::new("$25.00").unwrap(),
            stock_number: StockNumber::new("X99").unwrap(),
            created_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
            updated_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
        }
    }

    fn snowshoe(category: &str) -> ItemFormPayload {
        let pairs = [
            ("name", "Snowshoe"),
            ("description", "A snowshoe for trekking"),
            ("category", category),
            ("price", "$10.00"),
            ("stock_number", "W01"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        ItemForm::from_pairs(pairs).try_into().unwrap()
    }

    #[test]
    fn create_resolves_category_by_name() {
        let repo = TestRepository::new(vec![sample_category(1, "Winter")], vec![]);

        let item = create_item(snowshoe("Winter"), UnknownCategoryPolicy::Reject, &repo).unwrap();
        assert_eq!(item.category_id, Some(CategoryId::new(1).unwrap()));

        let detail = show_item(item.id.get(), &repo).unwrap();
        assert_eq!(detail.category.unwrap().name, "Winter");
        assert_eq!(detail.url, format!("/catalog/item/{}", item.id));
    }

    #[test]
    fn unknown_category_is_rejected_under_reject_policy() {
        let repo = TestRepository::new(vec![sample_category(1, "Winter")], vec![]);

        let err = create_item(snowshoe("Autumn"), UnknownCategoryPolicy::Reject, &repo)
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref e) if e[0].field == "category"));
        assert!(repo.items().is_empty());
    }

    #[test]
    fn unknown_category_is_dropped_under_detach_policy() {
        let repo = TestRepository::new(vec![sample_category(1, "Winter")], vec![]);

        let item = create_item(snowshoe("Autumn"), UnknownCategoryPolicy::Detach, &repo).unwrap();
        assert_eq!(item.category_id, None);
        assert_eq!(repo.items().len(), 1);
        assert!(show_item(item.id.get(), &repo).unwrap().category.is_none());
    }

    #[test]
    fn lists_items_sorted_with_categories() {
        let repo = TestRepository::new(
            vec![sample_category(1, "Winter")],
            vec![
                sample_item(1, "Snowshoe", Some(1)),
                sample_item(2, "Kayak", None),
            ],
        );

        let items = show_items(&repo).unwrap();
        assert_eq!(items[0].name, "Kayak");
        assert!(items[0].category.is_none());
        assert_eq!(items[1].category.as_ref().unwrap().name, "Winter");
    }

    #[test]
    fn update_preserves_id_and_url() {
        let repo = TestRepository::new(
            vec![sample_category(1, "Winter"), sample_category(2, "Summer")],
            vec![sample_item(7, "Snowshoe", Some(1))],
        );

        let updated =
            update_item(7, snowshoe("Summer"), UnknownCategoryPolicy::Reject, &repo).unwrap();
        assert_eq!(updated.id, 7);
        assert_eq!(updated.url(), "/catalog/item/7");
        assert_eq!(updated.category_id, Some(CategoryId::new(2).unwrap()));
        assert_eq!(repo.items()[0].price, "$10.00");
    }

    #[test]
    fn update_of_missing_item_is_not_found() {
        let repo = TestRepository::new(vec![sample_category(1, "Winter")], vec![]);
        assert_eq!(
            update_item(3, snowshoe("Winter"), UnknownCategoryPolicy::Reject, &repo),
            Err(ServiceError::NotFound)
        );
    }

    #[test]
    fn edit_form_is_prefilled() {
        let repo = TestRepository::new(
            vec![sample_category(1, "Winter")],
            vec![sample_item(7, "Snowshoe", Some(1))],
        );

        let (form, categories) = edit_item(7, &repo).unwrap();
        assert_eq!(form.name, "Snowshoe");
        assert_eq!(form.category, vec!["Winter".to_string()]);
        assert_eq!(categories.len(), 1);
        assert_eq!(edit_item(8, &repo), Err(ServiceError::NotFound));
    }

    #[test]
    fn delete_is_unconditional_and_idempotent() {
        let repo = TestRepository::new(
            vec![sample_category(1, "Winter")],
            vec![sample_item(1, "Snowshoe", Some(1))],
        );

        assert_eq!(delete_item(1, &repo), Ok(true));
        assert_eq!(delete_item(1, &repo), Ok(false));
        assert_eq!(show_item(1, &repo), Err(ServiceError::NotFound));
        assert_eq!(show_item_delete(1, &repo), Ok(None));
    }
}
