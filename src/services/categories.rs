use crate::domain::category::Category;
use crate::domain::item::ItemSummary;
use crate::domain::types::CategoryId;
use crate::dto::categories::{CategoryDetailDto, CategoryDto};
use crate::forms::FieldError;
use crate::forms::categories::CategoryFormPayload;
use crate::repository::{CategoryReader, CategoryWriter, ItemReader};

use super::{ServiceError, ServiceResult};

/// Outcome of a delete submission.
#[derive(Debug, PartialEq)]
pub enum CategoryDeletion {
    /// The category was removed.
    Deleted,
    /// Nothing to delete; treated as success.
    Missing,
    /// Items still reference the category; it was left untouched.
    Blocked(CategoryDetailDto),
}

/// Load a category and the items referencing it.
///
/// Both reads are independent and run concurrently on separate pooled
/// connections.
fn load_category_with_items<R>(
    category_id: CategoryId,
    repo: &R,
) -> ServiceResult<Option<(Category, Vec<ItemSummary>)>>
where
    R: CategoryReader + ItemReader + Sync,
{
    let (category, items) = rayon::join(
        || repo.get_category_by_id(category_id),
        || repo.list_items_in_category(category_id),
    );

    let category = category.map_err(|e| {
        log::error!("Failed to get category: {e}");
        ServiceError::Internal
    })?;
    let items = items.map_err(|e| {
        log::error!("Failed to list items of category: {e}");
        ServiceError::Internal
    })?;

    Ok(category.map(|category| (category, items)))
}

fn into_detail(category: Category, items: Vec<ItemSummary>) -> CategoryDetailDto {
    CategoryDetailDto {
        category: category.into(),
        items: items.into_iter().map(Into::into).collect(),
    }
}

/// All categories ordered by name.
pub fn show_categories<R>(repo: &R) -> ServiceResult<Vec<CategoryDto>>
where
    R: CategoryReader,
{
    match repo.list_categories() {
        Ok(categories) => Ok(categories.into_iter().map(CategoryDto::from).collect()),
        Err(e) => {
            log::error!("Failed to list categories: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Category detail page: the category and the items filed under it.
pub fn show_category<R>(category_id: i32, repo: &R) -> ServiceResult<CategoryDetailDto>
where
    R: CategoryReader + ItemReader + Sync,
{
    let category_id = CategoryId::new(category_id).map_err(|_| ServiceError::NotFound)?;

    match load_category_with_items(category_id, repo)? {
        Some((category, items)) => Ok(into_detail(category, items)),
        None => Err(ServiceError::NotFound),
    }
}

/// Create a category unless one with the same name already exists, in which
/// case the existing category is returned.
pub fn create_category<R>(payload: CategoryFormPayload, repo: &R) -> ServiceResult<Category>
where
    R: CategoryReader + CategoryWriter,
{
    match repo.get_category_by_name(&payload.name) {
        Ok(Some(existing)) => return Ok(existing),
        Ok(None) => {}
        Err(e) => {
            log::error!("Failed to look up category by name: {e}");
            return Err(ServiceError::Internal);
        }
    }

    let category = payload.into_new_category();
    match repo.create_category(&category) {
        Ok(created) => {
            log::info!("Created category {} ({})", created.id, created.name);
            Ok(created)
        }
        Err(e) => {
            log::error!("Failed to create category: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Category to prefill the update form with.
pub fn edit_category<R>(category_id: i32, repo: &R) -> ServiceResult<Category>
where
    R: CategoryReader,
{
    let category_id = CategoryId::new(category_id).map_err(|_| ServiceError::NotFound)?;

    match repo.get_category_by_id(category_id) {
        Ok(Some(category)) => Ok(category),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get category: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Rename a category. Taking another category's name is a validation error.
pub fn update_category<R>(
    category_id: i32,
    payload: CategoryFormPayload,
    repo: &R,
) -> ServiceResult<Category>
where
    R: CategoryReader + CategoryWriter,
{
    let category = edit_category(category_id, repo)?;

    match repo.get_category_by_name(&payload.name) {
        Ok(Some(other)) if other.id != category.id => {
            return Err(ServiceError::Validation(vec![FieldError::new(
                "name",
                "A category with this name already exists.",
            )]));
        }
        Ok(_) => {}
        Err(e) => {
            log::error!("Failed to look up category by name: {e}");
            return Err(ServiceError::Internal);
        }
    }

    if let Err(e) = repo.update_category(category.id, &payload.name) {
        log::error!("Failed to update category: {e}");
        return Err(ServiceError::Internal);
    }

    Ok(Category {
        name: payload.name,
        ..category
    })
}

/// Data for the delete confirmation page, `None` when the category is gone.
pub fn show_category_delete<R>(
    category_id: i32,
    repo: &R,
) -> ServiceResult<Option<CategoryDetailDto>>
where
    R: CategoryReader + ItemReader + Sync,
{
    let Ok(category_id) = CategoryId::new(category_id) else {
        return Ok(None);
    };

    Ok(load_category_with_items(category_id, repo)?
        .map(|(category, items)| into_detail(category, items)))
}

/// Delete a category that no item references.
pub fn delete_category<R>(category_id: i32, repo: &R) -> ServiceResult<CategoryDeletion>
where
    R: CategoryReader + CategoryWriter + ItemReader + Sync,
{
    let Ok(category_id) = CategoryId::new(category_id) else {
        return Ok(CategoryDeletion::Missing);
    };

    let (category, items) = match load_category_with_items(category_id, repo)? {
        Some(found) => found,
        None => return Ok(CategoryDeletion::Missing),
    };

    if !items.is_empty() {
        log::info!(
            "Refusing to delete category {} referenced by {} item(s)",
            category.id,
            items.len()
        );
        return Ok(CategoryDeletion::Blocked(into_detail(category, items)));
    }

    match repo.delete_category(category.id) {
        Ok(_) => {
            log::info!("Deleted category {}", category.id);
            Ok(CategoryDeletion::Deleted)
        }
        Err(e) => {
            log::error!("Failed to delete category: {e}");
            Err(ServiceError::Internal)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::item::Item;
    use crate::domain::types::{
        CategoryName, ItemDescription, ItemId, ItemName, ItemPrice, StockNumber,
    };
    use crate::forms::categories::CategoryForm;
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
            description: ItemDescription::new("A snowshoe for trekking").unwrap(),
            category_id: category_id.map(|c| CategoryId::new(c).unwrap()),
            price: ItemPrice::new("$10.00").unwrap(),
            stock_number: StockNumber::new("W01").unwrap(),
            created_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
            updated_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
        }
    }

    fn payload(name: &str) -> CategoryFormPayload {
        CategoryForm {
            name: name.to_string(),
        }
        .try_into()
        .unwrap()
    }

    #[test]
    fn lists_categories_sorted_by_name() {
        let repo = TestRepository::new(
            vec![sample_category(1, "Winter"), sample_category(2, "Summer")],
            vec![],
        );

        let categories = show_categories(&repo).unwrap();
        let names: Vec<_> = categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Summer", "Winter"]);
        assert_eq!(categories[0].url, "/catalog/category/2");
    }

    #[test]
    fn detail_includes_referencing_items() {
        let repo = TestRepository::new(
            vec![sample_category(1, "Winter")],
            vec![
                sample_item(1, "Snowshoe", Some(1)),
                sample_item(2, "Kayak", None),
            ],
        );

        let detail = show_category(1, &repo).unwrap();
        assert_eq!(detail.category.name, "Winter");
        assert_eq!(detail.items.len(), 1);
        assert_eq!(detail.items[0].name, "Snowshoe");
        assert_eq!(detail.items[0].url, "/catalog/item/1");
    }

    #[test]
    fn detail_of_missing_category_is_not_found() {
        let repo = TestRepository::default();
        assert_eq!(show_category(5, &repo), Err(ServiceError::NotFound));
        assert_eq!(show_category(0, &repo), Err(ServiceError::NotFound));
    }

    #[test]
    fn create_inserts_new_category() {
        let repo = TestRepository::default();

        let created = create_category(payload("  Winter "), &repo).unwrap();
        assert_eq!(created.name, "Winter");
        assert_eq!(created.url(), format!("/catalog/category/{}", created.id));
        assert_eq!(repo.categories().len(), 1);
    }

    #[test]
    fn create_with_existing_name_returns_existing_category() {
        let repo = TestRepository::new(vec![sample_category(4, "Winter")], vec![]);

        let resolved = create_category(payload("Winter"), &repo).unwrap();
        assert_eq!(resolved.id, 4);
        assert_eq!(repo.categories().len(), 1);
    }

    #[test]
    fn update_replaces_name() {
        let repo = TestRepository::new(vec![sample_category(1, "Winter")], vec![]);

        let updated = update_category(1, payload("Snow Sports"), &repo).unwrap();
        assert_eq!(updated.id, 1);
        assert_eq!(repo.categories()[0].name, "Snow Sports");
    }

    #[test]
    fn update_rejects_name_of_another_category() {
        let repo = TestRepository::new(
            vec![sample_category(1, "Winter"), sample_category(2, "Summer")],
            vec![],
        );

        let err = update_category(1, payload("Summer"), &repo).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref errors) if errors[0].field == "name"));
        assert_eq!(repo.categories()[0].name, "Winter");
    }

    #[test]
    fn update_keeping_own_name_is_allowed() {
        let repo = TestRepository::new(vec![sample_category(1, "Winter")], vec![]);
        assert!(update_category(1, payload("Winter"), &repo).is_ok());
    }

    #[test]
    fn update_of_missing_category_is_not_found() {
        let repo = TestRepository::default();
        assert_eq!(
            update_category(9, payload("Winter"), &repo),
            Err(ServiceError::NotFound)
        );
    }

    #[test]
    fn delete_removes_unreferenced_category() {
        let repo = TestRepository::new(vec![sample_category(1, "Winter")], vec![]);

        assert_eq!(delete_category(1, &repo), Ok(CategoryDeletion::Deleted));
        assert_eq!(show_category(1, &repo), Err(ServiceError::NotFound));
    }

    #[test]
    fn delete_is_refused_while_items_reference_category() {
        let repo = TestRepository::new(
            vec![sample_category(1, "Winter")],
            vec![sample_item(1, "Snowshoe", Some(1))],
        );

        match delete_category(1, &repo).unwrap() {
            CategoryDeletion::Blocked(detail) => {
                assert_eq!(detail.category.name, "Winter");
                assert_eq!(detail.items[0].name, "Snowshoe");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(repo.categories().len(), 1);
    }

    #[test]
    fn delete_of_missing_category_is_a_no_op() {
        let repo = TestRepository::default();
        assert_eq!(delete_category(3, &repo), Ok(CategoryDeletion::Missing));
        assert_eq!(show_category_delete(3, &repo), Ok(None));
    }

    #[test]
    fn store_failures_become_internal_errors() {
        let repo = TestRepository::failing();
        assert_eq!(show_categories(&repo), Err(ServiceError::Internal));
        assert_eq!(show_category(1, &repo), Err(ServiceError::Internal));
    }
}
