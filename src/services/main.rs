use crate::dto::items::CatalogSummaryDto;
use crate::repository::{CategoryReader, ItemReader};

use super::{ServiceError, ServiceResult};

/// Core business logic for rendering the catalog home page.
///
/// Counts categories and items concurrently. Any repository errors are
/// translated into `ServiceError` so that the HTTP route can remain a thin
/// wrapper.
pub fn show_index<R>(repo: &R) -> ServiceResult<CatalogSummaryDto>
where
    R: CategoryReader + ItemReader + Sync,
{
    let (category_count, item_count) =
        rayon::join(|| repo.count_categories(), || repo.count_items());

    match (category_count, item_count) {
        (Ok(category_count), Ok(item_count)) => Ok(CatalogSummaryDto {
            category_count,
            item_count,
        }),
        (Err(e), _) | (_, Err(e)) => {
            log::error!("Failed to count catalog records: {e}");
            Err(ServiceError::Internal)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::category::Category;
    use crate::domain::types::{CategoryId, CategoryName};
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

    #[test]
    fn returns_category_and_item_counts() {
        let repo = TestRepository::new(
            vec![sample_category(1, "Winter"), sample_category(2, "Summer")],
            vec![],
        );

        let summary = show_index(&repo).unwrap();

        assert_eq!(summary.category_count, 2);
        assert_eq!(summary.item_count, 0);
    }

    #[test]
    fn store_failure_is_internal_error() {
        let repo = TestRepository::failing();
        assert_eq!(show_index(&repo), Err(ServiceError::Internal));
    }
}
