use crate::domain::brand::Brand;
use crate::domain::category::Category;
use crate::repository::{BrandReader, CategoryReader};
use crate::services::{ServiceError, ServiceResult};

/// Loads all brands, ordered by name.
pub fn load_brands<R>(repo: &R) -> ServiceResult<Vec<Brand>>
where
    R: BrandReader + ?Sized,
{
    repo.list_brands().map_err(ServiceError::from)
}

/// Loads all categories, ordered by name.
pub fn load_categories<R>(repo: &R) -> ServiceResult<Vec<Category>>
where
    R: CategoryReader + ?Sized,
{
    repo.list_categories().map_err(ServiceError::from)
}
