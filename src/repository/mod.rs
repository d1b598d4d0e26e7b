use crate::db::{DbConnection, DbPool};
use crate::domain::brand::Brand;
use crate::domain::category::Category;
use crate::domain::product::{NewProduct, Product, ProductListQuery, UpdateProduct};
use crate::repository::errors::RepositoryResult;

pub mod catalog;
pub mod errors;
pub mod product;

#[cfg(test)]
pub mod mock;

#[derive(Clone)]
/// Diesel-backed repository implementation that wraps an r2d2 pool.
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Read-only operations over product records.
pub trait ProductReader {
    fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<Product>>;
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
}

/// Write operations over product records.
pub trait ProductWriter {
    fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
    /// Replace the stored thumbnail and gallery URLs for a product.
    fn set_product_images(
        &self,
        product_id: i32,
        thumbnail: &str,
        images: &[String],
    ) -> RepositoryResult<Product>;
    fn update_product(&self, product_id: i32, updates: &UpdateProduct)
    -> RepositoryResult<Product>;
    /// Set or clear the soft-deletion flag.
    fn set_product_deleted(&self, product_id: i32, is_deleted: bool) -> RepositoryResult<Product>;
    /// Physically remove a product row and its images. Only used to roll
    /// back a creation whose image files could not be stored.
    fn purge_product(&self, product_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over brand records.
pub trait BrandReader {
    fn get_brand_by_id(&self, id: i32) -> RepositoryResult<Option<Brand>>;
    fn list_brands(&self) -> RepositoryResult<Vec<Brand>>;
}

/// Read-only operations over category records.
pub trait CategoryReader {
    fn get_category_by_id(&self, id: i32) -> RepositoryResult<Option<Category>>;
    fn list_categories(&self) -> RepositoryResult<Vec<Category>>;
}
