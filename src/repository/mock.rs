use mockall::mock;

use super::{BrandReader, CategoryReader, ProductReader, ProductWriter};
use crate::domain::{
    brand::Brand,
    category::Category,
    product::{NewProduct, Product, ProductListQuery, UpdateProduct},
};
use crate::repository::errors::RepositoryResult;

mock! {
    pub ProductReader {}

    impl ProductReader for ProductReader {
        fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<Product>>;
        fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
    }
}

mock! {
    pub ProductWriter {}

    impl ProductWriter for ProductWriter {
        fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
        fn set_product_images(&self, product_id: i32, thumbnail: &str, images: &[String]) -> RepositoryResult<Product>;
        fn update_product(&self, product_id: i32, updates: &UpdateProduct) -> RepositoryResult<Product>;
        fn set_product_deleted(&self, product_id: i32, is_deleted: bool) -> RepositoryResult<Product>;
        fn purge_product(&self, product_id: i32) -> RepositoryResult<()>;
    }
}

mock! {
    pub BrandReader {}

    impl BrandReader for BrandReader {
        fn get_brand_by_id(&self, id: i32) -> RepositoryResult<Option<Brand>>;
        fn list_brands(&self) -> RepositoryResult<Vec<Brand>>;
    }
}

mock! {
    pub CategoryReader {}

    impl CategoryReader for CategoryReader {
        fn get_category_by_id(&self, id: i32) -> RepositoryResult<Option<Category>>;
        fn list_categories(&self) -> RepositoryResult<Vec<Category>>;
    }
}
