use serde::Deserialize;

use crate::domain::product::{Product, ProductListQuery};
use crate::forms::products::{AddProductForm, EditProductForm};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{BrandReader, CategoryReader, ProductReader, ProductWriter};
use crate::services::{ServiceError, ServiceResult};
use crate::uploads::ImageStore;

/// Query parameters accepted by the product listing endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ProductsQuery {
    /// Optional search string entered by the user.
    pub search: Option<String>,
    /// Page requested by the client (1-based).
    pub page: Option<usize>,
    /// Whether soft-deleted items should be included in the response.
    #[serde(default)]
    pub include_deleted: bool,
}

/// Data backing the product listing, for both the JSON endpoint and the
/// HTML index page.
pub struct ProductsPageData {
    /// Paginated list of products.
    pub products: Paginated<Product>,
    /// Search query echoed back to the view when present.
    pub search: Option<String>,
    /// Whether soft-deleted items were requested.
    pub include_deleted: bool,
}

/// Loads a page of the product catalog.
pub fn load_products_page<R>(repo: &R, query: ProductsQuery) -> ServiceResult<ProductsPageData>
where
    R: ProductReader + ?Sized,
{
    let ProductsQuery {
        search,
        page,
        include_deleted,
    } = query;

    let page = page.unwrap_or(1);
    let mut list_query = ProductListQuery::new().paginate(page, DEFAULT_ITEMS_PER_PAGE);

    if let Some(search_term) = search.as_ref() {
        list_query = list_query.search(search_term);
    }

    if include_deleted {
        list_query = list_query.include_deleted();
    }

    let (total, items) = repo.list_products(list_query).map_err(ServiceError::from)?;

    let total_pages = total.div_ceil(DEFAULT_ITEMS_PER_PAGE);
    let products = Paginated::new(items, page, total_pages);

    Ok(ProductsPageData {
        products,
        search,
        include_deleted,
    })
}

/// Fetches a single product by id.
pub fn get_product<R>(repo: &R, product_id: i32) -> ServiceResult<Product>
where
    R: ProductReader + ?Sized,
{
    repo.get_product_by_id(product_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)
}

/// Creates a new product from a multipart submission.
///
/// The row is inserted first so that the uploaded files can be stored
/// under the product's id; if storing them fails the row is purged again.
pub fn create_product<R>(
    repo: &R,
    store: &ImageStore,
    form: AddProductForm,
) -> ServiceResult<Product>
where
    R: ProductWriter + BrandReader + CategoryReader + ?Sized,
{
    let (new_product, upload) = form
        .into_parts()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    ensure_brand_exists(repo, new_product.brand_id)?;
    ensure_category_exists(repo, new_product.category_id)?;

    let created = repo
        .create_product(&new_product)
        .map_err(ServiceError::from)?;

    let stored = match store.save_product_images(created.id, &upload.thumbnail, &upload.images) {
        Ok(stored) => stored,
        Err(err) => {
            log::error!("Failed to store images for product {}: {err}", created.id);
            rollback_created(repo, store, created.id);
            return Err(ServiceError::Storage(err));
        }
    };

    match repo.set_product_images(created.id, &stored.thumbnail, &stored.images) {
        Ok(product) => Ok(product),
        Err(err) => {
            log::error!(
                "Failed to record image urls for product {}: {err}",
                created.id
            );
            rollback_created(repo, store, created.id);
            Err(ServiceError::from(err))
        }
    }
}

/// Applies a partial update to an existing product.
pub fn modify_product<R>(
    repo: &R,
    product_id: i32,
    form: EditProductForm,
) -> ServiceResult<Product>
where
    R: ProductWriter + BrandReader + CategoryReader + ?Sized,
{
    let updates = form
        .into_update_product()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    if let Some(brand_id) = updates.brand_id {
        ensure_brand_exists(repo, brand_id)?;
    }

    if let Some(category_id) = updates.category_id {
        ensure_category_exists(repo, category_id)?;
    }

    repo.update_product(product_id, &updates)
        .map_err(ServiceError::from)
}

/// Soft-deletes a product.
pub fn remove_product<R>(repo: &R, product_id: i32) -> ServiceResult<Product>
where
    R: ProductWriter + ?Sized,
{
    repo.set_product_deleted(product_id, true)
        .map_err(ServiceError::from)
}

/// Clears the soft-deletion flag of a product.
pub fn restore_product<R>(repo: &R, product_id: i32) -> ServiceResult<Product>
where
    R: ProductWriter + ?Sized,
{
    repo.set_product_deleted(product_id, false)
        .map_err(ServiceError::from)
}

fn ensure_brand_exists<R>(repo: &R, brand_id: i32) -> ServiceResult<()>
where
    R: BrandReader + ?Sized,
{
    match repo.get_brand_by_id(brand_id).map_err(ServiceError::from)? {
        Some(_) => Ok(()),
        None => Err(ServiceError::Form(format!("Unknown brand id {brand_id}"))),
    }
}

fn ensure_category_exists<R>(repo: &R, category_id: i32) -> ServiceResult<()>
where
    R: CategoryReader + ?Sized,
{
    match repo
        .get_category_by_id(category_id)
        .map_err(ServiceError::from)?
    {
        Some(_) => Ok(()),
        None => Err(ServiceError::Form(format!(
            "Unknown category id {category_id}"
        ))),
    }
}

fn rollback_created<R>(repo: &R, store: &ImageStore, product_id: i32)
where
    R: ProductWriter + ?Sized,
{
    if let Err(err) = repo.purge_product(product_id) {
        log::error!("Failed to roll back product {product_id} after image error: {err}");
    }
    if let Err(err) = store.remove_product_images(product_id) {
        log::error!("Failed to remove files for product {product_id} after image error: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use actix_multipart::form::tempfile::TempFile;
    use actix_multipart::form::text::Text;
    use chrono::{NaiveDate, NaiveDateTime};
    use tempfile::{NamedTempFile, tempdir};

    use crate::domain::brand::Brand;
    use crate::domain::category::Category;
    use crate::domain::product::{NewProduct, Product, ProductListQuery, UpdateProduct};
    use crate::repository::errors::RepositoryResult;
    use crate::repository::mock::{
        MockBrandReader, MockCategoryReader, MockProductReader, MockProductWriter,
    };

    fn datetime() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .unwrap_or_default()
    }

    fn sample_product(id: i32, title: &str) -> Product {
        Product {
            id,
            title: title.to_string(),
            brand_id: 3,
            category_id: 5,
            description: "A product".to_string(),
            price: 19.99,
            discount_percentage: 0.0,
            stock_quantity: 10,
            thumbnail: String::new(),
            images: Vec::new(),
            is_deleted: false,
            created_at: datetime(),
            updated_at: datetime(),
        }
    }

    fn image(name: &str, contents: &[u8]) -> TempFile {
        let mut file = NamedTempFile::new().expect("create temp file");
        file.write_all(contents).expect("write contents");

        TempFile {
            file,
            content_type: None,
            file_name: Some(name.to_string()),
            size: contents.len(),
        }
    }

    fn add_form() -> AddProductForm {
        AddProductForm {
            title: Text("Widget".to_string()),
            brand: Text(3),
            category: Text(5),
            description: Text("A widget.".to_string()),
            price: Text(19.99),
            discount_percentage: Text(5.0),
            stock_quantity: Text(10),
            thumbnail: image("thumb.jpg", b"thumb"),
            images: vec![image("a.png", b"a"), image("b.png", b"b")],
        }
    }

    fn brand(id: i32) -> Brand {
        Brand {
            id,
            name: format!("Brand {id}"),
            created_at: datetime(),
            updated_at: datetime(),
        }
    }

    fn category(id: i32) -> Category {
        Category {
            id,
            name: format!("Category {id}"),
            created_at: datetime(),
            updated_at: datetime(),
        }
    }

    struct FakeRepo {
        product_reader: MockProductReader,
        product_writer: MockProductWriter,
        brand_reader: MockBrandReader,
        category_reader: MockCategoryReader,
    }

    impl FakeRepo {
        fn new() -> Self {
            Self {
                product_reader: MockProductReader::new(),
                product_writer: MockProductWriter::new(),
                brand_reader: MockBrandReader::new(),
                category_reader: MockCategoryReader::new(),
            }
        }
    }

    impl ProductReader for FakeRepo {
        fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<Product>> {
            self.product_reader.get_product_by_id(id)
        }

        fn list_products(
            &self,
            query: ProductListQuery,
        ) -> RepositoryResult<(usize, Vec<Product>)> {
            self.product_reader.list_products(query)
        }
    }

    impl ProductWriter for FakeRepo {
        fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product> {
            self.product_writer.create_product(new_product)
        }

        fn set_product_images(
            &self,
            product_id: i32,
            thumbnail: &str,
            images: &[String],
        ) -> RepositoryResult<Product> {
            self.product_writer
                .set_product_images(product_id, thumbnail, images)
        }

        fn update_product(
            &self,
            product_id: i32,
            updates: &UpdateProduct,
        ) -> RepositoryResult<Product> {
            self.product_writer.update_product(product_id, updates)
        }

        fn set_product_deleted(
            &self,
            product_id: i32,
            is_deleted: bool,
        ) -> RepositoryResult<Product> {
            self.product_writer
                .set_product_deleted(product_id, is_deleted)
        }

        fn purge_product(&self, product_id: i32) -> RepositoryResult<()> {
            self.product_writer.purge_product(product_id)
        }
    }

    impl BrandReader for FakeRepo {
        fn get_brand_by_id(&self, id: i32) -> RepositoryResult<Option<Brand>> {
            self.brand_reader.get_brand_by_id(id)
        }

        fn list_brands(&self) -> RepositoryResult<Vec<Brand>> {
            self.brand_reader.list_brands()
        }
    }

    impl CategoryReader for FakeRepo {
        fn get_category_by_id(&self, id: i32) -> RepositoryResult<Option<Category>> {
            self.category_reader.get_category_by_id(id)
        }

        fn list_categories(&self) -> RepositoryResult<Vec<Category>> {
            self.category_reader.list_categories()
        }
    }

    #[test]
    fn load_products_page_passes_filters() {
        let mut repo = FakeRepo::new();

        repo.product_reader
            .expect_list_products()
            .times(1)
            .withf(|qry| {
                assert_eq!(qry.search.as_deref(), Some("mouse"));
                assert!(qry.include_deleted);
                match &qry.pagination {
                    Some(pagination) => {
                        assert_eq!(pagination.page, 3);
                        assert_eq!(pagination.per_page, DEFAULT_ITEMS_PER_PAGE);
                    }
                    None => panic!("expected pagination to be set"),
                }
                true
            })
            .returning(|_| Ok((41, vec![sample_product(1, "Mouse")])));

        let query = ProductsQuery {
            search: Some("mouse".to_string()),
            page: Some(3),
            include_deleted: true,
        };

        let data = load_products_page(&repo, query).expect("expected success");

        assert_eq!(data.search.as_deref(), Some("mouse"));
        assert!(data.include_deleted);
        assert_eq!(data.products.page, 3);
        assert_eq!(data.products.total_pages, 41usize.div_ceil(DEFAULT_ITEMS_PER_PAGE));
        assert_eq!(data.products.items.len(), 1);
    }

    #[test]
    fn get_product_maps_missing_row_to_not_found() {
        let mut repo = FakeRepo::new();
        repo.product_reader
            .expect_get_product_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let result = get_product(&repo, 99);

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn create_product_persists_row_files_and_urls() {
        let dir = tempdir().expect("tempdir");
        let store = ImageStore::new(dir.path());
        let mut repo = FakeRepo::new();

        repo.brand_reader
            .expect_get_brand_by_id()
            .times(1)
            .returning(|id| Ok(Some(brand(id))));
        repo.category_reader
            .expect_get_category_by_id()
            .times(1)
            .returning(|id| Ok(Some(category(id))));

        repo.product_writer
            .expect_create_product()
            .times(1)
            .withf(|new_product| {
                assert_eq!(new_product.title, "Widget");
                assert_eq!(new_product.brand_id, 3);
                assert_eq!(new_product.category_id, 5);
                true
            })
            .returning(|_| Ok(sample_product(101, "Widget")));

        repo.product_writer
            .expect_set_product_images()
            .times(1)
            .withf(|product_id, thumbnail, images| {
                assert_eq!(*product_id, 101);
                assert_eq!(thumbnail, "/uploads/products/101/thumbnail.jpg");
                assert_eq!(
                    images,
                    [
                        "/uploads/products/101/image-0.png".to_string(),
                        "/uploads/products/101/image-1.png".to_string(),
                    ]
                );
                true
            })
            .returning(|_, _, _| {
                let mut product = sample_product(101, "Widget");
                product.thumbnail = "/uploads/products/101/thumbnail.jpg".to_string();
                Ok(product)
            });

        let result = create_product(&repo, &store, add_form()).expect("expected success");

        assert_eq!(result.id, 101);
        assert!(dir.path().join("products/101/thumbnail.jpg").exists());
        assert!(dir.path().join("products/101/image-1.png").exists());
    }

    #[test]
    fn create_product_rejects_unknown_brand() {
        let dir = tempdir().expect("tempdir");
        let store = ImageStore::new(dir.path());
        let mut repo = FakeRepo::new();

        repo.brand_reader
            .expect_get_brand_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let result = create_product(&repo, &store, add_form());

        assert!(matches!(
            result,
            Err(ServiceError::Form(message)) if message == "Unknown brand id 3"
        ));
    }

    #[test]
    fn create_product_skips_repository_on_form_error() {
        let dir = tempdir().expect("tempdir");
        let store = ImageStore::new(dir.path());
        let repo = FakeRepo::new();

        let mut form = add_form();
        form.title = Text("   ".to_string());

        let result = create_product(&repo, &store, form);

        assert!(matches!(
            result,
            Err(ServiceError::Form(message)) if message == "Title is required"
        ));
    }

    #[test]
    fn create_product_rolls_back_when_storage_fails() {
        // Root the store at a plain file so directory creation fails.
        let blocker = NamedTempFile::new().expect("create temp file");
        let store = ImageStore::new(blocker.path());
        let mut repo = FakeRepo::new();

        repo.brand_reader
            .expect_get_brand_by_id()
            .returning(|id| Ok(Some(brand(id))));
        repo.category_reader
            .expect_get_category_by_id()
            .returning(|id| Ok(Some(category(id))));

        repo.product_writer
            .expect_create_product()
            .times(1)
            .returning(|_| Ok(sample_product(7, "Widget")));

        repo.product_writer
            .expect_purge_product()
            .times(1)
            .withf(|product_id| {
                assert_eq!(*product_id, 7);
                true
            })
            .returning(|_| Ok(()));

        let result = create_product(&repo, &store, add_form());

        assert!(matches!(result, Err(ServiceError::Storage(_))));
    }

    #[test]
    fn modify_product_checks_brand_reference() {
        let mut repo = FakeRepo::new();

        repo.brand_reader
            .expect_get_brand_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let form = EditProductForm {
            brand: Some(9),
            ..Default::default()
        };

        let result = modify_product(&repo, 1, form);

        assert!(matches!(
            result,
            Err(ServiceError::Form(message)) if message == "Unknown brand id 9"
        ));
    }

    #[test]
    fn modify_product_applies_updates() {
        let mut repo = FakeRepo::new();

        repo.product_writer
            .expect_update_product()
            .times(1)
            .withf(|product_id, updates| {
                assert_eq!(*product_id, 4);
                assert_eq!(updates.title.as_deref(), Some("Renamed"));
                assert!(updates.brand_id.is_none());
                true
            })
            .returning(|_, _| Ok(sample_product(4, "Renamed")));

        let form = EditProductForm {
            title: Some("Renamed".to_string()),
            ..Default::default()
        };

        let result = modify_product(&repo, 4, form).expect("expected success");

        assert_eq!(result.title, "Renamed");
    }

    #[test]
    fn remove_and_restore_toggle_the_flag() {
        let mut repo = FakeRepo::new();

        repo.product_writer
            .expect_set_product_deleted()
            .times(2)
            .returning(|product_id, is_deleted| {
                let mut product = sample_product(product_id, "Widget");
                product.is_deleted = is_deleted;
                Ok(product)
            });

        let deleted = remove_product(&repo, 6).expect("expected success");
        assert!(deleted.is_deleted);

        let restored = restore_product(&repo, 6).expect("expected success");
        assert!(!restored.is_deleted);
    }
}
