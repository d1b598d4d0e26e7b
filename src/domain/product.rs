use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::pagination::Pagination;

/// Domain representation of a catalog product.
///
/// Serialized with camelCase keys because that is the shape the storefront
/// clients consume.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier of the product.
    pub id: i32,
    /// Human-readable title of the product.
    pub title: String,
    /// Referenced brand identifier.
    pub brand_id: i32,
    /// Referenced category identifier.
    pub category_id: i32,
    /// Longer description shown to shoppers.
    pub description: String,
    /// List price of the product.
    pub price: f64,
    /// Discount applied to the list price, in percent.
    pub discount_percentage: f64,
    /// Units currently in stock.
    pub stock_quantity: i32,
    /// URL of the thumbnail image.
    pub thumbnail: String,
    /// Ordered gallery image URLs.
    pub images: Vec<String>,
    /// Soft-deletion flag; deleted products stay in the store.
    pub is_deleted: bool,
    /// Timestamp for when the product record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the product record.
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new product.
///
/// Image URLs are attached in a second step once the uploaded files have
/// been persisted under the product's directory.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub title: String,
    pub brand_id: i32,
    pub category_id: i32,
    pub description: String,
    pub price: f64,
    pub discount_percentage: f64,
    pub stock_quantity: i32,
}

/// Patch data applied when updating an existing product.
///
/// `None` fields are left untouched; `updated_at` is always bumped.
#[derive(Debug, Clone)]
pub struct UpdateProduct {
    pub title: Option<String>,
    pub brand_id: Option<i32>,
    pub category_id: Option<i32>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub discount_percentage: Option<f64>,
    pub stock_quantity: Option<i32>,
    pub updated_at: NaiveDateTime,
}

impl Default for UpdateProduct {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateProduct {
    /// Create a new patch object with no changes applied yet.
    pub fn new() -> Self {
        let now = chrono::Local::now().naive_utc();
        Self {
            title: None,
            brand_id: None,
            category_id: None,
            description: None,
            price: None,
            discount_percentage: None,
            stock_quantity: None,
            updated_at: now,
        }
    }

    /// Update the product title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Update the referenced brand.
    pub fn brand_id(mut self, brand_id: i32) -> Self {
        self.brand_id = Some(brand_id);
        self
    }

    /// Update the referenced category.
    pub fn category_id(mut self, category_id: i32) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Update the product description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Update the list price.
    pub fn price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    /// Update the discount percentage.
    pub fn discount_percentage(mut self, discount_percentage: f64) -> Self {
        self.discount_percentage = Some(discount_percentage);
        self
    }

    /// Update the stock quantity.
    pub fn stock_quantity(mut self, stock_quantity: i32) -> Self {
        self.stock_quantity = Some(stock_quantity);
        self
    }

    /// Whether the patch carries any field change.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.brand_id.is_none()
            && self.category_id.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.discount_percentage.is_none()
            && self.stock_quantity.is_none()
    }
}

/// Query definition used to list catalog products.
#[derive(Debug, Clone)]
pub struct ProductListQuery {
    /// Optional title or description search term.
    pub search: Option<String>,
    /// Whether soft-deleted products should be included in the results.
    pub include_deleted: bool,
    /// Optional pagination options applied to the query.
    pub pagination: Option<Pagination>,
}

impl Default for ProductListQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductListQuery {
    /// Construct a query that targets all live products.
    pub fn new() -> Self {
        Self {
            search: None,
            include_deleted: false,
            pagination: None,
        }
    }

    /// Filter the results by a search term applied to the title or description.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Include soft-deleted products in the results.
    pub fn include_deleted(mut self) -> Self {
        self.include_deleted = true;
        self
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
