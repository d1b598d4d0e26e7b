use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::product::{NewProduct, UpdateProduct};

/// Maximum number of gallery images accepted per product.
pub const MAX_GALLERY_IMAGES: usize = 4;

/// Maximum allowed length for a product title.
const TITLE_MAX_LEN: u64 = 128;

/// Result type returned by the product form helpers.
pub type ProductFormResult<T> = Result<T, ProductFormError>;

/// Errors that can occur while processing product forms.
///
/// The messages are shown to clients as-is, so each names the offending
/// field.
#[derive(Debug, Error)]
pub enum ProductFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("Title is required")]
    EmptyTitle,
    #[error("Description is required")]
    EmptyDescription,
    #[error("Price must be a non-negative number")]
    InvalidPrice,
    #[error("Discount percentage must be between 0 and 100")]
    InvalidDiscount,
    #[error("Stock quantity must not be negative")]
    InvalidStock,
    #[error("Thumbnail is required")]
    EmptyThumbnail,
    #[error("Between 1 and 4 product images are required, got {count}")]
    GalleryCount { count: usize },
}

/// Multipart payload emitted when submitting the "Add product" form.
///
/// Field names follow the wire contract of the storefront clients, hence
/// the camelCase renames. Parsing failures (missing thumbnail, unparsable
/// numbers) are rejected by the extractor before any handler code runs.
#[derive(Debug, MultipartForm)]
pub struct AddProductForm {
    pub title: Text<String>,
    pub brand: Text<i32>,
    pub category: Text<i32>,
    pub description: Text<String>,
    pub price: Text<f64>,
    #[multipart(rename = "discountPercentage")]
    pub discount_percentage: Text<f64>,
    #[multipart(rename = "stockQuantity")]
    pub stock_quantity: Text<i32>,
    #[multipart(limit = "10MB")]
    pub thumbnail: TempFile,
    #[multipart(limit = "10MB")]
    pub images: Vec<TempFile>,
}

/// Uploaded image files split off from the text fields during conversion.
#[derive(Debug)]
pub struct ProductImagesUpload {
    pub thumbnail: TempFile,
    pub images: Vec<TempFile>,
}

impl AddProductForm {
    /// Validates and sanitizes the payload into a domain `NewProduct` plus
    /// the uploaded files.
    pub fn into_parts(self) -> ProductFormResult<(NewProduct, ProductImagesUpload)> {
        let AddProductForm {
            title,
            brand,
            category,
            description,
            price,
            discount_percentage,
            stock_quantity,
            thumbnail,
            images,
        } = self;

        let sanitized_title = sanitize_inline_text(&title.into_inner());
        if sanitized_title.is_empty() {
            return Err(ProductFormError::EmptyTitle);
        }

        let sanitized_description = sanitize_multiline_text(&description.into_inner());
        if sanitized_description.is_empty() {
            return Err(ProductFormError::EmptyDescription);
        }

        let price = price.into_inner();
        if !price.is_finite() || price < 0.0 {
            return Err(ProductFormError::InvalidPrice);
        }

        let discount_percentage = discount_percentage.into_inner();
        if !discount_percentage.is_finite() || !(0.0..=100.0).contains(&discount_percentage) {
            return Err(ProductFormError::InvalidDiscount);
        }

        let stock_quantity = stock_quantity.into_inner();
        if stock_quantity < 0 {
            return Err(ProductFormError::InvalidStock);
        }

        if thumbnail.size == 0 {
            return Err(ProductFormError::EmptyThumbnail);
        }

        // Browsers submit an empty part for each unselected file input.
        let images: Vec<TempFile> = images.into_iter().filter(|file| file.size > 0).collect();
        if images.is_empty() || images.len() > MAX_GALLERY_IMAGES {
            return Err(ProductFormError::GalleryCount {
                count: images.len(),
            });
        }

        let new_product = NewProduct {
            title: sanitized_title,
            brand_id: brand.into_inner(),
            category_id: category.into_inner(),
            description: sanitized_description,
            price,
            discount_percentage,
            stock_quantity,
        };

        Ok((new_product, ProductImagesUpload { thumbnail, images }))
    }
}

/// JSON payload accepted by the product PATCH endpoint.
///
/// Absent fields are left unchanged; none of the fields can be cleared.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EditProductForm {
    #[validate(length(min = 1, max = TITLE_MAX_LEN))]
    pub title: Option<String>,
    pub brand: Option<i32>,
    pub category: Option<i32>,
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub discount_percentage: Option<f64>,
    #[validate(range(min = 0))]
    pub stock_quantity: Option<i32>,
}

impl EditProductForm {
    /// Validates and sanitizes the payload into a domain `UpdateProduct`.
    pub fn into_update_product(self) -> ProductFormResult<UpdateProduct> {
        self.validate()?;

        let mut updates = UpdateProduct::new();

        if let Some(title) = self.title {
            let sanitized = sanitize_inline_text(&title);
            if sanitized.is_empty() {
                return Err(ProductFormError::EmptyTitle);
            }
            updates = updates.title(sanitized);
        }

        if let Some(brand_id) = self.brand {
            updates = updates.brand_id(brand_id);
        }

        if let Some(category_id) = self.category {
            updates = updates.category_id(category_id);
        }

        if let Some(description) = self.description {
            let sanitized = sanitize_multiline_text(&description);
            if sanitized.is_empty() {
                return Err(ProductFormError::EmptyDescription);
            }
            updates = updates.description(sanitized);
        }

        if let Some(price) = self.price {
            if !price.is_finite() {
                return Err(ProductFormError::InvalidPrice);
            }
            updates = updates.price(price);
        }

        if let Some(discount_percentage) = self.discount_percentage {
            if !discount_percentage.is_finite() {
                return Err(ProductFormError::InvalidDiscount);
            }
            updates = updates.discount_percentage(discount_percentage);
        }

        if let Some(stock_quantity) = self.stock_quantity {
            updates = updates.stock_quantity(stock_quantity);
        }

        Ok(updates)
    }
}

fn sanitize_inline_text(input: &str) -> String {
    let mut sanitized = String::with_capacity(input.len());
    let mut previous_whitespace = false;

    for ch in input.trim().chars() {
        if ch.is_whitespace() {
            if !previous_whitespace {
                sanitized.push(' ');
                previous_whitespace = true;
            }
        } else if ch.is_control() {
            continue;
        } else {
            sanitized.push(ch);
            previous_whitespace = false;
        }
    }

    sanitized
}

fn sanitize_multiline_text(input: &str) -> String {
    let mut lines: Vec<String> = input.lines().map(sanitize_inline_text).collect();

    while matches!(lines.first(), Some(line) if line.is_empty()) {
        lines.remove(0);
    }

    while matches!(lines.last(), Some(line) if line.is_empty()) {
        lines.pop();
    }

    if lines.is_empty() {
        return String::new();
    }

    let mut result = Vec::with_capacity(lines.len());
    let mut previous_empty = false;
    for line in lines {
        let is_empty = line.is_empty();
        if is_empty {
            if previous_empty {
                continue;
            }
            previous_empty = true;
            result.push(String::new());
        } else {
            previous_empty = false;
            result.push(line);
        }
    }

    result.join("\n")
}
