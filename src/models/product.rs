use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::product::{
    NewProduct as DomainNewProduct, Product as DomainProduct, UpdateProduct as DomainUpdateProduct,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::products)]
pub struct Product {
    pub id: i32,
    pub title: String,
    pub brand_id: i32,
    pub category_id: i32,
    pub description: String,
    pub price: f64,
    pub discount_percentage: f64,
    pub stock_quantity: i32,
    pub thumbnail: String,
    pub is_deleted: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct<'a> {
    pub title: &'a str,
    pub brand_id: i32,
    pub category_id: i32,
    pub description: &'a str,
    pub price: f64,
    pub discount_percentage: f64,
    pub stock_quantity: i32,
    pub thumbnail: &'a str,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::products)]
pub struct UpdateProduct<'a> {
    pub title: Option<&'a str>,
    pub brand_id: Option<i32>,
    pub category_id: Option<i32>,
    pub description: Option<&'a str>,
    pub price: Option<f64>,
    pub discount_percentage: Option<f64>,
    pub stock_quantity: Option<i32>,
    pub updated_at: NaiveDateTime,
}

/// Diesel model representing the `product_images` table.
#[derive(Debug, Clone, Identifiable, Queryable, Associations)]
#[diesel(table_name = crate::schema::product_images)]
#[diesel(belongs_to(Product))]
pub struct ProductImage {
    pub id: i32,
    pub product_id: i32,
    pub url: String,
    pub position: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::product_images)]
pub struct NewProductImage<'a> {
    pub product_id: i32,
    pub url: &'a str,
    pub position: i32,
}

impl From<Product> for DomainProduct {
    fn from(value: Product) -> Self {
        Self {
            id: value.id,
            title: value.title,
            brand_id: value.brand_id,
            category_id: value.category_id,
            description: value.description,
            price: value.price,
            discount_percentage: value.discount_percentage,
            stock_quantity: value.stock_quantity,
            thumbnail: value.thumbnail,
            images: Vec::new(),
            is_deleted: value.is_deleted,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewProduct> for NewProduct<'a> {
    fn from(value: &'a DomainNewProduct) -> Self {
        Self {
            title: value.title.as_str(),
            brand_id: value.brand_id,
            category_id: value.category_id,
            description: value.description.as_str(),
            price: value.price,
            discount_percentage: value.discount_percentage,
            stock_quantity: value.stock_quantity,
            // Filled in once the uploaded files are persisted.
            thumbnail: "",
        }
    }
}

impl<'a> From<&'a DomainUpdateProduct> for UpdateProduct<'a> {
    fn from(value: &'a DomainUpdateProduct) -> Self {
        Self {
            title: value.title.as_deref(),
            brand_id: value.brand_id,
            category_id: value.category_id,
            description: value.description.as_deref(),
            price: value.price,
            discount_percentage: value.discount_percentage,
            stock_quantity: value.stock_quantity,
            updated_at: value.updated_at,
        }
    }
}
