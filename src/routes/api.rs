use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, Responder, delete, get, patch, post, web};

use crate::forms::products::{AddProductForm, EditProductForm};
use crate::repository::DieselRepository;
use crate::services::products::ProductsQuery;
use crate::services::{ServiceError, catalog, products};
use crate::uploads::ImageStore;

/// Error conditions are binary for API clients: form problems answer 400
/// with a single message, missing resources 404, everything else 500.
fn error_response(action: &str, err: ServiceError) -> HttpResponse {
    match err {
        ServiceError::NotFound => HttpResponse::NotFound().finish(),
        ServiceError::Form(message) => {
            HttpResponse::BadRequest().json(serde_json::json!({ "message": message }))
        }
        err => {
            log::error!("Failed to {action}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/api/v1/products")]
/// Create a product from a multipart submission and return it as JSON.
pub async fn api_create_product(
    repo: web::Data<DieselRepository>,
    store: web::Data<ImageStore>,
    MultipartForm(form): MultipartForm<AddProductForm>,
) -> impl Responder {
    match products::create_product(repo.get_ref(), store.get_ref(), form) {
        Ok(product) => HttpResponse::Created().json(product),
        Err(err) => error_response("create product", err),
    }
}

#[get("/api/v1/products")]
/// Return a JSON page of products with optional search and pagination.
pub async fn api_list_products(
    params: web::Query<ProductsQuery>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match products::load_products_page(repo.get_ref(), params.0) {
        Ok(data) => HttpResponse::Ok().json(data.products),
        Err(err) => error_response("list products", err),
    }
}

#[get("/api/v1/products/{product_id}")]
pub async fn api_get_product(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match products::get_product(repo.get_ref(), path.into_inner()) {
        Ok(product) => HttpResponse::Ok().json(product),
        Err(err) => error_response("fetch product", err),
    }
}

#[patch("/api/v1/products/{product_id}")]
/// Apply a partial update and return the updated product.
pub async fn api_update_product(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    form: web::Json<EditProductForm>,
) -> impl Responder {
    match products::modify_product(repo.get_ref(), path.into_inner(), form.into_inner()) {
        Ok(product) => HttpResponse::Ok().json(product),
        Err(err) => error_response("update product", err),
    }
}

#[patch("/api/v1/products/undelete/{product_id}")]
/// Clear the soft-deletion flag and return the restored product.
pub async fn api_undelete_product(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match products::restore_product(repo.get_ref(), path.into_inner()) {
        Ok(product) => HttpResponse::Ok().json(product),
        Err(err) => error_response("restore product", err),
    }
}

#[delete("/api/v1/products/{product_id}")]
/// Soft-delete a product and return it with the flag set.
pub async fn api_delete_product(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match products::remove_product(repo.get_ref(), path.into_inner()) {
        Ok(product) => HttpResponse::Ok().json(product),
        Err(err) => error_response("delete product", err),
    }
}

#[get("/api/v1/brands")]
pub async fn api_list_brands(repo: web::Data<DieselRepository>) -> impl Responder {
    match catalog::load_brands(repo.get_ref()) {
        Ok(brands) => HttpResponse::Ok().json(brands),
        Err(err) => error_response("list brands", err),
    }
}

#[get("/api/v1/categories")]
pub async fn api_list_categories(repo: web::Data<DieselRepository>) -> impl Responder {
    match catalog::load_categories(repo.get_ref()) {
        Ok(categories) => HttpResponse::Ok().json(categories),
        Err(err) => error_response("list categories", err),
    }
}
