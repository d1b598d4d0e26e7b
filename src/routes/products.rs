use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::forms::products::AddProductForm;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::products::ProductsQuery;
use crate::services::{ServiceError, catalog, products};
use crate::uploads::ImageStore;

#[get("/products")]
pub async fn show_products(
    params: web::Query<ProductsQuery>,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match products::load_products_page(repo.get_ref(), params.0) {
        Ok(data) => {
            let has_active_filters = data.include_deleted
                || data
                    .search
                    .as_ref()
                    .map(|value| !value.trim().is_empty())
                    .unwrap_or(false);

            let mut context = base_context(&flash_messages, "products");
            context.insert("products", &data.products);
            context.insert("search", &data.search);
            context.insert("include_deleted", &data.include_deleted);
            context.insert("has_active_filters", &has_active_filters);
            render_template(&tera, "products/index.html", &context)
        }
        Err(err) => {
            log::error!("Failed to list products: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/products/add")]
pub async fn show_add_product(
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let brands = match catalog::load_brands(repo.get_ref()) {
        Ok(brands) => brands,
        Err(err) => {
            log::error!("Failed to list brands: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let categories = match catalog::load_categories(repo.get_ref()) {
        Ok(categories) => categories,
        Err(err) => {
            log::error!("Failed to list categories: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let mut context = base_context(&flash_messages, "add-product");
    context.insert("brands", &brands);
    context.insert("categories", &categories);
    render_template(&tera, "products/add.html", &context)
}

#[post("/products/add")]
pub async fn add_product(
    repo: web::Data<DieselRepository>,
    store: web::Data<ImageStore>,
    MultipartForm(form): MultipartForm<AddProductForm>,
) -> impl Responder {
    match products::create_product(repo.get_ref(), store.get_ref(), form) {
        Ok(_) => {
            FlashMessage::success("New product added").send();
            redirect("/products")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/products/add")
        }
        Err(err) => {
            log::error!("Failed to create product: {err}");
            FlashMessage::error("Error adding product, please try again later").send();
            redirect("/products/add")
        }
    }
}
