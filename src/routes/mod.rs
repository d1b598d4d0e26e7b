use actix_web::http::header;
use actix_web::{HttpResponse, Responder, get};
use actix_web_flash_messages::{IncomingFlashMessages, Level};
use tera::Tera;

pub mod api;
pub mod products;

/// See-other redirect to `location`.
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Template context pre-filled with flash messages and the active page
/// marker used by the navigation bar.
pub fn base_context(flash_messages: &IncomingFlashMessages, current_page: &str) -> tera::Context {
    let alerts: Vec<(String, String)> = flash_messages
        .iter()
        .map(|message| {
            (
                level_class(message.level()).to_string(),
                message.content().to_string(),
            )
        })
        .collect();

    let mut context = tera::Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_page", current_page);
    context
}

fn level_class(level: Level) -> &'static str {
    match level {
        Level::Success => "success",
        Level::Warning => "warning",
        Level::Error => "error",
        _ => "info",
    }
}

/// Render `template` with `context`, or log the failure and answer 500.
pub fn render_template(tera: &Tera, template: &str, context: &tera::Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(err) => {
            log::error!("Failed to render template {template}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/")]
pub async fn show_index() -> impl Responder {
    redirect("/products")
}
