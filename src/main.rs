use std::env;

use actix_files::Files;
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware, web};
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
use dotenvy::dotenv;
use tera::Tera;

use storefront::db::establish_connection_pool;
use storefront::repository::DieselRepository;
use storefront::routes::api::{
    api_create_product, api_delete_product, api_get_product, api_list_brands,
    api_list_categories, api_list_products, api_undelete_product, api_update_product,
};
use storefront::routes::products::{add_product, show_add_product, show_products};
use storefront::routes::show_index;
use storefront::uploads::{ImageStore, UPLOADS_URL_PREFIX};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok(); // Load .env file

    let database_url = env::var("DATABASE_URL").unwrap_or("app.db".to_string());
    let port = env::var("PORT").unwrap_or("8080".to_string());
    let port = port.parse::<u16>().unwrap_or(8080);
    let address = env::var("ADDRESS").unwrap_or("127.0.0.1".to_string());
    let uploads_dir = env::var("UPLOADS_DIR").unwrap_or("uploads".to_string());

    let secret_key = match env::var("SECRET_KEY") {
        Ok(key) => Key::from(key.as_bytes()),
        Err(_) => Key::generate(),
    };

    let pool = match establish_connection_pool(&database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);
    let store = ImageStore::new(uploads_dir);

    if let Err(e) = std::fs::create_dir_all(store.root()) {
        log::error!("Failed to create uploads directory: {e}");
        std::process::exit(1);
    }

    let message_store = CookieMessageStore::builder(secret_key).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = match Tera::new("templates/**/*") {
        Ok(t) => t,
        Err(e) => {
            log::error!("Parsing error(s): {e}");
            std::process::exit(1);
        }
    };

    let uploads_root = store.root().to_path_buf();

    HttpServer::new(move || {
        App::new()
            .wrap(message_framework.clone())
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(Files::new("/assets", "./assets"))
            .service(Files::new(UPLOADS_URL_PREFIX, uploads_root.clone()))
            .service(show_index)
            .service(show_products)
            .service(show_add_product)
            .service(add_product)
            .service(api_create_product)
            .service(api_list_products)
            .service(api_undelete_product)
            .service(api_get_product)
            .service(api_update_product)
            .service(api_delete_product)
            .service(api_list_brands)
            .service(api_list_categories)
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(store.clone()))
    })
    .bind((address, port))?
    .run()
    .await
}
