use std::io;

use actix_files::Files;
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware, web};
use actix_web_flash_messages::FlashMessagesFramework;
use actix_web_flash_messages::storage::CookieMessageStore;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use dotenvy::dotenv;
use tera::Tera;

use rental_catalog::db::establish_connection_pool;
use rental_catalog::models::config::ServerConfig;
use rental_catalog::repository::DieselRepository;
use rental_catalog::routes;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let server_config = ServerConfig::load().map_err(|e| {
        log::error!("Failed to load configuration: {e}");
        io::Error::other(e)
    })?;

    let pool = establish_connection_pool(&server_config.database_url).map_err(|e| {
        log::error!("Failed to establish database connection pool: {e}");
        io::Error::other(e)
    })?;

    {
        let mut conn = pool.get().map_err(io::Error::other)?;
        let applied = conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            log::error!("Failed to run migrations: {e}");
            io::Error::other(e.to_string())
        })?;
        log::info!("Applied {} pending migration(s)", applied.len());
    }

    let tera = Tera::new(&server_config.templates_dir).map_err(|e| {
        log::error!("Failed to load templates from {}: {e}", server_config.templates_dir);
        io::Error::other(e)
    })?;

    let secret_key = Key::try_from(server_config.secret_key.as_bytes()).map_err(|e| {
        log::error!("secret_key must be at least 64 bytes long");
        io::Error::other(e)
    })?;
    let message_store = CookieMessageStore::builder(secret_key).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let repo = DieselRepository::new(pool);
    let bind_address = (server_config.address.clone(), server_config.port);
    log::info!(
        "Starting rental catalog on {}:{}",
        bind_address.0,
        bind_address.1
    );

    HttpServer::new(move || {
        App::new()
            .wrap(message_framework.clone())
            .wrap(middleware::Logger::default())
            .service(Files::new("/assets", server_config.assets_dir.clone()))
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(server_config.clone()))
            .configure(routes::configure)
            .default_service(web::to(routes::not_found))
    })
    .bind(bind_address)?
    .run()
    .await
}
