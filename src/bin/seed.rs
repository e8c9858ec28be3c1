//! Populate the catalog with sample rental categories and items.
//!
//! Usage: `seed [DATABASE_URL]`. Without an argument the configured
//! `database_url` is used.

use std::collections::HashSet;
use std::error::Error;

use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use dotenvy::dotenv;

use rental_catalog::db::establish_connection_pool;
use rental_catalog::forms::categories::{CategoryForm, CategoryFormPayload};
use rental_catalog::forms::items::{ItemForm, ItemFormPayload};
use rental_catalog::models::config::{ServerConfig, UnknownCategoryPolicy};
use rental_catalog::repository::{DieselRepository, ItemReader};
use rental_catalog::services::{categories, items};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

const CATEGORIES: &[&str] = &["Winter", "Summer"];

/// (name, description, category, price, stock number)
const ITEMS: &[(&str, &str, &str, &str, &str)] = &[
    (
        "Snowshoe",
        "Trek in the snow with snowshoes that keep you from sinking!",
        "Winter",
        "$10.00",
        "W01",
    ),
    (
        "Skis",
        "Cross country or downhill ski the powdery slopes!",
        "Winter",
        "$150.00",
        "W02",
    ),
    (
        "Kayak",
        "Paddle a mountain reservoir in a stable touring kayak.",
        "Summer",
        "$35.00",
        "S01",
    ),
    (
        "Mountain Bike",
        "Full suspension bike for the foothill trails.",
        "Summer",
        "$45.00",
        "S02",
    ),
    (
        "Standup Paddleboard",
        "Get a workout in while paddle boarding on a reservoir!",
        "Summer",
        "$30.00",
        "S03",
    ),
    (
        "Canoe",
        "Take in the mountain backdrop while going for a cruise!",
        "Summer",
        "$20.00",
        "S04",
    ),
];

fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let database_url = match std::env::args().nth(1) {
        Some(url) => url,
        None => ServerConfig::load()?.database_url,
    };

    let pool = establish_connection_pool(&database_url)?;
    pool.get()?
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| e.to_string())?;
    let repo = DieselRepository::new(pool);

    for name in CATEGORIES {
        let payload = CategoryFormPayload::try_from(CategoryForm {
            name: name.to_string(),
        })?;
        let category = categories::create_category(payload, &repo)?;
        log::info!("Category ready: {} ({})", category.name, category.id);
    }

    // Categories are reused by name; items are only added when missing.
    let existing = repo
        .list_items()?
        .into_iter()
        .map(|entry| entry.name.into_inner())
        .collect::<HashSet<_>>();

    for (name, description, category, price, stock_number) in ITEMS {
        if existing.contains(*name) {
            log::info!("Skipping existing item: {name}");
            continue;
        }
        let form = ItemForm {
            name: name.to_string(),
            description: description.to_string(),
            category: vec![category.to_string()],
            price: price.to_string(),
            stock_number: stock_number.to_string(),
        };
        let payload = ItemFormPayload::try_from(form)?;
        let item = items::create_item(payload, UnknownCategoryPolicy::Reject, &repo)?;
        log::info!("Added item: {} ({})", item.name, item.id);
    }

    Ok(())
}
