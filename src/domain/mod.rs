//! Domain entities and value objects, independent of persistence and HTTP.

pub mod category;
pub mod item;
pub mod types;
