//! Serializable view models handed to the templates.

pub mod categories;
pub mod items;
