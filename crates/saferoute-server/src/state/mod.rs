//! Application state and catalog lifecycle.

pub mod catalog;
pub mod store;

pub use catalog::CatalogSnapshot;
pub use store::{AppState, Providers};
