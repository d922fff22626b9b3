pub mod catalog;
pub mod config;
pub mod db;
pub mod export;
pub mod logging;
pub mod thumbs;

pub use catalog::{Catalog, CatalogError, NewImage};
pub use config::Config;
pub use db::{Database, ImageRecord};
pub use thumbs::ThumbnailGenerator;
