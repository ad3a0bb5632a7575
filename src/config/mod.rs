// src/config/mod.rs
pub mod scraper;

pub use scraper::{load_config_default, load_config_from, ScraperConfig};
