pub mod app_state;
pub mod clubs;
pub mod competitions;
pub mod config;
pub mod extractor;
pub mod fetcher;
pub mod health;
pub mod managers;
pub mod players;
pub mod routes;
pub mod scrape;
