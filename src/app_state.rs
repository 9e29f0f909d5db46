use std::sync::Arc;

use crate::fetcher::PageFetcher;
use crate::scrape::{Scraper, SiteUrls};

#[derive(Clone)]
pub struct AppState {
    pub scraper: Scraper,
}

impl AppState {
    pub fn new(fetcher: Arc<dyn PageFetcher>, site: SiteUrls) -> Self {
        Self {
            scraper: Scraper::new(fetcher, site),
        }
    }
}
