//! Fetch, probe and parse, once per entity request.

pub mod errors;
pub mod site;

pub use errors::{ErrorResponse, ScrapeError, SubsectionError, recover};
pub use site::SiteUrls;

use std::sync::Arc;

use serde_json::Value;
use tracing::{info, instrument};

use crate::extractor::{Entity, Fields, Layout, Page, SelectorCatalog, catalog};
use crate::fetcher::{FetchError, PageFetcher};

/// One entity type's retrieval: where its page lives, which layout proves it
/// exists, and how a fetched page becomes a record.
pub trait EntityParser: Sync {
    type Output;

    fn entity(&self) -> Entity;

    fn id(&self) -> &str;

    fn page_url(&self, site: &SiteUrls) -> String;

    /// A JSON document fetched alongside the page.
    fn secondary_url(&self, _site: &SiteUrls) -> Option<String> {
        None
    }

    /// Layout whose marker is probed before parsing.
    fn probe_layout(&self) -> Layout {
        Layout::Default
    }

    fn parse(&self, input: ParseInput<'_>) -> Self::Output;
}

/// Everything a parser reads from. Only built once the marker matched.
pub struct ParseInput<'a> {
    pub entity: Entity,
    pub page: &'a Page,
    pub catalog: &'a SelectorCatalog,
    pub site: &'a SiteUrls,
    pub secondary: Option<Result<Value, FetchError>>,
}

impl<'a> ParseInput<'a> {
    pub fn fields(&self, layout: Layout) -> Fields<'a> {
        self.page.fields(self.catalog.layout(self.entity, layout))
    }
}

/// Drives an `EntityParser` against the configured site.
#[derive(Clone)]
pub struct Scraper {
    fetcher: Arc<dyn PageFetcher>,
    site: SiteUrls,
    catalog: &'static SelectorCatalog,
}

impl Scraper {
    pub fn new(fetcher: Arc<dyn PageFetcher>, site: SiteUrls) -> Self {
        Self {
            fetcher,
            site,
            catalog: catalog(),
        }
    }

    pub fn site(&self) -> &SiteUrls {
        &self.site
    }

    #[instrument(skip_all, fields(entity = %parser.entity(), id = parser.id()))]
    pub async fn retrieve<P: EntityParser>(&self, parser: &P) -> Result<P::Output, ScrapeError> {
        let response = self.fetcher.fetch_page(&parser.page_url(&self.site)).await?;
        let secondary = match parser.secondary_url(&self.site) {
            Some(url) => Some(self.fetcher.fetch_json(&url).await),
            None => None,
        };

        let page = Page::parse(&response.body_utf8);
        let probe = self.catalog.layout(parser.entity(), parser.probe_layout());
        if !page.fields(probe).has_marker() {
            info!("marker not found");
            return Err(ScrapeError::NotFound {
                entity: parser.entity(),
                id: parser.id().to_string(),
            });
        }

        Ok(parser.parse(ParseInput {
            entity: parser.entity(),
            page: &page,
            catalog: self.catalog,
            site: &self.site,
            secondary,
        }))
    }
}
