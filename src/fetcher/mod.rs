pub mod client;
pub mod errors;
pub mod pipeline;
pub mod source;
pub mod types;

pub use client::build_client;
pub use errors::FetchError;
pub use source::{HttpFetcher, PageFetcher};
pub use types::{Charset, PageResponse};

#[cfg(test)]
pub use source::MockPageFetcher;
