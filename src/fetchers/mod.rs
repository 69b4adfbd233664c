use async_trait::async_trait;
use std::error::Error;

mod request;

pub use request::RequestFetcher;

/// Raw HTTP response as the extraction pipeline sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl FetchedPage {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// GET a page and hand back its status and body text.
///
/// An `Err` means no response arrived at all (DNS, TLS, timeout, ...);
/// error statuses are returned as a normal `FetchedPage`.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, Box<dyn Error + Send + Sync>>;
}
