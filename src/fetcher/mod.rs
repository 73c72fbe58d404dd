pub mod http_fetcher;

use async_trait::async_trait;

use crate::app::Result;

/// Retrieves the raw bytes of a feed document. Every run re-fetches; there
/// is no caching or conditional request.
#[async_trait]
pub trait Fetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}
