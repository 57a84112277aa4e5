pub mod http_fetcher;

use async_trait::async_trait;

use crate::app::Result;

/// Opaque transport primitive: fetch the unread-feed document behind `url`.
///
/// Whatever session or authentication scheme the host environment needs is
/// the implementation's concern; callers only see the document text or a
/// fetch error.
#[async_trait]
pub trait Fetcher {
    async fn fetch(&self, url: &str) -> Result<String>;
}
