use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use reqwest::Client;

use crate::app::Result;
use crate::fetcher::Fetcher;

pub struct HttpFetcher {
    client: Client,
    cookie: Option<String>,
    basic_auth: Option<(String, String)>,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::with_auth(None, None)
    }

    /// Build a fetcher carrying the session material the feed requires: an
    /// optional `Cookie` header value and optional HTTP basic credentials.
    pub fn with_auth(cookie: Option<String>, basic_auth: Option<(String, String)>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .user_agent("mailvane/0.1.0")
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            cookie,
            basic_auth,
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let mut headers = HeaderMap::new();

        if let Some(cookie) = &self.cookie {
            if let Ok(value) = HeaderValue::from_str(cookie) {
                headers.insert(COOKIE, value);
            }
        }

        let mut request = self.client.get(url).headers(headers);

        if let Some((user, password)) = &self.basic_auth {
            request = request.basic_auth(user, Some(password));
        }

        let response = request.send().await?;
        response.error_for_status_ref()?;

        Ok(response.text().await?)
    }
}
