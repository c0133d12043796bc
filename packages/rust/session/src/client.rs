//! Cookie-bearing HTTP session shared by every step of a run.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::debug;
use url::Url;

use projectbook_shared::{HttpConfig, ProjectBookError, Result};

/// User-Agent string for all requests.
const USER_AGENT: &str = concat!("ProjectBook/", env!("CARGO_PKG_VERSION"));

/// A fetched HTML page.
#[derive(Debug, Clone)]
pub struct Page {
    /// Final URL after redirects.
    pub url: Url,
    pub status: StatusCode,
    pub body: String,
}

impl Page {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Return the page if its status is 2xx, otherwise the error built by `err`.
    pub fn ensure_success(self, err: impl FnOnce(String) -> ProjectBookError) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(err(format!("{}: HTTP {}", self.url, self.status)))
        }
    }
}

/// HTTP client with a cookie store, so SSO state carries across requests.
///
/// One session lives for exactly one run.
pub struct Session {
    client: Client,
}

impl Session {
    /// Build a session from the `[http]` config section.
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects));

        if config.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_secs));
        }

        let client = builder
            .build()
            .map_err(|e| ProjectBookError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// GET a page. Non-2xx statuses are returned, not raised.
    pub async fn get(&self, url: &Url) -> Result<Page> {
        debug!(%url, "GET");
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| ProjectBookError::Network(format!("{url}: {e}")))?;

        read_page(response).await
    }

    /// POST an `application/x-www-form-urlencoded` body.
    pub async fn post_form(&self, url: &Url, form: &[(&str, String)]) -> Result<Page> {
        debug!(%url, fields = form.len(), "POST form");
        let response = self
            .client
            .post(url.as_str())
            .form(form)
            .send()
            .await
            .map_err(|e| ProjectBookError::Network(format!("{url}: {e}")))?;

        read_page(response).await
    }
}

async fn read_page(response: reqwest::Response) -> Result<Page> {
    let url = response.url().clone();
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ProjectBookError::Network(format!("{url}: body read failed: {e}")))?;

    debug!(%url, %status, body_len = body.len(), "response received");
    Ok(Page { url, status, body })
}
