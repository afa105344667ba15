//! Shared HTTP client: no certificate checks, no redirects, pooled connections

use crate::core::context::Context;
use crate::http::error::FetchError;
use crate::http::response::FetchOutcome;
use reqwest::{header, redirect::Policy, Client};
use url::Url;

/// Cheap to clone; every clone shares one connection pool.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(ctx: &Context) -> Result<Self, FetchError> {
        let client = Client::builder()
            .danger_accept_invalid_certs(true)
            .redirect(Policy::none())
            .user_agent(ctx.user_agent.as_str())
            .connect_timeout(ctx.connect_timeout)
            .tcp_keepalive(ctx.keepalive)
            .build()
            .map_err(|source| FetchError::ClientBuild { source })?;

        Ok(Self { client })
    }

    /// Issue a single GET. Retrying is left to the caller.
    pub async fn fetch(&self, url: &Url) -> Result<FetchOutcome, FetchError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());

        // read the whole body even when it is skipped so the connection returns to the pool.
        // the declared charset is ignored: reflections are matched against the raw bytes
        let bytes = response.bytes().await?;
        let body = String::from_utf8_lossy(&bytes).into_owned();

        tracing::debug!("GET {} -> {} ({} bytes)", url, status, body.len());

        Ok(FetchOutcome::classify(status, content_type.as_deref(), body))
    }
}
