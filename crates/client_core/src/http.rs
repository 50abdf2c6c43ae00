use std::{error::Error as StdError, time::Duration};

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use hyper::ext::ReasonPhrase;
use reqwest::Client;
use shared::{domain::OrderUid, error::TransportError, protocol::FetchResponse};
use tracing::debug;
use url::Url;

use crate::OrderSource;

/// Fetches orders with `GET {base_url}/order/{uid}`.
pub struct HttpOrderSource {
    http: Client,
    base_url: Url,
}

impl HttpOrderSource {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, None)
    }

    pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("invalid order service url '{base_url}'"))?;
        if base_url.cannot_be_a_base() {
            bail!("order service url '{base_url}' cannot carry a request path");
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("failed to build http client")?;

        Ok(Self { http, base_url })
    }

    /// The uid is escaped as a single path segment and otherwise sent as is.
    pub fn order_url(&self, uid: &OrderUid) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("order").push(uid.as_str());
        }
        url
    }
}

#[async_trait]
impl OrderSource for HttpOrderSource {
    async fn fetch_order(&self, uid: &OrderUid) -> Result<FetchResponse, TransportError> {
        let url = self.order_url(uid);
        debug!(%url, "requesting order");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| TransportError::new(describe_error(&e)))?;

        let status = response.status();
        let reason = reason_phrase(&response);
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::new(describe_error(&e)))?;

        Ok(FetchResponse::new(status.as_u16(), reason, body.to_vec()))
    }
}

/// The phrase from the status line when the server sent a non-standard one,
/// otherwise the standard phrase for the code.
fn reason_phrase(response: &reqwest::Response) -> String {
    if let Some(phrase) = response.extensions().get::<ReasonPhrase>() {
        return String::from_utf8_lossy(phrase.as_bytes()).into_owned();
    }
    response
        .status()
        .canonical_reason()
        .unwrap_or_default()
        .to_string()
}

/// The error message followed by its causes, joined by `": "`.
pub(crate) fn describe_error(err: &(dyn StdError + 'static)) -> String {
    let mut description = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        description.push_str(": ");
        description.push_str(&cause.to_string());
        source = cause.source();
    }
    description
}
