use crate::Result;
use crate::adapter::{RequestOutcome, ResponseBody, TransportAdapter, timing_from_headers};
use crate::headers::{ProxyHeaders, RequestHeaders};
use async_trait::async_trait;
use rapip_core::{Timer, TransportKind};
use std::sync::Arc;

pub const FETCH_REQUEST_PHASE: &str = "fetch-request";

/// Measures a request up to the moment its response headers arrive.
///
/// The body is left unread so that decoding can be timed separately.
#[derive(Debug, Clone, Default)]
pub struct FetchAdapter {
    client: reqwest::Client,
    proxy: ProxyHeaders,
}

impl FetchAdapter {
    pub fn new(proxy: ProxyHeaders) -> Self {
        Self::with_client(reqwest::Client::new(), proxy)
    }

    pub fn with_client(client: reqwest::Client, proxy: ProxyHeaders) -> Self {
        Self { client, proxy }
    }
}

#[async_trait]
impl TransportAdapter for FetchAdapter {
    fn kind(&self) -> TransportKind {
        TransportKind::Fetch
    }

    async fn request(
        &self,
        timer: Arc<Timer>,
        url: &str,
        headers: &RequestHeaders,
    ) -> Result<RequestOutcome> {
        let header_map = headers.to_header_map()?;
        let request = self.client.get(url).headers(header_map);

        tracing::debug!("Fetching {}", url);

        let pair = timer.pair(FETCH_REQUEST_PHASE);
        timer.start(&pair);
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                timer.discard(&pair);
                tracing::warn!("Fetch request to {} failed: {}", url, e);
                return Err(e.into());
            }
        };
        let elapsed = timer.finish(&pair)?;

        let status = response.status();
        tracing::debug!("Fetch response {} from {} after {}", status, url, elapsed);

        let timing = timing_from_headers(&self.proxy, elapsed, response.headers())?;

        Ok(RequestOutcome {
            response: ResponseBody::Pending(response),
            timing,
            status,
        })
    }
}
