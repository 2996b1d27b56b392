use crate::Result;
use crate::headers::{ProxyHeaders, RequestHeaders, content_length};
use async_trait::async_trait;
use http::{HeaderMap, StatusCode};
use rapip_core::{Millis, RequestTiming, Timer, TransportKind, correct};
use std::sync::Arc;

/// Response body as handed back by a transport
#[derive(Debug)]
pub enum ResponseBody {
    /// Headers received, body still on the wire
    Pending(reqwest::Response),
    /// Body already read in full
    Text(String),
}

/// Everything one measured transport call produces
#[derive(Debug)]
pub struct RequestOutcome {
    pub response: ResponseBody,
    pub timing: RequestTiming,
    /// Logged for diagnostics only, any status counts as a completed request
    pub status: StatusCode,
}

/// One way of issuing a measured HTTP GET
#[async_trait]
pub trait TransportAdapter: Send + Sync {
    fn kind(&self) -> TransportKind;

    /// Issue the request, bracketing it with marks on `timer`
    async fn request(
        &self,
        timer: Arc<Timer>,
        url: &str,
        headers: &RequestHeaders,
    ) -> Result<RequestOutcome>;
}

/// Apply proxy correction to a measured request using its response headers
pub(crate) fn timing_from_headers(
    proxy: &ProxyHeaders,
    request: Millis,
    headers: &HeaderMap,
) -> Result<RequestTiming> {
    let overhead = proxy.extract(headers)?;

    Ok(RequestTiming {
        request,
        proxy: correct(request, overhead),
        response_size: content_length(headers),
    })
}
