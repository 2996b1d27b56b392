use crate::adapter::{RequestOutcome, ResponseBody, TransportAdapter, timing_from_headers};
use crate::headers::{ProxyHeaders, RequestHeaders};
use crate::{Error, Result};
use async_trait::async_trait;
use rapip_core::{MarkPair, Timer, TransportKind};
use std::sync::Arc;
use tokio::sync::oneshot;

pub const XHR_REQUEST_PHASE: &str = "xhr-request";

/// Completion-callback transport.
///
/// The request runs on its own task and the whole body is read before the
/// end mark, the way a load event only fires once the response is complete.
#[derive(Debug, Clone, Default)]
pub struct XhrAdapter {
    client: reqwest::Client,
    proxy: ProxyHeaders,
}

impl XhrAdapter {
    pub fn new(proxy: ProxyHeaders) -> Self {
        Self::with_client(reqwest::Client::new(), proxy)
    }

    pub fn with_client(client: reqwest::Client, proxy: ProxyHeaders) -> Self {
        Self { client, proxy }
    }

    /// Issue a GET and report back through `on_complete`.
    ///
    /// The start mark is taken before this returns. `on_complete` runs
    /// exactly once, on the spawned task, with either the outcome or the
    /// reason the request failed, invalid headers included. Must be called
    /// within a tokio runtime.
    pub fn send<F>(&self, timer: Arc<Timer>, url: &str, headers: &RequestHeaders, on_complete: F)
    where
        F: FnOnce(Result<RequestOutcome>) + Send + 'static,
    {
        let pair = timer.pair(XHR_REQUEST_PHASE);

        tracing::debug!("Sending XHR-style request to {}", url);
        timer.start(&pair);

        let client = self.client.clone();
        let proxy = self.proxy.clone();
        let headers = headers.clone();
        let url = url.to_string();
        tokio::spawn(async move {
            let result = complete(&client, &url, &headers, &timer, &pair, &proxy).await;
            if let Err(e) = &result {
                timer.discard(&pair);
                tracing::warn!("XHR-style request to {} failed: {}", url, e);
            }
            on_complete(result);
        });
    }
}

async fn complete(
    client: &reqwest::Client,
    url: &str,
    headers: &RequestHeaders,
    timer: &Timer,
    pair: &MarkPair,
    proxy: &ProxyHeaders,
) -> Result<RequestOutcome> {
    let request = client.get(url).headers(headers.to_header_map()?);
    let response = request.send().await?;
    let status = response.status();
    let headers = response.headers().clone();
    let text = response.text().await?;
    let elapsed = timer.finish(pair)?;

    tracing::debug!(
        "XHR-style response {} ({} bytes) after {}",
        status,
        text.len(),
        elapsed
    );

    let timing = timing_from_headers(proxy, elapsed, &headers)?;

    Ok(RequestOutcome {
        response: ResponseBody::Text(text),
        timing,
        status,
    })
}

#[async_trait]
impl TransportAdapter for XhrAdapter {
    fn kind(&self) -> TransportKind {
        TransportKind::Xhr
    }

    async fn request(
        &self,
        timer: Arc<Timer>,
        url: &str,
        headers: &RequestHeaders,
    ) -> Result<RequestOutcome> {
        let (tx, rx) = oneshot::channel();
        self.send(timer, url, headers, move |result| {
            let _ = tx.send(result);
        });

        rx.await.map_err(|_| Error::CallbackDropped)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rapip_core::Millis;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_xhr_reads_full_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/data")
            .match_header("x-client", "rapip")
            .match_header("accept", "application/json")
            .with_header("X-RAPIP-PROXY", "yes")
            .with_header("x-rapip-proxy-overhead", "2")
            .with_body(r#"{"ok": true}"#)
            .create_async()
            .await;

        let headers: RequestHeaders = [("X-Client", "rapip"), ("Accept", "application/json")]
            .into_iter()
            .collect();
        let timer = Arc::new(Timer::new());
        let outcome = XhrAdapter::default()
            .request(timer.clone(), &format!("{}/data", server.url()), &headers)
            .await
            .unwrap();

        mock.assert_async().await;
        match outcome.response {
            ResponseBody::Text(text) => assert_eq!(text, r#"{"ok": true}"#),
            other => panic!("expected text body, got {:?}", other),
        }
        assert_eq!(
            outcome.timing.proxy.unwrap().proxy_overhead,
            Millis::new(2.0)
        );
        assert_eq!(
            timer.duration("xhr-request-audit#0").unwrap(),
            outcome.timing.request
        );
    }

    #[tokio::test]
    async fn test_send_completes_exactly_once() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/once")
            .with_body("[]")
            .create_async()
            .await;

        let calls = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = oneshot::channel();
        let counter = calls.clone();
        XhrAdapter::default().send(
            Arc::new(Timer::new()),
            &format!("{}/once", server.url()),
            &RequestHeaders::new(),
            move |result| {
                counter.fetch_add(1, Ordering::SeqCst);
                let _ = tx.send(result.is_ok());
            },
        );

        assert!(rx.await.unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_send_reports_invalid_header_after_start_mark() {
        let (tx, rx) = oneshot::channel();
        let fired = Arc::new(AtomicUsize::new(0));
        let headers: RequestHeaders = [("bad header", "x")].into_iter().collect();
        let timer = Arc::new(Timer::new());

        let counter = fired.clone();
        XhrAdapter::default().send(
            timer.clone(),
            "http://127.0.0.1:1/",
            &headers,
            move |result| {
                counter.fetch_add(1, Ordering::SeqCst);
                let _ = tx.send(result);
            },
        );

        // completion is only delivered from the spawned task
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert_eq!(timer.pending_marks(), 1);

        assert!(matches!(rx.await.unwrap(), Err(Error::InvalidHeader(_))));
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(timer.pending_marks(), 0);
    }

    #[tokio::test]
    async fn test_failed_requests_leave_no_marks() {
        let timer = Arc::new(Timer::new());
        let adapter = XhrAdapter::default();

        for _ in 0..5 {
            let result = adapter
                .request(
                    timer.clone(),
                    "http://127.0.0.1:1/unreachable",
                    &RequestHeaders::new(),
                )
                .await;
            assert!(result.is_err());
        }

        assert_eq!(timer.pending_marks(), 0);
    }

    #[tokio::test]
    async fn test_xhr_transport_failure() {
        let result = XhrAdapter::default()
            .request(
                Arc::new(Timer::new()),
                "http://127.0.0.1:1/unreachable",
                &RequestHeaders::new(),
            )
            .await;

        assert!(matches!(result, Err(Error::Transport(_))));
    }
}
