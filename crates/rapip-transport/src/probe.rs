use crate::Result;
use crate::adapter::TransportAdapter;
use crate::body::parse_body;
use crate::headers::RequestHeaders;
use rapip_core::metrics::MetricsWriter;
use rapip_core::{MetricsFormatter, MetricsRecord, Timer};
use std::sync::Arc;

/// Run one measured transaction against `path`: request, decode the body,
/// and merge both timings into a metrics record.
///
/// A transport failure returns an error and produces no record.
pub async fn performance_test<A>(
    adapter: &A,
    timer: Arc<Timer>,
    path: &str,
    headers: &RequestHeaders,
) -> Result<MetricsRecord>
where
    A: TransportAdapter + ?Sized,
{
    tracing::debug!("Running {} performance test for {}", adapter.kind(), path);

    let outcome = adapter.request(timer.clone(), path, headers).await?;
    let parse = parse_body(&timer, outcome.response).await?;

    let record = MetricsFormatter::format(adapter.kind(), &outcome.timing, parse, path);

    tracing::info!(
        "{} {}: request={} parse={}{}",
        record.name,
        path,
        record.request.message,
        record.parse.message,
        record
            .proxy
            .as_ref()
            .map(|p| format!(" corrected={}", p.request_time_with_correction.message))
            .unwrap_or_default()
    );

    Ok(record)
}

/// Same as [`performance_test`], serialized as compact JSON
pub async fn performance_test_json<A>(
    adapter: &A,
    timer: Arc<Timer>,
    path: &str,
    headers: &RequestHeaders,
) -> Result<String>
where
    A: TransportAdapter + ?Sized,
{
    let record = performance_test(adapter, timer, path, headers).await?;
    Ok(MetricsWriter::to_string_compact(&record)?)
}
