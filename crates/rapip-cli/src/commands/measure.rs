use crate::OutputFormat;
use anyhow::{Context, Result, anyhow};
use rapip_core::metrics::MetricsWriter;
use rapip_core::{MetricsRecord, Timer, TransportKind};
use rapip_transport::{
    FetchAdapter, ProxyHeaders, RequestHeaders, TransportAdapter, XhrAdapter, performance_test,
};
use std::sync::Arc;
use std::time::Duration;

/// Settings shared by every measured request
#[derive(Debug, Clone)]
pub struct MeasureOptions {
    /// Request headers as `Name: value` lines
    pub headers: Vec<String>,
    pub presence_header: String,
    pub overhead_header: String,
    /// Deadline for each transaction, none by default
    pub timeout: Option<Duration>,
}

impl Default for MeasureOptions {
    fn default() -> Self {
        Self {
            headers: Vec::new(),
            presence_header: rapip_transport::headers::DEFAULT_PRESENCE_HEADER.to_string(),
            overhead_header: rapip_transport::headers::DEFAULT_OVERHEAD_HEADER.to_string(),
            timeout: None,
        }
    }
}

fn adapter_for(kind: TransportKind, proxy: ProxyHeaders) -> Box<dyn TransportAdapter> {
    match kind {
        TransportKind::Fetch => Box::new(FetchAdapter::new(proxy)),
        TransportKind::Xhr => Box::new(XhrAdapter::new(proxy)),
    }
}

/// Measure `url` once per transport, in order, returning one record each
pub async fn measure(
    transports: &[TransportKind],
    url: &str,
    options: &MeasureOptions,
) -> Result<Vec<MetricsRecord>> {
    let proxy = ProxyHeaders::new(&options.presence_header, &options.overhead_header)
        .context("Invalid proxy header name")?;
    let headers =
        RequestHeaders::from_lines(&options.headers).context("Invalid request header")?;

    let timer = Arc::new(Timer::new());
    let mut records = Vec::with_capacity(transports.len());

    for &kind in transports {
        let adapter = adapter_for(kind, proxy.clone());
        let test = performance_test(&*adapter, timer.clone(), url, &headers);

        let record = match options.timeout {
            Some(limit) => tokio::time::timeout(limit, test)
                .await
                .map_err(|_| anyhow!("{} request to {} timed out after {:?}", kind, url, limit))?,
            None => test.await,
        }
        .with_context(|| format!("{} request to {} produced no metrics", kind, url))?;

        records.push(record);
    }

    let unmeasured = timer.pending_marks();
    if unmeasured > 0 {
        tracing::warn!("{} timer mark(s) left without a measurement", unmeasured);
    }

    Ok(records)
}

pub fn execute(
    transports: &[TransportKind],
    url: &str,
    options: &MeasureOptions,
    format: OutputFormat,
) -> Result<()> {
    tracing::info!(
        "Measuring {} with {} transport(s), {} output",
        url,
        transports.len(),
        format.as_str()
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let records = runtime.block_on(measure(transports, url, options))?;

    match format {
        OutputFormat::Json => output_json(&records)?,
        OutputFormat::Table => output_table(&records),
        OutputFormat::Pretty => output_pretty(&records),
    }

    Ok(())
}

fn output_pretty(records: &[MetricsRecord]) {
    use console::style;

    for record in records {
        println!(
            "\n{} {}",
            style(format!("{} request", record.name)).bold().cyan(),
            style(&record.path).dim()
        );
        println!("  Request:            {}", record.request.message);
        println!("  Parse:              {}", record.parse.message);

        if let Some(size) = &record.response_size {
            println!("  Response Size:      {}", size.message);
        }

        if let Some(proxy) = &record.proxy {
            println!("\n  {}", style("Proxy:").bold());
            println!("    Request Time:     {}", proxy.request_time.message);
            println!("    Proxy Overhead:   {}", proxy.proxy_overhead.message);
            println!(
                "    Corrected Time:   {}",
                style(&proxy.request_time_with_correction.message).green()
            );
        }
    }

    println!(); // trailing newline
}

fn output_json(records: &[MetricsRecord]) -> Result<()> {
    let json = match records {
        [record] => MetricsWriter::to_string(record)?,
        _ => serde_json::to_string_pretty(records)?,
    };
    println!("{}", json);
    Ok(())
}

fn output_table(records: &[MetricsRecord]) {
    println!("Transport,Path,Request (ms),Parse (ms),Proxy Overhead (ms),Corrected (ms)");
    for record in records {
        let (overhead, corrected) = match &record.proxy {
            Some(proxy) => (
                proxy.proxy_overhead.raw.to_string(),
                proxy.request_time_with_correction.raw.to_string(),
            ),
            None => (String::new(), String::new()),
        };
        println!(
            "{},{},{},{},{},{}",
            record.name,
            record.path,
            record.request.raw,
            record.parse.raw,
            overhead,
            corrected
        );
    }
}
