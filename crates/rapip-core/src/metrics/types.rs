use crate::correction::CorrectedTiming;
use crate::timer::Millis;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Transport that produced a measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransportKind {
    #[serde(rename = "Fetch")]
    Fetch,
    #[serde(rename = "XHR")]
    Xhr,
}

impl TransportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportKind::Fetch => "Fetch",
            TransportKind::Xhr => "XHR",
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Timing data a transport call hands to the formatter
#[derive(Debug, Clone, PartialEq)]
pub struct RequestTiming {
    pub request: Millis,
    pub proxy: Option<CorrectedTiming>,
    /// Response size in bytes, when the transport exposed a Content-Length
    pub response_size: Option<u64>,
}

impl RequestTiming {
    pub fn new(request: Millis) -> Self {
        Self {
            request,
            proxy: None,
            response_size: None,
        }
    }
}

/// A single value with its human readable form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reading {
    pub raw: u64,
    pub message: String,
}

impl Reading {
    pub fn millis(value: Millis) -> Self {
        let raw = value.rounded();
        Self {
            raw,
            message: format!("{}ms", raw),
        }
    }

    pub fn kilobytes(bytes: u64) -> Self {
        let raw = (bytes as f64 / 1024.0).round() as u64;
        Self {
            raw,
            message: format!("{}kb", raw),
        }
    }
}

/// Proxy correction block of a metrics record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyReadings {
    pub request_time: Reading,
    pub proxy_overhead: Reading,
    pub request_time_with_correction: Reading,
}

/// Normalized result of one measured request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsRecord {
    pub name: TransportKind,
    pub request: Reading,
    pub parse: Reading,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<ProxyReadings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_size: Option<Reading>,
    pub path: String,
}
