use super::types::{MetricsRecord, ProxyReadings, Reading, RequestTiming, TransportKind};
use crate::timer::Millis;

pub struct MetricsFormatter;

impl MetricsFormatter {
    /// Merge transport timing, parse timing and optional proxy correction
    /// into one record.
    ///
    /// The proxy block is emitted whenever correction data is present, a
    /// zero overhead included.
    pub fn format(
        name: TransportKind,
        timing: &RequestTiming,
        parse: Millis,
        path: &str,
    ) -> MetricsRecord {
        let proxy = timing.proxy.map(|corrected| ProxyReadings {
            request_time: Reading::millis(corrected.request_time),
            proxy_overhead: Reading::millis(corrected.proxy_overhead),
            request_time_with_correction: Reading::millis(corrected.corrected_time),
        });

        MetricsRecord {
            name,
            request: Reading::millis(timing.request),
            parse: Reading::millis(parse),
            proxy,
            response_size: timing.response_size.map(Reading::kilobytes),
            path: path.to_string(),
        }
    }
}
