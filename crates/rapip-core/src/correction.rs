use crate::timer::Millis;
use crate::{Error, Result};

/// Request duration adjusted for the latency an intermediary proxy reported
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrectedTiming {
    pub request_time: Millis,
    pub proxy_overhead: Millis,
    pub corrected_time: Millis,
}

/// Subtract the proxy overhead from the measured request duration.
///
/// Returns `None` when no overhead was reported. An overhead larger than the
/// request itself clamps the corrected time to zero.
pub fn correct(request: Millis, overhead: Option<Millis>) -> Option<CorrectedTiming> {
    let overhead = overhead?;
    let corrected = request.as_f64() - overhead.as_f64();

    if corrected < 0.0 {
        tracing::warn!(
            "Proxy overhead {:.3}ms exceeds request time {:.3}ms, clamping to 0",
            overhead.as_f64(),
            request.as_f64()
        );
    }

    Some(CorrectedTiming {
        request_time: request,
        proxy_overhead: overhead,
        corrected_time: Millis::new(corrected),
    })
}

/// Parse a proxy overhead header value in milliseconds
pub fn parse_overhead(raw: &str) -> Result<Millis> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| Error::InvalidOverhead(raw.to_string()))?;

    if !value.is_finite() || value < 0.0 {
        return Err(Error::InvalidOverhead(raw.to_string()));
    }

    Ok(Millis::new(value))
}
