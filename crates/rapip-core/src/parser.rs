use crate::{Error, Result};
use crate::timer::{Millis, Timer};

/// Phase label for decoding a raw text body
pub const PARSE_STRING_PHASE: &str = "parse-string";
/// Phase label for decoding a response body read from the transport
pub const PARSE_PHASE: &str = "parse";

/// Decode a raw string as JSON and return how long the decode took.
///
/// The decoded value is discarded; only the timing is kept.
pub fn parse_text_to_structured(timer: &Timer, text: &str) -> Result<Millis> {
    let pair = timer.pair(PARSE_STRING_PHASE);

    timer.start(&pair);
    let decoded: serde_json::Result<serde_json::Value> = serde_json::from_str(text);
    if let Err(e) = decoded {
        timer.discard(&pair);
        return Err(Error::Decode(e));
    }
    let elapsed = timer.finish(&pair)?;

    tracing::debug!("Parsed {} bytes of text in {}", text.len(), elapsed);
    Ok(elapsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_text() {
        let timer = Timer::new();
        let elapsed = parse_text_to_structured(&timer, r#"{"items": [1, 2, 3]}"#).unwrap();

        assert_eq!(timer.duration("parse-string-audit#0").unwrap(), elapsed);
    }

    #[test]
    fn test_parse_text_malformed() {
        let timer = Timer::new();
        let result = parse_text_to_structured(&timer, "{not json");
        assert!(matches!(result, Err(Error::Decode(_))));
        assert_eq!(timer.pending_marks(), 0);
    }
}
