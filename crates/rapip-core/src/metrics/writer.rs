use super::types::MetricsRecord;
use crate::Result;

pub struct MetricsWriter;

impl MetricsWriter {
    /// Convert a metrics record to a pretty printed JSON string
    pub fn to_string(record: &MetricsRecord) -> Result<String> {
        tracing::debug!("Converting {} metrics record to string", record.name);

        let json = serde_json::to_string_pretty(record)?;

        Ok(json)
    }

    /// Convert a metrics record to a compact JSON string
    pub fn to_string_compact(record: &MetricsRecord) -> Result<String> {
        tracing::debug!(
            "Converting {} metrics record to compact string",
            record.name
        );

        let json = serde_json::to_string(record)?;

        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{Reading, TransportKind};

    fn record() -> MetricsRecord {
        MetricsRecord {
            name: TransportKind::Xhr,
            request: Reading {
                raw: 12,
                message: "12ms".to_string(),
            },
            parse: Reading {
                raw: 1,
                message: "1ms".to_string(),
            },
            proxy: None,
            response_size: None,
            path: "/p".to_string(),
        }
    }

    #[test]
    fn test_record_to_compact_string() {
        let json = MetricsWriter::to_string_compact(&record()).unwrap();
        assert_eq!(
            json,
            r#"{"name":"XHR","request":{"raw":12,"message":"12ms"},"parse":{"raw":1,"message":"1ms"},"path":"/p"}"#
        );
    }

    #[test]
    fn test_record_to_string() {
        let json = MetricsWriter::to_string(&record()).unwrap();
        assert!(json.contains("\"name\": \"XHR\""));
        assert!(!json.contains("proxy"));
    }
}
