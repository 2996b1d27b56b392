use super::types::MetricsRecord;
use crate::Result;

pub struct MetricsReader;

impl MetricsReader {
    /// Parse a metrics record from a JSON string
    pub fn from_str(content: &str) -> Result<MetricsRecord> {
        tracing::debug!("Parsing metrics record from string");

        let record: MetricsRecord = serde_json::from_str(content)?;

        Ok(record)
    }
}
