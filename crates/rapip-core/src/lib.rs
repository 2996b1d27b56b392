pub mod correction;
pub mod error;
pub mod metrics;
pub mod parser;
pub mod timer;

pub use correction::{CorrectedTiming, correct, parse_overhead};
pub use error::{Error, Result};
pub use metrics::{MetricsFormatter, MetricsRecord, RequestTiming, TransportKind};
pub use timer::{MarkPair, Millis, Timer};
