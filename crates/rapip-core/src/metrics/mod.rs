mod formatter;
mod reader;
mod types;
mod writer;

pub use formatter::MetricsFormatter;
pub use reader::MetricsReader;
pub use types::*;
pub use writer::MetricsWriter;
