// Measured HTTP transports

pub mod adapter;
pub mod body;
pub mod error;
pub mod fetch;
pub mod headers;
pub mod probe;
pub mod xhr;

pub use adapter::{RequestOutcome, ResponseBody, TransportAdapter};
pub use body::{parse_body, parse_response_body};
pub use error::{Error, Result};
pub use fetch::FetchAdapter;
pub use headers::{ProxyHeaders, RequestHeaders};
pub use probe::{performance_test, performance_test_json};
pub use xhr::XhrAdapter;
