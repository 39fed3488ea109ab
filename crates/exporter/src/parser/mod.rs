/// Access-log line tokenization
///
/// Turns one raw access-log line into a [`FieldMap`] according to a textual
/// log format such as `$remote_addr [$time_local] "$request" $status`.
///
/// # Architecture
///
/// - `traits.rs`: the `LineTokenizer` seam used by pipeline workers
/// - `model.rs`: `FieldMap`, `Delimiter`, `ParseError`
/// - `formats/`: pipe- and space-delimited tokenizers
///
/// Tokenizers are stateless and shared by every worker.

pub mod traits;
pub mod formats;
pub mod model;

// Re-export commonly used types
pub use traits::LineTokenizer;
pub use model::{Delimiter, FieldMap, ParseError};
pub use formats::tokenizer_for;

/// Combined-style format for origin hosts without a configured source, space delimited.
pub const SPACED_LOG_FORMAT: &str = r#"$remote_addr - $remote_user [$time_local] "$request" $request_time $status $body_bytes_sent "$http_referer" "$http_user_agent" "$http_x_forwarded_for" $connection_requests"#;

/// The same fields as [`SPACED_LOG_FORMAT`], pipe delimited.
pub const PIPED_LOG_FORMAT: &str = r#"$remote_addr | - | $remote_user | [$time_local] | "$request" | $request_time | $status | $body_bytes_sent | "$http_referer" | "$http_user_agent" | "$http_x_forwarded_for" | $connection_requests"#;

// Format variables the classification engine reads
pub const REMOTE_ADDR_VAR: &str = "$remote_addr";
pub const STATUS_VAR: &str = "$status";
pub const HTTP_USER_AGENT_VAR: &str = "$http_user_agent";
pub const REQUEST_TIME_VAR: &str = "$request_time";
pub const REQUEST_VAR: &str = "$request";
pub const HOST_VAR: &str = "$host";
