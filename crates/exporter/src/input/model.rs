/// One access-log record as delivered by a line source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    /// Server that emitted the record (syslog hostname)
    pub origin_host: String,
    /// Raw access-log line
    pub content: String,
}

impl LogLine {
    pub fn new(origin_host: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            origin_host: origin_host.into(),
            content: content.into(),
        }
    }
}
