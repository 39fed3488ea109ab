pub use super::model::{Delimiter, FieldMap, ParseError};

pub trait LineTokenizer: Send + Sync {
    /// split a raw log line into format variables and their values
    fn tokenize(&self, format: &str, content: &str) -> Result<FieldMap, ParseError>;
    fn delimiter(&self) -> Delimiter;
}
