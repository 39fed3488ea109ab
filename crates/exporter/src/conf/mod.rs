//! Conf module: configuration model, loading, validation and rule compilation.

pub mod model;
pub mod load;
pub mod error;

pub use error::ConfigError;
pub use model::{ExporterConfig, GlobalConfig, HostRuleConfig, SourceConfig, UserAgentRuleConfig, RequestUriRuleConfig};
