//! Model: ExporterConfig and related structs.

use serde::{Deserialize, Serialize};

use crate::parser::Delimiter;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExporterConfig {
    pub global: GlobalConfig,
    pub sources: Vec<SourceConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// UDP address the syslog listener binds to
    pub syslog_address: String,
    /// TCP address serving `/metrics`
    pub web_address: String,
    /// ua-parser `regexes.yaml`
    pub ua_regex_path: String,
    pub delimiter: Delimiter,
    pub export_workers: usize,
    pub user_agent_cache_size: usize,
    /// Inbound line queue between the listener and the dispatcher
    pub queue_capacity: usize,
    pub summary_interval_secs: u64,
    pub internal_subnets: Vec<String>,
    pub user_agents: Vec<UserAgentRuleConfig>,
    pub request_uris: Vec<RequestUriRuleConfig>,
    pub hosts: Vec<HostRuleConfig>,
}

/// Log format of one origin server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub host: String,
    pub log_format: String,
}

/// Custom user-agent override; `match_re` takes precedence over `match`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserAgentRuleConfig {
    pub match_re: String,
    #[serde(rename = "match")]
    pub exact: String,
    pub replacements: UserAgentReplacements,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserAgentReplacements {
    pub user_agent: String,
    pub os: String,
    pub device: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestUriRuleConfig {
    pub match_re: String,
    /// Empty accepts any method
    pub match_method: String,
    pub replacements: RequestUriReplacements,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestUriReplacements {
    pub request_uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostRuleConfig {
    #[serde(rename = "match")]
    pub matches: String,
    pub replacement: String,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            syslog_address: "0.0.0.0:9033".to_string(),
            web_address: "0.0.0.0:9032".to_string(),
            ua_regex_path: "etc/regexes.yaml".to_string(),
            delimiter: Delimiter::default(),
            export_workers: 100,
            user_agent_cache_size: 100_000,
            queue_capacity: 1024,
            summary_interval_secs: 60,
            internal_subnets: Vec::new(),
            user_agents: Vec::new(),
            request_uris: Vec::new(),
            hosts: Vec::new(),
        }
    }
}

impl ExporterConfig {
    /// Log format configured for `host`, or the combined-style default for
    /// the configured delimiter.
    pub fn format_for(&self, host: &str) -> &str {
        match self.sources.iter().find(|s| s.host == host) {
            Some(source) => &source.log_format,
            None => {
                tracing::debug!(host = %host, "No source configured, using default log format");
                self.global.delimiter.default_format()
            }
        }
    }
}
