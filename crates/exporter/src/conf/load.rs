//! Load: config loading from file and environment variables, validation,
//! and compilation of rule tables.

use std::path::Path;

use regex::Regex;

use crate::classify::{HostRule, InternalSubnets, Rules, UaLabels, UriRule, UserAgentRule};

use super::error::ConfigError;
use super::model::{ExporterConfig, GlobalConfig};

const DEFAULT_CONFIG_FILE: &str = "/etc/accesslog-exporter/config.toml";

impl ExporterConfig {
    /// Load configuration from file or environment variables
    /// Priority: Environment Variables > Config File > Defaults
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("EXPORTER_CONFIG_FILE").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        let mut config = if Path::new(&config_path).exists() {
            tracing::info!("Loading configuration from: {}", config_path);
            Self::from_file(&config_path)?
        } else {
            tracing::info!("Config file not found at {}, using environment variables", config_path);
            Self::from_env()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;

        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })
    }

    /// Defaults with environment overrides; no rules, no sources.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    fn apply_env_overrides(&mut self) {
        let global = &mut self.global;

        if let Ok(addr) = std::env::var("EXPORTER_SYSLOG_ADDRESS") {
            global.syslog_address = addr;
        }
        if let Ok(addr) = std::env::var("EXPORTER_WEB_ADDRESS") {
            global.web_address = addr;
        }
        if let Ok(path) = std::env::var("EXPORTER_UA_REGEX_PATH") {
            global.ua_regex_path = path;
        }
        if let Some(workers) = env_parse("EXPORTER_WORKERS") {
            global.export_workers = workers;
        }
        if let Some(size) = env_parse("EXPORTER_UA_CACHE_SIZE") {
            global.user_agent_cache_size = size;
        }
    }

    /// Validate that configuration values are sane and every pattern compiles
    pub fn validate(&self) -> Result<(), String> {
        let global = &self.global;

        if global.syslog_address.is_empty() {
            return Err("global.syslog_address must not be empty".to_string());
        }
        if global.web_address.is_empty() {
            return Err("global.web_address must not be empty".to_string());
        }
        if global.export_workers == 0 {
            return Err("global.export_workers must be > 0".to_string());
        }
        if global.user_agent_cache_size == 0 {
            return Err("global.user_agent_cache_size must be > 0".to_string());
        }
        if global.queue_capacity == 0 {
            return Err("global.queue_capacity must be > 0".to_string());
        }
        if global.summary_interval_secs == 0 {
            return Err("global.summary_interval_secs must be > 0".to_string());
        }

        for source in &self.sources {
            if source.log_format.trim().is_empty() {
                return Err(format!("sources: empty log_format for host {}", source.host));
            }
        }

        // lookups fail open on bad subnets, so these only warn
        for subnet in InternalSubnets::parse(&global.internal_subnets).invalid() {
            tracing::warn!(subnet = %subnet, "Invalid CIDR in global.internal_subnets");
        }

        global.compile().map(|_| ()).map_err(|e| e.to_string())
    }
}

impl GlobalConfig {
    /// Compile the raw rule tables.
    ///
    /// User-agent entries with neither `match_re` nor `match` are skipped.
    pub fn compile(&self) -> Result<Rules, ConfigError> {
        let mut user_agents = Vec::with_capacity(self.user_agents.len());
        for raw in &self.user_agents {
            let r = &raw.replacements;
            let labels = UaLabels::new(r.user_agent.as_str(), r.os.as_str(), r.device.as_str());

            if !raw.match_re.is_empty() {
                let re = compile_pattern("global.user_agents", &raw.match_re)?;
                user_agents.push(UserAgentRule::pattern(re, labels));
            } else if !raw.exact.is_empty() {
                user_agents.push(UserAgentRule::exact(&raw.exact, labels));
            }
        }

        let mut request_uris = Vec::with_capacity(self.request_uris.len());
        for raw in &self.request_uris {
            request_uris.push(UriRule {
                method: Some(raw.match_method.clone()).filter(|m| !m.is_empty()),
                pattern: compile_pattern("global.request_uris", &raw.match_re)?,
                replacement: raw.replacements.request_uri.clone(),
            });
        }

        let hosts = self
            .hosts
            .iter()
            .map(|h| HostRule {
                matches: h.matches.clone(),
                replacement: h.replacement.clone(),
            })
            .collect();

        Ok(Rules {
            user_agents,
            request_uris,
            hosts,
        })
    }
}

fn compile_pattern(section: &'static str, pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|source| ConfigError::Pattern {
        section,
        pattern: pattern.to_string(),
        source,
    })
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(key = %key, value = %raw, "Ignoring unparsable environment override");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conf::model::{RequestUriRuleConfig, UserAgentRuleConfig};

    fn global_with_rules() -> GlobalConfig {
        let mut global = GlobalConfig::default();
        global.user_agents = vec![
            UserAgentRuleConfig {
                match_re: "^myapp_android/([0-9.]+)".to_string(),
                ..Default::default()
            },
            UserAgentRuleConfig {
                exact: "MyApp_iOS".to_string(),
                ..Default::default()
            },
            // neither matcher set
            UserAgentRuleConfig::default(),
        ];
        global.request_uris = vec![RequestUriRuleConfig {
            match_re: "^/search/.*".to_string(),
            match_method: "POST".to_string(),
            ..Default::default()
        }];
        global
    }

    #[test]
    fn test_compile_rules() {
        let rules = global_with_rules().compile().unwrap();

        assert_eq!(rules.user_agents.len(), 2);
        assert!(matches!(rules.user_agents[0].matcher, crate::classify::UaMatcher::Pattern(_)));
        assert!(matches!(
            &rules.user_agents[1].matcher,
            crate::classify::UaMatcher::Exact(s) if s == "myapp_ios"
        ));
        assert_eq!(rules.request_uris[0].method.as_deref(), Some("POST"));
    }

    #[test]
    fn test_empty_method_accepts_any() {
        let mut global = global_with_rules();
        global.request_uris[0].match_method.clear();

        let rules = global.compile().unwrap();
        assert_eq!(rules.request_uris[0].method, None);
    }

    #[test]
    fn test_bad_pattern_rejected() {
        let mut global = GlobalConfig::default();
        global.request_uris = vec![RequestUriRuleConfig {
            match_re: "(unclosed".to_string(),
            ..Default::default()
        }];

        let err = global.compile().unwrap_err();
        assert!(matches!(err, ConfigError::Pattern { section: "global.request_uris", .. }));
    }

    #[test]
    fn test_validate_default_passes() {
        assert!(ExporterConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_workers() {
        let mut cfg = ExporterConfig::default();
        cfg.global.export_workers = 0;
        let err = cfg.validate().unwrap_err();
        assert!(err.contains("export_workers"), "Error should mention export_workers: {}", err);
    }

    #[test]
    fn test_validate_rejects_zero_cache() {
        let mut cfg = ExporterConfig::default();
        cfg.global.user_agent_cache_size = 0;
        assert!(cfg.validate().unwrap_err().contains("user_agent_cache_size"));
    }

    #[test]
    fn test_validate_rejects_empty_web_address() {
        let mut cfg = ExporterConfig::default();
        cfg.global.web_address = String::new();
        assert!(cfg.validate().unwrap_err().contains("web_address"));
    }

    #[test]
    fn test_validate_tolerates_bad_subnet() {
        let mut cfg = ExporterConfig::default();
        cfg.global.internal_subnets = vec!["30.0.0.t/8".to_string()];
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_from_file_missing() {
        let err = ExporterConfig::from_file("/nonexistent/exporter.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_from_file_parse_error() {
        let path = std::env::temp_dir().join(format!("exporter-bad-{}.toml", std::process::id()));
        std::fs::write(&path, "[global\nexport_workers = ").unwrap();

        let err = ExporterConfig::from_file(path.to_str().unwrap()).unwrap_err();
        std::fs::remove_file(&path).ok();

        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
