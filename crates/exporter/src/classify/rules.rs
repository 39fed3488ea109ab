use regex::Regex;

use super::model::UaLabels;

/// Compiled replacement rules, read-only once built.
#[derive(Debug, Clone, Default)]
pub struct Rules {
    pub user_agents: Vec<UserAgentRule>,
    pub request_uris: Vec<UriRule>,
    pub hosts: Vec<HostRule>,
}

#[derive(Debug, Clone)]
pub enum UaMatcher {
    Pattern(Regex),
    /// Lowercased match string
    Exact(String),
}

/// Custom user-agent override.
///
/// Templates may reference capture groups of a `Pattern` matcher (`$1`, `${name}`).
#[derive(Debug, Clone)]
pub struct UserAgentRule {
    pub matcher: UaMatcher,
    pub replacements: UaLabels,
}

impl UserAgentRule {
    pub fn pattern(re: Regex, replacements: UaLabels) -> Self {
        Self {
            matcher: UaMatcher::Pattern(re),
            replacements,
        }
    }

    pub fn exact(value: &str, replacements: UaLabels) -> Self {
        Self {
            matcher: UaMatcher::Exact(value.to_lowercase()),
            replacements,
        }
    }

    /// Labels for `user_agent` if this rule matches it.
    pub fn apply(&self, user_agent: &str) -> Option<UaLabels> {
        match &self.matcher {
            UaMatcher::Pattern(re) => {
                let found = re.find(user_agent)?.as_str();
                let expand = |template: &str| re.replace_all(found, template).into_owned();

                Some(UaLabels::new(
                    expand(&self.replacements.user_agent),
                    expand(&self.replacements.os),
                    expand(&self.replacements.device),
                ))
            }
            UaMatcher::Exact(value) => {
                if value.as_str() == user_agent.to_lowercase() {
                    Some(self.replacements.clone())
                } else {
                    None
                }
            }
        }
    }
}

/// Request URI normalization rule.
#[derive(Debug, Clone)]
pub struct UriRule {
    /// Only requests with this method are considered; `None` accepts any
    pub method: Option<String>,
    pub pattern: Regex,
    pub replacement: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostRule {
    pub matches: String,
    pub replacement: String,
}
