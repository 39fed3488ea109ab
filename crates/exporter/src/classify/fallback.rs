//! Fallback: general-purpose user-agent classification.
//!
//! Used when no custom replacement rule matches. The engine only needs
//! family/os/device strings; [`UaParserClassifier`] provides them from the
//! ua-parser `regexes.yaml` database.

use uaparser::{Parser, UserAgentParser};

use super::model::{ClassifyError, UaLabels};

/// Raw user-agent string → browser family, OS family, device family.
///
/// Implementations must be synchronous and free of observable side effects;
/// they are called from many workers at once.
pub trait UserAgentClassifier: Send + Sync {
    fn classify(&self, user_agent: &str) -> Result<UaLabels, ClassifyError>;
}

pub struct UaParserClassifier {
    parser: UserAgentParser,
}

impl UaParserClassifier {
    /// Load the regex database from a `regexes.yaml` file.
    pub fn from_yaml(path: &str) -> Result<Self, ClassifyError> {
        let parser = UserAgentParser::from_yaml(path)
            .map_err(|e| ClassifyError::ClassifierUnavailable(format!("{}: {}", path, e)))?;
        Ok(Self { parser })
    }

    pub fn from_bytes(regexes_yaml: &[u8]) -> Result<Self, ClassifyError> {
        let parser = UserAgentParser::from_bytes(regexes_yaml)
            .map_err(|e| ClassifyError::ClassifierUnavailable(e.to_string()))?;
        Ok(Self { parser })
    }
}

impl UserAgentClassifier for UaParserClassifier {
    fn classify(&self, user_agent: &str) -> Result<UaLabels, ClassifyError> {
        let client = self.parser.parse(user_agent);

        Ok(UaLabels::new(
            client.user_agent.family.to_string(),
            client.os.family.to_string(),
            client.device.family.to_string(),
        ))
    }
}

/// Upper-case the first letter of every word, leaving the rest untouched.
///
/// Word boundaries are any character that is not alphanumeric or `_`,
/// so `"mac os x"` becomes `"Mac Os X"` and `"iOS"` becomes `"IOS"`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;

    for c in s.chars() {
        if at_word_start && c.is_alphabetic() {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = !(c.is_alphanumeric() || c == '_');
    }

    out
}
