use serde::Serialize;
use thiserror::Error;

/// Label used when a field is absent or could not be derived.
pub const UNKNOWN_LABEL: &str = "unknown";

/// Label assigned to user-agent fields of requests from internal subnets.
pub const INTERNAL_LABEL: &str = "internal";

/// User agent, OS and device labels of one request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct UaLabels {
    pub user_agent: String,
    pub os: String,
    pub device: String,
}

impl UaLabels {
    pub fn new(user_agent: impl Into<String>, os: impl Into<String>, device: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            os: os.into(),
            device: device.into(),
        }
    }

    pub fn unknown() -> Self {
        Self::new(UNKNOWN_LABEL, UNKNOWN_LABEL, UNKNOWN_LABEL)
    }

    pub fn internal() -> Self {
        Self::new(INTERNAL_LABEL, INTERNAL_LABEL, INTERNAL_LABEL)
    }
}

/// Outcome of the rule/subnet stage of user-agent detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UaDetection {
    /// A custom replacement rule matched; no cache or classifier involved.
    Found(UaLabels),
    /// No rule matched; labels come from the cache or the fallback classifier.
    NeedsFallback,
    /// Request came from an internal subnet; parsing is skipped.
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    Mobile,
    Tablet,
    Desktop,
}

impl DeviceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Mobile => "mobile",
            DeviceType::Tablet => "tablet",
            DeviceType::Desktop => "desktop",
        }
    }
}

/// Every label derived from one access-log line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub labels: UaLabels,
    pub device_type: DeviceType,
    /// HTTP status code, or `unknown`
    pub status: String,
    pub host: String,
    /// Normalized request URI; empty when no rule produced one
    pub uri: String,
    /// Response time in seconds (`$request_time`)
    pub duration: Option<f64>,
}

impl ClassificationResult {
    pub fn duration_present(&self) -> bool {
        self.duration.is_some()
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ClassifyError {
    #[error("Could not parse {field} from {value:?}: {reason}")]
    FieldParse {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Subnet check failed: {0}")]
    SubnetConfig(String),

    #[error("User agent classifier unavailable: {0}")]
    ClassifierUnavailable(String),
}

impl ClassifyError {
    pub(crate) fn field_parse(field: &'static str, value: &str, reason: impl ToString) -> Self {
        ClassifyError::FieldParse {
            field,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}
