use super::model::{ClassifyError, UNKNOWN_LABEL};
use super::rules::{HostRule, UriRule};

/// HTTP status label from `$status`.
///
/// Missing → `unknown`; non-numeric or `0` → error, which callers
/// turn into `unknown`.
pub fn status_label(value: Option<&str>) -> Result<String, ClassifyError> {
    let Some(value) = value else {
        return Ok(UNKNOWN_LABEL.to_string());
    };

    let code: i64 = value
        .parse()
        .map_err(|e| ClassifyError::field_parse("status", value, e))?;

    if code == 0 {
        return Err(ClassifyError::field_parse("status", value, "status code 0"));
    }

    Ok(code.to_string())
}

/// Host label from `$host`, with exact-match replacements.
pub fn host_label(value: Option<&str>, rules: &[HostRule]) -> String {
    let Some(host) = value else {
        return UNKNOWN_LABEL.to_string();
    };

    rules
        .iter()
        .find(|rule| rule.matches == host)
        .map(|rule| rule.replacement.clone())
        .unwrap_or_else(|| host.to_string())
}

/// Normalized URI label from `$request` (`METHOD /path PROTOCOL`).
///
/// Empty when the request is missing or malformed, or when no rule
/// produces a replacement.
pub fn uri_label(value: Option<&str>, rules: &[UriRule]) -> String {
    let Some(request) = value else {
        return String::new();
    };

    let mut parts = request.split(' ');
    let (Some(method), Some(path)) = (parts.next(), parts.next()) else {
        return String::new();
    };

    for rule in rules {
        // A rule for a different method ends detection for the whole line,
        // so later rules are never tried. Looks unintended, but dashboards
        // depend on the resulting empty label.
        if let Some(expected) = &rule.method {
            if expected != method {
                return String::new();
            }
        }

        if let Some(found) = rule.pattern.find(path) {
            if !found.as_str().is_empty() {
                return rule
                    .pattern
                    .replace_all(found.as_str(), rule.replacement.as_str())
                    .into_owned();
            }
        }
    }

    String::new()
}

/// Response time in seconds from `$request_time`.
pub fn response_duration(value: Option<&str>) -> Result<Option<f64>, ClassifyError> {
    match value {
        None => Ok(None),
        Some(v) => v
            .parse::<f64>()
            .map(Some)
            .map_err(|e| ClassifyError::field_parse("request_time", v, e)),
    }
}
