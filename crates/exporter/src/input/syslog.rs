use thiserror::Error;

/// Hostname and message of one syslog datagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyslogRecord {
    pub priority: u8,
    /// `None` when the sender left it out (`-` in RFC 5424)
    pub hostname: Option<String>,
    pub app_name: Option<String>,
    pub message: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvelopeError {
    #[error("Datagram is not valid UTF-8")]
    NonUtf8,

    #[error("Missing syslog priority")]
    MissingPriority,

    #[error("Invalid syslog priority: {0}")]
    InvalidPriority(String),
}

/// Parse a syslog datagram (RFC 5424 or RFC 3164).
///
/// RFC 5424 is assumed when the version `1` and a space follow `<PRI>`.
pub fn parse_envelope(raw: &[u8]) -> Result<SyslogRecord, EnvelopeError> {
    let text = std::str::from_utf8(raw).map_err(|_| EnvelopeError::NonUtf8)?;
    let text = text.trim_end_matches(['\n', '\r', '\0']);

    let rest = text.strip_prefix('<').ok_or(EnvelopeError::MissingPriority)?;
    let pri_end = rest
        .char_indices()
        .take(4)
        .find(|(_, c)| *c == '>')
        .map(|(i, _)| i)
        .ok_or(EnvelopeError::MissingPriority)?;

    let pri_raw = &rest[..pri_end];
    let priority: u8 = pri_raw
        .parse()
        .ok()
        .filter(|p| *p <= 191)
        .ok_or_else(|| EnvelopeError::InvalidPriority(pri_raw.to_string()))?;

    let remainder = &rest[pri_end + 1..];

    let (hostname, app_name, message) = match remainder.strip_prefix("1 ") {
        Some(after_version) => parse_rfc5424(after_version),
        None => parse_rfc3164(remainder),
    };

    Ok(SyslogRecord {
        priority,
        hostname,
        app_name,
        message,
    })
}

fn nil_to_none(field: Option<&str>) -> Option<String> {
    field.filter(|s| !s.is_empty() && *s != "-").map(str::to_string)
}

/// `TIMESTAMP HOSTNAME APP-NAME PROCID MSGID STRUCTURED-DATA [MSG]`
fn parse_rfc5424(text: &str) -> (Option<String>, Option<String>, String) {
    let mut parts = text.splitn(6, ' ');
    let _timestamp = parts.next();
    let hostname = nil_to_none(parts.next());
    let app_name = nil_to_none(parts.next());
    let _procid = parts.next();
    let _msgid = parts.next();
    let sd_and_msg = parts.next().unwrap_or("");

    let msg = skip_structured_data(sd_and_msg);
    let msg = msg.strip_prefix(' ').unwrap_or(msg);
    let msg = msg.strip_prefix('\u{FEFF}').unwrap_or(msg);

    (hostname, app_name, msg.to_string())
}

/// Skip the `-` nil value or a run of `[id k="v" ...]` elements.
///
/// Quoted param values may contain `]`, and `\"` / `\]` are escapes.
fn skip_structured_data(text: &str) -> &str {
    if let Some(rest) = text.strip_prefix('-') {
        return rest;
    }

    let mut end = 0;
    let bytes = text.as_bytes();

    while bytes.get(end) == Some(&b'[') {
        let mut in_quotes = false;
        let mut escaped = false;
        let mut closed = None;

        for (i, &b) in bytes.iter().enumerate().skip(end + 1) {
            if escaped {
                escaped = false;
                continue;
            }
            match b {
                b'\\' => escaped = true,
                b'"' => in_quotes = !in_quotes,
                b']' if !in_quotes => {
                    closed = Some(i);
                    break;
                }
                _ => {}
            }
        }

        match closed {
            Some(i) => end = i + 1,
            // unterminated: treat everything as message
            None => return text,
        }
    }

    &text[end..]
}

/// `Mmm dd hh:mm:ss HOSTNAME TAG: MSG`
fn parse_rfc3164(text: &str) -> (Option<String>, Option<String>, String) {
    let after_ts = if has_bsd_timestamp(text) { &text[16..] } else { text };

    let (hostname, rest) = match after_ts.split_once(' ') {
        Some((host, rest)) => (nil_to_none(Some(host)), rest),
        None => return (None, None, after_ts.to_string()),
    };

    // "nginx:" or "nginx[123]:"
    let (app_name, message) = match rest.split_once(' ') {
        Some((tag, msg)) if tag.ends_with(':') => {
            let app = tag.trim_end_matches(':');
            let app = app.split('[').next().unwrap_or(app);
            (nil_to_none(Some(app)), msg)
        }
        _ => (None, rest),
    };

    (hostname, app_name, message.to_string())
}

/// `Oct 11 22:14:15 ` (day space-padded) followed by more text.
fn has_bsd_timestamp(text: &str) -> bool {
    let b = text.as_bytes();
    b.len() > 16
        && b[..3].iter().all(u8::is_ascii_alphabetic)
        && b[3] == b' '
        && b[9] == b':'
        && b[12] == b':'
        && b[15] == b' '
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACCESS_LINE: &str = r#"93.180.71.3 - - [17/May/2015:08:05:32 +0000] "GET /downloads/product_1 HTTP/1.1" 0.013 304 0 "-" "Debian APT-HTTP/1.3" "-" 3"#;

    #[test]
    fn test_parse_rfc3164_nginx() {
        let datagram = format!("<190>Oct 11 22:14:15 web1 nginx: {}", ACCESS_LINE);
        let record = parse_envelope(datagram.as_bytes()).unwrap();

        assert_eq!(record.priority, 190);
        assert_eq!(record.hostname.as_deref(), Some("web1"));
        assert_eq!(record.app_name.as_deref(), Some("nginx"));
        assert_eq!(record.message, ACCESS_LINE);
    }

    #[test]
    fn test_parse_rfc3164_padded_day_and_pid() {
        let record = parse_envelope(b"<34>Oct  1 02:04:05 mymachine su[123]: 'su root' failed\n").unwrap();

        assert_eq!(record.hostname.as_deref(), Some("mymachine"));
        assert_eq!(record.app_name.as_deref(), Some("su"));
        assert_eq!(record.message, "'su root' failed");
    }

    #[test]
    fn test_parse_rfc5424() {
        let sample = b"<165>1 2003-10-11T22:14:15.003Z mymachine.example.com evntslog - ID47 [exampleSDID@32473 iut=\"3\" eventSource=\"App]lication\"] BOMAn application event";
        let record = parse_envelope(sample).unwrap();

        assert_eq!(record.priority, 165);
        assert_eq!(record.hostname.as_deref(), Some("mymachine.example.com"));
        assert_eq!(record.app_name.as_deref(), Some("evntslog"));
        assert_eq!(record.message, "BOMAn application event");
    }

    #[test]
    fn test_parse_rfc5424_nil_fields() {
        let datagram = format!("<190>1 2019-01-01T00:00:00Z - nginx - - - {}", ACCESS_LINE);
        let record = parse_envelope(datagram.as_bytes()).unwrap();

        assert_eq!(record.hostname, None);
        assert_eq!(record.message, ACCESS_LINE);
    }

    #[test]
    fn test_brackets_in_message_survive() {
        let datagram = format!("<190>1 2019-01-01T00:00:00Z web2 nginx - - [meta a=\"1\"] {}", ACCESS_LINE);
        let record = parse_envelope(datagram.as_bytes()).unwrap();
        assert_eq!(record.message, ACCESS_LINE);
    }

    #[test]
    fn test_invalid_envelopes() {
        assert_eq!(parse_envelope(b"no priority"), Err(EnvelopeError::MissingPriority));
        assert_eq!(parse_envelope(b"<abc>msg"), Err(EnvelopeError::InvalidPriority("abc".to_string())));
        assert_eq!(parse_envelope(b"<999>msg"), Err(EnvelopeError::InvalidPriority("999".to_string())));
        assert_eq!(parse_envelope(&[b'<', 0xff, 0xfe]), Err(EnvelopeError::NonUtf8));
    }
}
