use crate::parser::traits::{Delimiter, FieldMap, LineTokenizer, ParseError};
use super::zip_fields;

const PIPE: char = '|';

/// Tokenizer for pipe-delimited formats.
///
/// Example format: `$request_time | "$host" | $request | $status`
/// Pipes are never expected inside values, so no span tracking is needed.
pub struct PipedTokenizer;

impl LineTokenizer for PipedTokenizer {
    fn tokenize(&self, format: &str, content: &str) -> Result<FieldMap, ParseError> {
        let variables: Vec<&str> = format.split(PIPE).collect();
        let values: Vec<&str> = content.split(PIPE).collect();

        zip_fields(&variables, &values, str::to_string)
    }

    fn delimiter(&self) -> Delimiter {
        Delimiter::Pipe
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_piped_success() {
        let fields = PipedTokenizer
            .tokenize(
                r#"$var1 | [$var2] | "$var3" | ($var4) | $var5"#,
                r#"10 | [text] | "tested text that has [parentheses] (and) spaces" | (text in parentheses) | simple"#,
            )
            .unwrap();

        assert_eq!(fields.len(), 5);
        assert_eq!(fields["$var1"], "10");
        assert_eq!(fields["$var2"], "text");
        assert_eq!(fields["$var3"], "tested text that has [parentheses] (and) spaces");
        assert_eq!(fields["$var4"], "text in parentheses");
        assert_eq!(fields["$var5"], "simple");
    }

    #[test]
    fn test_tokenize_piped_mismatch() {
        let result = PipedTokenizer.tokenize("$var1 | $var3", "1 | 2 | 3");
        assert_eq!(result, Err(ParseError::FormatMismatch { variables: 2, values: 3 }));
    }

    #[test]
    fn test_tokenize_piped_keeps_spaces_in_values() {
        let fields = PipedTokenizer
            .tokenize("$request|$status", "GET /index.html HTTP/1.1|200")
            .unwrap();
        assert_eq!(fields["$request"], "GET /index.html HTTP/1.1");
        assert_eq!(fields["$status"], "200");
    }

    #[test]
    fn test_tokenize_piped_is_deterministic() {
        let format = r#"$remote_addr | "$http_user_agent" | $status"#;
        let content = r#"10.0.0.1 | "curl/7.68.0" | 404"#;
        let first = PipedTokenizer.tokenize(format, content).unwrap();
        let second = PipedTokenizer.tokenize(format, content).unwrap();
        assert_eq!(first, second);
    }
}
