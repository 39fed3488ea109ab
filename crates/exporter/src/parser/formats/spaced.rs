use crate::parser::traits::{Delimiter, FieldMap, LineTokenizer, ParseError};
use super::zip_fields;

const SPACE: char = ' ';

/// Tokenizer for space-delimited formats (nginx `combined` and friends).
///
/// Quoted, bracketed and parenthesized spans stay whole even when they
/// contain spaces, e.g. `"GET /index.html HTTP/1.1"` or `[10/Oct/2000:13:55:36 -0700]`.
/// Values are borrowed slices of the line, so every other character comes
/// back unchanged.
pub struct SpacedTokenizer;

impl LineTokenizer for SpacedTokenizer {
    fn tokenize(&self, format: &str, content: &str) -> Result<FieldMap, ParseError> {
        let variables: Vec<&str> = format.split(SPACE).collect();
        let values = split_outside_spans(content);

        zip_fields(&variables, &values, str::to_string)
    }

    fn delimiter(&self) -> Delimiter {
        Delimiter::Space
    }
}

/// Split on spaces that are not inside a `"…"`, `[…]` or `(…)` span.
///
/// The nesting counter goes up on `[`/`(`, down on `]`/`)`; a quote closes
/// whatever is open (counter non-zero) and opens a span otherwise.
fn split_outside_spans(content: &str) -> Vec<&str> {
    let mut frame: i32 = 0;
    let mut start = 0;
    let mut values = Vec::new();

    for (i, c) in content.char_indices() {
        match c {
            '"' => {
                if frame != 0 {
                    frame -= 1;
                } else {
                    frame += 1;
                }
            }
            '[' | '(' => frame += 1,
            ']' | ')' => frame -= 1,
            SPACE if frame <= 0 => {
                values.push(&content[start..i]);
                start = i + SPACE.len_utf8();
            }
            _ => {}
        }
    }
    values.push(&content[start..]);

    values
}
