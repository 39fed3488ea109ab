/// Delimiter-based access-log tokenizers

pub mod piped;
pub mod spaced;

use std::sync::Arc;

use crate::parser::traits::{Delimiter, FieldMap, LineTokenizer, ParseError};

// Re-export tokenizer implementations
pub use piped::PipedTokenizer;
pub use spaced::SpacedTokenizer;

/// Characters peeled off each segment, in this order, one occurrence per end.
const ENCLOSING_CHARS: [char; 5] = ['[', ']', '(', ')', '"'];

/// Build the tokenizer configured for a delimiter class.
pub fn tokenizer_for(delimiter: Delimiter) -> Arc<dyn LineTokenizer> {
    match delimiter {
        Delimiter::Pipe => Arc::new(PipedTokenizer),
        Delimiter::Space => Arc::new(SpacedTokenizer),
    }
}

/// Trim whitespace, then strip one layer of enclosing brackets/parens/quotes.
///
/// Not nesting-aware: `[` and `]` are stripped independently of each other.
pub(crate) fn clean_segment(segment: &str) -> &str {
    let mut s = segment.trim();
    for c in ENCLOSING_CHARS {
        s = s.strip_prefix(c).unwrap_or(s);
        s = s.strip_suffix(c).unwrap_or(s);
    }
    s
}

/// Pair format variables with content values.
///
/// `restore` is applied to every cleaned value before it is stored.
pub(crate) fn zip_fields<F>(
    variables: &[&str],
    values: &[&str],
    restore: F,
) -> Result<FieldMap, ParseError>
where
    F: Fn(&str) -> String,
{
    if variables.len() != values.len() {
        return Err(ParseError::FormatMismatch {
            variables: variables.len(),
            values: values.len(),
        });
    }

    let mut fields = FieldMap::with_capacity(variables.len());
    for (variable, value) in variables.iter().zip(values.iter()) {
        fields.insert(clean_segment(variable).to_string(), restore(clean_segment(value)));
    }

    Ok(fields)
}
