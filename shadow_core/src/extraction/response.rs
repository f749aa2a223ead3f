//! Parsing of free-form oracle output into patterns.
//!
//! The oracle is asked for a bare JSON array but may wrap it in prose or a
//! code fence. Parsing tries the first balanced `[...]` span, then the whole
//! trimmed text when it starts with `[`, and otherwise gives up.

use serde_json::Value;
use tracing::{debug, warn};

use crate::types::Pattern;

/// Result of reading one oracle response.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedResponse {
    Patterns(Vec<Pattern>),
    /// The oracle answered but nothing usable could be read.
    Empty,
}

impl ParsedResponse {
    #[must_use]
    pub fn into_patterns(self) -> Vec<Pattern> {
        match self {
            Self::Patterns(patterns) => patterns,
            Self::Empty => Vec::new(),
        }
    }
}

#[must_use]
pub fn parse_response(text: &str) -> ParsedResponse {
    if let Some(span) = first_balanced_array(text) {
        if let Some(patterns) = parse_array(span) {
            return ParsedResponse::Patterns(patterns);
        }
        debug!("Bracketed span did not parse as a pattern array");
    }

    let trimmed = text.trim();
    if trimmed.starts_with('[') {
        if let Some(patterns) = parse_array(trimmed) {
            return ParsedResponse::Patterns(patterns);
        }
    }

    warn!(
        "Oracle response contained no pattern array ({} chars)",
        text.len()
    );
    ParsedResponse::Empty
}

/// Locate the first `[` and its matching `]`, skipping brackets inside JSON strings.
#[must_use]
pub fn first_balanced_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parse a JSON array, keeping the elements that are valid patterns.
fn parse_array(json: &str) -> Option<Vec<Pattern>> {
    let items: Vec<Value> = serde_json::from_str(json).ok()?;
    let total = items.len();

    let patterns: Vec<Pattern> = items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<Pattern>(item) {
            Ok(pattern) => {
                let confidence = pattern.confidence;
                Some(pattern.with_confidence(confidence))
            }
            Err(e) => {
                warn!("Dropping malformed pattern from oracle: {e}");
                None
            }
        })
        .collect();

    debug!("Parsed {}/{} patterns from oracle output", patterns.len(), total);
    Some(patterns)
}
