//! Composite lookup keys
//!
//! Child resources are identified by several names (vault + key, network +
//! subnet). These are packed into one query string by joining with `|`,
//! escaping `\` and `|` inside parts so that any non-empty list of parts
//! survives a round trip.

const SEPARATOR: char = '|';
const ESCAPE: char = '\\';

/// Encode name parts into one lookup key
pub fn encode<S: AsRef<str>>(parts: &[S]) -> String {
    let mut out = String::new();
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            out.push(SEPARATOR);
        }
        for c in part.as_ref().chars() {
            if c == SEPARATOR || c == ESCAPE {
                out.push(ESCAPE);
            }
            out.push(c);
        }
    }
    out
}

/// Split a lookup key back into its parts.
///
/// Returns `None` when an escape is not followed by `|` or `\`, since
/// [`encode`] never produces such a key.
pub fn decode(key: &str) -> Option<Vec<String>> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut chars = key.chars();

    while let Some(c) = chars.next() {
        match c {
            ESCAPE => match chars.next() {
                Some(escaped @ (SEPARATOR | ESCAPE)) => current.push(escaped),
                _ => return None,
            },
            SEPARATOR => parts.push(std::mem::take(&mut current)),
            other => current.push(other),
        }
    }
    parts.push(current);
    Some(parts)
}
