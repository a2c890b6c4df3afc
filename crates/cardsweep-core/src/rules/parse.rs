//! Raw rule-row text parsing.
//!
//! Issuer numbering rows arrive as free text ("2221-2720, 51-55", "16-19",
//! often with footnote annotations). This module strips the annotations and
//! extracts standalone integers and dash-joined integer pairs.

use lazy_static::lazy_static;
use regex::Regex;

use super::intervals::Interval;
use crate::models::config::DASH_CHARS;

lazy_static! {
    /// Parenthesised or bracketed annotations inside a rule cell.
    static ref ANNOTATION: Regex = Regex::new(r"\([^(]*\)|\[[^\[]*\]").unwrap();
}

/// Extract fixed values and inclusive intervals from raw range text.
///
/// Standalone integers become fixed values; integer pairs joined by a
/// dash-like code point become intervals, with reversed endpoints swapped.
/// Anything unparseable contributes nothing.
pub fn parse_ranges(text: &str) -> (Vec<u64>, Vec<Interval>) {
    let cleaned = sanitize(text);
    let mut fixed = Vec::new();
    let mut intervals = Vec::new();

    for token in cleaned.split(',') {
        if token.is_empty() {
            continue;
        }
        if token.contains(is_dash) {
            let parts: Vec<&str> = token.split(is_dash).filter(|p| !p.is_empty()).collect();
            if parts.len() == 2 {
                if let (Ok(a), Ok(b)) = (parts[0].parse(), parts[1].parse()) {
                    intervals.push(Interval::new(a, b));
                }
            }
        } else if let Ok(v) = token.parse() {
            fixed.push(v);
        }
    }

    (fixed, intervals)
}

/// Extract length ranges from raw length text.
///
/// Same dual extraction as [`parse_ranges`]; standalone integers become
/// degenerate single-length ranges.
pub fn parse_lengths(text: &str) -> Vec<Interval> {
    let (fixed, mut ranges) = parse_ranges(text);
    ranges.extend(fixed.into_iter().map(Interval::point));
    ranges
}

fn is_dash(c: char) -> bool {
    DASH_CHARS.contains(&c)
}

/// Drop annotations, then every character that is not a digit, comma or
/// dash-like code point.
fn sanitize(text: &str) -> String {
    ANNOTATION
        .replace_all(text, "")
        .chars()
        .filter(|&c| c.is_ascii_digit() || c == ',' || is_dash(c))
        .collect()
}
