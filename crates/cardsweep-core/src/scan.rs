//! Candidate discovery in document text.
//!
//! A candidate is a run of digits interleaved with configured delimiter
//! characters, bounded on both sides by a non-digit or the text boundary,
//! whose digit count falls inside the configured bounds. Every digit
//! position that opens such a window produces one, so overlapping windows
//! inside a delimited run are all surfaced; suppression happens later,
//! once issuer-validity is known.

use std::str::CharIndices;

use crate::models::config::ScanConfig;

/// A syntactically plausible, not-yet-validated number substring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate<'a> {
    /// Byte offset of the first digit.
    pub start: usize,
    /// Byte offset one past the last digit.
    pub end: usize,
    /// The matched slice, digits and delimiters.
    pub raw: &'a str,
    /// The digits alone.
    pub digits: String,
}

/// Finds candidate windows in document text.
#[derive(Debug, Clone)]
pub struct Scanner {
    min_digits: usize,
    max_digits: usize,
    /// Delimiter and dash sets merged.
    delimiters: Vec<char>,
    context_len: usize,
}

impl Scanner {
    pub fn new(config: &ScanConfig) -> Self {
        let mut delimiters = config.delimiters.clone();
        delimiters.extend(&config.dashes);
        Self {
            min_digits: config.min_digits,
            max_digits: config.max_digits,
            delimiters,
            context_len: config.context_len,
        }
    }

    fn is_delimiter(&self, c: char) -> bool {
        self.delimiters.contains(&c)
    }

    /// Lazy sequence of candidate windows over `text`, in start order.
    pub fn candidates<'a>(&'a self, text: &'a str) -> Candidates<'a> {
        Candidates {
            scanner: self,
            text,
            chars: text.char_indices(),
        }
    }

    /// Build the candidate window opening at `start` (a digit preceded by
    /// a non-digit or the text start). The window takes the most digits
    /// within bounds whose final digit is not immediately followed by
    /// another digit; `None` when no such size reaches the minimum.
    fn window_at<'a>(&self, text: &'a str, start: usize) -> Option<Candidate<'a>> {
        let mut digits = String::new();
        // byte offsets of each accepted digit (digits are ASCII, width 1)
        let mut offsets: Vec<usize> = Vec::new();

        for (off, c) in text[start..].char_indices() {
            if c.is_ascii_digit() {
                if digits.len() == self.max_digits {
                    break;
                }
                offsets.push(start + off);
                digits.push(c);
            } else if !self.is_delimiter(c) {
                break;
            }
        }

        let mut k = digits.len();
        while k >= self.min_digits {
            let end = offsets[k - 1] + 1;
            let followed_by_digit = if k < digits.len() {
                offsets[k] == end
            } else {
                text.as_bytes().get(end).is_some_and(u8::is_ascii_digit)
            };
            if !followed_by_digit {
                digits.truncate(k);
                return Some(Candidate {
                    start,
                    end,
                    raw: &text[start..end],
                    digits,
                });
            }
            k -= 1;
        }
        None
    }

    /// Fixed-size context window around a match, newlines flattened to
    /// spaces. Offsets move by characters, not bytes.
    pub fn context(&self, text: &str, start: usize, end: usize) -> String {
        let mut from = start;
        for _ in 0..self.context_len {
            match text[..from].chars().next_back() {
                Some(c) => from -= c.len_utf8(),
                None => break,
            }
        }
        let mut to = end;
        for _ in 0..self.context_len {
            match text[to..].chars().next() {
                Some(c) => to += c.len_utf8(),
                None => break,
            }
        }
        let snippet: String = text[from..to]
            .chars()
            .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
            .collect();
        format!("...{snippet}...")
    }
}

/// Lazy candidate iterator returned by [`Scanner::candidates`].
pub struct Candidates<'a> {
    scanner: &'a Scanner,
    text: &'a str,
    chars: CharIndices<'a>,
}

impl<'a> Iterator for Candidates<'a> {
    type Item = Candidate<'a>;

    fn next(&mut self) -> Option<Candidate<'a>> {
        for (at, c) in self.chars.by_ref() {
            if !c.is_ascii_digit() {
                continue;
            }
            // a window opens only where the preceding character is not a
            // digit; ASCII digit bytes never appear inside other UTF-8
            // sequences, so the byte test is exact
            if at > 0 && self.text.as_bytes()[at - 1].is_ascii_digit() {
                continue;
            }
            if let Some(candidate) = self.scanner.window_at(self.text, at) {
                return Some(candidate);
            }
        }
        None
    }
}
