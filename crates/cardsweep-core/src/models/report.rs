//! Report records produced by the extraction pipeline.

use serde::{Deserialize, Serialize};

/// One document submitted to the pipeline: an identifier (usually a file
/// name) and its decoded text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub text: String,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// A classified candidate retained in the final report, valid or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardMatch {
    /// Document the number was found in.
    pub document: String,

    /// The matched number, digits only. Empty on a failure marker.
    pub card_number: String,

    /// Whether an issuer numbering rule covers the number.
    /// `None` only on a document failure marker.
    pub issuer_valid: Option<bool>,

    /// Whether the Luhn checksum holds.
    /// `None` only on a document failure marker.
    pub luhn_valid: Option<bool>,

    /// 1-based position of the match within its document.
    /// 0 on a failure marker.
    pub ordinal: u32,

    /// Text surrounding the match, newlines flattened. Carries the failure
    /// reason on a failure marker.
    pub context: String,
}

impl CardMatch {
    /// True when this record marks a failed document rather than a match.
    pub fn is_failure(&self) -> bool {
        self.issuer_valid.is_none()
    }
}

/// The final report, ordered by (document, ordinal).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    pub matches: Vec<CardMatch>,
}

impl ScanReport {
    /// Matches covered by an issuer numbering rule.
    pub fn issuer_valid_count(&self) -> usize {
        self.matches
            .iter()
            .filter(|m| m.issuer_valid == Some(true))
            .count()
    }

    /// Matches passing the Luhn checksum.
    pub fn luhn_valid_count(&self) -> usize {
        self.matches
            .iter()
            .filter(|m| m.luhn_valid == Some(true))
            .count()
    }

    /// Documents whose task failed.
    pub fn failure_count(&self) -> usize {
        self.matches.iter().filter(|m| m.is_failure()).count()
    }
}
