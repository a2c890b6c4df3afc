//! Core library for payment-card number scanning.
//!
//! This crate provides:
//! - Rule-table compilation from raw issuer numbering rows
//! - A fixed-prefix automaton and a paired interval-prefix index
//! - Overlap-aware candidate scanning in document text
//! - Independent issuer-rule and Luhn classification
//! - A concurrent per-document extraction pipeline with an ordered report

pub mod error;
pub mod models;
pub mod pipeline;
pub mod rules;
pub mod scan;
pub mod validate;

pub use error::{Result, SweepError};
pub use models::config::ScanConfig;
pub use models::report::{CardMatch, Document, ScanReport};
pub use pipeline::ExtractionPipeline;
pub use rules::builtin::builtin_rows;
pub use rules::table::{CompiledRules, RuleRow, RuleTable, RuleTableBuilder};
pub use scan::Scanner;
pub use validate::luhn;

use std::sync::Arc;

/// Scan a document corpus with the given rules and configuration.
///
/// Convenience wrapper over [`ExtractionPipeline`] for callers that do not
/// need progress notifications.
pub fn scan_documents(
    rules: Arc<CompiledRules>,
    config: ScanConfig,
    documents: &[Document],
) -> Result<ScanReport> {
    ExtractionPipeline::new(rules, config)?.run(documents)
}
