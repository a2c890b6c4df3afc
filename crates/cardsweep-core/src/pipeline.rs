//! Concurrent per-document extraction.
//!
//! One scan+classify unit runs per document on a bounded worker pool. The
//! only state shared across tasks is the immutable compiled rule set and
//! the progress counter; everything else is document-local.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::error::{Result, SweepError};
use crate::models::config::ScanConfig;
use crate::models::report::{CardMatch, Document, ScanReport};
use crate::rules::table::CompiledRules;
use crate::scan::Scanner;
use crate::validate;

/// Callback receiving (completed, total) document counts.
pub type ProgressFn = dyn Fn(usize, usize) + Send + Sync;

/// Runs scan + classify for every document and aggregates one ordered
/// report.
pub struct ExtractionPipeline {
    rules: Arc<CompiledRules>,
    config: ScanConfig,
    on_progress: Option<Box<ProgressFn>>,
}

impl ExtractionPipeline {
    pub fn new(rules: Arc<CompiledRules>, config: ScanConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            rules,
            config,
            on_progress: None,
        })
    }

    /// Install a progress callback. It fires every
    /// `config.progress_interval` completions and always on the final one.
    pub fn on_progress(mut self, callback: impl Fn(usize, usize) + Send + Sync + 'static) -> Self {
        self.on_progress = Some(Box::new(callback));
        self
    }

    /// Process every document concurrently and return the report, sorted
    /// by (document, ordinal) regardless of completion order.
    ///
    /// An empty input is fatal; a single document's fault is not — it is
    /// caught and surfaced as that document's failure marker.
    pub fn run(&self, documents: &[Document]) -> Result<ScanReport> {
        if documents.is_empty() {
            return Err(SweepError::NoDocuments);
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.workers.unwrap_or(0))
            .build()?;

        let scanner = Scanner::new(&self.config);
        let progress = Progress::new(documents.len(), self.config.progress_interval);
        info!(documents = documents.len(), "extracting card numbers");

        let per_document: Vec<Vec<CardMatch>> = pool.install(|| {
            documents
                .par_iter()
                .map(|doc| {
                    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                        extract_document(doc, &scanner, &self.rules)
                    }));
                    let matches = outcome.unwrap_or_else(|payload| {
                        let reason = panic_message(payload.as_ref());
                        warn!(document = %doc.id, %reason, "document task failed");
                        vec![failure_marker(&doc.id, &reason)]
                    });
                    if let Some(done) = progress.tick() {
                        if let Some(callback) = &self.on_progress {
                            callback(done, documents.len());
                        }
                    }
                    matches
                })
                .collect()
        });

        let mut matches: Vec<CardMatch> = per_document.into_iter().flatten().collect();
        matches.sort_by(|a, b| {
            (a.document.as_str(), a.ordinal).cmp(&(b.document.as_str(), b.ordinal))
        });
        Ok(ScanReport { matches })
    }
}

/// Scan one document and classify every emitted candidate.
fn extract_document(doc: &Document, scanner: &Scanner, rules: &CompiledRules) -> Vec<CardMatch> {
    let mut matches = Vec::new();
    let mut ordinal = 0u32;
    // end offset of the most recent issuer-valid match; candidates starting
    // before it are suppressed outright, unclassified and unreported
    let mut valid_end = 0usize;

    for candidate in scanner.candidates(&doc.text) {
        if candidate.start < valid_end {
            continue;
        }
        let outcome = validate::classify(rules, &candidate.digits);
        if outcome.issuer_valid {
            valid_end = candidate.end;
        }
        ordinal += 1;
        matches.push(CardMatch {
            document: doc.id.clone(),
            card_number: candidate.digits,
            issuer_valid: Some(outcome.issuer_valid),
            luhn_valid: Some(outcome.luhn_valid),
            ordinal,
            context: scanner.context(&doc.text, candidate.start, candidate.end),
        });
    }

    debug!(document = %doc.id, matches = matches.len(), "document scanned");
    matches
}

/// Failure marker for a faulted document: both validity flags unknown.
fn failure_marker(document: &str, reason: &str) -> CardMatch {
    CardMatch {
        document: document.to_string(),
        card_number: String::new(),
        issuer_valid: None,
        luhn_valid: None,
        ordinal: 0,
        context: reason.to_string(),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Shared completed-document counter. The lock covers only the increment
/// and the report decision; callbacks run outside it.
struct Progress {
    state: Mutex<ProgressState>,
    total: usize,
    interval: usize,
}

struct ProgressState {
    done: usize,
    last_reported: usize,
}

impl Progress {
    fn new(total: usize, interval: usize) -> Self {
        Self {
            state: Mutex::new(ProgressState {
                done: 0,
                last_reported: 0,
            }),
            total,
            interval,
        }
    }

    /// Record one completion; returns the completed count when a
    /// notification is due.
    fn tick(&self) -> Option<usize> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.done += 1;
        let due = state.done == state.last_reported + self.interval || state.done == self.total;
        if due {
            state.last_reported = state.done;
        }
        let done = state.done;
        drop(state);
        due.then_some(done)
    }
}
