//! Issuer numbering rules: raw-text parsing, index construction, and the
//! compiled lookup form shared by the scanner workers.

pub mod builtin;
pub mod intervals;
pub mod parse;
pub mod table;
pub mod trie;

pub use builtin::builtin_rows;
pub use intervals::{Interval, IntervalIndex};
pub use table::{CompiledRules, RuleRow, RuleTable, RuleTableBuilder};
pub use trie::PrefixTrie;
