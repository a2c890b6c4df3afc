//! Rule-table construction and the compiled, queryable form.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::intervals::{Interval, IntervalIndex};
use super::parse::{parse_lengths, parse_ranges};
use super::trie::PrefixTrie;

/// One raw issuer numbering row: a network name plus the free-text prefix
/// ranges and permitted lengths published for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleRow {
    pub network: String,
    pub ranges: String,
    pub length: String,
}

impl RuleRow {
    pub fn new(
        network: impl Into<String>,
        ranges: impl Into<String>,
        length: impl Into<String>,
    ) -> Self {
        Self {
            network: network.into(),
            ranges: ranges.into(),
            length: length.into(),
        }
    }
}

/// Serializable snapshot of the compiled lookup structures.
///
/// Round-trips verbatim through serde; the storage format is the caller's
/// choice. [`CompiledRules::compile`] rebuilds everything else from it,
/// including the prefix automaton (the fixed keys are its prefix set).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleTable {
    /// Fixed prefix value -> ordered permitted length ranges. A prefix may
    /// map to several disjoint ranges contributed by different rows.
    pub fixed: BTreeMap<u64, Vec<Interval>>,

    /// Paired (prefix interval, length interval) rows.
    pub intervals: IntervalIndex,
}

/// Accumulates raw rows and builds the rule table.
#[derive(Debug, Default)]
pub struct RuleTableBuilder {
    rows: Vec<RuleRow>,
}

impl RuleTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: RuleRow) -> &mut Self {
        self.rows.push(row);
        self
    }

    pub fn extend(&mut self, rows: impl IntoIterator<Item = RuleRow>) -> &mut Self {
        self.rows.extend(rows);
        self
    }

    /// Cross every prefix of each row with every length range of that row.
    ///
    /// A row whose prefix or length text yields nothing contributes
    /// nothing, silently: absence only reduces recall, never produces
    /// false positives.
    pub fn build(self) -> RuleTable {
        let mut fixed: BTreeMap<u64, Vec<Interval>> = BTreeMap::new();
        let mut pairs = Vec::new();

        for row in &self.rows {
            let (fixed_prefixes, prefix_intervals) = parse_ranges(&row.ranges);
            let lengths = parse_lengths(&row.length);

            if (fixed_prefixes.is_empty() && prefix_intervals.is_empty()) || lengths.is_empty() {
                debug!(network = %row.network, "rule row contributes nothing");
                continue;
            }

            for &prefix in &fixed_prefixes {
                fixed.entry(prefix).or_default().extend(lengths.iter());
            }
            for &interval in &prefix_intervals {
                for &length in &lengths {
                    pairs.push((interval, length));
                }
            }
        }

        for ranges in fixed.values_mut() {
            ranges.sort();
            ranges.dedup();
        }

        RuleTable {
            fixed,
            intervals: IntervalIndex::new(pairs),
        }
    }
}

/// Immutable compiled form, shared read-only across scan workers.
#[derive(Debug, Clone)]
pub struct CompiledRules {
    table: RuleTable,
    trie: PrefixTrie,
    /// Digit-widths observed among interval-prefix endpoints. Interval
    /// queries are attempted only at these widths.
    interval_widths: BTreeSet<u32>,
}

impl CompiledRules {
    /// Compile a snapshot into its queryable form.
    pub fn compile(table: RuleTable) -> Self {
        let trie = PrefixTrie::new(table.fixed.keys().copied());
        let interval_widths = table.intervals.endpoint_widths();
        Self {
            table,
            trie,
            interval_widths,
        }
    }

    /// Build and compile in one step.
    pub fn from_rows(rows: impl IntoIterator<Item = RuleRow>) -> Self {
        let mut builder = RuleTableBuilder::new();
        builder.extend(rows);
        Self::compile(builder.build())
    }

    /// The serializable snapshot this was compiled from.
    pub fn snapshot(&self) -> &RuleTable {
        &self.table
    }

    /// Every configured fixed prefix leading `digits`.
    pub fn matching_prefixes(&self, digits: &str) -> Vec<u64> {
        self.trie.matching_prefixes(digits)
    }

    /// Permitted length ranges for a fixed prefix.
    pub fn fixed_lengths(&self, prefix: u64) -> &[Interval] {
        self.table
            .fixed
            .get(&prefix)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn intervals(&self) -> &IntervalIndex {
        &self.table.intervals
    }

    pub fn interval_widths(&self) -> &BTreeSet<u32> {
        &self.interval_widths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rows() -> Vec<RuleRow> {
        vec![
            RuleRow::new("Visa", "4", "13, 16, 19"),
            RuleRow::new("Mastercard", "2221-2720, 51-55", "16"),
            RuleRow::new("Discover", "6011, 622126-622925, 644-649, 65", "16-19"),
        ]
    }

    #[test]
    fn test_build_crosses_prefixes_with_lengths() {
        let mut builder = RuleTableBuilder::new();
        builder.extend(sample_rows());
        let table = builder.build();

        assert_eq!(
            table.fixed.get(&4).unwrap(),
            &vec![
                Interval::point(13),
                Interval::point(16),
                Interval::point(19)
            ]
        );
        assert_eq!(
            table.fixed.get(&6011).unwrap(),
            &vec![Interval::new(16, 19)]
        );
        // 2 Mastercard intervals x 1 length + 2 Discover intervals x 1 length
        assert_eq!(table.intervals.len(), 4);
    }

    #[test]
    fn test_unparseable_row_contributes_nothing() {
        let mut builder = RuleTableBuilder::new();
        builder.push(RuleRow::new("Mystery", "see note", "varies"));
        builder.push(RuleRow::new("Visa", "4", "16"));
        let table = builder.build();

        assert_eq!(table.fixed.len(), 1);
        assert!(table.intervals.is_empty());
    }

    #[test]
    fn test_row_without_lengths_contributes_nothing() {
        let mut builder = RuleTableBuilder::new();
        builder.push(RuleRow::new("Visa", "4", ""));
        let table = builder.build();
        assert!(table.fixed.is_empty());
    }

    #[test]
    fn test_duplicate_length_ranges_deduped() {
        let mut builder = RuleTableBuilder::new();
        builder.push(RuleRow::new("Discover", "65", "16-19"));
        builder.push(RuleRow::new("Troy", "65", "16-19"));
        let table = builder.build();
        assert_eq!(table.fixed.get(&65).unwrap(), &vec![Interval::new(16, 19)]);
    }

    #[test]
    fn test_compile_derives_widths_and_trie() {
        let rules = CompiledRules::from_rows(sample_rows());
        let widths: Vec<u32> = rules.interval_widths().iter().copied().collect();
        assert_eq!(widths, vec![2, 3, 4, 6]);
        assert_eq!(rules.matching_prefixes("4111111111111111"), vec![4]);
        assert_eq!(rules.fixed_lengths(9999), &[]);
    }

    #[test]
    fn test_snapshot_round_trip_is_verbatim() {
        let rules = CompiledRules::from_rows(sample_rows());
        let json = serde_json::to_string(rules.snapshot()).unwrap();
        let restored: RuleTable = serde_json::from_str(&json).unwrap();
        assert_eq!(&restored, rules.snapshot());
    }
}
