//! CLI subcommands.

pub mod rules;
pub mod scan;

use std::path::Path;

use anyhow::Context;

use cardsweep_core::RuleRow;

/// Load raw rule rows from a CSV file with a network,ranges,length header.
pub(crate) fn load_rule_rows(path: &Path) -> anyhow::Result<Vec<RuleRow>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open rule file {}", path.display()))?;

    let mut rows = Vec::new();
    for record in reader.deserialize() {
        let row: RuleRow =
            record.with_context(|| format!("malformed rule row in {}", path.display()))?;
        rows.push(row);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_rule_rows_csv() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "network,ranges,length").unwrap();
        writeln!(file, "Visa,4,\"13, 16, 19\"").unwrap();
        writeln!(file, "Mastercard,\"2221-2720, 51-55\",16").unwrap();

        let rows = load_rule_rows(file.path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].network, "Visa");
        assert_eq!(rows[1].ranges, "2221-2720, 51-55");
    }

    #[test]
    fn test_load_rule_rows_missing_file() {
        assert!(load_rule_rows(Path::new("/nonexistent/rules.csv")).is_err());
    }
}
