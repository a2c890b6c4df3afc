//! Built-in issuer numbering rows.
//!
//! The published numbering table for the major card networks, kept in the
//! same raw text form an external rule file uses so the bundled rows
//! exercise the same parser.

use super::table::RuleRow;

const BUILTIN_ROWS: &[(&str, &str, &str)] = &[
    ("American Express", "34, 37", "15"),
    ("Dankort", "5019", "16"),
    ("Diners Club International", "36, 300-305, 3095, 38-39", "14-19"),
    ("Discover", "6011, 622126-622925, 644-649, 65", "16-19"),
    ("InstaPayment", "637-639", "16"),
    ("InterPayment", "636", "16-19"),
    ("JCB", "3528-3589", "16-19"),
    ("Maestro", "50, 56-69", "12-19"),
    ("Mastercard", "2221-2720, 51-55", "16"),
    ("Mir", "2200-2204", "16-19"),
    ("RuPay", "60, 65, 81, 82, 508", "16"),
    ("Troy", "65, 9792", "16"),
    ("UATP", "1", "15"),
    ("UnionPay", "62", "16-19"),
    ("Verve", "506099-506198, 650002-650027", "16, 19"),
    ("Visa", "4", "13, 16, 19"),
];

/// The rule rows compiled into the binary.
pub fn builtin_rows() -> Vec<RuleRow> {
    BUILTIN_ROWS
        .iter()
        .map(|&(network, ranges, length)| RuleRow::new(network, ranges, length))
        .collect()
}
