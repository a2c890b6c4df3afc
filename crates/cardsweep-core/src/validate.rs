//! Candidate classification: issuer numbering rules and the Luhn checksum.
//!
//! The two checks are independent; a candidate can pass either, both, or
//! neither, and is reported in every case.

use crate::rules::table::CompiledRules;

/// Outcome of classifying one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub issuer_valid: bool,
    pub luhn_valid: bool,
}

/// Run both checks on a digits-only candidate.
pub fn classify(rules: &CompiledRules, digits: &str) -> Classification {
    Classification {
        issuer_valid: issuer_valid(rules, digits),
        luhn_valid: luhn(digits),
    }
}

/// True when some issuer numbering rule covers the number: either a fixed
/// prefix leads it and maps to a length range covering its digit count, or
/// its leading digits at one of the configured interval widths fall into an
/// interval row whose paired length range covers the digit count.
pub fn issuer_valid(rules: &CompiledRules, digits: &str) -> bool {
    let count = digits.len() as u64;

    for prefix in rules.matching_prefixes(digits) {
        if rules
            .fixed_lengths(prefix)
            .iter()
            .any(|range| range.contains(count))
        {
            return true;
        }
    }

    for &width in rules.interval_widths() {
        let width = width as usize;
        if width > digits.len() {
            continue;
        }
        let Ok(prefix) = digits[..width].parse::<u64>() else {
            continue;
        };
        if rules.intervals().contains_pair(prefix, count) {
            return true;
        }
    }

    false
}

/// Standard Luhn check: from the last digit moving left, double every
/// second digit, sum the decimal digits of the doubled results, and accept
/// when the total is divisible by ten. Empty input is invalid.
pub fn luhn(digits: &str) -> bool {
    let mut sum = 0u32;
    let mut double = false;
    let mut seen = false;

    for b in digits.bytes().rev() {
        if !b.is_ascii_digit() {
            continue;
        }
        seen = true;
        let mut d = u32::from(b - b'0');
        if double {
            d *= 2;
        }
        sum += d / 10 + d % 10;
        double = !double;
    }

    seen && sum % 10 == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::builtin::builtin_rows;
    use crate::rules::table::{CompiledRules, RuleRow};

    fn rules() -> CompiledRules {
        CompiledRules::from_rows(builtin_rows())
    }

    #[test]
    fn test_luhn_known_numbers() {
        assert!(luhn("4111111111111111"));
        assert!(!luhn("4111111111111112"));
        assert!(luhn("5555555555554444"));
        assert!(luhn("378282246310005"));
        assert!(luhn("6011111111111117"));
        assert!(!luhn("1234567890123456"));
    }

    #[test]
    fn test_luhn_rejects_empty() {
        assert!(!luhn(""));
    }

    #[test]
    fn test_luhn_skips_stray_non_digits() {
        assert!(luhn("4111 1111 1111 1111"));
    }

    #[test]
    fn test_issuer_valid_fixed_prefix() {
        let rules = rules();
        assert!(issuer_valid(&rules, "4111111111111111")); // Visa, 16
        assert!(issuer_valid(&rules, "4222222222222")); // Visa, 13
        assert!(!issuer_valid(&rules, "41111111111111")); // Visa, 14: no such length
        assert!(issuer_valid(&rules, "378282246310005")); // Amex, 15
        assert!(!issuer_valid(&rules, "3782822463100056")); // Amex, 16: too long
    }

    #[test]
    fn test_issuer_valid_interval_prefix() {
        let rules = rules();
        assert!(issuer_valid(&rules, "2221000011111111")); // Mastercard 2-series, 16
        assert!(!issuer_valid(&rules, "22210000111111111")); // 17 digits
        assert!(issuer_valid(&rules, "6221261111111111")); // Discover 622126, 16
        assert!(!issuer_valid(&rules, "622926111111111111111")); // outside interval
    }

    #[test]
    fn test_issuer_valid_any_fixed_prefix_width_suffices() {
        // 6011 and 60 both lead; 6011 (Discover, 16-19) covers length 16
        // even though 60 (RuPay) only allows 16 as well; either rule works
        let rules = rules();
        assert!(issuer_valid(&rules, "6011000991001201"));
    }

    #[test]
    fn test_issuer_and_luhn_are_independent() {
        let rules = rules();
        // issuer-valid prefix but broken checksum
        let c = classify(&rules, "4111111111111112");
        assert!(c.issuer_valid);
        assert!(!c.luhn_valid);
        // no issuer rule at any prefix width
        let c = classify(&rules, "7777258104615895");
        assert!(!c.issuer_valid);
    }

    #[test]
    fn test_unknown_prefix_is_invalid() {
        let rules = rules();
        assert!(!issuer_valid(&rules, "8888555408546962"));
    }

    #[test]
    fn test_interval_query_skipped_when_candidate_shorter_than_width() {
        let rows = vec![RuleRow::new("Wide", "12345678901234-12345678901299", "14")];
        let rules = CompiledRules::from_rows(rows);
        // 13 digits: shorter than the only interval width
        assert!(!issuer_valid(&rules, "1234567890123"));
        assert!(issuer_valid(&rules, "12345678901250"));
    }
}
