//! Human-readable numbering: revision labels, quotation numbers and
//! entity reference numbers.

use uuid::Uuid;

use crate::errors::{Result, TaskflowError};

pub const REVISION_LABEL_PREFIX: &str = "Revised-Quotation";

const PREFIX_MIN_LEN: usize = 2;
const PREFIX_MAX_LEN: usize = 10;

/// Label for the next revision of a quotation.
///
/// `prior_count` is the number of revision rows already stored for the
/// activity reference; the suffix is that count plus one, zero-padded to
/// three digits.
///
/// ```
/// use taskflow_core::rules::numbering::revision_label;
/// assert_eq!(revision_label(2, "QT-0042"), "Revised-Quotation-003-QT-0042");
/// ```
pub fn revision_label(prior_count: u64, original_quotation_number: &str) -> String {
    format!(
        "{}-{:03}-{}",
        REVISION_LABEL_PREFIX,
        prior_count + 1,
        original_quotation_number
    )
}

/// Validate and canonicalize a quotation-number prefix.
///
/// # Errors
/// `InvalidField` unless 2–10 ASCII alphanumerics.
pub fn normalize_prefix(raw: &str) -> Result<String> {
    let prefix = raw.trim().to_ascii_uppercase();
    let len_ok = (PREFIX_MIN_LEN..=PREFIX_MAX_LEN).contains(&prefix.len());
    if len_ok && prefix.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(prefix)
    } else {
        Err(TaskflowError::InvalidField {
            field: "prefix".to_string(),
            reason: format!(
                "must be {PREFIX_MIN_LEN}-{PREFIX_MAX_LEN} letters or digits, got `{}`",
                raw.trim()
            ),
        })
    }
}

/// `<PREFIX>-<NNNN>`
pub fn quotation_number(prefix: &str, sequence: i64) -> String {
    format!("{}-{:04}", prefix, sequence)
}

/// Reference number of the form `<KIND>-<ABC>-<8 hex>` where `ABC` is
/// taken from the first three letters or digits of `seed`.
pub fn reference_number(kind: &str, seed: &str) -> String {
    let mut initials: String = seed
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(3)
        .collect::<String>()
        .to_ascii_uppercase();
    if initials.is_empty() {
        initials = "GEN".to_string();
    }
    let uuid = Uuid::new_v4().simple().to_string().to_ascii_uppercase();
    format!("{}-{}-{}", kind, initials, &uuid[..8])
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_first_revision_is_001() {
        assert_eq!(revision_label(0, "QT-0001"), "Revised-Quotation-001-QT-0001");
    }

    #[test]
    fn test_wide_counts_are_not_truncated() {
        assert_eq!(revision_label(999, "Q"), "Revised-Quotation-1000-Q");
    }

    #[test]
    fn test_prefix_rules() {
        assert_eq!(normalize_prefix(" qt ").unwrap(), "QT");
        assert!(normalize_prefix("Q").is_err());
        assert!(normalize_prefix("Q-T").is_err());
        assert!(normalize_prefix("ABCDEFGHIJK").is_err());
    }

    #[test]
    fn test_quotation_number_padding() {
        assert_eq!(quotation_number("QT", 7), "QT-0007");
        assert_eq!(quotation_number("QT", 12345), "QT-12345");
    }

    #[test]
    fn test_reference_number_shape() {
        let r = reference_number("ACT", "acme, inc.");
        assert!(r.starts_with("ACT-ACM-"));
        assert_eq!(r.len(), "ACT-ACM-".len() + 8);
        assert!(reference_number("TKT", "!!").starts_with("TKT-GEN-"));
    }

    proptest! {
        #[test]
        fn prop_revision_suffix_is_count_plus_one(count in 0u64..5000, original in "[A-Z]{2}-[0-9]{4}") {
            let label = revision_label(count, &original);
            let rest = label.strip_prefix("Revised-Quotation-").unwrap();
            let (suffix, tail) = rest.split_once('-').unwrap();
            prop_assert!(suffix.len() >= 3);
            prop_assert_eq!(suffix.parse::<u64>().unwrap(), count + 1);
            prop_assert_eq!(tail, original.as_str());
        }
    }
}
