#![allow(clippy::unwrap_used, clippy::expect_used)]

use taskflow_core::rules::duplicate::{normalize_company_name, prepare_query, similarity};
use taskflow_core::rules::numbering::{normalize_prefix, quotation_number, revision_label};
use taskflow_core::TaskflowError;

#[test]
fn test_third_revision_label() {
    // Two revisions already stored for the activity.
    assert_eq!(revision_label(2, "QT-0042"), "Revised-Quotation-003-QT-0042");
}

#[test]
fn test_generated_numbers_use_canonical_prefix() {
    let prefix = normalize_prefix("qt").unwrap();
    assert_eq!(quotation_number(&prefix, 1), "QT-0001");
}

#[test]
fn test_duplicate_query_below_minimum() {
    assert!(matches!(
        prepare_query("Al"),
        Err(TaskflowError::CompanyNameTooShort { min_len: 3 })
    ));
}

#[test]
fn test_legal_forms_do_not_hide_duplicates() {
    let a = normalize_company_name("Northwind Traders, Inc.");
    let b = normalize_company_name("NORTHWIND TRADERS CORPORATION");
    assert_eq!(similarity(&a, &b), Some(1.0));
}

#[test]
fn test_ampersand_and_word_and_match() {
    let a = normalize_company_name("Smith & Wesson");
    let b = normalize_company_name("Smith and Wesson Co.");
    assert_eq!(a, b);
}
