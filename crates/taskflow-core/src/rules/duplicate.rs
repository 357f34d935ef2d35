//! Fuzzy duplicate detection for company names
//!
//! Candidates come from a coarse `LIKE` prefilter in the store; this module
//! does the precise comparison on normalized names.

use serde::Serialize;

use crate::errors::{Result, TaskflowError};
use crate::model::Account;

/// Shortest query that is worth searching for
pub const MIN_QUERY_LEN: usize = 3;

/// Minimum normalized Levenshtein similarity for a fuzzy hit
pub const SIMILARITY_THRESHOLD: f64 = 0.85;

pub const MAX_MATCHES: usize = 10;

const LEGAL_SUFFIXES: &[&str] = &[
    "inc",
    "incorporated",
    "corp",
    "corporation",
    "co",
    "company",
    "ltd",
    "limited",
    "llc",
    "opc",
    "enterprise",
    "enterprises",
];

/// An existing account that looks like the queried company
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateMatch {
    pub id: String,
    pub account_reference_number: String,
    pub company_name: String,
    pub referenceid: String,
    pub status: String,
    /// 1.0 for an exact normalized match
    pub score: f64,
}

/// Canonical comparison form of a company name.
///
/// ```
/// use taskflow_core::rules::duplicate::normalize_company_name;
/// assert_eq!(normalize_company_name("  Acme & Sons, Inc. "), "acme and sons");
/// ```
pub fn normalize_company_name(name: &str) -> String {
    let lowered = name.to_lowercase().replace('&', " and ");
    let spaced: String = lowered
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    let mut tokens: Vec<&str> = spaced.split_whitespace().collect();
    while tokens.len() > 1 && tokens.last().is_some_and(|t| LEGAL_SUFFIXES.contains(t)) {
        tokens.pop();
    }
    tokens.join(" ")
}

/// Validate a duplicate-check query and return its normalized form.
///
/// # Errors
/// `CompanyNameTooShort` when the trimmed query has fewer than
/// [`MIN_QUERY_LEN`] characters, or normalizes to nothing.
pub fn prepare_query(company_name: &str) -> Result<String> {
    let trimmed = company_name.trim();
    let normalized = normalize_company_name(trimmed);
    if trimmed.chars().count() < MIN_QUERY_LEN || normalized.is_empty() {
        return Err(TaskflowError::CompanyNameTooShort {
            min_len: MIN_QUERY_LEN,
        });
    }
    Ok(normalized)
}

/// Token used for the store-side `LIKE` prefilter.
pub fn prefilter_token(normalized_query: &str) -> &str {
    normalized_query
        .split_whitespace()
        .next()
        .unwrap_or(normalized_query)
}

/// Similarity of two normalized names, or `None` if they do not match.
pub fn similarity(a: &str, b: &str) -> Option<f64> {
    if a.is_empty() || b.is_empty() {
        return None;
    }
    if a == b {
        return Some(1.0);
    }
    let fuzzy = strsim::normalized_levenshtein(a, b);
    if fuzzy >= SIMILARITY_THRESHOLD {
        return Some(fuzzy);
    }
    // Either name contains the other: "acme" vs "acme trading".
    if a.contains(b) || b.contains(a) {
        return Some(fuzzy.max(SIMILARITY_THRESHOLD));
    }
    None
}

/// Score candidates against a normalized query, best first.
pub fn rank_candidates(normalized_query: &str, candidates: &[Account]) -> Vec<DuplicateMatch> {
    let mut matches: Vec<DuplicateMatch> = candidates
        .iter()
        .filter_map(|account| {
            let other = normalize_company_name(&account.company_name);
            similarity(normalized_query, &other).map(|score| DuplicateMatch {
                id: account.id.clone(),
                account_reference_number: account.account_reference_number.clone(),
                company_name: account.company_name.clone(),
                referenceid: account.referenceid.clone(),
                status: account.status.to_string(),
                score,
            })
        })
        .collect();
    matches.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.company_name.cmp(&b.company_name))
    });
    matches.truncate(MAX_MATCHES);
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AccountStatus;
    use chrono::Utc;

    fn account(name: &str) -> Account {
        let now = Utc::now();
        Account {
            id: format!("id-{name}"),
            account_reference_number: format!("ACC-{name}"),
            referenceid: "TSA-1".into(),
            tsm: None,
            manager: None,
            company_name: name.into(),
            contact_person: None,
            contact_number: None,
            email_address: None,
            address: None,
            region: None,
            industry: None,
            type_client: None,
            status: AccountStatus::Active,
            transfer_to: None,
            remarks: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_normalize_strips_legal_forms_and_punctuation() {
        assert_eq!(normalize_company_name("ACME Corp."), "acme");
        assert_eq!(normalize_company_name("Acme Trading Co., Ltd"), "acme trading");
        // A name that is only a legal form keeps it.
        assert_eq!(normalize_company_name("Company"), "company");
    }

    #[test]
    fn test_short_query_rejected() {
        assert_eq!(
            prepare_query(" ab "),
            Err(TaskflowError::CompanyNameTooShort { min_len: 3 })
        );
        assert!(prepare_query("...").is_err());
        assert_eq!(prepare_query("Acme Inc").unwrap(), "acme");
    }

    #[test]
    fn test_similarity_rules() {
        assert_eq!(similarity("acme", "acme"), Some(1.0));
        assert!(similarity("acme trading", "acme tradng").is_some());
        assert!(similarity("acme", "acme trading").is_some());
        assert!(similarity("acme", "acmeville").is_some());
        assert!(similarity("acme trading", "trading").is_some());
        assert!(similarity("acme", "zenith").is_none());
    }

    #[test]
    fn test_rank_puts_exact_first() {
        let candidates = vec![
            account("Acme Trading"),
            account("ACME, Inc."),
            account("Zenith Foods"),
        ];
        let ranked = rank_candidates("acme", &candidates);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].company_name, "ACME, Inc.");
        assert_eq!(ranked[0].score, 1.0);
    }

    #[test]
    fn test_prefilter_token() {
        assert_eq!(prefilter_token("acme trading"), "acme");
    }
}
