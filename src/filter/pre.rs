//! Listing-stage filter
//!
//! Runs on [`CandidateSummary`] values straight off the listing page, so a
//! rejected candidate never costs a detail fetch.

use crate::filter::FilterConfig;
use crate::record::CandidateSummary;

/// Title fragments that mark leadership roles; these are never wanted
pub const EXCLUDED_TITLE_TERMS: &[&str] = &["principal", "deputy"];

/// Outcome of the listing-stage filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreFilterVerdict {
    Accepted,
    /// Title contains one of [`EXCLUDED_TITLE_TERMS`]
    ExcludedTitle(&'static str),
    /// No keyword occurs in the title or description
    NoKeyword,
}

impl PreFilterVerdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Evaluates a candidate against the listing-stage rules
///
/// The exclusion check runs first, so an excluded title is rejected even when
/// it also matches a keyword. Keyword matching is plain substring matching:
/// `math` matches `mathematics`.
pub fn evaluate(candidate: &CandidateSummary, config: &FilterConfig) -> PreFilterVerdict {
    let title = candidate.title.to_lowercase();

    if let Some(term) = EXCLUDED_TITLE_TERMS
        .iter()
        .copied()
        .find(|term| title.contains(term))
    {
        return PreFilterVerdict::ExcludedTitle(term);
    }

    // description is lowercased at extraction; lowercase again for hand-built candidates
    let description = candidate.description.to_lowercase();
    let matched = config
        .keywords()
        .iter()
        .any(|keyword| title.contains(keyword.as_str()) || description.contains(keyword.as_str()));

    if matched {
        PreFilterVerdict::Accepted
    } else {
        PreFilterVerdict::NoKeyword
    }
}

/// Returns true if the candidate passes the listing-stage filter
pub fn accept(candidate: &CandidateSummary, config: &FilterConfig) -> bool {
    evaluate(candidate, config).is_accepted()
}
