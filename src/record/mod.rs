//! Vacancy data model
//!
//! - `CandidateSummary`: one listing entry, before enrichment
//! - `DetailFields`: what the detail page yielded, each field optional
//! - `VacancyRecord`: the enriched, filtered result, with sentinels filled in

mod date;

pub use date::{try_parse_date, CalendarDate, UNKNOWN_DATE};

use chrono::NaiveDate;

/// Fallback for any missing text field
pub const UNKNOWN: &str = "Unknown";

/// Fallback for a missing school name
pub const UNKNOWN_SCHOOL: &str = "Unknown School";

/// A vacancy as summarized on a listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSummary {
    pub title: String,

    /// Listing description, lowercased
    pub description: String,

    /// Absolute URL of the detail page
    pub detail_url: String,
}

/// Raw fields extracted from a detail page
///
/// Every field is extracted independently; `None` means the page did not
/// carry it. Sentinel substitution happens in [`VacancyRecord::assemble`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailFields {
    pub employment_type: Option<String>,
    pub beginning_teacher_suitable: bool,
    pub school: Option<String>,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub authority: Option<String>,
    pub listed: Option<String>,
    pub closes: Option<String>,
    pub map_url: Option<String>,
}

impl DetailFields {
    /// Returns true if the page yielded no detail field at all
    pub fn is_empty(&self) -> bool {
        !self.beginning_teacher_suitable
            && self.employment_type.is_none()
            && self.school.is_none()
            && self.gender.is_none()
            && self.address.is_none()
            && self.authority.is_none()
            && self.listed.is_none()
            && self.closes.is_none()
            && self.map_url.is_none()
    }
}

/// A fully enriched vacancy, keyed by `detail_url`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VacancyRecord {
    pub title: String,
    pub school: String,
    pub gender: String,
    pub address: String,
    pub authority: String,
    pub employment_type: String,
    pub listed_date: CalendarDate,
    pub close_date: CalendarDate,
    pub beginning_teacher_suitable: bool,
    pub map_url: Option<String>,
    pub detail_url: String,
}

impl VacancyRecord {
    /// Combines a listing summary with its detail fields
    ///
    /// This is the one place where missing fields become sentinels.
    pub fn assemble(candidate: CandidateSummary, fields: DetailFields) -> Self {
        let text_or_unknown = |value: Option<String>| value.unwrap_or_else(|| UNKNOWN.to_string());
        let date_or_unknown = |value: Option<String>| match value {
            Some(text) => CalendarDate::from_text(text),
            None => CalendarDate::unknown(),
        };

        Self {
            title: candidate.title,
            school: fields
                .school
                .unwrap_or_else(|| UNKNOWN_SCHOOL.to_string()),
            gender: text_or_unknown(fields.gender),
            address: text_or_unknown(fields.address),
            authority: text_or_unknown(fields.authority),
            employment_type: text_or_unknown(fields.employment_type),
            listed_date: date_or_unknown(fields.listed),
            close_date: date_or_unknown(fields.closes),
            beginning_teacher_suitable: fields.beginning_teacher_suitable,
            map_url: fields.map_url,
            detail_url: candidate.detail_url,
        }
    }

    /// Structured closing date, used for ordering
    pub fn close_date_parsed(&self) -> Option<NaiveDate> {
        self.close_date.parsed()
    }
}
