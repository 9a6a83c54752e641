//! Calendar dates as shown on vacancy pages

use chrono::NaiveDate;
use std::fmt;

/// Display text for a date that is absent from the page
pub const UNKNOWN_DATE: &str = "Unknown";

/// Formats tried in order; `%b` covers "Jan", `%B` covers "January"
const DATE_FORMATS: &[&str] = &["%d %b %Y", "%d %B %Y"];

/// A date exactly as displayed, plus its structured value when it parses
///
/// The structured value is only used for ordering; the display text is always
/// kept so an unparseable date still renders as the page showed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDate {
    display: String,
    parsed: Option<NaiveDate>,
}

impl CalendarDate {
    /// Builds a date from its display text, parsing it if possible
    pub fn from_text(text: impl Into<String>) -> Self {
        let display = text.into();
        let parsed = try_parse_date(&display);
        Self { display, parsed }
    }

    /// The sentinel for a date missing from the page
    pub fn unknown() -> Self {
        Self {
            display: UNKNOWN_DATE.to_string(),
            parsed: None,
        }
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn parsed(&self) -> Option<NaiveDate> {
        self.parsed
    }

    pub fn is_parsed(&self) -> bool {
        self.parsed.is_some()
    }
}

impl Default for CalendarDate {
    fn default() -> Self {
        Self::unknown()
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

/// Parses `<day> <month> <year>` with a short or full month name
///
/// Commas are treated as spaces and runs of whitespace collapse, so
/// "27 Jan, 2026" parses too. Anything mentioning "unknown" or of another
/// shape yields `None`; the failure never propagates.
///
/// # Examples
///
/// ```
/// use vacancy_sieve::record::try_parse_date;
///
/// assert_eq!(try_parse_date("27 Jan 2026"), try_parse_date("27 January 2026"));
/// assert!(try_parse_date("Unknown").is_none());
/// ```
pub fn try_parse_date(text: &str) -> Option<NaiveDate> {
    if text.to_lowercase().contains("unknown") {
        return None;
    }

    let cleaned = text
        .replace(',', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if cleaned.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(&cleaned, format).ok())
}
