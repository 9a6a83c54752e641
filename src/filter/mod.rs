//! Candidate filtering
//!
//! Filtering happens in two stages, split by which page supplies the data:
//! - `pre`: listing-page fields only, applied before any detail fetch
//! - `post`: detail-page fields (employment type, beginning-teacher suitability)

pub mod post;
pub mod pre;

pub use post::PostFilterVerdict;
pub use pre::{PreFilterVerdict, EXCLUDED_TITLE_TERMS};

/// Keywords used when the supplied set normalizes to nothing
pub const DEFAULT_KEYWORDS: &[&str] = &["math", "digital"];

/// Filter criteria for one crawl
///
/// Immutable once built. `keywords` is lowercase, deduplicated, keeps first-seen
/// order and is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterConfig {
    require_beginning_teacher_suitable: bool,
    require_permanent: bool,
    keywords: Vec<String>,
}

impl FilterConfig {
    /// Builds a filter, normalizing the raw keyword entries
    ///
    /// Each entry may itself be a comma separated list.
    ///
    /// # Example
    ///
    /// ```
    /// use vacancy_sieve::FilterConfig;
    ///
    /// let filter = FilterConfig::new(false, true, ["Maths, Digital", "maths"]);
    /// assert_eq!(filter.keywords(), ["maths", "digital"]);
    /// ```
    pub fn new<I, S>(
        require_beginning_teacher_suitable: bool,
        require_permanent: bool,
        keywords: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            require_beginning_teacher_suitable,
            require_permanent,
            keywords: normalize_keywords(keywords),
        }
    }

    pub fn require_beginning_teacher_suitable(&self) -> bool {
        self.require_beginning_teacher_suitable
    }

    pub fn require_permanent(&self) -> bool {
        self.require_permanent
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self::new(false, false, DEFAULT_KEYWORDS)
    }
}

/// Normalizes raw keyword input into the filter's keyword set
///
/// # Normalization Steps
///
/// 1. Split every entry on commas
/// 2. Trim and lowercase each token
/// 3. Drop tokens without an ASCII letter
/// 4. Drop single-character tokens, except `x`
/// 5. Drop repeats, keeping the first occurrence
/// 6. Fall back to [`DEFAULT_KEYWORDS`] if nothing is left
pub fn normalize_keywords<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut keywords: Vec<String> = Vec::new();

    for entry in raw {
        for token in entry.as_ref().split(',') {
            let token = token.trim().to_lowercase();

            if !token.chars().any(|c| c.is_ascii_alphabetic()) {
                continue;
            }
            if token.chars().count() < 2 && token != "x" {
                continue;
            }
            if !keywords.contains(&token) {
                keywords.push(token);
            }
        }
    }

    if keywords.is_empty() {
        DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect()
    } else {
        keywords
    }
}
