/// Crawl phase definitions for the pagination controller
///
/// A crawl starts in `Start`, loops `FetchingListing → ExtractingListing →
/// FilteringCandidates → FetchingListing` while listing pages keep offering a
/// next link, and ends in `Done`.
use std::fmt;

/// Represents the current phase of one crawl invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// Crawl created, first listing URL not yet requested
    Start,

    /// Waiting on a listing page fetch
    FetchingListing,

    /// Extracting candidates and the next link from a listing page
    ExtractingListing,

    /// Filtering, enriching and collecting the page's candidates
    FilteringCandidates,

    /// Pagination exhausted, stopped by a failure, or cancelled
    Done,
}

impl CrawlPhase {
    /// Returns true if no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns true if `next` is a legal successor of this phase
    ///
    /// Any non-terminal phase may move to `Done` (cancellation, failure).
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        match (self, next) {
            (Self::Done, _) => false,
            (_, Self::Done) => true,
            (Self::Start, Self::FetchingListing) => true,
            (Self::FetchingListing, Self::ExtractingListing) => true,
            (Self::ExtractingListing, Self::FilteringCandidates) => true,
            (Self::FilteringCandidates, Self::FetchingListing) => true,
            _ => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::FetchingListing => "fetching_listing",
            Self::ExtractingListing => "extracting_listing",
            Self::FilteringCandidates => "filtering_candidates",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_terminal() {
        assert!(CrawlPhase::Done.is_terminal());

        assert!(!CrawlPhase::Start.is_terminal());
        assert!(!CrawlPhase::FetchingListing.is_terminal());
        assert!(!CrawlPhase::ExtractingListing.is_terminal());
        assert!(!CrawlPhase::FilteringCandidates.is_terminal());
    }

    #[test]
    fn test_page_loop_transitions() {
        assert!(CrawlPhase::Start.can_transition_to(CrawlPhase::FetchingListing));
        assert!(CrawlPhase::FetchingListing.can_transition_to(CrawlPhase::ExtractingListing));
        assert!(CrawlPhase::ExtractingListing.can_transition_to(CrawlPhase::FilteringCandidates));
        assert!(CrawlPhase::FilteringCandidates.can_transition_to(CrawlPhase::FetchingListing));
    }

    #[test]
    fn test_illegal_transitions() {
        assert!(!CrawlPhase::Start.can_transition_to(CrawlPhase::FilteringCandidates));
        assert!(!CrawlPhase::FetchingListing.can_transition_to(CrawlPhase::FilteringCandidates));
        assert!(!CrawlPhase::FilteringCandidates.can_transition_to(CrawlPhase::ExtractingListing));
        assert!(!CrawlPhase::Done.can_transition_to(CrawlPhase::FetchingListing));
        assert!(!CrawlPhase::Done.can_transition_to(CrawlPhase::Done));
    }

    #[test]
    fn test_any_active_phase_can_finish() {
        for phase in [
            CrawlPhase::Start,
            CrawlPhase::FetchingListing,
            CrawlPhase::ExtractingListing,
            CrawlPhase::FilteringCandidates,
        ] {
            assert!(phase.can_transition_to(CrawlPhase::Done), "{} -> done", phase);
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", CrawlPhase::Start), "start");
        assert_eq!(format!("{}", CrawlPhase::FilteringCandidates), "filtering_candidates");
        assert_eq!(format!("{}", CrawlPhase::Done), "done");
    }
}
