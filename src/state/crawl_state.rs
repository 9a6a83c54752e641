use crate::record::VacancyRecord;
use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

/// Discovery position of a record: listing page index and position on the page
///
/// Used as the tie-break when closing dates are equal or unparsed, so the sorted
/// output does not depend on the order in which detail fetches completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ordinal {
    pub page: u32,
    pub position: u32,
}

impl Ordinal {
    pub fn new(page: u32, position: u32) -> Self {
        Self { page, position }
    }
}

/// Set of detail URLs that have already produced a record
#[derive(Debug, Clone, Default)]
pub struct DedupIndex {
    seen: HashSet<String>,
}

impl DedupIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seen_before(&self, url: &str) -> bool {
        self.seen.contains(url)
    }

    /// Marks a URL as seen; returns false if it already was
    pub fn mark_seen(&mut self, url: &str) -> bool {
        self.seen.insert(url.to_string())
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[derive(Debug, Clone)]
struct AggregatedRecord {
    ordinal: Ordinal,
    record: VacancyRecord,
}

/// Records collected by one crawl, keyed by detail URL
///
/// # Ordering
///
/// [`ResultAggregator::sorted`] orders by parsed closing date ascending. Records
/// without a parsed date come after every dated record. Ties keep insertion
/// order.
#[derive(Debug, Clone, Default)]
pub struct ResultAggregator {
    records: HashMap<String, AggregatedRecord>,
    next_position: u32,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record after every record inserted so far
    ///
    /// Returns false, leaving the existing record in place, if the URL is
    /// already present.
    pub fn insert(&mut self, record: VacancyRecord) -> bool {
        let ordinal = Ordinal::new(u32::MAX, self.next_position);
        self.insert_at(ordinal, record)
    }

    /// Inserts a record at an explicit discovery position
    pub fn insert_at(&mut self, ordinal: Ordinal, record: VacancyRecord) -> bool {
        match self.records.entry(record.detail_url.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(AggregatedRecord { ordinal, record });
                self.next_position = self.next_position.saturating_add(1);
                true
            }
        }
    }

    pub fn contains(&self, url: &str) -> bool {
        self.records.contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the records in presentation order
    pub fn sorted(&self) -> Vec<VacancyRecord> {
        let mut entries: Vec<&AggregatedRecord> = self.records.values().collect();
        entries.sort_by(|a, b| compare_entries(a, b));
        entries.into_iter().map(|e| e.record.clone()).collect()
    }

    /// Consumes the aggregator, returning the records in presentation order
    pub fn into_sorted(self) -> Vec<VacancyRecord> {
        let mut entries: Vec<AggregatedRecord> = self.records.into_values().collect();
        entries.sort_by(compare_entries);
        entries.into_iter().map(|e| e.record).collect()
    }
}

fn compare_entries(a: &AggregatedRecord, b: &AggregatedRecord) -> Ordering {
    let a_date = a.record.close_date_parsed();
    let b_date = b.record.close_date_parsed();

    // unparsed dates sort last
    a_date
        .is_none()
        .cmp(&b_date.is_none())
        .then_with(|| a_date.cmp(&b_date))
        .then_with(|| a.ordinal.cmp(&b.ordinal))
}

/// All mutable state of one crawl invocation
///
/// Owned by the controller for the lifetime of a single crawl; never shared
/// between crawls.
///
/// A detail URL is either free, claimed (its detail page is being fetched) or
/// seen (it produced a record). Only one worker holds the claim on a URL.
#[derive(Debug, Clone, Default)]
pub struct CrawlState {
    seen: DedupIndex,
    in_flight: HashSet<String>,
    results: ResultAggregator,
}

impl CrawlState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seen_before(&self, url: &str) -> bool {
        self.seen.seen_before(url)
    }

    /// Claims a URL for a detail fetch
    ///
    /// Returns false if the URL is already seen or claimed by another worker.
    pub fn try_claim(&mut self, url: &str) -> bool {
        if self.seen.seen_before(url) || self.in_flight.contains(url) {
            return false;
        }
        self.in_flight.insert(url.to_string())
    }

    /// Gives up a claim without producing a record, so a later candidate may
    /// fetch the URL again
    pub fn release(&mut self, url: &str) {
        self.in_flight.remove(url);
    }

    pub fn is_claimed(&self, url: &str) -> bool {
        self.in_flight.contains(url)
    }

    /// Marks the record's URL seen and stores the record
    ///
    /// Clears any claim on the URL. Returns false if the URL was already seen;
    /// the record is then dropped. Every stored key is therefore also in the
    /// seen set.
    pub fn admit(&mut self, ordinal: Ordinal, record: VacancyRecord) -> bool {
        self.in_flight.remove(&record.detail_url);
        if !self.seen.mark_seen(&record.detail_url) {
            return false;
        }
        self.results.insert_at(ordinal, record)
    }

    pub fn seen(&self) -> &DedupIndex {
        &self.seen
    }

    pub fn results(&self) -> &ResultAggregator {
        &self.results
    }

    /// Ends the crawl state, returning the sorted records
    pub fn into_sorted(self) -> Vec<VacancyRecord> {
        self.results.into_sorted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{CandidateSummary, DetailFields};

    fn record(url: &str, closes: &str) -> VacancyRecord {
        VacancyRecord::assemble(
            CandidateSummary {
                title: format!("Teacher {}", url),
                description: String::new(),
                detail_url: url.to_string(),
            },
            DetailFields {
                closes: Some(closes.to_string()),
                ..DetailFields::default()
            },
        )
    }

    fn closes(records: &[VacancyRecord]) -> Vec<(&str, &str)> {
        records
            .iter()
            .map(|r| (r.close_date.display(), r.detail_url.as_str()))
            .collect()
    }

    #[test]
    fn test_stable_sort_unparsed_last() {
        let mut aggregator = ResultAggregator::new();
        aggregator.insert(record("a", "05 Jan 2026"));
        aggregator.insert(record("b", "Unknown"));
        aggregator.insert(record("c", "01 Jan 2026"));
        aggregator.insert(record("d", "Unknown"));

        assert_eq!(
            closes(&aggregator.sorted()),
            [
                ("01 Jan 2026", "c"),
                ("05 Jan 2026", "a"),
                ("Unknown", "b"),
                ("Unknown", "d"),
            ]
        );
    }

    #[test]
    fn test_sort_mixes_month_forms() {
        let mut aggregator = ResultAggregator::new();
        aggregator.insert(record("a", "28 Jan 2026"));
        aggregator.insert(record("b", "27 January 2026"));
        aggregator.insert(record("c", "3 February 2026"));

        let sorted = aggregator.into_sorted();
        let urls: Vec<_> = sorted.iter().map(|r| r.detail_url.as_str()).collect();
        assert_eq!(urls, ["b", "a", "c"]);
    }

    #[test]
    fn test_sort_independent_of_completion_order() {
        let mut forward = ResultAggregator::new();
        forward.insert_at(Ordinal::new(0, 0), record("a", "Unknown"));
        forward.insert_at(Ordinal::new(0, 1), record("b", "10 Mar 2026"));
        forward.insert_at(Ordinal::new(1, 0), record("c", "Unknown"));

        let mut reversed = ResultAggregator::new();
        reversed.insert_at(Ordinal::new(1, 0), record("c", "Unknown"));
        reversed.insert_at(Ordinal::new(0, 1), record("b", "10 Mar 2026"));
        reversed.insert_at(Ordinal::new(0, 0), record("a", "Unknown"));

        assert_eq!(forward.sorted(), reversed.sorted());
        assert_eq!(closes(&forward.sorted())[1], ("Unknown", "a"));
    }

    #[test]
    fn test_aggregator_keeps_first_record_per_url() {
        let mut aggregator = ResultAggregator::new();
        assert!(aggregator.insert(record("a", "05 Jan 2026")));
        assert!(!aggregator.insert(record("a", "01 Jan 2026")));

        assert_eq!(aggregator.len(), 1);
        assert_eq!(aggregator.sorted()[0].close_date.display(), "05 Jan 2026");
    }

    #[test]
    fn test_dedup_index() {
        let mut index = DedupIndex::new();
        assert!(!index.seen_before("a"));
        assert!(index.mark_seen("a"));
        assert!(index.seen_before("a"));
        assert!(!index.mark_seen("a"));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_crawl_state_admits_once() {
        let mut state = CrawlState::new();
        assert!(state.admit(Ordinal::new(0, 0), record("a", "05 Jan 2026")));
        assert!(!state.admit(Ordinal::new(1, 3), record("a", "05 Jan 2026")));

        assert!(state.seen_before("a"));
        assert_eq!(state.results().len(), 1);
        assert!(state.results().contains("a"));
        assert_eq!(state.into_sorted().len(), 1);
    }

    #[test]
    fn test_claim_is_exclusive() {
        let mut state = CrawlState::new();
        assert!(state.try_claim("a"));
        assert!(!state.try_claim("a"));
        assert!(state.is_claimed("a"));

        state.release("a");
        assert!(!state.is_claimed("a"));
        assert!(state.try_claim("a"));
    }

    #[test]
    fn test_admit_turns_claim_into_seen() {
        let mut state = CrawlState::new();
        assert!(state.try_claim("a"));
        assert!(state.admit(Ordinal::new(0, 0), record("a", "05 Jan 2026")));

        assert!(!state.is_claimed("a"));
        assert!(state.seen_before("a"));
        assert!(!state.try_claim("a"));
    }
}
