//! Pagination controller - main crawl orchestration logic
//!
//! This module contains the loop that drives one crawl:
//! - Fetching listing pages until no next link is offered
//! - Pre-filtering candidates and skipping already-seen detail URLs
//! - Fetching, parsing and post-filtering detail pages
//! - Collecting survivors into the crawl's result aggregator
//! - Pacing, retries, cancellation and progress reporting

use crate::config::CrawlerConfig;
use crate::crawler::detail::parse_detail;
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::listing::{parse_listing, total_page_count};
use crate::crawler::progress::ProgressReporter;
use crate::crawler::retry::RetryPolicy;
use crate::filter::{post, pre, FilterConfig};
use crate::record::{CandidateSummary, VacancyRecord};
use crate::state::{CrawlPhase, CrawlState, Ordinal};
use crate::{FetchError, SieveError};
use futures::stream::{self, StreamExt};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Pacing and concurrency settings for one crawl
#[derive(Debug, Clone)]
pub struct CrawlSettings {
    /// Pause after every fetch, listing or detail
    pub request_delay: Duration,

    /// Retry policy for transient fetch failures
    pub retry: RetryPolicy,

    /// Maximum detail fetches in flight; 1 keeps the crawl strictly sequential
    pub max_concurrent_details: usize,
}

impl CrawlSettings {
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self {
            request_delay: Duration::from_millis(config.request_delay_ms),
            retry: RetryPolicy::from_config(config),
            max_concurrent_details: config.max_concurrent_details.max(1) as usize,
        }
    }
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self::from_config(&CrawlerConfig::default())
    }
}

/// Result of a finished crawl
///
/// `records` is already in presentation order. A crawl that stopped early or
/// was cancelled still carries everything collected before it stopped.
#[derive(Debug, Clone, Default)]
pub struct CrawlOutcome {
    pub records: Vec<VacancyRecord>,

    /// Listing pages fetched and processed
    pub pages_loaded: u32,

    /// Page count read from the first listing page
    pub total_pages: u32,

    /// Candidates extracted across all listing pages
    pub candidates_seen: u32,

    /// Candidates rejected by the listing-stage filter
    pub pre_filtered_out: u32,

    /// Records rejected by the detail-stage filter
    pub post_filtered_out: u32,

    /// Candidates skipped because their detail URL already produced a record
    /// or was being fetched for another candidate
    pub duplicates_skipped: u32,

    /// Detail pages that failed to fetch or parse
    pub detail_failures: u32,

    /// A later listing page failed and pagination ended there
    pub stopped_early: bool,

    /// The crawl was cancelled before pagination was exhausted
    pub cancelled: bool,
}

/// What happened to one candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CandidateOutcome {
    Admitted,
    Duplicate,
    PreFiltered,
    PostFiltered,
    Failed,
    Cancelled,
}

/// Drives the fetch, extract, filter loop across listing pages
///
/// Each call to [`Controller::run`] creates its own [`CrawlState`], so two runs
/// never share a dedup index or results.
pub struct Controller<F> {
    fetcher: F,
    filter: FilterConfig,
    settings: CrawlSettings,
    cancel: CancellationToken,
    phase: CrawlPhase,
}

impl<F: PageFetcher> Controller<F> {
    /// Creates a new controller
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Performs the page retrievals
    /// * `filter` - Criteria applied to every candidate
    /// * `settings` - Pacing, retry and concurrency settings
    pub fn new(fetcher: F, filter: FilterConfig, settings: CrawlSettings) -> Self {
        Self {
            fetcher,
            filter,
            settings,
            cancel: CancellationToken::new(),
            phase: CrawlPhase::Start,
        }
    }

    /// Replaces the cancellation token, e.g. with a child of an app-wide token
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Token that cancels this controller's crawl
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Current phase of the state machine
    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    pub fn filter(&self) -> &FilterConfig {
        &self.filter
    }

    /// Runs one crawl starting at `start_url`
    ///
    /// # Failure Policy
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | First listing page fails | Crawl fails with `SieveError` |
    /// | Later listing page fails | Pagination ends, results kept |
    /// | Detail page fails | Candidate dropped and counted |
    /// | Cancelled | Crawl ends, results kept |
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlOutcome)` - Crawl reached `Done` with sorted records
    /// * `Err(SieveError)` - The first listing page could not be fetched or parsed
    pub async fn run(
        &mut self,
        start_url: &Url,
        progress: &dyn ProgressReporter,
    ) -> Result<CrawlOutcome, SieveError> {
        self.phase = CrawlPhase::Start;

        let state = Mutex::new(CrawlState::new());
        let mut outcome = CrawlOutcome::default();
        let mut next_url = Some(start_url.clone());

        tracing::info!(
            "Starting crawl at {} (keywords: {:?})",
            start_url,
            self.filter.keywords()
        );

        while let Some(page_url) = next_url.take() {
            if self.cancel.is_cancelled() {
                outcome.cancelled = true;
                break;
            }

            let is_first_page = outcome.pages_loaded == 0;

            self.transition(CrawlPhase::FetchingListing)?;
            let html = match self.fetch_with_retry(page_url.as_str()).await {
                Ok(html) => html,
                Err(source) if is_first_page => {
                    tracing::error!("First listing page {} failed: {}", page_url, source);
                    self.finish();
                    return Err(SieveError::Fetch {
                        url: page_url.to_string(),
                        source,
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        "Listing page {} failed, ending pagination early: {}",
                        page_url,
                        e
                    );
                    outcome.stopped_early = true;
                    break;
                }
            };

            self.transition(CrawlPhase::ExtractingListing)?;
            let listing = match parse_listing(&html, &page_url) {
                Ok(listing) => listing,
                Err(source) if is_first_page => {
                    self.finish();
                    return Err(SieveError::Parse {
                        url: page_url.to_string(),
                        source,
                    });
                }
                Err(e) => {
                    tracing::warn!("Listing page {} unreadable, ending pagination early: {}", page_url, e);
                    outcome.stopped_early = true;
                    break;
                }
            };
            if is_first_page {
                outcome.total_pages = total_page_count(&html);
            }
            if listing.skipped_blocks > 0 {
                tracing::debug!(
                    "Skipped {} incomplete listing blocks on {}",
                    listing.skipped_blocks,
                    page_url
                );
            }

            self.transition(CrawlPhase::FilteringCandidates)?;
            let page_index = outcome.pages_loaded;
            outcome.candidates_seen += listing.candidates.len() as u32;
            let page_cancelled = self
                .filter_candidates(page_index, listing.candidates, &state, &mut outcome)
                .await;

            outcome.pages_loaded += 1;
            progress.report(outcome.pages_loaded, outcome.total_pages);
            tracing::info!(
                "Progress: {}/{} pages loaded, {} records kept",
                outcome.pages_loaded,
                outcome.total_pages,
                lock(&state).results().len()
            );

            if page_cancelled {
                outcome.cancelled = true;
                break;
            }

            next_url = listing.next_page_url;
        }

        self.finish();

        let state = state.into_inner().unwrap_or_else(PoisonError::into_inner);
        outcome.records = state.into_sorted();

        tracing::info!(
            "Crawl complete: {} records from {} pages ({} detail failures{}{})",
            outcome.records.len(),
            outcome.pages_loaded,
            outcome.detail_failures,
            if outcome.stopped_early { ", stopped early" } else { "" },
            if outcome.cancelled { ", cancelled" } else { "" },
        );

        Ok(outcome)
    }

    /// Processes the candidates of one listing page
    ///
    /// Candidates are started in listing order with at most
    /// `max_concurrent_details` in flight. Returns true if cancellation cut
    /// the page short.
    async fn filter_candidates(
        &self,
        page_index: u32,
        candidates: Vec<CandidateSummary>,
        state: &Mutex<CrawlState>,
        outcome: &mut CrawlOutcome,
    ) -> bool {
        let limit = self.settings.max_concurrent_details.max(1);

        let results: Vec<CandidateOutcome> = stream::iter(candidates.into_iter().enumerate())
            .map(|(position, candidate)| {
                let ordinal = Ordinal::new(page_index, position as u32);
                self.process_candidate(ordinal, candidate, state)
            })
            .buffer_unordered(limit)
            .collect()
            .await;

        let mut cancelled = false;
        for result in results {
            match result {
                CandidateOutcome::Admitted => {}
                CandidateOutcome::Duplicate => outcome.duplicates_skipped += 1,
                CandidateOutcome::PreFiltered => outcome.pre_filtered_out += 1,
                CandidateOutcome::PostFiltered => outcome.post_filtered_out += 1,
                CandidateOutcome::Failed => outcome.detail_failures += 1,
                CandidateOutcome::Cancelled => cancelled = true,
            }
        }

        cancelled || self.cancel.is_cancelled()
    }

    /// Runs one candidate through dedup, both filters and enrichment
    async fn process_candidate(
        &self,
        ordinal: Ordinal,
        candidate: CandidateSummary,
        state: &Mutex<CrawlState>,
    ) -> CandidateOutcome {
        if self.cancel.is_cancelled() {
            return CandidateOutcome::Cancelled;
        }

        let verdict = pre::evaluate(&candidate, &self.filter);
        if !verdict.is_accepted() {
            tracing::debug!("Skipping '{}': {:?}", candidate.title, verdict);
            return CandidateOutcome::PreFiltered;
        }

        let Some(claim) = DetailClaim::acquire(state, &candidate.detail_url) else {
            tracing::debug!("Already collected or in flight: {}", candidate.detail_url);
            return CandidateOutcome::Duplicate;
        };

        let html = match self.fetch_with_retry(&candidate.detail_url).await {
            Ok(html) => html,
            Err(_) if self.cancel.is_cancelled() => return CandidateOutcome::Cancelled,
            Err(e) => {
                tracing::warn!("Dropping {}: fetch failed: {}", candidate.detail_url, e);
                return CandidateOutcome::Failed;
            }
        };

        let fields = match parse_detail(&html) {
            Ok(fields) => fields,
            Err(e) => {
                tracing::warn!("Dropping {}: {}", candidate.detail_url, e);
                return CandidateOutcome::Failed;
            }
        };

        let record = VacancyRecord::assemble(candidate, fields);
        let verdict = post::evaluate(&record, &self.filter);
        if !verdict.is_accepted() {
            tracing::debug!("Skipping '{}': {:?}", record.title, verdict);
            return CandidateOutcome::PostFiltered;
        }

        let title = record.title.clone();
        if claim.admit(ordinal, record) {
            tracing::debug!("Collected '{}'", title);
            CandidateOutcome::Admitted
        } else {
            CandidateOutcome::Duplicate
        }
    }

    /// Fetches a URL, retrying transient failures
    ///
    /// The request delay is applied after every attempt, successful or not;
    /// backoff comes on top of it before a retry.
    async fn fetch_with_retry(&self, url: &str) -> Result<String, FetchError> {
        let mut attempt = 0;

        loop {
            let result = self.fetcher.fetch(url).await;
            self.pause(self.settings.request_delay).await;

            match result {
                Ok(body) => return Ok(body),
                Err(e)
                    if e.is_retriable()
                        && attempt < self.settings.retry.max_retries
                        && !self.cancel.is_cancelled() =>
                {
                    let delay = self.settings.retry.backoff_delay(attempt);
                    attempt += 1;
                    tracing::warn!(
                        "Fetch of {} failed ({}), retry {}/{} in {:?}",
                        url,
                        e,
                        attempt,
                        self.settings.retry.max_retries,
                        delay
                    );
                    self.pause(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Sleeps for `duration`, waking early on cancellation
    async fn pause(&self, duration: Duration) {
        if duration.is_zero() {
            return;
        }
        tokio::select! {
            _ = tokio::time::sleep(duration) => {}
            _ = self.cancel.cancelled() => {}
        }
    }

    fn transition(&mut self, next: CrawlPhase) -> Result<(), SieveError> {
        if !self.phase.can_transition_to(next) {
            return Err(SieveError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        tracing::trace!("Crawl phase {} -> {}", self.phase, next);
        self.phase = next;
        Ok(())
    }

    fn finish(&mut self) {
        if !self.phase.is_terminal() {
            tracing::trace!("Crawl phase {} -> {}", self.phase, CrawlPhase::Done);
            self.phase = CrawlPhase::Done;
        }
    }
}

fn lock(state: &Mutex<CrawlState>) -> MutexGuard<'_, CrawlState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Exclusive right to fetch one detail URL
///
/// Released on drop unless the record was admitted, so an early return frees
/// the URL for a later candidate.
struct DetailClaim<'a> {
    state: &'a Mutex<CrawlState>,
    url: String,
    settled: bool,
}

impl<'a> DetailClaim<'a> {
    fn acquire(state: &'a Mutex<CrawlState>, url: &str) -> Option<Self> {
        if !lock(state).try_claim(url) {
            return None;
        }
        Some(Self {
            state,
            url: url.to_string(),
            settled: false,
        })
    }

    fn admit(mut self, ordinal: Ordinal, record: VacancyRecord) -> bool {
        self.settled = true;
        let mut state = lock(self.state);
        state.admit(ordinal, record)
    }
}

impl Drop for DetailClaim<'_> {
    fn drop(&mut self) {
        if !self.settled {
            lock(self.state).release(&self.url);
        }
    }
}
