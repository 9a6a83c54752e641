//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlPhase`: the pagination controller's state machine
//! - `CrawlState`: per-crawl dedup index and result aggregator

mod crawl_state;
mod phase;

// Re-export main types
pub use crawl_state::{CrawlState, DedupIndex, Ordinal, ResultAggregator};
pub use phase::CrawlPhase;
