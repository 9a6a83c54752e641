//! URL handling module for Vacancy Sieve
//!
//! This module builds the first listing URL from the configured search
//! parameters and resolves the links found on fetched pages.

mod listing;
mod resolve;

// Re-export main functions
pub use listing::{listing_start_url, ListingQuery};
pub use resolve::resolve_link;
