//! Output module for presenting crawl results
//!
//! This module handles:
//! - Printing the sorted vacancies as a numbered list
//! - Rendering page progress as a textual bar
//! - Summarizing the crawl tally

mod console;
mod progress;
pub mod stats;

pub use console::{format_record, print_records, write_records};
pub use progress::{render_bar, ProgressBar};
pub use stats::{format_statistics, print_statistics};
