//! Crawl tally display
//!
//! Summarizes a [`CrawlOutcome`] the way the crawl ended: how many listing
//! pages were walked and where candidates dropped out of the pipeline.

use crate::crawler::CrawlOutcome;

/// Builds the statistics block for an outcome
pub fn format_statistics(outcome: &CrawlOutcome) -> String {
    let mut lines = vec![
        "=== Crawl Statistics ===".to_string(),
        String::new(),
        format!(
            "  Listing pages loaded: {} (reported: {})",
            outcome.pages_loaded, outcome.total_pages
        ),
        format!("  Candidates seen: {}", outcome.candidates_seen),
        format!("  Rejected by listing filter: {}", outcome.pre_filtered_out),
        format!("  Rejected by detail filter: {}", outcome.post_filtered_out),
        format!("  Duplicates skipped: {}", outcome.duplicates_skipped),
        format!("  Detail pages failed: {}", outcome.detail_failures),
        format!("  Vacancies kept: {}", outcome.records.len()),
    ];

    if outcome.stopped_early {
        lines.push(String::new());
        lines.push("Pagination ended early after a listing page failed.".to_string());
    }
    if outcome.cancelled {
        lines.push(String::new());
        lines.push("Crawl was cancelled; results are partial.".to_string());
    }

    lines.join("\n")
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `outcome` - The finished crawl to summarize
pub fn print_statistics(outcome: &CrawlOutcome) {
    println!("{}", format_statistics(outcome));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statistics_tally() {
        let outcome = CrawlOutcome {
            pages_loaded: 3,
            total_pages: 2,
            candidates_seen: 40,
            pre_filtered_out: 30,
            post_filtered_out: 4,
            duplicates_skipped: 1,
            detail_failures: 2,
            ..CrawlOutcome::default()
        };
        let text = format_statistics(&outcome);

        assert!(text.contains("Listing pages loaded: 3 (reported: 2)"));
        assert!(text.contains("Candidates seen: 40"));
        assert!(text.contains("Detail pages failed: 2"));
        assert!(text.contains("Vacancies kept: 0"));
        assert!(!text.contains("cancelled"));
    }

    #[test]
    fn test_statistics_flags() {
        let outcome = CrawlOutcome {
            stopped_early: true,
            cancelled: true,
            ..CrawlOutcome::default()
        };
        let text = format_statistics(&outcome);

        assert!(text.contains("ended early"));
        assert!(text.contains("cancelled"));
    }
}
