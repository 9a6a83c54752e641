//! Textual progress bar on stderr

use crate::crawler::ProgressReporter;
use std::io::{self, Write};

const BAR_WIDTH: usize = 30;

/// Renders `[████------] 2/5 pages loaded...`
///
/// The filled share is clamped to the bar, so a crawl that loads more pages
/// than first reported shows a full bar rather than overflowing.
pub fn render_bar(current: u32, total: u32, width: usize) -> String {
    let ratio = if total == 0 {
        0.0
    } else {
        (current as f64 / total as f64).clamp(0.0, 1.0)
    };
    let filled = (width as f64 * ratio) as usize;

    format!(
        "[{}{}] {}/{} pages loaded...",
        "█".repeat(filled),
        "-".repeat(width - filled),
        current,
        total
    )
}

/// Progress reporter redrawing a single stderr line
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressBar {
    hidden: bool,
}

impl ProgressBar {
    pub fn new() -> Self {
        Self::default()
    }

    /// A bar that draws nothing, for quiet mode
    pub fn hidden() -> Self {
        Self { hidden: true }
    }

    /// Ends the progress line so later output starts on a fresh line
    pub fn finish(&self) {
        if !self.hidden {
            eprintln!();
        }
    }
}

impl ProgressReporter for ProgressBar {
    fn report(&self, pages_loaded: u32, total_pages: u32) {
        if self.hidden {
            return;
        }
        // drawing is best effort
        if let Err(e) = draw(&mut io::stderr().lock(), pages_loaded, total_pages) {
            tracing::trace!("Progress bar not drawn: {}", e);
        }
    }
}

/// Redraws the bar over the current line of `out`
fn draw<W: Write>(out: &mut W, pages_loaded: u32, total_pages: u32) -> io::Result<()> {
    write!(out, "\r{}", render_bar(pages_loaded, total_pages, BAR_WIDTH))?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_partial_bar() {
        assert_eq!(render_bar(1, 4, 8), "[██------] 1/4 pages loaded...");
    }

    #[test]
    fn test_render_full_bar() {
        assert_eq!(render_bar(3, 3, 4), "[████] 3/3 pages loaded...");
    }

    #[test]
    fn test_render_clamps_overflow() {
        assert_eq!(render_bar(7, 5, 4), "[████] 7/5 pages loaded...");
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_draw_rewrites_line() {
        let mut out = Vec::new();
        draw(&mut out, 2, 4).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with('\r'));
        assert!(text.ends_with("2/4 pages loaded..."));
    }

    #[test]
    fn test_draw_reports_write_failure() {
        let result = draw(&mut ClosedPipe, 1, 2);
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn test_render_zero_total() {
        assert_eq!(render_bar(0, 0, 3), "[---] 0/0 pages loaded...");
    }
}
