/// Receives page progress from the pagination controller
///
/// Called once after every listing page with the pages loaded so far and the
/// total read from the first page. The total is never recomputed, so
/// `pages_loaded` may exceed it when the listing grows mid-crawl.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, pages_loaded: u32, total_pages: u32);
}

impl<F> ProgressReporter for F
where
    F: Fn(u32, u32) + Send + Sync,
{
    fn report(&self, pages_loaded: u32, total_pages: u32) {
        self(pages_loaded, total_pages)
    }
}

/// Reporter that discards progress
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&self, _pages_loaded: u32, _total_pages: u32) {}
}
