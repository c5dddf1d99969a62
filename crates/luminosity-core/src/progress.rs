use std::path::Path;

/// Trait for reporting progress of batch operations.
///
/// The CLI implements it with indicatif progress bars. All methods have
/// default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    fn on_search_start(&self) {}
    fn on_search_complete(&self, _catalogs_found: usize, _duration_secs: f64) {}
    fn on_catalog_start(&self, _index: usize, _total: usize, _path: &Path) {}
    fn on_catalog_loaded(&self, _path: &Path, _photos: usize) {}
    fn on_catalog_failed(&self, _path: &Path, _error: &str) {}
    fn on_batch_complete(&self, _processed: usize, _failed: usize, _duration_secs: f64) {}
    fn on_extract_start(&self, _total_photos: usize) {}
    fn on_extract_progress(&self, _done: usize, _total_photos: usize) {}
    fn on_extract_complete(&self, _written: usize, _duration_secs: f64) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
