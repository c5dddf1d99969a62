use indicatif::{ProgressBar, ProgressStyle};
use luminosity_core::ProgressReporter;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

const TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// CLI progress reporter using indicatif progress bars.
///
/// - Catalog search: spinner (unknown number of catalogs upfront)
/// - Catalog loading: progress bar over the catalogs found
/// - Preview extraction: progress bar over the catalog's photos
pub struct CliReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn spinner(message: &'static str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars(TICK_CHARS);
        pb.set_style(style);
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    }

    fn bar(template: &str, len: usize) -> ProgressBar {
        let pb = ProgressBar::new(len as u64);
        let style = ProgressStyle::with_template(template)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("━╸─")
            .tick_chars(TICK_CHARS);
        pb.set_style(style);
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    }

    fn set_bar(&self, pb: ProgressBar) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(old) = guard.take() {
                old.finish_and_clear();
            }
            *guard = Some(pb);
        }
    }

    fn with_bar<F: FnOnce(&ProgressBar)>(&self, f: F) {
        if let Ok(guard) = self.bar.lock() {
            if let Some(pb) = guard.as_ref() {
                f(pb);
            }
        }
    }

    fn finish_bar(&self) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(pb) = guard.take() {
                pb.finish_and_clear();
            }
        }
    }
}

impl ProgressReporter for CliReporter {
    fn on_search_start(&self) {
        self.set_bar(Self::spinner("Searching for catalogs..."));
    }

    fn on_search_complete(&self, catalogs_found: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Search complete: {} catalogs in {:.2}s",
            catalogs_found, duration_secs
        );
    }

    fn on_catalog_start(&self, index: usize, total: usize, path: &Path) {
        if index == 0 {
            self.set_bar(Self::bar(
                "  {spinner:.cyan} Loading [{bar:30.cyan/dim}] {pos}/{len} catalogs {msg}",
                total,
            ));
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.with_bar(|pb| {
            pb.set_position(index as u64);
            pb.set_message(name);
        });
    }

    fn on_catalog_failed(&self, path: &Path, error: &str) {
        self.with_bar(|pb| {
            pb.println(format!(
                "  \x1b[31m✗\x1b[0m {}: {}",
                path.display(),
                error
            ))
        });
    }

    fn on_batch_complete(&self, processed: usize, failed: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Loaded {} catalogs ({} failed) in {:.2}s",
            processed, failed, duration_secs
        );
    }

    fn on_extract_start(&self, total_photos: usize) {
        self.set_bar(Self::bar(
            "  {spinner:.cyan} Extracting [{bar:30.cyan/dim}] {pos}/{len} photos ({eta} remaining)",
            total_photos,
        ));
    }

    fn on_extract_progress(&self, done: usize, _total_photos: usize) {
        self.with_bar(|pb| pb.set_position(done as u64));
    }

    fn on_extract_complete(&self, written: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Extraction complete: {} previews in {:.2}s",
            written, duration_secs
        );
    }
}
