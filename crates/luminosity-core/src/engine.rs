use crate::catalog::Catalog;
use crate::config::AppConfig;
use crate::error::Error;
use crate::progress::ProgressReporter;
use crate::scanner;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Gathers stats for every catalog found under a set of paths and merges
/// them into a single aggregate.
pub struct StatsEngine {
    config: AppConfig,
}

#[derive(Debug)]
pub struct StatsResult {
    pub merged: Catalog,
    pub processed: usize,
    pub failed: usize,
    pub search_duration: Duration,
    pub load_duration: Duration,
}

impl StatsEngine {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Finds the catalogs named by `inputs`, then opens and loads each one
    /// and merges it into the result. A catalog that fails to open or load
    /// is logged, reported and skipped. `on_loaded` sees every successfully
    /// loaded catalog before it is merged.
    pub fn run<P, F>(&self, inputs: &[P], reporter: &dyn ProgressReporter, mut on_loaded: F) -> StatsResult
    where
        P: AsRef<Path>,
        F: FnMut(&Catalog),
    {
        reporter.on_search_start();
        let search_start = Instant::now();
        let catalogs = scanner::find_catalogs(inputs, &self.config.ignore_patterns);
        let search_duration = search_start.elapsed();
        reporter.on_search_complete(catalogs.len(), search_duration.as_secs_f64());
        info!(
            "Found {} catalogs in {:.2}s",
            catalogs.len(),
            search_duration.as_secs_f64()
        );

        let load_start = Instant::now();
        let mut merged = Catalog::new();
        let mut processed = 0;
        let mut failed = 0;

        for (index, path) in catalogs.iter().enumerate() {
            reporter.on_catalog_start(index, catalogs.len(), path);
            match self.load_catalog(path) {
                Ok(catalog) => {
                    on_loaded(&catalog);
                    let photos = catalog.photo_count();
                    match merged.merge(catalog) {
                        Ok(()) => {
                            processed += 1;
                            reporter.on_catalog_loaded(path, photos);
                            info!(catalog = %path.display(), photos, "Processed catalog");
                        }
                        Err(e) => {
                            failed += 1;
                            warn!(catalog = %path.display(), error = %e, "Error merging catalog, skipping");
                            reporter.on_catalog_failed(path, &e.to_string());
                        }
                    }
                }
                Err(e) => {
                    failed += 1;
                    warn!(catalog = %path.display(), error = %e, "Error loading catalog, skipping");
                    reporter.on_catalog_failed(path, &e.to_string());
                }
            }
        }

        let load_duration = load_start.elapsed();
        reporter.on_batch_complete(processed, failed, load_duration.as_secs_f64());
        debug!(
            "Loaded {} catalogs ({} failed) in {:.2}s",
            processed,
            failed,
            load_duration.as_secs_f64()
        );

        StatsResult {
            merged,
            processed,
            failed,
            search_duration,
            load_duration,
        }
    }

    fn load_catalog(&self, path: &Path) -> Result<Catalog, Error> {
        let mut catalog = Catalog::open(path)?;
        catalog.load()?;
        if self.config.include_collections {
            catalog.load_collections()?;
        }
        catalog.close();
        Ok(catalog)
    }
}
