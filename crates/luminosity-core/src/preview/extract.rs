use super::cache::CatalogPreviews;
use crate::catalog::photos::PhotoRecord;
use crate::catalog::Catalog;
use crate::error::Error;
use crate::progress::ProgressReporter;
use ahash::AHashSet;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExtractSummary {
    pub written: usize,
    /// Photos without a cached preview.
    pub missing: usize,
    pub failed: usize,
}

/// Picks a unique output file name for a photo: `<baseName>.jpg`, then
/// `<baseName>-<id>.jpg`, then `<baseName>-<id>-<n>.jpg` for the first `n`
/// not yet taken in this run.
fn output_name(photo: &PhotoRecord, taken: &mut AHashSet<String>) -> String {
    let base = photo.base_name();
    let name = format!("{}.jpg", base);
    if taken.insert(name.clone()) {
        return name;
    }
    let name = format!("{}-{}.jpg", base, photo.id);
    if taken.insert(name.clone()) {
        return name;
    }
    let mut n = 1;
    loop {
        let name = format!("{}-{}-{}.jpg", base, photo.id, n);
        if taken.insert(name.clone()) {
            return name;
        }
        n += 1;
    }
}

/// Writes the largest cached preview of every photo to `out_dir`.
pub fn extract_previews(
    catalog_path: &Path,
    out_dir: &Path,
    reporter: &dyn ProgressReporter,
) -> Result<ExtractSummary, Error> {
    let mut catalog = Catalog::open(catalog_path)?;
    let previews = CatalogPreviews::open(catalog_path)?;
    let photos = catalog.photos()?;
    let summary = write_previews(&previews, photos, out_dir, reporter)?;
    info!(
        catalog = %catalog_path.display(),
        out_dir = %out_dir.display(),
        written = summary.written,
        missing = summary.missing,
        failed = summary.failed,
        "Extracted previews"
    );
    Ok(summary)
}

/// Extracts previews for the given photos from an already opened cache.
pub fn write_previews(
    previews: &CatalogPreviews,
    photos: &[PhotoRecord],
    out_dir: &Path,
    reporter: &dyn ProgressReporter,
) -> Result<ExtractSummary, Error> {
    fs::create_dir_all(out_dir)?;

    let start = Instant::now();
    let mut summary = ExtractSummary::default();
    let mut taken: AHashSet<String> = AHashSet::with_capacity(photos.len());
    reporter.on_extract_start(photos.len());

    for (done, photo) in photos.iter().enumerate() {
        match previews.get_preview(photo.id) {
            Ok(bytes) => {
                let target: PathBuf = out_dir.join(output_name(photo, &mut taken));
                match fs::write(&target, &bytes) {
                    Ok(()) => {
                        debug!(photo_id = photo.id, path = %target.display(), bytes = bytes.len(), "Wrote preview");
                        summary.written += 1;
                    }
                    Err(e) => {
                        warn!(photo_id = photo.id, path = %target.display(), error = %e, "Error writing preview");
                        summary.failed += 1;
                    }
                }
            }
            Err(Error::NotFound(id)) => {
                debug!(photo_id = id, "No cached preview");
                summary.missing += 1;
            }
            Err(e) => {
                warn!(photo_id = photo.id, file = %photo.full_name, error = %e, "Error reading preview");
                summary.failed += 1;
            }
        }
        reporter.on_extract_progress(done + 1, photos.len());
    }

    reporter.on_extract_complete(summary.written, start.elapsed().as_secs_f64());
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(id: i64, full_name: &str) -> PhotoRecord {
        PhotoRecord {
            id,
            full_name: full_name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_output_names_are_unique() {
        let mut taken = AHashSet::new();
        assert_eq!(output_name(&photo(1, "/a/IMG_1.CR2"), &mut taken), "IMG_1.jpg");
        assert_eq!(output_name(&photo(2, "/b/IMG_1.NEF"), &mut taken), "IMG_1-2.jpg");
        assert_eq!(output_name(&photo(3, "/b/IMG_2.NEF"), &mut taken), "IMG_2.jpg");
    }

    #[test]
    fn test_fallback_name_never_reuses_a_real_name() {
        let mut taken = AHashSet::new();
        assert_eq!(output_name(&photo(1, "/a/IMG_1.CR2"), &mut taken), "IMG_1.jpg");
        assert_eq!(output_name(&photo(3, "/a/IMG_1-2.CR2"), &mut taken), "IMG_1-2.jpg");
        assert_eq!(output_name(&photo(2, "/a/IMG_1.JPG"), &mut taken), "IMG_1-2-1.jpg");
        assert_eq!(taken.len(), 3);
    }
}
