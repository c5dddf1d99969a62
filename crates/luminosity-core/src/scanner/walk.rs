use ahash::AHashSet;
use glob::Pattern;
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};
use walkdir::{DirEntry, WalkDir};

/// Extension of Lightroom catalog files.
pub const CATALOG_EXTENSION: &str = "lrcat";

/// Extension of the per-catalog data directories (previews, smart previews,
/// helper databases). They can hold huge numbers of files and never contain
/// catalogs, so the search does not descend into them.
pub const CATALOG_DATA_DIR_EXTENSION: &str = "lrdata";

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}

pub fn is_catalog_file(path: &Path) -> bool {
    has_extension(path, CATALOG_EXTENSION)
}

fn compile_patterns(ignore_globs: &[String]) -> Vec<Pattern> {
    ignore_globs
        .iter()
        .filter_map(|glob| match Pattern::new(glob) {
            Ok(p) => Some(p),
            Err(e) => {
                error!("Invalid glob pattern '{}': {}", glob, e);
                None
            }
        })
        .collect()
}

fn is_ignored(path: &Path, ignore_patterns: &[Pattern]) -> bool {
    ignore_patterns
        .iter()
        .any(|pattern| pattern.matches_path(path))
}

fn should_descend(entry: &DirEntry, ignore_patterns: &[Pattern]) -> bool {
    if entry.file_type().is_dir() && has_extension(entry.path(), CATALOG_DATA_DIR_EXTENSION) {
        return false;
    }
    !is_ignored(entry.path(), ignore_patterns)
}

/// Resolves the given files and directories to the list of catalogs they
/// name or contain. Directories are searched recursively. Paths that cannot
/// be read are logged and skipped. Each catalog is returned once, in the
/// order it was first found, even if input paths overlap.
pub fn find_catalogs<P: AsRef<Path>>(paths: &[P], ignore_globs: &[String]) -> Vec<PathBuf> {
    let ignore_patterns = compile_patterns(ignore_globs);
    let mut seen: AHashSet<PathBuf> = AHashSet::new();
    let mut found: Vec<PathBuf> = Vec::new();

    let mut keep = |path: &Path| {
        let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        if seen.insert(key) {
            found.push(path.to_path_buf());
        }
    };

    for path in paths {
        let path = path.as_ref();
        let metadata = match path.metadata() {
            Ok(m) => m,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Cannot stat path");
                continue;
            }
        };

        if !metadata.is_dir() {
            if is_catalog_file(path) {
                keep(path);
            } else {
                debug!(path = %path.display(), "Not a catalog file");
            }
            continue;
        }

        let walker = WalkDir::new(path)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| should_descend(entry, &ignore_patterns));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Error walking path");
                    continue;
                }
            };
            if entry.file_type().is_file() && is_catalog_file(entry.path()) {
                keep(entry.path());
            }
        }
    }

    found
}
