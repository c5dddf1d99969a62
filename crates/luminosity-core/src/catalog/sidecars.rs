use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A JPEG sidecar recorded next to a RAW original.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SidecarFileRecord {
    pub photo_id: i64,
    pub root_path: String,
    pub file_path: String,
    pub file_name: String,
    pub extension: String,
    pub sidecar_extension: String,
    pub sidecar_path: PathBuf,
    pub original_path: PathBuf,
}

impl SidecarFileRecord {
    /// Builds a record, reconstructing both absolute paths from the catalog's
    /// root, folder and file name columns.
    pub fn new(
        photo_id: i64,
        root_path: String,
        file_path: String,
        file_name: String,
        extension: String,
        sidecar_extension: String,
    ) -> Self {
        let prefix = format!("{}{}{}", root_path, file_path, file_name);
        let sidecar_path = PathBuf::from(format!("{}.{}", prefix, sidecar_extension));
        let original_path = PathBuf::from(format!("{}.{}", prefix, extension));
        SidecarFileRecord {
            photo_id,
            root_path,
            file_path,
            file_name,
            extension,
            sidecar_extension,
            sidecar_path,
            original_path,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SidecarFileStats {
    /// Sidecars present on disk.
    pub count: u64,
    pub missing_sidecar_count: u64,
    pub missing_original_count: u64,
    /// Combined size of the sidecars present on disk.
    pub total_size_bytes: u64,
}

impl SidecarFileStats {
    pub fn collect(records: &[SidecarFileRecord]) -> Self {
        let mut stats = SidecarFileStats::default();
        for record in records {
            if !record.original_path.exists() {
                stats.missing_original_count += 1;
            }
            match fs::metadata(&record.sidecar_path) {
                Ok(meta) => {
                    stats.count += 1;
                    stats.total_size_bytes += meta.len();
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => stats.missing_sidecar_count += 1,
                Err(e) => warn!(path = %record.sidecar_path.display(), error = %e, "Cannot stat sidecar"),
            }
        }
        stats
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DeleteOptions {
    /// Delete sidecars even when their original is gone.
    pub delete_missing_originals: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeleteSummary {
    pub total: u64,
    pub deleted: u64,
    pub skipped: u64,
    pub missing: u64,
    pub errors: u64,
}

pub fn delete_sidecars(records: &[SidecarFileRecord], options: DeleteOptions) -> DeleteSummary {
    let mut summary = DeleteSummary::default();
    for record in records {
        summary.total += 1;
        let path = record.sidecar_path.as_path();

        if !path.exists() {
            debug!(path = %path.display(), "Missing sidecar; skipping");
            summary.missing += 1;
            continue;
        }

        if !record.original_path.exists() {
            if !options.delete_missing_originals {
                info!(path = %path.display(), "Missing original for sidecar; skipping");
                summary.skipped += 1;
                continue;
            }
            warn!(path = %path.display(), "Missing original for sidecar; deleting");
        }

        match remove(path) {
            Ok(()) => summary.deleted += 1,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Error deleting sidecar");
                summary.errors += 1;
            }
        }
    }
    summary
}

fn remove(path: &Path) -> io::Result<()> {
    fs::remove_file(path)?;
    debug!(path = %path.display(), "Deleted sidecar");
    Ok(())
}
