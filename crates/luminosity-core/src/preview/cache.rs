use super::container::PreviewFile;
use crate::error::Error;
use crate::storage::Database;
use rusqlite::params;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Appended to the catalog's base name to find its preview cache directory.
pub const PREVIEWS_DIR_SUFFIX: &str = " Previews.lrdata";

/// Index database inside the preview cache directory.
pub const PREVIEWS_DB_NAME: &str = "previews.db";

const PHOTO_CACHE_INFO_QUERY: &str = "
SELECT   ice.imageId,
         ice.uuid,
         ice.digest,
         max(pl.level) AS maxLevel
FROM     ImageCacheEntry ice
JOIN     PyramidLevel    pl  ON pl.uuid = ice.uuid
WHERE    ice.imageId = ?1
GROUP BY ice.imageId, ice.uuid, ice.digest
ORDER BY maxLevel DESC
LIMIT    1
";

/// `/photos/Main.lrcat` → `/photos/Main Previews.lrdata`
pub fn previews_root_path(catalog_path: &Path) -> PathBuf {
    let stem = catalog_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let dir = catalog_path.parent().unwrap_or_else(|| Path::new(""));
    dir.join(format!("{}{}", stem, PREVIEWS_DIR_SUFFIX))
}

/// Where the packed previews for one photo live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhotoCacheInfo {
    pub image_id: i64,
    pub uuid: String,
    pub digest: String,
    pub max_level: i64,
}

impl PhotoCacheInfo {
    /// `<uuid[0]>/<uuid[0:4]>/<uuid>-<digest>.lrprev`, relative to the
    /// previews root.
    pub fn relative_path(&self) -> Result<PathBuf, Error> {
        let (first, prefix) = match (self.uuid.get(..1), self.uuid.get(..4)) {
            (Some(first), Some(prefix)) => (first, prefix),
            _ => {
                return Err(Error::InvalidValue {
                    field: "uuid",
                    value: self.uuid.clone(),
                })
            }
        };
        Ok(PathBuf::from(first)
            .join(prefix)
            .join(format!("{}-{}.lrprev", self.uuid, self.digest)))
    }
}

/// The preview cache of a single catalog. Holds its own read-only connection
/// to `previews.db`, released on drop.
pub struct CatalogPreviews {
    root: PathBuf,
    db: Database,
}

impl CatalogPreviews {
    /// Opens the preview cache that sits next to `catalog_path`. Catalogs do
    /// not always have previews materialized, in which case this returns
    /// `Unavailable`.
    pub fn open<P: AsRef<Path>>(catalog_path: P) -> Result<Self, Error> {
        let root = previews_root_path(catalog_path.as_ref());
        if !root.is_dir() {
            return Err(Error::Unavailable(root));
        }
        let db = Database::open_read_only(root.join(PREVIEWS_DB_NAME))?;
        debug!(root = %root.display(), "Opened catalog previews");
        Ok(CatalogPreviews { root, db })
    }

    /// Looks up the highest pyramid level cached for a photo, by the
    /// catalog's local image id.
    pub fn cache_info(&self, photo_id: i64) -> Result<PhotoCacheInfo, Error> {
        match self.db.connection().query_row(
            PHOTO_CACHE_INFO_QUERY,
            params![photo_id],
            |row| {
                Ok(PhotoCacheInfo {
                    image_id: row.get(0)?,
                    uuid: row.get(1)?,
                    digest: row.get(2)?,
                    max_level: row.get(3)?,
                })
            },
        ) {
            Ok(info) => {
                debug!(photo_id, uuid = %info.uuid, level = info.max_level, "Found cache entry");
                Ok(info)
            }
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(Error::NotFound(photo_id)),
            Err(e) => Err(e.into()),
        }
    }

    pub fn preview_path(&self, info: &PhotoCacheInfo) -> Result<PathBuf, Error> {
        Ok(self.root.join(info.relative_path()?))
    }

    /// Reads the highest resolution preview stored for a photo.
    pub fn get_preview(&self, photo_id: i64) -> Result<Vec<u8>, Error> {
        let info = self.cache_info(photo_id)?;
        let path = self.preview_path(&info)?;
        let mut file = PreviewFile::open(&path)?;
        file.read_largest()
    }

    pub fn close(self) -> Result<(), Error> {
        self.db.close()
    }
}
