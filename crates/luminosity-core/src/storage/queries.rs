use super::models::*;
use super::sqlite::{get_f64_opt, get_text_opt, Database};
use crate::catalog::collections::{Collection, CollectionKind};
use crate::catalog::distribution::Dimension;
use crate::catalog::photos::{parse_capture_time, PhotoRecord};
use crate::catalog::sidecars::SidecarFileRecord;
use crate::catalog::source::CatalogSource;
use crate::error::Error;
use rusqlite::Row;
use std::path::Path;
use tracing::warn;

const LENSES_QUERY: &str = "SELECT id_local, value FROM AgInternedExifLens";

const CAMERAS_QUERY: &str = "SELECT id_local, value FROM AgInternedExifCameraModel";

// Every distribution query returns (id, label, value, count).

const DATE_DISTRIBUTION_QUERY: &str = "
SELECT   0,
         date(captureTime),
         NULL,
         count(*)
FROM     Adobe_images
GROUP BY date(captureTime)
ORDER BY date(captureTime)
";

const CAMERA_DISTRIBUTION_QUERY: &str = "
SELECT    Camera.id_local AS id,
          Camera.value,
          NULL,
          count(Camera.value) AS count
FROM      Adobe_images              image
JOIN      AgHarvestedExifMetadata   exif    ON  image.id_local = exif.image
LEFT JOIN AgInternedExifCameraModel Camera  ON Camera.id_local = exif.cameraModelRef
WHERE     Camera.id_local IS NOT NULL
GROUP BY  id
ORDER BY  count DESC
";

const LENS_DISTRIBUTION_QUERY: &str = "
SELECT    Lens.id_local AS id,
          Lens.value,
          NULL,
          count(Lens.value) AS count
FROM      Adobe_images              image
JOIN      AgHarvestedExifMetadata   exif  ON image.id_local = exif.image
LEFT JOIN AgInternedExifLens        Lens  ON  Lens.id_local = exif.lensRef
WHERE     Lens.id_local IS NOT NULL
GROUP BY  id
ORDER BY  count DESC
";

const FOCAL_LENGTH_DISTRIBUTION_QUERY: &str = "
SELECT   min(id_local),
         NULL,
         focalLength,
         count(id_local) AS count
FROM     AgHarvestedExifMetadata
WHERE    focalLength IS NOT NULL
GROUP BY focalLength
ORDER BY count DESC
";

const APERTURE_DISTRIBUTION_QUERY: &str = "
SELECT   0,
         NULL,
         aperture,
         count(aperture)
FROM     AgHarvestedExifMetadata
WHERE    aperture IS NOT NULL
GROUP BY aperture
ORDER BY aperture
";

const EXPOSURE_TIME_DISTRIBUTION_QUERY: &str = "
SELECT   0,
         NULL,
         shutterSpeed,
         count(shutterSpeed)
FROM     AgHarvestedExifMetadata
WHERE    shutterSpeed IS NOT NULL
GROUP BY shutterSpeed
ORDER BY shutterSpeed
";

const EDIT_COUNT_DISTRIBUTION_QUERY: &str = "
SELECT   0,
         NULL,
         steps,
         count(*)
FROM     (SELECT    image.id_local     AS id,
                    count(step.id_local) AS steps
          FROM      Adobe_images                         image
          LEFT JOIN Adobe_libraryImageDevelopHistoryStep step ON step.image = image.id_local
          GROUP BY  image.id_local)
GROUP BY steps
ORDER BY steps
";

const KEYWORD_DISTRIBUTION_QUERY: &str = "
SELECT   keyword.id_local AS id,
         keyword.name,
         NULL,
         count(tagged.image) AS count
FROM     AgLibraryKeywordImage tagged
JOIN     AgLibraryKeyword      keyword ON keyword.id_local = tagged.tag
GROUP BY keyword.id_local
ORDER BY count DESC
";

const PHOTOS_QUERY: &str = "
SELECT    image.id_local,
          image.id_global,
          root.absolutePath || folder.pathFromRoot || file.baseName || '.' || file.extension AS fullName,
          coalesce(Lens.value, 'Unknown'),
          coalesce(Camera.value, 'Unknown'),
          image.fileFormat,
          image.fileHeight,
          image.fileWidth,
          image.orientation,
          image.captureTime,
          image.rating,
          image.colorLabels,
          image.pick,
          exif.dateDay,
          exif.dateMonth,
          exif.dateYear,
          exif.flashFired,
          exif.isoSpeedRating,
          exif.shutterSpeed,
          exif.focalLength,
          exif.aperture,
          exif.hasGPS,
          exif.gpsLatitude,
          exif.gpsLongitude,
          iptc.caption,
          iptc.copyright,
          coalesce(Creator.value, 'Unknown')
FROM      Adobe_images              image
JOIN      AgLibraryFile             file    ON    file.id_local = image.rootFile
JOIN      AgLibraryFolder           folder  ON  folder.id_local = file.folder
JOIN      AgLibraryRootFolder       root    ON    root.id_local = folder.rootFolder
LEFT JOIN AgLibraryIPTC             iptc    ON   image.id_local = iptc.image
LEFT JOIN AgHarvestedExifMetadata   exif    ON   image.id_local = exif.image
LEFT JOIN AgInternedExifLens        Lens    ON    Lens.id_local = exif.lensRef
LEFT JOIN AgInternedExifCameraModel Camera  ON  Camera.id_local = exif.cameraModelRef
LEFT JOIN AgHarvestedIptcMetadata   hiptc   ON   image.id_local = hiptc.image
LEFT JOIN AgInternedIptcCreator     Creator ON Creator.id_local = hiptc.creatorRef
ORDER BY  fullName
";

const COLLECTIONS_QUERY: &str = "
SELECT   id_local,
         name,
         parent,
         creationId
FROM     AgLibraryCollection
WHERE    systemOnly = 0
ORDER BY parent, name
";

const SIDECARS_QUERY: &str = "
SELECT     image.id_local,
           root.absolutePath,
           folder.pathFromRoot,
           file.baseName,
           file.extension,
           file.sidecarExtensions
FROM       AgLibraryFile       file
INNER JOIN Adobe_images        image  ON  file.id_local = image.rootFile
INNER JOIN AgLibraryFolder     folder ON    file.folder = folder.id_local
INNER JOIN AgLibraryRootFolder root   ON folder.rootFolder = root.id_local
WHERE      file.sidecarExtensions = 'JPG'
AND        image.fileFormat       = 'RAW'
ORDER BY   image.id_local
";

const SUNBURST_QUERY: &str = "
SELECT    Camera.value AS camera,
          Lens.value   AS lens,
          exif.aperture,
          exif.focalLength,
          count(*)
FROM      Adobe_images              image
JOIN      AgHarvestedExifMetadata   exif   ON  image.id_local = exif.image
LEFT JOIN AgInternedExifLens        Lens   ON   Lens.id_local = exif.lensRef
LEFT JOIN AgInternedExifCameraModel Camera ON Camera.id_local = exif.cameraModelRef
WHERE     Camera.value IS NOT NULL
AND       Lens.value   IS NOT NULL
GROUP BY  camera, lens, exif.aperture, exif.focalLength
ORDER BY  camera, lens, exif.aperture, exif.focalLength
";

fn distribution_query(dimension: Dimension) -> &'static str {
    match dimension {
        Dimension::Date => DATE_DISTRIBUTION_QUERY,
        Dimension::Camera => CAMERA_DISTRIBUTION_QUERY,
        Dimension::Lens => LENS_DISTRIBUTION_QUERY,
        Dimension::FocalLength => FOCAL_LENGTH_DISTRIBUTION_QUERY,
        Dimension::Aperture => APERTURE_DISTRIBUTION_QUERY,
        Dimension::ExposureTime => EXPOSURE_TIME_DISTRIBUTION_QUERY,
        Dimension::EditCount => EDIT_COUNT_DISTRIBUTION_QUERY,
        Dimension::Keyword => KEYWORD_DISTRIBUTION_QUERY,
    }
}

/// A Lightroom `.lrcat` opened read-only.
pub struct SqliteCatalog {
    db: Database,
}

impl SqliteCatalog {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        Ok(SqliteCatalog {
            db: Database::open_read_only(path)?,
        })
    }

    pub fn path(&self) -> &Path {
        self.db.path()
    }

    fn named_objects(&self, label: &str, sql: &str) -> Result<Vec<NamedObjectRow>, Error> {
        self.db.query(label, sql, [], |row| {
            Ok(NamedObjectRow {
                id: row.get(0)?,
                name: get_text_opt(row, 1)?,
            })
        })
    }
}

fn photo_from_row(row: &Row<'_>) -> rusqlite::Result<(PhotoRecord, Option<String>)> {
    let as_int = |idx: usize| -> rusqlite::Result<Option<i64>> {
        Ok(get_f64_opt(row, idx)?.map(|v| v as i64))
    };

    let mut photo = PhotoRecord {
        id: row.get(0)?,
        id_global: get_text_opt(row, 1)?.unwrap_or_default(),
        full_name: get_text_opt(row, 2)?.unwrap_or_default(),
        lens: get_text_opt(row, 3)?.unwrap_or_default(),
        camera: get_text_opt(row, 4)?.unwrap_or_default(),
        file_format: get_text_opt(row, 5)?.unwrap_or_default(),
        file_height: as_int(6)?,
        file_width: as_int(7)?,
        orientation: get_text_opt(row, 8)?,
        capture_time: None,
        rating: get_text_opt(row, 10)?,
        color_labels: get_text_opt(row, 11)?.unwrap_or_default(),
        pick: as_int(12)?,
        date_day: as_int(13)?,
        date_month: as_int(14)?,
        date_year: as_int(15)?,
        flash_fired: get_f64_opt(row, 16)?.map(|v| v != 0.0),
        iso: get_text_opt(row, 17)?,
        focal_length: get_text_opt(row, 19)?,
        has_gps: get_f64_opt(row, 21)?.is_some_and(|v| v != 0.0),
        latitude: get_f64_opt(row, 22)?,
        longitude: get_f64_opt(row, 23)?,
        caption: get_text_opt(row, 24)?,
        copyright: get_text_opt(row, 25)?,
        creator: get_text_opt(row, 26)?.unwrap_or_default(),
        ..Default::default()
    };
    photo.set_shutter_speed(get_f64_opt(row, 18)?);
    photo.set_aperture(get_f64_opt(row, 20)?);

    Ok((photo, get_text_opt(row, 9)?))
}

impl CatalogSource for SqliteCatalog {
    fn lenses(&self) -> Result<Vec<NamedObjectRow>, Error> {
        self.named_objects("get_lenses", LENSES_QUERY)
    }

    fn cameras(&self) -> Result<Vec<NamedObjectRow>, Error> {
        self.named_objects("get_cameras", CAMERAS_QUERY)
    }

    fn distribution(&self, dimension: Dimension) -> Result<Vec<DistributionRow>, Error> {
        self.db
            .query(dimension.name(), distribution_query(dimension), [], |row| {
                Ok(DistributionRow {
                    id: row.get::<_, Option<i64>>(0)?.unwrap_or(0),
                    label: get_text_opt(row, 1)?,
                    value: get_f64_opt(row, 2)?,
                    count: row.get(3)?,
                })
            })
    }

    fn photos(&self) -> Result<Vec<PhotoRecord>, Error> {
        let rows = self.db.query("get_photos", PHOTOS_QUERY, [], photo_from_row)?;
        Ok(rows
            .into_iter()
            .map(|(mut photo, capture_time)| {
                if let Some(raw) = capture_time.filter(|s| !s.trim().is_empty()) {
                    match parse_capture_time(&raw) {
                        Ok(t) => photo.capture_time = Some(t),
                        Err(e) => {
                            warn!(photo_id = photo.id, error = %e, "Unreadable capture time, leaving it empty");
                        }
                    }
                }
                photo
            })
            .collect())
    }

    fn collections(&self) -> Result<Vec<Collection>, Error> {
        self.db.query("get_collections", COLLECTIONS_QUERY, [], |row| {
            let creation_id = get_text_opt(row, 3)?.unwrap_or_default();
            Ok(Collection {
                id: row.get(0)?,
                name: get_text_opt(row, 1)?,
                parent_id: get_f64_opt(row, 2)?.map(|v| v as i64),
                kind: CollectionKind::from_creation_id(&creation_id),
            })
        })
    }

    fn sidecars(&self) -> Result<Vec<SidecarFileRecord>, Error> {
        self.db.query("get_sidecars", SIDECARS_QUERY, [], |row| {
            Ok(SidecarFileRecord::new(
                row.get(0)?,
                get_text_opt(row, 1)?.unwrap_or_default(),
                get_text_opt(row, 2)?.unwrap_or_default(),
                get_text_opt(row, 3)?.unwrap_or_default(),
                get_text_opt(row, 4)?.unwrap_or_default(),
                get_text_opt(row, 5)?.unwrap_or_default(),
            ))
        })
    }

    fn sunburst(&self) -> Result<Vec<SunburstRow>, Error> {
        self.db.query("get_sunburst", SUNBURST_QUERY, [], |row| {
            Ok(SunburstRow {
                camera: get_text_opt(row, 0)?.unwrap_or_default(),
                lens: get_text_opt(row, 1)?.unwrap_or_default(),
                aperture: get_f64_opt(row, 2)?,
                focal_length: get_f64_opt(row, 3)?,
                count: row.get(4)?,
            })
        })
    }
}
