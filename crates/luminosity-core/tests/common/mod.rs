#![allow(dead_code)]

use rusqlite::{params, Connection};
use std::fs;
use std::path::{Path, PathBuf};

const CATALOG_SCHEMA: &str = "
CREATE TABLE Adobe_images (
    id_local INTEGER PRIMARY KEY, id_global TEXT, rootFile INTEGER, fileFormat TEXT,
    fileHeight REAL, fileWidth REAL, orientation TEXT, captureTime TEXT,
    rating REAL, colorLabels TEXT, pick REAL
);
CREATE TABLE AgLibraryFile (
    id_local INTEGER PRIMARY KEY, baseName TEXT, extension TEXT, folder INTEGER,
    sidecarExtensions TEXT
);
CREATE TABLE AgLibraryFolder (id_local INTEGER PRIMARY KEY, pathFromRoot TEXT, rootFolder INTEGER);
CREATE TABLE AgLibraryRootFolder (id_local INTEGER PRIMARY KEY, absolutePath TEXT);
CREATE TABLE AgLibraryIPTC (id_local INTEGER PRIMARY KEY, image INTEGER, caption TEXT, copyright TEXT);
CREATE TABLE AgHarvestedExifMetadata (
    id_local INTEGER PRIMARY KEY, image INTEGER, dateDay REAL, dateMonth REAL, dateYear REAL,
    flashFired INTEGER, isoSpeedRating REAL, shutterSpeed REAL, focalLength REAL,
    aperture REAL, hasGPS INTEGER, gpsLatitude REAL, gpsLongitude REAL,
    lensRef INTEGER, cameraModelRef INTEGER
);
CREATE TABLE AgHarvestedIptcMetadata (id_local INTEGER PRIMARY KEY, image INTEGER, creatorRef INTEGER);
CREATE TABLE AgInternedExifLens (id_local INTEGER PRIMARY KEY, value TEXT);
CREATE TABLE AgInternedExifCameraModel (id_local INTEGER PRIMARY KEY, value TEXT);
CREATE TABLE AgInternedIptcCreator (id_local INTEGER PRIMARY KEY, value TEXT);
CREATE TABLE AgLibraryCollection (
    id_local INTEGER PRIMARY KEY, name TEXT, parent INTEGER, creationId TEXT, systemOnly INTEGER
);
CREATE TABLE AgLibraryKeyword (id_local INTEGER PRIMARY KEY, name TEXT);
CREATE TABLE AgLibraryKeywordImage (id_local INTEGER PRIMARY KEY, image INTEGER, tag INTEGER);
CREATE TABLE Adobe_libraryImageDevelopHistoryStep (id_local INTEGER PRIMARY KEY, image INTEGER);
";

const PREVIEWS_SCHEMA: &str = "
CREATE TABLE ImageCacheEntry (imageId INTEGER, uuid TEXT, digest TEXT);
CREATE TABLE PyramidLevel (uuid TEXT, level INTEGER);
";

/// One photo to insert into a fixture catalog.
#[derive(Debug, Clone)]
pub struct Photo {
    pub base_name: &'static str,
    pub extension: &'static str,
    pub file_format: &'static str,
    pub capture_time: Option<&'static str>,
    pub lens: Option<i64>,
    pub camera: Option<i64>,
    pub aperture: Option<f64>,
    pub shutter_speed: Option<f64>,
    pub focal_length: Option<f64>,
    pub sidecar: Option<&'static str>,
}

impl Default for Photo {
    fn default() -> Self {
        Photo {
            base_name: "IMG_0001",
            extension: "CR2",
            file_format: "RAW",
            capture_time: Some("2020-01-01T10:00:00"),
            lens: None,
            camera: None,
            aperture: None,
            shutter_speed: None,
            focal_length: None,
            sidecar: None,
        }
    }
}

/// Builds a catalog with the subset of the Lightroom schema the library
/// reads. All photos live in `<dir>/photos/2020/`.
pub struct CatalogBuilder {
    conn: Connection,
    path: PathBuf,
    photos_dir: PathBuf,
    next_id: i64,
}

impl CatalogBuilder {
    pub fn create(dir: &Path, name: &str) -> Self {
        let path = dir.join(format!("{}.lrcat", name));
        let photos_dir = dir.join("photos");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(CATALOG_SCHEMA).unwrap();
        conn.execute(
            "INSERT INTO AgLibraryRootFolder (id_local, absolutePath) VALUES (1, ?1)",
            params![format!("{}/", photos_dir.display())],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO AgLibraryFolder (id_local, pathFromRoot, rootFolder) VALUES (1, '2020/', 1)",
            [],
        )
        .unwrap();
        CatalogBuilder {
            conn,
            path,
            photos_dir,
            next_id: 1,
        }
    }

    pub fn folder(&self) -> PathBuf {
        self.photos_dir.join("2020")
    }

    pub fn lens(&mut self, id: i64, name: &str) -> &mut Self {
        self.conn
            .execute("INSERT INTO AgInternedExifLens (id_local, value) VALUES (?1, ?2)", params![id, name])
            .unwrap();
        self
    }

    pub fn camera(&mut self, id: i64, name: &str) -> &mut Self {
        self.conn
            .execute(
                "INSERT INTO AgInternedExifCameraModel (id_local, value) VALUES (?1, ?2)",
                params![id, name],
            )
            .unwrap();
        self
    }

    /// Inserts a photo and returns its local image id.
    pub fn photo(&mut self, photo: Photo) -> i64 {
        let id = self.next_id;
        self.next_id += 1;

        self.conn
            .execute(
                "INSERT INTO AgLibraryFile (id_local, baseName, extension, folder, sidecarExtensions)
                 VALUES (?1, ?2, ?3, 1, ?4)",
                params![id, photo.base_name, photo.extension, photo.sidecar],
            )
            .unwrap();
        self.conn
            .execute(
                "INSERT INTO Adobe_images (id_local, id_global, rootFile, fileFormat, fileHeight, fileWidth,
                                           orientation, captureTime, rating, colorLabels, pick)
                 VALUES (?1, ?2, ?1, ?3, 4000, 6000, 'AB', ?4, NULL, '', 0)",
                params![id, format!("GLOBAL-{}", id), photo.file_format, photo.capture_time],
            )
            .unwrap();
        self.conn
            .execute(
                "INSERT INTO AgHarvestedExifMetadata (id_local, image, shutterSpeed, focalLength, aperture,
                                                      hasGPS, lensRef, cameraModelRef)
                 VALUES (?1, ?1, ?2, ?3, ?4, 0, ?5, ?6)",
                params![
                    id,
                    photo.shutter_speed,
                    photo.focal_length,
                    photo.aperture,
                    photo.lens,
                    photo.camera
                ],
            )
            .unwrap();
        id
    }

    pub fn collection(&mut self, id: i64, name: &str, parent: Option<i64>, creation_id: &str) -> &mut Self {
        self.conn
            .execute(
                "INSERT INTO AgLibraryCollection (id_local, name, parent, creationId, systemOnly)
                 VALUES (?1, ?2, ?3, ?4, 0)",
                params![id, name, parent, creation_id],
            )
            .unwrap();
        self
    }

    pub fn keyword(&mut self, image: i64, tag: i64, name: &str) -> &mut Self {
        self.conn
            .execute(
                "INSERT OR IGNORE INTO AgLibraryKeyword (id_local, name) VALUES (?1, ?2)",
                params![tag, name],
            )
            .unwrap();
        self.conn
            .execute(
                "INSERT INTO AgLibraryKeywordImage (image, tag) VALUES (?1, ?2)",
                params![image, tag],
            )
            .unwrap();
        self
    }

    pub fn edit_steps(&mut self, image: i64, steps: usize) -> &mut Self {
        for _ in 0..steps {
            self.conn
                .execute(
                    "INSERT INTO Adobe_libraryImageDevelopHistoryStep (image) VALUES (?1)",
                    params![image],
                )
                .unwrap();
        }
        self
    }

    pub fn finish(self) -> PathBuf {
        self.conn.close().unwrap();
        self.path
    }
}

/// Serializes one preview container section.
pub fn section_bytes(name: &str, payload: &[u8], padding: usize) -> Vec<u8> {
    let name_field = format!("{}\0", name);
    let header_length = 24 + name_field.len();
    let mut out = Vec::new();
    out.extend_from_slice(b"AgHg");
    out.extend_from_slice(&(header_length as u16).to_be_bytes());
    out.push(1);
    out.push(0);
    out.extend_from_slice(&(payload.len() as u64).to_be_bytes());
    out.extend_from_slice(&(padding as u64).to_be_bytes());
    out.extend_from_slice(name_field.as_bytes());
    out.extend_from_slice(payload);
    out.extend(std::iter::repeat(0u8).take(padding));
    out
}

/// Builds the `<name> Previews.lrdata` cache next to a fixture catalog.
pub struct PreviewsBuilder {
    conn: Connection,
    root: PathBuf,
}

impl PreviewsBuilder {
    pub fn create(catalog_path: &Path) -> Self {
        let stem = catalog_path.file_stem().unwrap().to_string_lossy().into_owned();
        let root = catalog_path
            .parent()
            .unwrap()
            .join(format!("{} Previews.lrdata", stem));
        fs::create_dir_all(&root).unwrap();
        let conn = Connection::open(root.join("previews.db")).unwrap();
        conn.execute_batch(PREVIEWS_SCHEMA).unwrap();
        PreviewsBuilder { conn, root }
    }

    /// Registers a cache entry with one pyramid level per payload and writes
    /// its container, a header section followed by one section per payload.
    pub fn add(&mut self, image_id: i64, uuid: &str, digest: &str, payloads: &[&[u8]]) -> PathBuf {
        self.conn
            .execute(
                "INSERT INTO ImageCacheEntry (imageId, uuid, digest) VALUES (?1, ?2, ?3)",
                params![image_id, uuid, digest],
            )
            .unwrap();
        for level in 1..=payloads.len() as i64 {
            self.conn
                .execute(
                    "INSERT INTO PyramidLevel (uuid, level) VALUES (?1, ?2)",
                    params![uuid, level],
                )
                .unwrap();
        }

        let dir = self.root.join(&uuid[..1]).join(&uuid[..4]);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(format!("{}-{}.lrprev", uuid, digest));
        let mut bytes = section_bytes("header", b"", 0);
        for (i, payload) in payloads.iter().enumerate() {
            bytes.extend(section_bytes(&format!("level_{}", i + 1), payload, 3));
        }
        fs::write(&path, bytes).unwrap();
        path
    }

    /// Registers a cache entry without writing its container.
    pub fn add_entry_only(&mut self, image_id: i64, uuid: &str, digest: &str) {
        self.conn
            .execute(
                "INSERT INTO ImageCacheEntry (imageId, uuid, digest) VALUES (?1, ?2, ?3)",
                params![image_id, uuid, digest],
            )
            .unwrap();
        self.conn
            .execute("INSERT INTO PyramidLevel (uuid, level) VALUES (?1, 1)", params![uuid])
            .unwrap();
    }

    pub fn finish(self) -> PathBuf {
        self.conn.close().unwrap();
        self.root
    }
}
