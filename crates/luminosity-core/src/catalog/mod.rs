pub mod collections;
pub mod distribution;
pub mod named;
pub mod photos;
pub mod sidecars;
pub mod source;
pub mod stats;
pub mod sunburst;

use crate::error::Error;
use crate::storage::SqliteCatalog;
use collections::{photo_collections, Collection, CollectionTree};
use named::NamedObjectSet;
use photos::PhotoRecord;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use sidecars::{SidecarFileRecord, SidecarFileStats};
use source::CatalogSource;
use stats::Stats;
use std::path::{Path, PathBuf};
use sunburst::SunburstNode;
use tracing::{debug, info};

#[derive(Debug, Clone, Default)]
struct CollectionSections {
    /// Everything the catalog returned, groups included.
    all: Vec<Collection>,
    /// Collections holding photos, ordered by kind then name.
    flat: Vec<Collection>,
}

/// Everything extracted from one catalog, or from several once they have been
/// merged together.
///
/// Sections are fetched lazily and memoized: the first call queries the
/// catalog, later calls return the stored value. A catalog created with
/// [`Catalog::new`] has no source and yields empty sections; it exists to
/// merge other catalogs into.
#[derive(Default)]
pub struct Catalog {
    paths: Vec<PathBuf>,
    source: Option<Box<dyn CatalogSource>>,
    lenses: Option<NamedObjectSet>,
    cameras: Option<NamedObjectSet>,
    stats: Option<Stats>,
    photos: Option<Vec<PhotoRecord>>,
    collections: Option<CollectionSections>,
}

impl Catalog {
    pub fn new() -> Self {
        Catalog::default()
    }

    /// Opens a `.lrcat` read-only without loading anything. Fails while the
    /// catalog is locked by Lightroom.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let source = SqliteCatalog::open(path)?;
        debug!(path = %source.path().display(), "Opened catalog");
        Ok(Catalog::with_source(vec![path.to_path_buf()], Box::new(source)))
    }

    pub fn with_source(paths: Vec<PathBuf>, source: Box<dyn CatalogSource>) -> Self {
        Catalog {
            paths,
            source: Some(source),
            ..Default::default()
        }
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Number of photo records loaded so far, without querying.
    pub fn photo_count(&self) -> usize {
        self.photos.as_ref().map_or(0, Vec::len)
    }

    pub fn is_detached(&self) -> bool {
        self.source.is_none()
    }

    pub fn lenses(&mut self) -> Result<&NamedObjectSet, Error> {
        if self.lenses.is_none() {
            let rows = match &self.source {
                Some(source) => source.lenses()?,
                None => Vec::new(),
            };
            self.lenses = Some(NamedObjectSet::from_rows(rows));
        }
        Ok(self.lenses.get_or_insert_with(NamedObjectSet::default))
    }

    pub fn cameras(&mut self) -> Result<&NamedObjectSet, Error> {
        if self.cameras.is_none() {
            let rows = match &self.source {
                Some(source) => source.cameras()?,
                None => Vec::new(),
            };
            self.cameras = Some(NamedObjectSet::from_rows(rows));
        }
        Ok(self.cameras.get_or_insert_with(NamedObjectSet::default))
    }

    pub fn stats(&mut self) -> Result<&Stats, Error> {
        if self.stats.is_none() {
            let stats = match &self.source {
                Some(source) => Stats::query(source.as_ref())?,
                None => Stats::default(),
            };
            self.stats = Some(stats);
        }
        Ok(self.stats.get_or_insert_with(Stats::default))
    }

    pub fn photos(&mut self) -> Result<&[PhotoRecord], Error> {
        if self.photos.is_none() {
            let photos = match &self.source {
                Some(source) => source.photos()?,
                None => Vec::new(),
            };
            self.photos = Some(photos);
        }
        Ok(self.photos.get_or_insert_with(Vec::new))
    }

    fn collection_sections(&mut self) -> Result<&CollectionSections, Error> {
        if self.collections.is_none() {
            let all = match &self.source {
                Some(source) => source.collections()?,
                None => Vec::new(),
            };
            let flat = photo_collections(&all);
            self.collections = Some(CollectionSections { all, flat });
        }
        Ok(self.collections.get_or_insert_with(CollectionSections::default))
    }

    /// Standard and smart collections, without the groups that organize them.
    pub fn collections(&mut self) -> Result<&[Collection], Error> {
        Ok(&self.collection_sections()?.flat)
    }

    pub fn collection_tree(&mut self) -> Result<CollectionTree, Error> {
        Ok(CollectionTree::build(self.collection_sections()?.all.clone()))
    }

    /// Fetches lenses, cameras, stats and photos. Stops at the first failure;
    /// sections fetched before it stay memoized.
    pub fn load(&mut self) -> Result<(), Error> {
        self.lenses()?;
        self.cameras()?;
        self.stats()?;
        self.photos()?;
        info!(
            paths = ?self.paths,
            photos = self.photo_count(),
            "Loaded catalog"
        );
        Ok(())
    }

    pub fn load_collections(&mut self) -> Result<(), Error> {
        let count = self.collection_sections()?.all.len();
        debug!(paths = ?self.paths, collections = count, "Loaded collections");
        Ok(())
    }

    /// Folds the loaded sections of `other` into this catalog. Stats and
    /// named objects are merged, while paths, photos and collections are
    /// appended without deduplication. Sections `other` never loaded are
    /// left alone; for the rest, this catalog's own section is fetched first
    /// if needed. `other` is consumed and its connection released.
    pub fn merge(&mut self, other: Catalog) -> Result<(), Error> {
        let Catalog {
            paths,
            source,
            lenses,
            cameras,
            stats,
            photos,
            collections,
        } = other;
        drop(source);

        self.paths.extend(paths);
        if let Some(other) = stats {
            self.stats()?;
            if let Some(own) = self.stats.as_mut() {
                own.merge(&other);
            }
        }
        if let Some(other) = cameras {
            let merged = self.cameras()?.merge(&other);
            self.cameras = Some(merged);
        }
        if let Some(other) = lenses {
            let merged = self.lenses()?.merge(&other);
            self.lenses = Some(merged);
        }
        if let Some(other) = photos {
            self.photos()?;
            if let Some(own) = self.photos.as_mut() {
                own.extend(other);
            }
        }
        if let Some(other) = collections {
            self.collection_sections()?;
            if let Some(own) = self.collections.as_mut() {
                own.all.extend(other.all);
                own.flat.extend(other.flat);
            }
        }
        Ok(())
    }

    /// Releases the catalog connection. Memoized sections stay available.
    pub fn close(&mut self) {
        if self.source.take().is_some() {
            debug!(paths = ?self.paths, "Closed catalog");
        }
    }

    pub fn sidecars(&self) -> Result<Vec<SidecarFileRecord>, Error> {
        match &self.source {
            Some(source) => source.sidecars(),
            None => Ok(Vec::new()),
        }
    }

    pub fn sidecar_stats(&self) -> Result<SidecarFileStats, Error> {
        Ok(SidecarFileStats::collect(&self.sidecars()?))
    }

    pub fn sunburst(&self) -> Result<SunburstNode, Error> {
        let rows = match &self.source {
            Some(source) => source.sunburst()?,
            None => Vec::new(),
        };
        Ok(SunburstNode::from_rows(rows))
    }
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("paths", &self.paths)
            .field("detached", &self.is_detached())
            .finish_non_exhaustive()
    }
}

impl Serialize for Catalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("paths", &self.paths)?;
        map.serialize_entry("lenses", &self.lenses)?;
        map.serialize_entry("cameras", &self.cameras)?;
        map.serialize_entry("stats", &self.stats)?;
        map.serialize_entry("photos", &self.photos)?;
        if let Some(collections) = &self.collections {
            map.serialize_entry("collections", &collections.flat)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::distribution::Dimension;
    use crate::storage::models::{DistributionRow, NamedObjectRow, SunburstRow};
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Default)]
    struct FakeSource {
        lens_names: Vec<&'static str>,
        dates: Vec<(&'static str, i64)>,
        queries: Rc<Cell<usize>>,
        fail_photos: bool,
    }

    impl CatalogSource for FakeSource {
        fn lenses(&self) -> Result<Vec<NamedObjectRow>, Error> {
            self.queries.set(self.queries.get() + 1);
            Ok(self
                .lens_names
                .iter()
                .enumerate()
                .map(|(i, name)| NamedObjectRow {
                    id: i as i64 + 1,
                    name: Some(name.to_string()),
                })
                .collect())
        }

        fn cameras(&self) -> Result<Vec<NamedObjectRow>, Error> {
            Ok(Vec::new())
        }

        fn distribution(&self, dimension: Dimension) -> Result<Vec<DistributionRow>, Error> {
            if dimension != Dimension::Date {
                return Ok(Vec::new());
            }
            Ok(self
                .dates
                .iter()
                .map(|(label, count)| DistributionRow::labeled(0, Some(label), *count))
                .collect())
        }

        fn photos(&self) -> Result<Vec<PhotoRecord>, Error> {
            if self.fail_photos {
                return Err(Error::CorruptFormat("photos".into()));
            }
            Ok(Vec::new())
        }

        fn collections(&self) -> Result<Vec<Collection>, Error> {
            Ok(Vec::new())
        }

        fn sidecars(&self) -> Result<Vec<SidecarFileRecord>, Error> {
            Ok(Vec::new())
        }

        fn sunburst(&self) -> Result<Vec<SunburstRow>, Error> {
            Ok(Vec::new())
        }
    }

    fn catalog(path: &str, source: FakeSource) -> Catalog {
        Catalog::with_source(vec![PathBuf::from(path)], Box::new(source))
    }

    #[test]
    fn test_accessors_are_memoized() {
        let queries = Rc::new(Cell::new(0));
        let mut c = catalog(
            "a.lrcat",
            FakeSource {
                lens_names: vec!["50mm"],
                queries: queries.clone(),
                ..Default::default()
            },
        );
        assert_eq!(c.lenses().unwrap().len(), 1);
        assert_eq!(c.lenses().unwrap().len(), 1);
        assert_eq!(queries.get(), 1);
    }

    #[test]
    fn test_detached_catalog_is_empty() {
        let mut c = Catalog::new();
        assert!(c.is_detached());
        assert!(c.lenses().unwrap().is_empty());
        assert!(c.stats().unwrap().by_date.is_empty());
        assert!(c.photos().unwrap().is_empty());
        assert!(c.collections().unwrap().is_empty());
        assert_eq!(c.sunburst().unwrap().total(), 0);
    }

    #[test]
    fn test_load_stops_at_first_failure() {
        let mut c = catalog(
            "a.lrcat",
            FakeSource {
                fail_photos: true,
                ..Default::default()
            },
        );
        assert!(c.load().is_err());
        assert!(c.photos.is_none());
        assert!(c.stats.is_some());
    }

    #[test]
    fn test_merge_combines_loaded_sections() {
        let mut a = catalog(
            "a.lrcat",
            FakeSource {
                lens_names: vec!["50mm"],
                dates: vec![("2020-01-01", 3)],
                ..Default::default()
            },
        );
        let mut b = catalog(
            "b.lrcat",
            FakeSource {
                lens_names: vec!["35mm", "50mm"],
                dates: vec![("2020-01-01", 2)],
                ..Default::default()
            },
        );
        a.load().unwrap();
        b.load().unwrap();

        let mut total = Catalog::new();
        total.merge(a).unwrap();
        total.merge(b).unwrap();

        assert_eq!(total.paths().len(), 2);
        assert_eq!(total.lenses().unwrap().names(), vec!["35mm", "50mm"]);
        assert_eq!(total.stats().unwrap().by_date.get("2020-01-01").unwrap().count, 5);
    }

    #[test]
    fn test_merge_unloaded_catalog_is_noop() {
        let mut a = catalog(
            "a.lrcat",
            FakeSource {
                dates: vec![("2021-06-01", 1)],
                ..Default::default()
            },
        );
        a.load().unwrap();
        let before = serde_json::to_value(&a).unwrap();
        a.merge(Catalog::new()).unwrap();
        assert_eq!(serde_json::to_value(&a).unwrap(), before);
    }

    #[test]
    fn test_serialize_includes_collections_only_when_loaded() {
        let mut c = catalog("a.lrcat", FakeSource::default());
        c.load().unwrap();
        let json = serde_json::to_value(&c).unwrap();
        assert!(json.get("collections").is_none());
        assert_eq!(json["paths"][0], "a.lrcat");

        c.load_collections().unwrap();
        let json = serde_json::to_value(&c).unwrap();
        assert!(json["collections"].as_array().unwrap().is_empty());
    }
}
