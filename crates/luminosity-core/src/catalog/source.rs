use super::collections::Collection;
use super::distribution::Dimension;
use super::photos::PhotoRecord;
use super::sidecars::SidecarFileRecord;
use crate::error::Error;
use crate::storage::models::{DistributionRow, NamedObjectRow, SunburstRow};

/// Where a [`Catalog`](super::Catalog) gets its rows from. The SQLite
/// implementation lives in [`crate::storage::SqliteCatalog`]; tests can plug
/// in an in-memory one.
pub trait CatalogSource {
    fn lenses(&self) -> Result<Vec<NamedObjectRow>, Error>;

    fn cameras(&self) -> Result<Vec<NamedObjectRow>, Error>;

    /// One row per group of the grouped count for `dimension`, unsorted.
    fn distribution(&self, dimension: Dimension) -> Result<Vec<DistributionRow>, Error>;

    fn photos(&self) -> Result<Vec<PhotoRecord>, Error>;

    /// Every collection, groups included.
    fn collections(&self) -> Result<Vec<Collection>, Error>;

    fn sidecars(&self) -> Result<Vec<SidecarFileRecord>, Error>;

    fn sunburst(&self) -> Result<Vec<SunburstRow>, Error>;
}
