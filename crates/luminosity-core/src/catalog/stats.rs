use super::distribution::{Dimension, Distribution};
use super::source::CatalogSource;
use crate::error::Error;
use serde::Serialize;
use tracing::debug;

/// Every distribution gathered for a catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub by_date: Distribution,
    pub by_camera: Distribution,
    pub by_lens: Distribution,
    pub by_focal_length: Distribution,
    pub by_aperture: Distribution,
    pub by_exposure_time: Distribution,
    pub by_edit_count: Distribution,
    pub by_keyword: Distribution,
}

impl Stats {
    /// Runs one grouped count per dimension. Any failing query fails the
    /// whole fetch.
    pub fn query(source: &dyn CatalogSource) -> Result<Stats, Error> {
        let mut stats = Stats::default();
        for dimension in Dimension::ALL {
            let rows = source.distribution(dimension)?;
            debug!(dimension = dimension.name(), groups = rows.len(), "Queried distribution");
            *stats.get_mut(dimension) = Distribution::from_rows(dimension, rows);
        }
        Ok(stats)
    }

    pub fn get(&self, dimension: Dimension) -> &Distribution {
        match dimension {
            Dimension::Date => &self.by_date,
            Dimension::Camera => &self.by_camera,
            Dimension::Lens => &self.by_lens,
            Dimension::FocalLength => &self.by_focal_length,
            Dimension::Aperture => &self.by_aperture,
            Dimension::ExposureTime => &self.by_exposure_time,
            Dimension::EditCount => &self.by_edit_count,
            Dimension::Keyword => &self.by_keyword,
        }
    }

    pub fn get_mut(&mut self, dimension: Dimension) -> &mut Distribution {
        match dimension {
            Dimension::Date => &mut self.by_date,
            Dimension::Camera => &mut self.by_camera,
            Dimension::Lens => &mut self.by_lens,
            Dimension::FocalLength => &mut self.by_focal_length,
            Dimension::Aperture => &mut self.by_aperture,
            Dimension::ExposureTime => &mut self.by_exposure_time,
            Dimension::EditCount => &mut self.by_edit_count,
            Dimension::Keyword => &mut self.by_keyword,
        }
    }

    /// Merges every distribution of `other` into `self`.
    ///
    /// All merged distributions come out ordered by label. Only the date
    /// histogram is explicitly re-sorted, which makes it chronological; the
    /// others lose their count or numeric ordering. Kept for output
    /// compatibility.
    pub fn merge(&mut self, other: &Stats) {
        for dimension in Dimension::ALL {
            let merged = self.get(dimension).merge(other.get(dimension));
            *self.get_mut(dimension) = merged;
        }
        self.by_date.sort_by_label();
    }

    pub fn photo_count(&self) -> i64 {
        self.by_date.total()
    }
}
