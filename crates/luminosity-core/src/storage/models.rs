//! Raw row shapes returned by a catalog source, before any normalization.

/// An interned value with its id, e.g. from `AgInternedExifLens`.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedObjectRow {
    pub id: i64,
    pub name: Option<String>,
}

/// One group of a grouped count query. Text dimensions fill `label`,
/// numeric dimensions fill `value`.
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionRow {
    pub id: i64,
    pub label: Option<String>,
    pub value: Option<f64>,
    pub count: i64,
}

impl DistributionRow {
    pub fn labeled(id: i64, label: Option<&str>, count: i64) -> Self {
        DistributionRow {
            id,
            label: label.map(str::to_string),
            value: None,
            count,
        }
    }

    pub fn valued(id: i64, value: f64, count: i64) -> Self {
        DistributionRow {
            id,
            label: None,
            value: Some(value),
            count,
        }
    }
}

/// A count grouped by camera, lens, aperture and focal length.
#[derive(Debug, Clone, PartialEq)]
pub struct SunburstRow {
    pub camera: String,
    pub lens: String,
    pub aperture: Option<f64>,
    pub focal_length: Option<f64>,
    pub count: i64,
}
