use crate::apex;
use crate::error::Error;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::path::Path;

/// The most commonly used information about one photo, gathered from the
/// image, file, folder, EXIF and IPTC tables of the catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PhotoRecord {
    pub id: i64,
    pub id_global: String,
    pub full_name: String,
    pub lens: String,
    pub camera: String,

    // Image
    pub file_format: String,
    pub file_height: Option<i64>,
    pub file_width: Option<i64>,
    pub orientation: Option<String>,
    pub capture_time: Option<NaiveDateTime>,
    pub rating: Option<String>,
    pub color_labels: String,
    pub pick: Option<i64>,

    // Exif
    pub date_day: Option<i64>,
    pub date_month: Option<i64>,
    pub date_year: Option<i64>,
    pub flash_fired: Option<bool>,
    pub iso: Option<String>,
    pub shutter_speed: Option<f64>,
    pub exposure_time: Option<String>,
    pub focal_length: Option<String>,
    pub aperture: Option<f64>,
    #[serde(rename = "fnumber")]
    pub f_number: Option<String>,
    pub has_gps: bool,
    #[serde(rename = "lat")]
    pub latitude: Option<f64>,
    #[serde(rename = "lon")]
    pub longitude: Option<f64>,

    // Iptc
    pub caption: Option<String>,
    pub copyright: Option<String>,
    pub creator: String,
}

impl PhotoRecord {
    /// Stores the APEX shutter speed along with its exposure time label.
    pub fn set_shutter_speed(&mut self, value: Option<f64>) {
        self.shutter_speed = value;
        self.exposure_time = value.map(apex::shutter_speed_to_exposure_time);
    }

    /// Stores the APEX aperture along with its f-number label.
    pub fn set_aperture(&mut self, value: Option<f64>) {
        self.aperture = value;
        self.f_number = value.map(apex::format_f_number);
    }

    /// File name of the original without folder or extension.
    pub fn base_name(&self) -> String {
        Path::new(&self.full_name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Parses the capture time formats found in catalogs: ISO 8601 local time
/// with optional fractional seconds, the same with a UTC offset, or a bare
/// date.
pub fn parse_capture_time(value: &str) -> Result<NaiveDateTime, Error> {
    let value = value.trim();
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(t) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(t);
        }
    }
    if let Ok(t) = DateTime::parse_from_rfc3339(value) {
        return Ok(t.naive_local());
    }
    if let Ok(d) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(t) = d.and_hms_opt(0, 0, 0) {
            return Ok(t);
        }
    }
    Err(Error::InvalidValue {
        field: "captureTime",
        value: value.to_string(),
    })
}
