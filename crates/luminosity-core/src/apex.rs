//! Conversions from APEX values, as stored in the catalog EXIF tables, to the
//! conventional photographic notation.

/// Converts an APEX aperture value to an f-number (`2^(av/2)`).
pub fn aperture_to_f_number(apex: f64) -> f64 {
    (apex / 2.0).exp2()
}

/// Formats an APEX aperture value as an f-number with one decimal place.
pub fn format_f_number(apex: f64) -> String {
    format!("{:.1}", aperture_to_f_number(apex))
}

/// Converts an APEX shutter speed value to an exposure time label such as
/// `1/250`. The denominator is `2^tv` rounded to the nearest integer.
pub fn shutter_speed_to_exposure_time(apex: f64) -> String {
    format!("1/{:.0}", apex.exp2())
}
