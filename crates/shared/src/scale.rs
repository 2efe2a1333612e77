//! Pixel/meter conversions for a map image.
//!
//! The longest native image side spans the whole map, so non-square images
//! keep a single ratio for both axes.
use crate::error::GeoError;
use crate::models::{ImageSize, MapProfile, Point};

/// Distances at or above this are shown in kilometers.
pub const KM_DISPLAY_THRESHOLD_M: f64 = 1000.0;

/// Meters covered by one native image pixel.
pub fn meters_per_pixel(map: &MapProfile, image: ImageSize) -> Result<f64, GeoError> {
    map.validate()?;
    image.validate()?;
    Ok(map.size_in_meters / image.longest_side())
}

/// Convert a normalized point to native pixel coordinates.
pub fn to_pixels(p: Point, image: ImageSize) -> (f64, f64) {
    (p.x * image.width as f64, p.y * image.height as f64)
}

/// Format a distance rounded to whole meters, e.g. "850 meters" or "1.23 km".
pub fn format_distance(meters: f64) -> String {
    let meters = meters.round();
    if meters >= KM_DISPLAY_THRESHOLD_M {
        format!("{:.2} km", meters / 1000.0)
    } else {
        format!("{} meters", meters)
    }
}

/// Short description of an image and its scale, e.g. "Map: 8192×8192px (0.98m/px)".
pub fn describe_image(map: &MapProfile, image: ImageSize) -> Result<String, GeoError> {
    let ratio = meters_per_pixel(map, image)?;
    Ok(format!(
        "Map: {}×{}px ({:.2}m/px)",
        image.width, image.height, ratio
    ))
}
