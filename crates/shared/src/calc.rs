use crate::error::GeoError;
use crate::models::{ImageSize, MapProfile, Point};
use crate::scale::{meters_per_pixel, to_pixels};

/// Euclidean distance between two positions in native pixels.
pub fn pixel_distance(a: Point, b: Point, image: ImageSize) -> f64 {
    let (ax, ay) = to_pixels(a, image);
    let (bx, by) = to_pixels(b, image);
    let dx = bx - ax;
    let dy = by - ay;
    (dx * dx + dy * dy).sqrt()
}

/// Straight-line distance between two normalized points, in whole meters.
pub fn compute_distance(
    a: Point,
    b: Point,
    map: &MapProfile,
    image: ImageSize,
) -> Result<f64, GeoError> {
    let ratio = meters_per_pixel(map, image)?;
    Ok((pixel_distance(a, b, image) * ratio).round())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(size: f64) -> MapProfile {
        MapProfile {
            id: "erangel".to_string(),
            name: "Erangel".to_string(),
            size_in_meters: size,
            image: "img/erangel.png".to_string(),
            active: true,
        }
    }

    const IMAGE: ImageSize = ImageSize::new(8192, 8192);

    #[test]
    fn test_distance_horizontal() {
        let d = compute_distance(Point::new(0.0, 0.5), Point::new(0.5, 0.5), &map(8000.0), IMAGE)
            .unwrap();
        assert_eq!(d, 4000.0);
    }

    #[test]
    fn test_distance_diagonal() {
        let image = ImageSize::new(500, 500);
        let d = compute_distance(Point::new(0.0, 0.0), Point::new(0.6, 0.8), &map(500.0), image)
            .unwrap();
        assert_eq!(d, 500.0);
    }

    #[test]
    fn test_distance_symmetry() {
        let pairs = [
            (Point::new(0.13, 0.71), Point::new(0.42, 0.05)),
            (Point::new(0.0, 0.0), Point::new(1.0, 1.0)),
            (Point::new(0.999, 0.001), Point::new(0.001, 0.999)),
            (Point::new(0.5, 0.25), Point::new(0.5, 0.75)),
            (Point::new(0.333, 0.667), Point::new(0.334, 0.666)),
        ];
        let images = [IMAGE, ImageSize::new(1000, 2000), ImageSize::new(3000, 1024)];
        for image in images {
            for (a, b) in pairs {
                let ab = compute_distance(a, b, &map(6000.0), image).unwrap();
                let ba = compute_distance(b, a, &map(6000.0), image).unwrap();
                assert_eq!(ab, ba, "{:?} <-> {:?} on {:?}", a, b, image);
            }
        }
    }

    #[test]
    fn test_distance_scales_with_map_size() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(0.25, 0.0);
        let small = compute_distance(a, b, &map(4000.0), IMAGE).unwrap();
        let large = compute_distance(a, b, &map(8000.0), IMAGE).unwrap();
        assert_eq!(small, 1000.0);
        assert_eq!(large, 2.0 * small);
    }

    #[test]
    fn test_distance_zero() {
        let a = Point::new(0.37, 0.61);
        assert_eq!(compute_distance(a, a, &map(8000.0), IMAGE).unwrap(), 0.0);
    }

    #[test]
    fn test_distance_non_square_image() {
        // Longest side (height) anchors the scale: 1000 m / 2000 px = 0.5 m/px.
        let image = ImageSize::new(1000, 2000);
        let d = compute_distance(Point::new(0.0, 0.0), Point::new(1.0, 0.0), &map(1000.0), image)
            .unwrap();
        assert_eq!(d, 500.0);
    }

    #[test]
    fn test_distance_invalid_configuration() {
        let err = compute_distance(Point::new(0.0, 0.0), Point::new(1.0, 1.0), &map(0.0), IMAGE)
            .unwrap_err();
        assert!(matches!(err, GeoError::InvalidConfiguration(_)));
    }
}
