//! Parachute jump planning.
//!
//! Closed-form approximation of the drop: the landing point is projected onto
//! the flight line, the perpendicular offset is checked against the strategy's
//! reach, and the exit point is moved back along the path by the horizontal
//! distance covered during freefall.
use crate::error::GeoError;
use crate::models::{
    DeployAnnotation, DeployHeight, ExitPlacement, FallStrategy, FlightPath, ImageSize, JumpResult,
    MapProfile, Point, StrategyParams,
};
use crate::scale::{meters_per_pixel, to_pixels};

pub const PLANE_ALTITUDE_M: f64 = 800.0;
/// Parachute opens by itself at this height.
pub const AUTO_DEPLOY_HEIGHT_M: f64 = 200.0;
pub const MAX_DEPLOY_ANCHOR_M: f64 = 400.0;
pub const DEPLOY_SAFETY_MARGIN_M: f64 = 20.0;
/// Minimum freefall below the plane before pulling.
pub const MIN_FREEFALL_M: f64 = 50.0;
/// Below this perpendicular distance the jump is a straight drop.
pub const NEAR_FIELD_M: f64 = 100.0;
/// Exit offset never covers more than this share of the path.
pub const MAX_EXIT_FRACTION: f64 = 0.95;

const EARLY_RATIO: f64 = 0.9;
const LATE_RATIO: f64 = 0.3;

/// Landing point projected onto the infinite line through a flight path, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Signed distance from `start` to the foot point along the travel direction.
    pub along_px: f64,
    pub path_length_px: f64,
    pub perpendicular_px: f64,
}

impl Projection {
    /// Position of the foot point as a fraction of the path; may fall outside [0, 1].
    pub fn along_fraction(&self) -> f64 {
        self.along_px / self.path_length_px
    }
}

pub fn project(path: FlightPath, landing: Point, image: ImageSize) -> Result<Projection, GeoError> {
    let (sx, sy) = to_pixels(path.start, image);
    let (ex, ey) = to_pixels(path.end, image);
    let (lx, ly) = to_pixels(landing, image);

    let vx = ex - sx;
    let vy = ey - sy;
    let length = (vx * vx + vy * vy).sqrt();
    if length <= 0.0 || !length.is_finite() {
        return Err(GeoError::DegeneratePath);
    }
    let ux = vx / length;
    let uy = vy / length;

    let along = (lx - sx) * ux + (ly - sy) * uy;
    let foot_x = sx + ux * along;
    let foot_y = sy + uy * along;
    let px = lx - foot_x;
    let py = ly - foot_y;

    Ok(Projection {
        along_px: along,
        path_length_px: length,
        perpendicular_px: (px * px + py * py).sqrt(),
    })
}

/// Share of the path to move the exit point back by, capped at [`MAX_EXIT_FRACTION`].
///
/// Uses the nominal fall time `altitude / vertical_speed` for the whole descent.
pub fn exit_offset_fraction(distance_m: f64, params: StrategyParams, path_length_m: f64) -> f64 {
    let fall_time = PLANE_ALTITUDE_M / params.vertical_speed;
    let distance_ratio = (distance_m / params.max_parachute_distance).min(1.0);
    let early_offset_m = fall_time * params.horizontal_speed * distance_ratio;
    (early_offset_m / path_length_m).min(MAX_EXIT_FRACTION)
}

pub fn deploy_height(distance_m: f64, params: StrategyParams) -> DeployHeight {
    if distance_m < NEAR_FIELD_M {
        return DeployHeight {
            meters: AUTO_DEPLOY_HEIGHT_M,
            annotation: DeployAnnotation::Auto,
        };
    }
    let ratio = distance_m / params.max_parachute_distance;
    let meters = (AUTO_DEPLOY_HEIGHT_M
        + (MAX_DEPLOY_ANCHOR_M - AUTO_DEPLOY_HEIGHT_M) * ratio
        + DEPLOY_SAFETY_MARGIN_M)
        .clamp(AUTO_DEPLOY_HEIGHT_M, PLANE_ALTITUDE_M - MIN_FREEFALL_M);
    let annotation = if ratio > EARLY_RATIO {
        DeployAnnotation::Early
    } else if ratio < LATE_RATIO {
        DeployAnnotation::Late
    } else {
        DeployAnnotation::None
    };
    DeployHeight { meters, annotation }
}

/// Snap a path fraction onto the segment.
fn place_exit(path: FlightPath, fraction: f64, strategy: FallStrategy) -> (Point, f64, ExitPlacement) {
    if fraction < 0.0 {
        (path.start, 0.0, ExitPlacement::AtStart)
    } else if fraction > 1.0 {
        (path.end, 1.0, ExitPlacement::AtEnd)
    } else {
        let percent = (fraction * 100.0).round() as u32;
        (
            path.start.lerp(path.end, fraction),
            fraction,
            ExitPlacement::Along { percent, strategy },
        )
    }
}

/// Compute the jump plan for reaching `landing` from a plane flying `path`.
pub fn solve(
    path: FlightPath,
    landing: Point,
    map: &MapProfile,
    image: ImageSize,
    strategy: FallStrategy,
) -> Result<JumpResult, GeoError> {
    let ratio = meters_per_pixel(map, image)?;
    let projection = project(path, landing, image)?;
    let params = strategy.params();
    let distance_meters = (projection.perpendicular_px * ratio).round();

    if distance_meters > params.max_parachute_distance {
        return Ok(JumpResult {
            distance_meters,
            feasible: false,
            deploy: None,
            exit_point: None,
            exit_fraction: None,
            exit_placement: None,
            strategy,
        });
    }

    let offset = if distance_meters < NEAR_FIELD_M {
        0.0
    } else {
        exit_offset_fraction(distance_meters, params, projection.path_length_px * ratio)
    };
    let (exit_point, exit_fraction, placement) =
        place_exit(path, projection.along_fraction() - offset, strategy);

    Ok(JumpResult {
        distance_meters,
        feasible: true,
        deploy: Some(deploy_height(distance_meters, params)),
        exit_point: Some(exit_point),
        exit_fraction: Some(exit_fraction),
        exit_placement: Some(placement),
        strategy,
    })
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

    // 1 m per pixel.
    const UNIT: ImageSize = ImageSize::new(8000, 8000);

    fn horizontal_path() -> FlightPath {
        FlightPath {
            start: Point::new(0.1, 0.1),
            end: Point::new(0.5, 0.1),
        }
    }

    #[test]
    fn test_erangel_scenario_neutral() {
        let r = solve(
            horizontal_path(),
            Point::new(0.3, 0.2),
            &map(8000.0),
            ImageSize::new(8192, 8192),
            FallStrategy::Neutral,
        )
        .unwrap();
        assert_eq!(r.distance_meters, 800.0);
        assert!(r.feasible);

        let deploy = r.deploy.unwrap();
        assert!((deploy.meters - 420.0).abs() < 1e-9);
        assert_eq!(deploy.annotation, DeployAnnotation::Early);

        // 800/55 s * 40 m/s = 581.8 m back along a 3200 m path.
        let expected = 0.5 - (800.0 / 55.0 * 40.0) / 3200.0;
        let fraction = r.exit_fraction.unwrap();
        assert!((fraction - expected).abs() < 1e-6);
        let exit = r.exit_point.unwrap();
        assert!((exit.x - (0.1 + 0.4 * expected)).abs() < 1e-6);
        assert!((exit.y - 0.1).abs() < 1e-9);
        assert_eq!(
            r.exit_placement,
            Some(ExitPlacement::Along { percent: 32, strategy: FallStrategy::Neutral })
        );
    }

    #[test]
    fn test_erangel_scenario_dive_infeasible() {
        let r = solve(
            horizontal_path(),
            Point::new(0.3, 0.2),
            &map(8000.0),
            ImageSize::new(8192, 8192),
            FallStrategy::Dive,
        )
        .unwrap();
        assert_eq!(r.distance_meters, 800.0);
        assert!(!r.feasible);
        assert!(r.deploy.is_none());
        assert!(r.exit_point.is_none());
        assert!(r.exit_fraction.is_none());
        assert!(r.exit_placement.is_none());
        assert_eq!(r.strategy, FallStrategy::Dive);
    }

    #[test]
    fn test_erangel_scenario_glide() {
        let r = solve(
            horizontal_path(),
            Point::new(0.3, 0.2),
            &map(8000.0),
            ImageSize::new(8192, 8192),
            FallStrategy::Glide,
        )
        .unwrap();
        assert!(r.feasible);
        let deploy = r.deploy.unwrap();
        assert!((deploy.meters - 380.0).abs() < 1e-9);
        assert_eq!(deploy.annotation, DeployAnnotation::None);
    }

    #[test]
    fn test_feasibility_boundary() {
        let at_limit = solve(horizontal_path(), Point::new(0.3, 0.2), &map(8000.0), UNIT, FallStrategy::Neutral)
            .unwrap();
        assert_eq!(at_limit.distance_meters, 800.0);
        assert!(at_limit.feasible);

        let beyond = solve(
            horizontal_path(),
            Point::new(0.3, 0.1 + 801.0 / 8000.0),
            &map(8000.0),
            UNIT,
            FallStrategy::Neutral,
        )
        .unwrap();
        assert_eq!(beyond.distance_meters, 801.0);
        assert!(!beyond.feasible);
    }

    #[test]
    fn test_landing_on_path() {
        let r = solve(horizontal_path(), Point::new(0.2, 0.1), &map(8000.0), UNIT, FallStrategy::Glide)
            .unwrap();
        assert_eq!(r.distance_meters, 0.0);
        assert!(r.feasible);
        assert!((r.exit_fraction.unwrap() - 0.25).abs() < 1e-9);
        let exit = r.exit_point.unwrap();
        assert!((exit.x - 0.2).abs() < 1e-9);
        assert!((exit.y - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_near_field_drop() {
        let r = solve(
            horizontal_path(),
            Point::new(0.3, 0.1 + 50.0 / 8000.0),
            &map(8000.0),
            UNIT,
            FallStrategy::Neutral,
        )
        .unwrap();
        assert_eq!(r.distance_meters, 50.0);
        let deploy = r.deploy.unwrap();
        assert_eq!(deploy.meters, AUTO_DEPLOY_HEIGHT_M);
        assert_eq!(deploy.annotation, DeployAnnotation::Auto);
        assert_eq!(deploy.to_string(), "200 m (auto)");
        // No backward offset: exit is the foot point itself.
        assert!((r.exit_fraction.unwrap() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_exit_snaps_to_start() {
        let r = solve(horizontal_path(), Point::new(0.1, 0.2), &map(8000.0), UNIT, FallStrategy::Neutral)
            .unwrap();
        assert!(r.feasible);
        assert_eq!(r.exit_placement, Some(ExitPlacement::AtStart));
        assert_eq!(r.exit_point, Some(Point::new(0.1, 0.1)));
        assert_eq!(r.exit_fraction, Some(0.0));
    }

    #[test]
    fn test_exit_snaps_to_end() {
        let r = solve(horizontal_path(), Point::new(0.9, 0.15), &map(8000.0), UNIT, FallStrategy::Neutral)
            .unwrap();
        assert_eq!(r.distance_meters, 400.0);
        assert_eq!(r.exit_placement, Some(ExitPlacement::AtEnd));
        assert_eq!(r.exit_point, Some(Point::new(0.5, 0.1)));
        assert_eq!(r.exit_fraction, Some(1.0));
    }

    #[test]
    fn test_exit_precedes_target_in_travel_direction() {
        let reversed = FlightPath {
            start: Point::new(0.5, 0.1),
            end: Point::new(0.1, 0.1),
        };
        let r = solve(reversed, Point::new(0.3, 0.2), &map(8000.0), UNIT, FallStrategy::Neutral)
            .unwrap();
        let exit = r.exit_point.unwrap();
        assert!(exit.x > 0.3);
        let expected = 0.5 - (800.0 / 55.0 * 40.0) / 3200.0;
        assert!((exit.x - (0.5 - 0.4 * expected)).abs() < 1e-6);
    }

    #[test]
    fn test_diagonal_projection() {
        let path = FlightPath {
            start: Point::new(0.0, 0.0),
            end: Point::new(1.0, 1.0),
        };
        let p = project(path, Point::new(1.0, 0.0), ImageSize::new(1000, 1000)).unwrap();
        assert!((p.along_fraction() - 0.5).abs() < 1e-9);
        assert!((p.perpendicular_px - 1000.0 / 2f64.sqrt()).abs() < 1e-9);

        let r = solve(path, Point::new(1.0, 0.0), &map(1000.0), ImageSize::new(1000, 1000), FallStrategy::Glide)
            .unwrap();
        assert_eq!(r.distance_meters, 707.0);
    }

    #[test]
    fn test_exit_offset_fraction_is_capped() {
        let params = FallStrategy::Neutral.params();
        assert_eq!(exit_offset_fraction(800.0, params, 80.0), MAX_EXIT_FRACTION);
        let uncapped = exit_offset_fraction(400.0, params, 3200.0);
        assert!((uncapped - (800.0 / 55.0 * 40.0 * 0.5) / 3200.0).abs() < 1e-9);
    }

    #[test]
    fn test_deploy_height_annotations() {
        let params = FallStrategy::Neutral.params();
        let late = deploy_height(200.0, params);
        assert!((late.meters - 270.0).abs() < 1e-9);
        assert_eq!(late.annotation, DeployAnnotation::Late);
        let mid = deploy_height(400.0, params);
        assert!((mid.meters - 320.0).abs() < 1e-9);
        assert_eq!(mid.annotation, DeployAnnotation::None);
        let early = deploy_height(760.0, params);
        assert_eq!(early.annotation, DeployAnnotation::Early);
        assert!(early.meters <= PLANE_ALTITUDE_M - MIN_FREEFALL_M);
    }

    #[test]
    fn test_degenerate_path() {
        let path = FlightPath {
            start: Point::new(0.4, 0.4),
            end: Point::new(0.4, 0.4),
        };
        let err = solve(path, Point::new(0.1, 0.1), &map(8000.0), UNIT, FallStrategy::Dive).unwrap_err();
        assert_eq!(err, GeoError::DegeneratePath);
    }

    #[test]
    fn test_invalid_map_fails_before_projection() {
        let path = FlightPath {
            start: Point::new(0.4, 0.4),
            end: Point::new(0.4, 0.4),
        };
        let err = solve(path, Point::new(0.1, 0.1), &map(0.0), UNIT, FallStrategy::Dive).unwrap_err();
        assert!(matches!(err, GeoError::InvalidConfiguration(_)));
    }
}
