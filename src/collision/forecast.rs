//! Forecast-based collision check
//!
//! Each predictive track sweeps a segment from where it is now to where its
//! predictor says it will be. Two tracks are on a collision course when
//! their segments come closer than the ego object's larger dimension.

use crate::tracking::TrackId;
use crate::types::geometry::{Point2, Segment};

/// Current and forecast position of one track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastTrack {
    pub id: TrackId,
    pub current: Point2,
    /// `None` until the track has run its predictor
    pub future: Option<Point2>,
}

impl ForecastTrack {
    /// The swept segment, if a forecast exists.
    pub fn segment(&self) -> Option<Segment> {
        self.future.map(|future| Segment::new(self.current, future))
    }
}

/// Distance from `point` to the closest point of `segment`.
pub fn point_segment_distance(point: Point2, segment: &Segment) -> f64 {
    if segment.is_degenerate() {
        return point.distance(segment.start);
    }
    let d = segment.direction();
    let t = ((point - segment.start).dot(d) / d.dot(d)).clamp(0.0, 1.0);
    point.distance(segment.start + d * t)
}

/// Proper intersection test by solving both parametric lines.
///
/// Parallel, collinear and degenerate segments (zero cross product) are
/// reported as not intersecting; their distance is still covered by the
/// endpoint checks in [`segments_distance`].
pub fn segments_intersect(a: &Segment, b: &Segment) -> bool {
    let da = a.direction();
    let db = b.direction();
    let denom = da.cross(db);
    if denom == 0.0 {
        return false;
    }
    let offset = b.start - a.start;
    let t = offset.cross(db) / denom;
    let u = offset.cross(da) / denom;
    (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u)
}

/// Minimum distance between two segments.
pub fn segments_distance(a: &Segment, b: &Segment) -> f64 {
    if segments_intersect(a, b) {
        return 0.0;
    }
    [
        point_segment_distance(a.start, b),
        point_segment_distance(a.end, b),
        point_segment_distance(b.start, a),
        point_segment_distance(b.end, a),
    ]
    .into_iter()
    .fold(f64::INFINITY, f64::min)
}

/// True if any other forecast segment passes within `threshold` of the ego segment.
///
/// Stops at the first hit. Skips the ego track itself and tracks without a
/// forecast. An ego track without a forecast never collides.
pub fn predict_collision(ego: &ForecastTrack, others: &[ForecastTrack], threshold: f64) -> bool {
    let Some(ego_segment) = ego.segment() else {
        return false;
    };
    others
        .iter()
        .filter(|other| other.id != ego.id)
        .filter_map(ForecastTrack::segment)
        .any(|segment| segments_distance(&ego_segment, &segment) < threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(x0: f64, y0: f64, x1: f64, y1: f64) -> Segment {
        Segment::new(Point2::new(x0, y0), Point2::new(x1, y1))
    }

    fn track(id: u64, current: (f64, f64), future: Option<(f64, f64)>) -> ForecastTrack {
        ForecastTrack {
            id: TrackId(id),
            current: current.into(),
            future: future.map(Point2::from),
        }
    }

    #[test]
    fn test_point_segment_distance_clamps() {
        let s = seg(0.0, 0.0, 10.0, 0.0);
        assert!((point_segment_distance(Point2::new(5.0, 3.0), &s) - 3.0).abs() < 1e-10);
        assert!((point_segment_distance(Point2::new(-3.0, 4.0), &s) - 5.0).abs() < 1e-10);
        assert!((point_segment_distance(Point2::new(13.0, -4.0), &s) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_crossing_segments_have_zero_distance() {
        let a = seg(0.0, 0.0, 10.0, 0.0);
        let b = seg(5.0, -5.0, 5.0, 5.0);
        assert!(segments_intersect(&a, &b));
        assert_eq!(segments_distance(&a, &b), 0.0);
    }

    #[test]
    fn test_parallel_segments_use_endpoint_distance() {
        let a = seg(0.0, 0.0, 10.0, 0.0);
        let b = seg(2.0, 4.0, 8.0, 4.0);
        assert!(!segments_intersect(&a, &b));
        assert!((segments_distance(&a, &b) - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_non_crossing_skew_segments() {
        let a = seg(0.0, 0.0, 10.0, 0.0);
        let b = seg(12.0, 1.0, 20.0, 9.0);
        assert!(!segments_intersect(&a, &b));
        let expected = Point2::new(10.0, 0.0).distance(Point2::new(12.0, 1.0));
        assert!((segments_distance(&a, &b) - expected).abs() < 1e-10);
    }

    #[test]
    fn test_degenerate_segment_matches_point_distance() {
        let point = seg(3.0, 7.0, 3.0, 7.0);
        let other = seg(0.0, 0.0, 10.0, 2.0);

        let direct = point_segment_distance(Point2::new(3.0, 7.0), &other);
        assert!((segments_distance(&point, &other) - direct).abs() < 1e-10);
        assert!((segments_distance(&other, &point) - direct).abs() < 1e-10);
    }

    #[test]
    fn test_crossing_forecasts_collide_regardless_of_threshold() {
        let ego = track(1, (0.0, 0.0), Some((10.0, 0.0)));
        let other = track(2, (5.0, -5.0), Some((5.0, 5.0)));

        assert!(predict_collision(&ego, &[other], 1e-9));
    }

    #[test]
    fn test_threshold_is_strict() {
        let ego = track(1, (0.0, 0.0), Some((10.0, 0.0)));
        let other = track(2, (0.0, 30.0), Some((10.0, 30.0)));

        assert!(!predict_collision(&ego, &[other], 30.0));
        assert!(predict_collision(&ego, &[other], 30.5));
    }

    #[test]
    fn test_skips_self_and_unpredicted_tracks() {
        let ego = track(1, (0.0, 0.0), Some((10.0, 0.0)));
        let unpredicted = track(2, (5.0, 0.0), None);

        assert!(!predict_collision(&ego, &[ego, unpredicted], 100.0));
    }

    #[test]
    fn test_ego_without_forecast_never_collides() {
        let ego = track(1, (0.0, 0.0), None);
        let other = track(2, (0.0, 0.0), Some((1.0, 1.0)));

        assert!(!predict_collision(&ego, &[other], 100.0));
    }
}
