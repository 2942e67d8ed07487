//! Path post-processing: simplify, then interpolate, then smooth.

use crate::config::SmoothingConfig;
use crate::geometry::{Obstacle, Point, path_blocked, wrap_to_pi};

pub fn path_length(path: &[Point]) -> f64 {
    path.windows(2).map(|w| w[0].distance(&w[1])).sum()
}

/// Greedy line-of-sight shortcutting.
///
/// A waypoint is dropped when the last kept waypoint can see the waypoint after it, otherwise it
/// is kept. Provided the input edges are clear of `obstacles`, so is every output edge.
pub fn simplify(path: &[Point], obstacles: &[Obstacle]) -> Vec<Point> {
    let (Some(first), Some(last)) = (path.first(), path.last()) else {
        return vec![];
    };
    if path.len() < 3 {
        return path.to_vec();
    }
    let mut simplified = vec![*first];
    for i in 1..path.len() - 1 {
        let anchor = simplified[simplified.len() - 1];
        if path_blocked(&anchor, &path[i + 1], obstacles) {
            simplified.push(path[i]);
        }
    }
    simplified.push(*last);
    simplified
}

/// Replace every edge with `samples` evenly spaced points. Linear, not a spline.
///
/// Each edge contributes its start point and the points before its end, and the final point is
/// appended once, so shared vertices are not repeated.
pub fn interpolate(path: &[Point], samples: usize) -> Vec<Point> {
    if path.len() < 2 || samples == 0 {
        return path.to_vec();
    }
    let mut out = Vec::with_capacity((path.len() - 1) * samples + 1);
    for edge in path.windows(2) {
        out.extend((0..samples).map(|k| edge[0].lerp(&edge[1], k as f64 / samples as f64)));
    }
    out.extend(path.last().copied());
    out
}

/// Keep the interior points whose bearing from the first point deviates from the first-to-last
/// chord by more than `angle_threshold`.
///
/// This is a global-chord corner detector: whether a point survives depends only on its bearing
/// from the start, not on its neighbours.
pub fn smooth(path: &[Point], angle_threshold: f64) -> Vec<Point> {
    let (Some(first), Some(last)) = (path.first(), path.last()) else {
        return vec![];
    };
    if path.len() < 3 {
        return path.to_vec();
    }
    let chord = first.angle_to(last);
    let mut smoothed = vec![*first];
    smoothed.extend(
        path[1..path.len() - 1]
            .iter()
            .filter(|p| wrap_to_pi(first.angle_to(p) - chord).abs() > angle_threshold)
            .copied(),
    );
    smoothed.push(*last);
    smoothed
}

pub fn post_process(path: &[Point], obstacles: &[Obstacle], config: &SmoothingConfig) -> Vec<Point> {
    let simplified = simplify(path, obstacles);
    let interpolated = interpolate(&simplified, config.interpolation_samples);
    smooth(&interpolated, config.angle_threshold)
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::*;

    fn pts(raw: &[(f64, f64)]) -> Vec<Point> {
        raw.iter().copied().map(Point::from).collect()
    }

    #[test]
    fn length_of_polyline() {
        assert_eq!(path_length(&pts(&[(0.0, 0.0), (3.0, 4.0), (3.0, 10.0)])), 11.0);
        assert_eq!(path_length(&[]), 0.0);
    }

    #[test]
    fn simplify_collapses_open_space() {
        let path = pts(&[(0.0, 0.0), (10.0, 1.0), (20.0, -1.0), (30.0, 0.0)]);
        assert_eq!(simplify(&path, &[]), pts(&[(0.0, 0.0), (30.0, 0.0)]));
    }

    #[test]
    fn simplify_keeps_corners_around_obstacles() {
        // Around the top of a block sitting on the straight line
        let block = Obstacle::rect(40.0, -20.0, 20.0, 40.0);
        let path = pts(&[
            (0.0, 0.0),
            (20.0, -30.0),
            (50.0, -30.0),
            (80.0, -30.0),
            (100.0, 0.0),
        ]);
        let simplified = simplify(&path, &[block]);
        assert_eq!(simplified.first(), path.first());
        assert_eq!(simplified.last(), path.last());
        assert!(simplified.len() < path.len());
        for w in simplified.windows(2) {
            assert!(!block.intersects_segment(&w[0], &w[1]));
        }
    }

    #[test]
    fn simplify_short_paths_untouched() {
        let path = pts(&[(0.0, 0.0), (5.0, 5.0)]);
        assert_eq!(simplify(&path, &[]), path);
        assert!(simplify(&[], &[]).is_empty());
    }

    #[test]
    fn interpolation_spacing() {
        let path = pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 20.0)]);
        let dense = interpolate(&path, 10);
        assert_eq!(dense.len(), 21);
        assert_eq!(dense[0], Point::new(0.0, 0.0));
        assert!((dense[1].x - 1.0).abs() < 1e-9);
        assert_eq!(dense[10], Point::new(10.0, 0.0));
        assert!((dense[11].y - 2.0).abs() < 1e-9);
        assert_eq!(dense[20], Point::new(10.0, 20.0));
        // Linear: every sample lies on its edge
        assert!(dense[..=10].iter().all(|p| p.y == 0.0));
        assert!(dense[10..].iter().all(|p| (p.x - 10.0).abs() < 1e-9));
    }

    #[test]
    fn smoothing_drops_points_on_the_chord() {
        let path = pts(&[(0.0, 0.0), (10.0, 0.1), (20.0, 0.0), (30.0, 30.0), (40.0, 0.0)]);
        let smoothed = smooth(&path, PI / 30.0);
        assert_eq!(smoothed, pts(&[(0.0, 0.0), (30.0, 30.0), (40.0, 0.0)]));
    }

    #[test]
    fn smoothing_handles_wrapped_bearings() {
        // The chord bearing sits just above -π and the point just below π, a tiny real deviation
        let path = pts(&[(0.0, 0.0), (-10.0, 0.1), (-20.0, -0.1)]);
        assert_eq!(smooth(&path, PI / 30.0).len(), 2);
    }

    #[test]
    fn pipeline_keeps_endpoints() {
        let path = pts(&[(0.0, 0.0), (10.0, 10.0), (20.0, 0.0), (30.0, 10.0)]);
        let processed = post_process(&path, &[], &SmoothingConfig::default());
        assert_eq!(processed.first(), path.first());
        assert_eq!(processed.last(), path.last());
    }
}
