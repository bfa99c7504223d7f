// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Quadrilateral selection — pick the largest contour and test whether it
// approximates to exactly four vertices.

use imageproc::geometry::approximate_polygon_dp;
use imageproc::point::Point;
use scanwerk_core::{Point2D, Quadrilateral};
use tracing::{debug, instrument};

use super::contours::Contour;

/// Result of approximating the selected contour.
#[derive(Debug, Clone, PartialEq)]
pub enum QuadCandidate {
    /// Exactly four vertices within tolerance.
    Quad(Quadrilateral),
    /// Any other vertex count; the caller falls back to a bounding-box crop.
    NotQuadrilateral { vertices: usize },
}

/// Index of the contour with the largest area, ignoring contours below
/// `min_area`. Ties keep the earliest contour. `None` when nothing qualifies.
pub fn select_largest(contours: &[Contour], min_area: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, contour) in contours.iter().enumerate() {
        let area = contour.area();
        if area < min_area {
            continue;
        }
        match best {
            Some((_, best_area)) if area <= best_area => {}
            _ => best = Some((i, area)),
        }
    }
    best.map(|(i, _)| i)
}

/// Approximate `contour` with tolerance `epsilon_ratio * perimeter` and
/// accept it only if exactly four vertices remain.
#[instrument(skip(contour), fields(points = contour.points().len()))]
pub fn approximate_quadrilateral(contour: &Contour, epsilon_ratio: f64) -> QuadCandidate {
    let epsilon = epsilon_ratio * contour.perimeter();
    if !(epsilon > 0.0) {
        return QuadCandidate::NotQuadrilateral {
            vertices: contour.points().len(),
        };
    }

    let polygon = approximate_closed_polygon(contour.points(), epsilon);
    debug!(epsilon, vertices = polygon.len(), "Contour approximated");

    match polygon.as_slice() {
        [a, b, c, d] => QuadCandidate::Quad(Quadrilateral::new([
            to_point_2d(a),
            to_point_2d(b),
            to_point_2d(c),
            to_point_2d(d),
        ])),
        other => QuadCandidate::NotQuadrilateral {
            vertices: other.len(),
        },
    }
}

/// Douglas–Peucker over a closed curve.
///
/// The curve is split at two mutually distant points (both are always
/// vertices of the result) and each half is simplified as an open chain, so
/// the outcome does not depend on where border following started.
fn approximate_closed_polygon(points: &[Point<i32>], epsilon: f64) -> Vec<Point<i32>> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    let first = farthest_from(points, 0);
    let second = farthest_from(points, first);
    if first == second {
        return vec![points[first]];
    }

    // Two arcs: first -> second and second -> first (wrapping).
    let arc = |from: usize, to: usize| -> Vec<Point<i32>> {
        let len = (to + n - from) % n + 1;
        (0..len).map(|k| points[(from + k) % n]).collect()
    };
    let mut forward = approximate_polygon_dp(&arc(first, second), epsilon, false);
    let mut backward = approximate_polygon_dp(&arc(second, first), epsilon, false);

    // Each arc's last point starts the other arc.
    forward.pop();
    backward.pop();
    forward.append(&mut backward);
    forward
}

fn farthest_from(points: &[Point<i32>], origin: usize) -> usize {
    let o = points[origin];
    let mut best = (origin, 0i64);
    for (i, p) in points.iter().enumerate() {
        let dx = (p.x - o.x) as i64;
        let dy = (p.y - o.y) as i64;
        let d = dx * dx + dy * dy;
        if d > best.1 {
            best = (i, d);
        }
    }
    best.0
}

fn to_point_2d(p: &Point<i32>) -> Point2D {
    Point2D::new(p.x as f64, p.y as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contour(pts: &[(i32, i32)]) -> Contour {
        Contour::new(pts.iter().map(|&(x, y)| Point::new(x, y)).collect())
    }

    /// A 100x100 square whose top edge carries a 6 px bump.
    fn bumped_square() -> Contour {
        contour(&[
            (0, 0),
            (45, 0),
            (50, 6),
            (55, 0),
            (100, 0),
            (100, 100),
            (0, 100),
        ])
    }

    #[test]
    fn tolerance_decides_between_quad_and_fallback() {
        let c = bumped_square();

        match approximate_quadrilateral(&c, 0.01) {
            QuadCandidate::NotQuadrilateral { vertices } => assert!(vertices > 4),
            other => panic!("expected more than four vertices, got {other:?}"),
        }

        match approximate_quadrilateral(&c, 0.02) {
            QuadCandidate::Quad(quad) => {
                let mut pts: Vec<(i64, i64)> = quad
                    .points()
                    .iter()
                    .map(|p| (p.x as i64, p.y as i64))
                    .collect();
                pts.sort();
                assert_eq!(pts, vec![(0, 0), (0, 100), (100, 0), (100, 100)]);
            }
            other => panic!("expected a quadrilateral, got {other:?}"),
        }
    }

    #[test]
    fn result_is_independent_of_start_point() {
        // Same square, traced starting mid-edge.
        let c = contour(&[(50, 0), (100, 0), (100, 100), (0, 100), (0, 0)]);
        assert!(matches!(
            approximate_quadrilateral(&c, 0.02),
            QuadCandidate::Quad(_)
        ));
    }

    #[test]
    fn triangle_and_line_are_not_quads() {
        let triangle = contour(&[(0, 0), (80, 0), (40, 60)]);
        assert_eq!(
            approximate_quadrilateral(&triangle, 0.02),
            QuadCandidate::NotQuadrilateral { vertices: 3 }
        );

        let line = contour(&[(5, 10), (34, 10)]);
        assert!(matches!(
            approximate_quadrilateral(&line, 0.02),
            QuadCandidate::NotQuadrilateral { .. }
        ));
    }

    #[test]
    fn largest_area_wins_regardless_of_order() {
        let small = contour(&[(0, 0), (10, 0), (10, 10), (0, 10)]);
        let large = contour(&[(20, 20), (80, 20), (80, 70), (20, 70)]);

        assert_eq!(select_largest(&[small.clone(), large.clone()], 0.0), Some(1));
        assert_eq!(select_largest(&[large, small], 0.0), Some(0));
    }

    #[test]
    fn equal_areas_keep_first_and_empty_is_none() {
        let a = contour(&[(0, 0), (10, 0), (10, 10), (0, 10)]);
        let b = contour(&[(50, 50), (60, 50), (60, 60), (50, 60)]);
        assert_eq!(select_largest(&[a, b], 0.0), Some(0));
        assert_eq!(select_largest(&[], 0.0), None);
    }

    #[test]
    fn min_area_filters_small_contours() {
        let small = contour(&[(0, 0), (10, 0), (10, 10), (0, 10)]);
        assert_eq!(select_largest(std::slice::from_ref(&small), 50.0), Some(0));
        assert_eq!(select_largest(&[small], 500.0), None);
    }
}
