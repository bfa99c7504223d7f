// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Corner ordering — assign top-left / top-right / bottom-right / bottom-left
// roles to the four vertices of a detected quadrilateral.

use std::cmp::Ordering;

use scanwerk_core::{CornerOrdering, OrderedCorners, Point2D, Quadrilateral};

/// Order the quadrilateral's vertices using `strategy`.
///
/// The returned roles are always a permutation of the input points.
pub fn order_corners(quad: &Quadrilateral, strategy: CornerOrdering) -> OrderedCorners {
    match strategy {
        CornerOrdering::VerticalSplit => order_by_vertical_split(quad.points()),
        CornerOrdering::Clockwise => order_clockwise(quad.points()),
    }
}

/// Total order on points: y ascending, then x ascending.
fn by_y_then_x(a: &Point2D, b: &Point2D) -> Ordering {
    a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x))
}

/// The two smallest-y points are the top edge; within each pair the smaller
/// x is on the left.
fn order_by_vertical_split(points: &[Point2D; 4]) -> OrderedCorners {
    let mut sorted = *points;
    sorted.sort_by(by_y_then_x);

    let (top_left, top_right) = left_right(sorted[0], sorted[1]);
    let (bottom_left, bottom_right) = left_right(sorted[2], sorted[3]);

    OrderedCorners {
        top_left,
        top_right,
        bottom_right,
        bottom_left,
    }
}

fn left_right(a: Point2D, b: Point2D) -> (Point2D, Point2D) {
    // Equal x: keep the upper point on the left so the split stays a total order.
    if a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)) == Ordering::Greater {
        (b, a)
    } else {
        (a, b)
    }
}

/// Sweep clockwise (on screen) around the centroid, starting at the point
/// with the smallest `x + y`.
fn order_clockwise(points: &[Point2D; 4]) -> OrderedCorners {
    let cx = points.iter().map(|p| p.x).sum::<f64>() / 4.0;
    let cy = points.iter().map(|p| p.y).sum::<f64>() / 4.0;

    let mut sorted = *points;
    // atan2 grows clockwise on screen because y points down.
    sorted.sort_by(|a, b| {
        let ta = (a.y - cy).atan2(a.x - cx);
        let tb = (b.y - cy).atan2(b.x - cx);
        ta.total_cmp(&tb).then(by_y_then_x(a, b))
    });

    let start = (0..4)
        .min_by(|&i, &j| {
            let si = sorted[i].x + sorted[i].y;
            let sj = sorted[j].x + sorted[j].y;
            si.total_cmp(&sj).then(by_y_then_x(&sorted[i], &sorted[j]))
        })
        .unwrap_or(0);

    OrderedCorners {
        top_left: sorted[start],
        top_right: sorted[(start + 1) % 4],
        bottom_right: sorted[(start + 2) % 4],
        bottom_left: sorted[(start + 3) % 4],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad(pts: [(f64, f64); 4]) -> Quadrilateral {
        Quadrilateral::new(pts.map(Point2D::from))
    }

    fn rotations(pts: [(f64, f64); 4]) -> Vec<Quadrilateral> {
        (0..4)
            .map(|k| {
                let mut rotated = pts;
                rotated.rotate_left(k);
                quad(rotated)
            })
            .collect()
    }

    fn is_permutation(quad: &Quadrilateral, corners: &OrderedCorners) -> bool {
        let mut input: Vec<(f64, f64)> = quad.points().iter().map(|p| (p.x, p.y)).collect();
        let mut output: Vec<(f64, f64)> =
            corners.to_array().iter().map(|p| (p.x, p.y)).collect();
        input.sort_by(|a, b| a.partial_cmp(b).unwrap());
        output.sort_by(|a, b| a.partial_cmp(b).unwrap());
        input == output
    }

    #[test]
    fn skewed_document_gets_visual_roles() {
        let q = quad([(310.0, 40.0), (30.0, 60.0), (60.0, 420.0), (330.0, 400.0)]);
        let c = order_corners(&q, CornerOrdering::VerticalSplit);
        assert_eq!(c.top_left, Point2D::new(30.0, 60.0));
        assert_eq!(c.top_right, Point2D::new(310.0, 40.0));
        assert_eq!(c.bottom_right, Point2D::new(330.0, 400.0));
        assert_eq!(c.bottom_left, Point2D::new(60.0, 420.0));
        assert!(is_permutation(&q, &c));
    }

    #[test]
    fn ordering_is_invariant_under_input_rotation() {
        let pts = [(12.0, 8.0), (205.0, 30.0), (190.0, 260.0), (3.0, 240.0)];
        for strategy in [CornerOrdering::VerticalSplit, CornerOrdering::Clockwise] {
            let expected = order_corners(&quad(pts), strategy);
            for q in rotations(pts) {
                assert_eq!(order_corners(&q, strategy), expected);
            }
        }
    }

    #[test]
    fn clockwise_agrees_with_vertical_split_when_upright() {
        let q = quad([(100.0, 5.0), (0.0, 0.0), (0.0, 80.0), (100.0, 90.0)]);
        assert_eq!(
            order_corners(&q, CornerOrdering::Clockwise),
            order_corners(&q, CornerOrdering::VerticalSplit)
        );
    }

    #[test]
    fn clockwise_handles_diamond() {
        // A square rotated 45 degrees.
        let q = quad([(50.0, 0.0), (100.0, 50.0), (50.0, 100.0), (0.0, 50.0)]);
        let c = order_corners(&q, CornerOrdering::Clockwise);
        assert!(is_permutation(&q, &c));
        assert!(c.is_convex());
        assert!(c.signed_area() > 0.0);
    }

    #[test]
    fn vertical_split_on_diamond_is_still_a_permutation() {
        let q = quad([(50.0, 0.0), (100.0, 50.0), (50.0, 100.0), (0.0, 50.0)]);
        let c = order_corners(&q, CornerOrdering::VerticalSplit);
        assert!(is_permutation(&q, &c));
        assert_eq!(c.top_left, Point2D::new(0.0, 50.0));
        assert_eq!(c.top_right, Point2D::new(50.0, 0.0));
    }
}
