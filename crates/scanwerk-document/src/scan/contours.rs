// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Contour extraction — border following over the edge map, keeping only the
// outermost boundaries, with runs of collinear chain points compressed to
// their endpoints.

use image::GrayImage;
use imageproc::contours::{BorderType, find_contours};
use imageproc::geometry::arc_length;
use imageproc::point::Point;
use scanwerk_core::{BoundingBox, Point2D};
use tracing::{debug, instrument};

/// A closed polyline traced around a region of the edge map.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    points: Vec<Point<i32>>,
    area: f64,
    /// Index of the enclosing contour in the traced set, if any.
    parent: Option<usize>,
}

impl Contour {
    /// Build a contour from a closed point sequence (the last point connects
    /// back to the first). The enclosed area is computed here.
    pub fn new(points: Vec<Point<i32>>) -> Self {
        let area = shoelace(&points);
        Self {
            points,
            area,
            parent: None,
        }
    }

    pub fn points(&self) -> &[Point<i32>] {
        &self.points
    }

    /// Absolute enclosed area in square pixels.
    pub fn area(&self) -> f64 {
        self.area
    }

    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    /// Closed arc length.
    pub fn perimeter(&self) -> f64 {
        if self.points.len() < 2 {
            return 0.0;
        }
        arc_length(&self.points, true)
    }

    pub fn to_points_2d(&self) -> Vec<Point2D> {
        self.points
            .iter()
            .map(|p| Point2D::new(p.x as f64, p.y as f64))
            .collect()
    }

    /// Axis-aligned bounds, clamped to a `width` x `height` frame.
    pub fn bounding_box(&self, width: u32, height: u32) -> Option<BoundingBox> {
        BoundingBox::enclosing(&self.to_points_2d(), width, height)
    }

    /// Shift every point by `(dx, dy)`, e.g. from region to frame coordinates.
    pub fn translate(mut self, dx: i32, dy: i32) -> Self {
        for p in &mut self.points {
            p.x += dx;
            p.y += dy;
        }
        self
    }
}

/// Trace every border in `edge_map`, keeping the hierarchy.
///
/// Points are compressed to segment endpoints. Contour order is the order in
/// which border following discovers them (raster order of each border's
/// first pixel).
pub fn trace_contours(edge_map: &GrayImage) -> Vec<(Contour, BorderType)> {
    find_contours::<i32>(edge_map)
        .into_iter()
        .map(|raw| {
            let points = compress_chain(raw.points);
            let area = shoelace(&points);
            (
                Contour {
                    points,
                    area,
                    parent: raw.parent,
                },
                raw.border_type,
            )
        })
        .collect()
}

/// Outermost closed boundaries of `edge_map`. Empty when there are none.
#[instrument(skip_all, fields(width = edge_map.width(), height = edge_map.height()))]
pub fn external_contours(edge_map: &GrayImage) -> Vec<Contour> {
    let traced = trace_contours(edge_map);
    let total = traced.len();

    let external: Vec<Contour> = traced
        .into_iter()
        .filter(|(contour, border)| *border == BorderType::Outer && contour.parent.is_none())
        .map(|(contour, _)| contour)
        .collect();

    debug!(total, external = external.len(), "Contours traced");
    external
}

/// Drop chain points that lie in the middle of a straight 8-connected run.
fn compress_chain(points: Vec<Point<i32>>) -> Vec<Point<i32>> {
    let n = points.len();
    if n < 3 {
        return points;
    }

    let step = |a: &Point<i32>, b: &Point<i32>| ((b.x - a.x).signum(), (b.y - a.y).signum());

    let kept: Vec<Point<i32>> = (0..n)
        .filter(|&i| {
            let prev = &points[(i + n - 1) % n];
            let next = &points[(i + 1) % n];
            step(prev, &points[i]) != step(&points[i], next)
        })
        .map(|i| points[i])
        .collect();

    // A closed run with no turns cannot occur, but never return nothing.
    if kept.is_empty() { points } else { kept }
}

fn shoelace(points: &[Point<i32>]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut twice_area: i64 = 0;
    for i in 0..n {
        let j = (i + 1) % n;
        twice_area += points[i].x as i64 * points[j].y as i64
            - points[j].x as i64 * points[i].y as i64;
    }
    twice_area.abs() as f64 / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;
    use imageproc::drawing::draw_hollow_rect_mut;
    use imageproc::rect::Rect;

    #[test]
    fn empty_map_has_no_contours() {
        let map = GrayImage::new(40, 30);
        assert!(external_contours(&map).is_empty());
    }

    #[test]
    fn square_ring_yields_single_external_contour() {
        let mut map = GrayImage::new(50, 50);
        draw_hollow_rect_mut(&mut map, Rect::at(10, 10).of_size(20, 20), Luma([255u8]));

        let all = trace_contours(&map);
        assert!(all.len() >= 2, "ring has an outer and a hole border");

        let external = external_contours(&map);
        assert_eq!(external.len(), 1);
        let contour = &external[0];
        assert!(contour.parent().is_none());
        // Compressed to the four corners of the outer border.
        assert_eq!(contour.points().len(), 4);
        assert!((contour.area() - 19.0 * 19.0).abs() < 1e-9);
        assert!((contour.perimeter() - 4.0 * 19.0).abs() < 1e-9);
    }

    #[test]
    fn nested_outline_is_discarded() {
        let mut map = GrayImage::new(80, 80);
        draw_hollow_rect_mut(&mut map, Rect::at(5, 5).of_size(70, 70), Luma([255u8]));
        draw_hollow_rect_mut(&mut map, Rect::at(25, 25).of_size(20, 20), Luma([255u8]));

        let external = external_contours(&map);
        assert_eq!(external.len(), 1);
        assert!((external[0].area() - 69.0 * 69.0).abs() < 1e-9);
    }

    #[test]
    fn straight_line_has_zero_area() {
        let mut map = GrayImage::new(40, 20);
        for x in 5..35 {
            map.put_pixel(x, 10, Luma([255u8]));
        }
        let external = external_contours(&map);
        assert_eq!(external.len(), 1);
        assert_eq!(external[0].area(), 0.0);
    }

    #[test]
    fn compress_keeps_turning_points_only() {
        let chain: Vec<Point<i32>> = [(0, 0), (1, 0), (2, 0), (2, 1), (2, 2), (1, 1)]
            .iter()
            .map(|&(x, y)| Point::new(x, y))
            .collect();
        let compressed = compress_chain(chain);
        assert_eq!(
            compressed,
            vec![Point::new(0, 0), Point::new(2, 0), Point::new(2, 2)]
        );
    }

    #[test]
    fn translate_and_bounds() {
        let contour = Contour::new(vec![
            Point::new(0, 0),
            Point::new(9, 0),
            Point::new(9, 4),
            Point::new(0, 4),
        ])
        .translate(5, 3);
        assert_eq!(
            contour.bounding_box(100, 100),
            Some(BoundingBox::new(5, 3, 10, 5))
        );
        assert!((contour.area() - 36.0).abs() < 1e-9);
    }
}
