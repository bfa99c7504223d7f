// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core geometric types for the Scanwerk document scanner.

use serde::{Deserialize, Serialize};

/// A point in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: &Point2D) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<(f64, f64)> for Point2D {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Z component of `(b - a) x (c - b)`.
fn turn(a: &Point2D, b: &Point2D, c: &Point2D) -> f64 {
    (b.x - a.x) * (c.y - b.y) - (b.y - a.y) * (c.x - b.x)
}

/// Signed shoelace area of a closed polygon.
///
/// Positive for clockwise winding in image coordinates (y pointing down).
pub fn signed_polygon_area(points: &[Point2D]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut twice_area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        twice_area += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    twice_area / 2.0
}

/// An axis-aligned, non-empty pixel rectangle.
///
/// `(x, y)` is the top-left pixel; the box covers `width` columns and
/// `height` rows starting there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Smallest box containing every point, clamped to a `frame_width` x
    /// `frame_height` image. Returns `None` if `points` is empty or the frame
    /// has no pixels.
    pub fn enclosing(points: &[Point2D], frame_width: u32, frame_height: u32) -> Option<Self> {
        if points.is_empty() || frame_width == 0 || frame_height == 0 {
            return None;
        }
        let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
        let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in points {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        let clamp = |v: f64, limit: u32| v.floor().clamp(0.0, (limit - 1) as f64) as u32;
        let x0 = clamp(min_x, frame_width);
        let y0 = clamp(min_y, frame_height);
        let x1 = clamp(max_x, frame_width);
        let y1 = clamp(max_y, frame_height);

        Some(Self::new(x0, y0, x1 - x0 + 1, y1 - y0 + 1))
    }

    /// Whether the box lies completely inside a `width` x `height` frame.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.width > 0
            && self.height > 0
            && self.x as u64 + self.width as u64 <= width as u64
            && self.y as u64 + self.height as u64 <= height as u64
    }
}

/// Four document corners in no particular order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quadrilateral {
    points: [Point2D; 4],
}

impl Quadrilateral {
    pub fn new(points: [Point2D; 4]) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point2D; 4] {
        &self.points
    }
}

/// Quadrilateral corners tagged with their role on the upright document.
///
/// The four fields are always a permutation of the points of the
/// `Quadrilateral` they were ordered from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderedCorners {
    pub top_left: Point2D,
    pub top_right: Point2D,
    pub bottom_right: Point2D,
    pub bottom_left: Point2D,
}

impl OrderedCorners {
    /// Corners as `[top_left, top_right, bottom_right, bottom_left]`.
    pub fn to_array(&self) -> [Point2D; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        ]
    }

    /// Signed area of TL → TR → BR → BL. Positive when the corners run
    /// clockwise on screen, which is the orientation of an upright document.
    pub fn signed_area(&self) -> f64 {
        signed_polygon_area(&self.to_array())
    }

    /// True when the corner cycle is a strictly convex polygon in either
    /// winding.
    pub fn is_convex(&self) -> bool {
        let pts = self.to_array();
        let turns: Vec<f64> = (0..4)
            .map(|i| turn(&pts[i], &pts[(i + 1) % 4], &pts[(i + 2) % 4]))
            .collect();
        turns.iter().all(|t| *t > 0.0) || turns.iter().all(|t| *t < 0.0)
    }

    /// `(width, height)` of the document measured as the longer of each pair
    /// of opposite edges.
    pub fn edge_extent(&self) -> (f64, f64) {
        let width = self
            .top_left
            .distance(&self.top_right)
            .max(self.bottom_left.distance(&self.bottom_right));
        let height = self
            .top_left
            .distance(&self.bottom_left)
            .max(self.top_right.distance(&self.bottom_right));
        (width, height)
    }
}
