// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Perspective rectifier — solves the projective transform taking the ordered
// document corners onto an upright rectangle and resamples the frame into it.

use image::{ImageBuffer, Rgba, RgbaImage};
use nalgebra::{Matrix3, SMatrix, SVector, Vector3};
use scanwerk_core::error::{Result, ScanError};
use scanwerk_core::{OrderedCorners, OutputSize, Point2D};
use tracing::{debug, instrument};

/// Transforms with a smaller absolute determinant are treated as singular.
const DET_EPSILON: f64 = 1e-10;

/// Sine of the smallest corner angle accepted before three corners count as
/// collinear.
const COLLINEAR_SIN_EPSILON: f64 = 1e-6;

/// Sub-pixel slack before a source sample counts as outside the frame.
const EDGE_SLACK: f64 = 1e-3;

/// A 3x3 projective transform acting on homogeneous pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform3x3 {
    matrix: Matrix3<f64>,
}

impl Transform3x3 {
    /// Wrap a matrix, rejecting singular or non-finite ones.
    pub fn from_matrix(matrix: Matrix3<f64>) -> Result<Self> {
        if matrix.iter().any(|v| !v.is_finite()) {
            return Err(ScanError::DegenerateGeometry(
                "transform has non-finite entries".into(),
            ));
        }
        let det = matrix.determinant();
        if det.abs() < DET_EPSILON {
            return Err(ScanError::DegenerateGeometry(format!(
                "transform is singular (determinant {det:e})"
            )));
        }
        Ok(Self { matrix })
    }

    /// The exact transform mapping `src[i]` onto `dst[i]` for all four pairs.
    ///
    /// Both point sets are first moved to zero centroid and mean distance
    /// `sqrt(2)`, then the eight unknowns (with `h33 = 1`) are solved as a
    /// square linear system and the normalisation is undone. The centroid of
    /// a convex quad never lies on its vanishing line, so pinning `h33` is
    /// safe in normalised coordinates even when it is not in pixel ones.
    pub fn from_correspondences(src: &[Point2D; 4], dst: &[Point2D; 4]) -> Result<Self> {
        let t_src = normalizing_transform(src);
        let t_dst = normalizing_transform(dst);
        let src_n = src.map(|p| apply_affine(&t_src, p));
        let dst_n = dst.map(|p| apply_affine(&t_dst, p));

        let mut a = SMatrix::<f64, 8, 8>::zeros();
        let mut b = SVector::<f64, 8>::zeros();

        for (i, (s, d)) in src_n.iter().zip(dst_n.iter()).enumerate() {
            let (x, y, u, v) = (s.x, s.y, d.x, d.y);
            let r = 2 * i;

            a[(r, 0)] = x;
            a[(r, 1)] = y;
            a[(r, 2)] = 1.0;
            a[(r, 6)] = -u * x;
            a[(r, 7)] = -u * y;
            b[r] = u;

            a[(r + 1, 3)] = x;
            a[(r + 1, 4)] = y;
            a[(r + 1, 5)] = 1.0;
            a[(r + 1, 6)] = -v * x;
            a[(r + 1, 7)] = -v * y;
            b[r + 1] = v;
        }

        let h = a.lu().solve(&b).ok_or_else(|| {
            ScanError::DegenerateGeometry("corner correspondences are not independent".into())
        })?;
        let normalized = Self::from_matrix(Matrix3::new(
            h[0], h[1], h[2], h[3], h[4], h[5], h[6], h[7], 1.0,
        ))?;

        let t_dst_inv = t_dst.try_inverse().ok_or_else(|| {
            ScanError::DegenerateGeometry("destination corners coincide".into())
        })?;
        let mut matrix = t_dst_inv * normalized.matrix * t_src;

        // Prefer h33 = 1; fall back to unit norm when the pixel origin sits on
        // the vanishing line and h33 vanishes.
        let norm = matrix.norm();
        let scale = if matrix[(2, 2)].abs() > 1e-12 * norm {
            matrix[(2, 2)]
        } else {
            norm
        };
        matrix /= scale;
        if matrix.iter().any(|v| !v.is_finite()) {
            return Err(ScanError::DegenerateGeometry(
                "transform has non-finite entries".into(),
            ));
        }
        Ok(Self { matrix })
    }

    /// Map the ordered corners onto `(0,0) (W,0) (W,H) (0,H)`.
    pub fn quad_to_rect(corners: &OrderedCorners, width: u32, height: u32) -> Result<Self> {
        let (w, h) = (width as f64, height as f64);
        let dst = [
            Point2D::new(0.0, 0.0),
            Point2D::new(w, 0.0),
            Point2D::new(w, h),
            Point2D::new(0.0, h),
        ];
        Self::from_correspondences(&corners.to_array(), &dst)
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.matrix
    }

    pub fn determinant(&self) -> f64 {
        self.matrix.determinant()
    }

    pub fn inverse(&self) -> Result<Self> {
        let inverse = self.matrix.try_inverse().ok_or_else(|| {
            ScanError::DegenerateGeometry("transform has no inverse".into())
        })?;
        Self::from_matrix(inverse)
    }

    /// Project a point. `None` when it maps to infinity.
    pub fn apply(&self, p: Point2D) -> Option<Point2D> {
        let q = self.matrix * Vector3::new(p.x, p.y, 1.0);
        if q.z.abs() < f64::EPSILON {
            return None;
        }
        Some(Point2D::new(q.x / q.z, q.y / q.z))
    }
}

/// Similarity taking `pts` to zero centroid and mean distance `sqrt(2)`.
fn normalizing_transform(pts: &[Point2D; 4]) -> Matrix3<f64> {
    let cx = pts.iter().map(|p| p.x).sum::<f64>() / 4.0;
    let cy = pts.iter().map(|p| p.y).sum::<f64>() / 4.0;
    let mean_dist = pts.iter().map(|p| (p.x - cx).hypot(p.y - cy)).sum::<f64>() / 4.0;
    let s = if mean_dist > 1e-15 {
        std::f64::consts::SQRT_2 / mean_dist
    } else {
        1.0
    };
    Matrix3::new(s, 0.0, -s * cx, 0.0, s, -s * cy, 0.0, 0.0, 1.0)
}

fn apply_affine(m: &Matrix3<f64>, p: Point2D) -> Point2D {
    Point2D::new(
        m[(0, 0)] * p.x + m[(0, 1)] * p.y + m[(0, 2)],
        m[(1, 0)] * p.x + m[(1, 1)] * p.y + m[(1, 2)],
    )
}

/// Reject corner sets that cannot define a projective transform: near-zero
/// area, three nearly collinear corners, or a self-intersecting cycle.
pub fn check_geometry(corners: &OrderedCorners, min_area: f64) -> Result<()> {
    let area = corners.signed_area();
    if area.abs() <= min_area {
        return Err(ScanError::DegenerateGeometry(format!(
            "quadrilateral area {area:.3} is not above {min_area}"
        )));
    }

    let pts = corners.to_array();
    for i in 0..4 {
        let (a, b, c) = (pts[i], pts[(i + 1) % 4], pts[(i + 2) % 4]);
        let (e1x, e1y) = (b.x - a.x, b.y - a.y);
        let (e2x, e2y) = (c.x - b.x, c.y - b.y);
        let lengths = e1x.hypot(e1y) * e2x.hypot(e2y);
        let cross = e1x * e2y - e1y * e2x;
        if lengths == 0.0 || (cross / lengths).abs() < COLLINEAR_SIN_EPSILON {
            return Err(ScanError::DegenerateGeometry(
                "three corners are collinear".into(),
            ));
        }
    }

    if !corners.is_convex() {
        return Err(ScanError::DegenerateGeometry(
            "corners do not form a convex quadrilateral".into(),
        ));
    }
    Ok(())
}

/// Output dimensions for the configured size policy.
pub fn output_dimensions(
    policy: OutputSize,
    frame_width: u32,
    frame_height: u32,
    corners: &OrderedCorners,
) -> (u32, u32) {
    match policy {
        OutputSize::SourceFrame => (frame_width, frame_height),
        OutputSize::Fixed { width, height } => (width, height),
        OutputSize::FromCorners => {
            let (w, h) = corners.edge_extent();
            ((w.round() as u32).max(1), (h.round() as u32).max(1))
        }
    }
}

/// Warp the quadrilateral `corners` of `source` into a `width` x `height`
/// upright image.
#[instrument(skip(source, corners, fill), fields(src_w = source.width(), src_h = source.height()))]
pub fn rectify(
    source: &RgbaImage,
    corners: &OrderedCorners,
    width: u32,
    height: u32,
    min_area: f64,
    fill: Rgba<u8>,
) -> Result<RgbaImage> {
    check_geometry(corners, min_area)?;
    let forward = Transform3x3::quad_to_rect(corners, width, height)?;
    debug!(determinant = forward.determinant(), "Projective transform solved");
    Ok(warp_perspective(source, &forward.inverse()?, width, height, fill))
}

/// Fill every destination pixel by mapping it through `dst_to_src` and
/// sampling `source` bilinearly. Samples outside `source` take `fill`.
pub fn warp_perspective(
    source: &RgbaImage,
    dst_to_src: &Transform3x3,
    width: u32,
    height: u32,
    fill: Rgba<u8>,
) -> RgbaImage {
    ImageBuffer::from_fn(width, height, |x, y| {
        match dst_to_src.apply(Point2D::new(x as f64, y as f64)) {
            Some(p) => sample_bilinear(source, p.x, p.y, fill),
            None => fill,
        }
    })
}

fn sample_bilinear(source: &RgbaImage, x: f64, y: f64, fill: Rgba<u8>) -> Rgba<u8> {
    let (w, h) = source.dimensions();
    if w == 0 || h == 0 {
        return fill;
    }
    let (max_x, max_y) = ((w - 1) as f64, (h - 1) as f64);
    if !(x >= -EDGE_SLACK && y >= -EDGE_SLACK && x <= max_x + EDGE_SLACK && y <= max_y + EDGE_SLACK)
    {
        return fill;
    }

    let x = x.clamp(0.0, max_x);
    let y = y.clamp(0.0, max_y);
    let (x0, y0) = (x.floor() as u32, y.floor() as u32);
    let (x1, y1) = ((x0 + 1).min(w - 1), (y0 + 1).min(h - 1));
    let (fx, fy) = (x - x0 as f64, y - y0 as f64);

    let p00 = source.get_pixel(x0, y0).0;
    let p10 = source.get_pixel(x1, y0).0;
    let p01 = source.get_pixel(x0, y1).0;
    let p11 = source.get_pixel(x1, y1).0;

    let mut out = [0u8; 4];
    for c in 0..4 {
        let top = p00[c] as f64 * (1.0 - fx) + p10[c] as f64 * fx;
        let bottom = p01[c] as f64 * (1.0 - fx) + p11[c] as f64 * fx;
        out[c] = (top * (1.0 - fy) + bottom * fy).round().clamp(0.0, 255.0) as u8;
    }
    Rgba(out)
}
