// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Fallback cropper — axis-aligned bounding-box crop of the selected contour,
// used whenever no usable quadrilateral could be rectified.

use image::RgbaImage;
use image::imageops::crop_imm;
use scanwerk_core::BoundingBox;
use tracing::debug;

use super::contours::Contour;

/// Crop `source` to the bounds of `contour`.
///
/// Returns `None` only for an empty contour or an empty source; any contour
/// with at least one point yields a crop of at least one pixel.
pub fn crop_to_contour(source: &RgbaImage, contour: &Contour) -> Option<(RgbaImage, BoundingBox)> {
    let bounds = contour.bounding_box(source.width(), source.height())?;
    debug!(?bounds, "Cropping to contour bounds");
    let cropped = crop_imm(source, bounds.x, bounds.y, bounds.width, bounds.height).to_image();
    Some((cropped, bounds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use imageproc::point::Point;

    #[test]
    fn crop_matches_contour_bounds() {
        let mut src = RgbaImage::from_pixel(50, 40, Rgba([0, 0, 0, 255]));
        src.put_pixel(10, 5, Rgba([255, 0, 0, 255]));

        let contour = Contour::new(vec![
            Point::new(10, 5),
            Point::new(30, 8),
            Point::new(25, 20),
        ]);
        let (crop, bounds) = crop_to_contour(&src, &contour).expect("non-empty");
        assert_eq!(bounds, BoundingBox::new(10, 5, 21, 16));
        assert_eq!(crop.dimensions(), (21, 16));
        assert_eq!(*crop.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn straight_line_still_produces_pixels() {
        let src = RgbaImage::new(40, 20);
        let line = Contour::new(vec![Point::new(5, 10), Point::new(34, 10)]);
        let (crop, _) = crop_to_contour(&src, &line).unwrap();
        assert_eq!(crop.dimensions(), (30, 1));
    }

    #[test]
    fn out_of_frame_points_are_clamped() {
        let src = RgbaImage::new(20, 20);
        let contour = Contour::new(vec![Point::new(-5, -5), Point::new(30, 25)]);
        let (crop, bounds) = crop_to_contour(&src, &contour).unwrap();
        assert_eq!(bounds, BoundingBox::new(0, 0, 20, 20));
        assert_eq!(crop.dimensions(), (20, 20));
    }
}
