// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Detection overlay — draw the selected outline and ordered corners onto a
// copy of the frame, for previews and debugging.

use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut};

use crate::frame::Frame;
use crate::scan::scanner::Detection;

const OUTLINE: Rgba<u8> = Rgba([255, 64, 64, 255]);
const QUAD_EDGE: Rgba<u8> = Rgba([64, 220, 64, 255]);
/// TL, TR, BR, BL.
const CORNER_COLOURS: [Rgba<u8>; 4] = [
    Rgba([255, 0, 0, 255]),
    Rgba([0, 200, 0, 255]),
    Rgba([0, 96, 255, 255]),
    Rgba([255, 200, 0, 255]),
];

/// Render `detection` over an RGBA copy of `frame`.
pub fn draw_detection(frame: &Frame, detection: &Detection) -> RgbaImage {
    let mut canvas = frame.as_dynamic().to_rgba8();

    let points = detection.contour.points();
    for (i, p) in points.iter().enumerate() {
        let q = points[(i + 1) % points.len()];
        draw_line_segment_mut(
            &mut canvas,
            (p.x as f32, p.y as f32),
            (q.x as f32, q.y as f32),
            OUTLINE,
        );
    }

    if let Some(corners) = detection.corners {
        let pts = corners.to_array();
        for i in 0..4 {
            let (a, b) = (pts[i], pts[(i + 1) % 4]);
            draw_line_segment_mut(
                &mut canvas,
                (a.x as f32, a.y as f32),
                (b.x as f32, b.y as f32),
                QUAD_EDGE,
            );
        }
        let radius = (canvas.width().min(canvas.height()) / 80).max(2) as i32;
        for (p, colour) in pts.iter().zip(CORNER_COLOURS) {
            draw_filled_circle_mut(
                &mut canvas,
                (p.x.round() as i32, p.y.round() as i32),
                radius,
                colour,
            );
        }
    }

    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::scanner::DocumentScanner;
    use image::{DynamicImage, Rgb, RgbImage};
    use imageproc::drawing::draw_filled_rect_mut;
    use imageproc::rect::Rect;

    #[test]
    fn overlay_marks_corners_and_keeps_size() {
        let mut img = RgbImage::from_pixel(160, 120, Rgb([0, 0, 0]));
        draw_filled_rect_mut(&mut img, Rect::at(30, 20).of_size(100, 80), Rgb([255, 255, 255]));
        let frame = Frame::from_dynamic(DynamicImage::ImageRgb8(img));

        let detection = DocumentScanner::default()
            .detect(&frame)
            .unwrap()
            .expect("outline found");
        let corners = detection.corners.expect("quadrilateral");

        let overlay = draw_detection(&frame, &detection);
        assert_eq!(overlay.dimensions(), (160, 120));

        let tl = corners.top_left;
        let marked = overlay.get_pixel(tl.x.round() as u32, tl.y.round() as u32);
        assert_eq!(*marked, CORNER_COLOURS[0]);
    }
}
