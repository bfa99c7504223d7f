// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Edge map builder — grayscale, Gaussian blur, Canny, and optional gap
// closing by dilation.

use image::{DynamicImage, GrayImage};
use imageproc::distance_transform::Norm;
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use imageproc::morphology::dilate;
use scanwerk_core::ScanConfig;
use tracing::{debug, instrument};

/// Build a binary edge map (0 or 255) with the same dimensions as `image`.
#[instrument(skip_all, fields(width = image.width(), height = image.height()))]
pub fn build_edge_map(image: &DynamicImage, config: &ScanConfig) -> GrayImage {
    // Step 1: Luminance.
    let gray = image.to_luma8();

    // Step 2: Gaussian blur with the sigma of the configured kernel size.
    let sigma = config.blur_sigma();
    let blurred = gaussian_blur_f32(&gray, sigma);

    // Step 3: Canny edge detection.
    let edges = canny(&blurred, config.canny_low, config.canny_high);
    debug!(
        sigma,
        low = config.canny_low,
        high = config.canny_high,
        "Canny edge detection complete"
    );

    // Step 4: Close single-pixel gaps so outlines trace as one contour.
    if config.edge_dilation > 0 {
        dilate(&edges, Norm::LInf, config.edge_dilation)
    } else {
        edges
    }
}
