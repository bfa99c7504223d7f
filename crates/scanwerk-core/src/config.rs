// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanner configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScanError};

/// How four detected corners are assigned their document roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CornerOrdering {
    /// Two smallest-y points form the top edge, smaller x is left.
    /// Reliable for documents within roughly 45 degrees of upright.
    #[default]
    VerticalSplit,
    /// Angular sweep around the centroid starting from the point with the
    /// smallest `x + y`. Always yields a non-crossing cycle for convex quads.
    Clockwise,
}

/// Size of the rectified output image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputSize {
    /// Same width and height as the input frame.
    #[default]
    SourceFrame,
    /// A caller-chosen fixed size.
    Fixed { width: u32, height: u32 },
    /// The document's own extent, measured from its longest edges.
    FromCorners,
}

/// Tunables for the detection and rectification pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Gaussian kernel size (odd). Sigma is derived from it.
    pub blur_kernel_size: u32,
    /// Canny hysteresis low threshold.
    pub canny_low: f32,
    /// Canny hysteresis high threshold.
    pub canny_high: f32,
    /// Dilation radius applied to the edge map to close small gaps (0 = off).
    pub edge_dilation: u8,
    /// Polygon approximation tolerance as a fraction of contour perimeter.
    pub epsilon_ratio: f64,
    /// Contours enclosing less than this many square pixels are ignored.
    pub min_contour_area: f64,
    /// Quadrilaterals below this area are treated as degenerate.
    pub min_quad_area: f64,
    pub corner_ordering: CornerOrdering,
    pub output_size: OutputSize,
    /// RGBA colour for destination pixels that map outside the frame.
    pub fill: [u8; 4],
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            blur_kernel_size: 5,
            canny_low: 75.0,
            canny_high: 200.0,
            edge_dilation: 1,
            epsilon_ratio: 0.02,
            min_contour_area: 0.0,
            min_quad_area: 1.0,
            corner_ordering: CornerOrdering::VerticalSplit,
            output_size: OutputSize::SourceFrame,
            fill: [0, 0, 0, 0],
        }
    }
}

impl ScanConfig {
    /// Parse a JSON configuration; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file.
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&text)
    }

    /// Gaussian sigma equivalent to a `blur_kernel_size` square kernel.
    pub fn blur_sigma(&self) -> f32 {
        0.3 * ((self.blur_kernel_size as f32 - 1.0) * 0.5 - 1.0) + 0.8
    }

    pub fn validate(&self) -> Result<()> {
        if self.blur_kernel_size < 3 || self.blur_kernel_size % 2 == 0 {
            return Err(ScanError::InvalidConfig(format!(
                "blur_kernel_size must be odd and at least 3, got {}",
                self.blur_kernel_size
            )));
        }
        if !(self.canny_low > 0.0 && self.canny_low <= self.canny_high) {
            return Err(ScanError::InvalidConfig(format!(
                "canny thresholds must satisfy 0 < low <= high, got {} / {}",
                self.canny_low, self.canny_high
            )));
        }
        if !(self.epsilon_ratio > 0.0 && self.epsilon_ratio < 1.0) {
            return Err(ScanError::InvalidConfig(format!(
                "epsilon_ratio must lie in (0, 1), got {}",
                self.epsilon_ratio
            )));
        }
        if self.min_contour_area < 0.0 || self.min_quad_area < 0.0 {
            return Err(ScanError::InvalidConfig(
                "area thresholds must not be negative".into(),
            ));
        }
        if let OutputSize::Fixed { width, height } = self.output_size {
            if width == 0 || height == 0 {
                return Err(ScanError::InvalidConfig(format!(
                    "fixed output size must be non-empty, got {width}x{height}"
                )));
            }
        }
        Ok(())
    }
}
