// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Input frame — an already-decoded pixel grid handed over by the capture
// layer (camera, file upload, or still photo).

use image::{DynamicImage, RgbImage, RgbaImage};
use scanwerk_core::error::{Result, ScanError};
use scanwerk_core::BoundingBox;

/// An immutable input frame.
///
/// The scanner only ever borrows a `Frame`; every buffer derived from it is
/// owned by the call that created it.
#[derive(Debug, Clone)]
pub struct Frame {
    image: DynamicImage,
}

impl Frame {
    // -- Construction ---------------------------------------------------------

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    /// Build a frame from interleaved 8-bit RGB (`channels == 3`) or RGBA
    /// (`channels == 4`) samples, as delivered by camera capture APIs.
    pub fn from_raw(width: u32, height: u32, channels: u8, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * channels as usize;
        if data.len() != expected {
            return Err(ScanError::InvalidInput(format!(
                "buffer holds {} bytes, expected {expected} for {width}x{height}x{channels}",
                data.len()
            )));
        }

        let image = match channels {
            3 => RgbImage::from_raw(width, height, data).map(DynamicImage::ImageRgb8),
            4 => RgbaImage::from_raw(width, height, data).map(DynamicImage::ImageRgba8),
            other => {
                return Err(ScanError::InvalidInput(format!(
                    "unsupported channel count {other} (expected 3 or 4)"
                )));
            }
        };

        image.map(Self::from_dynamic).ok_or_else(|| {
            ScanError::InvalidInput(format!("buffer does not fit a {width}x{height} image"))
        })
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Number of colour channels per pixel.
    pub fn channels(&self) -> u8 {
        self.image.color().channel_count()
    }

    /// Borrow the underlying `DynamicImage`.
    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    /// Reject frames the pipeline cannot process.
    pub fn validate(&self) -> Result<()> {
        if self.width() == 0 || self.height() == 0 {
            return Err(ScanError::InvalidInput(format!(
                "frame is {}x{}",
                self.width(),
                self.height()
            )));
        }
        if self.channels() == 0 {
            return Err(ScanError::InvalidInput("frame has no channels".into()));
        }
        Ok(())
    }

    /// Copy of the pixels inside `region`.
    pub(crate) fn crop(&self, region: &BoundingBox) -> DynamicImage {
        self.image
            .crop_imm(region.x, region.y, region.width, region.height)
    }
}

impl From<DynamicImage> for Frame {
    fn from(image: DynamicImage) -> Self {
        Self::from_dynamic(image)
    }
}
