// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document scanner — the single entry point sequencing edge map, contour
// extraction, quadrilateral selection, corner ordering, and either
// perspective rectification or the bounding-box fallback.

use image::{GrayImage, Rgba, RgbaImage};
use scanwerk_core::error::{Result, ScanError};
use scanwerk_core::{BoundingBox, OrderedCorners, ScanConfig};
use tracing::{debug, info, instrument, warn};

use super::contours::{Contour, external_contours};
use super::corners::order_corners;
use super::edges::build_edge_map;
use super::fallback::crop_to_contour;
use super::quad::{QuadCandidate, approximate_quadrilateral, select_largest};
use super::rectify::{output_dimensions, rectify};
use crate::frame::Frame;

/// Optional upstream filter proposing where in the frame a document is
/// likely to be (e.g. an object detector). Scanning is correct without one.
pub trait RegionProposer {
    /// A region of `frame` to search, or `None` to search the whole frame.
    fn propose(&self, frame: &Frame) -> Option<BoundingBox>;
}

impl<F> RegionProposer for F
where
    F: Fn(&Frame) -> Option<BoundingBox>,
{
    fn propose(&self, frame: &Frame) -> Option<BoundingBox> {
        self(frame)
    }
}

/// Why the scanner cropped instead of rectifying.
#[derive(Debug, Clone, PartialEq)]
pub enum FallbackReason {
    /// The outline did not approximate to four vertices.
    NotQuadrilateral { vertices: usize },
    /// The outline or its corners cannot define a projective transform.
    DegenerateGeometry(String),
}

/// How the output image was produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanMethod {
    Perspective,
    BoundingBoxCrop(FallbackReason),
}

/// A scanned page, owned by the caller.
#[derive(Debug, Clone)]
pub struct ScannedDocument {
    pub image: RgbaImage,
    pub method: ScanMethod,
    /// Bounds of the selected outline in frame coordinates.
    pub bounds: BoundingBox,
    /// Ordered corners, when a quadrilateral was found.
    pub corners: Option<OrderedCorners>,
}

/// Result of scanning one frame.
#[derive(Debug, Clone)]
pub enum ScanOutcome {
    Document(ScannedDocument),
    /// The frame contains no closed outline at all.
    NoDocumentFound,
}

impl ScanOutcome {
    pub fn document(&self) -> Option<&ScannedDocument> {
        match self {
            Self::Document(doc) => Some(doc),
            Self::NoDocumentFound => None,
        }
    }

    pub fn into_document(self) -> Option<ScannedDocument> {
        match self {
            Self::Document(doc) => Some(doc),
            Self::NoDocumentFound => None,
        }
    }
}

/// Geometry found in a frame, before any resampling.
#[derive(Debug, Clone)]
pub struct Detection {
    /// The largest-area outline, in frame coordinates.
    pub contour: Contour,
    /// Number of external contours that were considered.
    pub candidates: usize,
    pub bounds: BoundingBox,
    pub candidate: QuadCandidate,
    pub corners: Option<OrderedCorners>,
}

/// Stateless document scanner. Holds only its configuration, so one
/// instance can scan any number of frames, from any number of threads.
#[derive(Debug, Clone, Default)]
pub struct DocumentScanner {
    config: ScanConfig,
}

impl DocumentScanner {
    // -- Construction ---------------------------------------------------------

    pub fn new(config: ScanConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    // -- Detection ------------------------------------------------------------

    /// Locate the document outline without producing an image.
    pub fn detect(&self, frame: &Frame) -> Result<Option<Detection>> {
        self.detect_in_region(frame, None)
    }

    /// Locate the document outline, searching only `region` when given.
    /// Returned geometry is always in full-frame coordinates.
    #[instrument(skip(self, frame), fields(width = frame.width(), height = frame.height()))]
    pub fn detect_in_region(
        &self,
        frame: &Frame,
        region: Option<BoundingBox>,
    ) -> Result<Option<Detection>> {
        frame.validate()?;

        let contours = match region {
            None => external_contours(&build_edge_map(frame.as_dynamic(), &self.config)),
            Some(region) => {
                if !region.fits_within(frame.width(), frame.height()) {
                    return Err(ScanError::InvalidInput(format!(
                        "region {region:?} lies outside the {}x{} frame",
                        frame.width(),
                        frame.height()
                    )));
                }
                let view = frame.crop(&region);
                external_contours(&build_edge_map(&view, &self.config))
                    .into_iter()
                    .map(|c| c.translate(region.x as i32, region.y as i32))
                    .collect()
            }
        };

        Ok(self.detect_in_contours(frame, contours))
    }

    /// Stages after contour extraction.
    fn detect_in_contours(&self, frame: &Frame, contours: Vec<Contour>) -> Option<Detection> {
        let candidates = contours.len();
        let index = select_largest(&contours, self.config.min_contour_area)?;
        let contour = contours.into_iter().nth(index)?;
        let bounds = contour.bounding_box(frame.width(), frame.height())?;

        let candidate = if contour.area() <= self.config.min_quad_area {
            // A zero-area outline (a bare line) cannot bound a page.
            QuadCandidate::NotQuadrilateral {
                vertices: contour.points().len(),
            }
        } else {
            approximate_quadrilateral(&contour, self.config.epsilon_ratio)
        };

        let corners = match &candidate {
            QuadCandidate::Quad(quad) => Some(order_corners(quad, self.config.corner_ordering)),
            QuadCandidate::NotQuadrilateral { .. } => None,
        };

        debug!(
            candidates,
            area = contour.area(),
            ?bounds,
            quad = corners.is_some(),
            "Document outline selected"
        );

        Some(Detection {
            contour,
            candidates,
            bounds,
            candidate,
            corners,
        })
    }

    // -- Scanning -------------------------------------------------------------

    /// Scan a frame: rectify the document if a clean quadrilateral is found,
    /// otherwise crop to the outline. `NoDocumentFound` only when the frame
    /// contains no outline at all.
    pub fn scan(&self, frame: &Frame) -> Result<ScanOutcome> {
        self.scan_in_region(frame, None)
    }

    /// Scan using the region suggested by an upstream `proposer`.
    pub fn scan_with(&self, frame: &Frame, proposer: &dyn RegionProposer) -> Result<ScanOutcome> {
        self.scan_in_region(frame, proposer.propose(frame))
    }

    /// Scan, restricting the outline search to `region` when given.
    pub fn scan_in_region(&self, frame: &Frame, region: Option<BoundingBox>) -> Result<ScanOutcome> {
        let detection = self.detect_in_region(frame, region)?;
        self.scan_detection(frame, detection.as_ref())
    }

    /// Produce the output image for a detection already obtained from
    /// `detect` or `detect_in_region` on the same `frame`, without running
    /// detection again.
    pub fn scan_detection(&self, frame: &Frame, detection: Option<&Detection>) -> Result<ScanOutcome> {
        match detection {
            Some(detection) => self.produce(frame, detection),
            None => {
                info!("No document found");
                Ok(ScanOutcome::NoDocumentFound)
            }
        }
    }

    /// Scan using an edge map computed elsewhere (same size as `frame`).
    pub fn scan_edge_map(&self, frame: &Frame, edge_map: &GrayImage) -> Result<ScanOutcome> {
        frame.validate()?;
        if edge_map.dimensions() != (frame.width(), frame.height()) {
            return Err(ScanError::InvalidInput(format!(
                "edge map is {}x{}, frame is {}x{}",
                edge_map.width(),
                edge_map.height(),
                frame.width(),
                frame.height()
            )));
        }
        let detection = self.detect_in_contours(frame, external_contours(edge_map));
        self.scan_detection(frame, detection.as_ref())
    }

    /// Scan a sequence of frames lazily, yielding outcomes in input order.
    pub fn scan_frames<'a, I>(&'a self, frames: I) -> impl Iterator<Item = Result<ScanOutcome>> + 'a
    where
        I: IntoIterator<Item = &'a Frame>,
        I::IntoIter: 'a,
    {
        frames.into_iter().map(move |frame| self.scan(frame))
    }

    /// Turn a detection into an image: rectify, or fall back to a crop.
    fn produce(&self, frame: &Frame, detection: &Detection) -> Result<ScanOutcome> {
        let source = frame.as_dynamic().to_rgba8();

        let reason = match (&detection.candidate, detection.corners) {
            (QuadCandidate::Quad(_), Some(corners)) => {
                let (width, height) = output_dimensions(
                    self.config.output_size,
                    frame.width(),
                    frame.height(),
                    &corners,
                );
                match rectify(
                    &source,
                    &corners,
                    width,
                    height,
                    self.config.min_quad_area,
                    Rgba(self.config.fill),
                ) {
                    Ok(image) => {
                        info!(width, height, "Document rectified");
                        return Ok(ScanOutcome::Document(ScannedDocument {
                            image,
                            method: ScanMethod::Perspective,
                            bounds: detection.bounds,
                            corners: Some(corners),
                        }));
                    }
                    Err(ScanError::DegenerateGeometry(detail)) => {
                        FallbackReason::DegenerateGeometry(detail)
                    }
                    Err(other) => return Err(other),
                }
            }
            (QuadCandidate::NotQuadrilateral { vertices }, _)
                if detection.contour.area() <= self.config.min_quad_area =>
            {
                FallbackReason::DegenerateGeometry(format!(
                    "outline of {vertices} points encloses no area"
                ))
            }
            (QuadCandidate::NotQuadrilateral { vertices }, _) => FallbackReason::NotQuadrilateral {
                vertices: *vertices,
            },
            (QuadCandidate::Quad(_), None) => {
                FallbackReason::DegenerateGeometry("corners could not be ordered".into())
            }
        };

        warn!(?reason, "Falling back to bounding-box crop");
        match crop_to_contour(&source, &detection.contour) {
            Some((image, bounds)) => Ok(ScanOutcome::Document(ScannedDocument {
                image,
                method: ScanMethod::BoundingBoxCrop(reason),
                bounds,
                corners: detection.corners,
            })),
            None => Ok(ScanOutcome::NoDocumentFound),
        }
    }
}
