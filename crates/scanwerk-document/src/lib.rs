// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// scanwerk-document — Document detection and rectification.
//
// Locates the document outline in a camera frame or photo (edge map, contour
// tracing, quadrilateral selection, corner ordering) and produces an upright
// image of the page, either by perspective correction or by a bounding-box
// crop when no clean quadrilateral is found.

pub mod frame;
pub mod overlay;
pub mod scan;

// Re-export the primary structs so callers can use `scanwerk_document::DocumentScanner` etc.
pub use frame::Frame;
pub use overlay::draw_detection;
pub use scan::contours::Contour;
pub use scan::quad::QuadCandidate;
pub use scan::rectify::Transform3x3;
pub use scan::scanner::{
    Detection, DocumentScanner, FallbackReason, RegionProposer, ScanMethod, ScanOutcome,
    ScannedDocument,
};
