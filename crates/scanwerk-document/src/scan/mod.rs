// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanning pipeline stages, leaf-first: edge map, contours, quadrilateral
// selection, corner ordering, perspective rectification, bounding-box
// fallback, and the orchestrating scanner.

pub mod contours;
pub mod corners;
pub mod edges;
pub mod fallback;
pub mod quad;
pub mod rectify;
pub mod scanner;

pub use scanner::DocumentScanner;
