// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Scanwerk.

use thiserror::Error;

/// Top-level error type for all Scanwerk operations.
///
/// "No document found" is deliberately absent: an empty frame is a valid
/// outcome of a scan, not a failure.
#[derive(Debug, Error)]
pub enum ScanError {
    // -- Input --
    #[error("invalid input frame: {0}")]
    InvalidInput(String),

    #[error("invalid scan configuration: {0}")]
    InvalidConfig(String),

    // -- Geometry --
    /// Raised by the rectifier and resolved by the scanner's fallback path.
    #[error("degenerate document geometry: {0}")]
    DegenerateGeometry(String),

    // -- Ambient I/O --
    #[error("image processing failed: {0}")]
    Image(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ScanError>;
