// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable messages for scan failures and for the "no document" outcome.
//
// The presentation layer shows these directly; each carries a suggestion the
// user can act on while the camera keeps running.

use crate::error::ScanError;

/// Severity of a scan problem from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Nothing wrong yet; the next frame may work.
    Transient,
    /// User must change something (lighting, framing, a different file).
    ActionRequired,
    /// Cannot be fixed by retrying (broken input or bad configuration).
    Permanent,
}

/// A human-readable message with an actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether scanning the next frame may succeed without user action.
    pub retriable: bool,
    pub severity: Severity,
}

/// Message shown when a frame contains no detectable document.
pub fn no_document_found() -> HumanError {
    HumanError {
        message: "No document detected.".into(),
        suggestion: "Place the page on a darker surface with good lighting and make sure all four edges are visible.".into(),
        retriable: true,
        severity: Severity::Transient,
    }
}

/// Convert a `ScanError` into a `HumanError`.
pub fn humanize_error(err: &ScanError) -> HumanError {
    match err {
        ScanError::InvalidInput(detail) => HumanError {
            message: "This picture can't be scanned.".into(),
            suggestion: format!("Try taking the photo again or choose a different image. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        ScanError::InvalidConfig(detail) => HumanError {
            message: "The scanner settings are invalid.".into(),
            suggestion: format!("Reset the scanner settings to their defaults. ({detail})"),
            retriable: false,
            severity: Severity::Permanent,
        },

        // Normally recovered by cropping; only reachable when callers use the
        // rectifier directly.
        ScanError::DegenerateGeometry(_) => HumanError {
            message: "The document edges couldn't be straightened.".into(),
            suggestion: "Hold the camera straight above the page and try again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        ScanError::Image(detail) => HumanError {
            message: "The image couldn't be opened.".into(),
            suggestion: format!("Make sure the file is a photo (JPEG or PNG) and try again. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        ScanError::Io(io) => HumanError {
            message: "A file couldn't be read or saved.".into(),
            suggestion: format!("Check the file still exists and that there is free space. ({io})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        ScanError::Serialization(detail) => HumanError {
            message: "The scanner settings file is damaged.".into(),
            suggestion: format!("Delete the settings file to restore the defaults. ({detail})"),
            retriable: false,
            severity: Severity::Permanent,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_document_is_transient() {
        let human = no_document_found();
        assert_eq!(human.severity, Severity::Transient);
        assert!(human.retriable);
    }

    #[test]
    fn invalid_input_is_action_required() {
        let human = humanize_error(&ScanError::InvalidInput("frame is 0x0".into()));
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(!human.retriable);
        assert!(human.suggestion.contains("0x0"));
    }

    #[test]
    fn bad_config_is_permanent() {
        let human = humanize_error(&ScanError::InvalidConfig("epsilon_ratio".into()));
        assert_eq!(human.severity, Severity::Permanent);
    }
}
