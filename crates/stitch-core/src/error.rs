//! Error types for capture and stitching operations
//!
//! This module defines the error type shared by the geometry model, the
//! provider traits and the full-page capture algorithm. Each error carries
//! enough context to tell which collaborator or phase failed, and provides an
//! actionable remediation hint.

use std::fmt;

use crate::geometry::{CoordinatesType, Location};

/// Result type alias for capture and stitching operations
pub type StitchResult<T> = Result<T, StitchError>;

/// Phase of the full-page capture in which a failure occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StitchPhase {
    /// Scrolling the viewport back to its top/left corner
    ResetToOrigin,
    /// Capturing and normalizing the first tile at the origin
    InitialCapture,
    /// Capturing and compositing the remaining tiles
    Stitching,
}

impl StitchPhase {
    /// Returns the phase as a kebab-case string
    pub fn as_str(&self) -> &'static str {
        match self {
            StitchPhase::ResetToOrigin => "reset-to-origin",
            StitchPhase::InitialCapture => "initial-capture",
            StitchPhase::Stitching => "stitching",
        }
    }
}

impl fmt::Display for StitchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error type for capture and stitching operations
///
/// Collaborator failures are reported with their own variants; the
/// orchestrator wraps them in [`StitchError::Phase`] so callers can tell a
/// failed initial capture from a failure in the middle of stitching.
#[derive(Debug, thiserror::Error)]
pub enum StitchError {
    /// The viewport could not be scrolled to (0, 0)
    #[error(
        "Couldn't set position to the top/left corner after {attempts} attempts (last position \
         {last_position})"
    )]
    PositionReset {
        /// Number of attempts made
        attempts: u32,
        /// Position reported after the last attempt
        last_position: Location,
    },

    /// The entire content size could not be determined
    #[error("Failed to extract entire size of region context: {reason}")]
    EntireSizeUnavailable {
        /// Reason reported by the position provider
        reason: String,
    },

    /// The image provider failed to capture the viewport
    #[error("Image capture failed: {reason}")]
    ImageCapture {
        /// Reason for the capture failure
        reason: String,
    },

    /// A position provider operation failed
    #[error("Position provider '{operation}' failed: {reason}")]
    PositionOperation {
        /// The operation that failed (e.g. "set_position", "get_state")
        operation: String,
        /// Reason for the failure
        reason: String,
    },

    /// Scaling a captured image failed
    #[error("Scaling failed: {reason}")]
    ScaleFailed {
        /// Reason for the scaling failure
        reason: String,
    },

    /// Cutting a captured image failed
    #[error("Cut failed: {reason}")]
    CutFailed {
        /// Reason for the cut failure
        reason: String,
    },

    /// A region could not be converted between coordinate spaces
    #[error("Cannot convert region from {from} to {to}: {reason}")]
    RegionConversion {
        /// Source coordinate space
        from: CoordinatesType,
        /// Target coordinate space
        to: CoordinatesType,
        /// Reason for the conversion failure
        reason: String,
    },

    /// Invalid parameter provided
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: String,
        /// Reason why it's invalid
        reason: String,
    },

    /// Image encoding failed
    #[error("Failed to encode image as {format}: {reason}")]
    EncodingFailed {
        /// Image format that failed
        format: String,
        /// Reason for encoding failure
        reason: String,
    },

    /// I/O error occurred
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Image processing error
    #[error("Image processing error: {0}")]
    ImageError(String),

    /// A failure tagged with the capture phase it happened in
    #[error("Full-page capture failed during {phase}: {source}")]
    Phase {
        /// Phase that failed
        phase: StitchPhase,
        /// The underlying failure
        source: Box<StitchError>,
    },
}

impl StitchError {
    /// Wraps this error with the phase it occurred in
    pub fn in_phase(self, phase: StitchPhase) -> Self {
        StitchError::Phase {
            phase,
            source: Box::new(self),
        }
    }

    /// Returns the phase this error was tagged with, if any
    pub fn phase(&self) -> Option<StitchPhase> {
        match self {
            StitchError::Phase { phase, .. } => Some(*phase),
            StitchError::PositionReset { .. } => Some(StitchPhase::ResetToOrigin),
            _ => None,
        }
    }

    /// Returns the innermost error, looking through phase wrappers
    pub fn root_cause(&self) -> &StitchError {
        match self {
            StitchError::Phase { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Returns an actionable remediation hint for this error
    ///
    /// # Examples
    ///
    /// ```
    /// use stitch_core::{error::StitchError, geometry::Location};
    ///
    /// let error = StitchError::PositionReset {
    ///     attempts: 3,
    ///     last_position: Location::new(5, 5),
    /// };
    ///
    /// assert!(error.remediation_hint().contains("scroll"));
    /// ```
    pub fn remediation_hint(&self) -> &str {
        match self {
            StitchError::PositionReset { .. } => {
                "The page refused to scroll to its top/left corner. Check for scroll-locking \
                 scripts or overlays, or increase the stabilization delay."
            }
            StitchError::EntireSizeUnavailable { .. } => {
                "The content size could not be read; the visible viewport is used instead. \
                 Verify the page is fully loaded."
            }
            StitchError::ImageCapture { .. } => {
                "The viewport could not be captured. Make sure the target window is still open \
                 and visible."
            }
            StitchError::PositionOperation { operation, .. } => match operation.as_str() {
                "set_position" => {
                    "Scrolling failed. Ensure the page is scrollable and not navigating away."
                }
                "restore_state" => {
                    "The original scroll position could not be restored. The page may be left \
                     scrolled."
                }
                _ => "A position provider operation failed. Check the driver session is alive.",
            },
            StitchError::ScaleFailed { .. } => {
                "Scaling the captured image failed. Check the configured scale ratio."
            }
            StitchError::CutFailed { .. } => {
                "Cutting the captured image failed. The cut margins may exceed the image size."
            }
            StitchError::RegionConversion { .. } => {
                "The requested region could not be mapped onto the screenshot. Check the region's \
                 coordinates type."
            }
            StitchError::InvalidParameter { parameter, .. } => match parameter.as_str() {
                "tile_size" => "Tile width and height must both be greater than zero.",
                "region" => "The region must lie within the image bounds.",
                "container" => "The container's right and bottom edges must fit in an i32.",
                "scale_ratio" => "Scale ratio must be a finite number greater than zero.",
                _ => "Check the parameter value against the API documentation.",
            },
            StitchError::EncodingFailed { .. } => {
                "Image encoding failed. Try a different format (PNG or JPEG)."
            }
            StitchError::IoError(_) => {
                "An I/O error occurred. Check file permissions, disk space, and system resources."
            }
            StitchError::ImageError(_) => {
                "The stitched image could not be built. The reported content size may be \
                 overestimated; raise STITCH_MAX_CANVAS_PIXELS only if the page really is that \
                 large."
            }
            StitchError::Phase { source, .. } => source.remediation_hint(),
        }
    }
}
