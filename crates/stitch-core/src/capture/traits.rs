//! Collaborator traits consumed by the full-page capture algorithm
//!
//! Each trait represents one capability the algorithm needs from its
//! surroundings. Production code backs them with a browser driver; tests back
//! them with in-memory fakes.
//!
//! # Traits
//!
//! - [`ImageProvider`]: capture the current viewport
//! - [`PositionProvider`]: read, move, save and restore the scroll position
//! - [`ScaleProvider`]: normalize a captured image's scale
//! - [`CutProvider`]: trim fixed margins off a captured image
//! - [`ScreenshotFactory`] / [`Screenshot`]: map regions into screenshot pixels
//! - [`RegionProvider`]: the region the caller wants stitched
//!
//! All methods take `&self` so that one object can serve as several
//! providers at once (a scroll provider is commonly both the origin and the
//! position provider). Stateful implementations use interior mutability.

use std::fmt;

use super::ImageBuffer;
use crate::{
    error::StitchResult,
    geometry::{CoordinatesType, Location, RectangleSize, Region},
};

// ============================================================================
// Position State
// ============================================================================

/// Opaque snapshot of a position provider's state
///
/// Returned by [`PositionProvider::get_state`] and handed back to
/// [`PositionProvider::restore_state`]. Providers that need more than the
/// position (e.g. an element's CSS transform) store it in `token`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionMemento {
    position: Location,
    token: Option<String>,
}

impl PositionMemento {
    /// Creates a memento holding only a position
    pub fn new(position: Location) -> Self {
        Self {
            position,
            token: None,
        }
    }

    /// Attaches provider-specific state
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// The saved position
    pub fn position(&self) -> Location {
        self.position
    }

    /// The provider-specific state, if any
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

impl fmt::Display for PositionMemento {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.token {
            Some(token) => write!(f, "{} [{}]", self.position, token),
            None => write!(f, "{}", self.position),
        }
    }
}

// ============================================================================
// Capability Traits
// ============================================================================

/// Capability: capture the currently visible viewport.
///
/// Must be free of side effects on the page; the returned image reflects the
/// viewport at the current scroll position.
pub trait ImageProvider: Send + Sync {
    /// Captures the viewport.
    fn get_image(&self) -> StitchResult<ImageBuffer>;
}

/// Capability: read and move the scroll position of the captured context.
pub trait PositionProvider: Send + Sync {
    /// Snapshots whatever is needed to restore the current position later.
    fn get_state(&self) -> StitchResult<PositionMemento>;

    /// Restores a state previously returned by [`get_state`](Self::get_state).
    fn restore_state(&self, state: &PositionMemento) -> StitchResult<()>;

    /// Requests a new position. The achieved position may differ (e.g.
    /// clamped at the page edges); read it back with
    /// [`get_current_position`](Self::get_current_position).
    fn set_position(&self, location: Location) -> StitchResult<()>;

    /// Returns the position actually in effect.
    fn get_current_position(&self) -> StitchResult<Location>;

    /// Returns the size of the entire scrollable content.
    ///
    /// May fail; the capture algorithm falls back to the viewport size.
    fn get_entire_size(&self) -> StitchResult<RectangleSize>;
}

/// Capability: bring a captured image to the logical (CSS pixel) scale.
pub trait ScaleProvider: Send + Sync {
    /// The ratio applied by [`scale_image`](Self::scale_image).
    fn scale_ratio(&self) -> f64;

    /// Scales the image. Deterministic for a fixed ratio.
    fn scale_image(&self, image: ImageBuffer) -> StitchResult<ImageBuffer>;
}

/// Capability: cut fixed margins (browser chrome, status bars) off a capture.
pub trait CutProvider: Send + Sync {
    /// Cuts the image. Deterministic for a fixed policy.
    fn cut(&self, image: ImageBuffer) -> StitchResult<ImageBuffer>;
}

/// A captured image that knows how its pixels relate to the page.
pub trait Screenshot: Send + Sync {
    /// The captured image.
    fn image(&self) -> &ImageBuffer;

    /// Releases the captured image.
    fn into_image(self: Box<Self>) -> ImageBuffer;

    /// Converts a region's location between coordinate spaces. The region's
    /// size is unchanged.
    fn convert_region_location(
        &self,
        region: Region,
        from: CoordinatesType,
        to: CoordinatesType,
    ) -> StitchResult<Region>;
}

/// Capability: wrap a captured image into a coordinate-aware [`Screenshot`].
pub trait ScreenshotFactory: Send + Sync {
    /// Creates a screenshot for an image captured at the current position.
    fn make_screenshot(&self, image: ImageBuffer) -> StitchResult<Box<dyn Screenshot>>;
}

/// Capability: describe the region the caller wants stitched.
pub trait RegionProvider: Send + Sync {
    /// The region to stitch. [`Region::EMPTY`] requests the entire content.
    fn get_region(&self) -> Region;

    /// The coordinate space [`get_region`](Self::get_region) is expressed in.
    fn coordinates_type(&self) -> CoordinatesType;
}
