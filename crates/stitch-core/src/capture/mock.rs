//! Mock scrollable viewport for testing
//!
//! This module provides `MockViewport`, an in-memory page that implements both
//! [`ImageProvider`] and [`PositionProvider`]. It behaves like a browser tab:
//! the page is larger than the viewport, scrolling is clamped at the page
//! edges, and every capture returns exactly what is visible.
//!
//! # Features
//!
//! - **Scroll Clamping:** requested positions are clamped to the scrollable
//!   range, as browsers do near the bottom/right of a page
//! - **Stuck Position:** simulate a page that refuses to scroll
//! - **Error Injection:** fail a chosen operation, optionally after a number
//!   of successful calls
//! - **Size Override:** report a wrong content size
//! - **Call Recording:** inspect requested positions and restore calls
//!
//! # Examples
//!
//! ```
//! use stitch_core::{
//!     capture::{ImageBuffer, ImageProvider, MockViewport, PositionProvider},
//!     geometry::{Location, RectangleSize},
//! };
//!
//! let page = ImageBuffer::from_test_pattern(300, 1000);
//! let viewport = MockViewport::new(page, RectangleSize::new(300, 400));
//!
//! // Scrolling past the end is clamped
//! viewport.set_position(Location::new(0, 900)).unwrap();
//! assert_eq!(viewport.get_current_position().unwrap(), Location::new(0, 600));
//!
//! let image = viewport.get_image().unwrap();
//! assert_eq!(image.dimensions(), (300, 400));
//! ```

use image::Rgba;
use parking_lot::Mutex;

use super::{ImageBuffer, ImageProvider, PositionMemento, PositionProvider};
use crate::{
    error::{StitchError, StitchResult},
    geometry::{Location, RectangleSize},
};

/// Background shown where the viewport extends past the page
const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Operation of a [`MockViewport`] that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockOperation {
    /// [`ImageProvider::get_image`]
    GetImage,
    /// [`PositionProvider::set_position`]
    SetPosition,
    /// [`PositionProvider::get_entire_size`]
    GetEntireSize,
}

impl MockOperation {
    fn error(&self) -> StitchError {
        match self {
            MockOperation::GetImage => StitchError::ImageCapture {
                reason: "injected failure".to_string(),
            },
            MockOperation::SetPosition => StitchError::PositionOperation {
                operation: "set_position".to_string(),
                reason: "injected failure".to_string(),
            },
            MockOperation::GetEntireSize => StitchError::EntireSizeUnavailable {
                reason: "injected failure".to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct InjectedFailure {
    operation: MockOperation,
    /// Number of calls to let through before failing
    after_calls: usize,
}

#[derive(Debug, Default)]
struct MockState {
    position: Location,
    requested: Vec<Location>,
    image_calls: usize,
    entire_size_calls: usize,
    restore_calls: usize,
}

/// In-memory scrollable page implementing the capture provider traits
///
/// # Thread Safety
///
/// State lives behind a `parking_lot::Mutex`, so the viewport can be shared
/// through `Arc` and used as origin provider, position provider and image
/// provider at once.
#[derive(Debug)]
pub struct MockViewport {
    page: ImageBuffer,
    viewport: RectangleSize,
    stuck_position: Option<Location>,
    reported_size: Option<RectangleSize>,
    failure: Option<InjectedFailure>,
    state: Mutex<MockState>,
}

impl MockViewport {
    /// Creates a viewport of size `viewport` over `page`, scrolled to (0, 0)
    pub fn new(page: ImageBuffer, viewport: RectangleSize) -> Self {
        Self {
            page,
            viewport,
            stuck_position: None,
            reported_size: None,
            failure: None,
            state: Mutex::new(MockState::default()),
        }
    }

    /// Makes the page ignore scrolling and always report `position`
    pub fn with_stuck_position(mut self, position: Location) -> Self {
        self.stuck_position = Some(position);
        self.state.get_mut().position = position;
        self
    }

    /// Reports `size` from `get_entire_size` instead of the page size
    pub fn with_reported_size(mut self, size: RectangleSize) -> Self {
        self.reported_size = Some(size);
        self
    }

    /// Fails every call to `operation`
    pub fn with_failure(self, operation: MockOperation) -> Self {
        self.with_failure_after(operation, 0)
    }

    /// Fails calls to `operation` once `after_calls` calls have succeeded
    pub fn with_failure_after(mut self, operation: MockOperation, after_calls: usize) -> Self {
        self.failure = Some(InjectedFailure {
            operation,
            after_calls,
        });
        self
    }

    /// The page behind the viewport
    pub fn page(&self) -> &ImageBuffer {
        &self.page
    }

    /// The largest position the page can be scrolled to
    pub fn max_scroll(&self) -> Location {
        Location::new(
            self.page.width().saturating_sub(self.viewport.width) as i32,
            self.page.height().saturating_sub(self.viewport.height) as i32,
        )
    }

    /// Positions passed to `set_position`, in call order
    pub fn requested_positions(&self) -> Vec<Location> {
        self.state.lock().requested.clone()
    }

    /// Number of `get_image` calls
    pub fn image_calls(&self) -> usize {
        self.state.lock().image_calls
    }

    /// Number of `restore_state` calls
    pub fn restore_calls(&self) -> usize {
        self.state.lock().restore_calls
    }

    fn check_failure(&self, operation: MockOperation, calls_so_far: usize) -> StitchResult<()> {
        match self.failure {
            Some(failure)
                if failure.operation == operation && calls_so_far >= failure.after_calls =>
            {
                Err(operation.error())
            }
            _ => Ok(()),
        }
    }

    fn clamp(&self, location: Location) -> Location {
        let max = self.max_scroll();
        Location::new(location.x.clamp(0, max.x), location.y.clamp(0, max.y))
    }
}

impl ImageProvider for MockViewport {
    fn get_image(&self) -> StitchResult<ImageBuffer> {
        let position = {
            let mut state = self.state.lock();
            let calls = state.image_calls;
            state.image_calls += 1;
            self.check_failure(MockOperation::GetImage, calls)?;
            state.position
        };

        let mut image = ImageBuffer::solid(self.viewport.width, self.viewport.height, BACKGROUND);
        image.composite(&self.page, Location::new(-position.x, -position.y));
        Ok(image)
    }
}

impl PositionProvider for MockViewport {
    fn get_state(&self) -> StitchResult<PositionMemento> {
        Ok(PositionMemento::new(self.state.lock().position))
    }

    fn restore_state(&self, state: &PositionMemento) -> StitchResult<()> {
        let mut current = self.state.lock();
        current.restore_calls += 1;
        if self.stuck_position.is_none() {
            current.position = self.clamp(state.position());
        }
        Ok(())
    }

    fn set_position(&self, location: Location) -> StitchResult<()> {
        let mut state = self.state.lock();
        let calls = state.requested.len();
        state.requested.push(location);
        self.check_failure(MockOperation::SetPosition, calls)?;

        if self.stuck_position.is_none() {
            state.position = self.clamp(location);
        }
        Ok(())
    }

    fn get_current_position(&self) -> StitchResult<Location> {
        Ok(self.state.lock().position)
    }

    fn get_entire_size(&self) -> StitchResult<RectangleSize> {
        let mut state = self.state.lock();
        let calls = state.entire_size_calls;
        state.entire_size_calls += 1;
        self.check_failure(MockOperation::GetEntireSize, calls)?;

        Ok(self.reported_size.unwrap_or_else(|| self.page.size()))
    }
}
