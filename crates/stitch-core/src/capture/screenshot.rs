//! Coordinate-aware viewport screenshots
//!
//! A [`ViewportScreenshot`] remembers where the captured context was when the
//! image was taken, which lets it translate regions between the three
//! [`CoordinatesType`] spaces:
//!
//! - `ContextRelative`: relative to the top/left of the whole context
//! - `ContextAsIs`: relative to the visible part of the context
//! - `ScreenshotAsIs`: pixels of the captured image
//!
//! `ContextRelative` and `ContextAsIs` differ by the scroll position;
//! `ContextAsIs` and `ScreenshotAsIs` differ by the location of the context
//! (e.g. an iframe) inside the viewport.

use std::sync::Arc;

use tracing::debug;

use super::{ImageBuffer, PositionProvider, Screenshot, ScreenshotFactory};
use crate::{
    error::{StitchError, StitchResult},
    geometry::{CoordinatesType, Location, Region},
};

/// Screenshot of the viewport taken at a known scroll position
#[derive(Debug, Clone)]
pub struct ViewportScreenshot {
    image: ImageBuffer,
    scroll_position: Location,
    frame_location: Location,
}

impl ViewportScreenshot {
    /// Creates a screenshot taken while the context was scrolled to
    /// `scroll_position`, with the context's top/left at `frame_location`
    /// inside the image
    pub fn new(image: ImageBuffer, scroll_position: Location, frame_location: Location) -> Self {
        Self {
            image,
            scroll_position,
            frame_location,
        }
    }

    /// The scroll position at capture time
    pub fn scroll_position(&self) -> Location {
        self.scroll_position
    }

    /// The context's location inside the image
    pub fn frame_location(&self) -> Location {
        self.frame_location
    }

    fn shift(&self, from: CoordinatesType, to: CoordinatesType) -> (i32, i32) {
        use CoordinatesType::*;

        let scroll = self.scroll_position;
        let frame = self.frame_location;
        match (from, to) {
            (ContextRelative, ContextAsIs) => (-scroll.x, -scroll.y),
            (ContextAsIs, ContextRelative) => (scroll.x, scroll.y),
            (ContextAsIs, ScreenshotAsIs) => (frame.x, frame.y),
            (ScreenshotAsIs, ContextAsIs) => (-frame.x, -frame.y),
            (ContextRelative, ScreenshotAsIs) => (frame.x - scroll.x, frame.y - scroll.y),
            (ScreenshotAsIs, ContextRelative) => (scroll.x - frame.x, scroll.y - frame.y),
            (ScreenshotAsIs, ScreenshotAsIs)
            | (ContextAsIs, ContextAsIs)
            | (ContextRelative, ContextRelative) => (0, 0),
        }
    }
}

impl Screenshot for ViewportScreenshot {
    fn image(&self) -> &ImageBuffer {
        &self.image
    }

    fn into_image(self: Box<Self>) -> ImageBuffer {
        self.image
    }

    fn convert_region_location(
        &self,
        region: Region,
        from: CoordinatesType,
        to: CoordinatesType,
    ) -> StitchResult<Region> {
        if region.is_empty() {
            return Ok(region);
        }

        let (dx, dy) = self.shift(from, to);
        let (Some(left), Some(top)) = (region.left.checked_add(dx), region.top.checked_add(dy))
        else {
            return Err(StitchError::RegionConversion {
                from,
                to,
                reason: format!("{} moved by ({}, {}) leaves the coordinate range", region, dx, dy),
            });
        };
        let converted = Region::new(left, top, region.width, region.height);
        debug!("Converted {} from {} to {}: {}", region, from, to, converted);
        Ok(converted)
    }
}

/// Creates [`ViewportScreenshot`]s using the current scroll position
pub struct ViewportScreenshotFactory {
    position_provider: Arc<dyn PositionProvider>,
    frame_location: Location,
}

impl ViewportScreenshotFactory {
    /// Creates a factory for the top-level context
    pub fn new(position_provider: Arc<dyn PositionProvider>) -> Self {
        Self {
            position_provider,
            frame_location: Location::ZERO,
        }
    }

    /// Sets the location of the captured context inside the viewport
    pub fn with_frame_location(mut self, frame_location: Location) -> Self {
        self.frame_location = frame_location;
        self
    }
}

impl std::fmt::Debug for ViewportScreenshotFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewportScreenshotFactory")
            .field("frame_location", &self.frame_location)
            .finish()
    }
}

impl ScreenshotFactory for ViewportScreenshotFactory {
    fn make_screenshot(&self, image: ImageBuffer) -> StitchResult<Box<dyn Screenshot>> {
        let scroll_position = self.position_provider.get_current_position()?;
        Ok(Box::new(ViewportScreenshot::new(image, scroll_position, self.frame_location)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{capture::MockViewport, geometry::RectangleSize};

    fn screenshot(scroll: Location, frame: Location) -> ViewportScreenshot {
        ViewportScreenshot::new(ImageBuffer::blank(100, 100), scroll, frame)
    }

    #[test]
    fn test_same_space_is_identity() {
        let shot = screenshot(Location::new(10, 20), Location::new(5, 5));
        let region = Region::new(1, 2, 3, 4);
        for space in [
            CoordinatesType::ScreenshotAsIs,
            CoordinatesType::ContextAsIs,
            CoordinatesType::ContextRelative,
        ] {
            assert_eq!(shot.convert_region_location(region, space, space).unwrap(), region);
        }
    }

    #[test]
    fn test_context_relative_to_screenshot() {
        let shot = screenshot(Location::new(0, 300), Location::new(8, 40));
        let converted = shot
            .convert_region_location(
                Region::new(10, 350, 50, 50),
                CoordinatesType::ContextRelative,
                CoordinatesType::ScreenshotAsIs,
            )
            .unwrap();
        assert_eq!(converted, Region::new(18, 90, 50, 50));
    }

    #[test]
    fn test_conversions_round_trip() {
        let shot = screenshot(Location::new(7, 300), Location::new(8, 40));
        let region = Region::new(10, 350, 50, 50);
        let there = shot
            .convert_region_location(
                region,
                CoordinatesType::ContextRelative,
                CoordinatesType::ContextAsIs,
            )
            .unwrap();
        let back = shot
            .convert_region_location(
                there,
                CoordinatesType::ContextAsIs,
                CoordinatesType::ContextRelative,
            )
            .unwrap();
        assert_eq!(back, region);
    }

    #[test]
    fn test_conversion_overflow_is_an_error() {
        let shot = screenshot(Location::new(0, 300), Location::ZERO);
        let error = shot
            .convert_region_location(
                Region::new(0, i32::MIN + 10, 50, 50),
                CoordinatesType::ContextRelative,
                CoordinatesType::ScreenshotAsIs,
            )
            .unwrap_err();

        assert!(matches!(
            error,
            StitchError::RegionConversion {
                from: CoordinatesType::ContextRelative,
                to: CoordinatesType::ScreenshotAsIs,
                ..
            }
        ));
    }

    #[test]
    fn test_empty_region_passes_through() {
        let shot = screenshot(Location::new(10, 10), Location::new(10, 10));
        let converted = shot
            .convert_region_location(
                Region::EMPTY,
                CoordinatesType::ContextRelative,
                CoordinatesType::ScreenshotAsIs,
            )
            .unwrap();
        assert!(converted.is_empty());
    }

    #[test]
    fn test_factory_reads_current_position() {
        let viewport = Arc::new(MockViewport::new(
            ImageBuffer::from_test_pattern(200, 400),
            RectangleSize::new(200, 100),
        ));
        viewport.set_position(Location::new(0, 150)).unwrap();

        let factory = ViewportScreenshotFactory::new(viewport.clone())
            .with_frame_location(Location::new(0, 10));
        let shot = factory.make_screenshot(ImageBuffer::blank(200, 100)).unwrap();

        let converted = shot
            .convert_region_location(
                Region::new(0, 160, 10, 10),
                CoordinatesType::ContextRelative,
                CoordinatesType::ScreenshotAsIs,
            )
            .unwrap();
        assert_eq!(converted, Region::new(0, 20, 10, 10));
        assert_eq!(shot.into_image().dimensions(), (200, 100));
    }
}
