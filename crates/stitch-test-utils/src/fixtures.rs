//! Fake viewports for stitching tests
//!
//! [`SolidColorViewport`] captures a single colour per scroll position, so a
//! stitched image shows which tile ended up owning each pixel.

use std::sync::Arc;

use image::Rgba;
use parking_lot::Mutex;
use stitch_core::{
    capture::{
        FixedRegionProvider, FullPageCaptureAlgorithm, ImageBuffer, ImageProvider,
        NullCutProvider, NullScaleProvider, PositionMemento, PositionProvider, StitchConfig,
        StitchProviders, ViewportScreenshotFactory,
    },
    error::StitchResult,
    geometry::{Location, RectangleSize},
};

/// Colour of the tile captured at scroll position `(left, top)`
///
/// Red and green are the position divided by 10, blue and alpha are 255.
pub fn tile_color(left: i32, top: i32) -> Rgba<u8> {
    let channel = |v: i32| (v / 10).clamp(0, 255) as u8;
    Rgba([channel(left), channel(top), 255, 255])
}

#[derive(Debug, Default)]
struct Recorded {
    position: Location,
    requested: Vec<Location>,
    captures: usize,
    restore_calls: usize,
}

/// Viewport whose captures are solid tiles coloured by [`tile_color`]
///
/// Scrolling is clamped to `content - viewport` like a browser.
#[derive(Debug)]
pub struct SolidColorViewport {
    content: RectangleSize,
    viewport: RectangleSize,
    stuck_at: Option<Location>,
    recorded: Mutex<Recorded>,
}

impl SolidColorViewport {
    pub fn new(content: RectangleSize, viewport: RectangleSize) -> Self {
        Self {
            content,
            viewport,
            stuck_at: None,
            recorded: Mutex::new(Recorded::default()),
        }
    }

    /// Ignores scrolling and stays at `position`
    pub fn stuck_at(mut self, position: Location) -> Self {
        self.stuck_at = Some(position);
        self.recorded.get_mut().position = position;
        self
    }

    pub fn requested_positions(&self) -> Vec<Location> {
        self.recorded.lock().requested.clone()
    }

    pub fn captures(&self) -> usize {
        self.recorded.lock().captures
    }

    pub fn restore_calls(&self) -> usize {
        self.recorded.lock().restore_calls
    }

    fn max_scroll(&self) -> Location {
        Location::new(
            self.content.width.saturating_sub(self.viewport.width) as i32,
            self.content.height.saturating_sub(self.viewport.height) as i32,
        )
    }

    fn move_to(&self, recorded: &mut Recorded, location: Location) {
        if self.stuck_at.is_some() {
            return;
        }
        let max = self.max_scroll();
        recorded.position = Location::new(location.x.clamp(0, max.x), location.y.clamp(0, max.y));
    }
}

impl ImageProvider for SolidColorViewport {
    fn get_image(&self) -> StitchResult<ImageBuffer> {
        let mut recorded = self.recorded.lock();
        recorded.captures += 1;
        let position = recorded.position;
        Ok(ImageBuffer::solid(
            self.viewport.width,
            self.viewport.height,
            tile_color(position.x, position.y),
        ))
    }
}

impl PositionProvider for SolidColorViewport {
    fn get_state(&self) -> StitchResult<PositionMemento> {
        Ok(PositionMemento::new(self.recorded.lock().position))
    }

    fn restore_state(&self, state: &PositionMemento) -> StitchResult<()> {
        let mut recorded = self.recorded.lock();
        recorded.restore_calls += 1;
        self.move_to(&mut recorded, state.position());
        Ok(())
    }

    fn set_position(&self, location: Location) -> StitchResult<()> {
        let mut recorded = self.recorded.lock();
        recorded.requested.push(location);
        self.move_to(&mut recorded, location);
        Ok(())
    }

    fn get_current_position(&self) -> StitchResult<Location> {
        Ok(self.recorded.lock().position)
    }

    fn get_entire_size(&self) -> StitchResult<RectangleSize> {
        Ok(self.content)
    }
}

/// Runs a full-page capture against `viewport` with identity scale and cut
///
/// `viewport` serves as image, origin and position provider.
pub fn run_stitch<V>(
    viewport: &Arc<V>,
    region: &FixedRegionProvider,
    config: StitchConfig,
) -> StitchResult<ImageBuffer>
where
    V: ImageProvider + PositionProvider + 'static,
{
    let factory = ViewportScreenshotFactory::new(viewport.clone());
    let providers = StitchProviders {
        image_provider: viewport.as_ref(),
        region_provider: region,
        origin_provider: viewport.as_ref(),
        position_provider: viewport.as_ref(),
        scale_provider: &NullScaleProvider,
        cut_provider: &NullCutProvider,
        screenshot_factory: &factory,
    };
    FullPageCaptureAlgorithm::new(config).get_stitched_region(&providers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_color_encodes_position() {
        assert_eq!(tile_color(0, 0), Rgba([0, 0, 255, 255]));
        assert_eq!(tile_color(200, 130), Rgba([20, 13, 255, 255]));
        assert_eq!(tile_color(-5, 99_999), Rgba([0, 255, 255, 255]));
    }

    #[test]
    fn test_viewport_clamps_and_colours() {
        let viewport =
            SolidColorViewport::new(RectangleSize::new(300, 300), RectangleSize::new(100, 170));
        viewport.set_position(Location::new(0, 240)).unwrap();

        assert_eq!(viewport.get_current_position().unwrap(), Location::new(0, 130));
        let image = viewport.get_image().unwrap();
        assert_eq!(image.dimensions(), (100, 170));
        assert_eq!(image.pixel(0, 0), tile_color(0, 130));
    }

    #[test]
    fn test_stuck_viewport_ignores_scrolling() {
        let viewport =
            SolidColorViewport::new(RectangleSize::new(300, 300), RectangleSize::new(100, 100))
                .stuck_at(Location::new(5, 5));
        viewport.set_position(Location::ZERO).unwrap();
        viewport.restore_state(&PositionMemento::new(Location::ZERO)).unwrap();

        assert_eq!(viewport.get_current_position().unwrap(), Location::new(5, 5));
        assert_eq!(viewport.restore_calls(), 1);
    }
}
