//! Full-page capture: scroll, capture and stitch
//!
//! [`FullPageCaptureAlgorithm`] reassembles a scrollable context that is
//! larger than its viewport into one image. It scrolls the context to its
//! top/left corner, captures a first tile, and when the content is larger
//! than that tile, walks the remaining tiles, compositing each one at the
//! scroll position actually reached.
//!
//! The scroll position is shared state on the page. Every exit path restores
//! the states saved at the start, whether the capture succeeded or not.

use std::thread;

use tracing::{debug, info, instrument, warn};

use super::{
    CutProvider, ImageBuffer, ImageProvider, PositionProvider, RegionProvider, ScaleProvider,
    ScreenshotFactory, StitchConfig,
};
use crate::{
    error::{StitchError, StitchPhase, StitchResult},
    geometry::{CoordinatesType, Location, RectangleSize, Region},
};

/// The collaborators a full-page capture runs against
///
/// The same object commonly plays several roles (e.g. a scroll provider is
/// both `origin_provider` and `position_provider`).
#[derive(Clone, Copy)]
pub struct StitchProviders<'a> {
    /// Captures the viewport
    pub image_provider: &'a dyn ImageProvider,
    /// The region to stitch
    pub region_provider: &'a dyn RegionProvider,
    /// Scrolled back to (0, 0) before capturing
    pub origin_provider: &'a dyn PositionProvider,
    /// Moved between tiles
    pub position_provider: &'a dyn PositionProvider,
    /// Normalizes each captured image's scale
    pub scale_provider: &'a dyn ScaleProvider,
    /// Cuts fixed margins off each captured image
    pub cut_provider: &'a dyn CutProvider,
    /// Maps the requested region into the first tile's pixels
    pub screenshot_factory: &'a dyn ScreenshotFactory,
}

/// Result of the first capture at the origin
struct InitialTile {
    image: ImageBuffer,
    /// Crop applied to every tile; `None` keeps whole tiles
    crop_region: Option<Region>,
}

/// Full-page capture and stitching
///
/// # Examples
///
/// ```
/// use std::{sync::Arc, time::Duration};
///
/// use stitch_core::{
///     capture::{
///         FixedRegionProvider, FullPageCaptureAlgorithm, ImageBuffer, MockViewport,
///         NullCutProvider, NullScaleProvider, StitchConfig, StitchProviders,
///         ViewportScreenshotFactory,
///     },
///     geometry::RectangleSize,
/// };
///
/// let page = ImageBuffer::from_test_pattern(300, 900);
/// let viewport = Arc::new(MockViewport::new(page, RectangleSize::new(300, 400)));
/// let factory = ViewportScreenshotFactory::new(viewport.clone());
/// let region = FixedRegionProvider::entire();
///
/// let providers = StitchProviders {
///     image_provider: viewport.as_ref(),
///     region_provider: &region,
///     origin_provider: viewport.as_ref(),
///     position_provider: viewport.as_ref(),
///     scale_provider: &NullScaleProvider,
///     cut_provider: &NullCutProvider,
///     screenshot_factory: &factory,
/// };
///
/// let config = StitchConfig::builder()
///     .wait_before_screenshots(Duration::ZERO)
///     .build();
/// let stitched = FullPageCaptureAlgorithm::new(config)
///     .get_stitched_region(&providers)
///     .unwrap();
/// assert_eq!(stitched.dimensions(), (300, 900));
/// ```
#[derive(Debug, Clone, Default)]
pub struct FullPageCaptureAlgorithm {
    config: StitchConfig,
}

impl FullPageCaptureAlgorithm {
    /// Creates an algorithm with the given configuration
    pub fn new(config: StitchConfig) -> Self {
        Self { config }
    }

    /// The configuration in use
    pub fn config(&self) -> &StitchConfig {
        &self.config
    }

    /// Captures the region described by `providers.region_provider`,
    /// stitching as many tiles as the content requires.
    ///
    /// # Errors
    ///
    /// - [`StitchError::PositionReset`] if the context cannot be scrolled to
    ///   (0, 0)
    /// - [`StitchError::Phase`] wrapping the collaborator failure, tagged with
    ///   [`StitchPhase::InitialCapture`] or [`StitchPhase::Stitching`]
    /// - [`StitchError::ImageError`], tagged with [`StitchPhase::Stitching`],
    ///   if the content size exceeds `max_canvas_pixels`
    ///
    /// A failure to read the content size is not an error; the first tile's
    /// size is used instead.
    #[instrument(
        skip_all,
        fields(wait_ms = self.config.wait_before_screenshots.as_millis() as u64)
    )]
    pub fn get_stitched_region(
        &self,
        providers: &StitchProviders<'_>,
    ) -> StitchResult<ImageBuffer> {
        info!("Starting full-page capture");
        let origin = providers.origin_provider;

        let origin_state = origin
            .get_state()
            .map_err(|e| e.in_phase(StitchPhase::ResetToOrigin))?;
        debug!("Saved origin state {}", origin_state);

        if let Err(e) = self.reset_to_origin(origin) {
            restore_quietly(origin, &origin_state);
            return Err(match e {
                StitchError::PositionReset { .. } => e,
                other => other.in_phase(StitchPhase::ResetToOrigin),
            });
        }

        let result = self.capture_from_origin(providers);

        match (result, origin.restore_state(&origin_state)) {
            (Ok(image), Ok(())) => {
                info!("Full-page capture finished: {}x{}", image.width(), image.height());
                Ok(image)
            }
            (Ok(_), Err(e)) => Err(e.in_phase(StitchPhase::Stitching)),
            (Err(e), restored) => {
                if let Err(restore_error) = restored {
                    warn!("Failed to restore origin state after error: {}", restore_error);
                }
                Err(e)
            }
        }
    }

    /// Everything after the reset; the caller restores the origin state.
    fn capture_from_origin(&self, providers: &StitchProviders<'_>) -> StitchResult<ImageBuffer> {
        let initial = self
            .capture_initial_tile(providers)
            .map_err(|e| e.in_phase(StitchPhase::InitialCapture))?;

        let entire_size = match providers.position_provider.get_entire_size() {
            Ok(size) => size,
            Err(e) => {
                warn!("Failed to extract entire size of region context, using image size: {}", e);
                initial.image.size()
            }
        };
        debug!("Entire size: {}, first tile: {}", entire_size, initial.image.size());

        if initial.image.size().covers(entire_size) {
            debug!("Entire region fits in one tile");
            return Ok(initial.image);
        }

        self.stitch(providers, initial, entire_size)
            .map_err(|e| e.in_phase(StitchPhase::Stitching))
    }

    /// Scrolls to (0, 0), retrying up to `set_position_retries` times
    fn reset_to_origin(&self, provider: &dyn PositionProvider) -> StitchResult<()> {
        let attempts = self.config.set_position_retries.max(1);
        let mut position = Location::ZERO;

        for attempt in 1..=attempts {
            provider.set_position(Location::ZERO)?;
            self.wait();
            position = provider.get_current_position()?;
            if position.is_origin() {
                debug!("Reached origin after {} attempt(s)", attempt);
                return Ok(());
            }
            warn!("Attempt {}: position is {}, expected (0, 0)", attempt, position);
        }

        Err(StitchError::PositionReset {
            attempts,
            last_position: position,
        })
    }

    fn capture_initial_tile(&self, providers: &StitchProviders<'_>) -> StitchResult<InitialTile> {
        let image = capture_normalized(providers)?;
        let screenshot = providers.screenshot_factory.make_screenshot(image)?;

        let requested = providers.region_provider.get_region();
        let region = screenshot.convert_region_location(
            requested,
            providers.region_provider.coordinates_type(),
            CoordinatesType::ScreenshotAsIs,
        )?;
        let image = screenshot.into_image();

        let crop_region = if region.is_empty() {
            None
        } else {
            let clamped = region.intersection(&image.bounds());
            if clamped.has_area() {
                Some(clamped)
            } else {
                warn!(
                    "Region {} lies outside the {}x{} capture, using the whole capture",
                    region,
                    image.width(),
                    image.height()
                );
                None
            }
        };

        let image = match crop_region {
            Some(region) => image.crop(region)?,
            None => image,
        };

        Ok(InitialTile { image, crop_region })
    }

    fn stitch(
        &self,
        providers: &StitchProviders<'_>,
        initial: InitialTile,
        entire_size: RectangleSize,
    ) -> StitchResult<ImageBuffer> {
        let canvas_pixels = entire_size.width as u64 * entire_size.height as u64;
        if canvas_pixels > self.config.max_canvas_pixels {
            return Err(StitchError::ImageError(format!(
                "{} canvas has {} pixels, more than the limit of {}",
                entire_size, canvas_pixels, self.config.max_canvas_pixels
            )));
        }

        let part_size = RectangleSize::new(
            initial.image.width(),
            initial
                .image
                .height()
                .saturating_sub(self.config.max_scroll_bar_size)
                .max(self.config.min_part_height),
        );
        let parts = Region::from_parts(Location::ZERO, entire_size).sub_regions(part_size, false)?;
        info!("Stitching {} parts of {} into {}", parts.len(), part_size, entire_size);

        let mut canvas = ImageBuffer::blank(entire_size.width, entire_size.height);
        canvas.composite(&initial.image, Location::ZERO);

        let position = providers.position_provider;
        let position_state = position.get_state()?;

        let stitched = self.stitch_parts(
            providers,
            &parts,
            initial.crop_region,
            &mut canvas,
            initial.image.size(),
        );

        let restored = position.restore_state(&position_state);
        let (last_position, last_size) = match stitched {
            Ok(last) => last,
            Err(e) => {
                if let Err(restore_error) = restored {
                    warn!("Failed to restore position state after error: {}", restore_error);
                }
                return Err(e);
            }
        };
        restored?;

        trim(canvas, last_position, last_size)
    }

    /// Captures every part but the first, returning the last achieved
    /// position and the size of the last tile
    fn stitch_parts(
        &self,
        providers: &StitchProviders<'_>,
        parts: &[Region],
        crop_region: Option<Region>,
        canvas: &mut ImageBuffer,
        initial_size: RectangleSize,
    ) -> StitchResult<(Location, RectangleSize)> {
        let position = providers.position_provider;
        let mut last_position = Location::ZERO;
        let mut last_size = initial_size;

        for part in parts.iter().filter(|part| !part.location().is_origin()) {
            position.set_position(part.location())?;
            self.wait();
            let achieved = position.get_current_position()?;
            debug!("Part {}: requested {}, reached {}", part, part.location(), achieved);

            let tile = capture_normalized(providers)?;
            let tile = match crop_region {
                Some(region) => tile.crop(region)?,
                None => tile,
            };

            canvas.composite(&tile, achieved);
            last_position = achieved;
            last_size = tile.size();
        }

        Ok((last_position, last_size))
    }

    fn wait(&self) {
        if !self.config.wait_before_screenshots.is_zero() {
            thread::sleep(self.config.wait_before_screenshots);
        }
    }
}

/// Capture, then scale, then cut
fn capture_normalized(providers: &StitchProviders<'_>) -> StitchResult<ImageBuffer> {
    let image = providers.image_provider.get_image()?;
    let image = providers.scale_provider.scale_image(image)?;
    providers.cut_provider.cut(image)
}

/// Crops the canvas to the area the tiles actually reached
fn trim(
    canvas: ImageBuffer,
    last_position: Location,
    last_size: RectangleSize,
) -> StitchResult<ImageBuffer> {
    let reached = |start: i32, extent: u32, limit: u32| -> u32 {
        (start as i64 + extent as i64).clamp(0, limit as i64) as u32
    };
    let reached_width = reached(last_position.x, last_size.width, canvas.width());
    let reached_height = reached(last_position.y, last_size.height, canvas.height());

    if reached_width == 0 || reached_height == 0 {
        warn!("Stitched area is empty, keeping the full canvas");
        return Ok(canvas);
    }
    if reached_width == canvas.width() && reached_height == canvas.height() {
        return Ok(canvas);
    }

    debug!(
        "Trimming {}x{} canvas to {}x{}",
        canvas.width(),
        canvas.height(),
        reached_width,
        reached_height
    );
    canvas.crop(Region::new(0, 0, reached_width, reached_height))
}

fn restore_quietly(provider: &dyn PositionProvider, state: &super::PositionMemento) {
    if let Err(e) = provider.restore_state(state) {
        warn!("Failed to restore state {}: {}", state, e);
    }
}
