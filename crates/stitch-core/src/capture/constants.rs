//! Stitching constants and runtime configuration.
//!
//! This module holds the values that shape a full-page capture: how long to
//! let the page settle after scrolling, how much of each tile to discard to
//! avoid duplicated scroll bars and fixed footers, and how many times to try
//! scrolling back to the origin.
//!
//! # Runtime Configuration
//!
//! Tunable values can be overridden at runtime via environment variables:
//!
//! | Environment Variable | Default | Description |
//! |---------------------|---------|-------------|
//! | `STITCH_WAIT_BEFORE_SCREENSHOTS_MS` | 100 | Delay after each scroll |
//! | `STITCH_MAX_SCROLL_BAR_SIZE` | 50 | Pixels dropped from each tile's height |
//! | `STITCH_MIN_SCREENSHOT_PART_HEIGHT` | 10 | Lower bound on a tile's height |
//! | `STITCH_MAX_CANVAS_PIXELS` | 268435456 | Largest stitched canvas, in pixels |
//!
//! The origin-reset attempt count is part of the capture contract and is not
//! configurable from the environment.

use std::time::Duration;

/// Default delay between changing the scroll position and capturing.
///
/// Gives the page time to repaint and lazy content time to load. 100ms covers
/// a few animation frames on typical pages.
pub const WAIT_BEFORE_SCREENSHOTS_MS: u64 = 100;

/// Height, in pixels, dropped from every tile when planning the tiles.
///
/// This should pretty much cover all horizontal scroll bars, as well as
/// fixed-position footers, which would otherwise appear once per tile.
pub const MAX_SCROLL_BAR_SIZE: u32 = 50;

/// Minimum tile height after subtracting [`MAX_SCROLL_BAR_SIZE`].
pub const MIN_SCREENSHOT_PART_HEIGHT: u32 = 10;

/// Number of attempts at scrolling back to (0, 0) before giving up.
pub const SET_POSITION_RETRIES: u32 = 3;

/// Largest canvas, in pixels, a capture may allocate (1 GiB of RGBA).
///
/// The content size comes from the page and may be wildly overestimated.
pub const MAX_CANVAS_PIXELS: u64 = 1 << 28;

// =============================================================================
// Environment Variable Overrides
// =============================================================================

fn get_from_env<T: std::str::FromStr>(env_var: &str, default: T) -> T {
    std::env::var(env_var)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Get the stabilization delay, checking environment variable override.
///
/// Override with: `STITCH_WAIT_BEFORE_SCREENSHOTS_MS`
///
/// # Example
///
/// ```bash
/// # Give slow single-page apps more time to settle
/// export STITCH_WAIT_BEFORE_SCREENSHOTS_MS=500
/// ```
pub fn wait_before_screenshots_ms() -> u64 {
    get_from_env("STITCH_WAIT_BEFORE_SCREENSHOTS_MS", WAIT_BEFORE_SCREENSHOTS_MS)
}

/// Get the scroll bar margin, checking environment variable override.
///
/// Override with: `STITCH_MAX_SCROLL_BAR_SIZE`
pub fn max_scroll_bar_size() -> u32 {
    get_from_env("STITCH_MAX_SCROLL_BAR_SIZE", MAX_SCROLL_BAR_SIZE)
}

/// Get the minimum tile height, checking environment variable override.
///
/// Override with: `STITCH_MIN_SCREENSHOT_PART_HEIGHT`
pub fn min_screenshot_part_height() -> u32 {
    get_from_env("STITCH_MIN_SCREENSHOT_PART_HEIGHT", MIN_SCREENSHOT_PART_HEIGHT)
}

/// Get the canvas pixel limit, checking environment variable override.
///
/// Override with: `STITCH_MAX_CANVAS_PIXELS`
pub fn max_canvas_pixels() -> u64 {
    get_from_env("STITCH_MAX_CANVAS_PIXELS", MAX_CANVAS_PIXELS)
}

// =============================================================================
// Stitch Configuration
// =============================================================================

/// Configuration of a [`FullPageCaptureAlgorithm`](super::FullPageCaptureAlgorithm)
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use stitch_core::capture::StitchConfig;
///
/// let config = StitchConfig::builder()
///     .wait_before_screenshots(Duration::ZERO)
///     .max_scroll_bar_size(0)
///     .build();
/// assert_eq!(config.set_position_retries, 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StitchConfig {
    /// Delay after every scroll before capturing
    pub wait_before_screenshots: Duration,
    /// Height dropped from each tile to skip scroll bars and fixed footers
    pub max_scroll_bar_size: u32,
    /// Lower bound on the tile height
    pub min_part_height: u32,
    /// Attempts at scrolling to the origin
    pub set_position_retries: u32,
    /// Largest canvas, in pixels, the stitcher will allocate
    pub max_canvas_pixels: u64,
}

impl Default for StitchConfig {
    fn default() -> Self {
        Self {
            wait_before_screenshots: Duration::from_millis(WAIT_BEFORE_SCREENSHOTS_MS),
            max_scroll_bar_size: MAX_SCROLL_BAR_SIZE,
            min_part_height: MIN_SCREENSHOT_PART_HEIGHT,
            set_position_retries: SET_POSITION_RETRIES,
            max_canvas_pixels: MAX_CANVAS_PIXELS,
        }
    }
}

impl StitchConfig {
    /// Creates a builder starting from the defaults
    pub fn builder() -> StitchConfigBuilder {
        StitchConfigBuilder::default()
    }

    /// Creates a configuration from the defaults and environment overrides
    pub fn from_env() -> Self {
        Self {
            wait_before_screenshots: Duration::from_millis(wait_before_screenshots_ms()),
            max_scroll_bar_size: max_scroll_bar_size(),
            min_part_height: min_screenshot_part_height(),
            set_position_retries: SET_POSITION_RETRIES,
            max_canvas_pixels: max_canvas_pixels(),
        }
    }
}

/// Builder for [`StitchConfig`]
#[derive(Debug, Clone, Default)]
pub struct StitchConfigBuilder {
    config: StitchConfig,
}

impl StitchConfigBuilder {
    /// Sets the delay after every scroll
    pub fn wait_before_screenshots(mut self, wait: Duration) -> Self {
        self.config.wait_before_screenshots = wait;
        self
    }

    /// Sets the height dropped from each tile
    pub fn max_scroll_bar_size(mut self, pixels: u32) -> Self {
        self.config.max_scroll_bar_size = pixels;
        self
    }

    /// Sets the lower bound on the tile height (at least 1)
    pub fn min_part_height(mut self, pixels: u32) -> Self {
        self.config.min_part_height = pixels.max(1);
        self
    }

    /// Sets the largest canvas, in pixels, a capture may allocate
    pub fn max_canvas_pixels(mut self, pixels: u64) -> Self {
        self.config.max_canvas_pixels = pixels;
        self
    }

    /// Finishes the configuration
    pub fn build(self) -> StitchConfig {
        self.config
    }
}

#[cfg(test)]
#[allow(clippy::assertions_on_constants)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_sanity() {
        assert!(MIN_SCREENSHOT_PART_HEIGHT > 0);
        assert!(MAX_SCROLL_BAR_SIZE > MIN_SCREENSHOT_PART_HEIGHT);
        assert_eq!(SET_POSITION_RETRIES, 3);
    }

    #[test]
    fn test_default_config() {
        let config = StitchConfig::default();
        assert_eq!(config.wait_before_screenshots, Duration::from_millis(100));
        assert_eq!(config.max_scroll_bar_size, 50);
        assert_eq!(config.min_part_height, 10);
        assert_eq!(config.set_position_retries, 3);
        assert_eq!(config.max_canvas_pixels, 268_435_456);
    }

    #[test]
    fn test_builder_overrides() {
        let config = StitchConfig::builder()
            .wait_before_screenshots(Duration::from_millis(5))
            .max_scroll_bar_size(20)
            .min_part_height(0)
            .max_canvas_pixels(1_000)
            .build();

        assert_eq!(config.wait_before_screenshots, Duration::from_millis(5));
        assert_eq!(config.max_scroll_bar_size, 20);
        assert_eq!(config.min_part_height, 1);
        assert_eq!(config.max_canvas_pixels, 1_000);
    }

    #[test]
    fn test_env_override_with_value() {
        temp_env::with_vars(
            [
                ("STITCH_WAIT_BEFORE_SCREENSHOTS_MS", Some("250")),
                ("STITCH_MAX_SCROLL_BAR_SIZE", Some("30")),
                ("STITCH_MIN_SCREENSHOT_PART_HEIGHT", Some("5")),
                ("STITCH_MAX_CANVAS_PIXELS", Some("4000000")),
            ],
            || {
                let config = StitchConfig::from_env();
                assert_eq!(config.max_canvas_pixels, 4_000_000);
                assert_eq!(config.wait_before_screenshots, Duration::from_millis(250));
                assert_eq!(config.max_scroll_bar_size, 30);
                assert_eq!(config.min_part_height, 5);
                assert_eq!(config.set_position_retries, SET_POSITION_RETRIES);
            },
        );
    }

    #[test]
    fn test_env_override_invalid_value() {
        temp_env::with_vars(
            [
                ("STITCH_WAIT_BEFORE_SCREENSHOTS_MS", Some("soon")),
                ("STITCH_MAX_SCROLL_BAR_SIZE", Some("-1")),
                ("STITCH_MIN_SCREENSHOT_PART_HEIGHT", Some("1.5")),
                ("STITCH_MAX_CANVAS_PIXELS", Some("lots")),
            ],
            || {
                assert_eq!(wait_before_screenshots_ms(), WAIT_BEFORE_SCREENSHOTS_MS);
                assert_eq!(max_scroll_bar_size(), MAX_SCROLL_BAR_SIZE);
                assert_eq!(min_screenshot_part_height(), MIN_SCREENSHOT_PART_HEIGHT);
                assert_eq!(max_canvas_pixels(), MAX_CANVAS_PIXELS);
            },
        );
    }

    #[test]
    fn test_env_unset_uses_defaults() {
        temp_env::with_vars_unset(
            [
                "STITCH_WAIT_BEFORE_SCREENSHOTS_MS",
                "STITCH_MAX_SCROLL_BAR_SIZE",
                "STITCH_MIN_SCREENSHOT_PART_HEIGHT",
                "STITCH_MAX_CANVAS_PIXELS",
            ],
            || {
                assert_eq!(StitchConfig::from_env(), StitchConfig::default());
            },
        );
    }
}
