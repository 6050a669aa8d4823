//! Stock scale, cut and region providers
//!
//! - [`NullScaleProvider`] / [`FixedScaleProvider`]: identity and fixed-ratio
//!   scaling (e.g. `1 / devicePixelRatio` on high-DPI displays)
//! - [`NullCutProvider`] / [`FixedCutProvider`]: identity and fixed-margin
//!   cutting
//! - [`FixedRegionProvider`]: a constant region in a given coordinate space

use tracing::debug;

use super::{CutProvider, ImageBuffer, RegionProvider, ScaleProvider};
use crate::{
    error::{StitchError, StitchResult},
    geometry::{CoordinatesType, Region},
};

/// Scale provider that leaves images untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct NullScaleProvider;

impl ScaleProvider for NullScaleProvider {
    fn scale_ratio(&self) -> f64 {
        1.0
    }

    fn scale_image(&self, image: ImageBuffer) -> StitchResult<ImageBuffer> {
        Ok(image)
    }
}

/// Scale provider applying a constant ratio
#[derive(Debug, Clone, Copy)]
pub struct FixedScaleProvider {
    scale_ratio: f64,
}

impl FixedScaleProvider {
    /// Creates a provider scaling every image by `scale_ratio`
    ///
    /// # Errors
    ///
    /// Returns [`StitchError::InvalidParameter`] unless the ratio is a finite
    /// number greater than zero.
    pub fn new(scale_ratio: f64) -> StitchResult<Self> {
        if !scale_ratio.is_finite() || scale_ratio <= 0.0 {
            return Err(StitchError::InvalidParameter {
                parameter: "scale_ratio".to_string(),
                reason: format!("{} is not a positive number", scale_ratio),
            });
        }
        Ok(Self { scale_ratio })
    }

    /// Creates a provider undoing a device pixel ratio
    pub fn from_device_pixel_ratio(device_pixel_ratio: f64) -> StitchResult<Self> {
        Self::new(1.0 / device_pixel_ratio)
    }
}

impl ScaleProvider for FixedScaleProvider {
    fn scale_ratio(&self) -> f64 {
        self.scale_ratio
    }

    fn scale_image(&self, image: ImageBuffer) -> StitchResult<ImageBuffer> {
        image.scale(self.scale_ratio).map_err(|e| StitchError::ScaleFailed {
            reason: e.to_string(),
        })
    }
}

/// Cut provider that leaves images untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCutProvider;

impl CutProvider for NullCutProvider {
    fn cut(&self, image: ImageBuffer) -> StitchResult<ImageBuffer> {
        Ok(image)
    }
}

/// Cut provider removing fixed margins from each side
///
/// Typically used to drop a mobile browser's address bar (`header`) and
/// toolbar (`footer`) from device screenshots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixedCutProvider {
    header: u32,
    footer: u32,
    left: u32,
    right: u32,
}

impl FixedCutProvider {
    /// Creates a cut provider with the given margins in pixels
    pub fn new(header: u32, footer: u32, left: u32, right: u32) -> Self {
        Self {
            header,
            footer,
            left,
            right,
        }
    }
}

impl CutProvider for FixedCutProvider {
    fn cut(&self, image: ImageBuffer) -> StitchResult<ImageBuffer> {
        let (width, height) = image.dimensions();
        let horizontal = self.left as u64 + self.right as u64;
        let vertical = self.header as u64 + self.footer as u64;

        if horizontal >= width as u64 || vertical >= height as u64 {
            return Err(StitchError::CutFailed {
                reason: format!(
                    "margins (header {}, footer {}, left {}, right {}) leave nothing of a {}x{} \
                     image",
                    self.header, self.footer, self.left, self.right, width, height
                ),
            });
        }

        let keep = Region::new(
            self.left as i32,
            self.header as i32,
            width - horizontal as u32,
            height - vertical as u32,
        );
        debug!("Cutting {}x{} image to {}", width, height, keep);

        image.crop(keep).map_err(|e| StitchError::CutFailed {
            reason: e.to_string(),
        })
    }
}

/// Region provider returning a constant region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedRegionProvider {
    region: Region,
    coordinates_type: CoordinatesType,
}

impl FixedRegionProvider {
    /// Creates a provider for `region` expressed in `coordinates_type`
    pub fn new(region: Region, coordinates_type: CoordinatesType) -> Self {
        Self {
            region,
            coordinates_type,
        }
    }

    /// Requests the entire content
    pub fn entire() -> Self {
        Self::new(Region::EMPTY, CoordinatesType::ScreenshotAsIs)
    }
}

impl Default for FixedRegionProvider {
    fn default() -> Self {
        Self::entire()
    }
}

impl RegionProvider for FixedRegionProvider {
    fn get_region(&self) -> Region {
        self.region
    }

    fn coordinates_type(&self) -> CoordinatesType {
        self.coordinates_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_providers_are_identity() {
        let img = ImageBuffer::from_test_pattern(40, 30);

        let scaled = NullScaleProvider.scale_image(img.clone()).unwrap();
        assert_eq!(scaled.dimensions(), (40, 30));
        assert_eq!(NullScaleProvider.scale_ratio(), 1.0);

        let cut = NullCutProvider.cut(img).unwrap();
        assert_eq!(cut.dimensions(), (40, 30));
    }

    #[test]
    fn test_fixed_scale_provider() {
        let provider = FixedScaleProvider::from_device_pixel_ratio(2.0).unwrap();
        assert_eq!(provider.scale_ratio(), 0.5);

        let scaled = provider.scale_image(ImageBuffer::from_test_pattern(200, 100)).unwrap();
        assert_eq!(scaled.dimensions(), (100, 50));
    }

    #[test]
    fn test_fixed_scale_provider_rejects_bad_ratio() {
        assert!(FixedScaleProvider::new(0.0).is_err());
        assert!(FixedScaleProvider::new(f64::INFINITY).is_err());
        assert!(FixedScaleProvider::from_device_pixel_ratio(0.0).is_err());
    }

    #[test]
    fn test_fixed_cut_provider_removes_margins() {
        let img = ImageBuffer::from_test_pattern(100, 100);
        let provider = FixedCutProvider::new(10, 20, 5, 15);

        let cut = provider.cut(img.clone()).unwrap();
        assert_eq!(cut.dimensions(), (80, 70));
        assert_eq!(cut.pixel(0, 0), img.pixel(5, 10));
    }

    #[test]
    fn test_fixed_cut_provider_too_large() {
        let img = ImageBuffer::from_test_pattern(10, 10);
        let result = FixedCutProvider::new(5, 5, 0, 0).cut(img);
        assert!(matches!(result, Err(StitchError::CutFailed { .. })));
    }

    #[test]
    fn test_fixed_region_provider() {
        let provider =
            FixedRegionProvider::new(Region::new(1, 2, 3, 4), CoordinatesType::ContextRelative);
        assert_eq!(provider.get_region(), Region::new(1, 2, 3, 4));
        assert_eq!(provider.coordinates_type(), CoordinatesType::ContextRelative);

        let entire = FixedRegionProvider::default();
        assert!(entire.get_region().is_empty());
        assert_eq!(entire.coordinates_type(), CoordinatesType::ScreenshotAsIs);
    }
}
