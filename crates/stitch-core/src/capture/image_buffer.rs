//! Image buffer wrapper for captured tiles and stitched canvases
//!
//! This module provides an `ImageBuffer` wrapper around `image::DynamicImage`
//! with the operations the capture pipeline needs: cropping to a [`Region`],
//! scaling, allocating a blank canvas and compositing one image into another.
//!
//! # Examples
//!
//! ```
//! use stitch_core::{
//!     capture::ImageBuffer,
//!     geometry::{Location, Region},
//! };
//!
//! // A 200x100 canvas with a 50x50 tile pasted at (150, 50)
//! let mut canvas = ImageBuffer::blank(200, 100);
//! let tile = ImageBuffer::from_test_pattern(50, 50);
//! canvas.composite(&tile, Location::new(150, 50));
//!
//! let cropped = canvas.crop(Region::new(150, 50, 50, 50)).unwrap();
//! assert_eq!(cropped.dimensions(), (50, 50));
//! ```

use image::{GenericImageView, Rgba, RgbaImage};

use crate::{
    error::{StitchError, StitchResult},
    geometry::{Location, RectangleSize, Region},
};

/// Wrapper around `image::DynamicImage` with transformation methods
///
/// Transformations (`scale`, `crop`) return new buffers and leave the
/// original unchanged. [`composite`](ImageBuffer::composite) is the only
/// method that writes into the receiver.
#[derive(Clone, Debug)]
pub struct ImageBuffer {
    inner: image::DynamicImage,
}

impl ImageBuffer {
    /// Creates a new ImageBuffer from a DynamicImage
    pub fn new(image: image::DynamicImage) -> Self {
        Self { inner: image }
    }

    /// Creates a new ImageBuffer from RGBA8 pixel data
    pub fn from_rgba(image: RgbaImage) -> Self {
        Self::new(image::DynamicImage::ImageRgba8(image))
    }

    /// Creates a fully transparent RGBA canvas
    pub fn blank(width: u32, height: u32) -> Self {
        Self::new(image::DynamicImage::new_rgba8(width, height))
    }

    /// Creates an image filled with a single color
    pub fn solid(width: u32, height: u32, color: Rgba<u8>) -> Self {
        Self::from_rgba(RgbaImage::from_pixel(width, height, color))
    }

    /// Creates a test pattern whose pixels encode their own coordinates
    ///
    /// Red is `x % 256`, green is `y % 256`, and blue packs the 256-pixel
    /// block indices, so every pixel of an image up to 4096x4096 is unique.
    /// Useful for checking that stitched tiles land at the right offsets.
    ///
    /// # Examples
    ///
    /// ```
    /// use stitch_core::capture::ImageBuffer;
    ///
    /// let img = ImageBuffer::from_test_pattern(300, 300);
    /// assert_eq!(img.pixel(10, 20).0, [10, 20, 0, 255]);
    /// assert_eq!(img.pixel(260, 5).0, [4, 5, 16, 255]);
    /// ```
    pub fn from_test_pattern(width: u32, height: u32) -> Self {
        Self::from_rgba(RgbaImage::from_fn(width, height, test_pattern_pixel))
    }

    /// Scales the image by the given factor
    ///
    /// Uses Lanczos3 filtering. A factor of 1.0 returns an unchanged copy.
    /// Resulting dimensions are rounded down and never smaller than 1x1.
    ///
    /// # Errors
    ///
    /// Returns [`StitchError::InvalidParameter`] if `factor` is not a finite
    /// number greater than zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use stitch_core::capture::ImageBuffer;
    ///
    /// let img = ImageBuffer::from_test_pattern(1920, 1080);
    /// let half = img.scale(0.5).unwrap();
    /// assert_eq!(half.dimensions(), (960, 540));
    /// ```
    pub fn scale(&self, factor: f64) -> StitchResult<Self> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(StitchError::InvalidParameter {
                parameter: "scale_ratio".to_string(),
                reason: format!("scale factor {} is not a positive number", factor),
            });
        }

        let (width, height) = self.dimensions();
        let new_width = ((width as f64 * factor) as u32).max(1);
        let new_height = ((height as f64 * factor) as u32).max(1);

        if new_width == width && new_height == height {
            return Ok(self.clone());
        }

        let scaled =
            self.inner
                .resize_exact(new_width, new_height, image::imageops::FilterType::Lanczos3);

        Ok(Self::new(scaled))
    }

    /// Crops the image to the specified region
    ///
    /// The region must have area and lie within the image bounds.
    ///
    /// # Examples
    ///
    /// ```
    /// use stitch_core::{capture::ImageBuffer, geometry::Region};
    ///
    /// let img = ImageBuffer::from_test_pattern(1920, 1080);
    /// let cropped = img.crop(Region::new(100, 100, 800, 600)).unwrap();
    /// assert_eq!(cropped.dimensions(), (800, 600));
    /// ```
    pub fn crop(&self, region: Region) -> StitchResult<Self> {
        if !self.bounds().contains(&region) || !region.has_area() {
            let (img_width, img_height) = self.dimensions();
            return Err(StitchError::InvalidParameter {
                parameter: "region".to_string(),
                reason: format!(
                    "Region {} is empty or extends beyond image bounds ({}x{})",
                    region, img_width, img_height
                ),
            });
        }

        let cropped = self.inner.crop_imm(
            region.left as u32,
            region.top as u32,
            region.width,
            region.height,
        );

        Ok(Self::new(cropped))
    }

    /// Copies `part` into this image with its top/left corner at `location`
    ///
    /// Pixels are replaced, not blended. Any part of `part` falling outside
    /// this image is clipped.
    pub fn composite(&mut self, part: &ImageBuffer, location: Location) {
        image::imageops::replace(
            &mut self.inner,
            &part.inner,
            location.x as i64,
            location.y as i64,
        );
    }

    /// Returns the dimensions of the image as (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        self.inner.dimensions()
    }

    /// Returns the image width in pixels
    pub fn width(&self) -> u32 {
        self.dimensions().0
    }

    /// Returns the image height in pixels
    pub fn height(&self) -> u32 {
        self.dimensions().1
    }

    /// Returns the dimensions as a [`RectangleSize`]
    pub fn size(&self) -> RectangleSize {
        let (width, height) = self.dimensions();
        RectangleSize::new(width, height)
    }

    /// Returns the image bounding box anchored at (0, 0)
    pub fn bounds(&self) -> Region {
        Region::from_parts(Location::ZERO, self.size())
    }

    /// Returns the pixel at `(x, y)` as RGBA
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        self.inner.get_pixel(x, y)
    }

    /// Converts the image to RGBA8 format
    pub fn to_rgba8(&self) -> RgbaImage {
        self.inner.to_rgba8()
    }

    /// Returns a reference to the inner DynamicImage
    pub fn inner(&self) -> &image::DynamicImage {
        &self.inner
    }

    /// Consumes self and returns the inner DynamicImage
    pub fn into_inner(self) -> image::DynamicImage {
        self.inner
    }
}

fn test_pattern_pixel(x: u32, y: u32) -> Rgba<u8> {
    Rgba([
        (x % 256) as u8,
        (y % 256) as u8,
        (((x / 256) % 16) * 16 + (y / 256) % 16) as u8,
        255,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_from_dynamic_image() {
        let dynamic = image::DynamicImage::new_rgb8(100, 100);
        let buffer = ImageBuffer::new(dynamic);
        assert_eq!(buffer.dimensions(), (100, 100));
    }

    #[test]
    fn test_blank_is_transparent() {
        let canvas = ImageBuffer::blank(4, 3);
        assert_eq!(canvas.dimensions(), (4, 3));
        assert_eq!(canvas.pixel(3, 2).0, [0, 0, 0, 0]);
    }

    #[test]
    fn test_solid_fill() {
        let img = ImageBuffer::solid(5, 5, Rgba([1, 2, 3, 255]));
        assert_eq!(img.pixel(0, 0).0, [1, 2, 3, 255]);
        assert_eq!(img.pixel(4, 4).0, [1, 2, 3, 255]);
    }

    #[test]
    fn test_test_pattern_is_unique_per_pixel() {
        let img = ImageBuffer::from_test_pattern(600, 600);
        assert_ne!(img.pixel(0, 0), img.pixel(256, 0));
        assert_ne!(img.pixel(0, 0), img.pixel(0, 256));
        assert_ne!(img.pixel(256, 0), img.pixel(0, 256));
        assert_eq!(img.pixel(513, 257).0, [1, 1, 33, 255]);
    }

    #[test]
    fn test_scale_valid_factors() {
        let img = ImageBuffer::from_test_pattern(1000, 1000);

        assert_eq!(img.scale(0.5).unwrap().dimensions(), (500, 500));
        assert_eq!(img.scale(1.0).unwrap().dimensions(), (1000, 1000));
        assert_eq!(img.scale(1.5).unwrap().dimensions(), (1500, 1500));
    }

    #[test]
    fn test_scale_rejects_invalid_factor() {
        let img = ImageBuffer::from_test_pattern(10, 10);
        assert!(img.scale(0.0).is_err());
        assert!(img.scale(-1.0).is_err());
        assert!(img.scale(f64::NAN).is_err());
    }

    #[test]
    fn test_scale_never_below_one_pixel() {
        let img = ImageBuffer::from_test_pattern(10, 10);
        assert_eq!(img.scale(0.01).unwrap().dimensions(), (1, 1));
    }

    #[test]
    fn test_crop_valid_region() {
        let img = ImageBuffer::from_test_pattern(1920, 1080);
        let cropped = img.crop(Region::new(460, 240, 1000, 600)).unwrap();
        assert_eq!(cropped.dimensions(), (1000, 600));
        assert_eq!(cropped.pixel(0, 0), img.pixel(460, 240));
    }

    #[test]
    fn test_crop_boundary_check() {
        let img = ImageBuffer::from_test_pattern(1920, 1080);

        let full = img.crop(Region::new(0, 0, 1920, 1080)).unwrap();
        assert_eq!(full.dimensions(), (1920, 1080));

        let corner = img.crop(Region::new(1820, 980, 100, 100)).unwrap();
        assert_eq!(corner.dimensions(), (100, 100));
    }

    #[test]
    fn test_crop_out_of_bounds() {
        let img = ImageBuffer::from_test_pattern(1920, 1080);

        assert!(img.crop(Region::new(2000, 1000, 100, 100)).is_err());
        assert!(img.crop(Region::new(1900, 1000, 200, 200)).is_err());
        assert!(img.crop(Region::new(-1, 0, 100, 100)).is_err());
        assert!(img.crop(Region::new(10, 10, 0, 100)).is_err());
    }

    #[test]
    fn test_composite_replaces_pixels() {
        let mut canvas = ImageBuffer::blank(20, 20);
        let tile = ImageBuffer::solid(10, 10, Rgba([9, 9, 9, 255]));

        canvas.composite(&tile, Location::new(5, 5));

        assert_eq!(canvas.pixel(4, 4).0, [0, 0, 0, 0]);
        assert_eq!(canvas.pixel(5, 5).0, [9, 9, 9, 255]);
        assert_eq!(canvas.pixel(14, 14).0, [9, 9, 9, 255]);
        assert_eq!(canvas.pixel(15, 15).0, [0, 0, 0, 0]);
    }

    #[test]
    fn test_composite_clips_overflow() {
        let mut canvas = ImageBuffer::blank(10, 10);
        let tile = ImageBuffer::solid(10, 10, Rgba([7, 7, 7, 255]));

        canvas.composite(&tile, Location::new(5, -5));

        assert_eq!(canvas.dimensions(), (10, 10));
        assert_eq!(canvas.pixel(9, 0).0, [7, 7, 7, 255]);
        assert_eq!(canvas.pixel(4, 0).0, [0, 0, 0, 0]);
        assert_eq!(canvas.pixel(9, 5).0, [0, 0, 0, 0]);
    }

    #[test]
    fn test_size_and_bounds() {
        let img = ImageBuffer::blank(30, 40);
        assert_eq!(img.size(), RectangleSize::new(30, 40));
        assert_eq!(img.bounds(), Region::new(0, 0, 30, 40));
    }

    #[test]
    fn test_into_inner() {
        let img = ImageBuffer::from_test_pattern(100, 100);
        let dynamic = img.into_inner();
        assert_eq!(dynamic.dimensions(), (100, 100));
    }
}
