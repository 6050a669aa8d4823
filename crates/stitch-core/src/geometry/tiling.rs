//! Tiling of a container region into capture-sized sub-regions
//!
//! Two policies are available:
//!
//! - **Varying size** ([`sub_regions_with_varying_size`]): tiles are clipped
//!   at the container's right/bottom edge. Tiles never overlap and exactly
//!   cover the container; trailing tiles may be smaller than the tile size.
//! - **Fixed size** ([`sub_regions_with_fixed_size`]): every tile has the
//!   same size. A tile that would overflow the container is shifted back so
//!   that its far edge is flush with the container, overlapping its
//!   neighbour. Used when the capture back-end can only produce images of
//!   one size.
//!
//! Both enumerate tiles row by row, top to bottom, each row left to right.
//! A container without area produces no tiles.

use super::{RectangleSize, Region};
use crate::error::{StitchError, StitchResult};

fn validate_tile_size(tile_size: RectangleSize) -> StitchResult<()> {
    if tile_size.width == 0 || tile_size.height == 0 {
        return Err(StitchError::InvalidParameter {
            parameter: "tile_size".to_string(),
            reason: format!("tile size must be positive in both dimensions, got {}", tile_size),
        });
    }
    Ok(())
}

/// Tile corners are `i32`, so the container must end inside that range
fn validate_container(container: &Region) -> StitchResult<()> {
    if container.right() > i32::MAX as i64 || container.bottom() > i32::MAX as i64 {
        return Err(StitchError::InvalidParameter {
            parameter: "container".to_string(),
            reason: format!("{} extends past the i32 coordinate range", container),
        });
    }
    Ok(())
}

/// Splits `container` into tiles of exactly `tile_size`, overlapping at the
/// right/bottom edges
///
/// The tile size is first clamped to the container size. If the clamped tile
/// covers the whole container, the container itself is the only tile.
///
/// # Errors
///
/// Returns [`StitchError::InvalidParameter`] if either tile dimension is
/// zero, or if the container's right or bottom edge exceeds `i32::MAX`.
///
/// # Examples
///
/// ```
/// use stitch_core::geometry::{RectangleSize, Region, tiling::sub_regions_with_fixed_size};
///
/// let tiles =
///     sub_regions_with_fixed_size(&Region::new(0, 0, 25, 10), RectangleSize::new(10, 10))
///         .unwrap();
/// assert_eq!(tiles, vec![
///     Region::new(0, 0, 10, 10),
///     Region::new(10, 0, 10, 10),
///     Region::new(15, 0, 10, 10),
/// ]);
/// ```
pub fn sub_regions_with_fixed_size(
    container: &Region,
    tile_size: RectangleSize,
) -> StitchResult<Vec<Region>> {
    validate_tile_size(tile_size)?;
    validate_container(container)?;

    if !container.has_area() {
        return Ok(Vec::new());
    }

    let tile_width = tile_size.width.min(container.width);
    let tile_height = tile_size.height.min(container.height);

    if tile_width == container.width && tile_height == container.height {
        return Ok(vec![*container]);
    }

    let (width, height) = (tile_width as i64, tile_height as i64);
    // Inclusive last row and column.
    let bottom = container.bottom() - 1;
    let right = container.right() - 1;

    let mut tiles = Vec::new();
    let mut current_top = container.top as i64;
    while current_top <= bottom {
        if current_top + height > bottom {
            current_top = bottom - height + 1;
        }

        let mut current_left = container.left as i64;
        while current_left <= right {
            if current_left + width > right {
                current_left = right - width + 1;
            }

            tiles.push(Region::new(
                current_left as i32,
                current_top as i32,
                tile_width,
                tile_height,
            ));
            current_left += width;
        }
        current_top += height;
    }

    Ok(tiles)
}

/// Splits `container` into non-overlapping tiles of at most `tile_size`
///
/// # Errors
///
/// Returns [`StitchError::InvalidParameter`] if either tile dimension is
/// zero, or if the container's right or bottom edge exceeds `i32::MAX`.
///
/// # Examples
///
/// ```
/// use stitch_core::geometry::{RectangleSize, Region, tiling::sub_regions_with_varying_size};
///
/// let tiles =
///     sub_regions_with_varying_size(&Region::new(0, 0, 10, 25), RectangleSize::new(10, 10))
///         .unwrap();
/// assert_eq!(tiles, vec![
///     Region::new(0, 0, 10, 10),
///     Region::new(0, 10, 10, 10),
///     Region::new(0, 20, 10, 5),
/// ]);
/// ```
pub fn sub_regions_with_varying_size(
    container: &Region,
    max_tile_size: RectangleSize,
) -> StitchResult<Vec<Region>> {
    validate_tile_size(max_tile_size)?;
    validate_container(container)?;

    let (step_x, step_y) = (max_tile_size.width as i64, max_tile_size.height as i64);
    let bottom = container.bottom();
    let right = container.right();

    let mut tiles = Vec::new();
    let mut current_top = container.top as i64;
    while current_top < bottom {
        let current_bottom = (current_top + step_y).min(bottom);

        let mut current_left = container.left as i64;
        while current_left < right {
            let current_right = (current_left + step_x).min(right);

            tiles.push(Region::new(
                current_left as i32,
                current_top as i32,
                (current_right - current_left) as u32,
                (current_bottom - current_top) as u32,
            ));
            current_left += step_x;
        }
        current_top += step_y;
    }

    Ok(tiles)
}
