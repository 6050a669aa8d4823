//! Geometry model for full-page capture
//!
//! Pure value types describing points, sizes and axis-aligned rectangles:
//!
//! - [`Location`]: a top-left anchor point
//! - [`RectangleSize`]: a width/height pair
//! - [`Region`]: a rectangle, with intersection, containment and tiling
//! - [`CoordinatesType`]: the coordinate space a region is expressed in
//!
//! None of these types know which coordinate space they live in; that is
//! tracked by the caller.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::StitchError;

pub mod region;
pub mod tiling;

pub use region::Region;

/// An integer `(x, y)` point
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// X coordinate
    pub x: i32,
    /// Y coordinate
    pub y: i32,
}

impl Location {
    /// The `(0, 0)` location
    pub const ZERO: Location = Location { x: 0, y: 0 };

    /// Creates a new location
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns a new location translated by `(dx, dy)`
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Returns true if this is the `(0, 0)` location
    pub fn is_origin(&self) -> bool {
        self.x == 0 && self.y == 0
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Parses `"x,y"`
impl FromStr for Location {
    type Err = StitchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || StitchError::InvalidParameter {
            parameter: "location".to_string(),
            reason: format!("'{}' is not in 'x,y' form", s),
        };

        let (x, y) = s.split_once(',').ok_or_else(invalid)?;
        let x = x.trim().parse().map_err(|_| invalid())?;
        let y = y.trim().parse().map_err(|_| invalid())?;
        Ok(Self::new(x, y))
    }
}

/// A `width x height` pair
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RectangleSize {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl RectangleSize {
    /// Creates a new size
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns true if either side is zero
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns true if this size covers `other` in both dimensions
    pub fn covers(&self, other: RectangleSize) -> bool {
        self.width >= other.width && self.height >= other.height
    }
}

impl fmt::Display for RectangleSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Parses `"WIDTHxHEIGHT"` (case-insensitive separator)
impl FromStr for RectangleSize {
    type Err = StitchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || StitchError::InvalidParameter {
            parameter: "size".to_string(),
            reason: format!("'{}' is not in 'WIDTHxHEIGHT' form", s),
        };

        let (width, height) = s
            .split_once('x')
            .or_else(|| s.split_once('X'))
            .ok_or_else(invalid)?;
        let width = width.trim().parse().map_err(|_| invalid())?;
        let height = height.trim().parse().map_err(|_| invalid())?;
        Ok(Self::new(width, height))
    }
}

/// Coordinate space a region is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CoordinatesType {
    /// Pixel coordinates of the screenshot image as captured
    ScreenshotAsIs,
    /// Coordinates relative to the visible part of the current context
    ContextAsIs,
    /// Coordinates relative to the top/left of the whole (scrolled) context
    ContextRelative,
}

impl CoordinatesType {
    /// Returns the coordinates type as a kebab-case string
    pub fn as_str(&self) -> &'static str {
        match self {
            CoordinatesType::ScreenshotAsIs => "screenshot-as-is",
            CoordinatesType::ContextAsIs => "context-as-is",
            CoordinatesType::ContextRelative => "context-relative",
        }
    }
}

impl fmt::Display for CoordinatesType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
