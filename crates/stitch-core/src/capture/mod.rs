//! Full-page capture: collaborator traits, stock providers and the stitcher
//!
//! This module provides the capture side of the crate: the capability traits
//! a full-page capture consumes, ready-made implementations of the simple
//! ones, and [`FullPageCaptureAlgorithm`] which drives them.
//!
//! # Architecture
//!
//! The algorithm never talks to a browser directly. Each capability is a
//! trait, and callers plug in whatever backs it:
//!
//! - [`ImageProvider`] - Capture the visible viewport
//! - [`PositionProvider`] - Move, read, save and restore the scroll position
//! - [`ScaleProvider`] - Bring captures to logical (CSS pixel) scale
//! - [`CutProvider`] - Remove fixed margins such as browser chrome
//! - [`ScreenshotFactory`] - Map the requested region onto a capture
//! - [`RegionProvider`] - The region to stitch
//!
//! ## Stock Providers
//!
//! | Capability | Identity | Configurable |
//! |------------|----------|--------------|
//! | Scale | [`NullScaleProvider`] | [`FixedScaleProvider`] |
//! | Cut | [`NullCutProvider`] | [`FixedCutProvider`] |
//! | Region | [`FixedRegionProvider::entire`] | [`FixedRegionProvider::new`] |
//! | Screenshot | - | [`ViewportScreenshotFactory`] |
//! | Image + Position | - | [`MockViewport`] (in-memory page) |
//!
//! # Core Types
//!
//! - [`FullPageCaptureAlgorithm`] - Reset, capture, tile, stitch, restore
//! - [`StitchProviders`] - The collaborators of one capture
//! - [`StitchConfig`] - Stabilization delay and tile margins
//! - [`ImageBuffer`] - Image wrapper with crop/scale/composite

pub mod algorithm;
pub mod constants;
pub mod image_buffer;
pub mod mock;
pub mod providers;
pub mod screenshot;
pub mod traits;

pub use algorithm::{FullPageCaptureAlgorithm, StitchProviders};
pub use constants::{StitchConfig, StitchConfigBuilder};
pub use image_buffer::ImageBuffer;
pub use mock::{MockOperation, MockViewport};
pub use providers::{
    FixedCutProvider, FixedRegionProvider, FixedScaleProvider, NullCutProvider, NullScaleProvider,
};
pub use screenshot::{ViewportScreenshot, ViewportScreenshotFactory};
pub use traits::{
    CutProvider, ImageProvider, PositionMemento, PositionProvider, RegionProvider, ScaleProvider,
    Screenshot, ScreenshotFactory,
};
