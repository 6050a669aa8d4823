//! Test utilities for stitch-core integration tests
//!
//! This crate provides shared fixtures for exercising the full-page capture
//! algorithm without a browser, plus timing helpers for checking the
//! stabilization delays.
//!
//! # Usage
//!
//! Add to your crate's dev-dependencies:
//!
//! ```toml
//! [dev-dependencies]
//! stitch-test-utils = { path = "../stitch-test-utils" }
//! ```
//!
//! # Modules
//!
//! - [`fixtures`]: A fake viewport returning solid-colour tiles, and a
//!   one-call stitch runner
//! - [`timing`]: Timing and duration assertions
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use stitch_core::{
//!     capture::{FixedRegionProvider, StitchConfig},
//!     geometry::RectangleSize,
//! };
//! use stitch_test_utils::fixtures::{SolidColorViewport, run_stitch, tile_color};
//!
//! let viewport = Arc::new(SolidColorViewport::new(
//!     RectangleSize::new(80, 80),
//!     RectangleSize::new(100, 100),
//! ));
//! let config = StitchConfig::builder()
//!     .wait_before_screenshots(std::time::Duration::ZERO)
//!     .build();
//!
//! let image = run_stitch(&viewport, &FixedRegionProvider::entire(), config).unwrap();
//! assert_eq!(image.pixel(0, 0), tile_color(0, 0));
//! ```

pub mod fixtures;
pub mod timing;
