//! stitch-core: Full-page capture and screenshot stitching
//!
//! This library captures a scrollable context that is larger than its
//! viewport piece by piece and reassembles the pieces into one image. It
//! includes the region geometry, the tiling policies, the capture
//! orchestrator with its collaborator traits, and image encoding.

pub mod capture;
pub mod error;
pub mod geometry;
pub mod util;
