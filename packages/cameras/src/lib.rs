#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Fixed camera registry and incident proximity matching.
//!
//! The city's monitoring cameras are a fixed set embedded at compile
//! time. The matcher builds an R-tree over their epsilon windows and
//! associates each camera with at most one nearby active incident for
//! the dashboard's map view.

pub mod matcher;
pub mod registry;

pub use matcher::{CameraIndex, CameraMatch, MATCH_EPSILON_DEG};
pub use registry::{Camera, all_cameras};
