#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Incident feed simulation for the city-watch dashboard.
//!
//! Produces randomized incidents from fixed display pools, holds them in
//! a bounded newest-first store, and provides the scripted observation
//! log replayed over the live-analysis stream. Everything here is
//! in-memory; nothing survives a restart.

pub mod generator;
pub mod live_log;
pub mod simulator;
pub mod store;
