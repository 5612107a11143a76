//! Camera registry: the city's fixed monitoring cameras, embedded at
//! compile time via [`include_str!`].

use serde::Deserialize;

/// TOML registry baked into the binary.
const CAMERA_TOML: &str = include_str!("../cameras.toml");

/// A fixed monitoring camera.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Camera {
    /// Stable camera id (e.g. `"cam1"`).
    pub id: String,
    /// Display name shown on the map.
    pub name: String,
    /// Mount latitude.
    pub latitude: f64,
    /// Mount longitude.
    pub longitude: f64,
}

#[derive(Debug, Deserialize)]
struct CameraFile {
    cameras: Vec<Camera>,
}

/// Total number of registered cameras (used in tests).
#[cfg(test)]
const EXPECTED_CAMERA_COUNT: usize = 10;

/// Returns all cameras from the embedded registry.
///
/// # Panics
///
/// Panics if the embedded TOML is malformed (a compile-time guarantee in
/// practice, since the registry ships inside the binary).
#[must_use]
pub fn all_cameras() -> Vec<Camera> {
    let file: CameraFile = toml::from_str(CAMERA_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse cameras.toml: {e}"));
    file.cameras
}
