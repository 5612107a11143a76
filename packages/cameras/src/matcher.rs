//! Epsilon matching of incidents to fixed cameras.
//!
//! A camera shows an incident when the incident lies strictly within
//! [`MATCH_EPSILON_DEG`] of the camera on both axes. Resolved incidents
//! never match. When several incidents fall inside one camera's window
//! the nearest wins; equal distances resolve to the newest incident, so
//! the result does not depend on list order.

use city_watch_incident_models::Incident;
use rstar::{AABB, RTree, RTreeObject};

use crate::registry::Camera;

/// Per-axis matching window in degrees, roughly a kilometer at this
/// latitude.
pub const MATCH_EPSILON_DEG: f64 = 0.01;

/// Distances within a nanodegree count as equal when ranking candidates,
/// which absorbs float rounding at coordinate scale.
const DISTANCE_TOLERANCE_DEG: f64 = 1e-9;

/// A camera stored in the R-tree with its epsilon window as envelope.
struct CameraEntry {
    index: usize,
    latitude: f64,
    longitude: f64,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for CameraEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// One camera's match result.
#[derive(Debug)]
pub struct CameraMatch<'idx, 'inc> {
    /// The camera.
    pub camera: &'idx Camera,
    /// The incident shown on this camera, if any lies in its window.
    pub incident: Option<&'inc Incident>,
}

/// Pre-built spatial index over the camera registry.
///
/// Constructed once at startup and shared across requests.
pub struct CameraIndex {
    cameras: Vec<Camera>,
    tree: RTree<CameraEntry>,
}

impl CameraIndex {
    /// Builds the index over the given cameras.
    #[must_use]
    pub fn new(cameras: Vec<Camera>) -> Self {
        let entries = cameras
            .iter()
            .enumerate()
            .map(|(index, camera)| CameraEntry {
                index,
                latitude: camera.latitude,
                longitude: camera.longitude,
                envelope: AABB::from_corners(
                    [
                        camera.longitude - MATCH_EPSILON_DEG,
                        camera.latitude - MATCH_EPSILON_DEG,
                    ],
                    [
                        camera.longitude + MATCH_EPSILON_DEG,
                        camera.latitude + MATCH_EPSILON_DEG,
                    ],
                ),
            })
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
            cameras,
        }
    }

    /// Builds the index from the embedded registry.
    ///
    /// # Panics
    ///
    /// Panics if the embedded registry is malformed.
    #[must_use]
    pub fn from_registry() -> Self {
        Self::new(crate::registry::all_cameras())
    }

    /// The indexed cameras, in registry order.
    #[must_use]
    pub fn cameras(&self) -> &[Camera] {
        &self.cameras
    }

    /// Associates each camera with at most one active incident.
    #[must_use]
    pub fn match_incidents<'idx, 'inc>(
        &'idx self,
        incidents: &'inc [Incident],
    ) -> Vec<CameraMatch<'idx, 'inc>> {
        let mut best: Vec<Option<&'inc Incident>> = vec![None; self.cameras.len()];

        for incident in incidents.iter().filter(|incident| incident.is_active()) {
            let point = AABB::from_point([incident.longitude, incident.latitude]);
            for entry in self.tree.locate_in_envelope_intersecting(&point) {
                if !within_window(entry, incident) {
                    continue;
                }
                match best[entry.index] {
                    None => best[entry.index] = Some(incident),
                    Some(current) if displaces(entry, incident, current) => {
                        best[entry.index] = Some(incident);
                    }
                    Some(_) => {}
                }
            }
        }

        self.cameras
            .iter()
            .zip(best)
            .map(|(camera, incident)| CameraMatch { camera, incident })
            .collect()
    }
}

/// Strict per-axis check. Envelope hits sit on a closed box, so a point
/// exactly epsilon away intersects the envelope but must not match.
fn within_window(entry: &CameraEntry, incident: &Incident) -> bool {
    (incident.latitude - entry.latitude).abs() < MATCH_EPSILON_DEG
        && (incident.longitude - entry.longitude).abs() < MATCH_EPSILON_DEG
}

/// Whether `candidate` takes the camera from `current`: nearest first,
/// then newest.
fn displaces(entry: &CameraEntry, candidate: &Incident, current: &Incident) -> bool {
    let candidate_distance = chebyshev(entry, candidate);
    let current_distance = chebyshev(entry, current);
    if (candidate_distance - current_distance).abs() < DISTANCE_TOLERANCE_DEG {
        candidate.timestamp > current.timestamp
    } else {
        candidate_distance < current_distance
    }
}

fn chebyshev(entry: &CameraEntry, incident: &Incident) -> f64 {
    (incident.latitude - entry.latitude)
        .abs()
        .max((incident.longitude - entry.longitude).abs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use city_watch_incident_models::{IncidentStatus, IncidentType};

    fn technopark_camera() -> Camera {
        Camera {
            id: "cam1".to_string(),
            name: "Technopark Main Gate".to_string(),
            latitude: 8.556,
            longitude: 76.825,
        }
    }

    fn incident_at(
        id: &str,
        latitude: f64,
        longitude: f64,
        status: IncidentStatus,
        age_secs: i64,
    ) -> Incident {
        Incident {
            id: id.to_string(),
            incident_type: IncidentType::TrafficAccident,
            title: "Multi-vehicle Collision".to_string(),
            location: "Statue Junction".to_string(),
            timestamp: Utc::now() - Duration::seconds(age_secs),
            status,
            latitude,
            longitude,
            camera_image: IncidentType::TrafficAccident.placeholder_image(),
            initial_ai_system_analysis: None,
            initial_actions_taken: None,
            generated_summary: None,
            action_log: Vec::new(),
            chat_history: Vec::new(),
        }
    }

    #[test]
    fn incident_inside_the_window_matches() {
        let index = CameraIndex::new(vec![technopark_camera()]);
        let incidents = vec![incident_at("a", 8.556, 76.829, IncidentStatus::Critical, 0)];

        let matches = index.match_incidents(&incidents);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].incident.map(|i| i.id.as_str()), Some("a"));
    }

    #[test]
    fn incident_outside_the_window_does_not_match() {
        let index = CameraIndex::new(vec![technopark_camera()]);
        let incidents = vec![incident_at("a", 8.556, 76.840, IncidentStatus::Critical, 0)];

        let matches = index.match_incidents(&incidents);
        assert!(matches[0].incident.is_none());
    }

    #[test]
    fn both_axes_must_be_inside_the_window() {
        let index = CameraIndex::new(vec![technopark_camera()]);
        // Longitude is in range, latitude misses by two thousandths.
        let incidents = vec![incident_at("a", 8.568, 76.826, IncidentStatus::Critical, 0)];

        let matches = index.match_incidents(&incidents);
        assert!(matches[0].incident.is_none());
    }

    #[test]
    fn resolved_incidents_never_match() {
        let index = CameraIndex::new(vec![technopark_camera()]);
        let incidents = vec![incident_at("a", 8.556, 76.826, IncidentStatus::Resolved, 0)];

        let matches = index.match_incidents(&incidents);
        assert!(matches[0].incident.is_none());
    }

    #[test]
    fn nearest_incident_wins_the_camera() {
        let index = CameraIndex::new(vec![technopark_camera()]);
        let incidents = vec![
            incident_at("far", 8.556, 76.833, IncidentStatus::Critical, 0),
            incident_at("near", 8.556, 76.827, IncidentStatus::Warning, 600),
        ];

        let matches = index.match_incidents(&incidents);
        assert_eq!(matches[0].incident.map(|i| i.id.as_str()), Some("near"));
    }

    #[test]
    fn equal_distances_resolve_to_the_newest() {
        let index = CameraIndex::new(vec![technopark_camera()]);
        let incidents = vec![
            incident_at("older", 8.556, 76.829, IncidentStatus::Critical, 600),
            incident_at("newer", 8.556, 76.821, IncidentStatus::Critical, 0),
        ];

        let matches = index.match_incidents(&incidents);
        assert_eq!(matches[0].incident.map(|i| i.id.as_str()), Some("newer"));
    }

    #[test]
    fn registry_index_covers_every_camera() {
        let index = CameraIndex::from_registry();
        let matches = index.match_incidents(&[]);
        assert_eq!(matches.len(), index.cameras().len());
        assert!(matches.iter().all(|m| m.incident.is_none()));
    }
}
