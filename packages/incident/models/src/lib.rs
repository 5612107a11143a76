#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Incident domain types for the city-watch monitoring system.
//!
//! This crate defines the canonical incident record shared by the feed
//! generator, the bounded store, the camera matcher, the AI gateway, and
//! the HTTP API. Wire names follow the dashboard's JSON contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Category of a monitored incident.
///
/// Wire strings are the human-readable category names shown on the
/// dashboard (`"Violent Crime"`, not `VIOLENT_CRIME`).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum IncidentType {
    /// Assaults, robberies, and public disturbances
    #[serde(rename = "Violent Crime")]
    #[strum(serialize = "Violent Crime")]
    ViolentCrime,
    /// Collapses, falls, and unresponsive persons
    #[serde(rename = "Medical Emergency")]
    #[strum(serialize = "Medical Emergency")]
    MedicalEmergency,
    /// Smoke, structure, and vehicle fires
    #[serde(rename = "Fire Alert")]
    #[strum(serialize = "Fire Alert")]
    FireAlert,
    /// Collisions, struck pedestrians, and blocked roads
    #[serde(rename = "Traffic Accident")]
    #[strum(serialize = "Traffic Accident")]
    TrafficAccident,
    /// Loitering, unattended packages, and trespassing
    #[serde(rename = "Suspicious Activity")]
    #[strum(serialize = "Suspicious Activity")]
    SuspiciousActivity,
    /// Crowd anomalies and developing unrest
    #[serde(rename = "Public Safety Threat")]
    #[strum(serialize = "Public Safety Threat")]
    PublicSafetyThreat,
}

impl IncidentType {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::ViolentCrime,
            Self::MedicalEmergency,
            Self::FireAlert,
            Self::TrafficAccident,
            Self::SuspiciousActivity,
            Self::PublicSafetyThreat,
        ]
    }

    /// Types the feed generator favors when drawing a new incident.
    #[must_use]
    pub const fn preferred() -> &'static [Self] {
        &[Self::PublicSafetyThreat, Self::TrafficAccident]
    }

    /// Placeholder camera frame URL for incidents of this type.
    #[must_use]
    pub fn placeholder_image(self) -> String {
        format!(
            "https://placehold.co/600x400.png?text={}",
            self.to_string().replace(' ', "+")
        )
    }
}

/// Lifecycle state of an incident.
///
/// `Resolved` is terminal for display purposes: resolved incidents stay
/// in the store until evicted but are excluded from active counts and
/// camera matching.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum IncidentStatus {
    /// Freshly detected, not yet triaged
    New,
    /// Under observation, may escalate
    Warning,
    /// Requires immediate operator attention
    Critical,
    /// Closed out; kept for history only
    Resolved,
}

impl IncidentStatus {
    /// Whether an incident in this state counts toward the active total.
    #[must_use]
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Resolved)
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::New, Self::Warning, Self::Critical, Self::Resolved]
    }
}

/// Response department an action can be assigned to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum Department {
    /// Law enforcement response
    Police,
    /// Fire suppression and rescue
    #[serde(rename = "Fire Department")]
    #[strum(serialize = "Fire Department")]
    FireDepartment,
    /// Ambulance and emergency medical response
    #[serde(rename = "Medical Services")]
    #[strum(serialize = "Medical Services")]
    MedicalServices,
    /// Signal control and rerouting
    #[serde(rename = "Traffic Control")]
    #[strum(serialize = "Traffic Control")]
    TrafficControl,
    /// Large-scale hazard coordination
    #[serde(rename = "Disaster Management")]
    #[strum(serialize = "Disaster Management")]
    DisasterManagement,
    /// No dispatch required (normal activity)
    None,
}

impl Department {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Police,
            Self::FireDepartment,
            Self::MedicalServices,
            Self::TrafficControl,
            Self::DisasterManagement,
            Self::None,
        ]
    }
}

/// Priority assigned to a detected video anomaly.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum AnomalyPriority {
    /// Life-threatening or rapidly escalating
    Critical,
    /// Serious, dispatch-worthy
    High,
    /// Notable, monitor and log
    Medium,
}

impl AnomalyPriority {
    /// Maps a detected anomaly key (e.g. `"Physical_Assault"`) to its
    /// response priority. Unknown keys default to [`Self::Medium`].
    #[must_use]
    pub fn for_anomaly(anomaly: &str) -> Self {
        match anomaly {
            "Weapon_Visible"
            | "Hostage_Situation"
            | "Person_Collapsed"
            | "Unconscious_Person"
            | "Explosion_Or_Smoke"
            | "Arson"
            | "Child_Abduction_Attempt"
            | "Building_Collapse_Risk"
            | "Active_Shooter"
            | "Hit_And_Run"
            | "Fire_Outbreak" => Self::Critical,

            "Physical_Assault"
            | "Fighting"
            | "Seizure_Activity"
            | "Crowd_Stampede"
            | "Riots_Or_Protest_Violence"
            | "Reckless_Driving"
            | "Accident_With_Injuries"
            | "Burglary_In_Progress"
            | "Robbery"
            | "Elderly_Person_Fallen"
            | "Gas_Leak_Suspected"
            | "Electrical_Spark_Hazard" => Self::High,

            _ => Self::Medium,
        }
    }
}

/// Author of a chat message attached to an incident.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ChatSender {
    /// The human operator
    User,
    /// The assistant
    Ai,
}

/// One message in an incident's chat transcript. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Unique message id.
    pub id: String,
    /// Who authored the message.
    pub sender: ChatSender,
    /// Message body.
    pub text: String,
    /// When the message was recorded.
    pub timestamp: DateTime<Utc>,
}

/// One entry in an incident's action log. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentAction {
    /// Local wall-clock time of the action, formatted `HH:MM:SS`.
    pub timestamp: String,
    /// What happened.
    pub description: String,
    /// Department the action was assigned to, if any.
    pub assigned_to_department: Option<Department>,
}

/// A monitored incident as shared between the feed, the store, and the
/// dashboard API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    /// Unique id; `inc-{n}-{millis}` for feed incidents, `vid-{n}-{millis}`
    /// for incidents created from uploaded video.
    pub id: String,
    /// Incident category.
    #[serde(rename = "type")]
    pub incident_type: IncidentType,
    /// Short display title.
    pub title: String,
    /// Display location name.
    pub location: String,
    /// Detection time; feed incidents are backdated by up to five minutes.
    pub timestamp: DateTime<Utc>,
    /// Lifecycle state.
    pub status: IncidentStatus,
    /// Detection latitude.
    pub latitude: f64,
    /// Detection longitude.
    pub longitude: f64,
    /// Camera frame URL for the incident card.
    pub camera_image: String,
    /// Narrative produced by the detection layer, with a trailing
    /// `(Detected Anomalies: ...)` tag list for feed incidents.
    #[serde(rename = "initialAISystemAnalysis")]
    pub initial_ai_system_analysis: Option<String>,
    /// Automated first-response actions already taken.
    pub initial_actions_taken: Option<String>,
    /// Lazily generated report summary; computed at most once, then cached.
    pub generated_summary: Option<String>,
    /// Timeline of operator and system actions.
    pub action_log: Vec<IncidentAction>,
    /// Operator chat transcript. Always present, possibly empty.
    pub chat_history: Vec<ChatMessage>,
}

impl Incident {
    /// Whether this incident counts toward the active total.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr as _;

    #[test]
    fn type_wire_names_round_trip() {
        for ty in IncidentType::all() {
            let name = ty.to_string();
            let parsed = IncidentType::from_str(&name).unwrap();
            assert_eq!(parsed, *ty, "{name} did not parse back to {ty:?}");
        }
        assert_eq!(
            IncidentType::PublicSafetyThreat.to_string(),
            "Public Safety Threat"
        );
        assert_eq!(IncidentType::FireAlert.to_string(), "Fire Alert");
    }

    #[test]
    fn preferred_types_are_a_subset() {
        for ty in IncidentType::preferred() {
            assert!(IncidentType::all().contains(ty));
        }
        assert!(IncidentType::preferred().len() < IncidentType::all().len());
    }

    #[test]
    fn placeholder_image_encodes_spaces() {
        assert_eq!(
            IncidentType::ViolentCrime.placeholder_image(),
            "https://placehold.co/600x400.png?text=Violent+Crime"
        );
        assert!(!IncidentType::TrafficAccident.placeholder_image().contains(' '));
    }

    #[test]
    fn only_resolved_is_inactive() {
        for status in IncidentStatus::all() {
            assert_eq!(
                status.is_active(),
                *status != IncidentStatus::Resolved,
                "{status:?} active flag wrong"
            );
        }
    }

    #[test]
    fn anomaly_priorities() {
        assert_eq!(
            AnomalyPriority::for_anomaly("Weapon_Visible"),
            AnomalyPriority::Critical
        );
        assert_eq!(
            AnomalyPriority::for_anomaly("Crowd_Stampede"),
            AnomalyPriority::High
        );
        assert_eq!(
            AnomalyPriority::for_anomaly("Loitering_With_Intent"),
            AnomalyPriority::Medium
        );
        assert_eq!(
            AnomalyPriority::for_anomaly("Something_Unmapped"),
            AnomalyPriority::Medium
        );
    }

    #[test]
    fn chat_sender_wire_names_are_lowercase() {
        assert_eq!(ChatSender::User.to_string(), "user");
        assert_eq!(ChatSender::Ai.to_string(), "ai");
        assert_eq!(ChatSender::from_str("ai").unwrap(), ChatSender::Ai);
    }
}
