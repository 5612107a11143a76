#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the city watch server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the domain types to allow independent evolution of the API
//! contract. Incidents themselves serialize directly from the domain
//! model; only endpoint-specific envelopes live here.

use city_watch_cameras::CameraMatch;
use city_watch_incident_models::{AnomalyPriority, ChatSender, Department, Incident};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// Dashboard KPI values.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiStats {
    /// Incidents not yet resolved.
    pub active_incidents: usize,
    /// Average response time trend shown on the KPI bar.
    pub avg_response_time: String,
    /// False alarm trend shown on the KPI bar.
    pub false_alarms: String,
    /// Overall system status label.
    pub system_status: String,
}

/// Body for the incident chat endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatQuery {
    /// The operator's question.
    pub question: String,
}

/// Body for appending an action to an incident's log.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendActionRequest {
    /// What happened.
    pub description: String,
    /// Department to assign, if any.
    pub assigned_to_department: Option<Department>,
}

/// Body for creating an incident from a completed video analysis.
///
/// Carries the analysis verbatim so the dispatch endpoint needs no
/// server-side state from the analysis call that produced it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchRequest {
    /// Narrative description of the footage.
    pub report: String,
    /// Category name produced by the analysis.
    pub incident_type: String,
    /// Department suggested by the analysis.
    pub suggested_department: String,
}

/// Body for the two video analysis endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    /// The video as a `data:<mimetype>;base64,<encoded_data>` URI.
    pub video_data_uri: String,
}

/// Incident context forwarded with a stateless clip chat.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiChatContext {
    /// Incident or clip title.
    pub title: String,
    /// Where the footage was captured.
    pub location: String,
    /// Display timestamp.
    pub timestamp: String,
    /// Automated analysis of the footage, if any.
    #[serde(rename = "initialAISystemAnalysis")]
    pub initial_ai_system_analysis: Option<String>,
    /// Previously generated summary, if any.
    pub generated_summary: Option<String>,
}

/// One prior turn forwarded with a stateless clip chat.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiChatTurn {
    /// Who authored the turn.
    pub sender: ChatSender,
    /// Turn body.
    pub text: String,
}

/// Body for the stateless clip chat endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipChatRequest {
    /// The operator's question.
    pub question: String,
    /// Context describing the clip under discussion.
    pub context: ApiChatContext,
    /// Prior turns, oldest first. Absent means empty.
    #[serde(default)]
    pub chat_history: Vec<ApiChatTurn>,
}

/// Clip classification with its derived dispatch priority.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiClipClassification {
    /// Whether the clip shows a significant anomaly.
    pub is_significant: bool,
    /// The detected anomaly key, or `Normal_Activity`.
    pub incident_type: String,
    /// Dispatch priority derived from the anomaly key.
    pub priority: AnomalyPriority,
}

/// A camera and the active incident currently nearest to it, if any.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCameraStatus {
    /// Camera id.
    pub id: String,
    /// Display name shown on the map.
    pub name: String,
    /// Mount latitude.
    pub latitude: f64,
    /// Mount longitude.
    pub longitude: f64,
    /// The matched incident, or `null` when the view is clear.
    pub incident: Option<Incident>,
}

impl From<&CameraMatch<'_, '_>> for ApiCameraStatus {
    fn from(m: &CameraMatch<'_, '_>) -> Self {
        Self {
            id: m.camera.id.clone(),
            name: m.camera.name.clone(),
            latitude: m.camera.latitude,
            longitude: m.camera.longitude,
            incident: m.incident.cloned(),
        }
    }
}

/// One event on the live analysis stream.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiLiveLog {
    /// Wall-clock time the entry was emitted, formatted `HH:MM:SS`.
    pub timestamp: String,
    /// Observation text.
    pub text: String,
    /// Category tags shown as badges.
    pub tags: Vec<String>,
}
