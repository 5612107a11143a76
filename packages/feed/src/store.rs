//! Bounded in-memory incident store.
//!
//! Holds the dashboard's working set newest first, capped at
//! [`STORE_CAPACITY`] entries. Mutation happens through whole-batch
//! replacement, head insertion, or patch-based point updates; there is
//! no removal by id and no persistence.

use city_watch_incident_models::{ChatMessage, Incident, IncidentAction, IncidentStatus};

/// Maximum number of incidents held at once. Inserting past the cap
/// evicts the oldest entries.
pub const STORE_CAPACITY: usize = 50;

/// Point update applied to a stored incident.
///
/// Fields left at their defaults leave the record untouched. A summary
/// carried by a patch is ignored when the record already caches one, so
/// a summary is written at most once per incident.
#[derive(Debug, Clone, Default)]
pub struct IncidentPatch {
    /// New lifecycle state.
    pub status: Option<IncidentStatus>,
    /// Lazily generated report summary.
    pub generated_summary: Option<String>,
    /// Actions appended to the action log.
    pub append_actions: Vec<IncidentAction>,
    /// Messages appended to the chat transcript.
    pub append_chat: Vec<ChatMessage>,
}

/// Newest-first incident list with a fixed capacity.
#[derive(Debug, Default)]
pub struct IncidentStore {
    incidents: Vec<Incident>,
}

impl IncidentStore {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            incidents: Vec::new(),
        }
    }

    /// Current incidents, newest first.
    #[must_use]
    pub fn incidents(&self) -> &[Incident] {
        &self.incidents
    }

    /// Looks up an incident by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Incident> {
        self.incidents.iter().find(|incident| incident.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.incidents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.incidents.is_empty()
    }

    /// Number of incidents not yet resolved.
    #[must_use]
    pub fn count_active(&self) -> usize {
        self.incidents
            .iter()
            .filter(|incident| incident.is_active())
            .count()
    }

    /// Inserts a new incident at the head of the list, evicting the
    /// oldest entries past capacity.
    pub fn add(&mut self, incident: Incident) {
        self.incidents.insert(0, incident);
        self.incidents.truncate(STORE_CAPACITY);
    }

    /// Replaces the whole list with a fresh batch.
    pub fn refresh(&mut self, batch: Vec<Incident>) {
        self.incidents = batch;
        self.incidents.truncate(STORE_CAPACITY);
    }

    /// Applies a patch to the incident with the given id.
    ///
    /// Returns `false` and changes nothing when no such incident exists;
    /// an unknown id is not an error.
    pub fn update_by_id(&mut self, id: &str, patch: IncidentPatch) -> bool {
        let Some(incident) = self.incidents.iter_mut().find(|incident| incident.id == id) else {
            return false;
        };
        if let Some(status) = patch.status {
            incident.status = status;
        }
        if incident.generated_summary.is_none() {
            incident.generated_summary = patch.generated_summary;
        }
        incident.action_log.extend(patch.append_actions);
        incident.chat_history.extend(patch.append_chat);
        true
    }
}
