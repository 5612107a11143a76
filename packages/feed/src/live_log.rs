//! Scripted observations for the live-analysis stream.
//!
//! Every subscriber to the live view receives the same fixed script of
//! traffic-camera observations, replayed one entry at a time.

use serde::Serialize;

/// Delay before the first entry is sent, simulating feed connection.
pub const CONNECT_DELAY_MS: u64 = 2_000;

/// Pause between consecutive entries.
pub const ENTRY_INTERVAL_MS: u64 = 3_000;

/// One scripted observation from the live traffic-camera analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LiveLogEntry {
    /// Seconds into the feed at which the observation occurs.
    pub time: u64,
    /// Observation text.
    pub text: &'static str,
    /// Category tags shown as badges in the dashboard.
    pub tags: &'static [&'static str],
}

/// The analysis script, in replay order.
pub const ANALYSIS_SCRIPT: &[LiveLogEntry] = &[
    LiveLogEntry {
        time: 2,
        text: "AI System Initializing... Analyzing traffic camera feed.",
        tags: &["System"],
    },
    LiveLogEntry {
        time: 5,
        text: "Multiple vehicles detected: buses, cars, and auto-rickshaws.",
        tags: &["Vehicle", "Traffic"],
    },
    LiveLogEntry {
        time: 8,
        text: "Pedestrian crosswalk is active. High foot traffic detected.",
        tags: &["Crowd", "Pedestrian"],
    },
    LiveLogEntry {
        time: 12,
        text: "Vehicle detected: Red public bus (KL-15 registration) stopping at the bus stop.",
        tags: &["Vehicle", "Public Transport"],
    },
    LiveLogEntry {
        time: 16,
        text: "Anomaly detected: A motorcycle is attempting to bypass traffic by driving on the shoulder.",
        tags: &["Traffic", "Warning"],
    },
    LiveLogEntry {
        time: 21,
        text: "Traffic flow is currently heavy but moving. Monitoring for potential gridlock.",
        tags: &["Traffic"],
    },
    LiveLogEntry {
        time: 26,
        text: "Audio analysis: Normal city traffic sounds, horns, and chatter.",
        tags: &["Audio"],
    },
    LiveLogEntry {
        time: 31,
        text: "Motorcycle has merged back into traffic. Anomaly resolved.",
        tags: &["Traffic", "Resolved"],
    },
    LiveLogEntry {
        time: 36,
        text: "Subject detected waiting at crosswalk for an extended period.",
        tags: &["Pedestrian"],
    },
    LiveLogEntry {
        time: 42,
        text: "Vehicle detected: White car, changing lanes without signaling.",
        tags: &["Vehicle", "Minor Infraction"],
    },
    LiveLogEntry {
        time: 48,
        text: "Monitoring intersection for red light violations. None detected.",
        tags: &["System", "Traffic"],
    },
    LiveLogEntry {
        time: 54,
        text: "A group of pedestrians is crossing against the signal.",
        tags: &["Pedestrian", "Warning"],
    },
    LiveLogEntry {
        time: 60,
        text: "No collisions occurred. Pedestrians have crossed safely. Situation normal.",
        tags: &["Pedestrian", "Resolved"],
    },
    LiveLogEntry {
        time: 68,
        text: "Bus has departed from the bus stop. Traffic flow resuming.",
        tags: &["Public Transport"],
    },
    LiveLogEntry {
        time: 75,
        text: "System check: All camera inputs are nominal. Weather: Clear skies.",
        tags: &["System"],
    },
    LiveLogEntry {
        time: 83,
        text: "Another bus approaching the intersection.",
        tags: &["Vehicle", "Public Transport"],
    },
    LiveLogEntry {
        time: 92,
        text: "Analysis segment complete. Continuing to monitor live feed.",
        tags: &["System"],
    },
];

#[cfg(test)]
const EXPECTED_ENTRY_COUNT: usize = 17;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_is_complete() {
        assert_eq!(ANALYSIS_SCRIPT.len(), EXPECTED_ENTRY_COUNT);
    }

    #[test]
    fn offsets_increase_strictly() {
        for pair in ANALYSIS_SCRIPT.windows(2) {
            assert!(
                pair[0].time < pair[1].time,
                "offsets {} and {} out of order",
                pair[0].time,
                pair[1].time
            );
        }
    }

    #[test]
    fn every_entry_is_tagged() {
        for entry in ANALYSIS_SCRIPT {
            assert!(!entry.text.is_empty());
            assert!(!entry.tags.is_empty(), "entry at +{}s has no tags", entry.time);
        }
    }
}
