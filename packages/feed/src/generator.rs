//! Synthetic incident generation.
//!
//! Incidents are assembled from fixed display pools keyed by type, with
//! weighted type and status draws, coordinate jitter around the coverage
//! center, and a seeded action log re-stamped near the current time.
//! Generation cannot fail.

use chrono::{DateTime, Duration, Utc};
use city_watch_incident_models::{Incident, IncidentAction, IncidentStatus, IncidentType};
use rand::Rng;

/// Number of incidents in a fresh dashboard batch.
pub const INITIAL_INCIDENT_COUNT: usize = 7;

/// Center of the simulated coverage area (Thiruvananthapuram).
pub const FEED_CENTER: (f64, f64) = (8.50, 76.91);

/// Map center used for incidents created from uploaded video.
pub const UPLOAD_CENTER: (f64, f64) = (8.5241, 76.9366);

/// Uniform coordinate jitter around the center, degrees per axis.
pub const SPREAD_DEG: f64 = 0.05;

const PREFERRED_TYPE_PROBABILITY: f64 = 0.6;
const RESOLVED_OVERRIDE_PROBABILITY: f64 = 0.1;
const PREFILLED_SUMMARY_PROBABILITY: f64 = 0.3;
const MAX_BACKDATE_MS: i64 = 300_000;

// ── Display pools ───────────────────────────────────────────

const fn titles(incident_type: IncidentType) -> &'static [&'static str] {
    match incident_type {
        IncidentType::ViolentCrime => {
            &["Assault Reported", "Robbery in Progress", "Public Disturbance"]
        }
        IncidentType::MedicalEmergency => {
            &["Cardiac Arrest", "Fall Detected", "Unresponsive Person"]
        }
        IncidentType::FireAlert => &[
            "Smoke Detected in Building",
            "Structure Fire Reported",
            "Vehicle Fire",
        ],
        IncidentType::TrafficAccident => &[
            "Multi-vehicle Collision",
            "Pedestrian Struck",
            "Road Blockage Major Intersection",
        ],
        IncidentType::SuspiciousActivity => {
            &["Loitering Detected", "Unattended Package", "Trespassing Alert"]
        }
        IncidentType::PublicSafetyThreat => &[
            "Large Crowd Forming",
            "Vandalism Spree",
            "Potential Riot Conditions",
            "Street Fight Erupting",
            "Abnormal Crowd Movement",
            "Panic Detected in Crowd",
            "Developing Unrest",
            "Sudden Crowd Dispersal",
            "Crowd Stampede Imminent",
            "Unlawful Assembly Escalating",
            "Public Panic Spreading",
        ],
    }
}

const fn analyses(incident_type: IncidentType) -> &'static [&'static str] {
    match incident_type {
        IncidentType::ViolentCrime => &[
            "Video feed shows two individuals in a physical altercation near the ATM. One individual pushed the other to the ground. (Detected Anomalies: Physical_Assault, Fighting)",
            "Video analytics detect an individual forcibly taking a handbag from another person and fleeing towards the East street. (Detected Anomalies: Robbery, Theft)",
        ],
        IncidentType::MedicalEmergency => &[
            "A person is observed collapsing suddenly near the bus stop on MG Road. No immediate assistance visible. (Detected Anomalies: Person_Collapsed, Medical_Emergency)",
            "Individual appears to be having a seizure on public sidewalk. (Detected Anomalies: Seizure_Activity)",
        ],
        IncidentType::FireAlert => &[
            "Thermal imaging from Camera 4B indicates a significant heat signature emanating from the ground floor of the residential building. Smoke visible from a window. (Detected Anomalies: Fire_Outbreak, Smoke)",
            "Visible flames and smoke from a commercial kitchen exhaust. (Detected Anomalies: Fire_Outbreak, Commercial_Fire)",
        ],
        IncidentType::TrafficAccident => &[
            "Vehicle (Red Sedan, KL-01-XX-1234) ran a red light at high speed at Pattom Junction, narrowly avoiding pedestrians. (Detected Anomalies: Reckless_Driving, Pedestrian_In_Danger)",
            "Two vehicles involved in a collision at intersection, blocking traffic. (Detected Anomalies: Accident_With_Injuries, Road_Blockage_Hazard)",
            "Motorcycle accident, rider down on road. (Detected Anomalies: Accident_With_Injuries, Medical_Emergency)",
        ],
        IncidentType::SuspiciousActivity => &[
            "An unidentified backpack has been left unattended near the main entrance of the mall for over 15 minutes. Area is moderately crowded. (Detected Anomalies: Abandoned_Baggage, Suspicious_Activity)",
            "Individual seen scaling the perimeter fence of the restricted power substation. (Detected Anomalies: Unauthorized_Access, Trespassing_Alert)",
        ],
        IncidentType::PublicSafetyThreat => &[
            "Large, agitated crowd forming at City Center. Objects thrown. (Detected Anomalies: Riots_Or_Protest_Violence, Unlawful_Assembly, Crowd_Agitation)",
            "Multiple individuals breaking shop windows on Main Street. (Detected Anomalies: Vandalism_In_Progress, Property_Damage)",
            "Video shows a sudden, rapid dispersal of a large crowd at the stadium exit. Multiple people have fallen. (Detected Anomalies: Crowd_Stampede, Public_Panic, Person_Down)",
            "Group of individuals involved in a large street brawl near market. (Detected Anomalies: Fighting, Public_Disturbance, Weapon_Visible)",
            "Dense crowd observed at transit hub exhibiting unusual surge patterns. (Detected Anomalies: Crowd_Surge, Potential_Crush_Hazard)",
            "AI detects sounds of screaming and rapid movement in a crowded plaza. (Detected Anomalies: Public_Panic, Possible_Threat_Unseen, Crowd_Dispersion)",
            "AI analysis indicates rapid crowd convergence at Parliament St. Potential for civil unrest. (Detected Anomalies: Unlawful_Assembly, Crowd_Gathering_Speed)",
            "Multiple camera feeds show coordinated movement of individuals forming a blockade on a major thoroughfare. (Detected Anomalies: Road_Blockage_Intentional, Protest_Activity)",
            "Automated systems detect increasing crowd density and agitation levels near City Hall. Potential for stampede. (Detected Anomalies: Crowd_Density_High, Crowd_Agitation_Level_Rising, Stampede_Risk)",
            "AI analysis: Crowd near City Hall exhibiting panic behavior; rapid, uncontrolled movement. (Detected Anomalies: Crowd_Stampede, Public_Panic, Multiple_Persons_Down)",
            "Thermal and motion analysis show high-density crowd surging towards exits. (Detected Anomalies: Crowd_Surge, Stampede_Risk, Emergency_Exit_Blocked)",
            "Reports of shots fired leading to widespread panic and crowd stampede downtown. (Detected Anomalies: Active_Shooter, Crowd_Stampede, Mass_Casualty_Event)",
        ],
    }
}

const LOCATIONS: &[&str] = &[
    "Technopark Phase 1",
    "East Fort Junction",
    "Kowdiar Avenue",
    "Pattom Main Road",
    "Shanghumugham Beach Rd",
    "Statue Junction",
    "Medical College Campus",
    "Museum Road",
    "Peroorkada Market",
    "Ulloor Crossing",
    "Central Stadium Entrance",
    "Railway Station Concourse",
];

const INITIAL_ACTIONS: &[&str] = &[
    "Camera automatically panned and zoomed to event.",
    "Local police patrol notified via automated alert.",
    "Emergency medical services pre-alerted.",
    "Traffic management system rerouting vehicles.",
    "Security drone dispatched for aerial surveillance.",
    "Crowd dispersal advisory broadcast via PA system.",
    "Additional units requested for crowd control.",
];

const ACTION_LOG_SAMPLES: &[&[&str]] = &[
    &[
        "Threat Detected via Camera Feed",
        "AI Context Analyzed: Potential Violent Crime",
        "Law Enforcement Dispatched (Unit TVM-07)",
        "AI Report Sent to Field Units",
        "Medical Support Team En Route (ETA 3 min)",
    ],
    &[
        "Medical Alert Triggered by Device",
        "Vitals Transmitted: Abnormal Heart Rate",
        "EMS Dispatched to Location",
        "Emergency Contact Notified by AI",
    ],
    &[
        "Crowd Anomaly Detected: Rapid Condensation",
        "AI Analysis: Potential Stampede Risk at Event Exit",
        "Alert Sent to Event Security Command",
        "Nearby Patrols Re-routed to Location",
        "PA System Activated with Dispersal Instructions",
    ],
];

// ── Generator ───────────────────────────────────────────────

/// Stateful incident factory.
///
/// Owns the monotonic id counter, so generated ids stay unique within a
/// process even when wall-clock milliseconds collide.
#[derive(Debug, Default)]
pub struct IncidentGenerator {
    counter: u64,
}

impl IncidentGenerator {
    #[must_use]
    pub const fn new() -> Self {
        Self { counter: 0 }
    }

    /// Generates one randomized incident.
    pub fn generate(&mut self) -> Incident {
        let mut rng = rand::thread_rng();
        self.counter += 1;
        let now = Utc::now();

        let incident_type = draw_type(&mut rng);
        let status = draw_status(&mut rng);
        let analysis = *pick(&mut rng, analyses(incident_type));
        let generated_summary = rng
            .gen_bool(PREFILLED_SUMMARY_PROBABILITY)
            .then(|| prefilled_summary(analysis));

        Incident {
            id: format!("inc-{}-{}", self.counter, now.timestamp_millis()),
            incident_type,
            title: (*pick(&mut rng, titles(incident_type))).to_string(),
            location: (*pick(&mut rng, LOCATIONS)).to_string(),
            timestamp: now - Duration::milliseconds(rng.gen_range(0..MAX_BACKDATE_MS)),
            status,
            latitude: FEED_CENTER.0 + rng.gen_range(-SPREAD_DEG..=SPREAD_DEG),
            longitude: FEED_CENTER.1 + rng.gen_range(-SPREAD_DEG..=SPREAD_DEG),
            camera_image: incident_type.placeholder_image(),
            initial_ai_system_analysis: Some(analysis.to_string()),
            initial_actions_taken: Some((*pick(&mut rng, INITIAL_ACTIONS)).to_string()),
            generated_summary,
            action_log: seeded_action_log(&mut rng, now),
            chat_history: Vec::new(),
        }
    }

    /// Generates a fresh dashboard batch, sorted newest first.
    pub fn initial_batch(&mut self, count: usize) -> Vec<Incident> {
        let mut batch: Vec<Incident> = (0..count).map(|_| self.generate()).collect();
        batch.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        batch
    }

    /// Builds the incident record for a manually uploaded video that the
    /// analysis step classified as significant.
    pub fn upload_incident(&mut self, incident_type: IncidentType, report: &str) -> Incident {
        let mut rng = rand::thread_rng();
        self.counter += 1;
        let now = Utc::now();

        Incident {
            id: format!("vid-{}-{}", self.counter, now.timestamp_millis()),
            incident_type,
            title: format!("Uploaded Video: {incident_type}"),
            location: "Uploaded Video Analysis".to_string(),
            timestamp: now,
            status: IncidentStatus::Critical,
            latitude: UPLOAD_CENTER.0 + rng.gen_range(-SPREAD_DEG..=SPREAD_DEG),
            longitude: UPLOAD_CENTER.1 + rng.gen_range(-SPREAD_DEG..=SPREAD_DEG),
            camera_image: "https://placehold.co/600x400.png?text=From+Upload".to_string(),
            initial_ai_system_analysis: Some(report.to_string()),
            initial_actions_taken: Some("Manual analysis initiated via video upload.".to_string()),
            generated_summary: None,
            action_log: vec![IncidentAction {
                timestamp: now.format("%H:%M:%S").to_string(),
                description: "Incident created from video upload.".to_string(),
                assigned_to_department: None,
            }],
            chat_history: Vec::new(),
        }
    }
}

fn pick<'pool, T>(rng: &mut impl Rng, pool: &'pool [T]) -> &'pool T {
    &pool[rng.gen_range(0..pool.len())]
}

fn draw_type(rng: &mut impl Rng) -> IncidentType {
    if rng.gen_bool(PREFERRED_TYPE_PROBABILITY) {
        *pick(rng, IncidentType::preferred())
    } else {
        let rest: Vec<IncidentType> = IncidentType::all()
            .iter()
            .copied()
            .filter(|ty| !IncidentType::preferred().contains(ty))
            .collect();
        *pick(rng, &rest)
    }
}

fn draw_status(rng: &mut impl Rng) -> IncidentStatus {
    let status = *pick(
        rng,
        &[
            IncidentStatus::Critical,
            IncidentStatus::Warning,
            IncidentStatus::New,
        ],
    );
    if rng.gen_bool(RESOLVED_OVERRIDE_PROBABILITY) {
        IncidentStatus::Resolved
    } else {
        status
    }
}

fn prefilled_summary(analysis: &str) -> String {
    let preview: String = analysis.chars().take(100).collect();
    format!("AI-generated summary: {preview}... Further details are being processed.")
}

fn seeded_action_log(rng: &mut impl Rng, now: DateTime<Utc>) -> Vec<IncidentAction> {
    pick(rng, ACTION_LOG_SAMPLES)
        .iter()
        .map(|description| IncidentAction {
            timestamp: recent_clock_time(rng, now),
            description: (*description).to_string(),
            assigned_to_department: None,
        })
        .collect()
}

/// Formats a wall-clock time up to five minutes before `now`.
fn recent_clock_time(rng: &mut impl Rng, now: DateTime<Utc>) -> String {
    (now - Duration::seconds(rng.gen_range(0..300)))
        .format("%H:%M:%S")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn coordinates_stay_inside_the_jitter_box() {
        let mut generator = IncidentGenerator::new();
        for _ in 0..200 {
            let incident = generator.generate();
            assert!(
                (FEED_CENTER.0 - SPREAD_DEG..=FEED_CENTER.0 + SPREAD_DEG)
                    .contains(&incident.latitude),
                "latitude {} outside box",
                incident.latitude
            );
            assert!(
                (FEED_CENTER.1 - SPREAD_DEG..=FEED_CENTER.1 + SPREAD_DEG)
                    .contains(&incident.longitude),
                "longitude {} outside box",
                incident.longitude
            );
        }
    }

    #[test]
    fn batch_is_sorted_newest_first() {
        let mut generator = IncidentGenerator::new();
        let batch = generator.initial_batch(INITIAL_INCIDENT_COUNT);
        assert_eq!(batch.len(), INITIAL_INCIDENT_COUNT);
        for pair in batch.windows(2) {
            assert!(
                pair[0].timestamp >= pair[1].timestamp,
                "batch not sorted descending"
            );
        }
    }

    #[test]
    fn ids_are_unique_across_a_batch() {
        let mut generator = IncidentGenerator::new();
        let batch = generator.initial_batch(50);
        let ids: HashSet<&str> = batch.iter().map(|incident| incident.id.as_str()).collect();
        assert_eq!(ids.len(), batch.len());
    }

    #[test]
    fn titles_and_analyses_come_from_the_type_pools() {
        let mut generator = IncidentGenerator::new();
        for _ in 0..100 {
            let incident = generator.generate();
            assert!(titles(incident.incident_type).contains(&incident.title.as_str()));
            let analysis = incident.initial_ai_system_analysis.as_deref().unwrap();
            assert!(analyses(incident.incident_type).contains(&analysis));
        }
    }

    #[test]
    fn prefilled_summary_uses_the_template() {
        let mut generator = IncidentGenerator::new();
        let summary = (0..500)
            .find_map(|_| generator.generate().generated_summary)
            .expect("no prefilled summary in 500 draws");
        assert!(summary.starts_with("AI-generated summary: "));
        assert!(summary.ends_with("... Further details are being processed."));
    }

    #[test]
    fn action_log_is_seeded_and_stamped() {
        let mut generator = IncidentGenerator::new();
        let incident = generator.generate();
        assert!(!incident.action_log.is_empty());
        for action in &incident.action_log {
            let stamp = &action.timestamp;
            assert_eq!(stamp.len(), 8, "{stamp} not HH:MM:SS");
            assert_eq!(&stamp[2..3], ":");
            assert_eq!(&stamp[5..6], ":");
        }
    }

    #[test]
    fn upload_incident_shape() {
        let mut generator = IncidentGenerator::new();
        let incident =
            generator.upload_incident(IncidentType::FireAlert, "Flames visible near loading dock.");
        assert!(incident.id.starts_with("vid-"));
        assert_eq!(incident.status, IncidentStatus::Critical);
        assert_eq!(incident.title, "Uploaded Video: Fire Alert");
        assert_eq!(incident.location, "Uploaded Video Analysis");
        assert_eq!(
            incident.initial_ai_system_analysis.as_deref(),
            Some("Flames visible near loading dock.")
        );
        assert_eq!(incident.action_log.len(), 1);
        assert!(incident.chat_history.is_empty());
    }
}
