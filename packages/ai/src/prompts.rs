//! Prompt rendering for the analysis tasks.
//!
//! Each request type renders itself into a [`RenderedPrompt`]: a system
//! prompt plus the conversation, expressed with the provider-neutral
//! [`Message`] types. Providers translate these into their own wire
//! formats.

use city_watch_incident_models::{ChatSender, Department, IncidentType};

use crate::media::MediaPayload;
use crate::providers::{Message, MessageContent, MessagePart};

/// Most recent chat turns forwarded to the model. Older turns are
/// dropped to keep requests inside token limits.
pub const MAX_CHAT_HISTORY: usize = 10;

/// Anomaly keys and definitions given to the model when classifying
/// live camera clips.
pub const ANOMALY_DEFINITIONS: &str = r"1. Violence & Aggression
   - Physical_Assault: One or more people physically attacking another.
   - Weapon_Visible: A knife, gun, or other weapon is clearly visible.
   - Fighting: A group or individuals engaged in a brawl.
   - Hostage_Situation: Someone being held against their will.
   - Domestic_Violence: Physical altercation in a domestic setting.

2. Medical Emergencies
   - Person_Collapsed: A person suddenly falling or lying unresponsive.
   - Seizure_Activity: Someone exhibiting seizure-like movements.
   - Unconscious_Person: A person who is not moving and appears unconscious.
   - Excessive_Bleeding: Visible signs of significant blood loss.
   - Overdose_Suspected: Signs of a potential drug overdose.

3. Public Safety Threats
   - Crowd_Stampede: A large crowd moving in a panicked, uncontrolled manner.
   - Riots_Or_Protest_Violence: A protest that has turned violent, with property damage or fighting.
   - Vandalism_In_Progress: Active destruction or defacement of property.
   - Arson: The act of deliberately setting fire to property.
   - Explosion_Or_Smoke: A sudden explosion or a large volume of smoke indicating a potential fire.

4. Suspicious Behavior
   - Loitering_With_Intent: Lingering in a sensitive area with no clear purpose.
   - Unauthorized_Access: Entering a restricted zone.
   - Stalking_Behavior: Following someone persistently.
   - Abandoned_Baggage: A bag or package left unattended in a high-traffic area.
   - Drug_Deal_Suspected: Behavior indicative of an illegal drug transaction.

5. Traffic & Road Incidents
   - Reckless_Driving: A vehicle being driven in a highly dangerous manner.
   - Hit_And_Run: A vehicle collision where one party leaves the scene.
   - Pedestrian_In_Danger: A pedestrian at immediate risk of being hit by a vehicle.
   - Accident_With_Injuries: A traffic accident where people are visibly injured.
   - Drunk_Person_Driving: A person exhibiting signs of intoxication while operating a vehicle.

6. Theft & Crime
   - Shoplifting: Concealing store items with the intent to steal.
   - Pickpocketing: Stealing from a person's pocket or bag.
   - Burglary_In_Progress: Unlawful entry into a building with intent to commit a crime.
   - Car_Theft: The act of stealing a motor vehicle.
   - Robbery: Forcibly taking property from another person.

7. Fire & Hazards
   - Fire_Outbreak: Visible flames indicating an uncontrolled fire.
   - Gas_Leak_Suspected: Signs that might indicate a gas leak (e.g., people reacting).
   - Electrical_Spark_Hazard: Visible and dangerous electrical arcing.
   - Flammable_Materials_Exposed: Improperly stored or handled flammable materials posing a risk.

8. Child & Vulnerable Person Alerts
   - Lost_Child: A young child appearing alone and distressed.
   - Child_Abduction_Attempt: An attempt to forcibly take a child.
   - Elderly_Person_Fallen: An elderly person who has fallen and cannot get up.
   - Disabled_Person_In_Distress: A person with a disability in a dangerous or difficult situation.

9. Public Nuisance & Disorder
   - Public_Intoxication: An individual who is clearly drunk and disorderly in public.
   - Harassment: Unwanted and aggressive verbal or physical interaction.
   - Indecent_Exposure: Exposure of private body parts in public.
   - Noise_Disturbance_Violence: A noise complaint that is escalating to violence.

10. Infrastructure Failures
    - Building_Collapse_Risk: Visible structural damage to a building.
    - Road_Blockage_Hazard: An obstruction on the road that poses a danger.
    - Broken_Escalator_Elevator: A malfunctioning escalator or elevator with people in danger.
    - Water_Leak_Flooding: A major water leak leading to flooding.

11. Normal Activity
    - Normal_Activity: No significant anomalies or threats detected. Standard public or private behavior.";

/// A system prompt plus conversation ready to hand to a provider.
#[derive(Debug, Clone)]
pub struct RenderedPrompt {
    /// System prompt text.
    pub system: String,
    /// Conversation messages, ending with the current user turn.
    pub messages: Vec<Message>,
}

/// Request to classify a short live-monitoring clip.
#[derive(Debug, Clone)]
pub struct ClipAnalysisRequest {
    /// The captured clip.
    pub video: MediaPayload,
}

impl ClipAnalysisRequest {
    /// Renders the monitoring prompt around the clip.
    #[must_use]
    pub fn render(&self) -> RenderedPrompt {
        let system = format!(
            r#"You are an AI assistant for a public safety platform. Your task is to watch a short clip from a live camera feed and decide whether it shows a significant anomaly.

Use these anomaly definitions:
{ANOMALY_DEFINITIONS}

Provide the following information in the specified JSON format:
1.  **isSignificant**: Set to true if a significant anomaly is detected, otherwise false.
2.  **incidentType**: The single most critical anomaly key (e.g., "Physical_Assault") from the provided list. Or "Normal_Activity" if not significant.

Respond with a single JSON object shaped like {{"isSignificant": boolean, "incidentType": string}} and nothing else."#
        );

        let messages = vec![Message {
            role: "user".to_string(),
            content: MessageContent::Parts(vec![
                MessagePart::Text {
                    text: "Clip to analyze:".to_string(),
                },
                MessagePart::Media {
                    media_type: self.video.media_type.clone(),
                    data: self.video.data.clone(),
                },
            ]),
        }];

        RenderedPrompt { system, messages }
    }
}

/// Request to analyze an operator-uploaded incident video.
#[derive(Debug, Clone)]
pub struct UploadAnalysisRequest {
    /// The uploaded video.
    pub video: MediaPayload,
}

impl UploadAnalysisRequest {
    /// Renders the full-video analysis prompt.
    #[must_use]
    pub fn render(&self) -> RenderedPrompt {
        let categories = IncidentType::all()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let departments = Department::all()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");

        let system = format!(
            r#"You are an AI assistant for a public safety platform. Your task is to analyze the provided video of an incident.

Watch the entire video carefully and provide the following information in the specified JSON format:
1.  **report**: A clear and concise summary of what is happening in the video. Describe the key events, people, objects, and the environment from the whole video.
2.  **incidentType**: Classify the most significant event in the video into one of the following categories: {categories}, or Other. If nothing significant is happening, classify as 'Normal'.
3.  **suggestedDepartment**: Based on your analysis, suggest the single most appropriate department to handle this incident. Choose one from the following list: {departments}. If 'Normal', suggest 'None'.

Respond with a single JSON object shaped like {{"report": string, "incidentType": string, "suggestedDepartment": string}} and nothing else."#
        );

        let messages = vec![Message {
            role: "user".to_string(),
            content: MessageContent::Parts(vec![
                MessagePart::Text {
                    text: "Video to analyze:".to_string(),
                },
                MessagePart::Media {
                    media_type: self.video.media_type.clone(),
                    data: self.video.data.clone(),
                },
            ]),
        }];

        RenderedPrompt { system, messages }
    }
}

/// Context block describing the incident under discussion.
#[derive(Debug, Clone)]
pub struct IncidentContext {
    /// Incident title.
    pub title: String,
    /// Incident location.
    pub location: String,
    /// Incident timestamp, already formatted for display.
    pub timestamp: String,
    /// Initial automated analysis, if the incident has one.
    pub initial_analysis: Option<String>,
    /// Previously generated summary, if one was cached.
    pub generated_summary: Option<String>,
}

/// A single prior turn in the operator chat.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    /// Who authored the turn.
    pub sender: ChatSender,
    /// Turn body.
    pub text: String,
}

/// Request to answer an operator question about an incident.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// The operator's current question.
    pub user_question: String,
    /// Context the model may draw on.
    pub incident_context: IncidentContext,
    /// Prior conversation turns, oldest first.
    pub chat_history: Vec<ChatTurn>,
}

impl ChatRequest {
    /// Renders the grounded-chat prompt.
    ///
    /// History beyond [`MAX_CHAT_HISTORY`] turns is dropped, oldest
    /// first. Kept turns become real conversation messages with their
    /// sender's role rather than being inlined into the prompt text.
    #[must_use]
    pub fn render(&self) -> RenderedPrompt {
        let context = &self.incident_context;

        let initial_analysis = context
            .initial_analysis
            .as_ref()
            .map_or_else(String::new, |analysis| {
                format!("\nInitial AI System Analysis: {analysis}")
            });
        let generated_summary = context
            .generated_summary
            .as_ref()
            .map_or_else(String::new, |summary| {
                format!("\nPreviously Generated AI Summary: {summary}")
            });

        let system = format!(
            r#"You are a helpful AI assistant for a public safety platform. You are interacting with an operator viewing an incident report.
Your goal is to answer questions about the incident based *only* on the information provided in the incident context and the chat history.
Do not make up information. If the answer is not in the provided context, say that you don't have that information. Be concise.

Incident Context:
Title: {title}
Location: {location}
Timestamp: {timestamp}{initial_analysis}{generated_summary}

Respond with a single JSON object shaped like {{"aiResponse": string}} and nothing else."#,
            title = context.title,
            location = context.location,
            timestamp = context.timestamp,
        );

        let start = self.chat_history.len().saturating_sub(MAX_CHAT_HISTORY);
        let mut messages: Vec<Message> = self.chat_history[start..]
            .iter()
            .map(|turn| Message {
                role: match turn.sender {
                    ChatSender::User => "user".to_string(),
                    ChatSender::Ai => "assistant".to_string(),
                },
                content: MessageContent::Text(turn.text.clone()),
            })
            .collect();
        messages.push(Message {
            role: "user".to_string(),
            content: MessageContent::Text(self.user_question.clone()),
        });

        RenderedPrompt { system, messages }
    }
}

/// Request to synthesize an incident summary for response teams.
#[derive(Debug, Clone)]
pub struct SummarizeRequest {
    /// Incident title.
    pub event_title: String,
    /// Incident location.
    pub location: String,
    /// Incident timestamp, already formatted for display.
    pub timestamp: String,
    /// Video analysis text, including any detected anomaly tags.
    pub ai_analysis: String,
    /// Actions taken so far, one per line.
    pub actions_taken: String,
}

impl SummarizeRequest {
    /// Renders the summarization prompt.
    #[must_use]
    pub fn render(&self) -> RenderedPrompt {
        let system = r#"You are an AI assistant that summarizes incidents for emergency response teams based on detailed video analysis and other available data.

Respond with a single JSON object shaped like {"summary": string} and nothing else."#
            .to_string();

        let user = format!(
            r"Given the following information about an incident, generate a concise summary of the incident, its potential impact, and recommended actions. Pay close attention to the AI Video Feed Analysis.

Event Title: {event_title}
Location: {location}
Timestamp: {timestamp}
AI Video Feed Analysis (including detected anomalies): {ai_analysis}
Actions Taken: {actions_taken}",
            event_title = self.event_title,
            location = self.location,
            timestamp = self.timestamp,
            ai_analysis = self.ai_analysis,
            actions_taken = self.actions_taken,
        );

        RenderedPrompt {
            system,
            messages: vec![Message {
                role: "user".to_string(),
                content: MessageContent::Text(user),
            }],
        }
    }
}
