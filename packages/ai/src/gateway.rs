//! Typed front door for the analysis tasks.
//!
//! The gateway renders a request into a prompt, sends it through the
//! configured provider, and parses the model's JSON output into the
//! task's result type. Models sometimes wrap JSON in a Markdown code
//! fence, so parsing tolerates that.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::AnalysisError;
use crate::prompts::{ChatRequest, ClipAnalysisRequest, SummarizeRequest, UploadAnalysisRequest};
use crate::providers::{self, LlmProvider};

/// Reply used when the model fails to produce a usable chat answer.
pub const CHAT_FALLBACK_REPLY: &str =
    "I'm sorry, I couldn't process that request. Please try rephrasing.";

/// Clip classification produced by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoClassification {
    /// Whether the clip shows a significant anomaly.
    pub is_significant: bool,
    /// The detected anomaly key, or `Normal_Activity`.
    pub incident_type: String,
}

/// Full-video analysis produced by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoReport {
    /// Narrative description of the footage.
    pub report: String,
    /// Category name for the most significant event.
    pub incident_type: String,
    /// Department best placed to respond.
    pub suggested_department: String,
}

/// Chat reply produced by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    /// The assistant's answer.
    pub ai_response: String,
}

/// Incident summary produced by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentSummary {
    /// The synthesized summary text.
    pub summary: String,
}

/// Gateway that renders prompts, calls the provider, and parses results.
pub struct AiGateway {
    provider: Box<dyn LlmProvider>,
}

impl AiGateway {
    /// Wraps an explicit provider.
    #[must_use]
    pub fn new(provider: Box<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    /// Builds a gateway from environment configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Config`] if no provider credentials are
    /// configured.
    pub fn from_env() -> Result<Self, AnalysisError> {
        Ok(Self::new(providers::create_provider_from_env()?))
    }

    /// Classifies a live-monitoring clip against the anomaly definitions.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError`] if the provider call fails or the model
    /// output does not parse as a classification.
    pub async fn classify_clip(
        &self,
        request: &ClipAnalysisRequest,
    ) -> Result<VideoClassification, AnalysisError> {
        let rendered = request.render();
        let output = self
            .provider
            .complete(&rendered.system, &rendered.messages)
            .await?;
        parse_json_output(&output)
    }

    /// Analyzes an uploaded incident video into a dispatchable report.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError`] if the provider call fails or the model
    /// output does not parse as a report.
    pub async fn classify_upload(
        &self,
        request: &UploadAnalysisRequest,
    ) -> Result<VideoReport, AnalysisError> {
        let rendered = request.render();
        let output = self
            .provider
            .complete(&rendered.system, &rendered.messages)
            .await?;
        parse_json_output(&output)
    }

    /// Answers an operator question about an incident.
    ///
    /// Unparseable or empty model output degrades to
    /// [`CHAT_FALLBACK_REPLY`] instead of an error. Provider failures
    /// still propagate.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError`] if the provider call itself fails.
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, AnalysisError> {
        let rendered = request.render();
        let output = self
            .provider
            .complete(&rendered.system, &rendered.messages)
            .await?;
        Ok(match parse_json_output::<ChatReply>(&output) {
            Ok(reply) if !reply.ai_response.trim().is_empty() => reply,
            _ => ChatReply {
                ai_response: CHAT_FALLBACK_REPLY.to_string(),
            },
        })
    }

    /// Generates a concise incident summary.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError`] if the provider call fails or the model
    /// output does not parse as a summary.
    pub async fn summarize(
        &self,
        request: &SummarizeRequest,
    ) -> Result<IncidentSummary, AnalysisError> {
        let rendered = request.render();
        let output = self
            .provider
            .complete(&rendered.system, &rendered.messages)
            .await?;
        parse_json_output(&output)
    }
}

/// Parses model output as JSON, tolerating a Markdown code fence wrapper.
fn parse_json_output<T: DeserializeOwned>(output: &str) -> Result<T, AnalysisError> {
    let json = strip_code_fences(output);
    serde_json::from_str(json).map_err(|e| AnalysisError::Schema {
        message: format!("Model output did not match the expected shape: {e}"),
    })
}

/// Strips a surrounding ``` fence, with or without a `json` language tag.
fn strip_code_fences(output: &str) -> &str {
    let trimmed = output.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    let inner = inner.strip_suffix("```").unwrap_or(inner);
    inner.trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MediaPayload;
    use crate::prompts::IncidentContext;
    use crate::providers::Message;

    struct CannedProvider {
        output: Result<String, String>,
    }

    impl CannedProvider {
        fn ok(output: &str) -> Box<Self> {
            Box::new(Self {
                output: Ok(output.to_string()),
            })
        }

        fn err(message: &str) -> Box<Self> {
            Box::new(Self {
                output: Err(message.to_string()),
            })
        }
    }

    #[async_trait::async_trait]
    impl LlmProvider for CannedProvider {
        async fn complete(
            &self,
            _system_prompt: &str,
            _messages: &[Message],
        ) -> Result<String, AnalysisError> {
            match &self.output {
                Ok(output) => Ok(output.clone()),
                Err(message) => Err(AnalysisError::Provider {
                    message: message.clone(),
                }),
            }
        }
    }

    fn clip_request() -> ClipAnalysisRequest {
        ClipAnalysisRequest {
            video: MediaPayload {
                media_type: "video/webm".to_string(),
                data: "QUJD".to_string(),
            },
        }
    }

    fn chat_request() -> ChatRequest {
        ChatRequest {
            user_question: "What happened?".to_string(),
            incident_context: IncidentContext {
                title: "Fire Alert: Thampanoor".to_string(),
                location: "Thampanoor Railway Station".to_string(),
                timestamp: "2025-01-01 10:00:00 UTC".to_string(),
                initial_analysis: None,
                generated_summary: None,
            },
            chat_history: Vec::new(),
        }
    }

    #[tokio::test]
    async fn parses_a_fenced_classification() {
        let gateway = AiGateway::new(CannedProvider::ok(
            "```json\n{\"isSignificant\": true, \"incidentType\": \"Fire_Outbreak\"}\n```",
        ));
        let classification = gateway.classify_clip(&clip_request()).await.unwrap();
        assert!(classification.is_significant);
        assert_eq!(classification.incident_type, "Fire_Outbreak");
    }

    #[tokio::test]
    async fn off_shape_output_is_a_schema_error() {
        let gateway = AiGateway::new(CannedProvider::ok("{\"unexpected\": 1}"));
        let err = gateway.classify_clip(&clip_request()).await.unwrap_err();
        assert!(
            matches!(err, AnalysisError::Schema { .. }),
            "missing fields should be a schema error: {err}"
        );
    }

    #[tokio::test]
    async fn upload_report_parses_all_fields() {
        let gateway = AiGateway::new(CannedProvider::ok(
            "{\"report\": \"Two cars collided.\", \"incidentType\": \"Traffic Accident\", \"suggestedDepartment\": \"Traffic Control\"}",
        ));
        let request = UploadAnalysisRequest {
            video: MediaPayload {
                media_type: "video/mp4".to_string(),
                data: "QUJD".to_string(),
            },
        };
        let report = gateway.classify_upload(&request).await.unwrap();
        assert_eq!(report.incident_type, "Traffic Accident");
        assert_eq!(report.suggested_department, "Traffic Control");
    }

    #[tokio::test]
    async fn chat_degrades_to_the_fallback_reply() {
        let gateway = AiGateway::new(CannedProvider::ok("I cannot answer in JSON"));
        let reply = gateway.chat(&chat_request()).await.unwrap();
        assert_eq!(reply.ai_response, CHAT_FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn chat_falls_back_on_an_empty_answer() {
        let gateway = AiGateway::new(CannedProvider::ok("{\"aiResponse\": \"\"}"));
        let reply = gateway.chat(&chat_request()).await.unwrap();
        assert_eq!(reply.ai_response, CHAT_FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn chat_returns_the_model_reply() {
        let gateway = AiGateway::new(CannedProvider::ok(
            "{\"aiResponse\": \"No injuries reported.\"}",
        ));
        let reply = gateway.chat(&chat_request()).await.unwrap();
        assert_eq!(reply.ai_response, "No injuries reported.");
    }

    #[tokio::test]
    async fn provider_errors_propagate_through_chat() {
        let gateway = AiGateway::new(CannedProvider::err("boom"));
        let err = gateway.chat(&chat_request()).await.unwrap_err();
        assert!(
            matches!(err, AnalysisError::Provider { .. }),
            "network failures should not be masked by the fallback: {err}"
        );
    }

    #[tokio::test]
    async fn summarize_returns_the_summary_text() {
        let gateway = AiGateway::new(CannedProvider::ok("{\"summary\": \"Collision cleared.\"}"));
        let request = SummarizeRequest {
            event_title: "Traffic Accident: Pattom".to_string(),
            location: "Pattom Central".to_string(),
            timestamp: "2025-01-01 09:30:00 UTC".to_string(),
            ai_analysis: "Two vehicles collided".to_string(),
            actions_taken: "Ambulance dispatched".to_string(),
        };
        let summary = gateway.summarize(&request).await.unwrap();
        assert_eq!(summary.summary, "Collision cleared.");
    }

    #[test]
    fn fences_are_stripped_with_and_without_a_language_tag() {
        assert_eq!(strip_code_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("{\"a\": 1}"), "{\"a\": 1}");
    }
}
