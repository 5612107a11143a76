//! HTTP request handlers for the city watch API.

use actix_web::{HttpResponse, web};
use chrono::{SecondsFormat, Utc};
use city_watch_ai::AnalysisError;
use city_watch_ai::gateway::{AiGateway, IncidentSummary};
use city_watch_ai::media;
use city_watch_ai::prompts::{
    ChatRequest, ChatTurn, ClipAnalysisRequest, IncidentContext, SummarizeRequest,
    UploadAnalysisRequest,
};
use city_watch_feed::generator::INITIAL_INCIDENT_COUNT;
use city_watch_feed::live_log::{ANALYSIS_SCRIPT, CONNECT_DELAY_MS, ENTRY_INTERVAL_MS};
use city_watch_feed::store::IncidentPatch;
use city_watch_incident_models::{
    AnomalyPriority, ChatMessage, ChatSender, Department, Incident, IncidentAction, IncidentType,
};
use city_watch_server_models::{
    AnalyzeRequest, ApiCameraStatus, ApiClipClassification, ApiHealth, ApiLiveLog, ApiStats,
    AppendActionRequest, ChatQuery, ClipChatRequest, DispatchRequest,
};
use std::time::Duration;

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/stats`
///
/// Dashboard KPI figures. Only the active count is live; the remaining
/// figures are fixed campaign numbers.
pub async fn stats(state: web::Data<AppState>) -> HttpResponse {
    let active_incidents = state.store_read().count_active();
    HttpResponse::Ok().json(ApiStats {
        active_incidents,
        avg_response_time: "-70%".to_string(),
        false_alarms: "-50%".to_string(),
        system_status: "Online".to_string(),
    })
}

/// `GET /api/incidents`
pub async fn incidents(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.store_read().incidents())
}

/// `GET /api/incidents/{id}`
pub async fn incident_by_id(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let id = path.into_inner();
    let store = state.store_read();
    store.get(&id).map_or_else(
        || not_found(&id),
        |incident| HttpResponse::Ok().json(incident),
    )
}

/// `POST /api/incidents/refresh`
///
/// Replaces the feed with a fresh initial batch and returns it.
pub async fn refresh_incidents(state: web::Data<AppState>) -> HttpResponse {
    let batch = state.generator_lock().initial_batch(INITIAL_INCIDENT_COUNT);
    let mut store = state.store_write();
    store.refresh(batch);
    HttpResponse::Ok().json(store.incidents())
}

/// `POST /api/incidents/{id}/report`
///
/// Returns the incident's report summary, generating and caching it on
/// first request. The store lock is released while the model call is in
/// flight.
pub async fn incident_report(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let id = path.into_inner();

    let request = {
        let store = state.store_read();
        let Some(incident) = store.get(&id) else {
            return not_found(&id);
        };
        if let Some(summary) = incident.generated_summary.clone() {
            return HttpResponse::Ok().json(IncidentSummary { summary });
        }
        summarize_request_for(incident)
    };

    let gateway = match AiGateway::from_env() {
        Ok(gateway) => gateway,
        Err(e) => return analysis_error_response("Failed to configure the analysis gateway", &e),
    };

    match gateway.summarize(&request).await {
        Ok(generated) => {
            let mut store = state.store_write();
            store.update_by_id(
                &id,
                IncidentPatch {
                    generated_summary: Some(generated.summary.clone()),
                    ..IncidentPatch::default()
                },
            );
            // A concurrent request may have cached its summary first, in
            // which case the stored text wins.
            let summary = store
                .get(&id)
                .and_then(|incident| incident.generated_summary.clone())
                .unwrap_or(generated.summary);
            HttpResponse::Ok().json(IncidentSummary { summary })
        }
        Err(e) => analysis_error_response("Failed to generate incident report", &e),
    }
}

/// `POST /api/incidents/{id}/chat`
///
/// Answers an operator question about a stored incident and appends
/// both sides of the exchange to its transcript.
pub async fn incident_chat(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<ChatQuery>,
) -> HttpResponse {
    let id = path.into_inner();
    let question = body.into_inner().question;

    let request = {
        let store = state.store_read();
        let Some(incident) = store.get(&id) else {
            return not_found(&id);
        };
        chat_request_for(incident, question.clone())
    };

    let gateway = match AiGateway::from_env() {
        Ok(gateway) => gateway,
        Err(e) => return analysis_error_response("Failed to configure the analysis gateway", &e),
    };

    match gateway.chat(&request).await {
        Ok(reply) => {
            state.store_write().update_by_id(
                &id,
                IncidentPatch {
                    append_chat: vec![
                        chat_message(ChatSender::User, question),
                        chat_message(ChatSender::Ai, reply.ai_response.clone()),
                    ],
                    ..IncidentPatch::default()
                },
            );
            HttpResponse::Ok().json(reply)
        }
        Err(e) => analysis_error_response("Failed to answer incident chat", &e),
    }
}

/// `POST /api/incidents/{id}/actions`
///
/// Appends an operator action to the incident's log and returns the
/// updated incident.
pub async fn append_action(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<AppendActionRequest>,
) -> HttpResponse {
    let id = path.into_inner();
    let body = body.into_inner();

    let action = IncidentAction {
        timestamp: Utc::now().format("%H:%M:%S").to_string(),
        description: body.description,
        assigned_to_department: body.assigned_to_department,
    };

    let mut store = state.store_write();
    let updated = store.update_by_id(
        &id,
        IncidentPatch {
            append_actions: vec![action],
            ..IncidentPatch::default()
        },
    );
    if !updated {
        return not_found(&id);
    }
    store.get(&id).map_or_else(
        || not_found(&id),
        |incident| HttpResponse::Ok().json(incident),
    )
}

/// `POST /api/incidents/dispatch`
///
/// Files an incident from an already-analyzed video upload and records
/// the dispatch action. Rejects reports the analysis classed as normal
/// activity.
pub async fn dispatch_incident(
    state: web::Data<AppState>,
    body: web::Json<DispatchRequest>,
) -> HttpResponse {
    let body = body.into_inner();

    let Ok(incident_type) = body.incident_type.parse::<IncidentType>() else {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": format!("Cannot dispatch for incident type {}", body.incident_type),
        }));
    };

    let mut incident = state
        .generator_lock()
        .upload_incident(incident_type, &body.report);
    incident.action_log.push(IncidentAction {
        timestamp: Utc::now().format("%H:%M:%S").to_string(),
        description: "Operator dispatched Police unit.".to_string(),
        assigned_to_department: Some(Department::Police),
    });

    state.store_write().add(incident.clone());
    HttpResponse::Ok().json(incident)
}

/// `POST /api/analyze/upload`
///
/// Analyzes an uploaded incident video into a dispatchable report.
pub async fn analyze_upload(body: web::Json<AnalyzeRequest>) -> HttpResponse {
    let video = match media::parse_data_uri(&body.video_data_uri) {
        Ok(video) => video,
        Err(e) => return analysis_error_response("Rejected uploaded video", &e),
    };

    let gateway = match AiGateway::from_env() {
        Ok(gateway) => gateway,
        Err(e) => return analysis_error_response("Failed to configure the analysis gateway", &e),
    };

    match gateway.classify_upload(&UploadAnalysisRequest { video }).await {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(e) => analysis_error_response("Failed to analyze uploaded video", &e),
    }
}

/// `POST /api/analyze/clip`
///
/// Classifies a live-monitoring clip and grades the detected anomaly.
pub async fn analyze_clip(body: web::Json<AnalyzeRequest>) -> HttpResponse {
    let video = match media::parse_data_uri(&body.video_data_uri) {
        Ok(video) => video,
        Err(e) => return analysis_error_response("Rejected live clip", &e),
    };

    let gateway = match AiGateway::from_env() {
        Ok(gateway) => gateway,
        Err(e) => return analysis_error_response("Failed to configure the analysis gateway", &e),
    };

    match gateway.classify_clip(&ClipAnalysisRequest { video }).await {
        Ok(classification) => {
            let priority = AnomalyPriority::for_anomaly(&classification.incident_type);
            HttpResponse::Ok().json(ApiClipClassification {
                is_significant: classification.is_significant,
                incident_type: classification.incident_type,
                priority,
            })
        }
        Err(e) => analysis_error_response("Failed to classify live clip", &e),
    }
}

/// `POST /api/analyze/chat`
///
/// Stateless chat about an in-browser video session. The client carries
/// the context and transcript; nothing is stored server side.
pub async fn clip_chat(body: web::Json<ClipChatRequest>) -> HttpResponse {
    let body = body.into_inner();

    let request = ChatRequest {
        user_question: body.question,
        incident_context: IncidentContext {
            title: body.context.title,
            location: body.context.location,
            timestamp: body.context.timestamp,
            initial_analysis: body.context.initial_ai_system_analysis,
            generated_summary: body.context.generated_summary,
        },
        chat_history: body
            .chat_history
            .into_iter()
            .map(|turn| ChatTurn {
                sender: turn.sender,
                text: turn.text,
            })
            .collect(),
    };

    let gateway = match AiGateway::from_env() {
        Ok(gateway) => gateway,
        Err(e) => return analysis_error_response("Failed to configure the analysis gateway", &e),
    };

    match gateway.chat(&request).await {
        Ok(reply) => HttpResponse::Ok().json(reply),
        Err(e) => analysis_error_response("Failed to answer live-view chat", &e),
    }
}

/// `GET /api/cameras`
///
/// Camera registry with each camera's matched active incident, if any.
pub async fn cameras(state: web::Data<AppState>) -> HttpResponse {
    let store = state.store_read();
    let statuses: Vec<ApiCameraStatus> = state
        .cameras
        .match_incidents(store.incidents())
        .iter()
        .map(ApiCameraStatus::from)
        .collect();
    HttpResponse::Ok().json(statuses)
}

/// `GET /api/live/logs`
///
/// Replays the scripted analysis log as server-sent events, stamping
/// each entry with the wall-clock time it is sent. Dropping the
/// connection cancels the replay.
pub async fn live_logs() -> HttpResponse {
    let stream = async_stream::stream! {
        tokio::time::sleep(Duration::from_millis(CONNECT_DELAY_MS)).await;
        for (i, entry) in ANALYSIS_SCRIPT.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(Duration::from_millis(ENTRY_INTERVAL_MS)).await;
            }
            let log = ApiLiveLog {
                timestamp: Utc::now().format("%H:%M:%S").to_string(),
                text: entry.text.to_string(),
                tags: entry.tags.iter().map(|tag| (*tag).to_string()).collect(),
            };
            let payload = serde_json::to_string(&log).unwrap_or_default();
            yield Ok::<_, actix_web::Error>(web::Bytes::from(format!("data: {payload}\n\n")));
        }
    };

    HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header(("Cache-Control", "no-cache"))
        .streaming(stream)
}

/// Maps an analysis failure onto the HTTP status it should surface as,
/// logging the full error.
fn analysis_error_response(context: &str, e: &AnalysisError) -> HttpResponse {
    log::error!("{context}: {e}");
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        AnalysisError::Media { .. } => HttpResponse::BadRequest().json(body),
        AnalysisError::Config { .. } => HttpResponse::ServiceUnavailable().json(body),
        AnalysisError::Http(_) | AnalysisError::Provider { .. } | AnalysisError::Schema { .. } => {
            HttpResponse::BadGateway().json(body)
        }
        AnalysisError::Json(_) => HttpResponse::InternalServerError().json(body),
    }
}

fn not_found(id: &str) -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": format!("No incident with id {id}"),
    }))
}

fn chat_message(sender: ChatSender, text: String) -> ChatMessage {
    ChatMessage {
        id: uuid::Uuid::new_v4().to_string(),
        sender,
        text,
        timestamp: Utc::now(),
    }
}

/// Assembles the report-generation inputs for a stored incident,
/// substituting the fixed phrases used when detection details are
/// missing.
fn summarize_request_for(incident: &Incident) -> SummarizeRequest {
    SummarizeRequest {
        event_title: incident.title.clone(),
        location: incident.location.clone(),
        timestamp: incident
            .timestamp
            .to_rfc3339_opts(SecondsFormat::Millis, true),
        ai_analysis: incident
            .initial_ai_system_analysis
            .clone()
            .unwrap_or_else(|| "Initial sensor data received.".to_string()),
        actions_taken: incident
            .initial_actions_taken
            .clone()
            .unwrap_or_else(|| "Automated alerts initiated.".to_string()),
    }
}

/// Assembles the chat context for a stored incident.
fn chat_request_for(incident: &Incident, user_question: String) -> ChatRequest {
    ChatRequest {
        user_question,
        incident_context: IncidentContext {
            title: incident.title.clone(),
            location: incident.location.clone(),
            timestamp: incident
                .timestamp
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            initial_analysis: incident.initial_ai_system_analysis.clone(),
            generated_summary: incident.generated_summary.clone(),
        },
        chat_history: incident
            .chat_history
            .iter()
            .map(|message| ChatTurn {
                sender: message.sender,
                text: message.text.clone(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use actix_web::http::StatusCode;
    use city_watch_cameras::CameraIndex;
    use city_watch_feed::generator::IncidentGenerator;
    use city_watch_feed::store::IncidentStore;
    use city_watch_incident_models::IncidentStatus;
    use std::sync::{Arc, Mutex, RwLock};

    fn seeded_state() -> web::Data<AppState> {
        let mut generator = IncidentGenerator::new();
        let mut store = IncidentStore::new();
        store.refresh(generator.initial_batch(3));
        web::Data::new(AppState {
            store: Arc::new(RwLock::new(store)),
            generator: Arc::new(Mutex::new(generator)),
            cameras: Arc::new(CameraIndex::from_registry()),
        })
    }

    async fn json_body(resp: HttpResponse) -> serde_json::Value {
        let bytes = to_bytes(resp.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_reports_the_package_version() {
        let resp = health().await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = json_body(resp).await;
        assert_eq!(body["healthy"], true);
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn stats_counts_only_active_incidents() {
        let state = seeded_state();
        let id = state.store_read().incidents()[0].id.clone();
        state.store_write().update_by_id(
            &id,
            IncidentPatch {
                status: Some(IncidentStatus::Resolved),
                ..IncidentPatch::default()
            },
        );
        let expected = state.store_read().count_active();

        let body = json_body(stats(state).await).await;
        assert_eq!(body["activeIncidents"], expected);
        assert_eq!(body["systemStatus"], "Online");
    }

    #[tokio::test]
    async fn unknown_incident_ids_are_not_found() {
        let state = seeded_state();
        let resp = incident_by_id(state, web::Path::from("inc-404-0".to_string())).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn refresh_returns_a_full_batch() {
        let state = seeded_state();
        let resp = refresh_incidents(state.clone()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(state.store_read().len(), INITIAL_INCIDENT_COUNT);
    }

    #[tokio::test]
    async fn append_action_logs_the_new_entry() {
        let state = seeded_state();
        let id = state.store_read().incidents()[0].id.clone();
        let body = web::Json(AppendActionRequest {
            description: "Dispatched patrol to verify.".to_string(),
            assigned_to_department: Some(Department::Police),
        });

        let resp = append_action(state.clone(), web::Path::from(id.clone()), body).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let store = state.store_read();
        let last = store.get(&id).unwrap().action_log.last().unwrap().clone();
        assert_eq!(last.description, "Dispatched patrol to verify.");
        assert_eq!(last.assigned_to_department, Some(Department::Police));
    }

    #[tokio::test]
    async fn append_action_on_an_unknown_id_is_not_found() {
        let state = seeded_state();
        let body = web::Json(AppendActionRequest {
            description: "Dispatched patrol to verify.".to_string(),
            assigned_to_department: None,
        });
        let resp = append_action(state, web::Path::from("inc-404-0".to_string()), body).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn dispatch_rejects_non_dispatchable_types() {
        let state = seeded_state();
        let before = state.store_read().len();
        let body = web::Json(DispatchRequest {
            report: "Everything looks calm.".to_string(),
            incident_type: "Normal".to_string(),
            suggested_department: "None".to_string(),
        });

        let resp = dispatch_incident(state.clone(), body).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(state.store_read().len(), before);
    }

    #[tokio::test]
    async fn dispatch_files_an_incident_with_a_police_action() {
        let state = seeded_state();
        let before = state.store_read().len();
        let body = web::Json(DispatchRequest {
            report: "Fire spreading across the roof.".to_string(),
            incident_type: "Fire Alert".to_string(),
            suggested_department: "Fire Department".to_string(),
        });

        let resp = dispatch_incident(state.clone(), body).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let store = state.store_read();
        assert_eq!(store.len(), before + 1);
        let incident = &store.incidents()[0];
        assert!(incident.id.starts_with("vid-"), "unexpected id {}", incident.id);
        let last = incident.action_log.last().unwrap();
        assert_eq!(last.description, "Operator dispatched Police unit.");
        assert_eq!(last.assigned_to_department, Some(Department::Police));
    }

    #[tokio::test]
    async fn cameras_reports_the_whole_registry() {
        let state = seeded_state();
        let expected = state.cameras.match_incidents(&[]).len();
        let body = json_body(cameras(state).await).await;
        assert_eq!(body.as_array().map(Vec::len), Some(expected));
    }

    #[tokio::test]
    async fn analysis_errors_map_to_their_statuses() {
        let cases = [
            (
                AnalysisError::Media {
                    message: "bad uri".to_string(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                AnalysisError::Config {
                    message: "no key".to_string(),
                },
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                AnalysisError::Provider {
                    message: "overloaded".to_string(),
                },
                StatusCode::BAD_GATEWAY,
            ),
            (
                AnalysisError::Schema {
                    message: "off shape".to_string(),
                },
                StatusCode::BAD_GATEWAY,
            ),
        ];
        for (error, expected) in cases {
            let message = error.to_string();
            let resp = analysis_error_response("request failed", &error);
            assert_eq!(resp.status(), expected, "{message}");
            let body = json_body(resp).await;
            assert_eq!(
                body["error"], message,
                "the error text should surface verbatim"
            );
        }
    }

    #[test]
    fn summarize_inputs_substitute_missing_details() {
        let mut incident = IncidentGenerator::new().generate();
        incident.initial_ai_system_analysis = None;
        incident.initial_actions_taken = None;

        let request = summarize_request_for(&incident);
        assert_eq!(request.ai_analysis, "Initial sensor data received.");
        assert_eq!(request.actions_taken, "Automated alerts initiated.");
        assert!(request.timestamp.ends_with('Z'), "{}", request.timestamp);
    }

    #[test]
    fn chat_context_carries_the_transcript() {
        let mut generator = IncidentGenerator::new();
        let mut incident = generator.generate();
        incident.chat_history.push(chat_message(
            ChatSender::User,
            "Any injuries?".to_string(),
        ));

        let request = chat_request_for(&incident, "What changed?".to_string());
        assert_eq!(request.user_question, "What changed?");
        assert_eq!(request.incident_context.title, incident.title);
        assert_eq!(request.chat_history.len(), 1);
        assert_eq!(request.chat_history[0].text, "Any injuries?");
    }
}
