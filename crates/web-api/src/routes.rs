use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::{HeaderValue, Method, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use validator::Validate;

use application::{MessageView, SendMessageRequest, SentMessageDto};
use domain::{ApplicationId, ConversationSummary};

use crate::{auth::AuthUser, error::ApiError, state::AppState};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct SendMessagePayload {
    application_id: ApplicationId,
    #[validate(length(min = 1, message = "messageText must not be empty"))]
    message_text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UnreadCountResponse {
    unread_count: u64,
}

pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.cors_origins);

    Router::new()
        .route("/health", get(health))
        .route("/messages", post(send_message))
        .route("/messages/{application_id}", get(list_messages))
        .route("/messages/{application_id}/read", post(mark_read))
        .route("/conversations", get(list_conversations))
        .route("/conversations/unread-count", get(unread_count))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    if origins.is_empty() || origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(parsed)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn send_message(
    State(state): State<AppState>,
    caller: AuthUser,
    payload: Result<Json<SendMessagePayload>, JsonRejection>,
) -> Result<(StatusCode, Json<SentMessageDto>), ApiError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let message = state
        .messaging_service
        .send_message(SendMessageRequest {
            caller_id: caller.user_id,
            application_id: payload.application_id,
            text: payload.message_text,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(SentMessageDto::from(&message))))
}

async fn list_messages(
    State(state): State<AppState>,
    caller: AuthUser,
    application_id: Result<Path<ApplicationId>, PathRejection>,
) -> Result<Json<Vec<MessageView>>, ApiError> {
    let Path(application_id) = application_id?;
    let items = state
        .messaging_service
        .list_messages(caller.user_id, application_id)
        .await?;

    Ok(Json(items))
}

async fn mark_read(
    State(state): State<AppState>,
    caller: AuthUser,
    application_id: Result<Path<ApplicationId>, PathRejection>,
) -> Result<Json<u64>, ApiError> {
    let Path(application_id) = application_id?;
    let count = state
        .messaging_service
        .mark_read(caller.user_id, application_id)
        .await?;

    Ok(Json(count))
}

async fn list_conversations(
    State(state): State<AppState>,
    caller: AuthUser,
) -> Result<Json<Vec<ConversationSummary>>, ApiError> {
    let items = state
        .messaging_service
        .list_conversations(caller.user_id)
        .await?;

    Ok(Json(items))
}

async fn unread_count(
    State(state): State<AppState>,
    caller: AuthUser,
) -> Result<Json<UnreadCountResponse>, ApiError> {
    let unread_count = state.messaging_service.unread_total(caller.user_id).await?;

    Ok(Json(UnreadCountResponse { unread_count }))
}
