//! Axum route handlers for the Messages API.

use std::collections::BTreeMap;

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::messages::generator::{generate_message, GeneratedMessage, MessageInput};
use crate::messages::templates::{extract_variables, MessageTemplate, MessageType};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateMessageRequest {
    pub prospect_id: Option<String>,
    pub template_id: Option<String>,
    pub message_type: MessageType,
    pub custom_prompt: Option<String>,
    pub prospect_data: Option<Map<String, Value>>,
    pub user_data: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTemplateRequest {
    pub name: String,
    pub content: String,
    pub template_type: MessageType,
    #[serde(default)]
    pub is_default: bool,
}

/// POST /api/v1/messages/generate
pub async fn handle_generate(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<GenerateMessageRequest>,
) -> Result<Json<GeneratedMessage>, AppError> {
    debug!(
        "Generating {} message for user {} (prospect={:?}, template={:?})",
        request.message_type.as_str(),
        user.user_id,
        request.prospect_id,
        request.template_id
    );

    let prospect = request.prospect_data.unwrap_or_default();
    let sender = request.user_data.unwrap_or_default();
    let input = MessageInput {
        prospect: &prospect,
        sender: &sender,
        message_type: request.message_type,
        custom_prompt: request.custom_prompt.as_deref(),
    };

    let generated = generate_message(state.generator.as_ref(), &input).await?;
    Ok(Json(generated))
}

/// GET /api/v1/messages/templates
pub async fn handle_default_templates(_user: AuthUser) -> Json<BTreeMap<&'static str, &'static str>> {
    Json(
        [MessageType::Email, MessageType::LinkedIn]
            .into_iter()
            .map(|t| (t.as_str(), t.default_template()))
            .collect(),
    )
}

/// GET /api/v1/messages/templates/variables
pub async fn handle_default_template_variables(
    _user: AuthUser,
) -> Json<BTreeMap<&'static str, Vec<String>>> {
    Json(
        [MessageType::Email, MessageType::LinkedIn]
            .into_iter()
            .map(|t| {
                (
                    t.as_str(),
                    extract_variables(t.default_template()).into_iter().collect(),
                )
            })
            .collect(),
    )
}

/// POST /api/v1/messages/templates
///
/// Builds a template for the caller with its variables derived from the content.
/// Storage is the client's concern; nothing is persisted here.
pub async fn handle_create_template(
    user: AuthUser,
    Json(request): Json<CreateTemplateRequest>,
) -> Result<Json<MessageTemplate>, AppError> {
    if request.name.trim().is_empty() {
        return Err(AppError::Validation("name cannot be empty".to_string()));
    }
    if request.content.trim().is_empty() {
        return Err(AppError::Validation("content cannot be empty".to_string()));
    }

    Ok(Json(MessageTemplate::new(
        request.name,
        request.content,
        request.template_type,
        user.user_id,
        request.is_default,
        chrono::Utc::now().timestamp_millis(),
    )))
}
