//! JSON counterparts of the dashboard and questionnaire pages

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::database::{MultiRowQueryError, SingleRowQueryError, StatementError};
use crate::questionnaire::{create_invitation_link, format_machine_readable};
use crate::AppState;

use super::admin::RECENT_INVITATIONS;

const NO_CACHE: &str = "no-store, no-cache, must-revalidate, proxy-revalidate";

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QuestionnaireResponse {
    id: Arc<str>,
    token: Arc<str>,
    first_name: Option<Arc<str>>,
    last_name: Option<Arc<str>>,
    created_at: String,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InvitationResponse {
    token: Arc<str>,
    first_name: Option<Arc<str>>,
    last_name: Option<Arc<str>>,
    invitation_link: String,
    created_at: String,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateLinkResponse {
    token: Arc<str>,
    invitation_link: String,
    success: bool,
}

#[derive(Serialize, Debug)]
struct ErrorResponse {
    error: &'static str,
}

#[derive(thiserror::Error, Debug)]
pub(crate) enum ApiError {
    #[error("Error looking up questionnaire: {0}")]
    GetQuestionnaireError(#[from] SingleRowQueryError),
    #[error("Error listing invitations: {0}")]
    ListError(#[from] MultiRowQueryError),
    #[error("Error creating invitation: {0}")]
    CreateError(#[from] StatementError),
    #[error("Error formatting date: {0}")]
    FormatError(#[from] time::error::Format),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!("Error handling API request: {}", self);
        let error = match self {
            ApiError::GetQuestionnaireError(_) => "Failed to fetch questionnaire",
            ApiError::ListError(_) | ApiError::FormatError(_) => {
                "Failed to fetch questionnaires overview"
            }
            ApiError::CreateError(_) => "Failed to generate invitation link",
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse { error })).into_response()
    }
}

pub(crate) async fn get_questionnaire(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Response, ApiError> {
    let Some(questionnaire) = state.database.get_by_token(&token).await? else {
        let error = ErrorResponse {
            error: "Questionnaire not found",
        };
        return Ok((StatusCode::NOT_FOUND, Json(error)).into_response());
    };

    let response = QuestionnaireResponse {
        created_at: format_machine_readable(questionnaire.created_at)?,
        id: questionnaire.id,
        token: questionnaire.token,
        first_name: questionnaire.first_name,
        last_name: questionnaire.last_name,
    };

    Ok(Json(response).into_response())
}

/// Always fresh, the dashboard polls this
pub(crate) async fn get_overview(State(state): State<AppState>) -> Result<Response, ApiError> {
    let summaries = state.database.list_recent(RECENT_INVITATIONS).await?;

    let mut invitations = Vec::with_capacity(summaries.len());
    for summary in summaries {
        invitations.push(InvitationResponse {
            invitation_link: create_invitation_link(&state.configuration.server_url, &summary.token),
            created_at: format_machine_readable(summary.created_at)?,
            token: summary.token,
            first_name: summary.first_name,
            last_name: summary.last_name,
        });
    }

    Ok(([(header::CACHE_CONTROL, NO_CACHE)], Json(invitations)).into_response())
}

pub(crate) async fn generate_link(
    State(state): State<AppState>,
) -> Result<Json<GenerateLinkResponse>, ApiError> {
    let token = state.database.create_invitation().await?;
    let invitation_link = create_invitation_link(&state.configuration.server_url, &token);

    tracing::info!(%invitation_link, "Generated invitation link");

    Ok(Json(GenerateLinkResponse {
        token,
        invitation_link,
        success: true,
    }))
}
