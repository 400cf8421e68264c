use std::sync::Arc;

use askama::Template;
use askama_axum::IntoResponse;
use axum::{
    extract::{OriginalUri, State},
    response::Response,
};
use unic_langid::LanguageIdentifier;

use crate::database::SingleRowQueryError;
use crate::preferred_language::PreferredLanguage;
use crate::translation::Localized;
use crate::AppState;

use super::error::{questionnaire_not_found, PageError};

#[derive(Template)]
#[template(path = "questionnaire.html")]
pub(crate) struct QuestionnaireTemplate {
    language: LanguageIdentifier,
    token: Arc<str>,
}

impl Localized for QuestionnaireTemplate {
    fn language(&self) -> &LanguageIdentifier {
        &self.language
    }
}

#[derive(thiserror::Error, Debug)]
#[error("Error looking up questionnaire: {0}")]
pub(crate) struct GetQuestionnairePageError(#[from] SingleRowQueryError);

/// The last segment of the raw request path, without percent-decoding
fn token_from_path(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or_default()
}

/// Anything below `/questionnaire/` lands here. Whatever isn't stored is simply not found.
pub(crate) async fn get_questionnaire_page(
    State(state): State<AppState>,
    PreferredLanguage(language): PreferredLanguage,
    OriginalUri(uri): OriginalUri,
) -> Result<Response, PageError<GetQuestionnairePageError>> {
    let token = token_from_path(uri.path());
    let questionnaire = match state.database.get_by_token(token).await {
        Ok(Some(questionnaire)) => questionnaire,
        Ok(None) => {
            tracing::debug!(%token, "Questionnaire not found");
            return Ok(questionnaire_not_found(language));
        }
        Err(error) => return Err(PageError::new(language, error)),
    };

    Ok(QuestionnaireTemplate {
        language,
        token: questionnaire.token,
    }
    .into_response())
}
