use askama::Template;
use askama_axum::IntoResponse;
use axum::{http::StatusCode, response::Response};
use unic_langid::LanguageIdentifier;

use crate::preferred_language::PreferredLanguage;
use crate::translation::{translate, Localized};

#[derive(Template)]
#[template(path = "error.html")]
pub(crate) struct ErrorTemplate {
    language: LanguageIdentifier,
    heading: String,
    message: String,
}

impl Localized for ErrorTemplate {
    fn language(&self) -> &LanguageIdentifier {
        &self.language
    }
}

impl ErrorTemplate {
    fn new(language: LanguageIdentifier, heading_id: &str, message_id: &str) -> Self {
        Self {
            heading: translate(heading_id, &language),
            message: translate(message_id, &language),
            language,
        }
    }
}

/// Fallback for every unknown path or method
pub(crate) async fn get_not_found_page(
    PreferredLanguage(language): PreferredLanguage,
) -> Response {
    let template = ErrorTemplate::new(language, "error-not-found-title", "error-not-found-message");
    (StatusCode::NOT_FOUND, template).into_response()
}

pub(crate) fn questionnaire_not_found(language: LanguageIdentifier) -> Response {
    let template = ErrorTemplate::new(
        language,
        "error-questionnaire-not-found-title",
        "error-questionnaire-not-found-message",
    );
    (StatusCode::NOT_FOUND, template).into_response()
}

pub(crate) fn internal_server_error(language: LanguageIdentifier) -> Response {
    let template = ErrorTemplate::new(language, "error-internal-title", "error-internal-message");
    (StatusCode::INTERNAL_SERVER_ERROR, template).into_response()
}

/// A handler error together with the language of the request it failed on
#[derive(Debug)]
pub(crate) struct PageError<E> {
    language: LanguageIdentifier,
    error: E,
}

impl<E> PageError<E> {
    pub(crate) fn new(language: LanguageIdentifier, error: impl Into<E>) -> Self {
        Self {
            language,
            error: error.into(),
        }
    }
}

impl<E: std::fmt::Display> IntoResponse for PageError<E> {
    fn into_response(self) -> Response {
        tracing::error!("Error handling page request: {}", self.error);
        internal_server_error(self.language)
    }
}
