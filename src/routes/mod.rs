use axum::{
    routing::{any, get, post},
    Router,
};

use crate::AppState;

pub(crate) mod admin;
pub(crate) mod api;
pub(crate) mod error;
pub(crate) mod index;
pub(crate) mod questionnaire;

/// Every route answers unknown methods with the not found page instead of 405
pub(crate) fn create_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(index::get_index_page).fallback(error::get_not_found_page),
        )
        .route(
            "/admin",
            get(admin::get_admin_page).fallback(error::get_not_found_page),
        )
        .route(
            "/questionnaire/*path",
            get(questionnaire::get_questionnaire_page).fallback(error::get_not_found_page),
        )
        .route(
            "/generate-link",
            post(admin::generate_link).fallback(error::get_not_found_page),
        )
        .route("/favicon.ico", any(error::get_not_found_page))
        .route(
            "/api/questionnaire/:token",
            get(api::get_questionnaire).fallback(error::get_not_found_page),
        )
        .route(
            "/api/admin/overview",
            get(api::get_overview).fallback(error::get_not_found_page),
        )
        .route(
            "/api/admin/generate-link",
            post(api::generate_link).fallback(error::get_not_found_page),
        )
        .fallback(error::get_not_found_page)
}
