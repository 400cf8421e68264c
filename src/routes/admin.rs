use std::sync::Arc;

use askama::Template;
use axum::extract::State;
use time::OffsetDateTime;
use unic_langid::LanguageIdentifier;

use crate::database::{MultiRowQueryError, StatementError};
use crate::preferred_language::PreferredLanguage;
use crate::questionnaire::{create_invitation_link, format_date, format_machine_readable};
use crate::translation::{translate, Localized};
use crate::AppState;

use super::error::PageError;

/// How many invitations the dashboard shows
pub(crate) const RECENT_INVITATIONS: u32 = 10;

/// An invitation prepared for display
pub(crate) struct Invitation {
    name: String,
    link: String,
    created_human_readable: String,
    created_machine_readable: String,
}

#[derive(Template)]
#[template(path = "admin.html")]
pub(crate) struct AdminTemplate {
    language: LanguageIdentifier,
    port: u16,
    invitations: Vec<Invitation>,
}

impl Localized for AdminTemplate {
    fn language(&self) -> &LanguageIdentifier {
        &self.language
    }
}

#[derive(thiserror::Error, Debug)]
pub(crate) enum GetAdminPageError {
    #[error("Error listing recent invitations: {0}")]
    ListError(#[from] MultiRowQueryError),
    #[error("Error formatting date: {0}")]
    FormatError(#[from] time::error::Format),
}

async fn get_recent_invitations(
    state: &AppState,
    language: &LanguageIdentifier,
) -> Result<Vec<Invitation>, GetAdminPageError> {
    let summaries = state.database.list_recent(RECENT_INVITATIONS).await?;

    let unknown_name = translate("admin-unknown-name", language);
    summaries
        .into_iter()
        .map(|summary| -> Result<Invitation, GetAdminPageError> {
            Ok(Invitation {
                name: summary.display_name(&unknown_name),
                link: create_invitation_link(&state.configuration.server_url, &summary.token),
                created_human_readable: format_date(summary.created_at)?,
                created_machine_readable: format_machine_readable(summary.created_at)?,
            })
        })
        .collect()
}

pub(crate) async fn get_admin_page(
    State(state): State<AppState>,
    PreferredLanguage(language): PreferredLanguage,
) -> Result<AdminTemplate, PageError<GetAdminPageError>> {
    let invitations = match get_recent_invitations(&state, &language).await {
        Ok(invitations) => invitations,
        Err(error) => return Err(PageError::new(language, error)),
    };

    Ok(AdminTemplate {
        language,
        port: state.configuration.listen_address.port(),
        invitations,
    })
}

#[derive(Template)]
#[template(path = "generated.html")]
pub(crate) struct GeneratedTemplate {
    language: LanguageIdentifier,
    token: Arc<str>,
    invitation_link: String,
    created: String,
}

impl Localized for GeneratedTemplate {
    fn language(&self) -> &LanguageIdentifier {
        &self.language
    }
}

#[derive(thiserror::Error, Debug)]
pub(crate) enum GenerateLinkError {
    #[error("Error creating invitation: {0}")]
    CreateError(#[from] StatementError),
    #[error("Error formatting date: {0}")]
    FormatError(#[from] time::error::Format),
}

/// Returns the new token and when it was created
async fn create_invitation(state: &AppState) -> Result<(Arc<str>, String), GenerateLinkError> {
    let token = state.database.create_invitation().await?;
    let created = format_date(OffsetDateTime::now_utc())?;
    Ok((token, created))
}

/// Handler for the dashboard form. The request body is ignored.
pub(crate) async fn generate_link(
    State(state): State<AppState>,
    PreferredLanguage(language): PreferredLanguage,
) -> Result<GeneratedTemplate, PageError<GenerateLinkError>> {
    let (token, created) = match create_invitation(&state).await {
        Ok(invitation) => invitation,
        Err(error) => return Err(PageError::new(language, error)),
    };
    let invitation_link = create_invitation_link(&state.configuration.server_url, &token);

    tracing::info!(%invitation_link, "Generated invitation link");

    Ok(GeneratedTemplate {
        language,
        token,
        invitation_link,
        created,
    })
}
