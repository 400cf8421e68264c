use std::sync::Arc;

use axum::http::Uri;
use time::{macros::format_description, OffsetDateTime};

/// A single issued invitation. The name fields are reserved for the questionnaire
/// itself and are never filled in yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct QuestionnaireRecord {
    pub(crate) id: Arc<str>,
    pub(crate) token: Arc<str>,
    pub(crate) first_name: Option<Arc<str>>,
    pub(crate) last_name: Option<Arc<str>>,
    pub(crate) created_at: OffsetDateTime,
}

/// Row of the admin overview
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InvitationSummary {
    pub(crate) token: Arc<str>,
    pub(crate) first_name: Option<Arc<str>>,
    pub(crate) last_name: Option<Arc<str>>,
    pub(crate) created_at: OffsetDateTime,
}

impl InvitationSummary {
    /// "first last", with `unknown` standing in for a missing first name
    pub(crate) fn display_name(&self, unknown: &str) -> String {
        let first_name = self.first_name.as_deref().unwrap_or(unknown);
        match self.last_name.as_deref() {
            Some(last_name) => format!("{first_name} {last_name}"),
            None => first_name.to_owned(),
        }
    }
}

pub(crate) fn create_invitation_link(server_url: &Uri, token: &str) -> String {
    let server_url = server_url.to_string();
    format!(
        "{}/questionnaire/{}",
        server_url.trim_end_matches('/'),
        token
    )
}

pub(crate) fn format_date(date: OffsetDateTime) -> Result<String, time::error::Format> {
    date.format(format_description!(
        "[day].[month].[year] [hour]:[minute]:[second]"
    ))
}

/// Format for the `datetime` attribute of `<time>` elements and the JSON API
pub(crate) fn format_machine_readable(
    date: OffsetDateTime,
) -> Result<String, time::error::Format> {
    date.format(&time::format_description::well_known::Rfc3339)
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    fn summary(first_name: Option<&str>, last_name: Option<&str>) -> InvitationSummary {
        InvitationSummary {
            token: Arc::from("3f0c5d1e-8a4b-4c2d-9e6f-1a2b3c4d5e6f"),
            first_name: first_name.map(Arc::from),
            last_name: last_name.map(Arc::from),
            created_at: datetime!(2024-03-01 09:05:07 UTC),
        }
    }

    #[test]
    fn invitation_link_points_at_questionnaire_page() {
        let server_url: Uri = "http://localhost:8888".parse().unwrap();
        assert_eq!(
            create_invitation_link(&server_url, "abc"),
            "http://localhost:8888/questionnaire/abc"
        );

        let server_url: Uri = "https://aupair.example.org/".parse().unwrap();
        assert_eq!(
            create_invitation_link(&server_url, "abc"),
            "https://aupair.example.org/questionnaire/abc"
        );
    }

    #[test]
    fn dates_use_german_notation() {
        assert_eq!(
            format_date(datetime!(2024-03-01 09:05:07 UTC)).unwrap(),
            "01.03.2024 09:05:07"
        );
    }

    #[test]
    fn machine_readable_dates_are_rfc3339() {
        assert_eq!(
            format_machine_readable(datetime!(2024-03-01 09:05:07 UTC)).unwrap(),
            "2024-03-01T09:05:07Z"
        );
    }

    #[test]
    fn display_name_falls_back_for_missing_names() {
        assert_eq!(summary(None, None).display_name("Unbekannt"), "Unbekannt");
        assert_eq!(
            summary(Some("Ana"), Some("Silva")).display_name("Unbekannt"),
            "Ana Silva"
        );
        assert_eq!(summary(None, Some("Silva")).display_name("?"), "? Silva");
    }
}
