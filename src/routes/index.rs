use askama::Template;
use axum::extract::State;
use unic_langid::LanguageIdentifier;

use crate::preferred_language::PreferredLanguage;
use crate::translation::Localized;
use crate::AppState;

#[derive(Template)]
#[template(path = "home.html")]
pub(crate) struct HomeTemplate {
    language: LanguageIdentifier,
    port: u16,
}

impl Localized for HomeTemplate {
    fn language(&self) -> &LanguageIdentifier {
        &self.language
    }
}

pub(crate) async fn get_index_page(
    State(state): State<AppState>,
    PreferredLanguage(language): PreferredLanguage,
) -> HomeTemplate {
    HomeTemplate {
        language,
        port: state.configuration.listen_address.port(),
    }
}
