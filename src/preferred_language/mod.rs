//! This is based on:
//! - https://developer.mozilla.org/en-US/docs/Web/HTTP/Headers/Accept-Language
//! - https://httpwg.org/specs/rfc9110.html#field.accept-language

use std::convert::Infallible;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{self, request::Parts},
};
use unic_langid::LanguageIdentifier;

use crate::translation::{GERMAN, SUPPORTED_LOCALES};

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PreferredLanguage(pub(crate) LanguageIdentifier);

impl Default for PreferredLanguage {
    /// The au pair agency is German
    fn default() -> Self {
        Self(GERMAN)
    }
}

/// Maps "de-AT" or "en-US" to the supported locale with the same primary language
fn find_supported(identifier: &LanguageIdentifier) -> Option<LanguageIdentifier> {
    SUPPORTED_LOCALES
        .iter()
        .find(|supported| supported.language == identifier.language)
        .cloned()
}

fn try_from_header(request: &Parts) -> Option<LanguageIdentifier> {
    let value = request.headers.get(http::header::ACCEPT_LANGUAGE)?;

    let value = value
        .to_str()
        .inspect_err(|error| {
            tracing::warn!("Expected accept language header to contain a string value: {error}")
        })
        .ok()?;

    let mut accepted_language: Option<(LanguageIdentifier, f32)> = None;

    for value in value.split(',') {
        let mut parts = value.trim().split(';').map(str::trim);
        let Some(language) = parts.next().filter(|language| !language.is_empty()) else {
            tracing::warn!("Expected accept language header to contain a non-empty value");
            continue;
        };

        let quality: f32 = match parts
            .next()
            .and_then(|value| value.strip_prefix("q="))
            .map(str::parse::<f32>)
            .transpose()
        {
            Ok(quality) => quality.unwrap_or(1.0),
            Err(error) => {
                tracing::warn!(
                    "Expected accept language header to contain a quality value for {language}: {error}"
                );
                continue;
            }
        };

        // Wildcards and garbage are skipped, we fall back to the default anyway
        let Ok(identifier) = language.parse::<LanguageIdentifier>() else {
            continue;
        };

        let Some(identifier) = find_supported(&identifier) else {
            continue;
        };

        accepted_language = match accepted_language {
            Some((_, accepted_quality)) if accepted_quality >= quality => continue,
            _ => Some((identifier, quality)),
        }
    }

    accepted_language.map(|(language, _)| language)
}

#[async_trait]
impl<S> FromRequestParts<S> for PreferredLanguage
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(try_from_header(parts)
            .map(PreferredLanguage)
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;
    use crate::translation::ENGLISH;

    fn parts(accept_language: Option<&str>) -> Parts {
        let mut builder = Request::builder();
        if let Some(value) = accept_language {
            builder = builder.header(http::header::ACCEPT_LANGUAGE, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn missing_header_has_no_preference() {
        assert_eq!(try_from_header(&parts(None)), None);
    }

    #[test]
    fn picks_highest_quality_supported_language() {
        let preferred = try_from_header(&parts(Some("fr;q=1.0, en;q=0.8, de;q=0.5")));
        assert_eq!(preferred, Some(ENGLISH));

        let preferred = try_from_header(&parts(Some("en;q=0.3, de")));
        assert_eq!(preferred, Some(GERMAN));
    }

    #[test]
    fn regional_variants_match_primary_language() {
        assert_eq!(try_from_header(&parts(Some("en-US"))), Some(ENGLISH));
        assert_eq!(try_from_header(&parts(Some("de-AT,fr;q=0.9"))), Some(GERMAN));
    }

    #[test]
    fn unsupported_or_malformed_values_are_ignored() {
        assert_eq!(try_from_header(&parts(Some("fr, es;q=0.9"))), None);
        assert_eq!(try_from_header(&parts(Some("en;q=high"))), None);
        assert_eq!(try_from_header(&parts(Some(",,*"))), None);
    }

    #[tokio::test]
    async fn extractor_defaults_to_german() {
        let mut request_parts = parts(Some("fr"));
        let PreferredLanguage(language) =
            PreferredLanguage::from_request_parts(&mut request_parts, &())
                .await
                .unwrap();
        assert_eq!(language, GERMAN);
    }
}
