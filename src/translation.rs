use fluent_templates::Loader;
use unic_langid::{langid, LanguageIdentifier};

fluent_templates::static_loader! {
    static LOCALES = {
        locales: "./translations",
        fallback_language: "de",
    };
}

pub(crate) const ENGLISH: LanguageIdentifier = langid!("en");
pub(crate) const GERMAN: LanguageIdentifier = langid!("de");

pub(crate) const SUPPORTED_LOCALES: [LanguageIdentifier; 2] = [GERMAN, ENGLISH];
/// Convenience function
pub(crate) fn translate(text_id: &str, language: &LanguageIdentifier) -> String {
    LOCALES.lookup(language, text_id)
}

/// Gives templates access to translations with `self.t("message-id")`
pub(crate) trait Localized {
    fn language(&self) -> &LanguageIdentifier;

    fn t(&self, text_id: &str) -> String {
        translate(text_id, self.language())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_into_both_languages() {
        assert_eq!(translate("back-to-admin", &ENGLISH), "Back to the admin area");
        assert_eq!(
            translate("back-to-admin", &GERMAN),
            "Zurück zum Admin-Bereich"
        );
    }
}
