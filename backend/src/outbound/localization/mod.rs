//! Resource table localizer.
//!
//! Message templates are keyed by culture and then by message key, loaded
//! from a JSON document shaped like `resources/shared_resource.json`.
//! Lookups fall back to `en-US` and finally to the key itself.

use std::collections::HashMap;

use tracing::debug;

use crate::domain::FALLBACK_LOCALE;
use crate::domain::ports::{Localizer, format_positional};

const BUNDLED_RESOURCES: &str = include_str!("../../../resources/shared_resource.json");

type Table = HashMap<String, String>;

/// Errors raised while loading a resource table.
#[derive(Debug, thiserror::Error)]
pub enum ResourceTableError {
    #[error("resource table is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// [`Localizer`] backed by an in-memory resource table.
#[derive(Debug, Clone)]
pub struct ResourceLocalizer {
    cultures: HashMap<String, Table>,
    culture: String,
}

impl ResourceLocalizer {
    /// Localizer over the resource table compiled into the binary.
    ///
    /// # Errors
    /// Fails only if the bundled table is malformed.
    pub fn bundled(culture: &str) -> Result<Self, ResourceTableError> {
        Self::from_json(BUNDLED_RESOURCES, culture)
    }

    /// Parse a `{ culture: { key: template } }` document.
    ///
    /// # Errors
    /// Returns [`ResourceTableError::Parse`] for malformed input.
    pub fn from_json(raw: &str, culture: &str) -> Result<Self, ResourceTableError> {
        let cultures: HashMap<String, Table> = serde_json::from_str(raw)?;
        let culture = match culture.trim() {
            "" => FALLBACK_LOCALE.to_owned(),
            requested => requested.to_owned(),
        };
        if !cultures.contains_key(&culture) {
            debug!(culture = %culture, "culture missing from resource table; using fallback");
        }
        Ok(Self { cultures, culture })
    }

    /// Culture used for lookups.
    pub fn culture(&self) -> &str {
        &self.culture
    }

    fn template(&self, key: &str) -> Option<&str> {
        [self.culture.as_str(), FALLBACK_LOCALE]
            .into_iter()
            .find_map(|culture| self.cultures.get(culture)?.get(key))
            .map(String::as_str)
    }
}

impl Localizer for ResourceLocalizer {
    fn localize(&self, key: &str, args: &[String]) -> String {
        match self.template(key) {
            Some(template) => format_positional(template, args),
            None => {
                debug!(key, "no resource for message key");
                key.to_owned()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::messages;
    use rstest::rstest;

    const TABLE: &str = r#"{
        "en-US": { "Greeting": "Hello {0}", "Farewell": "Bye" },
        "da-DK": { "Greeting": "Hej {0}" }
    }"#;

    #[rstest]
    #[case("da-DK", "Greeting", "Hej Ada")]
    #[case("da-DK", "Farewell", "Bye")]
    #[case("en-US", "Greeting", "Hello Ada")]
    #[case("fr-FR", "Greeting", "Hello Ada")]
    #[case("", "Greeting", "Hello Ada")]
    #[case("da-DK", "Unknown", "Unknown")]
    fn lookups_fall_back_to_english_then_key(
        #[case] culture: &str,
        #[case] key: &str,
        #[case] expected: &str,
    ) {
        let localizer = ResourceLocalizer::from_json(TABLE, culture).expect("table");
        assert_eq!(localizer.localize(key, &["Ada".to_owned()]), expected);
    }

    #[rstest]
    fn blank_culture_selects_fallback() {
        let localizer = ResourceLocalizer::from_json(TABLE, "  ").expect("table");
        assert_eq!(localizer.culture(), FALLBACK_LOCALE);
    }

    #[rstest]
    fn malformed_tables_are_rejected() {
        assert!(ResourceLocalizer::from_json("{ nope", "en-US").is_err());
    }

    #[rstest]
    #[case(messages::USER_NOT_FOUND)]
    #[case(messages::CONNECTION_STRING_ALREADY_EXIST)]
    #[case(messages::INVALID_SECURITY_CODE)]
    #[case(messages::DEVICE_USER_COULD_NOT_BE_OBTAINED)]
    #[case(messages::YOU_NEED_TO_BUY_MORE_LICENSES)]
    fn bundled_table_covers_service_messages(#[case] key: &str) {
        let localizer = ResourceLocalizer::bundled(FALLBACK_LOCALE).expect("bundled table");
        assert_ne!(localizer.text(key), key);
    }

    #[rstest]
    fn bundled_table_formats_arguments() {
        let localizer = ResourceLocalizer::bundled(FALLBACK_LOCALE).expect("bundled table");
        let text = localizer.localize(
            messages::PASSWORD_HAS_BEEN_RESET,
            &["admin@example.com".to_owned()],
        );
        assert_eq!(text, "Password for admin@example.com has been reset");
    }
}
