//! Localized user-facing messages
//!
//! Messages are Fluent resources compiled into the crate. A [`Localizer`] is
//! created per session, for the locale negotiated from the user's preferences.

use fluent::{FluentArgs, FluentBundle, FluentResource};
use fluent_langneg::{convert_vec_str_to_langids_lossy, negotiate_languages, NegotiationStrategy};
use thiserror::Error;
use unic_langid::LanguageIdentifier;

const EN_US: &str = "en-US";

const RESOURCES: &[(&str, &str)] = &[
    (EN_US, include_str!("../locales/en-US/booking.ftl")),
    ("de-DE", include_str!("../locales/de-DE/booking.ftl")),
];

/// Errors raised while building a message bundle
#[derive(Debug, Error)]
pub enum LocalizationError {
    #[error("Unsupported locale: {0}")]
    UnsupportedLocale(String),

    #[error("Malformed message resource for {locale}: {details}")]
    MalformedResource { locale: String, details: String },
}

/// Renders message ids into text for a single locale
pub struct Localizer {
    locale: LanguageIdentifier,
    bundle: FluentBundle<FluentResource>,
}

impl std::fmt::Debug for Localizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Localizer")
            .field("locale", &self.locale.to_string())
            .finish()
    }
}

impl Localizer {
    /// Locales with a compiled-in message resource
    pub fn available_locales() -> Vec<LanguageIdentifier> {
        RESOURCES
            .iter()
            .filter_map(|(tag, _)| tag.parse().ok())
            .collect()
    }

    /// Builds a localizer for an exact, available locale
    pub fn new(locale: &LanguageIdentifier) -> Result<Self, LocalizationError> {
        let tag = locale.to_string();
        let source = RESOURCES
            .iter()
            .find(|(candidate, _)| *candidate == tag)
            .map(|(_, source)| *source)
            .ok_or_else(|| LocalizationError::UnsupportedLocale(tag.clone()))?;

        let resource = FluentResource::try_new(source.to_string()).map_err(|(_, errors)| {
            LocalizationError::MalformedResource {
                locale: tag.clone(),
                details: format!("{:?}", errors),
            }
        })?;

        let mut bundle = FluentBundle::new(vec![locale.clone()]);
        bundle.set_use_isolating(false);
        bundle
            .add_resource(resource)
            .map_err(|errors| LocalizationError::MalformedResource {
                locale: tag,
                details: format!("{:?}", errors),
            })?;

        Ok(Self {
            locale: locale.clone(),
            bundle,
        })
    }

    /// Picks the best available locale for the requested tags
    ///
    /// Unparseable tags are skipped. Falls back to `en-US` when nothing matches.
    pub fn negotiate<S: AsRef<str>>(requested: &[S]) -> Result<Self, LocalizationError> {
        let requested = convert_vec_str_to_langids_lossy(requested.iter().map(|s| s.as_ref()));
        let available = Self::available_locales();
        let default: LanguageIdentifier = EN_US
            .parse()
            .map_err(|_| LocalizationError::UnsupportedLocale(EN_US.to_string()))?;

        let chosen = negotiate_languages(
            &requested,
            &available,
            Some(&default),
            NegotiationStrategy::Lookup,
        )
        .first()
        .map(|locale| (*locale).clone())
        .unwrap_or(default);

        tracing::debug!(locale = %chosen, "negotiated message locale");
        Self::new(&chosen)
    }

    /// Returns the locale this localizer renders
    pub fn locale(&self) -> &LanguageIdentifier {
        &self.locale
    }

    /// Renders a message; unknown ids render as the id itself
    pub fn format(&self, id: &str, args: Option<&FluentArgs>) -> String {
        let Some(pattern) = self.bundle.get_message(id).and_then(|m| m.value()) else {
            tracing::debug!(message_id = id, locale = %self.locale, "missing message");
            return id.to_string();
        };

        let mut errors = Vec::new();
        let text = self.bundle.format_pattern(pattern, args, &mut errors);
        if !errors.is_empty() {
            tracing::debug!(message_id = id, ?errors, "message formatted with errors");
        }
        text.into_owned()
    }
}
