// SPDX-License-Identifier: MPL-2.0
use crate::config::Config;
use fluent_bundle::{FluentArgs, FluentBundle, FluentResource, FluentValue};
use rust_embed::RustEmbed;
use std::collections::HashMap;
use std::fmt;
use unic_langid::LanguageIdentifier;

#[derive(RustEmbed)]
#[folder = "assets/i18n/"]
struct Asset;

const DEFAULT_LOCALE: &str = "en-US";

fn default_locale() -> LanguageIdentifier {
    DEFAULT_LOCALE.parse().unwrap_or_default()
}

pub struct I18n {
    bundles: HashMap<LanguageIdentifier, FluentBundle<FluentResource>>,
    pub available_locales: Vec<LanguageIdentifier>,
    current_locale: LanguageIdentifier,
}

impl fmt::Debug for I18n {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("I18n")
            .field("current_locale", &self.current_locale)
            .field("available_locales", &self.available_locales)
            .finish()
    }
}

impl Default for I18n {
    fn default() -> Self {
        Self::new(None, &Config::default())
    }
}

impl I18n {
    pub fn new(cli_lang: Option<String>, config: &Config) -> Self {
        let mut bundles = HashMap::new();
        let mut available_locales = Vec::new();

        for file in Asset::iter() {
            let filename = file.as_ref();
            let Some(locale) = filename
                .strip_suffix(".ftl")
                .and_then(|stem| stem.parse::<LanguageIdentifier>().ok())
            else {
                continue;
            };
            let Some(content) = Asset::get(filename) else {
                continue;
            };
            match load_bundle(&locale, &content.data) {
                Some(bundle) => {
                    bundles.insert(locale.clone(), bundle);
                    available_locales.push(locale);
                }
                None => log::warn!("skipping invalid translation file {filename}"),
            }
        }
        available_locales.sort_by_key(ToString::to_string);

        let current_locale =
            resolve_locale(cli_lang, config, &available_locales).unwrap_or_else(default_locale);

        Self {
            bundles,
            available_locales,
            current_locale,
        }
    }

    #[must_use]
    pub fn current_locale(&self) -> &LanguageIdentifier {
        &self.current_locale
    }

    pub fn tr(&self, key: &str) -> String {
        self.format(key, None)
    }

    /// Translates `key` with named string arguments.
    pub fn tr_args(&self, key: &str, args: &[(&str, &str)]) -> String {
        let mut fluent_args = FluentArgs::new();
        for (name, value) in args {
            fluent_args.set(*name, FluentValue::from(*value));
        }
        self.format(key, Some(&fluent_args))
    }

    fn format(&self, key: &str, args: Option<&FluentArgs>) -> String {
        let bundle = self
            .bundles
            .get(&self.current_locale)
            .or_else(|| self.bundles.get(&default_locale()));
        if let Some(bundle) = bundle {
            if let Some(pattern) = bundle.get_message(key).and_then(|msg| msg.value()) {
                let mut errors = vec![];
                let value = bundle.format_pattern(pattern, args, &mut errors);
                if errors.is_empty() {
                    return value.to_string();
                }
            }
        }
        format!("MISSING: {}", key)
    }
}

fn load_bundle(locale: &LanguageIdentifier, data: &[u8]) -> Option<FluentBundle<FluentResource>> {
    let source = String::from_utf8_lossy(data).to_string();
    let resource = FluentResource::try_new(source).ok()?;
    let mut bundle = FluentBundle::new(vec![locale.clone()]);
    // Unicode isolation marks would show up around error messages.
    bundle.set_use_isolating(false);
    bundle.add_resource(resource).ok()?;
    Some(bundle)
}

fn resolve_locale(
    cli_lang: Option<String>,
    config: &Config,
    available: &[LanguageIdentifier],
) -> Option<LanguageIdentifier> {
    let candidates = [
        cli_lang,
        config.general.language.clone(),
        sys_locale::get_locale(),
    ];
    candidates
        .into_iter()
        .flatten()
        .filter_map(|raw| raw.parse::<LanguageIdentifier>().ok())
        .find_map(|lang| match_available(&lang, available))
}

/// Exact match first, then same language (e.g. `fr-CA` → `fr`).
fn match_available(
    lang: &LanguageIdentifier,
    available: &[LanguageIdentifier],
) -> Option<LanguageIdentifier> {
    if available.contains(lang) {
        return Some(lang.clone());
    }
    available
        .iter()
        .find(|candidate| candidate.language == lang.language)
        .cloned()
}
