//! Language selection and the translation table.

use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

/// Languages the UI can be shown in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    Turkish,
    English,
}

impl Language {
    /// Parses a language code, falling back to the default language.
    pub fn from_code(code: &str) -> Self {
        match code.to_lowercase().as_str() {
            "en" | "english" => Language::English,
            "tr" | "turkish" | "türkçe" => Language::Turkish,
            _ => Language::default(),
        }
    }

    /// Picks the startup language from the system locale.
    pub fn detect() -> Self {
        match sys_locale::get_locale() {
            Some(locale) if locale.to_lowercase().starts_with("en") => Language::English,
            _ => Language::default(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::Turkish => "tr",
            Language::English => "en",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Language::Turkish => "Türkçe",
            Language::English => "English",
        }
    }

    /// The other language, used by the language toggle.
    pub fn toggle(&self) -> Self {
        match self {
            Language::Turkish => Language::English,
            Language::English => Language::Turkish,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// message key -> language code -> text
#[derive(Deserialize, Default, Debug)]
#[serde(transparent)]
pub struct Translations {
    map: HashMap<String, HashMap<String, String>>,
}

impl Translations {
    /// Looks up `key` in `lang`, then in the other language, then gives back the key.
    pub fn get(&self, key: &str, lang: Language) -> String {
        let entry = match self.map.get(key) {
            Some(entry) => entry,
            None => {
                log::warn!("Translation key not found: {}", key);
                return key.to_string();
            }
        };
        entry
            .get(lang.code())
            .or_else(|| entry.get(lang.toggle().code()))
            .cloned()
            .unwrap_or_else(|| {
                log::warn!("Translation key {} has no {} text", key, lang.code());
                key.to_string()
            })
    }

    /// Like [`get`](Self::get), substituting `{name}` placeholders.
    pub fn format(&self, key: &str, lang: Language, args: &[(&str, &str)]) -> String {
        args.iter().fold(self.get(key, lang), |text, (name, value)| {
            text.replace(&format!("{{{}}}", name), value)
        })
    }

    fn merge(&mut self, other: Translations) {
        for (key, texts) in other.map {
            self.map.entry(key).or_default().extend(texts);
        }
    }
}

/// The table compiled into the binary.
pub fn builtin() -> Translations {
    serde_json::from_str(include_str!("../../res/locales/messages.json")).unwrap_or_else(|e| {
        log::error!("Failed to parse built-in translations: {}", e);
        Translations::default()
    })
}

/// Loads the built-in table and overlays the optional file at `path` on top of it.
///
/// A missing or malformed file leaves the built-in table untouched.
pub fn load(path: &Path) -> Translations {
    let mut translations = builtin();

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            log::debug!("No translation file at {}: {}", path.display(), e);
            return translations;
        }
    };

    match serde_json::from_str::<Translations>(&content) {
        Ok(overrides) => {
            log::info!("Loaded translations from {}", path.display());
            translations.merge(overrides);
        }
        Err(e) => log::warn!("Ignoring malformed translation file {}: {}", path.display(), e),
    }
    translations
}
