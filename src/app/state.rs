//! Defines the application's state.

use super::i18n::{Language, Translations};
use super::settings::Settings;

/// Events consumed by the console event loop.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Event {
    Install,
    ToggleLanguage,
    /// Advances the progress animation by one step.
    Tick,
    Exit,
    NoOp, // Unrecognised input.
}

/// Progress indicator: `value` moves toward `target`, both bounded by `maximum`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    value: u32,
    target: u32,
    maximum: u32,
}

impl Default for Progress {
    fn default() -> Self {
        Progress { value: 0, target: 0, maximum: 100 }
    }
}

impl Progress {
    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn maximum(&self) -> u32 {
        self.maximum
    }

    /// Empties the bar and changes its scale.
    pub fn reset(&mut self, maximum: u32) {
        self.maximum = maximum.max(1);
        self.value = 0;
        self.target = 0;
    }

    /// Jumps straight to `value`.
    pub fn set(&mut self, value: u32) {
        self.value = value.min(self.maximum);
        self.target = self.value;
    }

    /// Sets where the animation should stop.
    pub fn aim(&mut self, target: u32) {
        self.target = target.min(self.maximum);
    }

    /// Moves one unit toward the target. Returns `true` while steps remain.
    pub fn step(&mut self) -> bool {
        if self.value < self.target {
            self.value += 1;
        } else if self.value > self.target {
            self.value -= 1;
        }
        self.value != self.target
    }

    pub fn is_settled(&self) -> bool {
        self.value == self.target
    }

    pub fn percent(&self) -> u32 {
        self.value * 100 / self.maximum
    }
}

/// Holds the application's runtime state. Owned by the event loop thread.
pub struct AppState {
    pub settings: Settings,
    pub language: Language,
    pub translations: Translations,
    pub progress: Progress,
    pub feedback: Option<Feedback>,
    /// Set once an exit was requested while the progress animation was running.
    pub exit_pending: bool,
    pub ticker_shutdown_tx: Option<crossbeam_channel::Sender<()>>,
}

/// The last message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub text: String,
    pub is_error: bool,
}

impl AppState {
    pub fn new(settings: Settings, translations: Translations) -> Self {
        AppState {
            language: settings.language,
            settings,
            translations,
            progress: Progress::default(),
            feedback: None,
            exit_pending: false,
            ticker_shutdown_tx: None,
        }
    }

    /// Localized text for `key` in the current language.
    pub fn text(&self, key: &str) -> String {
        self.translations.get(key, self.language)
    }

    pub fn toggle_language(&mut self) {
        self.language = self.language.toggle();
    }

    pub fn show_feedback(&mut self, text: String, is_error: bool) {
        self.feedback = Some(Feedback { text, is_error });
    }
}
