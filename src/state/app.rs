//! App preferences: theme, language, and sider collapse.
//!
//! Loaded once from `Storage` when the store is created; stored fields are
//! merged over defaults so older records missing a field still load. Every
//! effective setter call rewrites the whole record.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::storage::{Storage, load_json, save_json};

/// Storage key for [`AppPreferences`].
pub const APP_STORAGE_KEY: &str = "appStorage";

pub const DEFAULT_LANGUAGE: &str = "zh-CN";

/// Color theme selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Follow the operating system preference.
    Auto,
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown theme `{0}`: expected auto, light, or dark")]
pub struct ParseThemeError(pub String);

impl FromStr for Theme {
    type Err = ParseThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(ParseThemeError(s.to_owned())),
        }
    }
}

/// User-visible app settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppPreferences {
    pub sider_collapsed: bool,
    pub theme: Theme,
    pub language: String,
}

impl Default for AppPreferences {
    fn default() -> Self {
        Self { sider_collapsed: false, theme: Theme::Light, language: DEFAULT_LANGUAGE.to_owned() }
    }
}

impl AppPreferences {
    /// Effective dark mode: `Auto` follows the OS preference.
    #[must_use]
    pub fn is_dark(&self, os_prefers_dark: bool) -> bool {
        match self.theme {
            Theme::Auto => os_prefers_dark,
            Theme::Dark => true,
            Theme::Light => false,
        }
    }
}

pub struct PreferenceStore {
    storage: Arc<dyn Storage>,
    state: AppPreferences,
}

impl PreferenceStore {
    /// Create the store from persisted state, or defaults when absent.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        let state = load_json::<AppPreferences>(storage.as_ref(), APP_STORAGE_KEY).unwrap_or_default();
        Self { storage, state }
    }

    #[must_use]
    pub fn state(&self) -> &AppPreferences {
        &self.state
    }

    pub fn set_sider_collapsed(&mut self, collapsed: bool) {
        self.state.sider_collapsed = collapsed;
        self.record_state();
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.state.theme = theme;
        self.record_state();
    }

    /// Set the UI language; an unchanged value writes nothing.
    pub fn set_language(&mut self, language: &str) {
        if self.state.language == language {
            return;
        }
        self.state.language = language.to_owned();
        self.record_state();
    }

    fn record_state(&self) {
        debug!(key = APP_STORAGE_KEY, "persisting app preferences");
        save_json(self.storage.as_ref(), APP_STORAGE_KEY, &self.state);
    }
}
