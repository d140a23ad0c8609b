use crate::host::ModePolicy;
use crate::keys::ActivationModifier;
use anyhow::Context;
use serde::{Deserialize, Serialize};

pub const SETTINGS_ENV: &str = "PAGE_ANNOTATE_SETTINGS";
pub const DEFAULT_SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    /// When enabled the application initialises the logger at debug level.
    /// Defaults to `false` when the field is missing in the settings file.
    #[serde(default)]
    pub debug_logging: bool,
    /// Modifier held together with `S`/`T` to toggle the overlays.
    #[serde(default)]
    pub activation_modifier: ActivationModifier,
    /// How the two overlay modes interact when both chords are used.
    #[serde(default)]
    pub mode_policy: ModePolicy,
    /// Show toast hints when a mode turns on or off.
    #[serde(default = "default_toasts")]
    pub enable_toasts: bool,
    /// Duration of toast notifications in seconds.
    #[serde(default = "default_toast_duration")]
    pub toast_duration: f32,
    /// Paragraphs of filler text on the demo page.
    #[serde(default = "default_page_paragraphs")]
    pub page_paragraphs: usize,
}

fn default_toasts() -> bool {
    true
}

fn default_toast_duration() -> f32 {
    2.0
}

fn default_page_paragraphs() -> usize {
    24
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug_logging: false,
            activation_modifier: ActivationModifier::default(),
            mode_policy: ModePolicy::default(),
            enable_toasts: default_toasts(),
            toast_duration: default_toast_duration(),
            page_paragraphs: default_page_paragraphs(),
        }
    }
}

impl Settings {
    /// Reads settings from `path`. A missing or empty file yields defaults.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => {
                return Err(err).with_context(|| format!("failed to read settings from {path}"))
            }
        };
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(&content).with_context(|| format!("failed to parse settings in {path}"))
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// `$PAGE_ANNOTATE_SETTINGS`, falling back to `settings.json` in the
    /// working directory.
    pub fn default_path() -> String {
        std::env::var(SETTINGS_ENV).unwrap_or_else(|_| DEFAULT_SETTINGS_FILE.to_owned())
    }

    pub fn toast_duration(&self) -> f64 {
        if self.toast_duration.is_finite() && self.toast_duration > 0.0 {
            self.toast_duration as f64
        } else {
            tracing::warn!(
                "toast_duration {} is invalid; using default {}",
                self.toast_duration,
                default_toast_duration()
            );
            default_toast_duration() as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{ "activation_modifier": "ctrl" }"#).expect("parse");
        assert_eq!(settings.activation_modifier, ActivationModifier::Ctrl);
        assert_eq!(settings.mode_policy, ModePolicy::Exclusive);
        assert!(settings.enable_toasts);
        assert!(!settings.debug_logging);
    }

    #[test]
    fn invalid_toast_duration_falls_back() {
        let settings = Settings {
            toast_duration: -1.0,
            ..Settings::default()
        };
        assert_eq!(settings.toast_duration(), 2.0);
    }
}
