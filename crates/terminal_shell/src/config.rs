//! Shell configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Brand text shown by the welcome banner and `whoami`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrandConfig {
    /// Name rendered as block-letter art.
    pub name: String,
    /// One-line tagline under the art.
    pub tagline: String,
    /// Dimmed subtitle under the tagline.
    pub subtitle: String,
}

impl Default for BrandConfig {
    fn default() -> Self {
        Self {
            name: "portfolio".to_string(),
            tagline: "Creative Developer & Digital Artist".to_string(),
            subtitle: "Building beautiful digital experiences".to_string(),
        }
    }
}

/// Runtime configuration for a [`crate::TerminalShell`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Prompt drawn before the input buffer.
    pub prompt: String,
    /// Maximum retained lines, including scrollback.
    pub scrollback: usize,
    /// Game render interval in milliseconds.
    pub frame_interval_ms: u64,
    /// Submissions held while an asynchronous command is in flight.
    pub max_queued_commands: usize,
    /// Banner brand text.
    pub brand: BrandConfig,
    /// Commands whose banner links stay clickable across every clear.
    pub persistent_commands: Vec<String>,
    /// Lines printed after the welcome message. May contain markup tokens.
    pub welcome_hint: Vec<String>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: "$ ".to_string(),
            scrollback: 1000,
            frame_interval_ms: 66,
            max_queued_commands: 8,
            brand: BrandConfig::default(),
            persistent_commands: vec!["open".to_string(), "help".to_string()],
            welcome_hint: vec![
                "→ [cmd:open] to browse projects".to_string(),
                "→ [cmd:help] for more commands".to_string(),
                "→ Press ESC or browser back button to close overlays".to_string(),
            ],
        }
    }
}

/// Invalid shell configuration.
#[derive(Debug, Error)]
pub enum ShellConfigError {
    /// Prompt is empty.
    #[error("prompt must not be empty")]
    EmptyPrompt,
    /// Scrollback cannot hold a single line.
    #[error("scrollback must be at least 1 line")]
    ZeroScrollback,
    /// Game ticks would never fire.
    #[error("frame interval must be greater than zero")]
    ZeroFrameInterval,
    /// Built-in markup patterns failed to compile.
    #[error("markup pattern failed to compile: {0}")]
    Pattern(#[from] regex::Error),
    /// JSON configuration could not be decoded.
    #[error("invalid shell configuration: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ShellConfig {
    /// Decodes a JSON configuration, filling missing fields with defaults, and validates it.
    pub fn from_json(raw: &str) -> Result<Self, ShellConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks invariants the shell relies on.
    pub fn validate(&self) -> Result<(), ShellConfigError> {
        if self.prompt.is_empty() {
            return Err(ShellConfigError::EmptyPrompt);
        }
        if self.scrollback == 0 {
            return Err(ShellConfigError::ZeroScrollback);
        }
        if self.frame_interval_ms == 0 {
            return Err(ShellConfigError::ZeroFrameInterval);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_fields_use_defaults() {
        let config = ShellConfig::from_json(r#"{ "prompt": "> ", "brand": { "name": "studio" } }"#)
            .expect("valid config");
        assert_eq!(config.prompt, "> ");
        assert_eq!(config.frame_interval_ms, 66);
        assert_eq!(config.brand.name, "studio");
        assert_eq!(config.brand.tagline, BrandConfig::default().tagline);
        assert_eq!(config.persistent_commands, vec!["open", "help"]);
    }

    #[test]
    fn rejects_unusable_values() {
        assert!(matches!(
            ShellConfig::from_json(r#"{ "prompt": "" }"#),
            Err(ShellConfigError::EmptyPrompt)
        ));
        assert!(matches!(
            ShellConfig::from_json(r#"{ "frame_interval_ms": 0 }"#),
            Err(ShellConfigError::ZeroFrameInterval)
        ));
        assert!(matches!(
            ShellConfig::from_json(r#"{ "scrollback": 0 }"#),
            Err(ShellConfigError::ZeroScrollback)
        ));
        assert!(matches!(
            ShellConfig::from_json("not json"),
            Err(ShellConfigError::Decode(_))
        ));
    }
}
