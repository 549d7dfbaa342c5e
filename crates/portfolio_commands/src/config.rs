//! Command set configuration.

use serde::{Deserialize, Serialize};

/// How `contact` and `imprint` present their documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentMode {
    /// Fetch the markdown document and print it with clickable links.
    #[default]
    Inline,
    /// Ask the host to show its overlay panel.
    Overlay,
}

/// Settings for [`crate::register_portfolio_commands`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioCommandsConfig {
    /// Presentation of the contact and imprint documents.
    pub document_mode: DocumentMode,
    /// Content path of the contact document.
    pub contact_path: String,
    /// Content path of the legal notice.
    pub imprint_path: String,
    /// Version reported by `uname -a`.
    pub version: String,
}

impl Default for PortfolioCommandsConfig {
    fn default() -> Self {
        Self {
            document_mode: DocumentMode::Inline,
            contact_path: "content/contact.md".to_string(),
            imprint_path: "content/impressum.md".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
