//! Site-wide text: page metadata, brand, contact details and the legal notice.

use serde::{Deserialize, Serialize};
use terminal_shell::BrandConfig;

const INSTAGRAM_BASE_URL: &str = "https://instagram.com/";

/// Contents of `content/site-info.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteInfo {
    /// Document title and description.
    pub meta: SiteMeta,
    /// Brand text for the banner and `whoami`.
    pub brand: BrandConfig,
    /// Contact panel.
    pub contact: ContactInfo,
    /// Legal notice panel.
    pub imprint: ImprintInfo,
}

/// Page metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteMeta {
    /// `<title>` text.
    pub title: String,
    /// `<meta name="description">` content.
    pub description: String,
}

impl Default for SiteMeta {
    fn default() -> Self {
        Self {
            title: "Portfolio".to_string(),
            description: "Portfolio of a creative developer and digital artist.".to_string(),
        }
    }
}

/// Contact details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactInfo {
    /// Contact address.
    pub email: String,
    /// Instagram handle, with or without a leading `@`.
    pub instagram: String,
    /// Short introduction shown above the details.
    pub blurb: String,
}

impl ContactInfo {
    /// Profile URL for the Instagram handle, if one is set.
    pub fn instagram_url(&self) -> Option<String> {
        let handle = self.instagram.trim().trim_start_matches('@');
        (!handle.is_empty()).then(|| format!("{INSTAGRAM_BASE_URL}{handle}"))
    }
}

/// Legal notice (Impressum).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImprintInfo {
    /// Responsible person or company.
    pub name: String,
    /// Postal address; may span several lines.
    pub address: String,
    /// Contact address.
    pub email: String,
    /// Liability disclaimer.
    pub liability: String,
    /// Copyright line.
    pub copyright: String,
    /// Date of the last revision.
    #[serde(alias = "lastUpdated")]
    pub last_updated: String,
}
