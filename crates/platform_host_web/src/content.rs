//! Content host-service adapter backed by `fetch`.

use platform_host::{ContentError, ContentFuture, ContentService};

use crate::bridge;

const DEFAULT_BASE_URL: &str = "./";

/// Loads documents relative to the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebContentService {
    base_url: String,
}

impl Default for WebContentService {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl WebContentService {
    /// Resolves relative paths against `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self { base_url }
    }

    /// Full request URL for `path`. Absolute URLs and root-relative paths pass through.
    pub fn resolve(&self, path: &str) -> String {
        if path.starts_with('/') || path.contains("://") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url, path.trim_start_matches("./"))
        }
    }
}

impl ContentService for WebContentService {
    fn fetch_text<'a>(&'a self, path: &'a str) -> ContentFuture<'a, Result<String, ContentError>> {
        Box::pin(async move {
            let url = self.resolve(path);
            let response =
                bridge::fetch_text(&url)
                    .await
                    .map_err(|message| ContentError::Transport {
                        path: path.to_string(),
                        message,
                    })?;
            match response.status {
                _ if response.is_success() => Ok(response.body),
                404 => Err(ContentError::NotFound {
                    path: path.to_string(),
                }),
                status => Err(ContentError::Http {
                    path: path.to_string(),
                    status,
                }),
            }
        })
    }
}
