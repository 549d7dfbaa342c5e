use std::rc::Rc;

use platform_host::{
    CachingContentService, ContentError, ContentFuture, ContentService, ExternalUrlFuture,
    ExternalUrlService, GuardedExternalUrlService, NoopContentService, NoopExternalUrlService,
};

use crate::{WebContentService, WebExternalUrlService};

#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Compile-time selected host strategy for `platform_host_web` adapters.
pub enum HostStrategy {
    /// Browser-backed adapters from `platform_host_web`.
    Browser,
    /// No-op adapters for offline demos and native builds of the UI crates.
    Offline,
}

/// Returns the compile-time selected host strategy for the active build.
pub const fn selected_host_strategy() -> HostStrategy {
    #[cfg(feature = "offline-host")]
    {
        HostStrategy::Offline
    }

    #[cfg(not(feature = "offline-host"))]
    {
        HostStrategy::Browser
    }
}

/// Returns the selected host strategy as a stable string token.
pub fn host_strategy_name() -> &'static str {
    match selected_host_strategy() {
        HostStrategy::Browser => "browser",
        HostStrategy::Offline => "offline",
    }
}

/// Adapter enum that erases the concrete external URL backend behind [`ExternalUrlService`].
#[derive(Debug, Clone)]
pub enum ExternalUrlServiceAdapter {
    /// Scheme-guarded `window.open`.
    Browser(GuardedExternalUrlService<WebExternalUrlService>),
    /// Accepts and ignores every URL.
    Offline(NoopExternalUrlService),
}

impl ExternalUrlService for ExternalUrlServiceAdapter {
    fn open_url<'a>(&'a self, url: &'a str) -> ExternalUrlFuture<'a, Result<(), String>> {
        match self {
            Self::Browser(service) => service.open_url(url),
            Self::Offline(service) => service.open_url(url),
        }
    }
}

/// Adapter enum that erases the concrete content backend behind [`ContentService`].
#[derive(Debug, Clone)]
pub enum ContentServiceAdapter {
    /// Cached `fetch` relative to the page.
    Browser(CachingContentService<WebContentService>),
    /// Fails every request with [`ContentError::Unavailable`].
    Offline(NoopContentService),
}

impl ContentService for ContentServiceAdapter {
    fn fetch_text<'a>(&'a self, path: &'a str) -> ContentFuture<'a, Result<String, ContentError>> {
        match self {
            Self::Browser(service) => service.fetch_text(path),
            Self::Offline(service) => service.fetch_text(path),
        }
    }
}

/// Builds the external URL adapter for the selected strategy.
pub fn external_url_service() -> ExternalUrlServiceAdapter {
    match selected_host_strategy() {
        HostStrategy::Browser => ExternalUrlServiceAdapter::Browser(
            GuardedExternalUrlService::new(WebExternalUrlService),
        ),
        HostStrategy::Offline => ExternalUrlServiceAdapter::Offline(NoopExternalUrlService),
    }
}

/// Builds the content adapter for the selected strategy.
pub fn content_service() -> ContentServiceAdapter {
    match selected_host_strategy() {
        HostStrategy::Browser => {
            ContentServiceAdapter::Browser(CachingContentService::new(WebContentService::default()))
        }
        HostStrategy::Offline => ContentServiceAdapter::Offline(NoopContentService),
    }
}

/// Shared service handles passed to the terminal app and command set.
#[derive(Clone)]
pub struct HostServices {
    /// External URL opener.
    pub external_url: Rc<dyn ExternalUrlService>,
    /// Document loader.
    pub content: Rc<dyn ContentService>,
}

impl std::fmt::Debug for HostServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostServices")
            .field("strategy", &host_strategy_name())
            .finish_non_exhaustive()
    }
}

/// Builds every host service for the selected strategy.
pub fn build_host_services() -> HostServices {
    HostServices {
        external_url: Rc::new(external_url_service()),
        content: Rc::new(content_service()),
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn default_build_selects_browser_adapters() {
        if cfg!(feature = "offline-host") {
            return;
        }
        assert_eq!(host_strategy_name(), "browser");
        assert!(matches!(
            external_url_service(),
            ExternalUrlServiceAdapter::Browser(_)
        ));
        assert!(matches!(content_service(), ContentServiceAdapter::Browser(_)));
    }

    #[test]
    fn browser_adapter_rejects_unsafe_schemes_before_touching_the_page() {
        let service = ExternalUrlServiceAdapter::Browser(GuardedExternalUrlService::new(
            WebExternalUrlService,
        ));
        let err = block_on(service.open_url("javascript:alert(1)")).expect_err("blocked");
        assert!(err.contains("disallowed scheme"));
    }

    #[test]
    fn offline_content_is_unavailable() {
        let service = ContentServiceAdapter::Offline(NoopContentService);
        assert_eq!(
            block_on(service.fetch_text("content/contact.md")),
            Err(ContentError::Unavailable)
        );
    }
}
