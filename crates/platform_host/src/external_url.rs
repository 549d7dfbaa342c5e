//! External URL host-service contracts.

use std::{cell::RefCell, future::Future, pin::Pin, rc::Rc};

/// Object-safe boxed future used by [`ExternalUrlService`].
pub type ExternalUrlFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

const OPENABLE_SCHEMES: [&str; 3] = ["http://", "https://", "mailto:"];

/// Host service for opening URLs outside the terminal page.
pub trait ExternalUrlService {
    /// Opens a URL using the host's external navigation mechanism.
    fn open_url<'a>(&'a self, url: &'a str) -> ExternalUrlFuture<'a, Result<(), String>>;
}

/// Returns whether `url` uses a scheme the host is allowed to open.
///
/// Only `http`, `https` and `mailto` pass. Control characters anywhere in the URL fail.
pub fn is_openable_url(url: &str) -> bool {
    if url.chars().any(char::is_control) {
        return false;
    }
    let lowered = url.trim_start().to_ascii_lowercase();
    OPENABLE_SCHEMES
        .iter()
        .any(|scheme| lowered.starts_with(scheme) && lowered.len() > scheme.len())
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op external URL service for unsupported targets.
pub struct NoopExternalUrlService;

impl ExternalUrlService for NoopExternalUrlService {
    fn open_url<'a>(&'a self, _url: &'a str) -> ExternalUrlFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }
}

#[derive(Debug, Clone, Default)]
/// Records every opened URL in memory. Used by tests and native builds.
pub struct RecordingExternalUrlService {
    opened: Rc<RefCell<Vec<String>>>,
}

impl RecordingExternalUrlService {
    /// URLs opened so far, oldest first.
    pub fn opened(&self) -> Vec<String> {
        self.opened.borrow().clone()
    }
}

impl ExternalUrlService for RecordingExternalUrlService {
    fn open_url<'a>(&'a self, url: &'a str) -> ExternalUrlFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.opened.borrow_mut().push(url.to_string());
            Ok(())
        })
    }
}

#[derive(Debug, Clone, Default)]
/// Wraps another service and refuses URLs that fail [`is_openable_url`].
pub struct GuardedExternalUrlService<S> {
    inner: S,
}

impl<S> GuardedExternalUrlService<S> {
    /// Guards `inner`.
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    /// Wrapped service.
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: ExternalUrlService> ExternalUrlService for GuardedExternalUrlService<S> {
    fn open_url<'a>(&'a self, url: &'a str) -> ExternalUrlFuture<'a, Result<(), String>> {
        if !is_openable_url(url) {
            let message = format!("refusing to open url with disallowed scheme: {url}");
            return Box::pin(async move { Err(message) });
        }
        self.inner.open_url(url)
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn only_web_and_mail_schemes_are_openable() {
        assert!(is_openable_url("https://example.com"));
        assert!(is_openable_url("HTTP://example.com/path"));
        assert!(is_openable_url("mailto:hello@example.com"));
        assert!(!is_openable_url("javascript:alert(1)"));
        assert!(!is_openable_url("data:text/html,hi"));
        assert!(!is_openable_url("https://"));
        assert!(!is_openable_url("https://exa\nmple.com"));
    }

    #[test]
    fn guard_blocks_before_delegating() {
        let service = GuardedExternalUrlService::new(RecordingExternalUrlService::default());
        block_on(service.open_url("https://example.com")).expect("allowed url opens");
        let err = block_on(service.open_url("javascript:void(0)")).expect_err("blocked");
        assert!(err.contains("disallowed scheme"));
        assert_eq!(
            service.inner().opened(),
            vec!["https://example.com".to_string()]
        );
    }
}
