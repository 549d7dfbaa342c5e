//! External URL host-service adapter for the browser.

use platform_host::{ExternalUrlFuture, ExternalUrlService};

use crate::bridge;

#[derive(Debug, Clone, Copy, Default)]
/// Opens URLs in a new browsing context without giving it a handle back to the terminal page.
///
/// This adapter does not filter schemes; wrap it in
/// [`platform_host::GuardedExternalUrlService`] before handing it to untrusted callers.
pub struct WebExternalUrlService;

impl ExternalUrlService for WebExternalUrlService {
    fn open_url<'a>(&'a self, url: &'a str) -> ExternalUrlFuture<'a, Result<(), String>> {
        Box::pin(async move { bridge::open_external_url(url).await })
    }
}
