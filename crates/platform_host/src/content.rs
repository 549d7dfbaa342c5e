//! Text content host-service contracts and adapters.

use std::{cell::RefCell, collections::HashMap, future::Future, pin::Pin, rc::Rc};

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Object-safe boxed future used by [`ContentService`].
pub type ContentFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Failure to load a content document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    /// The host has no document at `path`.
    #[error("content not found: {path}")]
    NotFound {
        /// Requested path.
        path: String,
    },
    /// The host answered with a non-success status.
    #[error("request for {path} failed with status {status}")]
    Http {
        /// Requested path.
        path: String,
        /// HTTP status code.
        status: u16,
    },
    /// The request never completed.
    #[error("request for {path} failed: {message}")]
    Transport {
        /// Requested path.
        path: String,
        /// Host error text.
        message: String,
    },
    /// The document loaded but is not valid for its expected shape.
    #[error("content at {path} is invalid: {message}")]
    Decode {
        /// Requested path.
        path: String,
        /// Decoder error text.
        message: String,
    },
    /// No content backend exists on this target.
    #[error("content service unavailable")]
    Unavailable,
}

/// Host service that loads text documents by relative path.
pub trait ContentService {
    /// Fetches the document at `path` as text.
    fn fetch_text<'a>(&'a self, path: &'a str) -> ContentFuture<'a, Result<String, ContentError>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Content service for targets without a backend. Every fetch fails with
/// [`ContentError::Unavailable`].
pub struct NoopContentService;

impl ContentService for NoopContentService {
    fn fetch_text<'a>(
        &'a self,
        _path: &'a str,
    ) -> ContentFuture<'a, Result<String, ContentError>> {
        Box::pin(async { Err(ContentError::Unavailable) })
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory documents keyed by path.
pub struct MemoryContentService {
    documents: Rc<RefCell<HashMap<String, String>>>,
    fetches: Rc<RefCell<Vec<String>>>,
}

impl MemoryContentService {
    /// Creates a service holding `documents`.
    pub fn with_documents<I, K, V>(documents: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let service = Self::default();
        for (path, text) in documents {
            service.insert(path, text);
        }
        service
    }

    /// Adds or replaces a document.
    pub fn insert(&self, path: impl Into<String>, text: impl Into<String>) {
        self.documents
            .borrow_mut()
            .insert(path.into(), text.into());
    }

    /// Paths requested so far, in order. Lets tests observe caching.
    pub fn fetches(&self) -> Vec<String> {
        self.fetches.borrow().clone()
    }
}

impl ContentService for MemoryContentService {
    fn fetch_text<'a>(&'a self, path: &'a str) -> ContentFuture<'a, Result<String, ContentError>> {
        Box::pin(async move {
            self.fetches.borrow_mut().push(path.to_string());
            self.documents
                .borrow()
                .get(path)
                .cloned()
                .ok_or_else(|| ContentError::NotFound {
                    path: path.to_string(),
                })
        })
    }
}

#[derive(Debug, Clone, Default)]
/// Remembers successful fetches of the wrapped service for the lifetime of the page.
///
/// Failures are not cached, so a later request retries the backend.
pub struct CachingContentService<S> {
    inner: S,
    cache: Rc<RefCell<HashMap<String, String>>>,
}

impl<S> CachingContentService<S> {
    /// Wraps `inner` with an empty cache.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            cache: Rc::default(),
        }
    }
}

impl<S: ContentService> ContentService for CachingContentService<S> {
    fn fetch_text<'a>(&'a self, path: &'a str) -> ContentFuture<'a, Result<String, ContentError>> {
        Box::pin(async move {
            let cached = self.cache.borrow().get(path).cloned();
            if let Some(text) = cached {
                return Ok(text);
            }
            let text = self.inner.fetch_text(path).await?;
            self.cache
                .borrow_mut()
                .insert(path.to_string(), text.clone());
            Ok(text)
        })
    }
}

/// Fetches and deserializes a JSON document through a [`ContentService`] implementation.
///
/// # Errors
///
/// Returns the fetch error, or [`ContentError::Decode`] when the text is not valid JSON for `T`.
pub async fn fetch_json_with<S: ContentService + ?Sized, T: DeserializeOwned>(
    service: &S,
    path: &str,
) -> Result<T, ContentError> {
    let raw = service.fetch_text(path).await?;
    serde_json::from_str(&raw).map_err(|err| ContentError::Decode {
        path: path.to_string(),
        message: err.to_string(),
    })
}
