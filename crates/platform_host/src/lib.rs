//! Typed host-service contracts for the portfolio terminal.
//!
//! This crate is the API-first boundary between the terminal and the page it runs in. It defines
//! the external URL and content services the command set and host app depend on, plus no-op and
//! in-memory adapters for tests and unsupported targets. Browser adapters live in
//! `platform_host_web`.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod content;
pub mod external_url;
pub mod time;

pub use content::{
    fetch_json_with, CachingContentService, ContentError, ContentFuture, ContentService,
    MemoryContentService, NoopContentService,
};
pub use external_url::{
    is_openable_url, ExternalUrlFuture, ExternalUrlService, GuardedExternalUrlService,
    NoopExternalUrlService, RecordingExternalUrlService,
};
pub use time::{next_monotonic_timestamp_ms, unix_time_ms_now};
