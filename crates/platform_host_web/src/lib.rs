//! Browser (`wasm32`) implementations of [`platform_host`] service contracts.
//!
//! This crate wires the terminal's host services to the page: external URLs open through
//! `window.open` with `noopener`, and content documents load through `fetch`. Bridge bindings
//! live under `bridge/`, with `bridge::interop` routing to the wasm implementation or a
//! non-wasm shim so native builds and tests keep compiling.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

/// Compile-time host-strategy selection and concrete adapter factories for runtime wiring.
pub mod adapters;
mod bridge;
pub mod content;
pub mod external_url;

pub use adapters::{
    build_host_services, content_service, external_url_service, host_strategy_name,
    selected_host_strategy, ContentServiceAdapter, ExternalUrlServiceAdapter, HostServices,
    HostStrategy,
};
pub use content::WebContentService;
pub use external_url::WebExternalUrlService;
