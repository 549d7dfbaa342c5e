//! Browser entrypoint for the portfolio terminal site.
//!
//! The site loads `content/site-info.json` and the project index through the host content
//! service, owns the viewer and overlay state that terminal host actions drive, and mounts
//! [`portfolio_terminal_app::TerminalApp`] with the portfolio command set.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod content;
mod runtime;
pub mod site_info;
pub mod state;
mod web_app;

pub use content::{load_projects, load_site_info, ProjectIndexError};
pub use runtime::{use_site_runtime, SiteProvider, SiteRuntimeContext};
pub use site_info::SiteInfo;
pub use state::SiteState;
pub use web_app::{PortfolioEntry, SiteApp};

#[cfg(all(feature = "csr", target_arch = "wasm32"))]
/// Installs the panic hook and mounts [`SiteApp`] on `<body>`.
pub fn mount() {
    console_error_panic_hook::set_once();
    leptos::mount_to_body(|| leptos::view! { <SiteApp /> })
}
