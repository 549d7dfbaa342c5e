use std::rc::Rc;

use leptos::{logging::warn, *};
use leptos_meta::*;
use leptos_router::*;
use platform_host_web::build_host_services;
use portfolio_commands::{register_portfolio_commands, PortfolioCommandsConfig, PortfolioServices};
use portfolio_terminal_app::TerminalApp;
use terminal_shell::{CommandRegistry, ShellConfig};
use terminal_shell_contract::{CommandAction, OverlayKind};

use crate::{
    runtime::{use_site_runtime, SiteProvider},
    site_info::{ContactInfo, ImprintInfo, SiteInfo},
};

/// Root component: page metadata, routes, and the runtime context.
#[component]
pub fn SiteApp() -> impl IntoView {
    provide_meta_context();

    view! {
        <SiteProvider host_services=build_host_services()>
            <PageMeta />
            <Router>
                <main class="site-root">
                    <Routes>
                        <Route path="" view=PortfolioEntry />
                        <Route path="/projects/:slug" view=ProjectRoute />
                    </Routes>
                </main>
            </Router>
        </SiteProvider>
    }
}

#[component]
fn PageMeta() -> impl IntoView {
    let runtime = use_site_runtime();
    let meta = move || {
        runtime
            .info
            .with(|info| info.as_ref().map(|info| info.meta.clone()))
            .unwrap_or_default()
    };

    view! {
        <Title text=move || meta().title />
        <Meta name="description" content=move || meta().description />
    }
}

/// Terminal page with its viewer and overlay panels.
#[component]
pub fn PortfolioEntry() -> impl IntoView {
    let runtime = use_site_runtime();

    view! {
        <div class="app">
            {move || match runtime.info.get() {
                Some(info) => view! { <PortfolioTerminal info=info /> }.into_view(),
                None => view! { <p class="app-loading">"Loading..."</p> }.into_view(),
            }}
            <ViewerPanel />
            <OverlayPanel />
        </div>
    }
}

/// Opens the viewer on `/projects/:slug` once the project index has loaded.
#[component]
fn ProjectRoute() -> impl IntoView {
    let runtime = use_site_runtime();
    let params = use_params_map();

    create_effect(move |opened: Option<Option<String>>| {
        let slug = params.with(|map| map.get("slug").cloned())?;
        if opened.flatten().as_deref() == Some(slug.as_str()) {
            return Some(slug);
        }
        let mut found = false;
        runtime.projects.with(|_| ());
        runtime.update_state(|state, projects| {
            found = state.open_slug(&slug, projects);
            found
        });
        found.then_some(slug)
    });

    view! { <PortfolioEntry /> }
}

#[component]
fn PortfolioTerminal(info: SiteInfo) -> impl IntoView {
    let runtime = use_site_runtime();
    let host = runtime.host.get_value();
    let config = ShellConfig {
        brand: info.brand.clone(),
        ..ShellConfig::default()
    };
    let registry = CommandRegistry::new();
    let services = match PortfolioServices::new(
        PortfolioCommandsConfig::default(),
        info.brand,
        Rc::clone(&host.content),
    ) {
        Ok(services) => services,
        Err(err) => {
            warn!("portfolio commands unavailable: {err}");
            return view! { <p class="app-error">"Terminal unavailable."</p> }.into_view();
        }
    };
    // Commands stay registered for as long as this view is mounted.
    let _commands = store_value(register_portfolio_commands(&registry, &services));

    let state = runtime.state;
    let viewer = Signal::derive(move || state.with(|state| state.viewer.clone()));
    let overlay = Signal::derive(move || state.with(|state| state.overlay));

    view! {
        <TerminalApp
            config=config
            registry=registry
            external_url=host.external_url
            projects=runtime.projects
            viewer=viewer
            overlay=overlay
            on_host_action=runtime.dispatch
            on_escape=Callback::new(move |()| runtime.escape())
            on_game_change=Callback::new(move |game| runtime.game.set(game))
        />
    }
    .into_view()
}

#[component]
fn ViewerPanel() -> impl IntoView {
    let runtime = use_site_runtime();
    let caption = move || {
        runtime
            .projects
            .with(|projects| runtime.state.with(|state| state.caption(projects)))
    };

    move || {
        caption().map(|caption| {
            view! {
                <section class="viewer" aria-label="Project viewer">
                    <header class="viewer-header">
                        <h2 class="viewer-title">{caption.title}</h2>
                        <span class="viewer-position">{caption.position}</span>
                        <button
                            type="button"
                            class="viewer-close"
                            aria-label="Close viewer"
                            on:click=move |_| runtime.dispatch.call(CommandAction::CloseViewer)
                        >
                            "×"
                        </button>
                    </header>
                    {caption
                        .description
                        .map(|description| view! { <p class="viewer-description">{description}</p> })}
                    <nav class="viewer-nav">
                        <button
                            type="button"
                            class="viewer-prev"
                            aria-label="Previous media"
                            on:click=move |_| {
                                runtime.update_state(|state, projects| {
                                    state.prev_media(projects);
                                    true
                                })
                            }
                        >
                            "‹"
                        </button>
                        <button
                            type="button"
                            class="viewer-next"
                            aria-label="Next media"
                            on:click=move |_| {
                                runtime.update_state(|state, projects| {
                                    state.next_media(projects);
                                    true
                                })
                            }
                        >
                            "›"
                        </button>
                    </nav>
                </section>
            }
        })
    }
}

fn contact_view(contact: ContactInfo) -> impl IntoView {
    let mailto = format!("mailto:{}", contact.email);
    let instagram = contact.instagram_url().map(|url| {
        view! {
            <p>
                <a href=url target="_blank" rel="noopener noreferrer">{contact.instagram.clone()}</a>
            </p>
        }
    });

    view! {
        <h2>"Contact"</h2>
        <p class="contact-blurb">{contact.blurb}</p>
        <p>
            <a href=mailto>{contact.email}</a>
        </p>
        {instagram}
    }
}

fn imprint_view(imprint: ImprintInfo) -> impl IntoView {
    let mailto = format!("mailto:{}", imprint.email);

    view! {
        <h2>"Imprint"</h2>
        <p class="imprint-name">{imprint.name}</p>
        <p class="imprint-address">{imprint.address}</p>
        <p>
            <a href=mailto>{imprint.email}</a>
        </p>
        <p class="imprint-liability">{imprint.liability}</p>
        <p class="imprint-copyright">{imprint.copyright}</p>
        <p class="imprint-updated">{format!("Last updated: {}", imprint.last_updated)}</p>
    }
}

#[component]
fn OverlayPanel() -> impl IntoView {
    let runtime = use_site_runtime();

    move || {
        let overlay = runtime.state.with(|state| state.overlay)?;
        let info = runtime.info.get().unwrap_or_default();
        let body = match overlay {
            OverlayKind::Contact => contact_view(info.contact).into_view(),
            OverlayKind::Imprint => imprint_view(info.imprint).into_view(),
        };
        Some(view! {
            <div class="content-overlay" role="dialog" aria-label=overlay.label()>
                <div class="content-box">
                    <button
                        type="button"
                        class="content-close"
                        aria-label="Close"
                        on:click=move |_| runtime.dispatch.call(CommandAction::CloseOverlay)
                    >
                        "×"
                    </button>
                    {body}
                </div>
            </div>
        })
    }
}
