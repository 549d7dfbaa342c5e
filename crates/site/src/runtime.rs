//! Page runtime: host services, viewer/overlay state and startup content loading.

use std::rc::Rc;

use leptos::{logging::warn, *};
use platform_host_web::HostServices;
use terminal_shell_contract::{CommandAction, Project};

use crate::{
    content::{load_projects, load_site_info},
    site_info::SiteInfo,
    state::SiteState,
};

#[derive(Clone, Copy)]
/// Leptos context shared by the page components.
pub struct SiteRuntimeContext {
    /// Host service bundle assembled by the entry layer.
    pub host: StoredValue<HostServices>,
    /// Viewer and overlay state.
    pub state: RwSignal<SiteState>,
    /// Loaded project index; empty until it arrives.
    pub projects: RwSignal<Vec<Project>>,
    /// Loaded site info; `None` while loading.
    pub info: RwSignal<Option<SiteInfo>>,
    /// Running terminal game, if any.
    pub game: RwSignal<Option<String>>,
    /// Applies terminal host actions to [`SiteRuntimeContext::state`].
    pub dispatch: Callback<CommandAction>,
}

fn update_state(
    state: RwSignal<SiteState>,
    projects: RwSignal<Vec<Project>>,
    f: impl FnOnce(&mut SiteState, &[Project]) -> bool,
) {
    let mut next = state.get_untracked();
    if projects.with_untracked(|projects| f(&mut next, projects)) {
        state.set(next);
    }
}

impl SiteRuntimeContext {
    /// Runs `f` on a copy of the state and publishes it when `f` reports a change.
    pub fn update_state(&self, f: impl FnOnce(&mut SiteState, &[Project]) -> bool) {
        update_state(self.state, self.projects, f);
    }

    /// Closes the overlay, or the viewer when no overlay is shown.
    pub fn escape(&self) {
        self.update_state(|state, _| state.escape());
    }
}

fn blur_active_element() {
    #[cfg(target_arch = "wasm32")]
    {
        use leptos::wasm_bindgen::JsCast;

        let active = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.active_element())
            .and_then(|element| element.dyn_into::<web_sys::HtmlElement>().ok());
        if let Some(element) = active {
            if let Err(err) = element.blur() {
                warn!("blur failed: {err:?}");
            }
        }
    }
}

fn install_content_loading(runtime: SiteRuntimeContext) {
    let content = runtime.host.with_value(|host| Rc::clone(&host.content));
    spawn_local({
        let content = Rc::clone(&content);
        async move {
            let info = load_site_info(content.as_ref()).await;
            runtime.info.set(Some(info));
        }
    });
    spawn_local(async move {
        match load_projects(content.as_ref()).await {
            Ok(projects) => runtime.projects.set(projects),
            Err(err) => warn!("project index unavailable: {err}"),
        }
    });
}

fn install_escape_listener(runtime: SiteRuntimeContext) {
    // Games handle Escape themselves and mark the event handled.
    let listener = window_event_listener(ev::keydown, move |ev| {
        if ev.key() != "Escape" || ev.default_prevented() || runtime.game.get_untracked().is_some()
        {
            return;
        }
        let mut closed = false;
        runtime.update_state(|state, _| {
            closed = state.escape();
            closed
        });
        if closed {
            blur_active_element();
        }
    });
    on_cleanup(move || listener.remove());
}

#[component]
/// Provides [`SiteRuntimeContext`] to descendant components and starts loading content.
pub fn SiteProvider(
    /// Injected browser host bundle.
    host_services: HostServices,
    children: Children,
) -> impl IntoView {
    let host = store_value(host_services);
    let state = create_rw_signal(SiteState::default());
    let projects = create_rw_signal(Vec::<Project>::new());
    let info = create_rw_signal(None::<SiteInfo>);
    let game = create_rw_signal(None::<String>);

    let dispatch = Callback::new(move |action: CommandAction| {
        update_state(state, projects, |state, projects| state.apply(&action, projects));
    });

    let runtime = SiteRuntimeContext {
        host,
        state,
        projects,
        info,
        game,
        dispatch,
    };
    provide_context(runtime);

    install_content_loading(runtime);
    install_escape_listener(runtime);

    children().into_view()
}

/// Returns the current [`SiteRuntimeContext`].
///
/// # Panics
///
/// Panics if called outside [`SiteProvider`].
pub fn use_site_runtime() -> SiteRuntimeContext {
    use_context::<SiteRuntimeContext>().expect("SiteRuntimeContext not provided")
}
