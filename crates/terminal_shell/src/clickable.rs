//! Clickable run bookkeeping.
//!
//! Bindings are keyed by display text. The active maps hold runs from the most recent output,
//! the disabled set remembers display texts that were superseded, and persistent commands (the
//! welcome banner links) are re-seeded into the active map after every clear.

use std::collections::{BTreeMap, BTreeSet};

/// Identifier stamped on every screen cell a clickable run occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunId(pub u32);

/// What activating a run does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickTarget {
    /// Re-inject a command line.
    Command(String),
    /// Open an external `http`, `https`, or `mailto` URL.
    Link(String),
}

/// Binding family of a rendered run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunKind {
    /// Produced by a `[cmd:...]` token.
    Command,
    /// Produced by a `[link:...]` or `[mailto:...]` token.
    Link,
}

/// A rendered clickable run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickableRun {
    /// Run identifier.
    pub id: RunId,
    /// Text shown on screen.
    pub display: String,
    /// Binding family.
    pub kind: RunKind,
}

/// Instance-owned clickable state for one shell.
#[derive(Debug, Default)]
pub struct ClickableRegistry {
    active_commands: BTreeMap<String, String>,
    active_links: BTreeMap<String, String>,
    disabled: BTreeSet<String>,
    persistent: BTreeMap<String, String>,
    runs: BTreeMap<RunId, ClickableRun>,
    next_run: u32,
}

impl ClickableRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `display` to a command in the active map. Later registrations win.
    pub fn register_command(&mut self, display: &str, command: &str) -> RunId {
        self.active_commands
            .insert(display.to_string(), command.to_string());
        self.disabled.remove(display);
        self.record_run(display, RunKind::Command)
    }

    /// Binds `display` to an external URL in the active map. Later registrations win.
    pub fn register_link(&mut self, display: &str, url: &str) -> RunId {
        self.active_links.insert(display.to_string(), url.to_string());
        self.disabled.remove(display);
        self.record_run(display, RunKind::Link)
    }

    /// Adds a binding that survives every clear and reset.
    pub fn add_persistent(&mut self, display: &str, command: &str) {
        self.persistent
            .insert(display.to_string(), command.to_string());
        self.active_commands
            .insert(display.to_string(), command.to_string());
        self.disabled.remove(display);
    }

    /// Wipes the active maps and re-seeds every persistent binding.
    pub fn clear_active(&mut self) {
        self.active_commands.clear();
        self.active_links.clear();
        self.reseed_persistent();
    }

    /// Moves every non-persistent active display text into the disabled set.
    ///
    /// Must run before new output is written so only that output stays interactive.
    pub fn disable_stale_runs(&mut self) {
        let stale = self
            .active_commands
            .keys()
            .chain(self.active_links.keys())
            .filter(|display| !self.persistent.contains_key(*display))
            .cloned()
            .collect::<Vec<_>>();
        for display in stale {
            self.active_commands.remove(&display);
            self.active_links.remove(&display);
            self.disabled.insert(display);
        }
        self.reseed_persistent();
    }

    /// Forgets all active and disabled state, keeping persistent bindings.
    pub fn clear_all(&mut self) {
        self.active_commands.clear();
        self.active_links.clear();
        self.disabled.clear();
        self.runs.clear();
        self.reseed_persistent();
    }

    /// Forgets rendered runs whose cells are no longer retained on screen, along with disabled
    /// display texts no remaining run shows.
    pub fn retain_runs(&mut self, on_screen: &BTreeSet<RunId>) {
        self.runs.retain(|id, _| on_screen.contains(id));
        let shown = self
            .runs
            .values()
            .map(|run| run.display.as_str())
            .collect::<BTreeSet<_>>();
        self.disabled.retain(|display| shown.contains(display.as_str()));
    }

    /// Number of rendered runs still tracked.
    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    /// Active command bound to `display`.
    pub fn active_command(&self, display: &str) -> Option<&str> {
        self.active_commands.get(display).map(String::as_str)
    }

    /// Active URL bound to `display`.
    pub fn active_link(&self, display: &str) -> Option<&str> {
        self.active_links.get(display).map(String::as_str)
    }

    /// Returns whether `display` was superseded and has not been re-registered.
    pub fn is_disabled(&self, display: &str) -> bool {
        self.disabled.contains(display)
            && !self.active_commands.contains_key(display)
            && !self.active_links.contains_key(display)
    }

    /// Returns whether `display` is a persistent binding.
    pub fn is_persistent(&self, display: &str) -> bool {
        self.persistent.contains_key(display)
    }

    /// Display texts currently bound to commands.
    pub fn active_command_displays(&self) -> impl Iterator<Item = &str> {
        self.active_commands.keys().map(String::as_str)
    }

    /// Display texts currently bound to URLs.
    pub fn active_link_displays(&self) -> impl Iterator<Item = &str> {
        self.active_links.keys().map(String::as_str)
    }

    /// Rendered run record.
    pub fn run(&self, id: RunId) -> Option<&ClickableRun> {
        self.runs.get(&id)
    }

    /// Returns whether a rendered run should currently respond to clicks.
    pub fn is_interactive(&self, id: RunId) -> bool {
        let Some(run) = self.runs.get(&id) else {
            return false;
        };
        match run.kind {
            RunKind::Command => self.active_commands.contains_key(&run.display),
            RunKind::Link => self.active_links.contains_key(&run.display),
        }
    }

    /// Resolves a rendered run to its current target.
    ///
    /// Link bindings take priority over command bindings for the same display text.
    pub fn resolve(&self, id: RunId) -> Option<ClickTarget> {
        let run = self.runs.get(&id)?;
        if let Some(url) = self.active_links.get(&run.display) {
            return Some(ClickTarget::Link(url.clone()));
        }
        self.active_commands
            .get(&run.display)
            .map(|command| ClickTarget::Command(command.clone()))
    }

    fn record_run(&mut self, display: &str, kind: RunKind) -> RunId {
        self.next_run = self.next_run.wrapping_add(1);
        let id = RunId(self.next_run);
        self.runs.insert(
            id,
            ClickableRun {
                id,
                display: display.to_string(),
                kind,
            },
        );
        id
    }

    fn reseed_persistent(&mut self) {
        for (display, command) in &self.persistent {
            self.active_commands.insert(display.clone(), command.clone());
            self.disabled.remove(display);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn registry_with_banner() -> ClickableRegistry {
        let mut registry = ClickableRegistry::new();
        registry.add_persistent("open", "open");
        registry.add_persistent("help", "help");
        registry
    }

    #[test]
    fn clear_active_leaves_exactly_the_persistent_bindings() {
        let mut registry = registry_with_banner();
        registry.register_command("Koi Pond", "open koi");
        registry.register_link("Instagram", "https://instagram.com/x");
        registry.clear_active();

        assert_eq!(
            registry.active_command_displays().collect::<Vec<_>>(),
            vec!["help", "open"]
        );
        assert_eq!(registry.active_link_displays().count(), 0);
    }

    #[test]
    fn stale_runs_become_disabled_and_non_interactive() {
        let mut registry = registry_with_banner();
        let alpha = registry.register_command("alpha", "alpha");
        registry.disable_stale_runs();
        registry.clear_active();

        assert!(registry.is_disabled("alpha"));
        assert!(!registry.is_interactive(alpha));
        assert_eq!(registry.resolve(alpha), None);
        assert!(!registry.is_disabled("open"));
    }

    #[test]
    fn re_registering_a_disabled_display_reactivates_it() {
        let mut registry = ClickableRegistry::new();
        let first = registry.register_command("alpha", "alpha");
        registry.disable_stale_runs();
        let second = registry.register_command("alpha", "alpha --again");

        assert!(!registry.is_disabled("alpha"));
        assert_eq!(
            registry.resolve(first),
            Some(ClickTarget::Command("alpha --again".to_string()))
        );
        assert!(registry.is_interactive(second));
    }

    #[test]
    fn later_registration_wins() {
        let mut registry = ClickableRegistry::new();
        registry.register_command("docs", "help");
        let id = registry.register_command("docs", "contact");
        assert_eq!(registry.active_command("docs"), Some("contact"));
        assert_eq!(registry.resolve(id), Some(ClickTarget::Command("contact".to_string())));
    }

    #[test]
    fn links_resolve_before_commands() {
        let mut registry = ClickableRegistry::new();
        let command_run = registry.register_command("site", "open site");
        registry.register_link("site", "https://example.com");
        assert_eq!(
            registry.resolve(command_run),
            Some(ClickTarget::Link("https://example.com".to_string()))
        );
    }

    #[test]
    fn retain_runs_forgets_scrolled_out_runs() {
        let mut registry = registry_with_banner();
        let old = registry.register_command("alpha", "alpha");
        registry.disable_stale_runs();
        let gone = registry.register_command("beta", "beta");
        registry.disable_stale_runs();
        let current = registry.register_command("gamma", "gamma");

        registry.retain_runs(&BTreeSet::from([old, current]));
        assert_eq!(registry.run(gone), None);
        assert_eq!(registry.run_count(), 2);
        assert!(registry.is_disabled("alpha"));
        assert!(!registry.is_disabled("beta"));
        assert!(registry.is_interactive(current));
        assert_eq!(registry.active_command("open"), Some("open"));
    }

    #[test]
    fn clear_all_keeps_persistent_and_forgets_runs() {
        let mut registry = registry_with_banner();
        let run = registry.register_command("alpha", "alpha");
        registry.disable_stale_runs();
        registry.clear_all();

        assert!(!registry.is_disabled("alpha"));
        assert_eq!(registry.run(run), None);
        assert_eq!(registry.active_command("open"), Some("open"));
        assert!(registry.is_persistent("help"));
    }
}
