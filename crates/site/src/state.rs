//! Viewer and overlay state owned by the page, and the reducer applying terminal host actions.

use terminal_shell_contract::{CommandAction, OverlayKind, Project, ViewerState};

/// Page state the terminal reads through its command context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteState {
    /// Open media viewer.
    pub viewer: Option<ViewerState>,
    /// Visible overlay panel.
    pub overlay: Option<OverlayKind>,
}

/// Text shown by the viewer panel for the current media item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerCaption {
    /// Project title.
    pub title: String,
    /// One-based position, e.g. `2 / 5`. Empty for projects without media.
    pub position: String,
    /// Media caption, if any.
    pub description: Option<String>,
}

fn find<'a>(projects: &'a [Project], id: &str) -> Option<&'a Project> {
    projects.iter().find(|project| project.id == id)
}

impl SiteState {
    /// Applies a host action from the terminal. Returns whether anything changed.
    ///
    /// Opening an unknown project is ignored. Closing the viewer also hides the overlay.
    pub fn apply(&mut self, action: &CommandAction, projects: &[Project]) -> bool {
        let before = self.clone();
        match action {
            CommandAction::OpenViewer {
                project_id,
                media_index,
            } => self.open_viewer(project_id, media_index.unwrap_or(0), projects),
            CommandAction::CloseViewer => {
                self.viewer = None;
                self.overlay = None;
            }
            CommandAction::ShowOverlay { overlay } => self.overlay = Some(*overlay),
            CommandAction::CloseOverlay => self.overlay = None,
            CommandAction::Clear
            | CommandAction::SetLimitedHistory { .. }
            | CommandAction::StartGame { .. } => {}
        }
        *self != before
    }

    /// Opens the viewer on `project_id`, clamping `media_index` to the project's media.
    pub fn open_viewer(&mut self, project_id: &str, media_index: usize, projects: &[Project]) {
        let Some(project) = find(projects, project_id) else {
            return;
        };
        self.viewer = Some(ViewerState {
            project_id: project.id.clone(),
            media_index: media_index.min(project.media.len().saturating_sub(1)),
        });
    }

    /// Opens the viewer on the project whose slug (or id) is `slug`.
    pub fn open_slug(&mut self, slug: &str, projects: &[Project]) -> bool {
        let Some(project) = projects
            .iter()
            .find(|project| project.slug.as_deref().unwrap_or(project.id.as_str()) == slug)
        else {
            return false;
        };
        let id = project.id.clone();
        self.open_viewer(&id, 0, projects);
        true
    }

    /// Escape closes the overlay first, then the viewer. Returns whether anything closed.
    pub fn escape(&mut self) -> bool {
        if self.overlay.take().is_some() {
            return true;
        }
        self.viewer.take().is_some()
    }

    /// Steps to the next media item, wrapping to the first.
    pub fn next_media(&mut self, projects: &[Project]) {
        self.step_media(projects, |index, len| (index + 1) % len);
    }

    /// Steps to the previous media item, wrapping to the last.
    pub fn prev_media(&mut self, projects: &[Project]) {
        self.step_media(projects, |index, len| index.checked_sub(1).unwrap_or(len - 1));
    }

    fn step_media(&mut self, projects: &[Project], step: impl FnOnce(usize, usize) -> usize) {
        let Some(viewer) = self.viewer.as_mut() else {
            return;
        };
        let Some(project) = find(projects, &viewer.project_id) else {
            return;
        };
        let len = project.media.len();
        if len > 0 {
            viewer.media_index = step(viewer.media_index.min(len - 1), len);
        }
    }

    /// Caption for the open viewer.
    pub fn caption(&self, projects: &[Project]) -> Option<ViewerCaption> {
        let viewer = self.viewer.as_ref()?;
        let project = find(projects, &viewer.project_id)?;
        let media = project.media.get(viewer.media_index);
        Some(ViewerCaption {
            title: project.display_name().to_string(),
            position: if project.media.is_empty() {
                String::new()
            } else {
                format!("{} / {}", viewer.media_index + 1, project.media.len())
            },
            description: media
                .and_then(|media| media.description.clone())
                .or_else(|| project.description.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use terminal_shell_contract::{MediaItem, MediaKind, MediaSource, ProjectCategory};

    fn media(id: &str, description: Option<&str>) -> MediaItem {
        MediaItem {
            id: id.to_string(),
            kind: MediaKind::Image,
            src: MediaSource::Single(format!("{id}.jpg")),
            description: description.map(str::to_string),
        }
    }

    fn projects() -> Vec<Project> {
        vec![
            Project {
                id: "aurora".to_string(),
                slug: Some("aurora-lights".to_string()),
                title: "Aurora".to_string(),
                category: ProjectCategory::Render3d,
                description: Some("Northern lights study".to_string()),
                year: Some(2023),
                tags: Vec::new(),
                media: vec![media("a", Some("Wide shot")), media("b", None), media("c", None)],
                folder: None,
            },
            Project {
                id: "notes".to_string(),
                slug: None,
                title: String::new(),
                category: ProjectCategory::Coding,
                description: None,
                year: None,
                tags: Vec::new(),
                media: Vec::new(),
                folder: None,
            },
        ]
    }

    fn viewer(project_id: &str, media_index: usize) -> Option<ViewerState> {
        Some(ViewerState {
            project_id: project_id.to_string(),
            media_index,
        })
    }

    #[test]
    fn host_actions_drive_viewer_and_overlay() {
        let projects = projects();
        let mut state = SiteState::default();

        let open = CommandAction::OpenViewer {
            project_id: "aurora".to_string(),
            media_index: Some(9),
        };
        assert!(state.apply(&open, &projects));
        assert_eq!(state.viewer, viewer("aurora", 2));
        assert!(!state.apply(&open, &projects));

        assert!(state.apply(
            &CommandAction::ShowOverlay {
                overlay: OverlayKind::Contact
            },
            &projects
        ));
        assert!(state.apply(&CommandAction::CloseViewer, &projects));
        assert_eq!(state, SiteState::default());

        let unknown = CommandAction::OpenViewer {
            project_id: "ghost".to_string(),
            media_index: None,
        };
        assert!(!state.apply(&unknown, &projects));
        assert!(!state.apply(&CommandAction::Clear, &projects));
    }

    #[test]
    fn escape_closes_overlay_before_viewer() {
        let mut state = SiteState {
            viewer: viewer("aurora", 0),
            overlay: Some(OverlayKind::Imprint),
        };
        assert!(state.escape());
        assert_eq!(state.overlay, None);
        assert_eq!(state.viewer, viewer("aurora", 0));
        assert!(state.escape());
        assert_eq!(state.viewer, None);
        assert!(!state.escape());
    }

    #[test]
    fn media_navigation_wraps_both_ways() {
        let projects = projects();
        let mut state = SiteState {
            viewer: viewer("aurora", 2),
            overlay: None,
        };
        state.next_media(&projects);
        assert_eq!(state.viewer, viewer("aurora", 0));
        state.prev_media(&projects);
        assert_eq!(state.viewer, viewer("aurora", 2));
        state.prev_media(&projects);
        assert_eq!(state.viewer, viewer("aurora", 1));

        let mut empty = SiteState {
            viewer: viewer("notes", 0),
            overlay: None,
        };
        empty.next_media(&projects);
        assert_eq!(empty.viewer, viewer("notes", 0));
    }

    #[test]
    fn slugs_fall_back_to_ids() {
        let projects = projects();
        let mut state = SiteState::default();
        assert!(state.open_slug("aurora-lights", &projects));
        assert_eq!(state.viewer, viewer("aurora", 0));
        assert!(state.open_slug("notes", &projects));
        assert_eq!(state.viewer, viewer("notes", 0));
        assert!(!state.open_slug("aurora", &projects));
    }

    #[test]
    fn captions_show_position_and_description() {
        let projects = projects();
        let mut state = SiteState {
            viewer: viewer("aurora", 0),
            overlay: None,
        };
        assert_eq!(
            state.caption(&projects),
            Some(ViewerCaption {
                title: "Aurora".to_string(),
                position: "1 / 3".to_string(),
                description: Some("Wide shot".to_string()),
            })
        );

        state.next_media(&projects);
        assert_eq!(
            state.caption(&projects).and_then(|caption| caption.description),
            Some("Northern lights study".to_string())
        );

        state.viewer = viewer("notes", 0);
        assert_eq!(
            state.caption(&projects),
            Some(ViewerCaption {
                title: "notes".to_string(),
                position: String::new(),
                description: None,
            })
        );
    }
}
