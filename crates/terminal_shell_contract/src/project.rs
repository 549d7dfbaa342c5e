//! Project index models consumed by the `open` command and the host viewer.

use serde::{Deserialize, Serialize};

/// Portfolio category for a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectCategory {
    /// Rendered 3D stills and turntables.
    #[serde(rename = "3d-render")]
    Render3d,
    /// Visual effects work.
    Vfx,
    /// Photography series.
    Photography,
    /// Edited video pieces.
    VideoEditing,
    /// Experiments that fit no other bucket.
    Experimental,
    /// Software projects.
    Coding,
    /// Any category this build does not know about.
    #[serde(other)]
    Other,
}

/// Media type of a project item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MediaKind {
    /// Single still image.
    Image,
    /// Video file.
    Video,
    /// glTF/GLB/OBJ model.
    #[serde(rename = "3d-model")]
    Model3d,
    /// Ordered stack of images browsed as one item.
    ImageStack,
}

/// Media source: one path, or several for image stacks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MediaSource {
    /// Single asset path.
    Single(String),
    /// Multiple asset paths.
    Stack(Vec<String>),
}

/// One media entry inside a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    /// Identifier unique within the project.
    pub id: String,
    /// Media type.
    #[serde(rename = "type")]
    pub kind: MediaKind,
    /// Asset path or paths.
    pub src: MediaSource,
    /// Optional caption.
    #[serde(default)]
    pub description: Option<String>,
}

/// A portfolio project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Stable identifier used by `open <id>`.
    pub id: String,
    /// URL slug, when the index provides one.
    #[serde(default)]
    pub slug: Option<String>,
    /// Display title.
    #[serde(default)]
    pub title: String,
    /// Category.
    pub category: ProjectCategory,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Optional year.
    #[serde(default)]
    pub year: Option<u32>,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Media items in viewer order.
    #[serde(default)]
    pub media: Vec<MediaItem>,
    /// Source folder name recorded by the project index generator.
    #[serde(default, rename = "_folder")]
    pub folder: Option<String>,
}

impl Project {
    /// Title for listings, falling back to the id when the title is blank.
    pub fn display_name(&self) -> &str {
        if self.title.trim().is_empty() {
            &self.id
        } else {
            &self.title
        }
    }
}

/// Media viewer state owned by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewerState {
    /// Project shown in the viewer.
    pub project_id: String,
    /// Zero-based index of the media item on screen.
    pub media_index: usize,
}

const PLACEHOLDER_SLUG: &str = "example-project";

#[derive(Deserialize)]
#[serde(untagged)]
enum ProjectsIndex {
    Wrapped {
        #[serde(default)]
        projects: Vec<Project>,
    },
    Bare(Vec<Project>),
}

/// Parses a project index document.
///
/// Accepts either `{ "projects": [...] }` or a bare array and drops the generator's
/// placeholder entry.
pub fn parse_projects_index(raw: &str) -> Result<Vec<Project>, serde_json::Error> {
    let projects = match serde_json::from_str::<ProjectsIndex>(raw)? {
        ProjectsIndex::Wrapped { projects } => projects,
        ProjectsIndex::Bare(projects) => projects,
    };
    Ok(projects
        .into_iter()
        .filter(|project| project.slug.as_deref() != Some(PLACEHOLDER_SLUG))
        .collect())
}
