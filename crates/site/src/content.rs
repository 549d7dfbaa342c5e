//! Startup content: the project index and site info.

use leptos::logging::warn;
use platform_host::{ContentError, ContentService};
use terminal_shell_contract::{parse_projects_index, Project};
use thiserror::Error;

use crate::site_info::SiteInfo;

/// Content path of the generated project index.
pub const PROJECT_INDEX_PATH: &str = "projects-index.json";
/// Content path of the site info document.
pub const SITE_INFO_PATH: &str = "content/site-info.json";

/// Failure to load a startup document.
#[derive(Debug, Error)]
pub enum ProjectIndexError {
    /// The document could not be fetched.
    #[error(transparent)]
    Content(#[from] ContentError),
    /// The document is not valid JSON for its shape.
    #[error("{path} is invalid: {source}")]
    Decode {
        /// Content path.
        path: &'static str,
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },
}

/// Loads the project index, without the generator's placeholder project.
pub async fn load_projects(
    content: &dyn ContentService,
) -> Result<Vec<Project>, ProjectIndexError> {
    let raw = content.fetch_text(PROJECT_INDEX_PATH).await?;
    parse_projects_index(&raw).map_err(|source| ProjectIndexError::Decode {
        path: PROJECT_INDEX_PATH,
        source,
    })
}

/// Loads the site info document.
pub async fn try_load_site_info(content: &dyn ContentService) -> Result<SiteInfo, ProjectIndexError> {
    let raw = content.fetch_text(SITE_INFO_PATH).await?;
    serde_json::from_str(&raw).map_err(|source| ProjectIndexError::Decode {
        path: SITE_INFO_PATH,
        source,
    })
}

/// Loads the site info document, falling back to the built-in defaults.
pub async fn load_site_info(content: &dyn ContentService) -> SiteInfo {
    match try_load_site_info(content).await {
        Ok(info) => info,
        Err(err) => {
            warn!("site info unavailable, using defaults: {err}");
            SiteInfo::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use platform_host::MemoryContentService;
    use pretty_assertions::assert_eq;

    const INDEX: &str = r#"{
        "projects": [
            { "id": "example-project", "slug": "example-project", "title": "Example", "category": "coding" },
            { "id": "aurora", "slug": "aurora", "title": "Aurora", "category": "3d-render", "_folder": "01_aurora" }
        ]
    }"#;

    #[test]
    fn project_index_drops_the_placeholder() {
        let content = MemoryContentService::with_documents([(PROJECT_INDEX_PATH, INDEX)]);
        let projects = block_on(load_projects(&content)).expect("index loads");
        assert_eq!(
            projects.iter().map(|project| project.id.as_str()).collect::<Vec<_>>(),
            ["aurora"]
        );
        assert_eq!(projects[0].folder.as_deref(), Some("01_aurora"));
    }

    #[test]
    fn project_index_errors_name_their_cause() {
        let missing = block_on(load_projects(&MemoryContentService::default()))
            .expect_err("index is missing");
        assert!(matches!(
            missing,
            ProjectIndexError::Content(ContentError::NotFound { .. })
        ));

        let content = MemoryContentService::with_documents([(PROJECT_INDEX_PATH, "{ nope")]);
        let invalid = block_on(load_projects(&content)).expect_err("index is malformed");
        assert!(invalid.to_string().starts_with("projects-index.json is invalid"));
    }

    #[test]
    fn site_info_falls_back_to_defaults() {
        let content = MemoryContentService::with_documents([(SITE_INFO_PATH, "not json")]);
        assert_eq!(block_on(load_site_info(&content)), SiteInfo::default());

        content.insert(SITE_INFO_PATH, r#"{ "meta": { "title": "Ada" } }"#);
        assert_eq!(block_on(load_site_info(&content)).meta.title, "Ada");
    }
}
