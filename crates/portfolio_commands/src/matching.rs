//! Loose project lookup for `open`.
//!
//! Queries and project fields are compared after [`normalize`], which folds case and strips
//! combining diacritics, so `open cafe` finds a project titled `Café`. [`slugify`] additionally
//! turns whitespace runs into `-` and `ß` into `ss`, so `open koi-pond` finds `Koi Pond`.

use terminal_shell_contract::Project;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Trims, lowercases, composes, and drops combining marks.
pub fn normalize(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .nfd()
        .filter(|ch| !is_combining_mark(*ch))
        .nfc()
        .collect()
}

/// Normalized form with whitespace runs collapsed to `-` and `ß` expanded to `ss`.
pub fn slugify(text: &str) -> String {
    normalize(text)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .replace('ß', "ss")
}

struct Keys {
    id: String,
    title: String,
    folder: String,
    id_slug: String,
    title_slug: String,
}

impl Keys {
    fn of(project: &Project) -> Self {
        Self {
            id: normalize(&project.id),
            title: normalize(&project.title),
            folder: project.folder.as_deref().map(normalize).unwrap_or_default(),
            id_slug: slugify(&project.id),
            title_slug: slugify(&project.title),
        }
    }
}

/// First project matching `query`, in index order.
///
/// A project matches when its id or title equals or contains the query, its folder equals the
/// query, or any slug form equals the query's slug.
pub fn find_project<'a>(projects: &'a [Project], query: &str) -> Option<&'a Project> {
    let term = normalize(query);
    let slug = slugify(query);
    if term.is_empty() {
        return None;
    }
    projects.iter().find(|project| {
        let keys = Keys::of(project);
        keys.id == term
            || keys.id == slug
            || keys.id.contains(&term)
            || keys.title == term
            || (!keys.title.is_empty() && keys.title.contains(&term))
            || (!keys.folder.is_empty() && (keys.folder == term || keys.folder == slug))
            || keys.id_slug == slug
            || (!keys.title_slug.is_empty() && keys.title_slug == slug)
    })
}

/// Ids of projects that loosely resemble `query`, for the not-found hint.
pub fn suggestions(projects: &[Project], query: &str) -> Vec<String> {
    let term = normalize(query);
    if term.is_empty() {
        return Vec::new();
    }
    projects
        .iter()
        .filter(|project| {
            let keys = Keys::of(project);
            keys.id.contains(&term)
                || term.contains(&keys.id)
                || (!keys.title.is_empty() && keys.title.contains(&term))
                || (!keys.folder.is_empty() && keys.folder.contains(&term))
        })
        .map(|project| project.id.clone())
        .collect()
}
