// src/pipeline/filter.rs

//! Filter façade between the canonical list and the presentation layer.

use std::fmt;
use std::str::FromStr;

use crate::error::Result;
use crate::models::ProjectRecord;

/// Which projects to show.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FilterKey {
    /// Every project, unchanged
    #[default]
    All,
    /// Projects carrying this exact tag
    Tag(String),
}

impl FilterKey {
    /// Parse a key as sent by the UI. `"all"` selects everything.
    pub fn parse(key: &str) -> Self {
        match key {
            "all" => Self::All,
            tag => Self::Tag(tag.to_string()),
        }
    }

    pub fn matches(&self, project: &ProjectRecord) -> bool {
        match self {
            Self::All => true,
            Self::Tag(tag) => project.has_tag(tag),
        }
    }
}

impl FromStr for FilterKey {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Tag(tag) => f.write_str(tag),
        }
    }
}

/// Projects matching `key`, in canonical order.
pub fn select<'a>(projects: &'a [ProjectRecord], key: &FilterKey) -> Vec<&'a ProjectRecord> {
    projects.iter().filter(|project| key.matches(project)).collect()
}

/// Rendering collaborator fed by the façade.
pub trait Presenter {
    /// Retrieval is in progress.
    fn show_loading(&mut self) -> Result<()>;

    /// A non-empty selection.
    fn show_projects(&mut self, projects: &[&ProjectRecord]) -> Result<()>;

    /// The filter matched nothing.
    fn show_no_matches(&mut self, key: &FilterKey) -> Result<()>;

    /// Retrieval failed; point the user at the external listing instead.
    fn show_failure(&mut self, message: &str, fallback_url: &str) -> Result<()>;
}

/// Select with `key` and hand the result to `presenter`.
pub fn present(
    projects: &[ProjectRecord],
    key: &FilterKey,
    presenter: &mut dyn Presenter,
) -> Result<()> {
    let selected = select(projects, key);
    log::debug!(
        "Filter '{}' selected {} of {} projects",
        key,
        selected.len(),
        projects.len()
    );

    if selected.is_empty() {
        presenter.show_no_matches(key)
    } else {
        presenter.show_projects(&selected)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn project(title: &str, tags: &[&str]) -> ProjectRecord {
        ProjectRecord {
            title: title.to_string(),
            description: String::new(),
            tags: tags.iter().map(|t| t.to_string()).collect::<BTreeSet<_>>(),
            link: format!("https://github.com/octocat/{title}"),
        }
    }

    fn sample() -> Vec<ProjectRecord> {
        vec![
            project("first", &["python"]),
            project("second", &["aws"]),
            project("third", &["python", "aws"]),
        ]
    }

    #[derive(Default)]
    struct Recorder {
        shown: Vec<String>,
        empty: Option<FilterKey>,
    }

    impl Presenter for Recorder {
        fn show_loading(&mut self) -> Result<()> {
            Ok(())
        }

        fn show_projects(&mut self, projects: &[&ProjectRecord]) -> Result<()> {
            self.shown = projects.iter().map(|p| p.title.clone()).collect();
            Ok(())
        }

        fn show_no_matches(&mut self, key: &FilterKey) -> Result<()> {
            self.empty = Some(key.clone());
            Ok(())
        }

        fn show_failure(&mut self, _message: &str, _fallback_url: &str) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_select_by_tag_keeps_order() {
        let projects = sample();
        let selected = select(&projects, &FilterKey::parse("python"));
        let titles: Vec<_> = selected.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "third"]);
    }

    #[test]
    fn test_select_all_returns_everything() {
        let projects = sample();
        let selected = select(&projects, &FilterKey::parse("all"));
        assert_eq!(selected.len(), 3);
        for (selected, original) in selected.iter().zip(&projects) {
            assert_eq!(*selected, original);
        }
    }

    #[test]
    fn test_select_is_case_sensitive() {
        let projects = sample();
        assert!(select(&projects, &FilterKey::parse("Python")).is_empty());
    }

    #[test]
    fn test_present_empty_selection() {
        let projects = sample();
        let mut recorder = Recorder::default();

        present(&projects, &FilterKey::parse("rust"), &mut recorder).unwrap();

        assert!(recorder.shown.is_empty());
        assert_eq!(recorder.empty, Some(FilterKey::Tag("rust".into())));
    }

    #[test]
    fn test_present_forwards_selection() {
        let projects = sample();
        let mut recorder = Recorder::default();

        present(&projects, &FilterKey::Tag("aws".into()), &mut recorder).unwrap();

        assert_eq!(recorder.shown, vec!["second", "third"]);
    }

    #[test]
    fn test_filter_key_display_roundtrip() {
        assert_eq!(FilterKey::All.to_string(), "all");
        assert_eq!("spark".parse::<FilterKey>().unwrap(), FilterKey::Tag("spark".into()));
    }
}
