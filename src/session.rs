// src/session.rs

//! Session-scoped application state.
//!
//! Every change goes through [`AppState::apply`], a pure transition. Handlers
//! dispatch an [`Action`] and then call [`AppState::render`].

use crate::error::Result;
use crate::models::ProjectRecord;
use crate::pipeline::{FilterKey, Presenter, present};

/// Color scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Overlay dialogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    Certificate,
    Map,
    Resume,
}

/// Where the canonical list is in its lifecycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded(Vec<ProjectRecord>),
    Failed {
        message: String,
        fallback_url: String,
    },
}

/// Events that change the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    ToggleTheme,
    OpenModal(Modal),
    CloseModal,
    SetFilter(FilterKey),
    LoadStarted,
    LoadSucceeded(Vec<ProjectRecord>),
    LoadFailed {
        message: String,
        fallback_url: String,
    },
}

/// State owned by the top-level controller for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    pub theme: Theme,
    pub active_modal: Option<Modal>,
    pub projects: LoadState,
    pub filter: FilterKey,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one action and return the next state.
    pub fn apply(self, action: Action) -> Self {
        match action {
            Action::ToggleTheme => Self {
                theme: self.theme.toggled(),
                ..self
            },
            Action::OpenModal(modal) => Self {
                active_modal: Some(modal),
                ..self
            },
            Action::CloseModal => Self {
                active_modal: None,
                ..self
            },
            Action::SetFilter(filter) => Self { filter, ..self },
            Action::LoadStarted => Self {
                projects: LoadState::Loading,
                ..self
            },
            Action::LoadSucceeded(projects) => Self {
                projects: LoadState::Loaded(projects),
                ..self
            },
            Action::LoadFailed {
                message,
                fallback_url,
            } => Self {
                projects: LoadState::Failed {
                    message,
                    fallback_url,
                },
                ..self
            },
        }
    }

    /// The canonical list, once loaded.
    pub fn canonical(&self) -> Option<&[ProjectRecord]> {
        match &self.projects {
            LoadState::Loaded(projects) => Some(projects),
            _ => None,
        }
    }

    /// Hand the current view to the presenter.
    pub fn render(&self, presenter: &mut dyn Presenter) -> Result<()> {
        match &self.projects {
            LoadState::Idle => Ok(()),
            LoadState::Loading => presenter.show_loading(),
            LoadState::Loaded(projects) => present(projects, &self.filter, presenter),
            LoadState::Failed {
                message,
                fallback_url,
            } => presenter.show_failure(message, fallback_url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(title: &str, tag: &str) -> ProjectRecord {
        ProjectRecord {
            title: title.to_string(),
            description: String::new(),
            tags: [tag.to_string()].into_iter().collect(),
            link: String::new(),
        }
    }

    #[derive(Default)]
    struct Log(Vec<String>);

    impl Presenter for Log {
        fn show_loading(&mut self) -> Result<()> {
            self.0.push("loading".into());
            Ok(())
        }

        fn show_projects(&mut self, projects: &[&ProjectRecord]) -> Result<()> {
            let titles: Vec<_> = projects.iter().map(|p| p.title.as_str()).collect();
            self.0.push(titles.join(","));
            Ok(())
        }

        fn show_no_matches(&mut self, key: &FilterKey) -> Result<()> {
            self.0.push(format!("none:{key}"));
            Ok(())
        }

        fn show_failure(&mut self, message: &str, fallback_url: &str) -> Result<()> {
            self.0.push(format!("failed:{message}:{fallback_url}"));
            Ok(())
        }
    }

    #[test]
    fn test_theme_toggle() {
        let state = AppState::new().apply(Action::ToggleTheme);
        assert_eq!(state.theme, Theme::Dark);
        assert_eq!(state.apply(Action::ToggleTheme).theme, Theme::Light);
    }

    #[test]
    fn test_modal_open_close() {
        let state = AppState::new().apply(Action::OpenModal(Modal::Map));
        assert_eq!(state.active_modal, Some(Modal::Map));

        let state = state.apply(Action::OpenModal(Modal::Resume));
        assert_eq!(state.active_modal, Some(Modal::Resume));

        assert_eq!(state.apply(Action::CloseModal).active_modal, None);
    }

    #[test]
    fn test_load_lifecycle_renders() {
        let mut log = Log::default();

        let state = AppState::new().apply(Action::LoadStarted);
        state.render(&mut log).unwrap();

        let state = state.apply(Action::LoadSucceeded(vec![
            project("a", "rust"),
            project("b", "go"),
        ]));
        state.render(&mut log).unwrap();

        let state = state.apply(Action::SetFilter(FilterKey::parse("go")));
        state.render(&mut log).unwrap();

        let state = state.apply(Action::SetFilter(FilterKey::parse("java")));
        state.render(&mut log).unwrap();

        assert_eq!(log.0, vec!["loading", "a,b", "b", "none:java"]);
        assert_eq!(state.canonical().map(<[_]>::len), Some(2));
    }

    #[test]
    fn test_failure_renders_fallback() {
        let mut log = Log::default();
        let state = AppState::new().apply(Action::LoadFailed {
            message: "boom".into(),
            fallback_url: "https://github.com/octocat?tab=repositories".into(),
        });

        state.render(&mut log).unwrap();

        assert!(state.canonical().is_none());
        assert_eq!(
            log.0,
            vec!["failed:boom:https://github.com/octocat?tab=repositories"]
        );
    }

    #[test]
    fn test_filter_change_keeps_theme_and_list() {
        let state = AppState::new()
            .apply(Action::ToggleTheme)
            .apply(Action::LoadSucceeded(vec![project("a", "rust")]))
            .apply(Action::SetFilter(FilterKey::parse("rust")));

        assert_eq!(state.theme, Theme::Dark);
        assert_eq!(state.canonical().unwrap().len(), 1);
    }
}
