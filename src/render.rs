// src/render.rs

//! Presenters for the filtered project list.
//!
//! Each presenter accumulates its output in a buffer that the caller prints
//! or writes wherever it needs to go.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Serialize;

use crate::error::Result;
use crate::models::ProjectRecord;
use crate::pipeline::{FilterKey, Presenter};

/// Default line template for [`TextPresenter`].
pub const DEFAULT_TEXT_TEMPLATE: &str = "{title} [{tags}]\n    {description}\n    {link}";

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{(title|description|tags|link)\}").expect("valid regex")
});

/// Escape text for HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Render one project card.
pub fn render_card(project: &ProjectRecord) -> String {
    let tags: String = project
        .tags
        .iter()
        .map(|tag| {
            let tag = escape_html(tag);
            format!(r#"<span class="linguagem-tag {tag}">{tag}</span>"#)
        })
        .collect();

    format!(
        r#"<div class="projeto-card">
    <h3>{title}</h3>
    <p>{description}</p>
    <div class="projeto-linguagens">{tags}</div>
    <a href="{link}" class="projeto-link" target="_blank" rel="noopener noreferrer">Ver detalhes</a>
</div>"#,
        title = escape_html(&project.title),
        description = escape_html(&project.description),
        link = escape_html(&project.link),
    )
}

/// Card markup for the portfolio page.
#[derive(Debug, Default)]
pub struct HtmlCardPresenter {
    output: String,
}

impl HtmlCardPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_output(self) -> String {
        self.output
    }
}

impl Presenter for HtmlCardPresenter {
    fn show_loading(&mut self) -> Result<()> {
        self.output = "<p>Carregando projetos...</p>".into();
        Ok(())
    }

    fn show_projects(&mut self, projects: &[&ProjectRecord]) -> Result<()> {
        self.output = projects
            .iter()
            .map(|project| render_card(project))
            .collect::<Vec<_>>()
            .join("\n");
        Ok(())
    }

    fn show_no_matches(&mut self, key: &FilterKey) -> Result<()> {
        self.output = format!(
            "<p>Nenhum projeto encontrado para \"{}\".</p>",
            escape_html(&key.to_string())
        );
        Ok(())
    }

    fn show_failure(&mut self, _message: &str, fallback_url: &str) -> Result<()> {
        self.output = format!(
            r#"<p>Erro ao carregar projetos. Veja <a href="{url}" target="_blank">{url}</a>.</p>"#,
            url = escape_html(fallback_url)
        );
        Ok(())
    }
}

/// Plain text listing driven by a line template.
///
/// Supported placeholders: `{title}`, `{description}`, `{tags}`, `{link}`.
#[derive(Debug)]
pub struct TextPresenter {
    template: String,
    output: String,
}

impl TextPresenter {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            output: String::new(),
        }
    }

    pub fn into_output(self) -> String {
        self.output
    }

    fn format(&self, project: &ProjectRecord) -> String {
        let tags = project.tags.iter().cloned().collect::<Vec<_>>().join(", ");

        // Single pass, so placeholders inside project text stay literal.
        PLACEHOLDER
            .replace_all(&self.template, |caps: &Captures<'_>| match &caps[1] {
                "title" => project.title.clone(),
                "description" => project.description.clone(),
                "tags" => tags.clone(),
                _ => project.link.clone(),
            })
            .into_owned()
    }
}

impl Default for TextPresenter {
    fn default() -> Self {
        Self::new(DEFAULT_TEXT_TEMPLATE)
    }
}

impl Presenter for TextPresenter {
    fn show_loading(&mut self) -> Result<()> {
        self.output = "Loading projects...".into();
        Ok(())
    }

    fn show_projects(&mut self, projects: &[&ProjectRecord]) -> Result<()> {
        self.output.clear();
        for project in projects {
            let line = self.format(project);
            self.output.push_str(&line);
            self.output.push('\n');
        }
        Ok(())
    }

    fn show_no_matches(&mut self, key: &FilterKey) -> Result<()> {
        self.output = format!("No projects match \"{key}\".");
        Ok(())
    }

    fn show_failure(&mut self, message: &str, fallback_url: &str) -> Result<()> {
        self.output = format!("Could not load projects: {message}\nSee {fallback_url}");
        Ok(())
    }
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum JsonView<'a> {
    Loading,
    Loaded { projects: &'a [&'a ProjectRecord] },
    NoMatches { filter: String },
    Failed { message: &'a str, fallback_url: &'a str },
}

/// JSON document describing the current view.
#[derive(Debug, Default)]
pub struct JsonPresenter {
    output: String,
}

impl JsonPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_output(self) -> String {
        self.output
    }

    fn write(&mut self, view: &JsonView<'_>) -> Result<()> {
        self.output = serde_json::to_string_pretty(view)?;
        Ok(())
    }
}

impl Presenter for JsonPresenter {
    fn show_loading(&mut self) -> Result<()> {
        self.write(&JsonView::Loading)
    }

    fn show_projects(&mut self, projects: &[&ProjectRecord]) -> Result<()> {
        self.write(&JsonView::Loaded { projects })
    }

    fn show_no_matches(&mut self, key: &FilterKey) -> Result<()> {
        self.write(&JsonView::NoMatches {
            filter: key.to_string(),
        })
    }

    fn show_failure(&mut self, message: &str, fallback_url: &str) -> Result<()> {
        self.write(&JsonView::Failed {
            message,
            fallback_url,
        })
    }
}
