//! Markup and plain-text rendering of tasks.
//!
//! Every renderer produces both representations at once: the chat transport
//! sends the markup and falls back to the text for clients without HTML.
//! Titles and notes are emitted verbatim.

use chrono::{DateTime, Utc};

use super::tree::{NodeId, TaskTree};
use super::urgency::{classify, relative_phrase};
use super::TaskRecord;

const FAVORITE_MARKER: &str = "⭐ ";
const LINK_INDENT: &str = "         ";
const NOTES_SEPARATOR: &str = "------------";

/// A pair of parallel renderings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendered {
    pub html: String,
    pub text: String,
}

impl Rendered {
    pub fn new(html: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            text: text.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.html.is_empty() && self.text.is_empty()
    }

    pub fn push(&mut self, other: &Rendered) {
        self.html.push_str(&other.html);
        self.text.push_str(&other.text);
    }

    pub fn push_str(&mut self, html: &str, text: &str) {
        self.html.push_str(html);
        self.text.push_str(text);
    }
}

/// Header pieces shared by the summary and detail views.
struct Heading {
    marker: &'static str,
    favorite: &'static str,
    html_title: String,
    text_title: String,
    due_phrase: Option<String>,
}

impl Heading {
    fn of(task: &TaskRecord, now: DateTime<Utc>) -> Self {
        let (html_title, text_title) = if task.completed {
            (format!("<s>{}</s>", task.title), format!("{} (completed)", task.title))
        } else {
            (task.title.clone(), task.title.clone())
        };

        Self {
            marker: classify(task.due, task.completed, now).marker(),
            favorite: if task.favorite { FAVORITE_MARKER } else { "" },
            html_title,
            text_title,
            // completed tasks do not advertise their deadline
            due_phrase: task
                .due
                .filter(|_| !task.completed)
                .map(|due| relative_phrase(due, now)),
        }
    }
}

/// One-line summary of `node` followed by its subtasks.
///
/// `depth` only drives indentation; records rendered at depth 0 never get a
/// branch glyph, which is how orphans hide their dangling parent link.
pub fn render_summary(tree: &TaskTree, node: NodeId, depth: usize, now: DateTime<Utc>) -> Rendered {
    let task = tree.record(node);
    let heading = Heading::of(task, now);

    let prefix = if depth > 0 {
        format!("{}└ ", " ".repeat(depth))
    } else {
        String::new()
    };

    let mut html_subtitle = String::new();
    let mut text_subtitle = String::new();
    if let Some(phrase) = &heading.due_phrase {
        html_subtitle.push_str(&format!(" <i>due {phrase}</i>"));
        text_subtitle.push_str(&format!(" (due {phrase})"));
    }
    for link in &task.links {
        html_subtitle.push_str(&format!(
            "\n<br/>{LINK_INDENT}<i>{} <a href=\"{}\">{}</a></i>",
            link.kind, link.url, link.description
        ));
        text_subtitle.push_str(&format!(
            "\n{LINK_INDENT}{} {} {}",
            link.kind, link.description, link.url
        ));
    }

    let mut rendered = Rendered::new(
        format!(
            "{prefix}{} {}{}{html_subtitle}<br/>",
            heading.marker, heading.favorite, heading.html_title
        ),
        format!(
            "{prefix}{} {}{}{text_subtitle}\n",
            heading.marker, heading.favorite, heading.text_title
        ),
    );

    for child in tree.children(node) {
        let sub = render_summary(tree, *child, depth + 1, now);
        rendered.push_str("\n<br/>", "\n");
        rendered.push(&sub);
    }

    rendered
}

/// Detail view of a single task: heading, deadline, links, then the notes.
pub fn render_full(task: &TaskRecord, now: DateTime<Utc>) -> Rendered {
    let heading = Heading::of(task, now);

    let mut html_subtitle = String::new();
    let mut text_subtitle = String::new();
    if let Some(phrase) = &heading.due_phrase {
        html_subtitle.push_str(&format!("📅 due {phrase}<br/>"));
        text_subtitle.push_str(&format!("📅 due {phrase}"));
    }
    for link in &task.links {
        html_subtitle.push_str(&format!(
            "{LINK_INDENT}<i>{} <a href=\"{}\">{}</a></i><br/>",
            link.kind, link.url, link.description
        ));
        text_subtitle.push_str(&format!(
            "\n{LINK_INDENT}{} {} {}",
            link.kind, link.description, link.url
        ));
    }

    Rendered::new(
        format!(
            "<hr/><h3>{} {}{}</h3>{html_subtitle}{NOTES_SEPARATOR}<br/>{}",
            heading.marker, heading.favorite, heading.html_title, task.notes
        ),
        format!(
            "{} {}{}\n{text_subtitle}\n{}",
            heading.marker, heading.favorite, heading.text_title, task.notes
        ),
    )
}
