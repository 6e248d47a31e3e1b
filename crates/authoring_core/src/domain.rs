//! crates/authoring_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or wire format; the only
//! serializable pieces are the history and comment entries, which the
//! storage boundary persists as JSON.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ports::PortError;

/// The two export shapes a project can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocType {
    /// A paginated Word-style document.
    Docx,
    /// A slide deck.
    Pptx,
}

impl DocType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocType::Docx => "docx",
            DocType::Pptx => "pptx",
        }
    }

    pub fn extension(&self) -> &'static str {
        self.as_str()
    }

    pub fn media_type(&self) -> &'static str {
        match self {
            DocType::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            DocType::Pptx => {
                "application/vnd.openxmlformats-officedocument.presentationml.presentation"
            }
        }
    }
}

impl fmt::Display for DocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocType {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "docx" => Ok(DocType::Docx),
            "pptx" => Ok(DocType::Pptx),
            _ => Err(PortError::Invalid(
                "doc_type must be 'docx' or 'pptx'".to_string(),
            )),
        }
    }
}

/// The format requested at export time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Use the project's own `DocType`.
    #[default]
    Auto,
    Docx,
    Pptx,
}

impl ExportFormat {
    /// Parses a `format` query value. Anything other than `docx`/`pptx` means `Auto`.
    pub fn parse_lenient(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("docx") => ExportFormat::Docx,
            Some("pptx") => ExportFormat::Pptx,
            _ => ExportFormat::Auto,
        }
    }

    pub fn resolve(self, project_type: DocType) -> DocType {
        match self {
            ExportFormat::Auto => project_type,
            ExportFormat::Docx => DocType::Docx,
            ExportFormat::Pptx => DocType::Pptx,
        }
    }
}

/// A document project owned by a single user.
#[derive(Debug, Clone)]
pub struct Project {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub topic: Option<String>,
    pub doc_type: DocType,
    /// Sections in the order they were created. Rendering order is decided by
    /// `Section::order` at assembly time.
    pub sections: Vec<Section>,
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// The topic used when prompting for content; falls back to the title.
    pub fn subject(&self) -> &str {
        self.topic
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(&self.title)
    }

    pub fn section(&self, section_id: Uuid) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == section_id)
    }
}

/// One unit of content: a document section or a single slide.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub content: String,
    pub order: i32,
    pub likes: u32,
    pub dislikes: u32,
    pub refinement_history: Vec<RefinementEntry>,
    pub comments: Vec<Comment>,
}

impl Section {
    /// A freshly seeded, empty section.
    pub fn seeded(project_id: Uuid, item: &OutlineItem) -> Self {
        Self {
            id: Uuid::new_v4(),
            project_id,
            title: item.title.clone(),
            content: String::new(),
            order: item.order,
            likes: 0,
            dislikes: 0,
            refinement_history: Vec::new(),
            comments: Vec::new(),
        }
    }

    /// Overwrites the content with the refinement result and records it.
    pub fn apply_refinement(&mut self, entry: RefinementEntry) {
        self.content = entry.result.clone();
        self.refinement_history.push(entry);
    }

    pub fn apply_feedback(&mut self, feedback: &Feedback) {
        match feedback.action {
            FeedbackAction::Like => self.likes = self.likes.saturating_add(1),
            FeedbackAction::Dislike => self.dislikes = self.dislikes.saturating_add(1),
            FeedbackAction::Unrecognized => {}
        }
        if let Some(comment) = feedback.comment() {
            self.comments.push(Comment {
                comment: comment.to_string(),
            });
        }
    }
}

/// A single instruction-driven rewrite of a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefinementEntry {
    pub instruction: String,
    pub result: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub comment: String,
}

/// A title and position used to seed a section at project creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineItem {
    pub title: String,
    pub order: i32,
}

/// Everything needed to create a project.
#[derive(Debug, Clone)]
pub struct NewProject {
    pub title: String,
    pub topic: Option<String>,
    pub doc_type: DocType,
    pub outline: Vec<OutlineItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackAction {
    Like,
    Dislike,
    /// Any other action: counters are left alone, a comment is still recorded.
    Unrecognized,
}

impl FeedbackAction {
    pub fn parse(action: &str) -> Self {
        match action {
            "like" => FeedbackAction::Like,
            "dislike" => FeedbackAction::Dislike,
            _ => FeedbackAction::Unrecognized,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub action: FeedbackAction,
    pub comment: Option<String>,
}

impl Feedback {
    /// The comment, if one was given and it is not blank.
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref().filter(|c| !c.is_empty())
    }
}

// Represents a user - used throughout app
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
}

// Only used internally for login/register - contains sensitive data
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub id: Uuid,
    pub email: String,
    pub hashed_password: String,
}
