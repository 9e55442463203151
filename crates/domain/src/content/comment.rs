//! Comment domain entity.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, Result};
use crate::validation::{MAX_SHORT_TEXT, bounded, non_negative, positive, require};

/// Closed set of comment types.
///
/// Each variant owns its set of required and forbidden fields, see
/// [`Comment::validate`]. A new type needs its own arm there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentKind {
    /// Free-form note.
    None,
    /// Highlight of a line range of the post.
    Highlight,
    /// Full code replacement, accepted by the post owner.
    Commit,
}

impl CommentKind {
    /// Returns the tag as stored and exchanged.
    pub fn as_str(&self) -> &'static str {
        match self {
            CommentKind::None => "none",
            CommentKind::Highlight => "highlight",
            CommentKind::Commit => "commit",
        }
    }
}

impl fmt::Display for CommentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommentKind {
    type Err = DomainError;

    fn from_str(tag: &str) -> Result<Self> {
        match tag {
            "none" => Ok(CommentKind::None),
            "highlight" => Ok(CommentKind::Highlight),
            "commit" => Ok(CommentKind::Commit),
            other => Err(DomainError::InvalidCommentType(other.to_owned())),
        }
    }
}

/// A comment attached to exactly one post.
///
/// Line numbers use `0` for absent, code uses the empty string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub owner_id: String,
    pub post_id: i64,
    #[serde(rename = "type")]
    pub kind: CommentKind,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub first_line: i32,
    #[serde(default)]
    pub last_line: i32,
    #[serde(default)]
    pub code: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Comment {
    /// Create an empty comment of the given kind on `post_id`.
    pub fn new(kind: CommentKind, post_id: i64) -> Self {
        Self {
            id: 0,
            owner_id: String::default(),
            post_id,
            kind,
            content: String::default(),
            first_line: 0,
            last_line: 0,
            code: String::default(),
            created_at: None,
            updated_at: None,
        }
    }

    /// Checks structural invariants before persistence.
    ///
    /// # Errors
    ///
    /// Returns `Err` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        non_negative(self.id, "comment id")?;
        bounded(&self.owner_id, MAX_SHORT_TEXT, "comment owner id")?;
        positive(self.post_id, "comment post id")?;

        match self.kind {
            CommentKind::None => {
                require(&self.content, "comment content")?;
                self.forbid_lines()?;
                self.forbid_code()
            },
            CommentKind::Highlight => {
                positive(self.first_line.into(), "comment first line")?;
                positive(self.last_line.into(), "comment last line")?;
                self.forbid_code()
            },
            CommentKind::Commit => {
                require(&self.code, "comment code")?;
                self.forbid_lines()
            },
        }
    }

    fn forbid_lines(&self) -> Result<()> {
        if self.first_line != 0 {
            return Err(self.forbidden("comment first line"));
        }
        if self.last_line != 0 {
            return Err(self.forbidden("comment last line"));
        }
        Ok(())
    }

    fn forbid_code(&self) -> Result<()> {
        if !self.code.is_empty() {
            return Err(self.forbidden("comment code"));
        }
        Ok(())
    }

    fn forbidden(&self, field: &'static str) -> DomainError {
        DomainError::ForbiddenField {
            field,
            kind: self.kind,
        }
    }
}
