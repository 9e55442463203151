//! Post domain entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::validation::{MAX_SHORT_TEXT, at_most, bounded, non_negative, require};

/// Maximum length of the `source` field (usually an URL).
pub const MAX_SOURCE: usize = 2048;

/// A code snippet published by a user.
///
/// `id` is assigned by the store; `0` means not persisted yet.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub owner_id: String,
    pub title: String,
    pub code: String,
    pub language: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub source: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Post {
    /// Checks structural invariants before persistence.
    ///
    /// # Errors
    ///
    /// Returns `Err` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        non_negative(self.id, "post id")?;
        bounded(&self.owner_id, MAX_SHORT_TEXT, "post owner id")?;
        bounded(&self.title, MAX_SHORT_TEXT, "post title")?;
        require(&self.code, "post code")?;
        bounded(&self.language, MAX_SHORT_TEXT, "post language")?;
        at_most(&self.source, MAX_SOURCE, "post source")
    }
}
