//! User domain entity.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::validation::{MAX_SHORT_TEXT, at_most, bounded};

/// Historical Twitter limit for a handle.
pub const MAX_TWITTER_HANDLE: usize = 15;

/// Represents a registered user within the system domain.
///
/// `id` is the subject issued by the identity provider, never generated
/// locally.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub profile: String,
    #[serde(default)]
    pub twitter_handle: String,
    #[serde(default)]
    pub icon_url: String,
}

impl User {
    /// Checks structural invariants before persistence.
    ///
    /// # Errors
    ///
    /// Returns `Err` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        bounded(&self.id, MAX_SHORT_TEXT, "user id")?;
        bounded(&self.name, MAX_SHORT_TEXT, "user name")?;
        at_most(&self.twitter_handle, MAX_TWITTER_HANDLE, "user twitter handle")
    }

    /// Strips leading `@` from the twitter handle.
    pub fn normalize(&mut self) {
        self.twitter_handle = normalize_twitter_handle(&self.twitter_handle);
    }
}

/// Stored form of a twitter handle: no leading `@`.
///
/// Idempotent: a normalized handle is returned unchanged.
pub fn normalize_twitter_handle(handle: &str) -> String {
    handle.trim_start_matches('@').to_owned()
}
