//! Database models for PostgreSQL.

use application::error::{Result, ToInternal};
use chrono::{DateTime, Utc};
use domain::content::{Comment, CommentKind, Post};
use domain::identity::User;
use sqlx::FromRow;

/// User record as stored in the database.
#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub profile: String,
    /// `NULL` when the user has no handle, so the unique index ignores it.
    pub twitter_handle: Option<String>,
}

/// Post record as stored in the database.
#[derive(Debug, Clone, FromRow)]
pub struct PostRecord {
    pub id: i64,
    pub user_id: String,
    pub title: String,
    pub code: String,
    pub language: String,
    pub content: String,
    pub source: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Comment record as stored in the database.
#[derive(Debug, Clone, FromRow)]
pub struct CommentRecord {
    pub id: i64,
    pub user_id: String,
    pub post_id: i64,
    pub r#type: String,
    pub content: String,
    pub first_line: i32,
    pub last_line: i32,
    pub code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            profile: record.profile,
            twitter_handle: record.twitter_handle.unwrap_or_default(),
            icon_url: String::default(),
        }
    }
}

impl From<&User> for UserRecord {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            profile: user.profile.clone(),
            twitter_handle: Some(user.twitter_handle.clone())
                .filter(|handle| !handle.is_empty()),
        }
    }
}

impl From<PostRecord> for Post {
    fn from(record: PostRecord) -> Self {
        Self {
            id: record.id,
            owner_id: record.user_id,
            title: record.title,
            code: record.code,
            language: record.language,
            content: record.content,
            source: record.source,
            created_at: Some(record.created_at),
            updated_at: Some(record.updated_at),
        }
    }
}

impl CommentRecord {
    /// Convert to [`Comment`].
    ///
    /// Fails on a type tag outside the known set.
    pub fn try_into_comment(self) -> Result<Comment> {
        Ok(Comment {
            id: self.id,
            owner_id: self.user_id,
            post_id: self.post_id,
            kind: self.r#type.parse::<CommentKind>().catch()?,
            content: self.content,
            first_line: self.first_line,
            last_line: self.last_line,
            code: self.code,
            created_at: Some(self.created_at),
            updated_at: Some(self.updated_at),
        })
    }
}

#[cfg(test)]
mod tests {
    use application::error::ApplicationError;

    use super::*;

    fn comment_record(tag: &str) -> CommentRecord {
        CommentRecord {
            id: 3,
            user_id: "user-1".into(),
            post_id: 1,
            r#type: tag.into(),
            content: String::new(),
            first_line: 10,
            last_line: 12,
            code: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_handle_is_null() {
        let user = User {
            id: "user-1".into(),
            name: "saboten".into(),
            ..Default::default()
        };
        assert_eq!(UserRecord::from(&user).twitter_handle, None);

        let user = User {
            twitter_handle: "saboten".into(),
            ..user
        };
        let record = UserRecord::from(&user);
        assert_eq!(record.twitter_handle.as_deref(), Some("saboten"));
        assert_eq!(User::from(record), user);
    }

    #[test]
    fn test_comment_record() {
        let comment = comment_record("highlight").try_into_comment().unwrap();
        assert_eq!(comment.kind, CommentKind::Highlight);
        assert_eq!(comment.owner_id, "user-1");
        assert_eq!((comment.first_line, comment.last_line), (10, 12));

        assert!(matches!(
            comment_record("review").try_into_comment(),
            Err(ApplicationError::Internal(_))
        ));
    }
}
