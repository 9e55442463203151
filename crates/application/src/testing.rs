//! In-memory doubles of the outbound ports.

use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use domain::content::{Comment, Post};
use domain::error::Entity;
use domain::identity::User;

use crate::context::Context;
use crate::error::{ApplicationError, Result};
use crate::ports::outbound::{
    CommentRepository, IdentityGateway, PostRepository, TelemetryPort,
    Transaction, TransactionCoordinator, UserRepository,
};

#[derive(Debug)]
struct StoreDown;

impl std::fmt::Display for StoreDown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "connection refused")
    }
}

impl std::error::Error for StoreDown {}

fn unavailable() -> ApplicationError {
    ApplicationError::unavailable(StoreDown)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxEvent {
    Begin,
    Commit,
    Rollback,
}

#[derive(Clone, Default)]
pub struct FakeCoordinator {
    events: Arc<Mutex<Vec<TxEvent>>>,
    fail_commit: bool,
}

impl FakeCoordinator {
    pub fn failing_commit() -> Self {
        Self {
            fail_commit: true,
            ..Default::default()
        }
    }

    pub fn events(&self) -> Vec<TxEvent> {
        self.events.lock().unwrap().clone()
    }
}

pub struct FakeTransaction {
    events: Arc<Mutex<Vec<TxEvent>>>,
    fail_commit: bool,
}

#[async_trait]
impl Transaction for FakeTransaction {
    fn as_any(&mut self) -> &mut (dyn Any + Send) {
        self
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        self.events.lock().unwrap().push(TxEvent::Commit);
        if self.fail_commit {
            self.events.lock().unwrap().push(TxEvent::Rollback);
            return Err(unavailable());
        }
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        self.events.lock().unwrap().push(TxEvent::Rollback);
        Ok(())
    }
}

#[async_trait]
impl TransactionCoordinator for FakeCoordinator {
    async fn begin(&self, ctx: &Context) -> Result<Box<dyn Transaction>> {
        ctx.ensure_active()?;
        self.events.lock().unwrap().push(TxEvent::Begin);
        Ok(Box::new(FakeTransaction {
            events: Arc::clone(&self.events),
            fail_commit: self.fail_commit,
        }))
    }
}

#[derive(Clone, Default)]
pub struct InMemoryUsers {
    pub rows: Arc<Mutex<HashMap<String, User>>>,
    pub writes: Arc<Mutex<usize>>,
    /// Whether each delete ran inside a transaction.
    pub deletes: Arc<Mutex<Vec<bool>>>,
    pub fail_delete: bool,
}

impl InMemoryUsers {
    pub fn with(users: impl IntoIterator<Item = User>) -> Self {
        let store = Self::default();
        store.rows.lock().unwrap().extend(
            users.into_iter().map(|user| (user.id.clone(), user)),
        );
        store
    }

    pub fn writes(&self) -> usize {
        *self.writes.lock().unwrap()
    }

    pub fn deletes(&self) -> Vec<bool> {
        self.deletes.lock().unwrap().clone()
    }
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn find_by_id(&self, ctx: &Context, id: &str) -> Result<Option<User>> {
        ctx.ensure_active()?;
        Ok(self.rows.lock().unwrap().get(id).cloned())
    }

    async fn insert(&self, ctx: &Context, user: &User) -> Result<()> {
        ctx.ensure_active()?;
        let mut rows = self.rows.lock().unwrap();
        if rows.contains_key(&user.id) {
            return Err(ApplicationError::Duplicate {
                entity: Entity::User,
                field: "id",
            });
        }
        rows.insert(user.id.clone(), user.clone());
        *self.writes.lock().unwrap() += 1;
        Ok(())
    }

    async fn update(&self, ctx: &Context, user: &User) -> Result<()> {
        ctx.ensure_active()?;
        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(&user.id) {
            Some(row) => *row = user.clone(),
            None => return Err(ApplicationError::NotFound(Entity::User)),
        }
        *self.writes.lock().unwrap() += 1;
        Ok(())
    }

    async fn delete(
        &self,
        ctx: &Context,
        id: &str,
        tx: Option<&mut dyn Transaction>,
    ) -> Result<()> {
        ctx.ensure_active()?;
        self.deletes.lock().unwrap().push(tx.is_some());
        if self.fail_delete {
            return Err(unavailable());
        }
        self.rows.lock().unwrap().remove(id);
        *self.writes.lock().unwrap() += 1;
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryPosts {
    pub rows: Arc<Mutex<BTreeMap<i64, Post>>>,
    pub writes: Arc<Mutex<usize>>,
}

impl InMemoryPosts {
    pub fn with(posts: impl IntoIterator<Item = Post>) -> Self {
        let store = Self::default();
        store
            .rows
            .lock()
            .unwrap()
            .extend(posts.into_iter().map(|post| (post.id, post)));
        store
    }

    pub fn writes(&self) -> usize {
        *self.writes.lock().unwrap()
    }
}

#[async_trait]
impl PostRepository for InMemoryPosts {
    async fn find_all(&self, ctx: &Context) -> Result<Vec<Post>> {
        ctx.ensure_active()?;
        Ok(self.rows.lock().unwrap().values().rev().cloned().collect())
    }

    async fn find_by_id(&self, ctx: &Context, id: i64) -> Result<Option<Post>> {
        ctx.ensure_active()?;
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_owner(
        &self,
        ctx: &Context,
        owner_id: &str,
    ) -> Result<Vec<Post>> {
        ctx.ensure_active()?;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|post| post.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn insert(&self, ctx: &Context, post: &Post) -> Result<Post> {
        ctx.ensure_active()?;
        let mut rows = self.rows.lock().unwrap();
        let id = rows.keys().next_back().copied().unwrap_or_default() + 1;
        let post = Post { id, ..post.clone() };
        rows.insert(id, post.clone());
        *self.writes.lock().unwrap() += 1;
        Ok(post)
    }

    async fn update(&self, ctx: &Context, post: &Post) -> Result<Post> {
        ctx.ensure_active()?;
        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(&post.id) {
            Some(row) => *row = post.clone(),
            None => return Err(ApplicationError::NotFound(Entity::Post)),
        }
        *self.writes.lock().unwrap() += 1;
        Ok(post.clone())
    }

    async fn delete(&self, ctx: &Context, id: i64) -> Result<()> {
        ctx.ensure_active()?;
        self.rows
            .lock()
            .unwrap()
            .remove(&id)
            .ok_or(ApplicationError::NotFound(Entity::Post))?;
        *self.writes.lock().unwrap() += 1;
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryComments {
    pub rows: Arc<Mutex<BTreeMap<i64, Comment>>>,
    pub writes: Arc<Mutex<usize>>,
}

impl InMemoryComments {
    pub fn with(comments: impl IntoIterator<Item = Comment>) -> Self {
        let store = Self::default();
        store.rows.lock().unwrap().extend(
            comments.into_iter().map(|comment| (comment.id, comment)),
        );
        store
    }

    pub fn writes(&self) -> usize {
        *self.writes.lock().unwrap()
    }
}

#[async_trait]
impl CommentRepository for InMemoryComments {
    async fn find_by_id(
        &self,
        ctx: &Context,
        post_id: i64,
        comment_id: i64,
    ) -> Result<Option<Comment>> {
        ctx.ensure_active()?;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .get(&comment_id)
            .filter(|comment| comment.post_id == post_id)
            .cloned())
    }

    async fn find_by_post(
        &self,
        ctx: &Context,
        post_id: i64,
    ) -> Result<Vec<Comment>> {
        ctx.ensure_active()?;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|comment| comment.post_id == post_id)
            .cloned()
            .collect())
    }

    async fn find_by_owner(
        &self,
        ctx: &Context,
        owner_id: &str,
    ) -> Result<Vec<Comment>> {
        ctx.ensure_active()?;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|comment| comment.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn insert(&self, ctx: &Context, comment: &Comment) -> Result<Comment> {
        ctx.ensure_active()?;
        let mut rows = self.rows.lock().unwrap();
        let id = rows.keys().next_back().copied().unwrap_or_default() + 1;
        let comment = Comment {
            id,
            ..comment.clone()
        };
        rows.insert(id, comment.clone());
        *self.writes.lock().unwrap() += 1;
        Ok(comment)
    }

    async fn update(&self, ctx: &Context, comment: &Comment) -> Result<Comment> {
        ctx.ensure_active()?;
        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(&comment.id) {
            Some(row) => *row = comment.clone(),
            None => return Err(ApplicationError::NotFound(Entity::Comment)),
        }
        *self.writes.lock().unwrap() += 1;
        Ok(comment.clone())
    }

    async fn delete(
        &self,
        ctx: &Context,
        _post_id: i64,
        comment_id: i64,
    ) -> Result<()> {
        ctx.ensure_active()?;
        self.rows
            .lock()
            .unwrap()
            .remove(&comment_id)
            .ok_or(ApplicationError::NotFound(Entity::Comment))?;
        *self.writes.lock().unwrap() += 1;
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct FakeIdentity {
    pub tokens: HashMap<String, String>,
    pub icons: HashMap<String, String>,
    pub deleted: Arc<Mutex<Vec<String>>>,
    pub fail_icon: bool,
    pub fail_delete: bool,
}

impl FakeIdentity {
    pub fn with_token(token: &str, user_id: &str) -> Self {
        Self {
            tokens: HashMap::from([(token.to_owned(), user_id.to_owned())]),
            ..Default::default()
        }
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl IdentityGateway for FakeIdentity {
    async fn authenticate(&self, ctx: &Context, token: &str) -> Result<String> {
        ctx.ensure_active()?;
        self.tokens.get(token).cloned().ok_or_else(unavailable)
    }

    async fn display_icon(&self, ctx: &Context, user_id: &str) -> Result<String> {
        ctx.ensure_active()?;
        if self.fail_icon {
            return Err(unavailable());
        }
        Ok(self.icons.get(user_id).cloned().unwrap_or_default())
    }

    async fn delete_identity(&self, ctx: &Context, user_id: &str) -> Result<()> {
        ctx.ensure_active()?;
        if self.fail_delete {
            return Err(unavailable());
        }
        self.deleted.lock().unwrap().push(user_id.to_owned());
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct RecordingTelemetry {
    pub events: Arc<Mutex<Vec<String>>>,
}

impl RecordingTelemetry {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl TelemetryPort for RecordingTelemetry {
    fn record_auth_failure(&self, reason: &str) {
        self.events.lock().unwrap().push(format!("auth_failure:{reason}"));
    }

    fn record_created(&self, entity: Entity, owner_id: &str) {
        self.events
            .lock()
            .unwrap()
            .push(format!("created:{entity}:{owner_id}"));
    }

    fn record_access_denied(&self, entity: Entity, user_id: &str, reason: &str) {
        self.events
            .lock()
            .unwrap()
            .push(format!("denied:{entity}:{user_id}:{reason}"));
    }

    fn record_partial_failure(&self, user_id: &str) {
        self.events
            .lock()
            .unwrap()
            .push(format!("partial_failure:{user_id}"));
    }
}
