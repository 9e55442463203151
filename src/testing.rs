//! Scripted services behind the HTTP routes.
//!
//! Post `1` exists and belongs to `user-1`. Every accepted mutation is
//! recorded in [`Calls`].

use std::sync::{Arc, Mutex};

use application::context::{AuthenticatedUser, Context};
use application::error::{ApplicationError, Result};
use application::ports::inbound::{
    Authenticate, ManageComments, ManagePosts, ManageUsers,
};
use async_trait::async_trait;
use domain::content::{Comment, CommentKind, Post};
use domain::error::{DomainError, Entity};
use domain::identity::User;
use domain::ownership;

use crate::AppState;
use crate::config::Configuration;

pub const TOKEN: &str = "token-user-1";
pub const STRANGER_TOKEN: &str = "token-user-2";

const OWNER: &str = "user-1";
const POST_ID: i64 = 1;

#[derive(Clone, Default)]
pub struct Calls(Arc<Mutex<Vec<String>>>);

impl Calls {
    fn push(&self, call: String) {
        self.0.lock().unwrap().push(call);
    }

    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }
}

pub fn state() -> (AppState, Calls) {
    let calls = Calls::default();
    let state = AppState {
        config: Arc::new(Configuration::default()),
        auth: Arc::new(FakeAuth),
        users: Arc::new(FakeUsers(calls.clone())),
        posts: Arc::new(FakePosts(calls.clone())),
        comments: Arc::new(FakeComments(calls.clone())),
        metrics: None,
    };
    (state, calls)
}

fn post() -> Post {
    Post {
        id: POST_ID,
        owner_id: OWNER.into(),
        title: "hello".into(),
        code: "fn main() {}".into(),
        language: "Rust".into(),
        ..Default::default()
    }
}

fn load_post(post_id: i64) -> Result<Post> {
    if post_id == POST_ID {
        Ok(post())
    } else {
        Err(ApplicationError::NotFound(Entity::Post))
    }
}

struct FakeAuth;

#[async_trait]
impl Authenticate for FakeAuth {
    async fn authenticate(
        &self,
        _ctx: &Context,
        token: &str,
    ) -> Result<AuthenticatedUser> {
        match token {
            TOKEN => Ok(AuthenticatedUser::new(OWNER)),
            STRANGER_TOKEN => Ok(AuthenticatedUser::new("user-2")),
            _ => Err(ApplicationError::Unauthorized),
        }
    }
}

struct FakeUsers(Calls);

#[async_trait]
impl ManageUsers for FakeUsers {
    async fn get(&self, _ctx: &Context, user_id: &str) -> Result<User> {
        if user_id != OWNER {
            return Err(ApplicationError::NotFound(Entity::User));
        }
        Ok(User {
            id: user_id.into(),
            name: "saboten".into(),
            ..Default::default()
        })
    }

    async fn posts(&self, _ctx: &Context, user_id: &str) -> Result<Vec<Post>> {
        Ok(vec![post()].into_iter().filter(|p| p.owner_id == user_id).collect())
    }

    async fn comments(
        &self,
        _ctx: &Context,
        _user_id: &str,
    ) -> Result<Vec<Comment>> {
        Ok(Vec::new())
    }

    async fn create(
        &self,
        _ctx: &Context,
        actor: &AuthenticatedUser,
        user: User,
    ) -> Result<User> {
        let mut user = User {
            id: actor.id().into(),
            ..user
        };
        user.validate()?;
        user.normalize();
        self.0.push(format!("users.create:{}", actor.id()));
        Ok(user)
    }

    async fn update(
        &self,
        _ctx: &Context,
        actor: &AuthenticatedUser,
        user: User,
    ) -> Result<User> {
        self.0.push(format!("users.update:{}", actor.id()));
        Ok(User {
            id: actor.id().into(),
            ..user
        })
    }

    async fn delete(&self, _ctx: &Context, actor: &AuthenticatedUser) -> Result<()> {
        self.0.push(format!("users.delete:{}", actor.id()));
        Ok(())
    }
}

struct FakePosts(Calls);

#[async_trait]
impl ManagePosts for FakePosts {
    async fn list(&self, _ctx: &Context) -> Result<Vec<Post>> {
        Ok(vec![post()])
    }

    async fn get(&self, _ctx: &Context, post_id: i64) -> Result<Post> {
        load_post(post_id)
    }

    async fn create(
        &self,
        _ctx: &Context,
        actor: &AuthenticatedUser,
        post: Post,
    ) -> Result<Post> {
        let post = Post {
            id: POST_ID,
            owner_id: actor.id().into(),
            ..post
        };
        post.validate()?;
        self.0.push(format!("posts.create:{}", actor.id()));
        Ok(post)
    }

    async fn update(
        &self,
        _ctx: &Context,
        actor: &AuthenticatedUser,
        post: Post,
    ) -> Result<Post> {
        let existing = load_post(post.id)?;
        ownership::ensure_owner(actor.id(), &existing.owner_id, Entity::Post)?;
        self.0.push(format!("posts.update:{}:{}", actor.id(), post.id));
        Ok(post)
    }

    async fn delete(
        &self,
        _ctx: &Context,
        actor: &AuthenticatedUser,
        post_id: i64,
    ) -> Result<()> {
        let existing = load_post(post_id)?;
        ownership::ensure_owner(actor.id(), &existing.owner_id, Entity::Post)?;
        self.0.push(format!("posts.delete:{}:{post_id}", actor.id()));
        Ok(())
    }
}

struct FakeComments(Calls);

#[async_trait]
impl ManageComments for FakeComments {
    async fn get(
        &self,
        _ctx: &Context,
        post_id: i64,
        comment_id: i64,
    ) -> Result<Comment> {
        load_post(post_id)?;
        Ok(Comment {
            id: comment_id,
            owner_id: OWNER.into(),
            content: "nice".into(),
            ..Comment::new(CommentKind::None, post_id)
        })
    }

    async fn list_by_post(
        &self,
        _ctx: &Context,
        post_id: i64,
    ) -> Result<Vec<Comment>> {
        load_post(post_id)?;
        Ok(Vec::new())
    }

    async fn create(
        &self,
        _ctx: &Context,
        actor: &AuthenticatedUser,
        comment: Comment,
    ) -> Result<Comment> {
        let comment = Comment {
            id: 7,
            owner_id: actor.id().into(),
            ..comment
        };
        comment.validate()?;
        let post = load_post(comment.post_id)?;
        if comment.kind == CommentKind::Commit && post.owner_id != actor.id() {
            return Err(DomainError::CannotCommit.into());
        }
        self.0.push(format!("comments.create:{}", actor.id()));
        Ok(comment)
    }

    async fn update(
        &self,
        _ctx: &Context,
        actor: &AuthenticatedUser,
        comment: Comment,
    ) -> Result<Comment> {
        load_post(comment.post_id)?;
        self.0.push(format!(
            "comments.update:{}:{}:{}",
            actor.id(),
            comment.post_id,
            comment.id
        ));
        Ok(comment)
    }

    async fn delete(
        &self,
        _ctx: &Context,
        actor: &AuthenticatedUser,
        post_id: i64,
        comment_id: i64,
    ) -> Result<()> {
        load_post(post_id)?;
        self.0.push(format!(
            "comments.delete:{}:{post_id}:{comment_id}",
            actor.id()
        ));
        Ok(())
    }
}
