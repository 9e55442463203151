//! Published code snippets and the comments attached to them.

pub mod comment;
pub mod post;

pub use comment::*;
pub use post::*;
