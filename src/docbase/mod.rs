//! DocBase REST API access

pub mod client;
pub mod models;

pub use client::DocBaseClient;
pub use models::{
    Comment, CreateCommentParams, CreatePostParams, Post, Scope, SearchQuery, UpdatePostParams,
};
