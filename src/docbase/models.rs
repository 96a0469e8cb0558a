//! DocBase API request and response records

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A post as returned by the DocBase API
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub tags: Vec<Tag>,
    pub user: User,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<Scope>,
}

impl Post {
    pub fn tag_names(&self) -> Vec<&str> {
        self.tags.iter().map(|t| t.name.as_str()).collect()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct User {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Tag {
    pub name: String,
}

/// Search endpoint response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchPostsResponse {
    pub posts: Vec<Post>,
    pub meta: Meta,
}

/// Pagination metadata
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Meta {
    pub previous_page: Option<PageRef>,
    pub next_page: Option<PageRef>,
    #[serde(default)]
    pub total: u64,
}

/// Neighbouring page reference. The API documents page URLs, older
/// responses carry bare page numbers.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum PageRef {
    Number(u32),
    Url(String),
}

/// Search parameters; zero or empty values are left out of the query string
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    pub q: String,
    /// 1-indexed
    pub page: u32,
    pub per_page: u32,
}

/// Post visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Everyone,
    Group,
    Private,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Everyone => "everyone",
            Scope::Group => "group",
            Scope::Private => "private",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownScope(pub String);

impl fmt::Display for UnknownScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "scope must be one of 'everyone', 'group', or 'private' (got '{}')",
            self.0
        )
    }
}

impl FromStr for Scope {
    type Err = UnknownScope;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "everyone" => Ok(Scope::Everyone),
            "group" => Ok(Scope::Group),
            "private" => Ok(Scope::Private),
            other => Err(UnknownScope(other.to_string())),
        }
    }
}

/// Body of POST /posts
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CreatePostParams {
    pub title: String,
    pub body: String,
    pub draft: bool,
    pub notice: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub scope: Scope,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<i64>,
}

/// Body of PATCH /posts/{id}; `None` fields are left unchanged upstream
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct UpdatePostParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<Scope>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<i64>>,
}

/// Body of POST /posts/{id}/comments
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CreateCommentParams {
    pub body: String,
    pub notice: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Comment {
    pub id: i64,
    pub body: String,
    pub created_at: DateTime<FixedOffset>,
    pub user: User,
}
