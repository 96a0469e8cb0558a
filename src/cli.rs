//! CLI mode implementation
//!
//! The argument structs double as the MCP tool input schemas, so a tool
//! takes the same parameters from the command line and from the host.

use clap::{Args, Parser, Subcommand};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// DocBase MCP server and CLI
#[derive(Parser, Debug)]
#[command(name = "docbase-mcp")]
#[command(about = "DocBase post access over MCP (default) or the command line", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output (no short flag to avoid conflicts)
    #[arg(long, global = true)]
    pub quiet: bool,
}

/// Team and credentials, read once at startup
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// DocBase team domain (the `<domain>` in <domain>.docbase.io)
    #[arg(long, env = "DOCBASE_API_DOMAIN", default_value = "", global = true)]
    pub domain: String,

    /// DocBase API access token
    #[arg(long, env = "DOCBASE_API_TOKEN", default_value = "", hide_env_values = true, global = true)]
    pub token: String,

    /// Deadline for a single tool call, in seconds
    #[arg(long, env = "DOCBASE_TOOL_TIMEOUT_SECS", default_value_t = 120, global = true)]
    pub timeout: u64,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print a post by its ID
    GetPost(GetPostArgs),
    /// Search posts
    Search(SearchPostsArgs),
    /// Create a new post
    CreatePost(CreatePostArgs),
    /// Update an existing post
    UpdatePost(UpdatePostArgs),
    /// Add a comment to a post
    Comment(CreateCommentArgs),
}

/// get_post_by_post_id tool arguments
#[derive(Parser, JsonSchema, Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct GetPostArgs {
    /// The ID of the post to get
    #[arg(short = 'i', long)]
    pub post_id: String,
}

/// search_posts tool arguments
#[derive(Parser, JsonSchema, Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct SearchPostsArgs {
    /// The query to search for
    #[arg(short = 'q', long)]
    pub query: String,

    /// The page number (default is 1)
    #[arg(short = 'p', long)]
    pub page: Option<String>,

    /// Number of results per page (default is 20, max is 100)
    #[arg(short = 'n', long)]
    pub per_page: Option<String>,
}

/// create_post tool arguments
#[derive(Parser, JsonSchema, Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct CreatePostArgs {
    /// The title of the post
    #[arg(short = 't', long)]
    pub title: String,

    /// The body content of the post
    #[arg(short = 'b', long)]
    pub body: String,

    /// Whether the post is a draft or not (default is false)
    #[arg(long)]
    pub draft: Option<bool>,

    /// Whether to send notification or not (default is true)
    #[arg(long)]
    pub notice: Option<bool>,

    /// Comma-separated list of tags
    #[arg(long)]
    pub tags: Option<String>,

    /// Scope of the post: 'everyone', 'group', or 'private' (default is 'private')
    #[arg(long)]
    pub scope: Option<String>,

    /// Comma-separated list of group IDs (required if scope is 'group')
    #[arg(long)]
    pub groups: Option<String>,
}

/// update_post tool arguments; absent fields are left unchanged
#[derive(Parser, JsonSchema, Deserialize, Serialize, Clone, Debug, PartialEq, Default)]
pub struct UpdatePostArgs {
    /// The ID of the post to update
    #[arg(short = 'i', long)]
    pub post_id: String,

    /// The title of the post
    #[arg(short = 't', long)]
    pub title: Option<String>,

    /// The body content of the post
    #[arg(short = 'b', long)]
    pub body: Option<String>,

    /// Whether the post is a draft or not
    #[arg(long)]
    pub draft: Option<bool>,

    /// Whether to send notification or not
    #[arg(long)]
    pub notice: Option<bool>,

    /// Comma-separated list of tags
    #[arg(long)]
    pub tags: Option<String>,

    /// Scope of the post: 'everyone', 'group', or 'private'
    #[arg(long)]
    pub scope: Option<String>,

    /// Comma-separated list of group IDs (required if scope is 'group')
    #[arg(long)]
    pub groups: Option<String>,
}

/// create_comment tool arguments
#[derive(Parser, JsonSchema, Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct CreateCommentArgs {
    /// The ID of the post to comment on
    #[arg(short = 'i', long)]
    pub post_id: String,

    /// The body content of the comment
    #[arg(short = 'b', long)]
    pub body: String,

    /// Whether to send notification or not (default is true)
    #[arg(long)]
    pub notice: Option<bool>,
}
