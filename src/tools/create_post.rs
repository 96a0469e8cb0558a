//! Create post tool implementation
//!
//! Implements the `create_post(title, body, ...)` MCP tool

use super::args::ToolArguments;
use super::post_format::format_saved_post;
use super::util::{parse_scope, require_groups, split_comma_list};
use super::Tool;
use crate::cli::CreatePostArgs;
use crate::docbase::{CreatePostParams, DocBaseClient, Scope};
use crate::error::{require_non_empty, AppError};
use crate::mcp::ToolResult;
use async_trait::async_trait;
use schemars::schema_for;
use serde_json::{json, Value};
use tracing::info;

pub struct CreatePostTool;

#[async_trait]
impl Tool for CreatePostTool {
    fn name(&self) -> &'static str {
        "create_post"
    }

    fn description(&self) -> &'static str {
        "Create a new post in DocBase"
    }

    fn input_schema(&self) -> Value {
        json!(schema_for!(CreatePostArgs))
    }

    async fn call(&self, client: &DocBaseClient, args: ToolArguments) -> Result<ToolResult, AppError> {
        let args = CreatePostArgs {
            title: args.required_string("title")?,
            body: args.required_string("body")?,
            draft: args.optional_bool("draft")?,
            notice: args.optional_bool("notice")?,
            tags: args.optional_string("tags")?,
            scope: args.optional_string("scope")?,
            groups: args.optional_string("groups")?,
        };
        execute_create_post(client, args).await
    }
}

/// Convert tool arguments into the request body.
///
/// A missing scope means `private`, not the API's own `everyone` default.
pub fn build_create_params(args: &CreatePostArgs) -> Result<CreatePostParams, AppError> {
    let title = require_non_empty("title", &args.title)?;
    let body = require_non_empty("body", &args.body)?;

    let scope = parse_scope(args.scope.as_deref())?.unwrap_or(Scope::Private);

    // groups only mean something for group-scoped posts
    let groups = if scope == Scope::Group {
        require_groups(args.groups.as_deref())?
    } else {
        Vec::new()
    };

    Ok(CreatePostParams {
        title: title.to_string(),
        body: body.to_string(),
        draft: args.draft.unwrap_or(false),
        notice: args.notice.unwrap_or(true),
        tags: args.tags.as_deref().map(split_comma_list).unwrap_or_default(),
        scope,
        groups,
    })
}

/// Execute create post (shared implementation for MCP and CLI)
pub async fn execute_create_post(
    client: &DocBaseClient,
    args: CreatePostArgs,
) -> Result<ToolResult, AppError> {
    let params = build_create_params(&args)?;
    info!("Create post request: '{}' (scope {})", params.title, params.scope);

    let post = client.create_post(&params).await?;
    info!("Created post {}", post.id);

    Ok(ToolResult::text(format_saved_post("Post created successfully!", &post)))
}
