//! Update post tool implementation
//!
//! Implements the `update_post(post_id, ...)` MCP tool. Only arguments that
//! are present reach the PATCH body.

use super::args::ToolArguments;
use super::post_format::format_saved_post;
use super::util::{non_empty, parse_id, parse_scope, require_groups, split_comma_list};
use super::Tool;
use crate::cli::UpdatePostArgs;
use crate::docbase::{DocBaseClient, Scope, UpdatePostParams};
use crate::error::AppError;
use crate::mcp::ToolResult;
use async_trait::async_trait;
use schemars::schema_for;
use serde_json::{json, Value};
use tracing::{debug, info};

pub struct UpdatePostTool;

#[async_trait]
impl Tool for UpdatePostTool {
    fn name(&self) -> &'static str {
        "update_post"
    }

    fn description(&self) -> &'static str {
        "Update an existing post in DocBase"
    }

    fn input_schema(&self) -> Value {
        json!(schema_for!(UpdatePostArgs))
    }

    async fn call(&self, client: &DocBaseClient, args: ToolArguments) -> Result<ToolResult, AppError> {
        let args = UpdatePostArgs {
            post_id: args.required_string("post_id")?,
            title: args.optional_string("title")?,
            body: args.optional_string("body")?,
            draft: args.optional_bool("draft")?,
            notice: args.optional_bool("notice")?,
            tags: args.optional_string("tags")?,
            scope: args.optional_string("scope")?,
            groups: args.optional_string("groups")?,
        };
        execute_update_post(client, args).await
    }
}

/// Convert tool arguments into the post ID and PATCH body
pub fn build_update_params(args: &UpdatePostArgs) -> Result<(i64, UpdatePostParams), AppError> {
    let post_id = parse_id("post_id", &args.post_id)?;

    let scope = parse_scope(args.scope.as_deref())?;
    let groups = match scope {
        Some(Scope::Group) => Some(require_groups(args.groups.as_deref())?),
        _ => None,
    };

    let tags = non_empty(args.tags.clone()).map(|t| split_comma_list(&t));

    let params = UpdatePostParams {
        title: non_empty(args.title.clone()),
        body: non_empty(args.body.clone()),
        draft: args.draft,
        notice: args.notice,
        tags,
        scope,
        groups,
    };
    Ok((post_id, params))
}

/// Execute update post (shared implementation for MCP and CLI)
pub async fn execute_update_post(
    client: &DocBaseClient,
    args: UpdatePostArgs,
) -> Result<ToolResult, AppError> {
    let (post_id, params) = build_update_params(&args)?;
    info!("Update post request for id: {}", post_id);
    debug!("Update fields: {:?}", params);

    let post = client.update_post(post_id, &params).await?;
    Ok(ToolResult::text(format_saved_post("Post updated successfully!", &post)))
}
