//! Create comment tool implementation
//!
//! Implements the `create_comment(post_id, body, notice)` MCP tool

use super::args::ToolArguments;
use super::post_format::format_comment;
use super::util::parse_id;
use super::Tool;
use crate::cli::CreateCommentArgs;
use crate::docbase::{CreateCommentParams, DocBaseClient};
use crate::error::{require_non_empty, AppError};
use crate::mcp::ToolResult;
use async_trait::async_trait;
use schemars::schema_for;
use serde_json::{json, Value};
use tracing::info;

pub struct CreateCommentTool;

#[async_trait]
impl Tool for CreateCommentTool {
    fn name(&self) -> &'static str {
        "create_comment"
    }

    fn description(&self) -> &'static str {
        "Add a comment to a DocBase post"
    }

    fn input_schema(&self) -> Value {
        json!(schema_for!(CreateCommentArgs))
    }

    async fn call(&self, client: &DocBaseClient, args: ToolArguments) -> Result<ToolResult, AppError> {
        let args = CreateCommentArgs {
            post_id: args.required_string("post_id")?,
            body: args.required_string("body")?,
            notice: args.optional_bool("notice")?,
        };
        execute_create_comment(client, args).await
    }
}

pub fn build_comment_params(args: &CreateCommentArgs) -> Result<(i64, CreateCommentParams), AppError> {
    let post_id = parse_id("post_id", &args.post_id)?;
    let body = require_non_empty("body", &args.body)?;
    Ok((
        post_id,
        CreateCommentParams {
            body: body.to_string(),
            notice: args.notice.unwrap_or(true),
        },
    ))
}

/// Execute create comment (shared implementation for MCP and CLI)
pub async fn execute_create_comment(
    client: &DocBaseClient,
    args: CreateCommentArgs,
) -> Result<ToolResult, AppError> {
    let (post_id, params) = build_comment_params(&args)?;
    info!("Create comment request on post {}", post_id);

    let comment = client.create_comment(post_id, &params).await?;
    Ok(ToolResult::text(format_comment(&comment)))
}
