//! Get post tool implementation
//!
//! Implements the `get_post_by_post_id(post_id)` MCP tool

use super::args::ToolArguments;
use super::post_format::format_post;
use super::util::parse_id;
use super::Tool;
use crate::cli::GetPostArgs;
use crate::docbase::DocBaseClient;
use crate::error::AppError;
use crate::mcp::ToolResult;
use async_trait::async_trait;
use schemars::schema_for;
use serde_json::{json, Value};
use tracing::info;

pub struct GetPostTool;

#[async_trait]
impl Tool for GetPostTool {
    fn name(&self) -> &'static str {
        "get_post_by_post_id"
    }

    fn description(&self) -> &'static str {
        "Get post from docbase by post ID"
    }

    fn input_schema(&self) -> Value {
        json!(schema_for!(GetPostArgs))
    }

    async fn call(&self, client: &DocBaseClient, args: ToolArguments) -> Result<ToolResult, AppError> {
        let args = GetPostArgs {
            post_id: args.required_string("post_id")?,
        };
        execute_get_post(client, args).await
    }
}

/// Execute get post (shared implementation for MCP and CLI)
pub async fn execute_get_post(client: &DocBaseClient, args: GetPostArgs) -> Result<ToolResult, AppError> {
    let post_id = parse_id("post_id", &args.post_id)?;
    info!("Get post request for id: {}", post_id);

    let post = client.get_post(post_id).await?;
    Ok(ToolResult::text(format_post(&post)))
}
