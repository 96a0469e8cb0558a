//! MCP tools implementation
//!
//! Each tool declares its name, description and input schema, converts the
//! host's arguments into DocBase request parameters and renders the result.

pub mod args;
pub mod create_comment;
pub mod create_post;
pub mod get_post;
pub mod post_format;
pub mod search_posts;
pub mod update_post;
pub mod util;

#[cfg(test)]
pub(crate) mod fixtures;

use crate::docbase::DocBaseClient;
use crate::error::AppError;
use crate::mcp::ToolResult;
use args::ToolArguments;
use async_trait::async_trait;
use serde_json::{json, Value};

/// A callable exposed to the host
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// JSON schema of the accepted arguments
    fn input_schema(&self) -> Value;

    async fn call(&self, client: &DocBaseClient, args: ToolArguments) -> Result<ToolResult, AppError>;
}

static TOOLS: [&dyn Tool; 5] = [
    &get_post::GetPostTool,
    &search_posts::SearchPostsTool,
    &create_post::CreatePostTool,
    &update_post::UpdatePostTool,
    &create_comment::CreateCommentTool,
];

pub fn all() -> &'static [&'static dyn Tool] {
    &TOOLS
}

pub fn find(name: &str) -> Option<&'static dyn Tool> {
    TOOLS.iter().copied().find(|t| t.name() == name)
}

/// Tool declarations returned from tools/list
pub fn build_tools_array() -> Value {
    Value::Array(
        all()
            .iter()
            .map(|tool| {
                json!({
                    "name": tool.name(),
                    "description": tool.description(),
                    "inputSchema": tool.input_schema(),
                })
            })
            .collect(),
    )
}
