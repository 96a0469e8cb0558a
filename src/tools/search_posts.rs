//! Search tool implementation
//!
//! Implements the `search_posts(query, page, per_page)` MCP tool. The result
//! is the full DocBase response, pagination included, as pretty JSON.

use super::args::ToolArguments;
use super::util::{parse_count, DEFAULT_PAGE, DEFAULT_PER_PAGE, MAX_PER_PAGE};
use super::Tool;
use crate::cli::SearchPostsArgs;
use crate::docbase::{DocBaseClient, SearchQuery};
use crate::error::{require_non_empty, AppError};
use crate::mcp::ToolResult;
use async_trait::async_trait;
use schemars::schema_for;
use serde_json::{json, Value};
use tracing::{debug, info};

pub struct SearchPostsTool;

#[async_trait]
impl Tool for SearchPostsTool {
    fn name(&self) -> &'static str {
        "search_posts"
    }

    fn description(&self) -> &'static str {
        "Search posts in DocBase by query"
    }

    fn input_schema(&self) -> Value {
        json!(schema_for!(SearchPostsArgs))
    }

    async fn call(&self, client: &DocBaseClient, args: ToolArguments) -> Result<ToolResult, AppError> {
        let args = SearchPostsArgs {
            query: args.required_string("query")?,
            page: args.optional_string("page")?,
            per_page: args.optional_string("per_page")?,
        };
        execute_search_posts(client, args).await
    }
}

/// Convert tool arguments into a search query, applying defaults and the
/// page size ceiling
pub fn build_search_query(args: &SearchPostsArgs) -> Result<SearchQuery, AppError> {
    let q = require_non_empty("query", &args.query)?;

    let page = match args.page.as_deref() {
        Some(page) => parse_count("page", page)?,
        None => DEFAULT_PAGE,
    };

    let per_page = match args.per_page.as_deref() {
        Some(per_page) => parse_count("per_page", per_page)?.min(MAX_PER_PAGE),
        None => DEFAULT_PER_PAGE,
    };

    Ok(SearchQuery {
        q: q.to_string(),
        page,
        per_page,
    })
}

/// Execute search (shared implementation for MCP and CLI)
pub async fn execute_search_posts(
    client: &DocBaseClient,
    args: SearchPostsArgs,
) -> Result<ToolResult, AppError> {
    let query = build_search_query(&args)?;
    info!(
        "Search request: '{}' (page {}, per_page {})",
        query.q, query.page, query.per_page
    );

    let result = client.search_posts(&query).await?;
    debug!(
        "Search returned {} posts of {} total",
        result.posts.len(),
        result.meta.total
    );

    let rendered = serde_json::to_string_pretty(&result)
        .map_err(|e| AppError::Internal(format!("Failed to render search result: {}", e)))?;
    Ok(ToolResult::text(rendered))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::fixtures::{client_for, post_json, text_of};
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn search_args(query: &str, page: Option<&str>, per_page: Option<&str>) -> SearchPostsArgs {
        SearchPostsArgs {
            query: query.to_string(),
            page: page.map(str::to_string),
            per_page: per_page.map(str::to_string),
        }
    }

    #[test]
    fn test_defaults() {
        let query = build_search_query(&search_args("rust", None, None)).unwrap();
        assert_eq!(
            query,
            SearchQuery {
                q: "rust".to_string(),
                page: 1,
                per_page: 20
            }
        );
    }

    #[test]
    fn test_per_page_is_clamped() {
        let query = build_search_query(&search_args("rust", Some("3"), Some("150"))).unwrap();
        assert_eq!(query.page, 3);
        assert_eq!(query.per_page, 100);

        let query = build_search_query(&search_args("rust", None, Some("100"))).unwrap();
        assert_eq!(query.per_page, 100);
    }

    #[test]
    fn test_oversized_per_page_is_clamped() {
        let query = build_search_query(&search_args("rust", None, Some("5000000000"))).unwrap();
        assert_eq!(query.per_page, 100);
    }

    #[test]
    fn test_negative_counts_read_as_zero() {
        let query = build_search_query(&search_args("rust", Some("-2"), Some("-5"))).unwrap();
        assert_eq!(query.page, 0);
        assert_eq!(query.per_page, 0);
    }

    #[test]
    fn test_invalid_numbers_name_the_field() {
        let err = build_search_query(&search_args("rust", Some("two"), None)).unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: page must be a number");

        let err = build_search_query(&search_args("rust", None, Some("lots"))).unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: per_page must be a number");
    }

    #[test]
    fn test_empty_query_is_rejected() {
        let err = build_search_query(&search_args("", None, None)).unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: query is required");
    }

    #[tokio::test]
    async fn test_search_clamps_before_request_and_dumps_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts"))
            .and(query_param("q", "release"))
            .and(query_param("page", "1"))
            .and(query_param("per_page", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "posts": [post_json(1, "Release 1.0", "notes")],
                "meta": { "previous_page": null, "next_page": 2, "total": 150 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let args = ToolArguments::from_value(json!({
            "query": "release",
            "per_page": "150"
        }))
        .unwrap();
        let result = SearchPostsTool.call(&client_for(&server), args).await.unwrap();

        let dumped: Value = serde_json::from_str(&text_of(&result)).unwrap();
        assert_eq!(dumped["posts"][0]["title"], "Release 1.0");
        assert_eq!(dumped["meta"]["next_page"], 2);
        assert_eq!(dumped["meta"]["previous_page"], Value::Null);
        assert_eq!(dumped["meta"]["total"], 150);
    }
}
