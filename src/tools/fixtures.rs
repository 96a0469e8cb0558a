//! Shared fixtures for tool tests

use crate::docbase::DocBaseClient;
use serde_json::{json, Value};
use wiremock::MockServer;

pub fn post_json(id: i64, title: &str, body: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "body": body,
        "draft": false,
        "archived": false,
        "url": format!("https://acme.docbase.io/posts/{}", id),
        "created_at": "2024-05-01T10:00:00+09:00",
        "updated_at": "2024-05-01T12:30:00+09:00",
        "scope": "private",
        "tags": [],
        "user": { "id": 7, "name": "alice" }
    })
}

pub fn comment_json(id: i64, body: &str) -> Value {
    json!({
        "id": id,
        "body": body,
        "created_at": "2024-05-03T09:30:00+09:00",
        "user": { "id": 7, "name": "alice" }
    })
}

pub fn client_for(server: &MockServer) -> DocBaseClient {
    DocBaseClient::with_base_url(server.uri(), "acme", "secret-token").unwrap()
}

/// First text item of a tool result
pub fn text_of(result: &crate::mcp::ToolResult) -> String {
    result
        .content
        .first()
        .map(|c| c.text.clone())
        .unwrap_or_default()
}
