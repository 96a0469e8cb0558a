//! DocBase API client
//!
//! One method per supported endpoint. Every request carries the team token
//! header; non-success status codes are surfaced with their numeric code.

use super::models::{
    Comment, CreateCommentParams, CreatePostParams, Post, SearchPostsResponse, SearchQuery,
    UpdatePostParams,
};
use crate::error::AppError;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

pub const TOKEN_HEADER: &str = "X-DocBaseToken";

const API_HOST: &str = "https://api.docbase.io";

/// Longest slice of an error body kept in `UnexpectedStatus`
const MAX_ERROR_BODY: usize = 512;

/// DocBase API client bound to one team
#[derive(Clone)]
pub struct DocBaseClient {
    client: reqwest::Client,
    domain: String,
    api_token: String,
    base_url: String,
}

impl DocBaseClient {
    /// Create a client for `https://api.docbase.io/teams/<domain>`
    pub fn new(domain: impl Into<String>, api_token: impl Into<String>) -> Result<Self, AppError> {
        let domain = domain.into();
        let base_url = format!("{}/teams/{}", API_HOST, domain);
        Ok(Self {
            client: crate::http::build_client()?,
            domain,
            api_token: api_token.into(),
            base_url,
        })
    }

    /// Create a client against a mock server
    #[cfg(test)]
    pub fn with_base_url(
        base_url: impl Into<String>,
        domain: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Result<Self, AppError> {
        Ok(Self {
            client: crate::http::build_client()?,
            domain: domain.into(),
            api_token: api_token.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// GET /posts/{id}
    pub async fn get_post(&self, post_id: i64) -> Result<Post, AppError> {
        let request = self.request(Method::GET, &format!("/posts/{}", post_id));
        self.send(request, &[StatusCode::OK]).await
    }

    /// GET /posts?q=&page=&per_page=
    pub async fn search_posts(&self, query: &SearchQuery) -> Result<SearchPostsResponse, AppError> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if !query.q.is_empty() {
            params.push(("q", query.q.clone()));
        }
        if query.page > 0 {
            params.push(("page", query.page.to_string()));
        }
        if query.per_page > 0 {
            params.push(("per_page", query.per_page.to_string()));
        }

        let mut request = self.request(Method::GET, "/posts");
        if !params.is_empty() {
            request = request.query(&params);
        }
        self.send(request, &[StatusCode::OK]).await
    }

    /// POST /posts
    pub async fn create_post(&self, params: &CreatePostParams) -> Result<Post, AppError> {
        let request = self.request(Method::POST, "/posts").json(params);
        self.send(request, &[StatusCode::OK, StatusCode::CREATED]).await
    }

    /// PATCH /posts/{id}
    pub async fn update_post(&self, post_id: i64, params: &UpdatePostParams) -> Result<Post, AppError> {
        let request = self
            .request(Method::PATCH, &format!("/posts/{}", post_id))
            .json(params);
        self.send(request, &[StatusCode::OK]).await
    }

    /// POST /posts/{id}/comments
    pub async fn create_comment(
        &self,
        post_id: i64,
        params: &CreateCommentParams,
    ) -> Result<Comment, AppError> {
        let request = self
            .request(Method::POST, &format!("/posts/{}/comments", post_id))
            .json(params);
        self.send(request, &[StatusCode::OK, StatusCode::CREATED]).await
    }

    // Headers go on before any body so `.json()` does not append a second Content-Type
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!("DocBase request: {} {}", method, url);
        self.client
            .request(method, url)
            .header(TOKEN_HEADER, &self.api_token)
            .header(CONTENT_TYPE, "application/json")
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        success: &[StatusCode],
    ) -> Result<T, AppError> {
        let response = request.send().await?;
        let status = response.status();
        debug!("DocBase response status: {}", status);

        if !success.contains(&status) {
            let mut body = response.text().await.unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !body.is_char_boundary(cut) {
                    cut -= 1;
                }
                body.truncate(cut);
            }
            return Err(AppError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docbase::models::Scope;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    fn post_json(id: i64, title: &str) -> serde_json::Value {
        json!({
            "id": id,
            "title": title,
            "body": "Body text",
            "draft": false,
            "archived": false,
            "url": format!("https://acme.docbase.io/posts/{}", id),
            "created_at": "2024-05-01T10:00:00+09:00",
            "updated_at": "2024-05-01T10:00:00+09:00",
            "scope": "private",
            "tags": [],
            "user": { "id": 7, "name": "alice" }
        })
    }

    async fn client_for(server: &MockServer) -> DocBaseClient {
        DocBaseClient::with_base_url(server.uri(), "acme", "secret-token").unwrap()
    }

    #[test]
    fn test_new_builds_team_base_url() {
        let client = DocBaseClient::new("example", "test-token").unwrap();
        assert_eq!(client.base_url, "https://api.docbase.io/teams/example");
        assert_eq!(client.domain, "example");
        assert_eq!(client.api_token, "test-token");
    }

    #[test]
    fn test_new_does_not_validate_inputs() {
        let client = DocBaseClient::new("", "").unwrap();
        assert_eq!(client.base_url(), "https://api.docbase.io/teams/");
        assert_eq!(client.domain(), "");
    }

    #[tokio::test]
    async fn test_get_post_sends_token_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts/42"))
            .and(header("X-DocBaseToken", "secret-token"))
            .and(header("Content-Type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(post_json(42, "Hello")))
            .expect(1)
            .mount(&server)
            .await;

        let post = client_for(&server).await.get_post(42).await.unwrap();
        assert_eq!(post.id, 42);
        assert_eq!(post.title, "Hello");
    }

    #[tokio::test]
    async fn test_get_post_not_found_is_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts/1"))
            .respond_with(ResponseTemplate::new(404).set_body_string("{\"error\":\"not_found\"}"))
            .mount(&server)
            .await;

        let err = client_for(&server).await.get_post(1).await.unwrap_err();
        match err {
            AppError::UnexpectedStatus { status, ref body } => {
                assert_eq!(status, 404);
                assert!(body.contains("not_found"));
            }
            other => panic!("expected status error, got {:?}", other),
        }
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn test_get_post_malformed_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts/1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).await.get_post(1).await.unwrap_err();
        assert!(matches!(err, AppError::Decode(_)));
    }

    #[tokio::test]
    async fn test_search_omits_empty_query_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts"))
            .respond_with(|req: &Request| {
                let body = json!({
                    "posts": [],
                    "meta": { "previous_page": null, "next_page": null, "total": 0 }
                });
                if req.url.query().is_none() {
                    ResponseTemplate::new(200).set_body_json(body)
                } else {
                    ResponseTemplate::new(400)
                }
            })
            .expect(1)
            .mount(&server)
            .await;

        let result = client_for(&server)
            .await
            .search_posts(&SearchQuery::default())
            .await
            .unwrap();
        assert!(result.posts.is_empty());
        assert_eq!(result.meta.total, 0);
    }

    #[tokio::test]
    async fn test_search_sends_query_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts"))
            .and(query_param("q", "tag:rust"))
            .and(query_param("page", "2"))
            .and(query_param("per_page", "50"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "posts": [post_json(1, "First"), post_json(2, "Second")],
                "meta": { "previous_page": 1, "next_page": null, "total": 52 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let query = SearchQuery {
            q: "tag:rust".to_string(),
            page: 2,
            per_page: 50,
        };
        let result = client_for(&server).await.search_posts(&query).await.unwrap();
        assert_eq!(result.posts.len(), 2);
        assert_eq!(result.posts[1].title, "Second");
        assert_eq!(result.meta.total, 52);
    }

    #[tokio::test]
    async fn test_create_post_accepts_created_and_echoes_tags() {
        let server = MockServer::start().await;
        let params = CreatePostParams {
            title: "Release notes".to_string(),
            body: "v1".to_string(),
            draft: false,
            notice: true,
            tags: vec!["a".to_string(), "b".to_string()],
            scope: Scope::Everyone,
            groups: vec![],
        };

        let mut echoed = post_json(10, "Release notes");
        echoed["tags"] = json!([{ "name": "a" }, { "name": "b" }]);
        echoed["scope"] = json!("everyone");

        Mock::given(method("POST"))
            .and(path("/posts"))
            .and(body_json(json!({
                "title": "Release notes",
                "body": "v1",
                "draft": false,
                "notice": true,
                "tags": ["a", "b"],
                "scope": "everyone"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(echoed))
            .expect(1)
            .mount(&server)
            .await;

        let post = client_for(&server).await.create_post(&params).await.unwrap();
        assert_eq!(post.tag_names(), vec!["a", "b"]);
        assert_eq!(post.scope, Some(Scope::Everyone));
    }

    #[tokio::test]
    async fn test_update_post_rejects_created_status() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/posts/5"))
            .and(body_json(json!({ "title": "Renamed" })))
            .respond_with(ResponseTemplate::new(201).set_body_json(post_json(5, "Renamed")))
            .mount(&server)
            .await;

        let params = UpdatePostParams {
            title: Some("Renamed".to_string()),
            ..Default::default()
        };
        let err = client_for(&server)
            .await
            .update_post(5, &params)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnexpectedStatus { status: 201, .. }));
    }

    #[tokio::test]
    async fn test_create_comment() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/posts/9/comments"))
            .and(body_json(json!({ "body": "LGTM", "notice": false })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": 300,
                "body": "LGTM",
                "created_at": "2024-05-03T09:30:00+09:00",
                "user": { "id": 7, "name": "alice" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let params = CreateCommentParams {
            body: "LGTM".to_string(),
            notice: false,
        };
        let comment = client_for(&server)
            .await
            .create_comment(9, &params)
            .await
            .unwrap();
        assert_eq!(comment.id, 300);
        assert_eq!(comment.user.name, "alice");
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        // Nothing listens on port 9 of the loopback interface
        let client = DocBaseClient::with_base_url("http://127.0.0.1:9", "acme", "t").unwrap();
        let err = client.get_post(1).await.unwrap_err();
        assert!(matches!(err, AppError::Transport(_)));
        assert!(
            err.to_string().to_lowercase().contains("connection refused"),
            "cause missing from {}",
            err
        );
    }
}
