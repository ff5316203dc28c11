//! Client for the collaboration host's discussion endpoints.
//!
//! [`DiscussionHost`] is the seam the lookup strategies and link sync talk
//! to; [`GitHubClient`] implements it over three anonymous endpoints:
//!
//! - `POST {api}/graphql`: recency-ordered discussion listing
//! - `GET {api}/repos/{owner}/{repo}/issues/{n}`: one numbered thread
//! - `GET {api}/search/issues?q=...`: text search
//!
//! Every body is decoded into explicit response types. A body that does not
//! fit is an [`Error::Parse`], never an empty success.

use crate::config::{LookupConfig, RepositoryConfig};
use crate::rate_limit::RateLimitGuard;
use crate::types::DiscussionSummary;
use crate::{Error, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

const ACCEPT_GITHUB_JSON: &str = "application/vnd.github.v3+json";
const DISCUSSIONS_SEGMENT: &str = "/discussions/";

const LIST_DISCUSSIONS_QUERY: &str = r"
query($owner: String!, $repo: String!, $first: Int!, $cursor: String) {
  repository(owner: $owner, name: $repo) {
    discussions(first: $first, after: $cursor, orderBy: {field: UPDATED_AT, direction: DESC}) {
      pageInfo {
        hasNextPage
        endCursor
      }
      nodes {
        title
        number
        url
        updatedAt
        category {
          name
        }
      }
    }
  }
}
";

/// One page of the bulk discussion listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscussionPage {
    /// Discussions on this page, most recently updated first.
    pub discussions: Vec<DiscussionSummary>,
    /// Cursor for the next page, when one exists.
    pub next_cursor: Option<String>,
}

/// A numbered thread fetched from the per-item endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ThreadItem {
    /// Thread number.
    pub number: u64,
    /// Thread title.
    pub title: String,
    /// Canonical web URL.
    pub html_url: String,
}

impl ThreadItem {
    /// True when the canonical URL points at a discussion rather than an issue.
    #[must_use]
    pub fn is_discussion(&self) -> bool {
        is_discussion_url(&self.html_url)
    }
}

/// One text-search result.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchItem {
    /// Item title.
    pub title: String,
    /// Canonical web URL.
    pub html_url: String,
    /// Creation time.
    pub created_at: Option<DateTime<Utc>>,
    /// Thread number.
    #[serde(default)]
    pub number: Option<u64>,
}

impl SearchItem {
    /// True when the result is a discussion rather than an issue or PR.
    #[must_use]
    pub fn is_discussion(&self) -> bool {
        is_discussion_url(&self.html_url)
    }
}

impl From<SearchItem> for DiscussionSummary {
    fn from(item: SearchItem) -> Self {
        Self {
            title: item.title,
            url: item.html_url,
            number: item.number,
            updated_at: item.created_at,
            category: None,
        }
    }
}

/// Returns true when a URL has a discussions path segment.
#[must_use]
pub fn is_discussion_url(url: &str) -> bool {
    url.contains(DISCUSSIONS_SEGMENT)
}

/// Read access to a repository's discussions.
#[async_trait]
pub trait DiscussionHost: Send + Sync {
    /// Fetch one page of discussions ordered by most recent update.
    async fn list_discussions(&self, first: u32, after: Option<&str>) -> Result<DiscussionPage>;

    /// Fetch a numbered thread (issue or discussion).
    async fn fetch_thread(&self, number: u64) -> Result<ThreadItem>;

    /// Run a text-search query.
    async fn search(&self, query: &str) -> Result<Vec<SearchItem>>;
}

/// Anonymous GitHub API client.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    api_base: String,
    owner: String,
    repo: String,
}

impl GitHubClient {
    /// Build a client for the configured repository.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] for a malformed API base or
    /// [`Error::Network`] if the HTTP client cannot be constructed.
    pub fn new(repository: &RepositoryConfig, lookup: &LookupConfig) -> Result<Self> {
        url::Url::parse(&repository.api_base)?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_GITHUB_JSON));

        let client = Client::builder()
            .timeout(lookup.timeout())
            .user_agent(lookup.user_agent.clone())
            .default_headers(headers)
            .gzip(true)
            .build()
            .map_err(Error::Network)?;

        Ok(Self {
            client,
            api_base: repository.api_base.trim_end_matches('/').to_string(),
            owner: repository.owner.clone(),
            repo: repository.name.clone(),
        })
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder, url: &str) -> Result<T> {
        let response = request.send().await.map_err(|e| transport_error(e, url))?;
        let status = response.status();
        debug!("{} answered {}", url, status.as_u16());
        RateLimitGuard::check(status, url)?;

        let body = response.text().await.map_err(|e| transport_error(e, url))?;
        serde_json::from_str(&body)
            .map_err(|e| Error::Parse(format!("Unexpected response shape from {url}: {e}")))
    }
}

#[async_trait]
impl DiscussionHost for GitHubClient {
    #[instrument(skip(self), fields(repo = %self.repo))]
    async fn list_discussions(&self, first: u32, after: Option<&str>) -> Result<DiscussionPage> {
        let url = format!("{}/graphql", self.api_base);
        let body = serde_json::json!({
            "query": LIST_DISCUSSIONS_QUERY,
            "variables": {
                "owner": self.owner,
                "repo": self.repo,
                "first": first,
                "cursor": after,
            }
        });

        let envelope: GraphQlEnvelope = self
            .send_json(self.client.post(&url).json(&body), &url)
            .await?;
        envelope.into_page()
    }

    #[instrument(skip(self), fields(repo = %self.repo))]
    async fn fetch_thread(&self, number: u64) -> Result<ThreadItem> {
        let url = format!(
            "{}/repos/{}/{}/issues/{number}",
            self.api_base, self.owner, self.repo
        );
        self.send_json(self.client.get(&url), &url).await
    }

    #[instrument(skip(self))]
    async fn search(&self, query: &str) -> Result<Vec<SearchItem>> {
        let url = format!("{}/search/issues", self.api_base);
        let response: SearchResponse = self
            .send_json(self.client.get(&url).query(&[("q", query)]), &url)
            .await?;
        Ok(response.items)
    }
}

fn transport_error(err: reqwest::Error, url: &str) -> Error {
    if err.is_timeout() {
        Error::Timeout(format!("request to {url} timed out"))
    } else {
        Error::Network(err)
    }
}

#[derive(Debug, Deserialize)]
struct GraphQlEnvelope {
    data: Option<GraphQlData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
    #[serde(rename = "type")]
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GraphQlData {
    repository: Option<GraphQlRepository>,
}

#[derive(Debug, Deserialize)]
struct GraphQlRepository {
    discussions: GraphQlConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphQlConnection {
    page_info: Option<GraphQlPageInfo>,
    nodes: Vec<GraphQlNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphQlPageInfo {
    has_next_page: bool,
    end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphQlNode {
    title: String,
    number: Option<u64>,
    url: String,
    updated_at: Option<DateTime<Utc>>,
    category: Option<GraphQlCategory>,
}

#[derive(Debug, Deserialize)]
struct GraphQlCategory {
    name: String,
}

impl GraphQlEnvelope {
    fn into_page(self) -> Result<DiscussionPage> {
        if !self.errors.is_empty() {
            let messages: Vec<&str> = self.errors.iter().map(|e| e.message.as_str()).collect();
            if self
                .errors
                .iter()
                .any(|e| e.kind.as_deref() == Some("RATE_LIMITED"))
            {
                return Err(Error::RateLimited(messages.join("; ")));
            }
            return Err(Error::Parse(format!("GraphQL errors: {}", messages.join("; "))));
        }

        let connection = self
            .data
            .and_then(|d| d.repository)
            .ok_or_else(|| Error::Parse("GraphQL response has no repository data".into()))?
            .discussions;

        let next_cursor = connection
            .page_info
            .filter(|info| info.has_next_page)
            .and_then(|info| info.end_cursor);

        let discussions = connection
            .nodes
            .into_iter()
            .map(|node| DiscussionSummary {
                title: node.title,
                url: node.url,
                number: node.number,
                updated_at: node.updated_at,
                category: node.category.map(|c| c.name),
            })
            .collect();

        Ok(DiscussionPage {
            discussions,
            next_cursor,
        })
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    items: Vec<SearchItem>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_partial_json, header, method, path, query_param},
    };

    fn client_for(server: &MockServer) -> GitHubClient {
        let repository = RepositoryConfig {
            api_base: server.uri(),
            owner: "acme".into(),
            name: "docs".into(),
            ..RepositoryConfig::default()
        };
        GitHubClient::new(&repository, &LookupConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_list_discussions_parses_nodes_and_cursor() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(body_partial_json(json!({"variables": {"owner": "acme", "repo": "docs", "first": 100}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"repository": {"discussions": {
                    "pageInfo": {"hasNextPage": true, "endCursor": "Y3Vyc29y"},
                    "nodes": [{
                        "title": "Discussion: index",
                        "number": 87,
                        "url": "https://github.com/acme/docs/discussions/87",
                        "updatedAt": "2025-05-13T10:00:00Z",
                        "category": {"name": "Q&A"}
                    }]
                }}}
            })))
            .mount(&server)
            .await;

        let page = client_for(&server).list_discussions(100, None).await?;
        assert_eq!(page.discussions.len(), 1);
        assert_eq!(page.discussions[0].title, "Discussion: index");
        assert_eq!(page.discussions[0].number, Some(87));
        assert_eq!(page.discussions[0].category.as_deref(), Some("Q&A"));
        assert_eq!(page.next_cursor.as_deref(), Some("Y3Vyc29y"));
        Ok(())
    }

    #[tokio::test]
    async fn test_list_discussions_graphql_errors_are_parse_failures() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "errors": [{"message": "Something went wrong"}]
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .list_discussions(100, None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Parse(_)), "got {err}");
    }

    #[tokio::test]
    async fn test_list_discussions_graphql_rate_limit_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "errors": [{"type": "RATE_LIMITED", "message": "API rate limit exceeded"}]
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .list_discussions(100, None)
            .await
            .unwrap_err();
        assert!(err.is_rate_limited());
    }

    #[tokio::test]
    async fn test_list_discussions_missing_data_is_parse_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": null})))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .list_discussions(100, None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[tokio::test]
    async fn test_fetch_thread_statuses() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/docs/issues/87"))
            .and(header("accept", ACCEPT_GITHUB_JSON))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "number": 87,
                "title": "Discussion: index",
                "html_url": "https://github.com/acme/docs/discussions/87"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/docs/issues/88"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/docs/issues/89"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/docs/issues/90"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let item = client.fetch_thread(87).await.unwrap();
        assert!(item.is_discussion());

        assert!(matches!(client.fetch_thread(88).await, Err(Error::NotFound(_))));
        assert!(matches!(client.fetch_thread(89).await, Err(Error::RateLimited(_))));
        assert!(matches!(client.fetch_thread(90).await, Err(Error::Parse(_))));
    }

    #[tokio::test]
    async fn test_search_sends_query_and_parses_items() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        let q = "\"Discussion: index\" in:title is:discussion repo:acme/docs";
        Mock::given(method("GET"))
            .and(path("/search/issues"))
            .and(query_param("q", q))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total_count": 2,
                "items": [
                    {"title": "Discussion: index", "html_url": "https://github.com/acme/docs/discussions/3", "created_at": "2025-01-01T00:00:00Z"},
                    {"title": "index is broken", "html_url": "https://github.com/acme/docs/issues/4", "created_at": "2025-02-01T00:00:00Z"}
                ]
            })))
            .mount(&server)
            .await;

        let items = client_for(&server).search(q).await?;
        assert_eq!(items.len(), 2);
        assert!(items[0].is_discussion());
        assert!(!items[1].is_discussion());
        Ok(())
    }

    #[tokio::test]
    async fn test_server_error_is_unexpected_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/issues"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let err = client_for(&server).search("x").await.unwrap_err();
        assert!(matches!(err, Error::UnexpectedStatus { status: 502, .. }));
        assert!(err.is_recoverable());
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/issues"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"items": []}))
                    .set_delay(Duration::from_millis(1500)),
            )
            .mount(&server)
            .await;

        let repository = RepositoryConfig {
            api_base: server.uri(),
            ..RepositoryConfig::default()
        };
        let lookup = LookupConfig {
            timeout_secs: 1,
            ..LookupConfig::default()
        };
        let client = GitHubClient::new(&repository, &lookup).unwrap();
        let err = client.search("x").await.unwrap_err();
        assert!(matches!(err, Error::Timeout(_)), "got {err}");
    }

    #[test]
    fn test_invalid_api_base_is_rejected() {
        let repository = RepositoryConfig {
            api_base: "::not a url::".into(),
            ..RepositoryConfig::default()
        };
        let result = GitHubClient::new(&repository, &LookupConfig::default());
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }
}
