use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, info};
use uuid::Uuid;

use crate::data::post_repository::{PostFilter, PostQuery, PostRepository};
use crate::domain::error::DomainError;
use crate::domain::post::{Post, Rating};

#[derive(Debug, Clone)]
pub(crate) struct ElasticsearchConfig {
    pub(crate) url: String,
    pub(crate) index: String,
    pub(crate) username: Option<String>,
    pub(crate) password: Option<String>,
    pub(crate) max_results: usize,
}

#[derive(Debug, Clone)]
pub(crate) struct ElasticsearchPostRepository {
    client: Client,
    config: ElasticsearchConfig,
}

/// Stored document layout. `createdDate` is kept as epoch milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PostDocument {
    id: Uuid,
    content: String,
    author: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    created_date: DateTime<Utc>,
    #[serde(default)]
    rating: Rating,
}

#[derive(Debug, Deserialize)]
struct GetResponse {
    found: bool,
    #[serde(rename = "_source")]
    source: Option<PostDocument>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: SearchHits,
}

#[derive(Debug, Deserialize)]
struct SearchHits {
    hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(rename = "_source")]
    source: PostDocument,
}

impl ElasticsearchPostRepository {
    pub(crate) fn new(config: ElasticsearchConfig) -> Result<Self, DomainError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(map_transport_error)?;

        Ok(Self { client, config })
    }

    fn endpoint(&self, path: &str) -> String {
        let index_url = format!(
            "{}/{}",
            self.config.url.trim_end_matches('/'),
            self.config.index
        );
        match path.trim_start_matches('/') {
            "" => index_url,
            path => format!("{index_url}/{path}"),
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self.client.request(method, self.endpoint(path));
        match &self.config.username {
            Some(username) => request.basic_auth(username, self.config.password.as_deref()),
            None => request,
        }
    }

    /// Creates the index with the post mappings unless it already exists.
    pub(crate) async fn ensure_index(&self) -> Result<(), DomainError> {
        let response = self
            .request(Method::HEAD, "")
            .send()
            .await
            .map_err(map_transport_error)?;

        match response.status() {
            StatusCode::OK => {
                debug!(index = %self.config.index, "search index already exists");
                return Ok(());
            }
            StatusCode::NOT_FOUND => {}
            status => return Err(unexpected_status(status, String::new())),
        }

        let response = self
            .request(Method::PUT, "")
            .json(&index_definition())
            .send()
            .await
            .map_err(map_transport_error)?;
        ensure_success(response).await?;

        info!(index = %self.config.index, "search index created");
        Ok(())
    }
}

#[async_trait]
impl PostRepository for ElasticsearchPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError> {
        let response = self
            .request(Method::GET, &format!("_doc/{id}"))
            .send()
            .await
            .map_err(map_transport_error)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = ensure_success(response).await?;
        let body = response
            .json::<GetResponse>()
            .await
            .map_err(map_transport_error)?;

        Ok(match (body.found, body.source) {
            (true, Some(document)) => Some(Post::from(document)),
            _ => None,
        })
    }

    async fn save(&self, post: Post) -> Result<Post, DomainError> {
        let document = PostDocument::from(post.clone());
        let response = self
            .request(Method::PUT, &format!("_doc/{}", post.id))
            .query(&[("refresh", "wait_for")])
            .json(&document)
            .send()
            .await
            .map_err(map_transport_error)?;
        ensure_success(response).await?;

        Ok(post)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), DomainError> {
        let response = self
            .request(Method::DELETE, &format!("_doc/{id}"))
            .query(&[("refresh", "wait_for")])
            .send()
            .await
            .map_err(map_transport_error)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        ensure_success(response).await?;
        Ok(())
    }

    async fn search(&self, query: &PostQuery) -> Result<Vec<Post>, DomainError> {
        let response = self
            .request(Method::POST, "_search")
            .json(&search_body(query, self.config.max_results))
            .send()
            .await
            .map_err(map_transport_error)?;
        let response = ensure_success(response).await?;

        let body = response
            .json::<SearchResponse>()
            .await
            .map_err(map_transport_error)?;

        Ok(body
            .hits
            .hits
            .into_iter()
            .map(|hit| Post::from(hit.source))
            .collect())
    }
}

impl From<Post> for PostDocument {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            content: post.content,
            author: post.author,
            created_date: post.created_date,
            rating: post.rating,
        }
    }
}

impl From<PostDocument> for Post {
    fn from(document: PostDocument) -> Self {
        Self {
            id: document.id,
            content: document.content,
            author: document.author,
            created_date: document.created_date,
            rating: document.rating,
        }
    }
}

fn index_definition() -> Value {
    json!({
        "mappings": {
            "properties": {
                "id": { "type": "keyword" },
                "content": { "type": "text" },
                "author": { "type": "text" },
                "createdDate": { "type": "date", "format": "epoch_millis" },
                "rating": { "type": "object", "enabled": false }
            }
        }
    })
}

fn search_body(query: &PostQuery, max_results: usize) -> Value {
    let filter = match &query.filter {
        PostFilter::All => json!({ "match_all": {} }),
        PostFilter::ContentMatch(text) => json!({ "match": { "content": text } }),
    };

    let mut body = json!({
        "query": filter,
        "size": max_results,
    });
    if let Some(direction) = query.sort {
        body["sort"] = json!([{ "createdDate": { "order": direction.as_str() } }]);
    }
    body
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, DomainError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(unexpected_status(status, body))
}

fn unexpected_status(status: StatusCode, body: String) -> DomainError {
    DomainError::Unexpected(format!("search index replied {status}: {body}"))
}

fn map_transport_error(err: reqwest::Error) -> DomainError {
    DomainError::Unexpected(err.to_string())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use uuid::Uuid;

    use super::{
        ElasticsearchConfig, ElasticsearchPostRepository, PostDocument, SearchResponse,
        search_body,
    };
    use crate::data::post_repository::PostQuery;
    use crate::domain::post::{Post, Rating, SortDirection};

    fn test_repo(url: &str) -> ElasticsearchPostRepository {
        ElasticsearchPostRepository::new(ElasticsearchConfig {
            url: url.to_string(),
            index: "blog".to_string(),
            username: None,
            password: None,
            max_results: 10_000,
        })
        .expect("client must build")
    }

    #[test]
    fn endpoint_normalizes_slashes() {
        let repo = test_repo("http://localhost:9200/");
        assert_eq!(repo.endpoint("/_search"), "http://localhost:9200/blog/_search");
        assert_eq!(repo.endpoint(""), "http://localhost:9200/blog");
    }

    #[test]
    fn search_body_without_text_or_sort_matches_all() {
        let body = search_body(&PostQuery::new(None, None), 10_000);
        assert_eq!(
            body,
            json!({ "query": { "match_all": {} }, "size": 10_000 })
        );
    }

    #[test]
    fn search_body_with_text_and_sort() {
        let body = search_body(
            &PostQuery::new(Some("needle".to_string()), Some(SortDirection::Desc)),
            50,
        );
        assert_eq!(
            body,
            json!({
                "query": { "match": { "content": "needle" } },
                "size": 50,
                "sort": [{ "createdDate": { "order": "desc" } }]
            })
        );
    }

    #[test]
    fn document_stores_created_date_as_epoch_millis() {
        let created_date = Utc
            .timestamp_millis_opt(1_700_000_000_123)
            .single()
            .expect("valid ts");
        let mut rating = Rating::new();
        rating.insert("other.user".to_string(), false);
        let post = Post {
            id: Uuid::nil(),
            content: "hello".to_string(),
            author: "a".to_string(),
            created_date,
            rating,
        };

        let value = serde_json::to_value(PostDocument::from(post)).expect("must serialize");
        assert_eq!(value["createdDate"], json!(1_700_000_000_123_i64));
        assert_eq!(value["rating"], json!({ "other.user": false }));
        assert_eq!(value["id"], json!("00000000-0000-0000-0000-000000000000"));
    }

    #[test]
    fn search_response_hits_convert_to_posts() {
        let raw = json!({
            "took": 1,
            "hits": {
                "total": { "value": 1, "relation": "eq" },
                "hits": [{
                    "_index": "blog",
                    "_id": "00000000-0000-0000-0000-000000000000",
                    "_source": {
                        "id": "00000000-0000-0000-0000-000000000000",
                        "content": "hello",
                        "author": "a",
                        "createdDate": 1_700_000_000_000_i64
                    }
                }]
            }
        });

        let response: SearchResponse = serde_json::from_value(raw).expect("must deserialize");
        let posts: Vec<Post> = response
            .hits
            .hits
            .into_iter()
            .map(|hit| Post::from(hit.source))
            .collect();

        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].content, "hello");
        assert!(posts[0].rating.is_empty());
        assert_eq!(posts[0].created_date.timestamp_millis(), 1_700_000_000_000);
    }
}
