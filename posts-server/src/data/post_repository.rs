use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::post::{Post, SortDirection};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PostFilter {
    All,
    /// Full-text match against `content`, as the index tokenizes it.
    ContentMatch(String),
}

/// Listing descriptor: which posts, and whether to order them by `created_date`.
/// `sort: None` keeps the store's own order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PostQuery {
    pub(crate) filter: PostFilter,
    pub(crate) sort: Option<SortDirection>,
}

impl PostQuery {
    pub(crate) fn new(search_text: Option<String>, sort: Option<SortDirection>) -> Self {
        let filter = match search_text {
            Some(text) => PostFilter::ContentMatch(text),
            None => PostFilter::All,
        };
        Self { filter, sort }
    }
}

#[async_trait]
pub(crate) trait PostRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError>;
    /// Upsert keyed by `post.id`.
    async fn save(&self, post: Post) -> Result<Post, DomainError>;
    async fn delete_by_id(&self, id: Uuid) -> Result<(), DomainError>;
    async fn search(&self, query: &PostQuery) -> Result<Vec<Post>, DomainError>;
}

#[async_trait]
impl<T: PostRepository + ?Sized> PostRepository for Arc<T> {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError> {
        (**self).find_by_id(id).await
    }

    async fn save(&self, post: Post) -> Result<Post, DomainError> {
        (**self).save(post).await
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), DomainError> {
        (**self).delete_by_id(id).await
    }

    async fn search(&self, query: &PostQuery) -> Result<Vec<Post>, DomainError> {
        (**self).search(query).await
    }
}
