use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use crate::data::post_repository::{PostFilter, PostQuery, PostRepository};
use crate::domain::error::DomainError;
use crate::domain::post::{Post, SortDirection};

/// Process-local store. Iteration order is insertion order; an upsert keeps
/// the post at its original position.
#[derive(Debug, Default)]
pub(crate) struct InMemoryPostRepository {
    posts: RwLock<Vec<Post>>,
}

impl InMemoryPostRepository {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Vec<Post>>, DomainError> {
        self.posts
            .read()
            .map_err(|_| DomainError::Unexpected("post store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Vec<Post>>, DomainError> {
        self.posts
            .write()
            .map_err(|_| DomainError::Unexpected("post store lock poisoned".to_string()))
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError> {
        Ok(self.read()?.iter().find(|post| post.id == id).cloned())
    }

    async fn save(&self, post: Post) -> Result<Post, DomainError> {
        let mut posts = self.write()?;
        match posts.iter_mut().find(|existing| existing.id == post.id) {
            Some(existing) => *existing = post.clone(),
            None => posts.push(post.clone()),
        }
        Ok(post)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), DomainError> {
        self.write()?.retain(|post| post.id != id);
        Ok(())
    }

    async fn search(&self, query: &PostQuery) -> Result<Vec<Post>, DomainError> {
        let mut found: Vec<Post> = match &query.filter {
            PostFilter::All => self.read()?.clone(),
            PostFilter::ContentMatch(text) => {
                let wanted = tokenize(text);
                self.read()?
                    .iter()
                    .filter(|post| {
                        let tokens = tokenize(&post.content);
                        wanted.iter().any(|token| tokens.contains(token))
                    })
                    .cloned()
                    .collect()
            }
        };

        match query.sort {
            Some(SortDirection::Asc) => found.sort_by_key(|post| post.created_date),
            Some(SortDirection::Desc) => {
                found.sort_by(|a, b| b.created_date.cmp(&a.created_date))
            }
            None => {}
        }
        Ok(found)
    }
}

// Lowercased alphanumeric runs, close to the index's standard analyzer.
fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}
