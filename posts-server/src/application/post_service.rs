use tracing::debug;
use uuid::Uuid;

use crate::application::post_mapper::{entity_to_response, request_to_entity};
use crate::data::post_repository::{PostQuery, PostRepository};
use crate::domain::error::DomainError;
use crate::domain::post::{
    Post, PostRequest, PostResponse, RatingRequest, SortDirection, require_non_blank,
};

pub(crate) struct PostService<R: PostRepository> {
    repo: R,
}

impl<R: PostRepository> PostService<R> {
    pub(crate) fn new(repo: R) -> Self {
        Self { repo }
    }

    pub(crate) async fn create_post(&self, req: PostRequest) -> Result<PostResponse, DomainError> {
        let req = req.validate()?;
        let post = request_to_entity(None, None, req);
        let saved = self.repo.save(post).await?;
        debug!(post_id = %saved.id, "post created");
        Ok(entity_to_response(saved))
    }

    /// Replaces content and author. `id` and `created_date` survive, ratings
    /// are reset to empty.
    pub(crate) async fn update_post(
        &self,
        id: Uuid,
        req: PostRequest,
    ) -> Result<PostResponse, DomainError> {
        let req = req.validate()?;
        let existing = self.find_existing(id).await?;
        let post = request_to_entity(Some(existing.id), Some(existing.created_date), req);
        let saved = self.repo.save(post).await?;
        Ok(entity_to_response(saved))
    }

    pub(crate) async fn get_post(&self, id: Uuid) -> Result<PostResponse, DomainError> {
        self.find_existing(id).await.map(entity_to_response)
    }

    pub(crate) async fn get_posts(
        &self,
        search_text: Option<String>,
        sort: Option<SortDirection>,
    ) -> Result<Vec<PostResponse>, DomainError> {
        let query = PostQuery::new(search_text, sort);
        let posts = self.repo.search(&query).await?;
        Ok(posts.into_iter().map(entity_to_response).collect())
    }

    /// Returns the post as it was right before deletion.
    pub(crate) async fn delete_post(&self, id: Uuid) -> Result<PostResponse, DomainError> {
        let existing = self.find_existing(id).await?;
        self.repo.delete_by_id(id).await?;
        debug!(post_id = %id, "post deleted");
        Ok(entity_to_response(existing))
    }

    pub(crate) async fn rate_post(
        &self,
        id: Uuid,
        req: RatingRequest,
    ) -> Result<PostResponse, DomainError> {
        let req = req.validate()?;
        let mut post = self.find_existing(id).await?;
        post.rate(req.user, req.like);
        let saved = self.repo.save(post).await?;
        Ok(entity_to_response(saved))
    }

    pub(crate) async fn unrate_post(
        &self,
        id: Uuid,
        user: &str,
    ) -> Result<PostResponse, DomainError> {
        require_non_blank("user", user)?;
        let mut post = self.find_existing(id).await?;
        post.unrate(user);
        let saved = self.repo.save(post).await?;
        Ok(entity_to_response(saved))
    }

    async fn find_existing(&self, id: Uuid) -> Result<Post, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound(id))
    }
}
