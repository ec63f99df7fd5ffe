use std::sync::Arc;

use crate::application::post_service::PostService;
use crate::data::post_repository::PostRepository;
use crate::infrastructure::credentials::Credentials;

pub(crate) mod app_error;
pub(crate) mod handlers;
pub(crate) mod middleware;
pub(crate) mod openapi;
pub(crate) mod routes;

pub(crate) type SharedPostService = Arc<PostService<Arc<dyn PostRepository>>>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) post_service: SharedPostService,
    pub(crate) credentials: Arc<Credentials>,
}

impl AppState {
    pub(crate) fn new(post_service: SharedPostService, credentials: Arc<Credentials>) -> Self {
        Self {
            post_service,
            credentials,
        }
    }
}
