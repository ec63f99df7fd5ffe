use axum::Router;
use axum::middleware;
use axum::routing::{get, post, put};

use crate::presentation::AppState;
use crate::presentation::handlers::posts::{
    create_post, delete_post, get_post, list_posts, rate_post, unrate_post, update_post,
};
use crate::presentation::middleware::auth::basic_auth_middleware;

/// Every post route requires basic credentials.
pub(crate) fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/posts", post(create_post).get(list_posts))
        .route(
            "/posts/{id}",
            get(get_post).put(update_post).delete(delete_post),
        )
        .route("/posts/{id}/rating", put(rate_post).delete(unrate_post))
        .route_layer(middleware::from_fn_with_state(
            state,
            basic_auth_middleware,
        ))
}
