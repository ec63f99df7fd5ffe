use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::domain::post::{PostRequest, PostResponse, RatingRequest, SortDirection};
use crate::presentation::AppState;
use crate::presentation::app_error::AppResult;
use crate::presentation::middleware::auth::AuthenticatedUser;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct PostRequestDto {
    #[validate(length(min = 1))]
    pub(crate) content: String,
    #[validate(length(min = 1))]
    pub(crate) author: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct RatingRequestDto {
    pub(crate) like: bool,
    #[validate(length(min = 1))]
    pub(crate) user: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListPostsQuery {
    pub(crate) sort: Option<SortDirection>,
    /// Free-text search over post content.
    pub(crate) string: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct UnratePostQuery {
    #[validate(length(min = 1))]
    pub(crate) user: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PostDto {
    pub(crate) id: Uuid,
    pub(crate) content: String,
    pub(crate) author: String,
    pub(crate) created_date: DateTime<Utc>,
    pub(crate) rating: BTreeMap<String, bool>,
}

impl From<PostResponse> for PostDto {
    fn from(post: PostResponse) -> Self {
        Self {
            id: post.id,
            content: post.content,
            author: post.author,
            created_date: post.created_date,
            rating: post.rating,
        }
    }
}

impl From<PostRequestDto> for PostRequest {
    fn from(dto: PostRequestDto) -> Self {
        Self {
            content: dto.content,
            author: dto.author,
        }
    }
}

impl From<RatingRequestDto> for RatingRequest {
    fn from(dto: RatingRequestDto) -> Self {
        Self {
            like: dto.like,
            user: dto.user,
        }
    }
}

#[utoipa::path(
    post,
    path = "/posts",
    tag = "posts",
    security(
        ("basic_auth" = [])
    ),
    request_body = PostRequestDto,
    responses(
        (status = 201, description = "Post created", body = PostDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn create_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Json(dto): Json<PostRequestDto>,
) -> AppResult<(StatusCode, Json<PostDto>)> {
    dto.validate()?;

    let result = state.post_service.create_post(dto.into()).await?;
    info!(user = %auth.username, post_id = %result.id, "post created");
    Ok((StatusCode::CREATED, Json(PostDto::from(result))))
}

#[utoipa::path(
    put,
    path = "/posts/{id}",
    tag = "posts",
    security(
        ("basic_auth" = [])
    ),
    params(
        ("id" = Uuid, Path, description = "Post id")
    ),
    request_body = PostRequestDto,
    responses(
        (status = 200, description = "Post updated, ratings reset", body = PostDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found", body = String),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn update_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(dto): Json<PostRequestDto>,
) -> AppResult<(StatusCode, Json<PostDto>)> {
    dto.validate()?;

    let result = state.post_service.update_post(id, dto.into()).await?;
    info!(user = %auth.username, post_id = %id, "post updated");
    Ok((StatusCode::OK, Json(PostDto::from(result))))
}

#[utoipa::path(
    get,
    path = "/posts/{id}",
    tag = "posts",
    security(
        ("basic_auth" = [])
    ),
    params(
        ("id" = Uuid, Path, description = "Post id")
    ),
    responses(
        (status = 200, description = "Post found", body = PostDto),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found", body = String),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<(StatusCode, Json<PostDto>)> {
    let result = state.post_service.get_post(id).await?;

    Ok((StatusCode::OK, Json(PostDto::from(result))))
}

#[utoipa::path(
    get,
    path = "/posts",
    tag = "posts",
    security(
        ("basic_auth" = [])
    ),
    params(
        ("sort" = Option<String>, Query, description = "Order by createdDate: ASC or DESC"),
        ("string" = Option<String>, Query, description = "Free-text match on content")
    ),
    responses(
        (status = 200, description = "Posts listed", body = [PostDto]),
        (status = 400, description = "Invalid query"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<ListPostsQuery>,
) -> AppResult<(StatusCode, Json<Vec<PostDto>>)> {
    let search_text = query.string.filter(|text| !text.trim().is_empty());

    let result = state.post_service.get_posts(search_text, query.sort).await?;
    Ok((
        StatusCode::OK,
        Json(result.into_iter().map(PostDto::from).collect()),
    ))
}

#[utoipa::path(
    delete,
    path = "/posts/{id}",
    tag = "posts",
    security(
        ("basic_auth" = [])
    ),
    params(
        ("id" = Uuid, Path, description = "Post id")
    ),
    responses(
        (status = 200, description = "Post deleted, last state returned", body = PostDto),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found", body = String),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn delete_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<(StatusCode, Json<PostDto>)> {
    let result = state.post_service.delete_post(id).await?;
    info!(user = %auth.username, post_id = %id, "post deleted");
    Ok((StatusCode::OK, Json(PostDto::from(result))))
}

#[utoipa::path(
    put,
    path = "/posts/{id}/rating",
    tag = "posts",
    security(
        ("basic_auth" = [])
    ),
    params(
        ("id" = Uuid, Path, description = "Post id")
    ),
    request_body = RatingRequestDto,
    responses(
        (status = 200, description = "Rating stored", body = PostDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found", body = String),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn rate_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(dto): Json<RatingRequestDto>,
) -> AppResult<(StatusCode, Json<PostDto>)> {
    dto.validate()?;

    let result = state.post_service.rate_post(id, dto.into()).await?;
    info!(user = %auth.username, post_id = %id, "post rated");
    Ok((StatusCode::OK, Json(PostDto::from(result))))
}

#[utoipa::path(
    delete,
    path = "/posts/{id}/rating",
    tag = "posts",
    security(
        ("basic_auth" = [])
    ),
    params(
        ("id" = Uuid, Path, description = "Post id"),
        ("user" = String, Query, description = "User whose rating is removed")
    ),
    responses(
        (status = 200, description = "Rating removed (or was absent)", body = PostDto),
        (status = 400, description = "Missing user"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found", body = String),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn unrate_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Query(query): Query<UnratePostQuery>,
) -> AppResult<(StatusCode, Json<PostDto>)> {
    query.validate()?;

    let result = state.post_service.unrate_post(id, &query.user).await?;
    info!(user = %auth.username, post_id = %id, "post rating removed");
    Ok((StatusCode::OK, Json(PostDto::from(result))))
}
