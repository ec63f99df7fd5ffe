use chrono::{DateTime, SubsecRound, Utc};
use uuid::Uuid;

use crate::domain::post::{Post, PostRequest, PostResponse, Rating};

/// Builds a stored entity from a write payload. A missing `id` gets a fresh
/// v4 uuid, a missing `created_date` gets the current instant at millisecond
/// precision. Ratings always start empty.
pub(crate) fn request_to_entity(
    id: Option<Uuid>,
    created_date: Option<DateTime<Utc>>,
    request: PostRequest,
) -> Post {
    Post {
        id: id.unwrap_or_else(Uuid::new_v4),
        content: request.content,
        author: request.author,
        created_date: created_date.unwrap_or_else(|| Utc::now().trunc_subsecs(3)),
        rating: Rating::new(),
    }
}

pub(crate) fn entity_to_response(post: Post) -> PostResponse {
    PostResponse {
        id: post.id,
        content: post.content,
        author: post.author,
        created_date: post.created_date,
        rating: post.rating,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use uuid::Uuid;

    use super::{entity_to_response, request_to_entity};
    use crate::domain::post::{Post, PostRequest, Rating};

    fn sample_request() -> PostRequest {
        PostRequest {
            content: "Content of the post is here".to_string(),
            author: "user 1".to_string(),
        }
    }

    #[test]
    fn request_to_entity_assigns_fresh_id_and_timestamp() {
        let before = Utc::now() - Duration::milliseconds(1);
        let first = request_to_entity(None, None, sample_request());
        let second = request_to_entity(None, None, sample_request());
        let after = Utc::now();

        assert_ne!(first.id, second.id);
        assert!(first.created_date >= before && first.created_date <= after);
        assert_eq!(first.created_date.timestamp_subsec_nanos() % 1_000_000, 0);
        assert!(first.rating.is_empty());
        assert_eq!(first.content, "Content of the post is here");
        assert_eq!(first.author, "user 1");
    }

    #[test]
    fn request_to_entity_keeps_given_id_and_created_date() {
        let id = Uuid::new_v4();
        let created_date = Utc
            .timestamp_millis_opt(1_600_000_000_000)
            .single()
            .expect("valid ts");

        let post = request_to_entity(Some(id), Some(created_date), sample_request());

        assert_eq!(post.id, id);
        assert_eq!(post.created_date, created_date);
        assert!(post.rating.is_empty());
    }

    #[test]
    fn entity_to_response_projects_every_field() {
        let mut rating = Rating::new();
        rating.insert("user 2".to_string(), true);
        rating.insert("user 3".to_string(), false);
        let post = Post {
            id: Uuid::new_v4(),
            content: "body".to_string(),
            author: "user 1".to_string(),
            created_date: Utc::now(),
            rating: rating.clone(),
        };

        let response = entity_to_response(post.clone());

        assert_eq!(response.id, post.id);
        assert_eq!(response.content, post.content);
        assert_eq!(response.author, post.author);
        assert_eq!(response.created_date, post.created_date);
        assert_eq!(response.rating, rating);
    }
}
