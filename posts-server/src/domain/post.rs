use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::DomainError;

/// Per-user like (`true`) / dislike (`false`) marks. One entry per user.
pub(crate) type Rating = BTreeMap<String, bool>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Post {
    pub(crate) id: Uuid,
    pub(crate) content: String,
    pub(crate) author: String,
    pub(crate) created_date: DateTime<Utc>,
    pub(crate) rating: Rating,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PostRequest {
    pub(crate) content: String,
    pub(crate) author: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RatingRequest {
    pub(crate) like: bool,
    pub(crate) user: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PostResponse {
    pub(crate) id: Uuid,
    pub(crate) content: String,
    pub(crate) author: String,
    pub(crate) created_date: DateTime<Utc>,
    pub(crate) rating: Rating,
}

impl PostRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        require_non_blank("content", &self.content)?;
        require_non_blank("author", &self.author)?;
        Ok(self)
    }
}

impl RatingRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        require_non_blank("user", &self.user)?;
        Ok(self)
    }
}

pub(crate) fn require_non_blank(field: &'static str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::Validation {
            field,
            message: "must not be empty",
        });
    }
    Ok(())
}

impl Post {
    pub(crate) fn rate(&mut self, user: impl Into<String>, like: bool) {
        self.rating.insert(user.into(), like);
    }

    /// Removing a user that never rated is a no-op.
    pub(crate) fn unrate(&mut self, user: &str) {
        self.rating.remove(user);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) enum SortDirection {
    #[serde(rename = "ASC", alias = "asc", alias = "Asc")]
    Asc,
    #[serde(rename = "DESC", alias = "desc", alias = "Desc")]
    Desc,
}

impl SortDirection {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::{DomainError, Post, PostRequest, Rating, RatingRequest, SortDirection};

    fn sample_post() -> Post {
        Post {
            id: Uuid::new_v4(),
            content: "content".to_string(),
            author: "author".to_string(),
            created_date: Utc::now(),
            rating: Rating::new(),
        }
    }

    #[test]
    fn rate_overwrites_previous_mark_of_same_user() {
        let mut post = sample_post();
        post.rate("u", true);
        post.rate("u", false);

        assert_eq!(post.rating.len(), 1);
        assert_eq!(post.rating.get("u"), Some(&false));
    }

    #[test]
    fn unrate_of_absent_user_keeps_rating() {
        let mut post = sample_post();
        post.rate("present", true);
        post.unrate("absent-user");

        assert_eq!(post.rating.len(), 1);
        assert_eq!(post.rating.get("present"), Some(&true));
    }

    #[test]
    fn post_request_validate_rejects_blank_author() {
        let req = PostRequest {
            content: "hello".to_string(),
            author: "   ".to_string(),
        };

        let err = req.validate().expect_err("author must be rejected");
        assert_validation_field(err, "author");
    }

    #[test]
    fn post_request_validate_keeps_fields_untouched() {
        let req = PostRequest {
            content: "  hello  ".to_string(),
            author: "a".to_string(),
        };

        let validated = req.validate().expect("must validate");
        assert_eq!(validated.content, "  hello  ");
        assert_eq!(validated.author, "a");
    }

    #[test]
    fn rating_request_validate_rejects_empty_user() {
        let req = RatingRequest {
            like: true,
            user: String::new(),
        };

        let err = req.validate().expect_err("user must be rejected");
        assert_validation_field(err, "user");
    }

    #[test]
    fn sort_direction_deserializes_from_query_values() {
        let asc: SortDirection = serde_json::from_str("\"ASC\"").expect("must parse");
        let desc: SortDirection = serde_json::from_str("\"desc\"").expect("must parse");
        assert_eq!(asc, SortDirection::Asc);
        assert_eq!(desc, SortDirection::Desc);
    }

    fn assert_validation_field(err: DomainError, expected_field: &'static str) {
        match err {
            DomainError::Validation { field, .. } => assert_eq!(field, expected_field),
            _ => panic!("expected DomainError::Validation"),
        }
    }
}
