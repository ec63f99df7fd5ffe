use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use tracing::warn;

use crate::domain::error::DomainError;
use crate::infrastructure::credentials::CredentialsError;
use crate::presentation::AppState;
use crate::presentation::app_error::AppError;

#[derive(Debug, Clone)]
pub(crate) struct AuthenticatedUser {
    pub(crate) username: String,
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

pub(crate) async fn basic_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let (username, password) = parse_basic(auth_header).ok_or(AppError::Unauthorized)?;

    // argon2 is CPU-bound
    let credentials = state.credentials.clone();
    let checked_username = username.clone();
    let verdict =
        tokio::task::spawn_blocking(move || credentials.verify(&checked_username, &password))
            .await
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;

    match verdict {
        Ok(()) => {}
        Err(CredentialsError::Invalid) => {
            warn!(username = %username, "rejected basic credentials");
            return Err(AppError::Unauthorized);
        }
        Err(err) => return Err(DomainError::Unexpected(err.to_string()).into()),
    }

    request
        .extensions_mut()
        .insert(AuthenticatedUser { username });

    Ok(next.run(request).await)
}

/// Decodes `Basic <base64(user:password)>`. The password may contain ':'.
fn parse_basic(header_value: &str) -> Option<(String, String)> {
    let mut parts = header_value.split_whitespace();
    let scheme = parts.next()?;
    let encoded = parts.next()?;
    if parts.next().is_some() || !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = STANDARD.decode(encoded).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    if username.is_empty() {
        return None;
    }
    Some((username.to_string(), password.to_string()))
}

#[cfg(test)]
mod tests {
    use base64::{Engine as _, engine::general_purpose::STANDARD};

    use super::parse_basic;

    #[test]
    fn parse_basic_splits_on_first_colon() {
        let header = format!("Basic {}", STANDARD.encode("admin:pa:ss"));
        assert_eq!(
            parse_basic(&header),
            Some(("admin".to_string(), "pa:ss".to_string()))
        );
    }

    #[test]
    fn parse_basic_accepts_lowercase_scheme() {
        let header = format!("basic {}", STANDARD.encode("admin:secret"));
        assert!(parse_basic(&header).is_some());
    }

    #[test]
    fn parse_basic_rejects_other_schemes_and_garbage() {
        assert!(parse_basic("Bearer abc.def.ghi").is_none());
        assert!(parse_basic("Basic !!!not-base64!!!").is_none());
        assert!(parse_basic(&format!("Basic {}", STANDARD.encode("no-colon"))).is_none());
        assert!(parse_basic(&format!("Basic {}", STANDARD.encode(":secret"))).is_none());
        assert!(parse_basic("Basic").is_none());
    }
}
