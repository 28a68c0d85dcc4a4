//! Axum extractors for request authentication material

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::header;
use std::convert::Infallible;

/// Optional bearer token extracted from the Authorization header
///
/// The booking workflows decide whether authentication is required; the
/// slot listing path accepts anonymous requests.
#[derive(Debug, Clone)]
pub struct OptionalBearer(pub Option<String>);

impl OptionalBearer {
    /// Borrow the token, if one was supplied
    pub fn token(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl<S> FromRequestParts<S> for OptionalBearer
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::to_string);

        Ok(OptionalBearer(token))
    }
}
