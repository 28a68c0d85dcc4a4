//! Identity provider abstraction
//!
//! The platform auth service owns authentication; the booking workflows
//! only resolve a bearer token into an acting principal and trust the
//! result opaquely.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, error};
use uuid::Uuid;

use kaiwa_types::{Principal, UserId};

use crate::BookingError;

/// Identity provider trait
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve the acting principal from a bearer token
    ///
    /// Fails with [`BookingError::Unauthenticated`] when the token is
    /// rejected by the identity service.
    async fn resolve(&self, token: &str) -> Result<Principal, BookingError>;
}

/// Identity provider backed by the platform auth service
#[derive(Clone)]
pub struct HttpIdentityProvider {
    client: Client,
    base_url: String,
}

impl HttpIdentityProvider {
    /// Create a new identity provider client
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn resolve(&self, token: &str) -> Result<Principal, BookingError> {
        let url = format!("{}/auth/v1/user", self.base_url.trim_end_matches('/'));

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Identity service request failed");
                BookingError::Identity(e.to_string())
            })?;

        if matches!(
            response.status(),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            debug!("Identity service rejected token");
            return Err(BookingError::Unauthenticated);
        }

        if !response.status().is_success() {
            let status = response.status();
            error!(status = %status, "Identity service error");
            return Err(BookingError::Identity(format!("identity service error: {status}")));
        }

        let user: AuthUserResource = response
            .json()
            .await
            .map_err(|e| BookingError::Identity(format!("failed to parse identity response: {e}")))?;

        Ok(Principal {
            user_id: UserId(user.id),
            email: user.email,
        })
    }
}

impl std::fmt::Debug for HttpIdentityProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpIdentityProvider")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Auth service user resource (the fields we read)
#[derive(Debug, Deserialize)]
struct AuthUserResource {
    id: Uuid,
    email: Option<String>,
}
