//! Google Calendar gateway implementation

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use moka::future::Cache;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, instrument};

use crate::calendar::{CalendarEvent, CalendarGateway, EventDetails};
use crate::error::BookingError;

const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Google Calendar gateway configuration
#[derive(Debug, Clone)]
pub struct GoogleCalendarConfig {
    /// Service account email (JWT issuer)
    pub service_account_email: String,
    /// Service account private key, PEM-encoded
    pub private_key_pem: String,
    /// Target calendar id
    pub calendar_id: String,
    /// IANA timezone name stamped on events
    pub event_timezone: String,
}

impl GoogleCalendarConfig {
    /// Create a new calendar config
    pub fn new(
        service_account_email: impl Into<String>,
        private_key_pem: impl Into<String>,
        calendar_id: impl Into<String>,
    ) -> Self {
        Self {
            service_account_email: service_account_email.into(),
            private_key_pem: private_key_pem.into(),
            calendar_id: calendar_id.into(),
            event_timezone: "Asia/Tokyo".to_string(),
        }
    }

    /// Set the event timezone
    pub fn with_timezone(mut self, tz: impl Into<String>) -> Self {
        self.event_timezone = tz.into();
        self
    }
}

/// Google Calendar gateway
///
/// Exchanges a service-account JWT for a short-lived access token and keeps
/// it cached for slightly less than its lifetime.
#[derive(Clone)]
pub struct GoogleCalendarGateway {
    client: Client,
    config: GoogleCalendarConfig,
    token_cache: Cache<(), String>,
}

impl GoogleCalendarGateway {
    /// Create a new calendar gateway
    pub fn new(config: GoogleCalendarConfig) -> Self {
        Self {
            client: Client::new(),
            config,
            token_cache: Cache::builder()
                // Tokens live for an hour; refresh a little early
                .time_to_live(Duration::from_secs(55 * 60))
                .max_capacity(1)
                .build(),
        }
    }

    /// Get a cached or freshly minted access token
    async fn access_token(&self) -> Result<String, BookingError> {
        if let Some(token) = self.token_cache.get(&()).await {
            return Ok(token);
        }

        let now = Utc::now().timestamp();
        let claims = TokenClaims {
            iss: self.config.service_account_email.clone(),
            scope: CALENDAR_SCOPE.to_string(),
            aud: TOKEN_URL.to_string(),
            iat: now,
            exp: now + 3600,
        };

        let key = EncodingKey::from_rsa_pem(self.config.private_key_pem.as_bytes())
            .map_err(|e| BookingError::Calendar(format!("invalid service account key: {e}")))?;
        let assertion = jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &key)
            .map_err(|e| BookingError::Calendar(format!("failed to sign assertion: {e}")))?;

        let response = self
            .client
            .post(TOKEN_URL)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", &assertion)])
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Google token request failed");
                BookingError::Calendar(e.to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Google token endpoint error");
            return Err(BookingError::Calendar(format!("token exchange failed: {status}")));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| BookingError::Calendar(format!("failed to parse token response: {e}")))?;

        self.token_cache.insert((), token.access_token.clone()).await;

        Ok(token.access_token)
    }

    /// Make an authenticated request to the Calendar API
    async fn calendar_request<T: for<'de> Deserialize<'de>>(
        &self,
        method: reqwest::Method,
        url: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<T, BookingError> {
        let token = self.access_token().await?;

        let mut request = self.client.request(method, url).bearer_auth(token);
        if let Some(json) = body {
            request = request.json(json);
        }

        let response = request.send().await.map_err(|e| {
            error!(error = %e, "Calendar API request failed");
            BookingError::Calendar(e.to_string())
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Calendar API error");
            return Err(BookingError::Calendar(format!("calendar API error: {status}")));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| BookingError::Calendar(format!("failed to parse calendar response: {e}")))
    }
}

#[async_trait]
impl CalendarGateway for GoogleCalendarGateway {
    #[instrument(skip(self, details), fields(booking_id = %details.booking_id))]
    async fn create_event(&self, details: &EventDetails) -> Result<CalendarEvent, BookingError> {
        debug!(student = %details.student_name, "Creating calendar event");

        let event = serde_json::json!({
            "summary": format!("Kaiwa Lesson - {}", details.student_name),
            "description": format!(
                "Video lesson with {}\n\nLesson Type: {}\nDuration: {} minutes",
                details.student_name, details.lesson_type, details.duration_minutes
            ),
            "start": {
                "dateTime": details.start_time.to_rfc3339(),
                "timeZone": self.config.event_timezone,
            },
            "end": {
                "dateTime": details.end_time.to_rfc3339(),
                "timeZone": self.config.event_timezone,
            },
            "conferenceData": {
                "createRequest": {
                    "requestId": details.booking_id.to_string(),
                    "conferenceSolutionKey": { "type": "hangoutsMeet" },
                },
            },
            "attendees": [ { "email": details.student_email } ],
            "reminders": {
                "useDefault": false,
                "overrides": [
                    { "method": "email", "minutes": 24 * 60 },
                    { "method": "popup", "minutes": 60 },
                ],
            },
        });

        let url = format!(
            "{CALENDAR_API_BASE}/calendars/{}/events?conferenceDataVersion=1",
            self.config.calendar_id
        );
        let created: GoogleEventResource = self
            .calendar_request(reqwest::Method::POST, &url, Some(&event))
            .await?;

        Ok(created.into())
    }

    #[instrument(skip(self, changes))]
    async fn update_event(
        &self,
        event_id: &str,
        changes: serde_json::Value,
    ) -> Result<CalendarEvent, BookingError> {
        debug!(event_id = %event_id, "Updating calendar event");

        let url = format!(
            "{CALENDAR_API_BASE}/calendars/{}/events/{event_id}",
            self.config.calendar_id
        );
        let updated: GoogleEventResource = self
            .calendar_request(reqwest::Method::PATCH, &url, Some(&changes))
            .await?;

        Ok(updated.into())
    }

    #[instrument(skip(self))]
    async fn delete_event(&self, event_id: &str) -> Result<(), BookingError> {
        debug!(event_id = %event_id, "Deleting calendar event");

        let token = self.access_token().await?;
        let url = format!(
            "{CALENDAR_API_BASE}/calendars/{}/events/{event_id}",
            self.config.calendar_id
        );

        let response = self
            .client
            .delete(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Calendar API request failed");
                BookingError::Calendar(e.to_string())
            })?;

        // Already-gone events count as deleted; cancellation retries hit this.
        if matches!(response.status(), StatusCode::NOT_FOUND | StatusCode::GONE) {
            return Ok(());
        }

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Calendar API error");
            return Err(BookingError::Calendar(format!("calendar API error: {status}")));
        }

        Ok(())
    }
}

impl std::fmt::Debug for GoogleCalendarGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleCalendarGateway")
            .field("calendar_id", &self.config.calendar_id)
            .finish_non_exhaustive()
    }
}

/// Service-account assertion claims
#[derive(Debug, Serialize)]
struct TokenClaims {
    iss: String,
    scope: String,
    aud: String,
    iat: i64,
    exp: i64,
}

/// Token endpoint response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Google Calendar event resource (the fields we read)
#[derive(Debug, Clone, Deserialize)]
struct GoogleEventResource {
    id: String,
    #[serde(rename = "hangoutLink")]
    hangout_link: Option<String>,
}

impl From<GoogleEventResource> for CalendarEvent {
    fn from(resource: GoogleEventResource) -> Self {
        Self {
            event_id: resource.id,
            join_link: resource.hangout_link,
        }
    }
}
