use std::sync::Arc;

use reqwest::StatusCode;
use serde::Serialize;
use thiserror::Error;
use url::Url;

use crate::models::{AutoBookingRecord, BookingRecord};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Booking backend rejected the configured session token")]
    Unauthorized,
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Cancellation payload forwarded to the backend's `/cancel` endpoint.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CancelRequest {
    pub class_name: String,
    /// `"YYYY-MM-DD"`, already normalised from the human date string.
    pub date: String,
    pub time: String,
}

/// HTTP client for the booking backend that owns the actual gym-site
/// automation. This service only reads its listings and forwards
/// cancellations; all scraping and retry logic lives upstream.
#[derive(Clone)]
pub struct BookingBackendClient {
    client: reqwest::Client,
    base_url: Arc<Url>,
    session_token: String,
}

impl BookingBackendClient {
    pub fn new(base_url: Url, session_token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: Arc::new(base_url),
            session_token,
        }
    }

    fn endpoint(&self, path: &str) -> Url {
        let base = self.base_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}/{path}")).expect("endpoint URL is valid")
    }

    pub async fn fetch_auto_bookings(&self) -> Result<Vec<AutoBookingRecord>, ClientError> {
        let response = self
            .client
            .get(self.endpoint("auto_bookings"))
            .bearer_auth(&self.session_token)
            .send()
            .await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(ClientError::Unauthorized);
        }
        Ok(response.error_for_status()?.json().await?)
    }

    pub async fn fetch_bookings(&self) -> Result<Vec<BookingRecord>, ClientError> {
        let response = self
            .client
            .get(self.endpoint("bookings"))
            .bearer_auth(&self.session_token)
            .send()
            .await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(ClientError::Unauthorized);
        }
        Ok(response.error_for_status()?.json().await?)
    }

    /// Forwards a cancellation the resolver has already approved and
    /// relays the backend's confirmation payload.
    pub async fn cancel_booking(
        &self,
        request: &CancelRequest,
    ) -> Result<serde_json::Value, ClientError> {
        let response = self
            .client
            .post(self.endpoint("cancel"))
            .bearer_auth(&self.session_token)
            .json(request)
            .send()
            .await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(ClientError::Unauthorized);
        }
        Ok(response.error_for_status()?.json().await?)
    }
}
