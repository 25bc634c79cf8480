use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;

use crate::error::ApiError;
use crate::settings::Settings;

/// Checks the service token, accepting either a bearer header or a
/// `token` query parameter (for calendar subscriptions that cannot set
/// headers).
pub fn verify_token(
    settings: &Settings,
    auth: Option<Authorization<Bearer>>,
    query_token: Option<&str>,
) -> Result<(), ApiError> {
    let provided = auth.as_ref().map(|a| a.token()).or(query_token);
    match provided {
        Some(token) if token == settings.auth_token => Ok(()),
        _ => Err(ApiError::Unauthorized(
            "Invalid authentication token".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use url::Url;

    use super::*;

    fn settings() -> Settings {
        Settings {
            backend_base_url: Url::parse("http://localhost:5000/api").unwrap(),
            backend_session_token: "upstream".to_string(),
            auth_token: "secret".to_string(),
            debug: false,
            enable_swagger: true,
            port: 8080,
            timezone: "Europe/Rome".to_string(),
            booking_window_hours: 48,
            cancellation_lead_hours: 2,
            cancellation_warning_minutes: None,
            class_duration_min: 60,
        }
    }

    #[test]
    fn test_verify_token_header() {
        let auth = Authorization::bearer("secret").unwrap();
        assert!(verify_token(&settings(), Some(auth), None).is_ok());
        let wrong = Authorization::bearer("nope").unwrap();
        assert!(verify_token(&settings(), Some(wrong), None).is_err());
    }

    #[test]
    fn test_verify_token_query() {
        assert!(verify_token(&settings(), None, Some("secret")).is_ok());
        assert!(verify_token(&settings(), None, Some("bad")).is_err());
        assert!(verify_token(&settings(), None, None).is_err());
    }

    #[test]
    fn test_header_wins_over_query() {
        let auth = Authorization::bearer("nope").unwrap();
        assert!(verify_token(&settings(), Some(auth), Some("secret")).is_err());
    }
}
