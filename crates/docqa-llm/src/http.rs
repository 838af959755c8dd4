//! Shared HTTP plumbing for the hosted providers

use docqa_domain::CompletionError;
use reqwest::StatusCode;
use std::time::Duration;

/// Build a reqwest client with the per-request timeout applied
pub(crate) fn build_client(timeout: Duration) -> Result<reqwest::Client, CompletionError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| CompletionError::Configuration(format!("Failed to build HTTP client: {}", e)))
}

/// Map a non-success HTTP status to a completion error
pub(crate) fn status_error(status: StatusCode, body: String, model: &str) -> CompletionError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => CompletionError::RateLimitExceeded,
        StatusCode::NOT_FOUND => CompletionError::ModelNotAvailable(model.to_string()),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            CompletionError::Configuration(format!("HTTP {}: {}", status, body))
        }
        _ => CompletionError::Communication(format!("HTTP {}: {}", status, body)),
    }
}

/// Read an API key from the explicit value or the named environment variable
pub(crate) fn resolve_api_key(explicit: Option<String>, env_var: &str) -> Result<String, CompletionError> {
    match explicit {
        Some(key) if !key.is_empty() => Ok(key),
        _ => std::env::var(env_var).map_err(|_| {
            CompletionError::Configuration(format!("{} is not set", env_var))
        }),
    }
}

/// Send a prepared request and decode a JSON body, mapping failures
pub(crate) async fn send_json<T>(request: reqwest::RequestBuilder, model: &str) -> Result<T, CompletionError>
where
    T: serde::de::DeserializeOwned,
{
    let response = request
        .send()
        .await
        .map_err(|e| CompletionError::Communication(format!("Request failed: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(status_error(status, body, model));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| CompletionError::InvalidResponse(format!("Failed to parse response: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_error(StatusCode::TOO_MANY_REQUESTS, String::new(), "m"),
            CompletionError::RateLimitExceeded
        );
        assert_eq!(
            status_error(StatusCode::NOT_FOUND, String::new(), "gpt-x"),
            CompletionError::ModelNotAvailable("gpt-x".to_string())
        );
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, "bad key".into(), "m"),
            CompletionError::Configuration(_)
        ));
        assert!(matches!(
            status_error(StatusCode::BAD_GATEWAY, String::new(), "m"),
            CompletionError::Communication(_)
        ));
    }

    #[test]
    fn test_explicit_api_key_wins() {
        let key = resolve_api_key(Some("sk-test".to_string()), "DOCQA_TEST_UNSET_KEY").unwrap();
        assert_eq!(key, "sk-test");
    }

    #[test]
    fn test_missing_api_key() {
        let result = resolve_api_key(None, "DOCQA_TEST_DEFINITELY_UNSET_KEY");
        assert!(matches!(result, Err(CompletionError::Configuration(_))));
    }
}
