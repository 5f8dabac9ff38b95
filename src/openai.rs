//! OpenAI client configuration and error translation.

use crate::error::{Result, VidlibError};
use async_openai::error::OpenAIError;
use async_openai::{config::OpenAIConfig, Client};
use backoff::ExponentialBackoffBuilder;
use std::time::Duration;

/// Error types and codes OpenAI uses for quota and rate-limit rejections (HTTP 429).
const RATE_LIMIT_TYPES: &[&str] = &["insufficient_quota", "rate_limit_exceeded", "requests", "tokens"];

/// Create an OpenAI client with a custom timeout.
///
/// Retries are disabled: a rate-limited call surfaces immediately instead of
/// being retried with backoff by the client.
pub fn create_client_with_timeout(timeout: Duration) -> Result<Client<OpenAIConfig>> {
    let http_client = reqwest::Client::builder().timeout(timeout).build()?;

    let no_retry = ExponentialBackoffBuilder::new()
        .with_max_elapsed_time(Some(Duration::ZERO))
        .build();

    Ok(Client::with_config(OpenAIConfig::default())
        .with_http_client(http_client)
        .with_backoff(no_retry))
}

/// Translate an OpenAI error into the provider taxonomy.
pub fn provider_error(context: &str, err: OpenAIError) -> VidlibError {
    match err {
        OpenAIError::ApiError(api) => {
            let rate_limited = [api.r#type.as_deref(), api.code.as_deref()]
                .into_iter()
                .flatten()
                .any(|t| RATE_LIMIT_TYPES.contains(&t));
            if rate_limited {
                VidlibError::RateLimited(
                    "OpenAI quota exceeded. Check your plan at https://platform.openai.com/account/billing"
                        .to_string(),
                )
            } else {
                VidlibError::Provider(format!("{}: {}", context, api.message))
            }
        }
        other => VidlibError::Provider(format!("{}: {}", context, other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_openai::error::ApiError;

    fn api_error(kind: Option<&str>) -> OpenAIError {
        OpenAIError::ApiError(ApiError {
            message: "nope".to_string(),
            r#type: kind.map(str::to_string),
            param: None,
            code: None,
        })
    }

    #[test]
    fn test_quota_errors_are_rate_limited() {
        let err = provider_error("Embedding API error", api_error(Some("insufficient_quota")));
        assert!(matches!(err, VidlibError::RateLimited(_)));
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[test]
    fn test_rate_limit_code_without_type() {
        let err = OpenAIError::ApiError(ApiError {
            message: "Rate limit reached".to_string(),
            r#type: None,
            param: None,
            code: Some("rate_limit_exceeded".to_string()),
        });
        assert!(matches!(
            provider_error("Chat API error", err),
            VidlibError::RateLimited(_)
        ));
    }

    #[test]
    fn test_other_errors_are_provider_errors() {
        let err = provider_error("Embedding API error", api_error(Some("server_error")));
        match err {
            VidlibError::Provider(msg) => assert_eq!(msg, "Embedding API error: nope"),
            other => panic!("unexpected error: {other:?}"),
        }

        let err = provider_error("Chat API error", OpenAIError::InvalidArgument("bad".into()));
        assert!(matches!(err, VidlibError::Provider(_)));
    }
}
