use lp_core::retry::is_retryable_status;

/// Errors from any outbound provider call.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("{service} API error ({status}): {body}")]
    Api {
        service: &'static str,
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// A 2xx response did not contain what we asked for.
    #[error("{service} returned an unexpected response: {message}")]
    InvalidResponse {
        service: &'static str,
        message: String,
    },
}

impl ProviderError {
    /// Transport failures and transient upstream statuses are retried;
    /// client errors and malformed responses are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            ProviderError::Request(err) => !err.is_builder(),
            ProviderError::Api { status, .. } => is_retryable_status(*status),
            ProviderError::InvalidResponse { .. } => false,
        }
    }
}

/// Return the response unchanged on 2xx, otherwise an [`ProviderError::Api`]
/// carrying the status and body text.
pub(crate) async fn ensure_success(
    service: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        return Err(ProviderError::Api {
            service,
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}
