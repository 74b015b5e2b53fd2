//! Error kinds for generation and upstream calls.

use promptsmith_core::utils::char_prefix;
use thiserror::Error;
use tracing::error;

/// Longest upstream body excerpt carried in an error.
pub const BODY_SNIPPET_CHARS: usize = 200;

/// A failed call to a provider.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Provider answered with a non-2xx status. `body` is at most
    /// [`BODY_SNIPPET_CHARS`] characters.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("превышено время ожидания ответа")]
    Timeout,

    #[error("{0}")]
    Transport(String),

    /// 2xx response whose payload did not have the expected shape.
    #[error("некорректный ответ провайдера: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            UpstreamError::Timeout
        } else if e.is_decode() {
            UpstreamError::Malformed(e.to_string())
        } else {
            UpstreamError::Transport(e.to_string())
        }
    }
}

/// Why a generation did not produce prompts.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Неизвестный провайдер: {0}")]
    UnknownProvider(String),

    #[error("API ключ не указан")]
    MissingCredential,

    #[error(transparent)]
    GenerationFailed(#[from] UpstreamError),
}

impl GenerateError {
    /// Errors caused by the caller's input rather than the provider.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, GenerateError::GenerationFailed(_))
    }
}

/// Pass a 2xx response through; turn anything else into `UpstreamError::Status`.
pub(crate) async fn ensure_success(
    provider: &str,
    response: reqwest::Response,
) -> Result<reqwest::Response, UpstreamError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let body = char_prefix(&body, BODY_SNIPPET_CHARS).to_string();
    error!(provider, status = %status, body = %body, "API error");
    Err(UpstreamError::Status {
        status: status.as_u16(),
        body,
    })
}
