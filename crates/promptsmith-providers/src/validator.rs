//! Credential checks against a provider's cheapest authenticated endpoint.

use std::sync::Arc;

use tracing::{info, warn};

use promptsmith_core::types::KeyCheckResponse;

use crate::dispatcher::ProviderCatalog;
use crate::error::UpstreamError;
use crate::registry::{self, ProviderDescriptor};

/// Result of a key check. Never an error: every failure becomes `ok: false`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyCheck {
    pub ok: bool,
    pub message: String,
}

impl KeyCheck {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    fn fail(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

impl From<KeyCheck> for KeyCheckResponse {
    fn from(check: KeyCheck) -> Self {
        KeyCheckResponse {
            success: check.ok,
            message: check.message,
        }
    }
}

#[derive(Clone)]
pub struct KeyValidator {
    catalog: Arc<ProviderCatalog>,
}

impl KeyValidator {
    pub fn new(catalog: Arc<ProviderCatalog>) -> Self {
        Self { catalog }
    }

    /// Probe `credential` against `provider_id`.
    ///
    /// An empty credential or unknown provider is rejected without any
    /// network call.
    pub async fn check(&self, provider_id: &str, credential: &str) -> KeyCheck {
        let descriptor = match registry::lookup(provider_id) {
            Ok(d) => d,
            Err(e) => return KeyCheck::fail(e.to_string()),
        };
        if credential.is_empty() {
            return KeyCheck::fail("API ключ не указан");
        }
        let Some(adapter) = self.catalog.adapter(descriptor.id) else {
            return KeyCheck::fail(format!("Неизвестный провайдер: {provider_id}"));
        };

        let result = adapter.probe(credential, self.catalog.probe_timeout()).await;
        let check = classify(descriptor, result);
        if check.ok {
            info!(provider = provider_id, "API key accepted");
        } else {
            warn!(provider = provider_id, reason = %check.message, "API key rejected");
        }
        check
    }
}

/// Map a probe outcome to a human-readable verdict.
fn classify(descriptor: &ProviderDescriptor, result: Result<(), UpstreamError>) -> KeyCheck {
    match result {
        Ok(()) => KeyCheck::ok(format!("API ключ {} работает", descriptor.display_name)),
        Err(UpstreamError::Status { status: 401, .. }) => KeyCheck::fail("Неверный API ключ"),
        Err(UpstreamError::Status { status: 402, .. }) => {
            KeyCheck::fail("Недостаточно средств на счёте")
        }
        Err(UpstreamError::Status { status: 429, .. }) => {
            KeyCheck::fail("Превышен лимит запросов, попробуйте позже")
        }
        Err(UpstreamError::Status { status, body }) => {
            KeyCheck::fail(format!("Ошибка {status}: {body}"))
        }
        Err(UpstreamError::Timeout) => KeyCheck::fail("Превышено время ожидания ответа"),
        Err(e) => KeyCheck::fail(format!("Ошибка: {e}")),
    }
}
