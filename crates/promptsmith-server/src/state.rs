use std::sync::Arc;

use promptsmith_core::history::HistoryStore;
use promptsmith_providers::{Dispatcher, KeyValidator, ProviderCatalog};

/// Shared handler state. Everything inside is immutable or internally locked.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Dispatcher,
    pub validator: KeyValidator,
    pub history: Arc<HistoryStore>,
}

impl AppState {
    pub fn new(catalog: Arc<ProviderCatalog>, history: Arc<HistoryStore>) -> Self {
        Self {
            dispatcher: Dispatcher::new(catalog.clone()),
            validator: KeyValidator::new(catalog),
            history,
        }
    }
}
