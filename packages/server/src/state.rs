use std::sync::Arc;

use api::RephraseClient;
use store::MemStorage;

use crate::settings::Settings;

/// Shared application state, built once in the entry point and injected into
/// every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<MemStorage>,
    pub rephraser: RephraseClient,
}

impl AppState {
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        let rephraser = RephraseClient::new(
            &settings.rephrase.url,
            &settings.rephrase.key,
            &settings.rephrase.model,
        )?;
        Ok(Self {
            store: Arc::new(MemStorage::new()),
            rephraser,
        })
    }
}
