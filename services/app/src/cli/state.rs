//! services/app/src/cli/state.rs
//!
//! The application state shared by every command handler.

use crate::adapters::{BufferedAudioBackend, JsonFileStore, MemoryStore, ReqwestTransport};
use crate::config::Config;
use crate::error::AppError;
use std::sync::Arc;
use storyteller_core::ports::{AudioBackend, KeyValueStore};
use storyteller_core::{OnboardingFlag, SessionClient};

/// Created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub client: SessionClient,
    pub onboarding: OnboardingFlag,
    pub audio: Arc<dyn AudioBackend>,
}

impl AppState {
    /// Wires the adapters together. With `ephemeral`, nothing is written to disk.
    pub fn from_config(config: Arc<Config>, ephemeral: bool) -> Result<Self, AppError> {
        let store: Arc<dyn KeyValueStore> = if ephemeral {
            Arc::new(MemoryStore::new())
        } else {
            Arc::new(JsonFileStore::new(config.store_path.clone()))
        };
        Self::with_store(config, store)
    }

    pub fn with_store(config: Arc<Config>, store: Arc<dyn KeyValueStore>) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("storyteller/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let transport = Arc::new(ReqwestTransport::new(http.clone(), config.api_base_url.clone()));

        Ok(Self {
            client: SessionClient::new(transport, store.clone()),
            onboarding: OnboardingFlag::new(store),
            audio: Arc::new(BufferedAudioBackend::new(http)),
        })
    }
}
