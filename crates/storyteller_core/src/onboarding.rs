//! crates/storyteller_core/src/onboarding.rs
//!
//! The "onboarding completed" flag, kept in its own durable slot.

use crate::ports::{KeyValueStore, PortResult};
use std::sync::Arc;

pub const ONBOARDING_KEY: &str = "onboardingCompleted";

#[derive(Clone)]
pub struct OnboardingFlag {
    store: Arc<dyn KeyValueStore>,
}

impl OnboardingFlag {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// True only when the slot holds the literal `"true"`.
    pub async fn is_completed(&self) -> PortResult<bool> {
        Ok(self.store.get(ONBOARDING_KEY).await?.as_deref() == Some("true"))
    }

    pub async fn mark_completed(&self) -> PortResult<()> {
        self.store.set(ONBOARDING_KEY, "true").await
    }

    pub async fn reset(&self) -> PortResult<()> {
        self.store.remove(ONBOARDING_KEY).await
    }
}
