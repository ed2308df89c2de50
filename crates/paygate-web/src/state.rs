//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor. Built once at startup and never mutated:
//! the provider is behind `Arc<dyn PaymentProvider>` so the live client and
//! the mock are interchangeable, and the renderer holds the parsed
//! templates.

use std::sync::Arc;

use paygate_provider::{MockProvider, PaymentProvider, ProviderMode};

use crate::render::Renderer;

#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn PaymentProvider>,
    pub renderer: Arc<Renderer>,
    /// Provider environment, reported by the readiness probe.
    pub mode: ProviderMode,
}

impl AppState {
    pub fn new(
        provider: Arc<dyn PaymentProvider>,
        mode: ProviderMode,
    ) -> Result<Self, tera::Error> {
        Ok(Self {
            provider,
            renderer: Arc::new(Renderer::new()?),
            mode,
        })
    }

    /// State backed by a [`MockProvider`] in sandbox mode.
    pub fn with_mock(mock: Arc<MockProvider>) -> Result<Self, tera::Error> {
        Self::new(mock, ProviderMode::Sandbox)
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("provider", &self.provider.provider_name())
            .field("mode", &self.mode)
            .finish()
    }
}
