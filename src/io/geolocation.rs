//! Device location lookup
//!
//! The registration form issues a single position query at startup. Headless
//! deployments provide a fixed position via `[geolocation]` config; when no
//! position is configured the query resolves to nothing and the form keeps
//! the origin default.

use crate::domain::types::Coordinates;
use crate::infra::Config;
use async_trait::async_trait;

/// One-shot device position query
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// `None` when no position is available; there is no retry
    async fn current_position(&self) -> Option<Coordinates>;
}

/// Fixed position sourced from configuration
pub struct ConfiguredLocation {
    position: Option<Coordinates>,
}

impl ConfiguredLocation {
    pub fn new(config: &Config) -> Self {
        Self { position: config.device_position() }
    }
}

#[async_trait]
impl LocationProvider for ConfiguredLocation {
    async fn current_position(&self) -> Option<Coordinates> {
        self.position
    }
}
