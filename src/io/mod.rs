//! IO modules - external system interfaces
//!
//! This module contains all external IO operations:
//! - `server` - backend HTTP API (user list, item catalog, point creation)
//! - `api` - backend API client used by the registration form
//! - `ibge` - IBGE localities client (UF and municipality lists)
//! - `geolocation` - one-shot device position lookup

pub mod api;
pub mod geolocation;
pub mod ibge;
pub mod server;

// Re-export commonly used types
pub use api::{ApiClient, PointsApi};
pub use geolocation::{ConfiguredLocation, LocationProvider};
pub use ibge::{IbgeClient, LocalityProvider};
pub use server::{start_api_server, AppState};
