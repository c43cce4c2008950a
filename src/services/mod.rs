//! Services - business logic and state management
//!
//! This module contains the core business logic:
//! - `registration` - the collection point registration form state machine

pub mod registration;

// Re-export commonly used types
pub use registration::{CityFetch, FormEvent, RegistrationForm, SubmissionOutcome};
