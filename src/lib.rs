//! Know Your Fan client
//!
//! Form state, profile hydration and the submission pipeline for the
//! Know Your Fan profile service.

pub mod config;
pub mod domain;
pub mod draft;
pub mod error;
pub mod logging;
pub mod services;
pub mod store;
pub mod workflow;

pub use error::{ClientError, FormError, SubmitError};
pub use services::{ApiClient, ProfileApi};
pub use store::{FormState, FormStore};
pub use workflow::{FanSignal, HydrationOutcome, ProfileWorkflows, SubmissionReport};
