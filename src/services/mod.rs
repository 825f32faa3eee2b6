//! Service layer modules for external integrations.
//!
//! Contains the profile service client and the launcher for external links.

pub mod api_client;
pub mod launcher;

pub use api_client::{ApiClient, ProfileApi};
pub use launcher::{LinkOpener, LogOpener, SystemOpener};
