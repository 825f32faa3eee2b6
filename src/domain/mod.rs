//! Domain types for fan profiles
//!
//! Form payloads, the cached profile record and the service response shapes.

pub mod cpf;
pub mod document;
pub mod links;
pub mod profile;

pub use document::{DocumentFile, DocumentKind};
pub use links::{EsportsLinks, EsportsSite, SocialLinks, SocialNetwork};
pub use profile::*;
