//! Form workflows
//!
//! Hydration when the CPF field loses focus, the submission pipeline, and
//! the fan chat trigger that follows a successful submission.

pub mod fan_signal;
pub mod hydrate;
pub mod submit;

use std::fmt;
use std::sync::Arc;

use crate::error::SubmitError;
use crate::services::ProfileApi;
use crate::store::FormStore;

pub use fan_signal::{mentions_brand, FanSignal};
pub use hydrate::HydrationOutcome;
pub use submit::SubmissionReport;

/// Status and error texts shown on the form
pub mod messages {
    pub const PROFILE_LOADED: &str = "Perfil carregado. Você pode editar os dados.";
    pub const CPF_NOT_FOUND: &str = "CPF não encontrado. Um novo perfil será criado ao salvar.";
    pub const LOOKUP_FAILED_PREFIX: &str = "Erro ao buscar perfil: ";
    pub const SAVE_FAILED_PREFIX: &str = "Falha ao salvar: ";
    pub const VALIDATION_DETAILS_PREFIX: &str = "Detalhes validação: ";
}

/// One remote call of the submission pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStep {
    Profile,
    Document,
    SocialLinks,
    EsportsLinks,
}

impl fmt::Display for SubmissionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Profile => "profile upsert",
            Self::Document => "document upload",
            Self::SocialLinks => "social links",
            Self::EsportsLinks => "eSports links",
        })
    }
}

/// The form's event handlers, bound to one store and one profile service.
#[derive(Clone)]
pub struct ProfileWorkflows {
    store: FormStore,
    api: Arc<dyn ProfileApi>,
    signal: FanSignal,
}

impl ProfileWorkflows {
    pub fn new(store: FormStore, api: Arc<dyn ProfileApi>, signal: FanSignal) -> Self {
        Self { store, api, signal }
    }

    pub fn store(&self) -> &FormStore {
        &self.store
    }

    /// CPF field lost focus.
    pub async fn on_cpf_blur(&self) -> HydrationOutcome {
        hydrate::hydrate(&self.store, self.api.as_ref()).await
    }

    /// Form submitted.
    pub async fn submit(&self) -> Result<SubmissionReport, SubmitError> {
        submit::submit(&self.store, self.api.as_ref(), &self.signal).await
    }
}
