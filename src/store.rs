//! In-memory form state
//!
//! A cheaply clonable handle over the fields being edited, the selected
//! document, the cached profile and the message/error/loading slots.
//! Changing the CPF invalidates the whole in-progress record.

use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::{
    BasicField, DocumentFile, EsportsLinks, EsportsSite, Profile, ProfileFormData, SocialLinks,
    SocialNetwork,
};

/// Everything the form currently shows
#[derive(Debug, Clone, Default, Serialize)]
pub struct FormState {
    pub form: ProfileFormData,
    pub social_links: SocialLinks,
    pub esports_links: EsportsLinks,
    pub document: Option<DocumentFile>,
    /// Last profile returned by the service
    pub profile: Option<Profile>,
    pub message: String,
    pub error: String,
    pub loading: bool,
}

impl FormState {
    /// Drop everything that belongs to the previous identity.
    fn reset_dependents(&mut self) {
        self.social_links = SocialLinks::default();
        self.esports_links = EsportsLinks::default();
        self.document = None;
        self.profile = None;
        self.message.clear();
        self.error.clear();
    }
}

/// Shared handle to the form state.
#[derive(Clone, Default)]
pub struct FormStore {
    inner: Arc<RwLock<FormState>>,
    // Serializes hydration and submission against each other
    gate: Arc<Mutex<()>>,
}

impl FormStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> FormState {
        self.inner.read().clone()
    }

    pub fn read<R>(&self, f: impl FnOnce(&FormState) -> R) -> R {
        f(&self.inner.read())
    }

    pub(crate) fn update<R>(&self, f: impl FnOnce(&mut FormState) -> R) -> R {
        f(&mut self.inner.write())
    }

    pub(crate) fn gate(&self) -> &Mutex<()> {
        &self.gate
    }

    pub fn cpf(&self) -> String {
        self.read(|s| s.form.cpf.clone())
    }

    /// Set the CPF. A different value clears links, document, cached
    /// profile and messages.
    pub fn set_cpf(&self, cpf: impl Into<String>) {
        let cpf = cpf.into();
        self.update(|s| {
            if s.form.cpf == cpf {
                return;
            }
            tracing::debug!(cpf = %cpf, "CPF changed, clearing dependent form state");
            s.form.cpf = cpf;
            s.reset_dependents();
        });
    }

    pub fn set_basic_field(&self, field: BasicField, value: impl Into<String>) {
        if field == BasicField::Cpf {
            return self.set_cpf(value);
        }
        let value = value.into();
        self.update(|s| *s.form.slot_mut(field) = value);
    }

    pub fn set_social_link(&self, network: SocialNetwork, url: impl Into<String>) {
        let url = url.into();
        self.update(|s| s.social_links.set(network, url));
    }

    pub fn set_esports_link(&self, site: EsportsSite, url: impl Into<String>) {
        let url = url.into();
        self.update(|s| s.esports_links.set(site, url));
    }

    /// Select a document for the next submission, or clear the selection.
    pub fn select_document(&self, document: Option<DocumentFile>) {
        self.update(|s| s.document = document);
    }

    pub fn set_profile(&self, profile: Option<Profile>) {
        self.update(|s| s.profile = profile);
    }

    pub fn set_message(&self, message: impl Into<String>) {
        let message = message.into();
        self.update(|s| s.message = message);
    }

    pub fn set_error(&self, error: impl Into<String>) {
        let error = error.into();
        self.update(|s| s.error = error);
    }

    pub fn set_loading(&self, loading: bool) {
        self.update(|s| s.loading = loading);
    }

    pub fn clear_messages(&self) {
        self.update(|s| {
            s.message.clear();
            s.error.clear();
        });
    }

    pub fn message(&self) -> String {
        self.read(|s| s.message.clone())
    }

    pub fn error(&self) -> String {
        self.read(|s| s.error.clone())
    }

    pub fn is_loading(&self) -> bool {
        self.read(|s| s.loading)
    }

    pub fn profile(&self) -> Option<Profile> {
        self.read(|s| s.profile.clone())
    }

    pub fn has_loaded_profile(&self) -> bool {
        self.read(|s| s.profile.is_some())
    }

    /// Submit is offered only while idle and with a CPF typed in.
    pub fn can_submit(&self) -> bool {
        self.read(|s| !s.loading && !s.form.cpf.is_empty())
    }

    /// Status of the previously uploaded document, hidden while a new file
    /// is selected.
    pub fn document_status(&self) -> Option<&'static str> {
        self.read(|s| {
            let profile = s.profile.as_ref()?;
            if s.document.is_some() || profile.document_path.is_none() {
                return None;
            }
            Some(if profile.document_validated() {
                "Documento anterior enviado. Validado"
            } else {
                "Documento anterior enviado. Não validado"
            })
        })
    }

    /// Validation status of the stored eSports links.
    pub fn esports_status(&self) -> Option<&'static str> {
        self.read(|s| {
            let profile = s.profile.as_ref()?;
            profile.esports_profile_links.as_ref()?;
            Some(if profile.esports_links_validated() {
                "Status Validação Links: OK"
            } else {
                "Status Validação Links: Falha/Pendente"
            })
        })
    }
}
