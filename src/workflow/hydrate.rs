//! Profile hydration on CPF blur
//!
//! A complete, well-formed CPF loads the stored profile into the form. An
//! unknown CPF resets the form for a new profile.

use tracing::{info, instrument, warn};

use crate::domain::{cpf, EsportsLinks, ProfileFormData, SocialLinks};
use crate::error::FormError;
use crate::services::ProfileApi;
use crate::store::FormStore;

use super::messages;

/// What a blur on the CPF field led to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HydrationOutcome {
    /// Empty or still being typed; nothing happened
    Skipped,
    /// Full length but malformed; no request was made
    InvalidFormat,
    /// Existing profile loaded into the form
    Loaded,
    /// No profile for this CPF; form reset for a new one
    NotFound,
    /// The CPF changed while the request was in flight; response dropped
    Superseded,
    /// Lookup failed; the error slot holds the reason
    Failed,
}

#[instrument(skip_all)]
pub async fn hydrate(store: &FormStore, api: &dyn ProfileApi) -> HydrationOutcome {
    let cpf = store.cpf();
    if cpf.is_empty() {
        return HydrationOutcome::Skipped;
    }

    if !cpf::is_valid_format(&cpf) {
        if !cpf::reached_full_length(&cpf) {
            return HydrationOutcome::Skipped;
        }
        store.update(|s| {
            s.error = FormError::InvalidCpfFormat.to_string();
            s.profile = None;
        });
        return HydrationOutcome::InvalidFormat;
    }

    let _gate = store.gate().lock().await;

    store.update(|s| {
        s.message.clear();
        s.error.clear();
        s.loading = true;
    });

    let result = api.get_profile(&cpf).await;

    let outcome = store.update(|s| {
        s.loading = false;

        if s.form.cpf != cpf {
            warn!(requested = %cpf, current = %s.form.cpf, "CPF changed during lookup, dropping response");
            return HydrationOutcome::Superseded;
        }

        match result {
            Ok(mut profile) => {
                if profile.cpf.is_empty() {
                    profile.cpf = cpf.clone();
                }
                s.form = profile.to_form_data();
                s.social_links = SocialLinks::from_stored(profile.social_media_links.as_deref());
                s.esports_links =
                    EsportsLinks::from_stored(profile.esports_profile_links.as_deref());
                s.profile = Some(profile);
                s.message = messages::PROFILE_LOADED.to_string();
                HydrationOutcome::Loaded
            }
            Err(e) if e.is_not_found() => {
                s.form = ProfileFormData::only_cpf(cpf.clone());
                s.social_links = SocialLinks::default();
                s.esports_links = EsportsLinks::default();
                s.document = None;
                s.profile = None;
                s.message = messages::CPF_NOT_FOUND.to_string();
                HydrationOutcome::NotFound
            }
            Err(e) => {
                warn!(error = %e, "Profile lookup failed");
                s.error = format!("{}{}", messages::LOOKUP_FAILED_PREFIX, e.user_message());
                HydrationOutcome::Failed
            }
        }
    });

    info!(outcome = ?outcome, "Profile hydration finished");
    outcome
}
