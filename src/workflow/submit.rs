//! Form submission pipeline
//!
//! Up to four sequential calls: profile upsert, document upload, social
//! links, eSports links. Each success is merged into the cached profile and
//! appended to the status message. The first failure stops the pipeline;
//! writes already accepted by the service stay in place.
//!
//! Editing the CPF while the pipeline runs detaches the form from it: the
//! remaining calls still go out for the submitted CPF, but nothing more is
//! written into the form.

use std::collections::BTreeMap;
use tokio::task::JoinHandle;
use tracing::{info, instrument, warn};

use crate::domain::cpf;
use crate::error::{FormError, SubmitError};
use crate::services::ProfileApi;
use crate::store::{FormState, FormStore};

use super::fan_signal::FanSignal;
use super::{messages, SubmissionStep};

/// Result of a fully successful submission
#[derive(Debug, Default)]
pub struct SubmissionReport {
    /// Calls made, in order
    pub steps: Vec<SubmissionStep>,
    /// Per-site relevance verdicts, when eSports links were sent
    pub validation_results: Option<BTreeMap<String, bool>>,
    /// Pending fan chat opening, when the brand was detected
    pub fan_signal: Option<JoinHandle<()>>,
}

impl SubmissionReport {
    pub fn fan_signal_scheduled(&self) -> bool {
        self.fan_signal.is_some()
    }
}

#[instrument(skip_all)]
pub async fn submit(
    store: &FormStore,
    api: &dyn ProfileApi,
    signal: &FanSignal,
) -> Result<SubmissionReport, SubmitError> {
    let _gate = store.gate().lock().await;

    store.clear_messages();
    let state = store.snapshot();

    if let Err(e) = check_cpf(&state.form.cpf) {
        store.set_error(e.to_string());
        return Err(e.into());
    }

    store.set_loading(true);

    let result = run_steps(store, api, &state).await;

    let result = match result {
        Ok(mut report) => {
            if signal.matches(&state.esports_links) {
                let notice = signal.notice();
                merge_current(store, &state.form.cpf, |s| append_status(s, &notice));
                report.fan_signal = Some(signal.schedule());
            }
            info!(steps = ?report.steps, "Submission finished");
            Ok(report)
        }
        Err(e) => {
            warn!(error = %e, "Submission aborted");
            merge_current(store, &state.form.cpf, |s| {
                s.message.clear();
                s.error = format!("{}{}", messages::SAVE_FAILED_PREFIX, e.user_message());
            });
            Err(e)
        }
    };

    store.set_loading(false);
    result
}

fn check_cpf(value: &str) -> Result<(), FormError> {
    if value.is_empty() {
        return Err(FormError::CpfRequired);
    }
    if !cpf::is_valid_format(value) {
        return Err(FormError::InvalidCpfFormat);
    }
    Ok(())
}

async fn run_steps(
    store: &FormStore,
    api: &dyn ProfileApi,
    state: &FormState,
) -> Result<SubmissionReport, SubmitError> {
    let cpf = state.form.cpf.as_str();
    let mut report = SubmissionReport::default();

    // 1. Basic profile fields
    let response = api
        .upsert_profile(&state.form)
        .await
        .map_err(|source| step_failed(SubmissionStep::Profile, source))?;
    merge_current(store, cpf, |s| {
        s.profile = Some(response.profile);
        s.message = response.message;
    });
    report.steps.push(SubmissionStep::Profile);

    // 2. Identity document
    if let Some(document) = &state.document {
        let response = api
            .upload_document(cpf, document)
            .await
            .map_err(|source| step_failed(SubmissionStep::Document, source))?;
        merge_current(store, cpf, |s| {
            let profile = s.profile.get_or_insert_with(Default::default);
            profile.document_path = Some(response.file_path);
            profile.document_validated = Some(response.validated);
            s.document = None;
            append_status(s, &response.message);
        });
        report.steps.push(SubmissionStep::Document);
    }

    // 3. Social links
    let social = state.social_links.filled();
    if !social.is_empty() {
        let response = api
            .save_social_links(cpf, &social)
            .await
            .map_err(|source| step_failed(SubmissionStep::SocialLinks, source))?;
        merge_current(store, cpf, |s| {
            let profile = s.profile.get_or_insert_with(Default::default);
            profile.social_media_links = response.profile.social_media_links;
            append_status(s, &response.message);
        });
        report.steps.push(SubmissionStep::SocialLinks);
    }

    // 4. eSports links
    let esports = state.esports_links.filled();
    if !esports.is_empty() {
        let response = api
            .save_esports_links(cpf, &esports)
            .await
            .map_err(|source| step_failed(SubmissionStep::EsportsLinks, source))?;
        let details = serde_json::to_string(&response.validation_results).unwrap_or_default();
        merge_current(store, cpf, |s| {
            let profile = s.profile.get_or_insert_with(Default::default);
            profile.esports_profile_links = response.profile.esports_profile_links;
            profile.esports_links_validated = response.profile.esports_links_validated;
            append_status(
                s,
                &format!("{} {}{}", response.message, messages::VALIDATION_DETAILS_PREFIX, details),
            );
        });
        report.validation_results = Some(response.validation_results);
        report.steps.push(SubmissionStep::EsportsLinks);
    }

    Ok(report)
}

fn step_failed(step: SubmissionStep, source: crate::error::ClientError) -> SubmitError {
    SubmitError::Step { step, source }
}

/// Apply `f` only while the form still holds `cpf`.
fn merge_current(store: &FormStore, cpf: &str, f: impl FnOnce(&mut FormState)) -> bool {
    store.update(|s| {
        if s.form.cpf != cpf {
            warn!(submitted = %cpf, current = %s.form.cpf, "CPF changed during submission, not merging");
            return false;
        }
        f(s);
        true
    })
}

fn append_status(state: &mut FormState, text: &str) {
    if !state.message.is_empty() {
        state.message.push(' ');
    }
    state.message.push_str(text);
}
