//! Client error taxonomy
//!
//! Validation failures never reach the network, a missing profile is an
//! expected outcome, and everything else is a server or transport failure
//! surfaced with the service's own `error` text when it sent one.

use thiserror::Error;

use crate::workflow::SubmissionStep;

/// Shown when a failure carries no usable text
pub const GENERIC_ERROR_MESSAGE: &str = "Ocorreu um erro desconhecido.";

/// Errors raised by the profile service adapter
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Profile service error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Profile service unavailable: {0}")]
    Transport(String),

    #[error("Invalid profile service response: {0}")]
    InvalidResponse(String),
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Text for the form's error slot.
    pub fn user_message(&self) -> String {
        let message = match self {
            Self::NotFound(msg) => msg,
            Self::Api { message, .. } => message,
            Self::Transport(msg) => msg,
            Self::InvalidResponse(msg) => msg,
        };

        if message.trim().is_empty() {
            GENERIC_ERROR_MESSAGE.to_string()
        } else {
            message.clone()
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::InvalidResponse(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

/// Client-side validation failures
#[derive(Debug, Error)]
pub enum FormError {
    #[error("O CPF é obrigatório para salvar qualquer informação.")]
    CpfRequired,

    #[error("Formato do CPF inválido. Use XXX.XXX.XXX-XX")]
    InvalidCpfFormat,

    #[error("Tipo de arquivo não permitido: {0}")]
    UnsupportedDocument(String),

    #[error("Arquivo muito grande ({0} bytes)")]
    DocumentTooLarge(u64),

    #[error("Falha ao ler o arquivo: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a submission stopped
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Form(#[from] FormError),

    #[error("{step} failed: {source}")]
    Step {
        step: SubmissionStep,
        #[source]
        source: ClientError,
    },
}

impl SubmitError {
    pub fn user_message(&self) -> String {
        match self {
            Self::Form(e) => e.to_string(),
            Self::Step { source, .. } => source.user_message(),
        }
    }
}
