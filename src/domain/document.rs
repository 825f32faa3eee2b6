//! Identity document selected for upload

use serde::Serialize;
use std::path::Path;

use crate::error::FormError;

/// Upload ceiling enforced by the profile service (16 MiB)
pub const MAX_DOCUMENT_BYTES: u64 = 16 * 1024 * 1024;

/// Accepted document formats
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Png,
    Jpeg,
    Pdf,
}

impl DocumentKind {
    /// Resolve the kind from the file extension, case-insensitively.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let (_, extension) = file_name.rsplit_once('.')?;
        match extension.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Pdf => "application/pdf",
        }
    }
}

/// A selected document. Held only until it has been uploaded.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DocumentFile {
    pub file_name: String,
    pub kind: DocumentKind,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl DocumentFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, FormError> {
        let file_name = file_name.into();
        let kind = DocumentKind::from_file_name(&file_name)
            .ok_or_else(|| FormError::UnsupportedDocument(file_name.clone()))?;

        let size = bytes.len() as u64;
        if size > MAX_DOCUMENT_BYTES {
            return Err(FormError::DocumentTooLarge(size));
        }

        Ok(Self {
            file_name,
            kind,
            bytes,
        })
    }

    /// Read a document from disk, checking its type before touching the file.
    pub async fn from_path(path: &Path) -> Result<Self, FormError> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        if DocumentKind::from_file_name(&file_name).is_none() {
            return Err(FormError::UnsupportedDocument(file_name));
        }

        let size = tokio::fs::metadata(path).await?.len();
        if size > MAX_DOCUMENT_BYTES {
            return Err(FormError::DocumentTooLarge(size));
        }

        let bytes = tokio::fs::read(path).await?;
        Self::new(file_name, bytes)
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}
