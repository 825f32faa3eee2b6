//! Form drafts
//!
//! A JSON file holding what a fan would type into the form, used by the
//! command-line client in place of the page.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::domain::{DocumentFile, EsportsLinks, ProfileFormData, SocialLinks};
use crate::error::FormError;
use crate::store::FormStore;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Draft {
    #[serde(flatten)]
    pub form: ProfileFormData,
    #[serde(default)]
    pub social_links: SocialLinks,
    #[serde(default)]
    pub esports_links: EsportsLinks,
    /// Document to upload, relative paths resolved against the draft file
    #[serde(default)]
    pub document: Option<PathBuf>,
}

impl Draft {
    pub async fn load(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read draft {}", path.display()))?;
        let mut draft: Draft = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid draft {}", path.display()))?;

        if let (Some(document), Some(dir)) = (draft.document.as_mut(), path.parent()) {
            if document.is_relative() {
                *document = dir.join(&*document);
            }
        }

        Ok(draft)
    }

    /// Type the draft into the form. The CPF goes first since changing it
    /// clears everything else.
    pub async fn apply(self, store: &FormStore) -> Result<(), FormError> {
        let document = match &self.document {
            Some(path) => Some(DocumentFile::from_path(path).await?),
            None => None,
        };

        store.set_cpf(self.form.cpf.clone());
        store.update(|s| {
            s.form = self.form;
            s.social_links = self.social_links;
            s.esports_links = self.esports_links;
            s.document = document;
        });
        Ok(())
    }
}
