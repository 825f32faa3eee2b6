//! Fan chat trigger
//!
//! When a fan links an eSports profile that mentions the brand, the chat
//! destination is opened once the submission has fully succeeded.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::config::Settings;
use crate::domain::EsportsLinks;
use crate::services::LinkOpener;

/// Case-insensitive brand scan over every typed eSports value, blank or not.
pub fn mentions_brand(links: &EsportsLinks, keyword: &str) -> bool {
    let keyword = keyword.trim().to_lowercase();
    if keyword.is_empty() {
        return false;
    }
    links
        .values()
        .any(|url| url.to_lowercase().contains(&keyword))
}

#[derive(Clone)]
pub struct FanSignal {
    keyword: String,
    chat_url: String,
    delay: Duration,
    opener: Arc<dyn LinkOpener>,
}

impl FanSignal {
    pub fn new(
        keyword: impl Into<String>,
        chat_url: impl Into<String>,
        delay: Duration,
        opener: Arc<dyn LinkOpener>,
    ) -> Self {
        Self {
            keyword: keyword.into(),
            chat_url: chat_url.into(),
            delay,
            opener,
        }
    }

    pub fn from_settings(settings: &Settings, opener: Arc<dyn LinkOpener>) -> Self {
        Self::new(
            settings.brand_keyword.clone(),
            settings.fan_chat_url.clone(),
            settings.fan_chat_delay(),
            opener,
        )
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn matches(&self, links: &EsportsLinks) -> bool {
        mentions_brand(links, &self.keyword)
    }

    /// Status line appended to the submission message on a match.
    pub fn notice(&self) -> String {
        format!(
            "Perfil ligado à {} detectado! Abrindo o chat da torcida...",
            self.keyword.trim().to_uppercase()
        )
    }

    /// Open the chat destination after the configured delay.
    ///
    /// Fire-and-forget: the task is never cancelled, the handle only lets a
    /// caller wait for it.
    pub fn schedule(&self) -> JoinHandle<()> {
        let opener = Arc::clone(&self.opener);
        let url = self.chat_url.clone();
        let delay = self.delay;

        tracing::info!(url = %url, delay_ms = delay.as_millis() as u64, "Fan chat scheduled");

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = opener.open(&url).await {
                tracing::warn!(url = %url, error = %e, "Failed to open fan chat");
            }
        })
    }
}
