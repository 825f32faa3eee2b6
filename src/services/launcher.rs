//! Opening external destinations (the fan chat) outside the client.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use tokio::process::Command;

/// Something that can present a URL to the fan.
#[async_trait]
pub trait LinkOpener: Send + Sync {
    async fn open(&self, url: &str) -> Result<()>;
}

/// Opens URLs with the platform's default handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemOpener;

impl SystemOpener {
    fn command(url: &str) -> Command {
        if cfg!(target_os = "macos") {
            let mut cmd = Command::new("open");
            cmd.arg(url);
            cmd
        } else if cfg!(target_os = "windows") {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", "start", "", url]);
            cmd
        } else {
            let mut cmd = Command::new("xdg-open");
            cmd.arg(url);
            cmd
        }
    }
}

#[async_trait]
impl LinkOpener for SystemOpener {
    async fn open(&self, url: &str) -> Result<()> {
        let status = Self::command(url)
            .status()
            .await
            .context("Failed to launch URL opener")?;

        if !status.success() {
            bail!("URL opener exited with {}", status);
        }

        tracing::info!(url = url, "Opened external destination");
        Ok(())
    }
}

/// Only logs the URL. Used when opening external windows is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogOpener;

#[async_trait]
impl LinkOpener for LogOpener {
    async fn open(&self, url: &str) -> Result<()> {
        tracing::info!(url = url, "External destination ready (opening disabled)");
        Ok(())
    }
}
