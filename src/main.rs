mod cli;

use anyhow::{bail, Result};
use clap::Parser;
use std::sync::Arc;

use know_your_fan::config::{self, Settings};
use know_your_fan::draft::Draft;
use know_your_fan::services::{ApiClient, LinkOpener, LogOpener, SystemOpener};
use know_your_fan::{logging, FanSignal, FormStore, HydrationOutcome, ProfileWorkflows};

use cli::{Cli, Cmd};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Load configuration
    let mut settings = Settings::from_env()?;
    if let Some(url) = &cli.api_base_url {
        settings.api_base_url = config::normalize_base_url(url)?;
    }

    // Initialize logging
    logging::init_logging(settings.env);

    tracing::debug!(
        env = ?settings.env,
        api_base_url = %settings.api_base_url,
        "Starting Know Your Fan client"
    );

    let api = ApiClient::new(&settings.api_base_url)?;

    let opener: Arc<dyn LinkOpener> = if settings.open_external {
        Arc::new(SystemOpener)
    } else {
        Arc::new(LogOpener)
    };
    let signal = FanSignal::from_settings(&settings, opener);

    let store = FormStore::new();
    let workflows = ProfileWorkflows::new(store.clone(), Arc::new(api.clone()), signal);

    match cli.cmd {
        Cmd::Ping => {
            let status = api.health_check().await?;
            println!("{} answered with {}", api.base_url(), status);
        }
        Cmd::Load { cpf } => {
            store.set_cpf(cpf);
            let outcome = workflows.on_cpf_blur().await;
            println!("{}", serde_json::to_string_pretty(&store.snapshot())?);

            if let Some(reason) = load_failure(&outcome, &store.error()) {
                bail!(reason);
            }
        }
        Cmd::Submit { draft, document } => {
            let mut draft = Draft::load(&draft).await?;
            if document.is_some() {
                draft.document = document;
            }
            draft.apply(&store).await?;

            match workflows.submit().await {
                Ok(report) => {
                    println!("{}", store.message());
                    if let Some(status) = store.document_status() {
                        println!("{}", status);
                    }
                    if let Some(status) = store.esports_status() {
                        println!("{}", status);
                    }
                    if let Some(profile) = store.profile() {
                        println!("{}", serde_json::to_string_pretty(&profile)?);
                    }
                    if let Some(pending) = report.fan_signal {
                        pending.await?;
                    }
                }
                Err(_) => bail!("{}", store.error()),
            }
        }
    }

    Ok(())
}

/// Exit reason for a `load` that did not end with a usable form.
fn load_failure(outcome: &HydrationOutcome, error: &str) -> Option<String> {
    match outcome {
        HydrationOutcome::Loaded | HydrationOutcome::NotFound => None,
        HydrationOutcome::Skipped => Some("CPF incompleto. Use XXX.XXX.XXX-XX".to_string()),
        HydrationOutcome::Superseded => Some("CPF alterado durante a busca.".to_string()),
        HydrationOutcome::InvalidFormat | HydrationOutcome::Failed => Some(error.to_string()),
    }
}
