use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "know-your-fan", version, about = "Know Your Fan profile client")]
pub struct Cli {
    /// Profile service base URL (overrides KYF_API_BASE_URL)
    #[arg(long, global = true)]
    pub api_base_url: Option<String>,

    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand)]
pub enum Cmd {
    /// Check that the profile service answers
    Ping,
    /// Load the profile stored for a CPF and print the form state
    Load {
        /// CPF in the XXX.XXX.XXX-XX format
        cpf: String,
    },
    /// Submit a form draft (JSON) to the profile service
    Submit {
        draft: PathBuf,
        /// Document to upload, replacing the draft's own
        #[arg(long)]
        document: Option<PathBuf>,
    },
}
