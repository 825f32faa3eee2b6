use anyhow::{bail, Context, Result};
use std::env;
use std::time::Duration;
use url::Url;

/// Deployment profile, read from `ENV`. Only affects log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Local runs against a development profile service
    #[default]
    Local,
    Staging,
    Production,
}

impl Environment {
    /// Unknown names fall back to `Local`.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "staging" => Self::Staging,
            _ => Self::Local,
        }
    }

    /// Filter used when `RUST_LOG` is unset.
    pub fn log_directives(self) -> &'static str {
        match self {
            Self::Local => "know_your_fan=debug,reqwest=info,warn",
            Self::Staging => "know_your_fan=info,warn",
            Self::Production => "know_your_fan=warn,error",
        }
    }

    /// Machine-readable log lines for collectors
    pub fn json_logs(self) -> bool {
        self == Self::Production
    }

    pub fn logs_source_location(self) -> bool {
        self == Self::Local
    }
}

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_BRAND_KEYWORD: &str = "furia";
pub const DEFAULT_FAN_CHAT_URL: &str = "https://www.furia.gg";
pub const DEFAULT_FAN_CHAT_DELAY_MS: u64 = 1500;

#[derive(Debug, Clone)]
pub struct Settings {
    pub env: Environment,

    // Profile service
    pub api_base_url: String,

    // Fan chat trigger
    pub brand_keyword: String,
    pub fan_chat_url: String,
    pub fan_chat_delay_ms: u64,
    pub open_external: bool,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build settings from any variable source.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let env = var("ENV").map(|name| Environment::parse(&name)).unwrap_or_default();

        // Profile service
        let api_base_url = normalize_base_url(
            &var("KYF_API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
        )
        .context("KYF_API_BASE_URL must be an http(s) URL")?;

        // Fan chat trigger
        let brand_keyword = var("KYF_BRAND_KEYWORD")
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| DEFAULT_BRAND_KEYWORD.to_string());
        let fan_chat_url = var("KYF_FAN_CHAT_URL")
            .unwrap_or_else(|| DEFAULT_FAN_CHAT_URL.to_string());
        Url::parse(&fan_chat_url).context("KYF_FAN_CHAT_URL must be a valid URL")?;
        let fan_chat_delay_ms = var("KYF_FAN_CHAT_DELAY_MS")
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_FAN_CHAT_DELAY_MS);
        let open_external = var("KYF_OPEN_EXTERNAL")
            .map(|s| !matches!(s.trim().to_lowercase().as_str(), "0" | "false" | "no" | "off"))
            .unwrap_or(true);

        Ok(Settings {
            env,
            api_base_url,
            brand_keyword,
            fan_chat_url,
            fan_chat_delay_ms,
            open_external,
        })
    }

    pub fn fan_chat_delay(&self) -> Duration {
        Duration::from_millis(self.fan_chat_delay_ms)
    }
}

/// Validate an API base URL and strip trailing slashes.
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let url = Url::parse(raw.trim()).with_context(|| format!("Invalid URL '{}'", raw))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("Unsupported URL scheme '{}'", url.scheme());
    }
    Ok(url.as_str().trim_end_matches('/').to_string())
}
