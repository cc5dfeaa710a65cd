use std::path::Path;

use config::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};

pub mod validator;

use crate::cli::Cli;
use crate::domain::RouteTable;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8083/api/inlong/manager";
const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub manager: ManagerSettings,
    #[serde(default)]
    pub routes: RouteTable,
}

/// Where the InLong manager API lives
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ManagerSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

impl Default for ManagerSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Settings {
    /// Loads `path` (optional) on top of the defaults and validates the result.
    pub fn from_file(path: &Path) -> Result<Self, anyhow::Error> {
        Self::load(path)?.validated()
    }

    fn load(path: &Path) -> Result<Self, anyhow::Error> {
        let s = Config::builder()
            .add_source(File::from(path.to_path_buf()).format(FileFormat::Toml).required(false))
            .set_default("manager.base_url", DEFAULT_BASE_URL)?
            .set_default("manager.timeout_seconds", DEFAULT_TIMEOUT_SECONDS as i64)?
            .build()?;

        Ok(s.try_deserialize()?)
    }

    /// Create settings from CLI arguments (config file plus CLI overrides)
    pub fn new_with_cli(cli: &Cli) -> Result<Self, anyhow::Error> {
        let mut settings = Self::load(&cli.config)?;

        // CLI > env vars > config file
        settings.apply_cli_overrides(cli);
        settings.validated()
    }

    fn apply_cli_overrides(&mut self, cli: &Cli) {
        if let Some(url) = &cli.manager_url {
            self.manager.base_url = url.clone();
        }
        if let Some(timeout) = cli.timeout {
            self.manager.timeout_seconds = timeout;
        }
    }

    fn validated(self) -> Result<Self, anyhow::Error> {
        validator::ConfigValidator::validate(&self).map_err(|errors| {
            let error_messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            anyhow::anyhow!(
                "Configuration validation failed:\n{}",
                error_messages.join("\n")
            )
        })?;
        Ok(self)
    }
}
