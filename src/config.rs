use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::account::ShellPolicy;
use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "/etc/firstboot/user.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SetupConfig {
    pub general: GeneralConfig,
    pub user: UserConfig,
    /// Replacement text for user-facing messages, keyed by the English message
    pub translations: HashMap<String, String>,
}

impl SetupConfig {
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: SetupConfig = toml::from_str(&content)?;
        info!("Loaded config from {:?}", path);
        Ok(config)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub title: String,
    pub subtitle: String,
    /// Dry run mode - the account is never created, the request is only logged
    pub dryrun: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            title: "System Setup".to_string(),
            subtitle: "Create your user account".to_string(),
            dryrun: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    /// Supplementary groups for the new account
    pub groups: Vec<String>,
    pub create_home: bool,
    pub shells_file: PathBuf,
    pub passwd_file: PathBuf,
    /// Only shells under this prefix are offered
    pub shell_prefix: String,
    pub preferred_shell: String,
    /// Used when the shells file cannot be read at all
    pub fallback_shell: String,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            groups: vec!["wheel".to_string()],
            create_home: true,
            shells_file: PathBuf::from("/etc/shells"),
            passwd_file: PathBuf::from("/etc/passwd"),
            shell_prefix: "/usr/".to_string(),
            preferred_shell: "/usr/bin/bash".to_string(),
            fallback_shell: "/bin/bash".to_string(),
        }
    }
}

impl UserConfig {
    pub fn shell_policy(&self) -> ShellPolicy {
        ShellPolicy {
            prefix: self.shell_prefix.clone(),
            preferred: self.preferred_shell.clone(),
            fallback: self.fallback_shell.clone(),
        }
    }
}
