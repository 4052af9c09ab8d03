use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::{debug, error};

/// Which registry entries are offered and which one starts selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellPolicy {
    pub prefix: String,
    pub preferred: String,
    pub fallback: String,
}

impl Default for ShellPolicy {
    fn default() -> Self {
        Self {
            prefix: "/usr/".to_string(),
            preferred: "/usr/bin/bash".to_string(),
            fallback: "/bin/bash".to_string(),
        }
    }
}

/// Sorted, de-duplicated login shells plus the default selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCatalog {
    shells: Vec<String>,
    default: String,
}

impl ShellCatalog {
    /// Builds the catalog from the contents of a shells file.
    pub fn parse(contents: &str, policy: &ShellPolicy) -> Self {
        let shells: Vec<String> = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter(|line| line.starts_with(&policy.prefix))
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let default = if shells.contains(&policy.preferred) {
            policy.preferred.clone()
        } else {
            shells
                .first()
                .cloned()
                .unwrap_or_else(|| policy.preferred.clone())
        };

        Self { shells, default }
    }

    /// Reads the shells file, degrading to the fallback shell if it cannot be read.
    pub fn load<P: AsRef<Path>>(path: P, policy: &ShellPolicy) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => {
                let catalog = Self::parse(&contents, policy);
                debug!(
                    "Loaded {} shells from {:?}, default {}",
                    catalog.shells.len(),
                    path,
                    catalog.default
                );
                catalog
            }
            Err(e) => {
                error!("Error reading {:?}: {}", path, e);
                Self::fallback(policy)
            }
        }
    }

    pub fn fallback(policy: &ShellPolicy) -> Self {
        Self {
            shells: vec![policy.fallback.clone()],
            default: policy.fallback.clone(),
        }
    }

    pub fn shells(&self) -> &[String] {
        &self.shells
    }

    pub fn is_empty(&self) -> bool {
        self.shells.is_empty()
    }

    pub fn len(&self) -> usize {
        self.shells.len()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.shells.get(index).map(String::as_str)
    }

    pub fn position(&self, shell: &str) -> Option<usize> {
        self.shells.iter().position(|s| s == shell)
    }

    pub fn default_shell(&self) -> &str {
        &self.default
    }
}
