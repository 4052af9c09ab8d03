use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Source of the account names that already exist on the system.
pub trait UserDirectory {
    fn existing_usernames(&self) -> HashSet<String>;
}

/// Reads names from a passwd-format account database.
#[derive(Debug, Clone)]
pub struct PasswdDirectory {
    path: PathBuf,
}

impl PasswdDirectory {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

impl UserDirectory for PasswdDirectory {
    fn existing_usernames(&self) -> HashSet<String> {
        let Ok(content) = fs::read_to_string(&self.path) else {
            // Treat an unreadable database as empty; useradd still rejects duplicates.
            warn!("Could not read {:?}, assuming no existing users", self.path);
            return HashSet::new();
        };

        let names: HashSet<String> = content.lines().filter_map(parse_passwd_name).collect();
        debug!("Found {} existing accounts", names.len());
        names
    }
}

fn parse_passwd_name(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let name = line.split(':').next()?;
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Fixed in-memory list of names.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    names: HashSet<String>,
}

impl StaticDirectory {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl UserDirectory for StaticDirectory {
    fn existing_usernames(&self) -> HashSet<String> {
        self.names.clone()
    }
}
