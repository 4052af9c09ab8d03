use std::collections::HashMap;

/// Looks up the user-facing text for a message key.
pub trait Translate {
    fn translate(&self, key: &str) -> String;
}

/// Returns every key unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Translate for Identity {
    fn translate(&self, key: &str) -> String {
        key.to_string()
    }
}

/// Table-backed lookup; unknown keys fall through untranslated.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: HashMap<String, String>,
}

impl Catalog {
    pub fn new(entries: HashMap<String, String>) -> Self {
        Self { entries }
    }
}

impl Translate for Catalog {
    fn translate(&self, key: &str) -> String {
        self.entries
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}
