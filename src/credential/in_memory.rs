use std::sync::RwLock;

use super::CredentialStore;

#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    value: RwLock<Option<String>>,
}

impl InMemoryCredentialStore {
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: RwLock::new(Some(value.into())),
        }
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn get(&self) -> Option<String> {
        self.value
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn set(&self, value: &str) -> anyhow::Result<()> {
        *self
            .value
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(value.to_owned());
        Ok(())
    }
}
