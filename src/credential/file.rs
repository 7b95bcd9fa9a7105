use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
    sync::RwLock,
};

use anyhow::Context;
use tracing::{debug, info, warn};

use super::{CREDENTIAL_KEY, CredentialStore};

#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileCredentialStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match read_entries(&path) {
            Ok(entries) => entries,
            Err(error) => {
                warn!(?error, path = %path.display(), "ignoring unreadable credential file");
                BTreeMap::new()
            }
        };

        info!(
            path = %path.display(),
            has_credential = entries.contains_key(CREDENTIAL_KEY),
            "opened credential store"
        );

        Self {
            path,
            entries: RwLock::new(entries),
        }
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let staging = self.path.with_extension("json.tmp");
        let raw = serde_json::to_string_pretty(entries)?;
        fs::write(&staging, raw)
            .with_context(|| format!("failed to write {}", staging.display()))?;
        fs::rename(&staging, &self.path)
            .with_context(|| format!("failed to replace {}", self.path.display()))?;
        Ok(())
    }
}

fn read_entries(path: &Path) -> anyhow::Result<BTreeMap<String, String>> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no credential file yet");
            return Ok(BTreeMap::new());
        }
        Err(error) => {
            return Err(error).with_context(|| format!("failed to read {}", path.display()));
        }
    };

    if raw.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    serde_json::from_str(&raw)
        .with_context(|| format!("credential file {} is corrupt", path.display()))
}

impl CredentialStore for FileCredentialStore {
    fn get(&self) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(CREDENTIAL_KEY)
            .cloned()
    }

    fn set(&self, value: &str) -> anyhow::Result<()> {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut updated = entries.clone();
        updated.insert(CREDENTIAL_KEY.to_owned(), value.to_owned());
        self.persist(&updated)?;
        *entries = updated;

        info!(path = %self.path.display(), "credential saved");
        Ok(())
    }
}
