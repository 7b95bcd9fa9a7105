mod file;
mod in_memory;

pub use file::FileCredentialStore;
pub use in_memory::InMemoryCredentialStore;

pub const CREDENTIAL_KEY: &str = "openai_api_key";

// Reads never fail: an unreadable or missing value is absent.
pub trait CredentialStore: Send + Sync {
    fn get(&self) -> Option<String>;

    fn set(&self, value: &str) -> anyhow::Result<()>;
}

pub fn mask(value: &str) -> String {
    let chars = value.chars().collect::<Vec<_>>();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let visible = chars[chars.len() - 4..].iter().collect::<String>();
    format!("{}{visible}", "*".repeat(chars.len() - 4))
}
