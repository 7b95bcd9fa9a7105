use std::{env, net::SocketAddr, path::PathBuf, time::Duration};

pub const DEFAULT_COMPLETION_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_COMPLETION_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http_bind: SocketAddr,
    pub data_dir: PathBuf,
    pub model_provider: String,
    pub completion: CompletionSettings,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionSettings {
    pub url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_COMPLETION_URL.to_owned(),
            model: DEFAULT_COMPLETION_MODEL.to_owned(),
            temperature: 0.7,
            max_tokens: 150,
            timeout: Duration::from_secs(30),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let port = env::var("PORT").unwrap_or_else(|_| "8080".to_owned());
        let http_bind = env::var("HTTP_BIND").unwrap_or_else(|_| format!("127.0.0.1:{port}"));
        let http_bind = http_bind.parse()?;

        let defaults = CompletionSettings::default();
        Ok(Self {
            http_bind,
            data_dir: env::var("HOMEPILOT_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".homepilot")),
            model_provider: env::var("MODEL_PROVIDER").unwrap_or_else(|_| "auto".to_owned()),
            completion: CompletionSettings {
                url: env::var("COMPLETION_URL").unwrap_or(defaults.url),
                model: env::var("COMPLETION_MODEL").unwrap_or(defaults.model),
                temperature: env_f32("COMPLETION_TEMPERATURE", defaults.temperature),
                max_tokens: env_u64("COMPLETION_MAX_TOKENS", u64::from(defaults.max_tokens))
                    .try_into()
                    .unwrap_or(defaults.max_tokens),
                timeout: Duration::from_secs(env_u64(
                    "COMPLETION_TIMEOUT_SEC",
                    defaults.timeout.as_secs(),
                )),
            },
        })
    }

    pub fn credential_path(&self) -> PathBuf {
        self.data_dir.join("credentials.json")
    }
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|raw| raw.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_f32(name: &str, default: f32) -> f32 {
    env::var(name)
        .ok()
        .and_then(|raw| raw.trim().parse::<f32>().ok())
        .filter(|value| value.is_finite())
        .unwrap_or(default)
}
