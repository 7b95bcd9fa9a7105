use std::sync::Arc;

use homepilot::{
    chat::{ChatConfig, ChatController},
    config::AppConfig,
    credential::{CredentialStore, FileCredentialStore},
    dashboard::DashboardController,
    http::{self, AppState},
    model::{MockModelProvider, ModelProvider, OpenAiProvider},
};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;

    let store: Arc<dyn CredentialStore> =
        Arc::new(FileCredentialStore::open(config.credential_path()));
    let model = build_model_provider(&config)?;

    let credential = store.get();
    if credential.is_none() {
        warn!("no API key saved yet; the assistant will ask for one");
    }

    let chat = ChatController::new(model, store, ChatConfig { credential });
    let app = http::router(AppState {
        dashboard: Arc::new(DashboardController::default()),
        chat,
    });

    let listener = TcpListener::bind(config.http_bind).await?;
    info!("Smart Home Manager listening on http://{}", config.http_bind);

    axum::serve(listener, app).await?;
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .compact()
        .init();
}

fn build_model_provider(config: &AppConfig) -> anyhow::Result<Arc<dyn ModelProvider>> {
    let provider = config.model_provider.to_lowercase();
    match provider.as_str() {
        "mock" => {
            warn!("MODEL_PROVIDER=mock; replies are canned and no endpoint is called");
            Ok(Arc::new(MockModelProvider))
        }
        "openai" | "auto" => {
            info!(
                model = %config.completion.model,
                url = %config.completion.url,
                "using completion endpoint"
            );
            Ok(Arc::new(OpenAiProvider::new(config.completion.clone())?))
        }
        other => {
            warn!(
                provider = %other,
                "unknown MODEL_PROVIDER value; valid values are auto|openai|mock; falling back to auto"
            );
            Ok(Arc::new(OpenAiProvider::new(config.completion.clone())?))
        }
    }
}
