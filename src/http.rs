use std::sync::Arc;

use axum::{
    Form, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post, put},
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::{
    chat::{ChatController, ChatView, CredentialError, SubmitOutcome, SubmitRejected},
    dashboard::{Category, DashboardController, DashboardView},
    render,
};

const TRANSCRIPT_END: &str = "/#end";

#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<DashboardController>,
    pub chat: ChatController,
}

#[derive(Debug, Deserialize)]
pub struct ChatForm {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct CredentialForm {
    #[serde(default)]
    pub api_key: String,
}

#[derive(Debug, Deserialize)]
pub struct OpenTileRequest {
    pub category: Option<Category>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/tiles/{category}", post(select_tile))
        .route("/detail/close", post(close_detail))
        .route("/chat", post(chat))
        .route("/credential", post(save_credential))
        .route("/credential/edit", post(edit_credential))
        .route("/api/dashboard", get(api_dashboard))
        .route("/api/dashboard/open", put(api_open_tile))
        .route("/api/chat", get(api_chat_view).post(api_chat))
        .route("/api/credential", put(api_save_credential))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn index(State(state): State<AppState>) -> Html<String> {
    let dashboard = state.dashboard.view();
    let chat = state.chat.snapshot().await;
    let notices = state.chat.take_notices().await;
    Html(render::page(&dashboard, &chat, &notices))
}

async fn select_tile(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Redirect, (StatusCode, String)> {
    let category = parse_category(&category)?;
    state.dashboard.select_tile(category);
    Ok(Redirect::to("/"))
}

async fn close_detail(State(state): State<AppState>) -> Redirect {
    state.dashboard.close_detail();
    Redirect::to("/")
}

async fn chat(State(state): State<AppState>, Form(form): Form<ChatForm>) -> Redirect {
    match state.chat.start_submit(&form.content).await {
        Ok(_pending) => debug!("completion started"),
        Err(rejected) => debug!(%rejected, "chat submit rejected"),
    }
    Redirect::to(TRANSCRIPT_END)
}

async fn save_credential(
    State(state): State<AppState>,
    Form(form): Form<CredentialForm>,
) -> Redirect {
    if let Err(error) = state.chat.save_credential(&form.api_key).await {
        debug!(%error, "credential not saved");
    }
    Redirect::to(TRANSCRIPT_END)
}

async fn edit_credential(State(state): State<AppState>) -> Redirect {
    state.chat.request_credential_entry().await;
    Redirect::to(TRANSCRIPT_END)
}

async fn api_dashboard(State(state): State<AppState>) -> Json<DashboardView> {
    Json(state.dashboard.view())
}

async fn api_open_tile(
    State(state): State<AppState>,
    Json(request): Json<OpenTileRequest>,
) -> Json<DashboardView> {
    match request.category {
        Some(category) => state.dashboard.select_tile(category),
        None => state.dashboard.close_detail(),
    }
    Json(state.dashboard.view())
}

async fn api_chat_view(State(state): State<AppState>) -> Json<ChatView> {
    Json(state.chat.snapshot().await)
}

async fn api_chat(State(state): State<AppState>, Json(form): Json<ChatForm>) -> Response {
    let outcome = state.chat.submit(&form.content).await;
    let status = match &outcome {
        SubmitOutcome::Replied(_) | SubmitOutcome::Failed(_) => StatusCode::OK,
        SubmitOutcome::Rejected(SubmitRejected::EmptyInput) => StatusCode::UNPROCESSABLE_ENTITY,
        SubmitOutcome::Rejected(SubmitRejected::MissingCredential) => {
            StatusCode::PRECONDITION_REQUIRED
        }
        SubmitOutcome::Rejected(SubmitRejected::Busy) => StatusCode::CONFLICT,
    };
    (status, Json(outcome)).into_response()
}

async fn api_save_credential(
    State(state): State<AppState>,
    Json(form): Json<CredentialForm>,
) -> Result<StatusCode, (StatusCode, String)> {
    match state.chat.save_credential(&form.api_key).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(error @ CredentialError::Empty) => {
            Err((StatusCode::UNPROCESSABLE_ENTITY, error.to_string()))
        }
        Err(error @ CredentialError::Store(_)) => Err(internal_error(error)),
    }
}

fn parse_category(raw: &str) -> Result<Category, (StatusCode, String)> {
    raw.parse::<Category>()
        .map_err(|error| (StatusCode::NOT_FOUND, error.to_string()))
}

fn internal_error(error: impl std::fmt::Display) -> (StatusCode, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("internal error: {error}"),
    )
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use async_trait::async_trait;
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use serde_json::{Value, json};
    use tokio::sync::Notify;
    use tower::ServiceExt;

    use crate::{
        chat::{APOLOGY, ChatConfig, ChatController},
        credential::{CredentialStore, InMemoryCredentialStore},
        dashboard::DashboardController,
        model::{ModelProvider, ModelRequest},
    };

    use super::{AppState, router};

    struct UnauthorizedProvider;

    #[async_trait]
    impl ModelProvider for UnauthorizedProvider {
        async fn complete(&self, _request: ModelRequest) -> anyhow::Result<String> {
            Err(anyhow::anyhow!("HTTP status client error (401 Unauthorized)"))
        }
    }

    struct EchoProvider;

    #[async_trait]
    impl ModelProvider for EchoProvider {
        async fn complete(&self, request: ModelRequest) -> anyhow::Result<String> {
            let last = request
                .turns
                .last()
                .map(|turn| turn.content.clone())
                .unwrap_or_default();
            Ok(format!("echo: {last}"))
        }
    }

    #[derive(Default)]
    struct GatedProvider {
        release: Notify,
    }

    #[async_trait]
    impl ModelProvider for GatedProvider {
        async fn complete(&self, _request: ModelRequest) -> anyhow::Result<String> {
            self.release.notified().await;
            Ok("done".to_owned())
        }
    }

    fn app(
        model: Arc<dyn ModelProvider>,
        store: Arc<InMemoryCredentialStore>,
    ) -> (Router, AppState) {
        let chat = ChatController::new(
            model,
            store.clone(),
            ChatConfig {
                credential: store.get(),
            },
        );
        let state = AppState {
            dashboard: Arc::new(DashboardController::default()),
            chat,
        };
        (router(state.clone()), state)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        serde_json::from_slice(&bytes).expect("body should be json")
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        String::from_utf8(bytes.to_vec()).expect("body should be utf-8")
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request should build")
    }

    fn form_request(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_owned()))
            .expect("request should build")
    }

    #[tokio::test]
    async fn health_is_ok() {
        let (app, _) = app(
            Arc::new(EchoProvider),
            Arc::new(InMemoryCredentialStore::default()),
        );
        let response = app
            .oneshot(
                Request::get("/health")
                    .body(Body::empty())
                    .expect("request should build"),
            )
            .await
            .expect("request should succeed");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "ok");
    }

    #[tokio::test]
    async fn api_chat_without_credential_is_blocked() {
        let (app, state) = app(
            Arc::new(EchoProvider),
            Arc::new(InMemoryCredentialStore::default()),
        );

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/chat",
                json!({ "content": "turn on lights" }),
            ))
            .await
            .expect("request should succeed");
        assert_eq!(response.status(), StatusCode::PRECONDITION_REQUIRED);
        let body = body_json(response).await;
        assert_eq!(body["status"], "rejected");
        assert_eq!(body["detail"], "missing_credential");

        let view = state.chat.snapshot().await;
        assert_eq!(view.messages.len(), 1);
        assert!(view.credential_prompt);
    }

    #[tokio::test]
    async fn api_chat_failure_returns_apology() {
        let (app, _) = app(
            Arc::new(UnauthorizedProvider),
            Arc::new(InMemoryCredentialStore::with_value("sk-bad")),
        );

        let response = app
            .oneshot(json_request("POST", "/api/chat", json!({ "content": "hi" })))
            .await
            .expect("request should succeed");
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "failed");
        assert_eq!(body["detail"]["content"], APOLOGY);
        assert_eq!(body["detail"]["role"], "assistant");
    }

    #[tokio::test]
    async fn api_chat_empty_input_is_unprocessable() {
        let (app, _) = app(
            Arc::new(EchoProvider),
            Arc::new(InMemoryCredentialStore::with_value("sk-test")),
        );
        let response = app
            .oneshot(json_request("POST", "/api/chat", json!({ "content": "  " })))
            .await
            .expect("request should succeed");
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn credential_form_saves_and_redirects() {
        let store = Arc::new(InMemoryCredentialStore::default());
        let (app, state) = app(Arc::new(EchoProvider), store.clone());

        let response = app
            .oneshot(form_request("/credential", "api_key=sk-form-key"))
            .await
            .expect("request should succeed");
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(store.get().as_deref(), Some("sk-form-key"));
        assert!(!state.chat.snapshot().await.credential_prompt);
    }

    #[tokio::test]
    async fn api_credential_rejects_empty_key() {
        let store = Arc::new(InMemoryCredentialStore::default());
        let (app, _) = app(Arc::new(EchoProvider), store.clone());

        let response = app
            .oneshot(json_request("PUT", "/api/credential", json!({ "api_key": "" })))
            .await
            .expect("request should succeed");
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(store.get(), None);
    }

    #[tokio::test]
    async fn chat_form_settles_in_background() {
        let (app, state) = app(
            Arc::new(EchoProvider),
            Arc::new(InMemoryCredentialStore::with_value("sk-test")),
        );

        let response = app
            .oneshot(form_request("/chat", "content=set+temperature+to+70"))
            .await
            .expect("request should succeed");
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/#end");

        for _ in 0..200 {
            if !state.chat.is_loading() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        let view = state.chat.snapshot().await;
        assert_eq!(view.messages.len(), 3);
        assert_eq!(view.messages[1].content, "set temperature to 70");
        assert_eq!(view.messages[2].content, "echo: set temperature to 70");
    }

    #[tokio::test]
    async fn tile_routes_toggle_single_detail_panel() {
        let (app, state) = app(
            Arc::new(EchoProvider),
            Arc::new(InMemoryCredentialStore::default()),
        );

        let response = app
            .clone()
            .oneshot(form_request("/tiles/energy", ""))
            .await
            .expect("request should succeed");
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let page = app
            .clone()
            .oneshot(
                Request::get("/")
                    .body(Body::empty())
                    .expect("request should build"),
            )
            .await
            .expect("request should succeed");
        let html = body_text(page).await;
        assert!(html.contains(r#"data-category="energy""#));
        assert!(html.contains("23.5 kWh"));

        app.clone()
            .oneshot(form_request("/detail/close", ""))
            .await
            .expect("request should succeed");
        assert!(state.dashboard.view().detail.is_none());

        let missing = app
            .oneshot(form_request("/tiles/garage", ""))
            .await
            .expect("request should succeed");
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn api_dashboard_open_accepts_null_to_close() {
        let (app, state) = app(
            Arc::new(EchoProvider),
            Arc::new(InMemoryCredentialStore::default()),
        );

        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                "/api/dashboard/open",
                json!({ "category": "network" }),
            ))
            .await
            .expect("request should succeed");
        let body = body_json(response).await;
        assert_eq!(body["detail"]["record"]["category"], "network");
        assert_eq!(body["detail"]["record"]["data"]["connected_devices"], 12);

        app.oneshot(json_request(
            "PUT",
            "/api/dashboard/open",
            json!({ "category": null }),
        ))
        .await
        .expect("request should succeed");
        assert!(state.dashboard.open_tile().is_none());
    }

    #[tokio::test]
    async fn api_chat_while_reply_pending_is_conflict() {
        let provider = Arc::new(GatedProvider::default());
        let (app, state) = app(
            provider.clone(),
            Arc::new(InMemoryCredentialStore::with_value("sk-test")),
        );

        let first = tokio::spawn(app.clone().oneshot(json_request(
            "POST",
            "/api/chat",
            json!({ "content": "first" }),
        )));
        for _ in 0..200 {
            if state.chat.is_loading() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(state.chat.is_loading());

        let second = app
            .oneshot(json_request("POST", "/api/chat", json!({ "content": "second" })))
            .await
            .expect("request should succeed");
        assert_eq!(second.status(), StatusCode::CONFLICT);
        let body = body_json(second).await;
        assert_eq!(body["detail"], "busy");
        assert_eq!(state.chat.snapshot().await.messages.len(), 2);

        provider.release.notify_one();
        let first = first
            .await
            .expect("join")
            .expect("request should succeed");
        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(state.chat.snapshot().await.messages.len(), 3);
    }
}
