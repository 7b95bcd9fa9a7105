use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use serde::Serialize;
use tokio::{sync::RwLock, task::JoinHandle};
use tracing::{error, info, warn};

use crate::{
    credential::{self, CredentialStore},
    model::{ModelProvider, ModelRequest},
    types::{ChatMessage, Notice},
};

pub const GREETING: &str = "Hello! I'm your Smart Home Assistant. I can help you control your home's temperature, lights, security system, and monitor energy usage. What would you like to do?";

pub const SYSTEM_PROMPT: &str = "You are a helpful smart home assistant that can control temperature, security systems, lights, and monitor energy usage. Provide brief and helpful responses about home automation.";

pub const APOLOGY: &str =
    "I'm sorry, I'm having trouble connecting. Please check your API key or try again later.";

const MISSING_CREDENTIAL_NOTICE: &str = "Please enter your OpenAI API key first";
const FAILED_REPLY_NOTICE: &str =
    "Failed to get response from assistant. Please check your API key.";
const EMPTY_CREDENTIAL_NOTICE: &str = "Please enter a non-empty API key";
const SAVED_CREDENTIAL_NOTICE: &str = "API key saved successfully!";

#[derive(Debug, Clone, Default)]
pub struct ChatConfig {
    pub credential: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum SubmitRejected {
    #[error("message is empty")]
    EmptyInput,
    #[error("no API key has been saved")]
    MissingCredential,
    #[error("a reply is still pending")]
    Busy,
}

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("API key must not be empty")]
    Empty,
    #[error("failed to save API key: {0:#}")]
    Store(anyhow::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum SubmitOutcome {
    Rejected(SubmitRejected),
    Replied(ChatMessage),
    Failed(ChatMessage),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatView {
    pub messages: Vec<ChatMessage>,
    pub input: String,
    pub loading: bool,
    pub credential_prompt: bool,
    pub has_credential: bool,
    pub credential_hint: Option<String>,
}

#[derive(Debug)]
struct ChatState {
    messages: Vec<ChatMessage>,
    input: String,
    credential: Option<String>,
    credential_prompt: bool,
    notices: Vec<Notice>,
}

struct ChatInner {
    model: Arc<dyn ModelProvider>,
    store: Arc<dyn CredentialStore>,
    state: RwLock<ChatState>,
    loading: AtomicBool,
}

#[derive(Clone)]
pub struct ChatController {
    inner: Arc<ChatInner>,
}

impl ChatController {
    pub fn new(
        model: Arc<dyn ModelProvider>,
        store: Arc<dyn CredentialStore>,
        config: ChatConfig,
    ) -> Self {
        let credential = config.credential.filter(|value| !value.trim().is_empty());
        let credential_prompt = credential.is_none();

        Self {
            inner: Arc::new(ChatInner {
                model,
                store,
                state: RwLock::new(ChatState {
                    messages: vec![ChatMessage::assistant(GREETING)],
                    input: String::new(),
                    credential,
                    credential_prompt,
                    notices: Vec::new(),
                }),
                loading: AtomicBool::new(false),
            }),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.inner.loading.load(Ordering::Acquire)
    }

    pub async fn set_input(&self, text: &str) {
        self.inner.state.write().await.input = text.to_owned();
    }

    pub async fn request_credential_entry(&self) {
        self.inner.state.write().await.credential_prompt = true;
    }

    // The spawned task owns the loading guard and appends the assistant turn,
    // so the transcript settles even if the returned handle is dropped.
    pub async fn start_submit(&self, text: &str) -> Result<PendingReply, SubmitRejected> {
        if text.trim().is_empty() {
            return Err(SubmitRejected::EmptyInput);
        }

        let mut state = self.inner.state.write().await;
        let Some(api_key) = state.credential.clone() else {
            state.credential_prompt = true;
            state.input = text.to_owned();
            state.notices.push(Notice::error(MISSING_CREDENTIAL_NOTICE));
            info!("message blocked until an API key is saved");
            return Err(SubmitRejected::MissingCredential);
        };

        let guard = LoadingGuard::acquire(&self.inner).ok_or(SubmitRejected::Busy)?;

        let user_message = ChatMessage::user(text);
        let mut turns = state.messages.clone();
        turns.push(user_message.clone());
        state.messages.push(user_message);
        state.input.clear();
        drop(state);

        let request = ModelRequest {
            api_key,
            system_prompt: SYSTEM_PROMPT.to_owned(),
            turns,
        };
        let inner = self.inner.clone();
        let task = tokio::spawn(async move { inner.settle(request, guard).await });

        Ok(PendingReply {
            task,
            inner: self.inner.clone(),
        })
    }

    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        match self.start_submit(text).await {
            Ok(pending) => pending.settled().await,
            Err(rejected) => SubmitOutcome::Rejected(rejected),
        }
    }

    pub async fn save_credential(&self, text: &str) -> Result<(), CredentialError> {
        let value = text.trim().to_owned();
        if value.is_empty() {
            self.push_notice(Notice::error(EMPTY_CREDENTIAL_NOTICE)).await;
            return Err(CredentialError::Empty);
        }

        let store = self.inner.store.clone();
        let staged = value.clone();
        let saved = tokio::task::spawn_blocking(move || store.set(&staged))
            .await
            .map_err(anyhow::Error::from)
            .and_then(|result| result);

        let mut state = self.inner.state.write().await;
        if let Err(error) = saved {
            warn!(?error, "failed to persist API key");
            state
                .notices
                .push(Notice::error(format!("Failed to save API key: {error}")));
            return Err(CredentialError::Store(error));
        }

        state.credential = Some(value);
        state.credential_prompt = false;
        state.notices.push(Notice::success(SAVED_CREDENTIAL_NOTICE));
        Ok(())
    }

    async fn push_notice(&self, notice: Notice) {
        self.inner.state.write().await.notices.push(notice);
    }

    pub async fn take_notices(&self) -> Vec<Notice> {
        std::mem::take(&mut self.inner.state.write().await.notices)
    }

    pub async fn snapshot(&self) -> ChatView {
        let state = self.inner.state.read().await;
        ChatView {
            messages: state.messages.clone(),
            input: state.input.clone(),
            loading: self.is_loading(),
            credential_prompt: state.credential_prompt,
            has_credential: state.credential.is_some(),
            credential_hint: state.credential.as_deref().map(credential::mask),
        }
    }
}

impl ChatInner {
    async fn settle(&self, request: ModelRequest, guard: LoadingGuard) -> SubmitOutcome {
        let result = self.model.complete(request).await;

        let outcome = {
            let mut state = self.state.write().await;
            match result {
                Ok(text) => {
                    let reply = ChatMessage::assistant(text);
                    state.messages.push(reply.clone());
                    SubmitOutcome::Replied(reply)
                }
                Err(error) => {
                    warn!(?error, "assistant reply failed");
                    let apology = ChatMessage::assistant(APOLOGY);
                    state.messages.push(apology.clone());
                    state.notices.push(Notice::error(FAILED_REPLY_NOTICE));
                    SubmitOutcome::Failed(apology)
                }
            }
        };

        drop(guard);
        outcome
    }
}

pub struct PendingReply {
    task: JoinHandle<SubmitOutcome>,
    inner: Arc<ChatInner>,
}

impl PendingReply {
    pub async fn settled(self) -> SubmitOutcome {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(join_error) => {
                error!(?join_error, "completion task aborted");
                let apology = ChatMessage::assistant(APOLOGY);
                let mut state = self.inner.state.write().await;
                state.messages.push(apology.clone());
                state.notices.push(Notice::error(FAILED_REPLY_NOTICE));
                SubmitOutcome::Failed(apology)
            }
        }
    }
}

struct LoadingGuard {
    inner: Arc<ChatInner>,
}

impl LoadingGuard {
    fn acquire(inner: &Arc<ChatInner>) -> Option<Self> {
        inner
            .loading
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self {
                inner: inner.clone(),
            })
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.inner.loading.store(false, Ordering::Release);
    }
}
