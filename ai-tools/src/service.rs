//! The text-transform service: one shared LLM client, two prompt modes, `ask` and `retouch`.
//!
//! Lifecycle: [`AiTools::new`] holds configuration only; [`AiTools::open`] builds the client;
//! [`AiTools::close`] drops it. Every operation outside the open window returns [`AiError::NotOpen`].
//!
//! Model ids live in per-mode cells so the override commands can swap them while calls are in
//! flight. A call reads the model once when it starts; the last override wins for later calls.

use llm_client::{mask_token, ChatCompletion, LlmClient, OpenAILlmClient};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{info, instrument, warn};

use crate::config::{AiToolsConfig, ModeConfig};
use crate::error::{AiError, Result};
use crate::placeholder::substitute;
use crate::sanitize::{compile_clear, strip};

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A prompt mode with its runtime-overridable model.
pub struct Mode {
    name: &'static str,
    model: RwLock<String>,
    prompt: String,
    clear: String,
}

impl Mode {
    fn new(name: &'static str, config: &ModeConfig) -> Self {
        Self {
            name,
            model: RwLock::new(config.model.clone()),
            prompt: config.prompt.clone(),
            clear: config.clear.clone(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Current model id.
    pub fn model(&self) -> String {
        read(&self.model).clone()
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn clear(&self) -> &str {
        &self.clear
    }

    /// Swaps in `model`, returning the previous id.
    fn replace_model(&self, model: &str) -> String {
        std::mem::replace(&mut *write(&self.model), model.to_string())
    }
}

/// The relay service. Share it as `Arc<AiTools>`; all operations take `&self`.
pub struct AiTools {
    url: String,
    token: String,
    debug: bool,
    direct: bool,
    zip: usize,
    ask: Mode,
    retouch: Mode,
    client: RwLock<Option<Arc<dyn LlmClient>>>,
}

impl AiTools {
    /// Creates the service in the closed state.
    pub fn new(config: &AiToolsConfig) -> Self {
        info!(
            url = %config.url,
            token = %mask_token(&config.token),
            debug = config.debug,
            direct = config.direct,
            zip = config.zip,
            ask_model = %config.ask.model,
            retouch_model = %config.retouch.model,
            "AiTools configured"
        );
        Self {
            url: config.url.clone(),
            token: config.token.clone(),
            debug: config.debug,
            direct: config.direct,
            zip: config.zip,
            ask: Mode::new("ask", &config.ask),
            retouch: Mode::new("retouch", &config.retouch),
            client: RwLock::new(None),
        }
    }

    /// Builds the OpenAI-compatible client for the configured URL and token.
    pub fn open(&self) {
        let client = OpenAILlmClient::with_base_url(self.token.clone(), self.url.clone());
        self.open_with_client(Arc::new(client));
    }

    /// Opens with a caller-supplied client (another transport, or a scripted client in tests).
    pub fn open_with_client(&self, client: Arc<dyn LlmClient>) {
        info!("Starting...");
        if write(&self.client).replace(client).is_some() {
            warn!("AiTools was already open; previous client replaced");
        }
    }

    /// Drops the client. Later operations fail with [`AiError::NotOpen`] until reopened.
    pub fn close(&self) {
        info!("Stopping...");
        write(&self.client).take();
    }

    pub fn is_open(&self) -> bool {
        read(&self.client).is_some()
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn direct(&self) -> bool {
        self.direct
    }

    /// Reply length (in characters) above which replies are sent as a forward envelope.
    pub fn zip(&self) -> usize {
        self.zip
    }

    pub fn ask_mode(&self) -> &Mode {
        &self.ask
    }

    pub fn retouch_mode(&self) -> &Mode {
        &self.retouch
    }

    fn client(&self) -> Result<Arc<dyn LlmClient>> {
        read(&self.client).clone().ok_or(AiError::NotOpen)
    }

    /// Sends `[system: mode prompt, user: text]` with the mode's current model and strips the
    /// mode's `clear` matches from the reply. The pattern is compiled before the request so a bad
    /// pattern costs no network call.
    async fn complete(
        &self,
        client: &dyn LlmClient,
        mode: &Mode,
        text: &str,
    ) -> Result<(String, ChatCompletion)> {
        let clear = compile_clear(mode.clear()).map_err(|source| AiError::InvalidPattern {
            mode: mode.name(),
            source,
        })?;
        let model = mode.model();
        let completion = client
            .complete(&model, prompt::conversation(mode.prompt(), text))
            .await?;
        info!(
            mode = mode.name(),
            model = %completion.model,
            total_tokens = completion.total_tokens,
            raw_len = completion.content.len(),
            "completion received"
        );
        let cleaned = strip(&completion.content, clear.as_ref()).into_owned();
        Ok((cleaned, completion))
    }

    /// Answers `text` with the `ask` mode.
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub async fn ask(&self, text: &str) -> Result<String> {
        let client = self.client()?;
        let (mut reply, completion) = self.complete(client.as_ref(), &self.ask, text).await?;
        if self.debug {
            reply.push_str(&format!(
                "\n\n[debug] model={} tokens={}",
                completion.model, completion.total_tokens
            ));
        }
        Ok(reply)
    }

    /// Rewrites `text` with the `retouch` mode, then fills `{0}`, `{1}`, ... from `args`.
    ///
    /// In direct mode no request is made: the placeholders in `text` itself are filled and the
    /// result returned as is.
    #[instrument(skip(self, text, args), fields(text_len = text.len(), args = args.len()))]
    pub async fn retouch<S: AsRef<str> + Sync>(&self, text: &str, args: &[S]) -> Result<String> {
        let client = self.client()?;
        if self.direct {
            return Ok(substitute(text, args));
        }
        let (cleaned, completion) = self.complete(client.as_ref(), &self.retouch, text).await?;
        let mut reply = substitute(&cleaned, args);
        if self.debug {
            reply.push_str(&format!(
                "\n\n[debug] source={}\n[debug] model={} tokens={}",
                text, completion.model, completion.total_tokens
            ));
        }
        Ok(reply)
    }

    /// Overrides the `ask` model until restart. Returns a confirmation naming old and new ids.
    pub fn set_ask_model(&self, model: &str) -> Result<String> {
        self.set_model(&self.ask, model)
    }

    /// Overrides the `retouch` model until restart.
    pub fn set_retouch_model(&self, model: &str) -> Result<String> {
        self.set_model(&self.retouch, model)
    }

    fn set_model(&self, mode: &Mode, model: &str) -> Result<String> {
        self.client()?;
        let old = mode.replace_model(model);
        info!(mode = mode.name(), old = %old, new = %model, "model overridden");
        Ok(format!("{} model changed: {} -> {}", mode.name(), old, model))
    }
}
