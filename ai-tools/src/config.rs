//! Service configuration: endpoint, toggles, the two prompt modes, and command authority. Loaded from env.

use anyhow::{Context, Result};
use llm_client::mask_token;
use std::env;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_URL: &str = "http://localhost:11434/v1";
pub const DEFAULT_MODEL: &str = "gemma2:9b";
pub const DEFAULT_ASK_PROMPT: &str = "You are a helpful assistant.";
pub const DEFAULT_RETOUCH_PROMPT: &str = "以猫娘的形式回复";
pub const DEFAULT_ZIP: usize = 200;
pub const DEFAULT_AUTHORITY: u8 = 1;

/// One prompt mode (`ask` or `retouch`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeConfig {
    /// Model id sent to the endpoint; the service can override it at runtime.
    pub model: String,
    /// System prompt.
    pub prompt: String,
    /// Regex whose matches are deleted from the model output. Empty = no cleanup.
    pub clear: String,
}

impl ModeConfig {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>, clear: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            clear: clear.into(),
        }
    }

    /// Reads `{PREFIX}_MODEL`, `{PREFIX}_PROMPT`, `{PREFIX}_CLEAR`.
    fn from_env(prefix: &str, default_prompt: &str) -> Self {
        let var = |name: &str| env::var(format!("{}_{}", prefix, name)).ok();
        Self {
            model: var("MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            prompt: var("PROMPT").unwrap_or_else(|| default_prompt.to_string()),
            clear: var("CLEAR").unwrap_or_default(),
        }
    }
}

/// Full relay configuration.
#[derive(Clone)]
pub struct AiToolsConfig {
    pub url: String,
    pub token: String,
    /// Append model/token usage to replies.
    pub debug: bool,
    /// Skip the endpoint entirely for `retouch`; only substitute placeholders.
    pub direct: bool,
    /// Replies longer than this many characters are sent as a forward envelope.
    pub zip: usize,
    pub ask: ModeConfig,
    pub retouch: ModeConfig,
    /// Users with admin authority; everyone else gets `default_authority`.
    pub admin_user_ids: Vec<i64>,
    pub default_authority: u8,
}

impl Default for AiToolsConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            token: String::new(),
            debug: false,
            direct: false,
            zip: DEFAULT_ZIP,
            ask: ModeConfig::new(DEFAULT_MODEL, DEFAULT_ASK_PROMPT, ""),
            retouch: ModeConfig::new(DEFAULT_MODEL, DEFAULT_RETOUCH_PROMPT, ""),
            admin_user_ids: Vec::new(),
            default_authority: DEFAULT_AUTHORITY,
        }
    }
}

// Token is masked so the config can be logged with `?config`.
impl fmt::Debug for AiToolsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AiToolsConfig")
            .field("url", &self.url)
            .field("token", &mask_token(&self.token))
            .field("debug", &self.debug)
            .field("direct", &self.direct)
            .field("zip", &self.zip)
            .field("ask", &self.ask)
            .field("retouch", &self.retouch)
            .field("admin_user_ids", &self.admin_user_ids)
            .field("default_authority", &self.default_authority)
            .finish()
    }
}

fn env_parse<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {}", name, raw)),
        _ => Ok(default),
    }
}

fn parse_id_list(name: &str, raw: &str) -> Result<Vec<i64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>()
                .with_context(|| format!("{} contains an invalid user id: {}", name, s))
        })
        .collect()
}

impl AiToolsConfig {
    /// Loads from environment variables; unset values fall back to defaults, malformed values are errors.
    ///
    /// `OPENAI_BASE_URL`, `OPENAI_API_KEY`, `AI_DEBUG`, `AI_DIRECT`, `AI_ZIP`,
    /// `ASK_MODEL` / `ASK_PROMPT` / `ASK_CLEAR`, `RETOUCH_MODEL` / `RETOUCH_PROMPT` / `RETOUCH_CLEAR`,
    /// `AI_ADMIN_USER_IDS` (comma separated), `AI_DEFAULT_AUTHORITY`.
    pub fn from_env() -> Result<Self> {
        let url = env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_URL.to_string());
        let token = env::var("OPENAI_API_KEY").unwrap_or_default();
        let admin_user_ids = match env::var("AI_ADMIN_USER_IDS") {
            Ok(raw) => parse_id_list("AI_ADMIN_USER_IDS", &raw)?,
            Err(_) => Vec::new(),
        };
        Ok(Self {
            url,
            token,
            debug: env_parse("AI_DEBUG", false)?,
            direct: env_parse("AI_DIRECT", false)?,
            zip: env_parse("AI_ZIP", DEFAULT_ZIP)?,
            ask: ModeConfig::from_env("ASK", DEFAULT_ASK_PROMPT),
            retouch: ModeConfig::from_env("RETOUCH", DEFAULT_RETOUCH_PROMPT),
            admin_user_ids,
            default_authority: env_parse("AI_DEFAULT_AUTHORITY", DEFAULT_AUTHORITY)?,
        })
    }

    /// Validates the endpoint URL. `clear` patterns are compiled on first use instead.
    pub fn validate(&self) -> Result<()> {
        reqwest::Url::parse(&self.url)
            .with_context(|| format!("OPENAI_BASE_URL is not a valid URL: {}", self.url))?;
        Ok(())
    }
}
