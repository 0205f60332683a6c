//! # ai-tools
//!
//! Command-driven LLM text relay: `/ask` and `/retouch` requests go to an OpenAI-compatible
//! endpoint with a per-mode system prompt; replies are cleaned with a regex, placeholders are
//! filled, and the result is sent back inline or as a forward envelope depending on length.

pub mod authority;
pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod format;
pub mod handlers;
pub mod placeholder;
pub mod runner;
pub mod sanitize;
pub mod service;

pub use authority::{AuthorityPolicy, ADMIN_AUTHORITY};
pub use cli::{Cli, Commands};
pub use command::{Command, OPERATOR_AUTHORITY, USER_AUTHORITY};
pub use config::{AiToolsConfig, ModeConfig};
pub use error::AiError;
pub use format::{format_reply, inline_reply, FormattedReply};
pub use handlers::{AiCommandHandler, LoggingHandler, MSG_PERMISSION_DENIED, MSG_REQUEST_FAILED};
pub use runner::{build_handler_chain, run_bot};
pub use service::{AiTools, Mode};
