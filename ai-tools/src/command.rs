//! Command parsing for the chat surface.
//!
//! Recognized (leading `/` required, optional `@botname` on the command token):
//! `/ask <text>`, `/retouch <text>`, `/ask.set-model <model>`, `/retouch.set-model <model>`.
//! Telegram command names cannot contain `.` or `-`, so `/ask_set_model` and
//! `/retouch_set_model` are accepted too.

use dbot_core::HandlerError;

/// Authority needed for `ask` / `retouch`.
pub const USER_AUTHORITY: u8 = 1;
/// Authority needed for model overrides.
pub const OPERATOR_AUTHORITY: u8 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ask(String),
    Retouch(String),
    SetAskModel(String),
    SetRetouchModel(String),
}

impl Command {
    /// Parses a message. `Ok(None)` when the text is not one of our commands (or is addressed to
    /// another bot); `Err` when it is ours but malformed.
    pub fn parse(text: &str, bot_username: Option<&str>) -> Result<Option<Command>, HandlerError> {
        let text = text.trim_start();
        let Some(body) = text.strip_prefix('/') else {
            return Ok(None);
        };
        let (token, rest) = match body.find(char::is_whitespace) {
            Some(i) => (&body[..i], body[i..].trim()),
            None => (body, ""),
        };
        let name = match token.split_once('@') {
            Some((name, target)) => {
                let ours = bot_username.map_or(true, |u| u.eq_ignore_ascii_case(target));
                if !ours {
                    return Ok(None);
                }
                name
            }
            None => token,
        };

        let command = match name {
            "ask" => Command::Ask(rest.to_string()),
            "retouch" => Command::Retouch(rest.to_string()),
            "ask.set-model" | "ask_set_model" => Command::SetAskModel(model_arg(name, rest)?),
            "retouch.set-model" | "retouch_set_model" => {
                Command::SetRetouchModel(model_arg(name, rest)?)
            }
            _ => return Ok(None),
        };
        Ok(Some(command))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Ask(_) => "ask",
            Command::Retouch(_) => "retouch",
            Command::SetAskModel(_) => "ask.set-model",
            Command::SetRetouchModel(_) => "retouch.set-model",
        }
    }

    pub fn required_authority(&self) -> u8 {
        match self {
            Command::Ask(_) | Command::Retouch(_) => USER_AUTHORITY,
            Command::SetAskModel(_) | Command::SetRetouchModel(_) => OPERATOR_AUTHORITY,
        }
    }
}

fn model_arg(name: &str, rest: &str) -> Result<String, HandlerError> {
    if rest.is_empty() {
        return Err(HandlerError::InvalidCommand(format!(
            "/{} needs a model name",
            name
        )));
    }
    Ok(rest.to_string())
}
