//! Handler-chain handlers: request logging and the ai command surface.

mod command_handler;
mod logging;

pub use command_handler::{AiCommandHandler, MSG_PERMISSION_DENIED, MSG_REQUEST_FAILED};
pub use logging::LoggingHandler;
