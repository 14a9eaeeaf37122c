//! Telegram update handlers.
//!
//! Each handler is a small adapter: it applies admission control, calls into
//! `gub-core`, and relays the resulting chunk sequence. No error is allowed
//! to escape a handler; faults become a generic apology message.

use std::sync::Arc;

use teloxide::{prelude::*, types::Message};

use crate::router::AppState;

mod commands;
mod text;

pub async fn handle_message(bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(body) = msg.text() else {
        // Only text messages carry a username to look up.
        return Ok(());
    };

    if body.starts_with('/') {
        return commands::handle_command(bot, msg, state).await;
    }

    text::handle_text(bot, msg, state).await
}
