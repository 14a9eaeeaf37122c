use std::sync::Arc;

use teloxide::prelude::*;

use gub_core::domain::ChatId;

use crate::router::AppState;

const START_TEXT: &str = "Hello! I can show you which GitHub accounts don't follow you back.\n\n\
Send me a GitHub username to get started.";
const HELP_TEXT: &str = "Send a GitHub username and I'll list who doesn't follow it back \
and who it doesn't follow back.\n\nExample: octocat";

fn parse_command(text: &str) -> (String, String) {
    // Telegram may send `/cmd@botname arg1 ...`
    let mut parts = text.trim().splitn(2, char::is_whitespace);
    let first = parts.next().unwrap_or("").trim();
    let rest = parts.next().unwrap_or("").trim().to_string();

    let cmd = first
        .trim_start_matches('/')
        .split('@')
        .next()
        .unwrap_or("")
        .to_lowercase();

    (cmd, rest)
}

pub async fn handle_command(_bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let chat_id = ChatId(msg.chat.id.0);
    let (cmd, _args) = parse_command(text);

    let reply = match cmd.as_str() {
        "start" => START_TEXT,
        "help" => HELP_TEXT,
        _ => "Unknown command. Try /help.",
    };

    let _ = state.messenger.send_html(chat_id, reply).await;
    Ok(())
}
