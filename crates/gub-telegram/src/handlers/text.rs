use std::sync::Arc;

use teloxide::prelude::*;
use tracing::{error, info, warn};

use gub_core::{
    domain::{ChatId, UserId},
    lookup,
    messaging::port::ChatAction,
    security::Admission,
};

use crate::router::AppState;

const APOLOGY: &str = "An error occurred. Please try again later.";

/// Group messages are processed only when they mention the bot, and the
/// mention is stripped before lookup. Private messages pass through whole.
fn extract_request(text: &str, bot_username: &str, is_private: bool) -> Option<String> {
    if is_private {
        return Some(text.trim().to_string());
    }
    let mention = format!("@{bot_username}");
    if !text.contains(&mention) {
        return None;
    }
    Some(text.replace(&mention, "").trim().to_string())
}

pub async fn handle_text(bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(user) = msg.from() else {
        return Ok(());
    };
    let Some(raw) = msg.text() else {
        return Ok(());
    };

    let chat_id = ChatId(msg.chat.id.0);
    let user_id = UserId(user.id.0 as i64);

    let Some(request) = extract_request(raw, &state.cfg.bot_username, msg.chat.is_private()) else {
        return Ok(());
    };
    if request.is_empty() {
        return Ok(());
    }

    // Admission control before any network work. The mutex makes the
    // read-check-update sequence atomic per caller.
    let admission = { state.rate_limiter.lock().await.check(user_id) };
    if let Admission::Refused { retry_after } = admission {
        warn!(
            user_id = user_id.0,
            retry_after_secs = retry_after.as_secs(),
            "request refused by admission control"
        );
        let _ = state
            .messenger
            .send_html(
                chat_id,
                &format!(
                    "⏳ Too many requests. Please wait {} seconds.",
                    retry_after.as_secs()
                ),
            )
            .await;
        return Ok(());
    }

    info!(user_id = user_id.0, request = %request, "lookup started");

    // Typing indicator while pages are fetched (best-effort).
    let (stop_tx, mut stop_rx) = tokio::sync::oneshot::channel::<()>();
    let typing_messenger = state.messenger.clone();
    let typing_task = tokio::spawn(async move {
        let mut tick = tokio::time::interval(std::time::Duration::from_secs(3));
        loop {
            tokio::select! {
                _ = tick.tick() => {
                    let _ = typing_messenger.send_chat_action(chat_id, ChatAction::Typing).await;
                }
                _ = &mut stop_rx => break,
            }
        }
    });

    let chunks =
        lookup::build_reply(state.github.as_ref(), &request, state.cfg.message_limit).await;

    let _ = stop_tx.send(());
    let _ = typing_task.await;

    for chunk in &chunks {
        if let Err(e) = state.messenger.send_html(chat_id, chunk).await {
            error!(error = %e, user_id = user_id.0, "failed to deliver report chunk");
            let _ = bot.send_message(msg.chat.id, APOLOGY).await;
            break;
        }
    }

    Ok(())
}
