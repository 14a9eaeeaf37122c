use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};

use tokio::sync::Mutex;
use tracing::info;

use gub_core::messaging::throttled::{ThrottleConfig, ThrottledMessenger};
use gub_core::{
    config::Config, messaging::port::MessagingPort, relations::RelationApi, security::RateLimiter,
};

use crate::handlers;
use crate::TelegramMessenger;

#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub github: Arc<dyn RelationApi>,
    pub messenger: Arc<dyn MessagingPort>,
    pub rate_limiter: Arc<Mutex<RateLimiter>>,
}

pub async fn run_polling(cfg: Arc<Config>, github: Arc<dyn RelationApi>) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.telegram_bot_token.clone());

    // Basic startup info.
    match bot.get_me().await {
        Ok(me) => info!(bot = me.username(), "bot started"),
        Err(e) => info!(error = %e, "get_me failed; starting anyway"),
    }

    // Wrap the raw Telegram messenger with a throttling decorator so
    // multi-chunk reports do not trip Telegram flood control. The adapter
    // layer still retries once on 429 RetryAfter.
    let raw_messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(bot.clone()));
    let messenger: Arc<dyn MessagingPort> = Arc::new(ThrottledMessenger::new(
        raw_messenger,
        ThrottleConfig::default(),
    ));

    let state = Arc::new(AppState {
        cfg: cfg.clone(),
        github,
        messenger,
        rate_limiter: Arc::new(Mutex::new(RateLimiter::new(
            cfg.rate_limit_enabled,
            cfg.rate_limit_max_messages,
            cfg.rate_limit_window,
            cfg.rate_limit_block,
        ))),
    });

    let handler = dptree::entry().branch(Update::filter_message().endpoint(handlers::handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .build()
        .dispatch()
        .await;

    Ok(())
}
