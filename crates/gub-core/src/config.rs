use std::{env, fs, path::Path, time::Duration};

use crate::{errors::Error, Result};

/// Typed configuration for the bot, loaded from the environment.
#[derive(Clone, Debug)]
pub struct Config {
    // Core
    pub telegram_bot_token: String,
    /// Bot handle without the leading `@`; used for the group mention gate.
    pub bot_username: String,
    /// Optional GitHub token for the elevated API quota.
    pub github_token: Option<String>,

    // Upstream fetch
    pub fetch_timeout: Duration,

    // Telegram limits
    /// Chunk ceiling for outgoing messages (under Telegram's 4096 hard cap,
    /// with margin for HTML markup).
    pub message_limit: usize,

    // Rate limiting (admission control)
    pub rate_limit_enabled: bool,
    pub rate_limit_max_messages: usize,
    pub rate_limit_window: Duration,
    pub rate_limit_block: Duration,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        // Required env vars
        let telegram_bot_token = env_str("TELEGRAM_BOT_TOKEN").unwrap_or_default();
        if telegram_bot_token.trim().is_empty() {
            return Err(Error::Config(
                "TELEGRAM_BOT_TOKEN environment variable is required".to_string(),
            ));
        }

        let bot_username = env_str("BOT_USERNAME")
            .and_then(non_empty)
            .ok_or_else(|| {
                Error::Config("BOT_USERNAME environment variable is required".to_string())
            })?
            .trim()
            .trim_start_matches('@')
            .to_string();

        let github_token = env_str("GITHUB_TOKEN").and_then(non_empty);

        let fetch_timeout = Duration::from_millis(env_u64("FETCH_TIMEOUT_MS").unwrap_or(10_000));
        let message_limit = env_usize("TELEGRAM_SAFE_LIMIT").unwrap_or(3000);

        let rate_limit_enabled = env_bool("RATE_LIMIT_ENABLED").unwrap_or(true);
        let rate_limit_max_messages = env_usize("RATE_LIMIT_MAX_MESSAGES").unwrap_or(3);
        let rate_limit_window =
            Duration::from_secs(env_u64("RATE_LIMIT_WINDOW_SECONDS").unwrap_or(60));
        let rate_limit_block =
            Duration::from_secs(env_u64("RATE_LIMIT_BLOCK_SECONDS").unwrap_or(300));

        Ok(Self {
            telegram_bot_token,
            bot_username,
            github_token,
            fetch_timeout,
            message_limit,
            rate_limit_enabled,
            rate_limit_max_messages,
            rate_limit_window,
            rate_limit_block,
        })
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn env_bool(key: &str) -> Option<bool> {
    env_str(key).map(|s| {
        matches!(
            s.trim().to_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

fn env_u64(key: &str) -> Option<u64> {
    env_str(key).and_then(|s| s.trim().parse::<u64>().ok())
}

fn env_usize(key: &str) -> Option<usize> {
    env_str(key).and_then(|s| s.trim().parse::<usize>().ok())
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_bool_accepts_common_truthy_values() {
        env::set_var("GUB_TEST_BOOL", "Yes");
        assert_eq!(env_bool("GUB_TEST_BOOL"), Some(true));
        env::set_var("GUB_TEST_BOOL", "0");
        assert_eq!(env_bool("GUB_TEST_BOOL"), Some(false));
        env::remove_var("GUB_TEST_BOOL");
    }
}
