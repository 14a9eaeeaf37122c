/// Telegram user id (numeric). Key for per-caller rate-limit state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

/// Telegram chat id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

/// Telegram message id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageId(pub i32);

/// A stable reference to a Telegram message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

/// A sanitized GitHub username.
///
/// Only constructed through [`crate::security::sanitize_username`] + length
/// validation, so downstream code can interpolate it into URLs safely.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Username(pub String);

impl Username {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One directed edge-set of the GitHub social graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Relation {
    Followers,
    Following,
}

impl Relation {
    /// Path segment in the GitHub users API.
    pub fn api_segment(self) -> &'static str {
        match self {
            Relation::Followers => "followers",
            Relation::Following => "following",
        }
    }
}
