//! One-shot lookup orchestration: sanitize, fetch both relations, diff,
//! chunk. Every failure path collapses into exactly one user-facing message,
//! so the reply is always a non-empty chunk sequence.

use tracing::{info, warn};

use crate::{
    diff::diff,
    relations::{fetch_graph, FetchError, RelationApi},
    report::build_report,
    security::validate_username,
};

const INVALID_USERNAME: &str =
    "Invalid username. Please enter a valid GitHub username (letters, digits, - and _, at most 39 characters).";
const NOT_FOUND: &str = "User not found. Please enter a valid GitHub username.";
const TRY_AGAIN: &str = "The GitHub API did not respond. Please try again later.";

fn rate_limited_message(retry_after: std::time::Duration) -> String {
    // Round up to whole minutes for display.
    let minutes = retry_after.as_secs().div_ceil(60).max(1);
    format!("GitHub API rate limit reached. Please try again in about {minutes} minute(s).")
}

/// Compute the unfollower report for a raw caller-supplied username.
///
/// Invalid identities short-circuit before any network call.
pub async fn build_reply(api: &dyn RelationApi, raw: &str, message_limit: usize) -> Vec<String> {
    let Some(user) = validate_username(raw) else {
        return vec![INVALID_USERNAME.to_string()];
    };

    match fetch_graph(api, &user).await {
        Ok(graph) => {
            let d = diff(&graph);
            info!(
                user = %user,
                followers = graph.followers.len(),
                following = graph.following.len(),
                not_following_back = d.not_following_back.len(),
                not_followed_back = d.not_followed_back.len(),
                "lookup complete"
            );
            build_report(&d, message_limit)
        }
        Err(FetchError::NotFound) => {
            info!(user = %user, "lookup target not found");
            vec![NOT_FOUND.to_string()]
        }
        Err(FetchError::RateLimited { retry_after }) => {
            warn!(user = %user, retry_after_secs = retry_after.as_secs(), "github rate limited");
            vec![rate_limited_message(retry_after)]
        }
        Err(FetchError::Transient(reason)) => {
            warn!(user = %user, %reason, "transient github failure");
            vec![TRY_AGAIN.to_string()]
        }
    }
}
