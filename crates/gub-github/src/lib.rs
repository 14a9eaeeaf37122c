//! GitHub adapter (reqwest).
//!
//! Implements the `gub-core` RelationApi port over the GitHub users API.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{header::HeaderMap, StatusCode};
use serde::Deserialize;
use tracing::debug;

use gub_core::{
    domain::{Relation, Username},
    relations::{FetchError, RelationApi, PAGE_SIZE},
};

const API_BASE: &str = "https://api.github.com";
// GitHub rejects requests without a User-Agent.
const USER_AGENT: &str = "gub-unfollowers-bot";

#[derive(Clone, Debug)]
pub struct GithubClient {
    http: reqwest::Client,
    token: Option<String>,
}

/// One element of the followers/following JSON array; everything but `login`
/// is ignored.
#[derive(Debug, Deserialize)]
struct RelationEntry {
    login: String,
}

impl GithubClient {
    pub fn new(token: Option<String>, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .expect("reqwest client build");
        Self { http, token }
    }
}

#[async_trait]
impl RelationApi for GithubClient {
    async fn fetch_page(
        &self,
        user: &Username,
        relation: Relation,
        page: u32,
    ) -> std::result::Result<Vec<String>, FetchError> {
        let url = format!("{API_BASE}/users/{user}/{}", relation.api_segment());

        let mut req = self.http.get(&url).query(&[
            ("page", page.to_string()),
            ("per_page", PAGE_SIZE.to_string()),
        ]);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        let resp = req.send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Transient("github request timed out".to_string())
            } else {
                FetchError::Transient(format!("github request error: {e}"))
            }
        })?;

        let status = resp.status();
        debug!(%url, page, %status, "github page fetched");

        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound);
        }

        // Quota exhaustion comes back as 403 (or 429) with the remaining
        // count at zero; a plain 403 without it is some other refusal.
        if (status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS)
            && rate_limit_exhausted(resp.headers())
        {
            return Err(FetchError::RateLimited {
                retry_after: retry_after_from_reset(resp.headers(), Utc::now().timestamp()),
            });
        }

        if !status.is_success() {
            return Err(FetchError::Transient(format!(
                "github responded with {status}"
            )));
        }

        let entries: Vec<RelationEntry> = resp
            .json()
            .await
            .map_err(|e| FetchError::Transient(format!("github json error: {e}")))?;

        Ok(entries.into_iter().map(|e| e.login).collect())
    }
}

fn rate_limit_exhausted(headers: &HeaderMap) -> bool {
    header_u64(headers, "x-ratelimit-remaining") == Some(0)
}

/// Wait until the advertised reset instant (unix seconds), floored at zero.
fn retry_after_from_reset(headers: &HeaderMap, now_unix: i64) -> Duration {
    let Some(reset_at) = header_u64(headers, "x-ratelimit-reset") else {
        return Duration::from_secs(60);
    };
    Duration::from_secs((reset_at as i64 - now_unix).max(0) as u64)
}

fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers
        .get(name)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
}
