//! Paginated retrieval of follower/following sets.
//!
//! The HTTP side lives behind [`RelationApi`]; this module only owns the
//! page loop and the failure taxonomy.

use std::{collections::HashSet, time::Duration};

use async_trait::async_trait;

use crate::domain::{Relation, Username};

/// GitHub users API page size.
pub const PAGE_SIZE: u32 = 100;

/// Why a relation fetch stopped short of a complete set.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The target identity does not exist upstream. Terminal for the request.
    #[error("user not found")]
    NotFound,

    /// Upstream quota exhausted; retry no earlier than `retry_after` from now.
    #[error("upstream rate limit exhausted")]
    RateLimited { retry_after: Duration },

    /// Timeout, connection failure, non-2xx, or malformed body.
    #[error("transient upstream failure: {0}")]
    Transient(String),
}

/// Port for one page of a social-graph relation.
///
/// Implementations return the `login` values on the requested page; an empty
/// vector means the relation is exhausted.
#[async_trait]
pub trait RelationApi: Send + Sync {
    async fn fetch_page(
        &self,
        user: &Username,
        relation: Relation,
        page: u32,
    ) -> std::result::Result<Vec<String>, FetchError>;
}

/// Both sides of one identity's social graph, fully paginated.
#[derive(Clone, Debug, Default)]
pub struct SocialGraph {
    pub followers: HashSet<String>,
    pub following: HashSet<String>,
}

/// Fetch one complete relation, page-indexed, stopping on the first empty
/// page. Duplicate logins across pages merge via set semantics.
pub async fn fetch_relation_set(
    api: &dyn RelationApi,
    user: &Username,
    relation: Relation,
) -> std::result::Result<HashSet<String>, FetchError> {
    let mut out = HashSet::new();
    let mut page = 1u32;
    loop {
        let entries = api.fetch_page(user, relation, page).await?;
        if entries.is_empty() {
            return Ok(out);
        }
        out.extend(entries);
        page += 1;
    }
}

/// Fetch followers, then following, for one identity.
///
/// Sequential on purpose: the first failing fetch short-circuits, so the
/// followers response decides the outcome when both sides would fail.
pub async fn fetch_graph(
    api: &dyn RelationApi,
    user: &Username,
) -> std::result::Result<SocialGraph, FetchError> {
    let followers = fetch_relation_set(api, user, Relation::Followers).await?;
    let following = fetch_relation_set(api, user, Relation::Following).await?;
    Ok(SocialGraph {
        followers,
        following,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Scripted relation API with a call counter, for fetch-loop tests.
    pub(crate) struct FakeApi {
        pub followers: Vec<Vec<String>>,
        pub following: Vec<Vec<String>>,
        pub fail: Option<(Relation, FetchError)>,
        pub calls: Mutex<u32>,
    }

    impl FakeApi {
        pub(crate) fn new(followers: Vec<Vec<&str>>, following: Vec<Vec<&str>>) -> Self {
            let own = |pages: Vec<Vec<&str>>| {
                pages
                    .into_iter()
                    .map(|p| p.into_iter().map(str::to_string).collect())
                    .collect()
            };
            Self {
                followers: own(followers),
                following: own(following),
                fail: None,
                calls: Mutex::new(0),
            }
        }

        pub(crate) fn failing(relation: Relation, err: FetchError) -> Self {
            let mut api = Self::new(vec![], vec![]);
            api.fail = Some((relation, err));
            api
        }

        pub(crate) fn call_count(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl RelationApi for FakeApi {
        async fn fetch_page(
            &self,
            _user: &Username,
            relation: Relation,
            page: u32,
        ) -> std::result::Result<Vec<String>, FetchError> {
            *self.calls.lock().unwrap() += 1;
            if let Some((failing, err)) = &self.fail {
                if *failing == relation {
                    return Err(err.clone());
                }
            }
            let pages = match relation {
                Relation::Followers => &self.followers,
                Relation::Following => &self.following,
            };
            Ok(pages.get(page as usize - 1).cloned().unwrap_or_default())
        }
    }

    fn user() -> Username {
        Username("octocat".to_string())
    }

    #[tokio::test]
    async fn accumulates_across_pages_until_empty() {
        let api = FakeApi::new(vec![vec!["a", "b"], vec!["c"]], vec![]);
        let set = fetch_relation_set(&api, &user(), Relation::Followers)
            .await
            .unwrap();
        assert_eq!(set.len(), 3);
        assert!(set.contains("c"));
        // Two data pages plus the terminating empty page.
        assert_eq!(api.call_count(), 3);
    }

    #[tokio::test]
    async fn duplicates_across_pages_merge() {
        let api = FakeApi::new(vec![vec!["a", "b"], vec!["b", "a"]], vec![]);
        let set = fetch_relation_set(&api, &user(), Relation::Followers)
            .await
            .unwrap();
        assert_eq!(set.len(), 2);
    }

    #[tokio::test]
    async fn empty_relation_is_valid() {
        let api = FakeApi::new(vec![], vec![]);
        let set = fetch_relation_set(&api, &user(), Relation::Followers)
            .await
            .unwrap();
        assert!(set.is_empty());
    }

    #[tokio::test]
    async fn not_found_aborts_the_whole_graph_fetch() {
        let api = FakeApi::failing(Relation::Followers, FetchError::NotFound);
        let err = fetch_graph(&api, &user()).await.unwrap_err();
        assert_eq!(err, FetchError::NotFound);
        // Following is never attempted once followers failed.
        assert_eq!(api.call_count(), 1);
    }

    #[tokio::test]
    async fn followers_outcome_takes_precedence() {
        // Sequential order means the followers outcome is what the caller
        // sees, whatever the following side would have returned.
        let mut api = FakeApi::new(vec![], vec![]);
        api.fail = Some((
            Relation::Followers,
            FetchError::RateLimited {
                retry_after: Duration::from_secs(120),
            },
        ));
        let err = fetch_graph(&api, &user()).await.unwrap_err();
        assert!(matches!(err, FetchError::RateLimited { .. }));
    }

    #[tokio::test]
    async fn following_failure_surfaces_when_followers_succeed() {
        let mut api = FakeApi::new(vec![vec!["a"]], vec![]);
        api.fail = Some((
            Relation::Following,
            FetchError::Transient("boom".to_string()),
        ));
        let err = fetch_graph(&api, &user()).await.unwrap_err();
        assert!(matches!(err, FetchError::Transient(_)));
    }
}
