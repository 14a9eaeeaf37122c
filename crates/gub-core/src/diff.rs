//! Asymmetric set differences over a fetched social graph.

use crate::relations::SocialGraph;

/// The two one-directional relationship sets, sorted lexicographically so
/// downstream output is deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiffResult {
    /// Accounts the identity follows that do not follow back.
    pub not_following_back: Vec<String>,
    /// Accounts following the identity that it does not follow back.
    pub not_followed_back: Vec<String>,
}

impl DiffResult {
    pub fn is_reciprocal(&self) -> bool {
        self.not_following_back.is_empty() && self.not_followed_back.is_empty()
    }
}

/// Pure computation; empty inputs are valid and yield empty differences.
pub fn diff(graph: &SocialGraph) -> DiffResult {
    let mut not_following_back: Vec<String> = graph
        .following
        .difference(&graph.followers)
        .cloned()
        .collect();
    let mut not_followed_back: Vec<String> = graph
        .followers
        .difference(&graph.following)
        .cloned()
        .collect();

    not_following_back.sort();
    not_followed_back.sort();

    DiffResult {
        not_following_back,
        not_followed_back,
    }
}
