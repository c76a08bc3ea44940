//! Pull request query filters
//!
//! A `PullRequestQuery` carries the filters a pull request listing is
//! narrowed by. Its `Display` form is the GitHub search syntax
//! (`is:open repo:owner/name base:branch`), which is what ends up in logs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Pull request state filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PullRequestState {
    #[default]
    Open,
    Closed,
    All,
}

/// Filters for listing pull requests
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestQuery {
    /// Which PR states to include
    pub state: PullRequestState,

    /// Repository scope as `(owner, name)`
    pub repository: Option<(String, String)>,

    /// Only PRs targeting this base branch
    pub base: Option<String>,

    /// Only PRs from this head branch (`user:ref` or `ref`)
    pub head: Option<String>,
}

impl PullRequestQuery {
    /// Query for open pull requests without further filters
    pub fn open() -> Self {
        Self::default()
    }

    /// Restrict the query to PRs targeting `branch`
    pub fn base(mut self, branch: impl Into<String>) -> Self {
        self.base = Some(branch.into());
        self
    }

    /// Restrict the query to PRs coming from `branch`
    pub fn head(mut self, branch: impl Into<String>) -> Self {
        self.head = Some(branch.into());
        self
    }

    /// Scope the query to a repository
    pub fn in_repository(mut self, owner: impl Into<String>, name: impl Into<String>) -> Self {
        self.repository = Some((owner.into(), name.into()));
        self
    }
}

impl fmt::Display for PullRequestQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.state {
            PullRequestState::Open => Some("is:open"),
            PullRequestState::Closed => Some("is:closed"),
            PullRequestState::All => None,
        };

        let mut parts: Vec<String> = Vec::new();
        if let Some(state) = state {
            parts.push(state.to_string());
        }
        if let Some((owner, name)) = &self.repository {
            parts.push(format!("repo:{}/{}", owner, name));
        }
        if let Some(base) = &self.base {
            parts.push(format!("base:{}", base));
        }
        if let Some(head) = &self.head {
            parts.push(format!("head:{}", head));
        }

        write!(f, "{}", parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downstream_query_string() {
        let query = PullRequestQuery::open()
            .in_repository("rust-lang", "rust")
            .base("feature-x");

        assert_eq!(
            query.to_string(),
            "is:open repo:rust-lang/rust base:feature-x"
        );
    }

    #[test]
    fn test_query_without_repository() {
        let query = PullRequestQuery::open().base("main");
        assert_eq!(query.to_string(), "is:open base:main");
    }

    #[test]
    fn test_all_states_has_no_state_qualifier() {
        let query = PullRequestQuery {
            state: PullRequestState::All,
            ..PullRequestQuery::default()
        }
        .head("octocat:topic");

        assert_eq!(query.to_string(), "head:octocat:topic");
    }
}
