//! GitHub API data transfer objects
//!
//! These types represent the data returned from the GitHub API.
//! They are intentionally separate from application domain models
//! to keep this crate pure and reusable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A pull request from the GitHub API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequest {
    /// PR number (e.g., 123)
    pub number: u64,

    /// PR title
    pub title: String,

    /// PR body/description
    pub body: Option<String>,

    /// Author's GitHub username
    pub author: String,

    /// Number of issue comments on the PR
    pub comments: u64,

    /// Whether the PR is a draft
    #[serde(default)]
    pub draft: bool,

    /// Source branch. `None` when the head repository is gone
    /// (e.g. the fork was deleted).
    pub head: Option<BranchRef>,

    /// Target branch
    pub base: BranchRef,

    /// When the PR was created
    pub created_at: DateTime<Utc>,

    /// When the PR was last updated
    pub updated_at: DateTime<Utc>,

    /// PR URL for opening in browser
    pub html_url: String,

    /// Number of lines added
    pub additions: u64,

    /// Number of lines deleted
    pub deletions: u64,
}

/// One end of a pull request (head or base)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchRef {
    /// Branch name (e.g., "feature/foo")
    pub ref_name: String,

    /// Commit SHA the branch points at
    pub sha: String,

    /// Repository the branch lives in, as `owner/name`
    pub repository: Option<String>,
}

impl BranchRef {
    pub fn new(ref_name: impl Into<String>, sha: impl Into<String>) -> Self {
        Self {
            ref_name: ref_name.into(),
            sha: sha.into(),
            repository: None,
        }
    }
}

/// One page of a pull request listing
#[derive(Debug, Clone, Default)]
pub struct PullRequestPage {
    /// Items in the order the API returned them
    pub items: Vec<PullRequest>,

    /// Whether the API advertised a next page
    pub has_next: bool,
}

/// A review comment on a pull request
///
/// Represents a comment on a specific line in a PR diff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewComment {
    /// GitHub comment ID
    pub id: u64,
    /// Comment this one replies to (None for the first comment of a thread)
    pub in_reply_to_id: Option<u64>,
    /// File path the comment is on
    pub path: String,
    /// Line number in the diff (for new code)
    pub line: Option<u32>,
    /// Comment body text
    pub body: String,
    /// Author's GitHub username
    pub author: String,
    /// When the comment was created
    pub created_at: DateTime<Utc>,
    /// When the comment was last updated
    pub updated_at: DateTime<Utc>,
}
