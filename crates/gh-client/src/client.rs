//! GitHub client trait
//!
//! This module defines the core `GitHubClient` trait that all client
//! implementations must satisfy.

use crate::query::PullRequestQuery;
use crate::types::{PullRequest, PullRequestPage, ReviewComment};
use async_trait::async_trait;

/// GitHub API client trait
///
/// Defines the interface for interacting with the GitHub API.
/// Implementations can be direct (hitting the API) or test doubles.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow sharing across
/// async tasks and threads.
///
/// # Example
///
/// ```rust,ignore
/// use gh_client::{GitHubClient, PullRequestQuery};
///
/// async fn downstream_of(client: &dyn GitHubClient) -> anyhow::Result<usize> {
///     let query = PullRequestQuery::open().base("feature-x");
///     let page = client
///         .fetch_pull_request_page("rust-lang", "rust", &query, 1, 30)
///         .await?;
///     Ok(page.items.len())
/// }
/// ```
#[async_trait]
pub trait GitHubClient: Send + Sync {
    /// Fetch one page of pull requests matching a query
    ///
    /// # Arguments
    ///
    /// * `owner` - Repository owner (user or organization)
    /// * `repo` - Repository name
    /// * `query` - State and branch filters
    /// * `page` - 1-indexed page number
    /// * `per_page` - Page size (GitHub caps this at 100)
    ///
    /// # Returns
    ///
    /// The page items in API order, and whether a next page exists.
    async fn fetch_pull_request_page(
        &self,
        owner: &str,
        repo: &str,
        query: &PullRequestQuery,
        page: u32,
        per_page: u8,
    ) -> anyhow::Result<PullRequestPage>;

    /// Fetch a single pull request by number
    ///
    /// This returns full PR details including additions/deletions
    /// which are not available in the list endpoint.
    async fn fetch_pull_request(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<PullRequest>;

    /// Fetch review comments for a pull request
    ///
    /// Returns all review comments (line comments) on a PR, including
    /// replies. Replies carry the id of the comment they answer.
    async fn fetch_review_comments(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<Vec<ReviewComment>>;

    /// Fetch the numbers of pull requests with unread notifications
    ///
    /// Only notifications whose subject is a pull request of the given
    /// repository are considered.
    async fn fetch_pull_request_notifications(
        &self,
        owner: &str,
        repo: &str,
    ) -> anyhow::Result<Vec<u64>>;
}
