//! GitHub API client for pull request lookups
//!
//! This crate provides a trait-based GitHub API client. Consumers program
//! against [`GitHubClient`]; [`OctocrabClient`] is the implementation that
//! talks to the real API, and tests substitute their own.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │              GitHubClient trait                  │
//! │  - fetch_pull_request_page()                     │
//! │  - fetch_pull_request()                          │
//! │  - fetch_review_comments()                       │
//! │  - fetch_pull_request_notifications()            │
//! └─────────────────────────────────────────────────┘
//!                        │
//!                        ▼
//!              ┌─────────────────┐
//!              │ OctocrabClient  │◄──── ClientManager (one per host)
//!              │ (direct API)    │
//!              └─────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use gh_client::{GitHubClient, OctocrabClient, PullRequestQuery};
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let octocrab = gh_client::octocrab::Octocrab::builder()
//!     .personal_token("token".to_string())
//!     .build()?;
//! let client = OctocrabClient::new(Arc::new(octocrab));
//!
//! let query = PullRequestQuery::open().base("feature-x");
//! let page = client
//!     .fetch_pull_request_page("owner", "repo", &query, 1, 30)
//!     .await?;
//! println!("{} downstream PRs", page.items.len());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod client_manager;
pub mod octocrab_client;
pub mod query;
pub mod types;

/// Default GitHub host (public GitHub)
pub const DEFAULT_HOST: &str = "github.com";

pub use client::GitHubClient;
pub use client_manager::{ClientManager, TokenResolver};
pub use octocrab_client::OctocrabClient;
pub use query::{PullRequestQuery, PullRequestState};
pub use types::{BranchRef, PullRequest, PullRequestPage, ReviewComment};

// Re-export octocrab so consumers don't need to depend on it directly
pub use octocrab;
