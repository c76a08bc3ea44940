//! Octocrab-based GitHub API client
//!
//! Direct implementation of the `GitHubClient` trait using the octocrab library.
//! This client makes real API calls without any caching.

use crate::client::GitHubClient;
use crate::query::{PullRequestQuery, PullRequestState};
use crate::types::{BranchRef, PullRequest, PullRequestPage, ReviewComment};
use async_trait::async_trait;
use log::debug;
use octocrab::Octocrab;
use std::sync::Arc;

/// Direct GitHub API client using octocrab
///
/// This is the base implementation that makes actual API calls.
#[derive(Debug, Clone)]
pub struct OctocrabClient {
    octocrab: Arc<Octocrab>,
}

impl OctocrabClient {
    /// Create a new client with the given octocrab instance
    ///
    /// The instance carries the host's base URI and token.
    pub fn new(octocrab: Arc<Octocrab>) -> Self {
        Self { octocrab }
    }
}

#[async_trait]
impl GitHubClient for OctocrabClient {
    async fn fetch_pull_request_page(
        &self,
        owner: &str,
        repo: &str,
        query: &PullRequestQuery,
        page: u32,
        per_page: u8,
    ) -> anyhow::Result<PullRequestPage> {
        debug!(
            "Fetching PR page {} for {}/{} ({})",
            page, owner, repo, query
        );

        let pulls = self.octocrab.pulls(owner, repo);
        let mut request = pulls
            .list()
            .state(convert_state(query.state))
            .per_page(per_page)
            .page(page);

        if let Some(base) = &query.base {
            request = request.base(base.clone());
        }
        if let Some(head) = &query.head {
            request = request.head(head.clone());
        }

        let response = request.send().await?;
        let has_next = response.next.is_some();
        let items: Vec<PullRequest> = response.items.iter().map(convert_pull_request).collect();

        debug!(
            "Fetched {} PRs for {}/{} (next page: {})",
            items.len(),
            owner,
            repo,
            has_next
        );
        Ok(PullRequestPage { items, has_next })
    }

    async fn fetch_pull_request(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<PullRequest> {
        debug!("Fetching PR #{} for {}/{}", pr_number, owner, repo);

        let pr = self.octocrab.pulls(owner, repo).get(pr_number).await?;
        Ok(convert_pull_request(&pr))
    }

    async fn fetch_review_comments(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<Vec<ReviewComment>> {
        debug!(
            "Fetching review comments for {}/{}#{}",
            owner, repo, pr_number
        );

        let first_page = self
            .octocrab
            .pulls(owner, repo)
            .list_comments(Some(pr_number))
            .per_page(100)
            .send()
            .await?;
        let comments = self.octocrab.all_pages(first_page).await?;

        Ok(comments
            .into_iter()
            .map(|c| ReviewComment {
                id: c.id.0,
                in_reply_to_id: c.in_reply_to_id.map(|id| id.0),
                path: c.path,
                line: c.line.map(|l| l as u32),
                body: c.body,
                author: c
                    .user
                    .map(|u| u.login)
                    .unwrap_or_else(|| "unknown".to_string()),
                created_at: c.created_at,
                updated_at: c.updated_at,
            })
            .collect())
    }

    async fn fetch_pull_request_notifications(
        &self,
        owner: &str,
        repo: &str,
    ) -> anyhow::Result<Vec<u64>> {
        debug!("Fetching notifications for {}/{}", owner, repo);

        let page = self
            .octocrab
            .activity()
            .notifications()
            .list_for_repo(owner, repo)
            .send()
            .await?;

        let numbers = page
            .items
            .iter()
            .filter(|n| n.unread && n.subject.r#type == "PullRequest")
            .filter_map(|n| n.subject.url.as_ref())
            .filter_map(|url| pull_request_number_from_api_url(url.as_str()))
            .collect();

        Ok(numbers)
    }
}

fn convert_state(state: PullRequestState) -> octocrab::params::State {
    match state {
        PullRequestState::Open => octocrab::params::State::Open,
        PullRequestState::Closed => octocrab::params::State::Closed,
        PullRequestState::All => octocrab::params::State::All,
    }
}

/// Convert octocrab PullRequest to our PullRequest type
fn convert_pull_request(pr: &octocrab::models::pulls::PullRequest) -> PullRequest {
    // A PR whose head repository was deleted has no usable head branch
    let head = pr.head.repo.as_ref().map(|repo| BranchRef {
        ref_name: pr.head.ref_field.clone(),
        sha: pr.head.sha.clone(),
        repository: repo.full_name.clone(),
    });

    PullRequest {
        number: pr.number,
        title: pr.title.clone().unwrap_or_default(),
        body: pr.body.clone(),
        author: pr
            .user
            .as_ref()
            .map(|u| u.login.clone())
            .unwrap_or_else(|| "unknown".to_string()),
        comments: pr.comments.unwrap_or(0),
        draft: pr.draft.unwrap_or(false),
        head,
        base: BranchRef {
            ref_name: pr.base.ref_field.clone(),
            sha: pr.base.sha.clone(),
            repository: pr.base.repo.as_ref().and_then(|r| r.full_name.clone()),
        },
        created_at: pr.created_at.unwrap_or_else(chrono::Utc::now),
        updated_at: pr.updated_at.unwrap_or_else(chrono::Utc::now),
        html_url: pr
            .html_url
            .as_ref()
            .map(|u| u.to_string())
            .unwrap_or_default(),
        additions: pr.additions.unwrap_or(0),
        deletions: pr.deletions.unwrap_or(0),
    }
}

/// Extract the PR number from a notification subject URL
/// (`.../repos/{owner}/{repo}/pulls/{number}`)
fn pull_request_number_from_api_url(url: &str) -> Option<u64> {
    let mut segments = url.trim_end_matches('/').rsplit('/');
    let number = segments.next()?.parse().ok()?;
    (segments.next()? == "pulls").then_some(number)
}
