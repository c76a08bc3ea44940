//! Test doubles shared by the unit tests of this crate

use crate::logger::OutputLogger;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use gh_client::{
    BranchRef, GitHubClient, PullRequest, PullRequestPage, PullRequestQuery, ReviewComment,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

pub fn pull_request(number: u64, head: &str, base: &str) -> PullRequest {
    let timestamp = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    PullRequest {
        number,
        title: format!("PR {}", number),
        body: None,
        author: "octocat".to_string(),
        comments: 0,
        draft: false,
        head: Some(BranchRef {
            ref_name: head.to_string(),
            sha: format!("{:040}", number),
            repository: Some("org/repo".to_string()),
        }),
        base: BranchRef {
            ref_name: base.to_string(),
            sha: "0".repeat(40),
            repository: Some("org/repo".to_string()),
        },
        created_at: timestamp,
        updated_at: timestamp,
        html_url: format!("https://github.com/org/repo/pull/{}", number),
        additions: 1,
        deletions: 1,
    }
}

pub fn review_comment(id: u64, in_reply_to_id: Option<u64>, path: &str) -> ReviewComment {
    let timestamp = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, id as u32 % 60).unwrap();
    ReviewComment {
        id,
        in_reply_to_id,
        path: path.to_string(),
        line: Some(1),
        body: format!("comment {}", id),
        author: "reviewer".to_string(),
        created_at: timestamp,
        updated_at: timestamp,
    }
}

/// One recorded `fetch_pull_request_page` call
#[derive(Debug, Clone, PartialEq)]
pub struct PageCall {
    pub owner: String,
    pub repo: String,
    pub query: PullRequestQuery,
    pub page: u32,
    pub per_page: u8,
}

/// Mock client for testing
///
/// Serves pull requests as fixed pages. When `filter_by_base` is set it
/// drops PRs whose base does not match the query, like the API would.
#[derive(Debug, Default)]
pub struct MockClient {
    pages: Vec<Vec<PullRequest>>,
    filter_by_base: bool,
    fail: AtomicBool,
    review_comments: Mutex<Vec<ReviewComment>>,
    notifications: Vec<u64>,
    calls: Mutex<Vec<PageCall>>,
}

impl MockClient {
    pub fn with_pull_requests(prs: Vec<PullRequest>) -> Self {
        Self::with_pages(vec![prs])
    }

    pub fn with_pages(pages: Vec<Vec<PullRequest>>) -> Self {
        Self {
            pages,
            filter_by_base: true,
            ..Self::default()
        }
    }

    /// Return pages as-is, ignoring the base filter
    pub fn unfiltered(mut self) -> Self {
        self.filter_by_base = false;
        self
    }

    /// Every call fails
    pub fn failing() -> Self {
        let client = Self::default();
        client.set_failing(true);
        client
    }

    /// Make every following call fail, or succeed again
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    fn check_failing(&self) -> anyhow::Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("API rate limit exceeded");
        }
        Ok(())
    }

    pub fn with_notifications(mut self, numbers: Vec<u64>) -> Self {
        self.notifications = numbers;
        self
    }

    pub fn set_review_comments(&self, comments: Vec<ReviewComment>) {
        *self.review_comments.lock().unwrap() = comments;
    }

    pub fn calls(&self) -> Vec<PageCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl GitHubClient for MockClient {
    async fn fetch_pull_request_page(
        &self,
        owner: &str,
        repo: &str,
        query: &PullRequestQuery,
        page: u32,
        per_page: u8,
    ) -> anyhow::Result<PullRequestPage> {
        self.calls.lock().unwrap().push(PageCall {
            owner: owner.to_string(),
            repo: repo.to_string(),
            query: query.clone(),
            page,
            per_page,
        });

        self.check_failing()?;

        let index = page.saturating_sub(1) as usize;
        let items = self
            .pages
            .get(index)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|pr| {
                !self.filter_by_base
                    || query
                        .base
                        .as_ref()
                        .is_none_or(|base| &pr.base.ref_name == base)
            })
            .collect();

        Ok(PullRequestPage {
            items,
            has_next: index + 1 < self.pages.len(),
        })
    }

    async fn fetch_pull_request(
        &self,
        _owner: &str,
        _repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<PullRequest> {
        self.check_failing()?;
        self.pages
            .iter()
            .flatten()
            .find(|pr| pr.number == pr_number)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("PR not found"))
    }

    async fn fetch_review_comments(
        &self,
        _owner: &str,
        _repo: &str,
        _pr_number: u64,
    ) -> anyhow::Result<Vec<ReviewComment>> {
        self.check_failing()?;
        Ok(self.review_comments.lock().unwrap().clone())
    }

    async fn fetch_pull_request_notifications(
        &self,
        _owner: &str,
        _repo: &str,
    ) -> anyhow::Result<Vec<u64>> {
        self.check_failing()?;
        Ok(self.notifications.clone())
    }
}

/// Logger that keeps every line for assertions
#[derive(Debug, Default)]
pub struct RecordingLogger {
    lines: Mutex<Vec<(String, String)>>,
}

impl RecordingLogger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Recorded messages, without component
    pub fn messages(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .map(|(message, _)| message.clone())
            .collect()
    }

    pub fn components(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .map(|(_, component)| component.clone())
            .collect()
    }
}

impl OutputLogger for RecordingLogger {
    fn append_line(&self, message: &str, component: &str) {
        self.lines
            .lock()
            .unwrap()
            .push((message.to_string(), component.to_string()));
    }
}
