//! Pull request model
//!
//! Wraps the API snapshot of a pull request together with its review
//! threads, and exposes change streams for comments and review threads.

use crate::events::{EventEmitter, Subscription};
use chrono::{DateTime, Utc};
use gh_client::{BranchRef, PullRequest, ReviewComment};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

/// A review comment together with its replies
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewThread {
    /// Id of the comment that opened the thread
    pub root_id: u64,
    pub path: String,
    pub line: Option<u32>,
    /// Root comment first, replies in creation order
    pub comments: Vec<ReviewComment>,
}

impl ReviewThread {
    /// Latest edit within the thread
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.comments.iter().map(|c| c.updated_at).max()
    }
}

/// Group flat review comments into threads, ordered by root comment id
///
/// Replies whose root is missing from `comments` open their own thread.
pub fn group_into_threads(comments: &[ReviewComment]) -> Vec<ReviewThread> {
    let mut threads: BTreeMap<u64, ReviewThread> = BTreeMap::new();

    for comment in comments {
        let root_id = comment
            .in_reply_to_id
            .filter(|root| comments.iter().any(|c| c.id == *root))
            .unwrap_or(comment.id);

        threads
            .entry(root_id)
            .or_insert_with(|| ReviewThread {
                root_id,
                path: comment.path.clone(),
                line: comment.line,
                comments: Vec::new(),
            })
            .comments
            .push(comment.clone());
    }

    let mut threads: Vec<ReviewThread> = threads.into_values().collect();
    for thread in &mut threads {
        let root_id = thread.root_id;
        thread
            .comments
            .sort_by_key(|c| (c.id != root_id, c.created_at, c.id));
        if let Some(root) = thread.comments.first() {
            thread.path = root.path.clone();
            thread.line = root.line;
        }
    }
    threads
}

/// Fingerprint used to decide whether the thread set changed
fn thread_signature(threads: &[ReviewThread]) -> Vec<(u64, usize, Option<DateTime<Utc>>)> {
    threads
        .iter()
        .map(|t| (t.root_id, t.comments.len(), t.last_updated()))
        .collect()
}

/// A pull request as seen by the tree
///
/// Owned by the repository manager and shared with nodes through `Arc`.
/// Nodes only read it and subscribe to its change streams.
#[derive(Debug)]
pub struct PullRequestModel {
    data: Mutex<PullRequest>,
    review_threads: Mutex<Vec<ReviewThread>>,
    comments_changed: EventEmitter<()>,
    review_threads_changed: EventEmitter<()>,
}

impl PullRequestModel {
    pub fn new(data: PullRequest) -> Self {
        Self {
            data: Mutex::new(data),
            review_threads: Mutex::new(Vec::new()),
            comments_changed: EventEmitter::new(),
            review_threads_changed: EventEmitter::new(),
        }
    }

    fn data(&self) -> MutexGuard<'_, PullRequest> {
        self.data.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn threads(&self) -> MutexGuard<'_, Vec<ReviewThread>> {
        self.review_threads
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn number(&self) -> u64 {
        self.data().number
    }

    /// Source branch, absent when the head repository is gone
    pub fn head(&self) -> Option<BranchRef> {
        self.data().head.clone()
    }

    pub fn base(&self) -> BranchRef {
        self.data().base.clone()
    }

    pub fn title(&self) -> String {
        self.data().title.clone()
    }

    pub fn author(&self) -> String {
        self.data().author.clone()
    }

    pub fn html_url(&self) -> String {
        self.data().html_url.clone()
    }

    pub fn is_draft(&self) -> bool {
        self.data().draft
    }

    pub fn comment_count(&self) -> u64 {
        self.data().comments
    }

    /// Copy of the current API snapshot
    pub fn snapshot(&self) -> PullRequest {
        self.data().clone()
    }

    pub fn review_threads(&self) -> Vec<ReviewThread> {
        self.threads().clone()
    }

    /// Register a listener for comment changes
    pub fn on_did_change_comments<F>(&self, listener: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.comments_changed.subscribe(move |_| listener())
    }

    /// Register a listener for review thread changes
    pub fn on_did_change_review_threads<F>(&self, listener: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.review_threads_changed.subscribe(move |_| listener())
    }

    /// Replace the API snapshot. Fires a comment change when the comment
    /// count moved. Returns whether that happened.
    pub fn update(&self, data: PullRequest) -> bool {
        let comments_changed = {
            let mut current = self.data();
            let changed = current.comments != data.comments;
            *current = data;
            changed
        };

        if comments_changed {
            self.comments_changed.fire(&());
        }
        comments_changed
    }

    /// Replace the review comments. Fires a review thread change when the
    /// resulting thread set differs. Returns whether that happened.
    pub fn set_review_comments(&self, comments: &[ReviewComment]) -> bool {
        let threads = group_into_threads(comments);
        let changed = {
            let mut current = self.threads();
            let changed = thread_signature(&current) != thread_signature(&threads);
            *current = threads;
            changed
        };

        if changed {
            self.review_threads_changed.fire(&());
        }
        changed
    }
}
