//! Unread pull request notifications
//!
//! Tracks which pull requests of a repository have unread notifications so
//! pull request nodes can mark them.

use crate::repository::Repository;
use anyhow::{Context, Result};
use gh_client::GitHubClient;
use log::debug;
use std::collections::BTreeSet;
use std::sync::{Arc, RwLock};

pub struct NotificationProvider {
    client: Arc<dyn GitHubClient>,
    repository: Repository,
    unread: RwLock<BTreeSet<u64>>,
}

impl NotificationProvider {
    pub fn new(client: Arc<dyn GitHubClient>, repository: Repository) -> Self {
        Self {
            client,
            repository,
            unread: RwLock::new(BTreeSet::new()),
        }
    }

    /// Reload unread notifications from the API. Returns how many PRs have one.
    pub async fn refresh(&self) -> Result<usize> {
        let numbers = self
            .client
            .fetch_pull_request_notifications(&self.repository.org, &self.repository.repo)
            .await
            .context("Failed to fetch notifications")?;

        let mut unread = self.unread.write().unwrap_or_else(|p| p.into_inner());
        *unread = numbers.into_iter().collect();
        debug!(
            "{} pull requests with unread notifications in {}",
            unread.len(),
            self.repository.display_name()
        );
        Ok(unread.len())
    }

    pub fn has_notification(&self, number: u64) -> bool {
        self.unread
            .read()
            .map(|unread| unread.contains(&number))
            .unwrap_or(false)
    }

    pub fn mark_read(&self, number: u64) {
        if let Ok(mut unread) = self.unread.write() {
            unread.remove(&number);
        }
    }
}
