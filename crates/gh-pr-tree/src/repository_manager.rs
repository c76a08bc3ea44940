//! Repository manager
//!
//! Runs pull request queries for one repository and hands out shared
//! [`PullRequestModel`]s. Queries are scoped to the managed repository
//! before they reach the client.

use crate::pull_request::PullRequestModel;
use crate::repository::Repository;
use anyhow::{Context, Result};
use gh_client::{GitHubClient, PullRequestQuery};
use log::debug;
use std::sync::Arc;

/// Kind of pull request listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrType {
    /// Pull requests matching a query
    Query,
    /// Every open pull request of the repository, query filters ignored
    All,
}

/// Paging behaviour of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingOptions {
    /// Follow next-page links until the listing is exhausted
    pub fetch_next_page: bool,
    pub page_size: u8,
}

impl Default for PagingOptions {
    fn default() -> Self {
        Self {
            fetch_next_page: false,
            page_size: 30,
        }
    }
}

impl PagingOptions {
    /// Only the first page
    pub fn first_page(page_size: u8) -> Self {
        Self {
            fetch_next_page: false,
            page_size,
        }
    }
}

/// Result of a listing
#[derive(Debug, Default)]
pub struct ItemsResponse {
    /// Pull requests in API order
    pub items: Vec<Arc<PullRequestModel>>,
    /// Whether more results exist beyond what was fetched
    pub has_more_items: bool,
}

/// Pull request access for one repository
pub struct RepositoryManager {
    client: Arc<dyn GitHubClient>,
    repository: Repository,
}

impl RepositoryManager {
    pub fn new(client: Arc<dyn GitHubClient>, repository: Repository) -> Self {
        Self { client, repository }
    }

    /// Scope `query` to the managed repository
    pub fn scoped_query(&self, query: &PullRequestQuery) -> PullRequestQuery {
        query
            .clone()
            .in_repository(&self.repository.org, &self.repository.repo)
    }

    /// List pull requests
    ///
    /// Without `fetch_next_page` exactly one page is requested.
    pub async fn get_pull_requests(
        &self,
        pr_type: PrType,
        paging: PagingOptions,
        query: &PullRequestQuery,
    ) -> Result<ItemsResponse> {
        let query = match pr_type {
            PrType::Query => self.scoped_query(query),
            PrType::All => self.scoped_query(&PullRequestQuery::open()),
        };
        debug!("Listing pull requests: {}", query);

        let mut response = ItemsResponse::default();
        let mut page = 1u32;
        loop {
            let result = self
                .client
                .fetch_pull_request_page(
                    &self.repository.org,
                    &self.repository.repo,
                    &query,
                    page,
                    paging.page_size,
                )
                .await
                .with_context(|| format!("Failed to list pull requests ({})", query))?;

            response.items.extend(
                result
                    .items
                    .into_iter()
                    .map(|pr| Arc::new(PullRequestModel::new(pr))),
            );
            response.has_more_items = result.has_next;

            if !paging.fetch_next_page || !result.has_next {
                break;
            }
            page += 1;
        }

        debug!(
            "Listed {} pull requests (more available: {})",
            response.items.len(),
            response.has_more_items
        );
        Ok(response)
    }

    /// Fetch one pull request
    pub async fn get_pull_request(&self, number: u64) -> Result<Arc<PullRequestModel>> {
        let pr = self
            .client
            .fetch_pull_request(&self.repository.org, &self.repository.repo, number)
            .await
            .with_context(|| {
                format!(
                    "Failed to fetch pull request {}#{}",
                    self.repository.display_name(),
                    number
                )
            })?;
        Ok(Arc::new(PullRequestModel::new(pr)))
    }

    /// Re-fetch `model` from the API. Returns whether its comments changed.
    pub async fn refresh_pull_request(&self, model: &PullRequestModel) -> Result<bool> {
        let pr = self
            .client
            .fetch_pull_request(&self.repository.org, &self.repository.repo, model.number())
            .await
            .context("Failed to refresh pull request")?;
        Ok(model.update(pr))
    }

    /// Re-fetch the review comments of `model`. Returns whether its review
    /// threads changed.
    pub async fn refresh_review_threads(&self, model: &PullRequestModel) -> Result<bool> {
        let comments = self
            .client
            .fetch_review_comments(&self.repository.org, &self.repository.repo, model.number())
            .await
            .context("Failed to fetch review comments")?;
        Ok(model.set_review_comments(&comments))
    }
}
