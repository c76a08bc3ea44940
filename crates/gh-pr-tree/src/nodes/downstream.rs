//! Downstream pull requests node
//!
//! Lists the open pull requests whose base branch is the head branch of the
//! parent pull request, i.e. the PRs stacked on top of it.

use super::{NodeServices, PrNode};
use crate::events::Subscription;
use crate::logger::PR_TREE;
use crate::pull_request::PullRequestModel;
use crate::repository_manager::{PagingOptions, PrType};
use crate::tree::{CollapsibleState, NodeId, TreeItem, TreeNode};
use anyhow::Result;
use async_trait::async_trait;
use gh_client::PullRequestQuery;
use gh_pr_config::AppConfig;
use std::sync::{Arc, Mutex, MutexGuard};

pub struct DownstreamPullRequestsNode {
    id: NodeId,
    parent: NodeId,
    label: String,
    page_size: u8,
    pull_request: Arc<PullRequestModel>,
    services: NodeServices,
    state: Mutex<CollapsibleState>,
    children: Mutex<Vec<Arc<PrNode>>>,
    subscriptions: Mutex<Vec<Subscription>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl DownstreamPullRequestsNode {
    /// Create the node and subscribe to the parent's comment and review
    /// thread changes. The subscriptions live until [`Self::dispose`] or drop.
    pub fn new(
        parent: NodeId,
        pull_request: Arc<PullRequestModel>,
        services: NodeServices,
        config: &AppConfig,
    ) -> Self {
        let id = NodeId::next();

        let subscriptions = vec![
            {
                let refresh = services.refresh.clone();
                let logger = Arc::clone(&services.logger);
                pull_request.on_did_change_review_threads(move || {
                    logger.append_line(
                        "Review threads have changed, refreshing Downstream Pull Requests node",
                        PR_TREE,
                    );
                    refresh.refresh(id);
                })
            },
            {
                let refresh = services.refresh.clone();
                let logger = Arc::clone(&services.logger);
                pull_request.on_did_change_comments(move || {
                    logger.append_line(
                        "Comments have changed, refreshing Downstream Pull Requests node",
                        PR_TREE,
                    );
                    refresh.refresh(id);
                })
            },
        ];

        Self {
            id,
            parent,
            label: config.downstream_label.clone(),
            page_size: config.effective_page_size(),
            pull_request,
            services,
            state: Mutex::new(CollapsibleState::Collapsed),
            children: Mutex::new(Vec::new()),
            subscriptions: Mutex::new(subscriptions),
        }
    }

    pub fn parent(&self) -> NodeId {
        self.parent
    }

    pub fn pull_request(&self) -> &Arc<PullRequestModel> {
        &self.pull_request
    }

    /// Children produced by the last successful lookup
    pub fn cached_children(&self) -> Vec<Arc<PrNode>> {
        lock(&self.children).clone()
    }

    pub fn collapse(&self) {
        *lock(&self.state) = CollapsibleState::Collapsed;
    }

    /// Release the change subscriptions and drop the children
    pub fn dispose(&self) {
        let subscriptions = std::mem::take(&mut *lock(&self.subscriptions));
        for subscription in subscriptions {
            subscription.dispose();
        }
        lock(&self.children).clear();
    }

    pub fn is_disposed(&self) -> bool {
        lock(&self.subscriptions).is_empty()
    }

    async fn fetch_children(&self) -> Result<Vec<Arc<PrNode>>> {
        let logger = &self.services.logger;

        let Some(head) = self.pull_request.head() else {
            logger.append_line("No head found for PR, returning empty array", PR_TREE);
            return Ok(Vec::new());
        };

        let parent_number = self.pull_request.number();
        logger.append_line(
            &format!(
                "Getting downstream PRs of #{} (base:{})",
                parent_number, head.ref_name
            ),
            PR_TREE,
        );

        let query = PullRequestQuery::open().base(&head.ref_name);
        let response = self
            .services
            .repository_manager
            .get_pull_requests(
                PrType::Query,
                PagingOptions::first_page(self.page_size),
                &query,
            )
            .await?;

        let children: Vec<Arc<PrNode>> = response
            .items
            .into_iter()
            .filter(|pr| pr.number() != parent_number)
            .map(|pr| {
                Arc::new(PrNode::new(
                    self.id,
                    pr,
                    Arc::clone(&self.services.notifications),
                ))
            })
            .collect();

        *lock(&self.children) = children.clone();

        logger.append_line(
            &format!(
                "Got {} downstream PRs of #{}",
                children.len(),
                parent_number
            ),
            PR_TREE,
        );
        Ok(children)
    }
}

#[async_trait]
impl TreeNode for DownstreamPullRequestsNode {
    fn id(&self) -> NodeId {
        self.id
    }

    fn tree_item(&self) -> TreeItem {
        let item = TreeItem::new(self.label.clone(), *lock(&self.state));
        match self.pull_request.head() {
            Some(head) => item.with_tooltip(format!("Open pull requests based on {}", head.ref_name)),
            None => item,
        }
    }

    async fn children(&self) -> Vec<Arc<dyn TreeNode>> {
        *lock(&self.state) = CollapsibleState::Expanded;

        match self.fetch_children().await {
            Ok(children) => children
                .into_iter()
                .map(|child| child as Arc<dyn TreeNode>)
                .collect(),
            Err(e) => {
                self.services.logger.warn(
                    &format!("Failed to get downstream PRs: {:#}", e),
                    PR_TREE,
                );
                Vec::new()
            }
        }
    }
}

impl Drop for DownstreamPullRequestsNode {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::NotificationProvider;
    use crate::repository::Repository;
    use crate::repository_manager::RepositoryManager;
    use crate::testing::{pull_request, review_comment, MockClient, RecordingLogger};
    use crate::tree::{RefreshSender, TreeEvent};
    use gh_client::PullRequest;
    use pretty_assertions::assert_eq;
    use tokio::sync::mpsc::UnboundedReceiver;

    struct Fixture {
        client: Arc<MockClient>,
        logger: Arc<RecordingLogger>,
        rx: UnboundedReceiver<TreeEvent>,
        model: Arc<PullRequestModel>,
        node: DownstreamPullRequestsNode,
    }

    fn fixture(client: MockClient, parent: PullRequest) -> Fixture {
        let client = Arc::new(client);
        let repository = Repository::new("org", "repo");
        let logger = RecordingLogger::new();
        let (refresh, rx) = RefreshSender::channel();

        let services = NodeServices {
            repository_manager: Arc::new(RepositoryManager::new(
                client.clone(),
                repository.clone(),
            )),
            notifications: Arc::new(NotificationProvider::new(client.clone(), repository)),
            refresh,
            logger: logger.clone(),
        };

        let model = Arc::new(PullRequestModel::new(parent));
        let node = DownstreamPullRequestsNode::new(
            NodeId::next(),
            Arc::clone(&model),
            services,
            &AppConfig::default(),
        );

        Fixture {
            client,
            logger,
            rx,
            model,
            node,
        }
    }

    async fn child_numbers(node: &DownstreamPullRequestsNode) -> Vec<u64> {
        node.children()
            .await
            .iter()
            .map(|child| child.tree_item().label)
            .map(|label| {
                label
                    .trim_start_matches('#')
                    .split(':')
                    .next()
                    .unwrap()
                    .parse()
                    .unwrap()
            })
            .collect()
    }

    #[tokio::test]
    async fn test_no_head_returns_empty_without_query() {
        let mut parent = pull_request(11, "feature-x", "main");
        parent.head = None;
        let f = fixture(
            MockClient::with_pull_requests(vec![pull_request(10, "a", "feature-x")]),
            parent,
        );

        assert!(f.node.children().await.is_empty());
        assert_eq!(f.client.call_count(), 0);
        assert!(f
            .logger
            .messages()
            .contains(&"No head found for PR, returning empty array".to_string()));
    }

    #[tokio::test]
    async fn test_downstream_scenario_excludes_parent() {
        let f = fixture(
            MockClient::with_pull_requests(vec![
                pull_request(10, "child", "feature-x"),
                pull_request(11, "feature-x", "feature-x"),
                pull_request(12, "other", "main"),
            ]),
            pull_request(11, "feature-x", "main"),
        );

        assert_eq!(child_numbers(&f.node).await, vec![10]);

        let calls = f.client.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].query.to_string(),
            "is:open repo:org/repo base:feature-x"
        );
        assert_eq!(calls[0].page, 1);
        assert_eq!(calls[0].per_page, AppConfig::default().page_size);
    }

    #[tokio::test]
    async fn test_only_self_is_filtered_and_order_is_kept() {
        let f = fixture(
            MockClient::with_pull_requests(vec![
                pull_request(12, "c", "feature-x"),
                pull_request(11, "feature-x", "feature-x"),
                pull_request(10, "a", "main"),
                pull_request(13, "d", "feature-x"),
            ])
            .unfiltered(),
            pull_request(11, "feature-x", "main"),
        );

        assert_eq!(child_numbers(&f.node).await, vec![12, 10, 13]);
        let parents: Vec<NodeId> = f.node.cached_children().iter().map(|c| c.parent()).collect();
        assert_eq!(parents, vec![f.node.id(); 3]);
    }

    #[tokio::test]
    async fn test_only_first_page_is_consulted() {
        let f = fixture(
            MockClient::with_pages(vec![
                vec![pull_request(1, "a", "feature-x")],
                vec![pull_request(2, "b", "feature-x")],
            ]),
            pull_request(11, "feature-x", "main"),
        );

        assert_eq!(child_numbers(&f.node).await, vec![1]);
        assert_eq!(f.client.call_count(), 1);
    }

    #[tokio::test]
    async fn test_query_failure_yields_empty_children() {
        let f = fixture(MockClient::failing(), pull_request(11, "feature-x", "main"));

        assert!(f.node.children().await.is_empty());
        assert_eq!(f.client.call_count(), 1);
        assert!(f
            .logger
            .messages()
            .iter()
            .any(|m| m.starts_with("Failed to get downstream PRs")));
        assert_eq!(f.node.tree_item().collapsible_state, CollapsibleState::Expanded);
    }

    #[tokio::test]
    async fn test_failed_lookup_keeps_stored_children() {
        let f = fixture(
            MockClient::with_pull_requests(vec![pull_request(10, "a", "feature-x")]),
            pull_request(11, "feature-x", "main"),
        );
        let first = f.node.children().await;
        assert_eq!(first.len(), 1);

        f.client.set_failing(true);
        assert!(f.node.children().await.is_empty());
        assert_eq!(f.client.call_count(), 2);
        let stored = f.node.cached_children();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id(), first[0].id());

        f.client.set_failing(false);
        let mut headless = pull_request(11, "feature-x", "main");
        headless.head = None;
        f.model.update(headless);
        assert!(f.node.children().await.is_empty());
        assert_eq!(f.client.call_count(), 2);
        assert_eq!(f.node.cached_children()[0].id(), first[0].id());
    }

    #[tokio::test]
    async fn test_children_are_replaced_on_each_lookup() {
        let f = fixture(
            MockClient::with_pull_requests(vec![pull_request(10, "a", "feature-x")]),
            pull_request(11, "feature-x", "main"),
        );

        let first = f.node.children().await;
        let second = f.node.children().await;

        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
        assert_ne!(first[0].id(), second[0].id());
        assert_eq!(f.node.cached_children()[0].id(), second[0].id());
    }

    #[tokio::test]
    async fn test_comment_change_triggers_one_refresh() {
        let mut f = fixture(
            MockClient::with_pull_requests(vec![]),
            pull_request(11, "feature-x", "main"),
        );

        let mut updated = pull_request(11, "feature-x", "main");
        updated.comments = 2;
        f.model.update(updated);

        assert_eq!(f.rx.try_recv().unwrap(), TreeEvent::Refresh(f.node.id()));
        assert!(f.rx.try_recv().is_err());
        assert!(f
            .logger
            .messages()
            .contains(&"Comments have changed, refreshing Downstream Pull Requests node".to_string()));
    }

    #[tokio::test]
    async fn test_review_thread_change_triggers_one_refresh() {
        let mut f = fixture(
            MockClient::with_pull_requests(vec![]),
            pull_request(11, "feature-x", "main"),
        );

        f.model
            .set_review_comments(&[review_comment(1, None, "src/lib.rs")]);

        assert_eq!(f.rx.try_recv().unwrap(), TreeEvent::Refresh(f.node.id()));
        assert!(f.rx.try_recv().is_err());
        assert_eq!(f.logger.components(), vec![PR_TREE.to_string()]);
    }

    #[tokio::test]
    async fn test_dispose_releases_subscriptions() {
        let mut f = fixture(
            MockClient::with_pull_requests(vec![pull_request(10, "a", "feature-x")]),
            pull_request(11, "feature-x", "main"),
        );
        f.node.children().await;

        f.node.dispose();
        assert!(f.node.is_disposed());
        assert!(f.node.cached_children().is_empty());

        let mut updated = pull_request(11, "feature-x", "main");
        updated.comments = 5;
        f.model.update(updated);
        f.model.set_review_comments(&[review_comment(1, None, "a.rs")]);

        assert!(f.rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_drop_releases_subscriptions() {
        let Fixture {
            mut rx, model, node, ..
        } = fixture(
            MockClient::with_pull_requests(vec![]),
            pull_request(11, "feature-x", "main"),
        );
        drop(node);

        model.set_review_comments(&[review_comment(1, None, "a.rs")]);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_collapsible_state_machine() {
        let f = fixture(
            MockClient::with_pull_requests(vec![]),
            pull_request(11, "feature-x", "main"),
        );

        let item = f.node.tree_item();
        assert_eq!(item.label, "Downstream Pull Requests");
        assert_eq!(item.collapsible_state, CollapsibleState::Collapsed);
        assert_eq!(
            item.tooltip.as_deref(),
            Some("Open pull requests based on feature-x")
        );

        f.node.children().await;
        assert_eq!(f.node.tree_item().collapsible_state, CollapsibleState::Expanded);

        f.node.collapse();
        assert_eq!(f.node.tree_item().collapsible_state, CollapsibleState::Collapsed);
    }
}
