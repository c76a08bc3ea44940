//! Node for a single pull request

use crate::notifications::NotificationProvider;
use crate::pull_request::PullRequestModel;
use crate::tree::{CollapsibleState, NodeId, TreeItem, TreeNode};
use async_trait::async_trait;
use std::sync::Arc;

/// Marker appended to the description of PRs with unread notifications
pub const UNREAD_MARKER: &str = "●";

pub struct PrNode {
    id: NodeId,
    parent: NodeId,
    pull_request: Arc<PullRequestModel>,
    notifications: Arc<NotificationProvider>,
}

impl PrNode {
    pub fn new(
        parent: NodeId,
        pull_request: Arc<PullRequestModel>,
        notifications: Arc<NotificationProvider>,
    ) -> Self {
        Self {
            id: NodeId::next(),
            parent,
            pull_request,
            notifications,
        }
    }

    pub fn parent(&self) -> NodeId {
        self.parent
    }

    pub fn pull_request(&self) -> &Arc<PullRequestModel> {
        &self.pull_request
    }
}

#[async_trait]
impl TreeNode for PrNode {
    fn id(&self) -> NodeId {
        self.id
    }

    fn tree_item(&self) -> TreeItem {
        let pr = &self.pull_request;
        let mut description = format!("by {}", pr.author());
        if pr.is_draft() {
            description.push_str(" [draft]");
        }
        if self.notifications.has_notification(pr.number()) {
            description.push(' ');
            description.push_str(UNREAD_MARKER);
        }

        TreeItem::new(
            format!("#{}: {}", pr.number(), pr.title()),
            CollapsibleState::None,
        )
        .with_description(description)
        .with_tooltip(pr.html_url())
    }

    async fn children(&self) -> Vec<Arc<dyn TreeNode>> {
        Vec::new()
    }
}
