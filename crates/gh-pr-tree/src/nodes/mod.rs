//! Tree nodes of the pull request explorer

mod downstream;
mod pull_request;

pub use downstream::DownstreamPullRequestsNode;
pub use pull_request::{PrNode, UNREAD_MARKER};

use crate::logger::OutputLogger;
use crate::notifications::NotificationProvider;
use crate::repository_manager::RepositoryManager;
use crate::tree::RefreshSender;
use std::sync::Arc;

/// Shared collaborators handed to nodes at construction
#[derive(Clone)]
pub struct NodeServices {
    pub repository_manager: Arc<RepositoryManager>,
    pub notifications: Arc<NotificationProvider>,
    pub refresh: RefreshSender,
    pub logger: Arc<dyn OutputLogger>,
}
