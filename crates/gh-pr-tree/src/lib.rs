//! # gh-pr-tree
//!
//! Tree nodes for a pull request explorer, most notably the downstream pull
//! requests node: the open PRs whose base branch is the head branch of a
//! given PR.
//!
//! ## Design
//!
//! Nodes implement the [`TreeNode`] capability: they describe themselves as a
//! [`TreeItem`] and produce children on demand. Everything a node talks to is
//! injected through [`NodeServices`]:
//!
//! - [`RepositoryManager`] runs pull request queries against a [`gh_client::GitHubClient`]
//! - [`NotificationProvider`] knows which PRs have unread notifications
//! - [`RefreshSender`] lets a node ask the host to re-query it
//! - [`OutputLogger`] receives progress lines tagged by component
//!
//! Nodes react to [`PullRequestModel`] change streams. Subscriptions are
//! explicit [`Subscription`] handles released on dispose or drop.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let (refresh, mut refresh_rx) = RefreshSender::channel();
//! let services = NodeServices { repository_manager, notifications, refresh, logger };
//! let node = DownstreamPullRequestsNode::new(parent_id, pr, services, &config);
//!
//! let children = node.children().await;
//! while let Some(TreeEvent::Refresh(id)) = refresh_rx.recv().await {
//!     // re-render
//! }
//! ```

pub mod events;
pub mod logger;
pub mod nodes;
pub mod notifications;
pub mod pull_request;
pub mod repository;
pub mod repository_manager;
pub mod tree;
pub mod widget;

#[cfg(test)]
mod testing;

pub use events::{EventEmitter, Subscription};
pub use logger::{LogOutput, OutputLogger, PR_TREE};
pub use nodes::{DownstreamPullRequestsNode, NodeServices, PrNode};
pub use notifications::NotificationProvider;
pub use pull_request::{PullRequestModel, ReviewThread};
pub use repository::{ParsePullRequestRefError, PullRequestRef, Repository};
pub use repository_manager::{ItemsResponse, PagingOptions, PrType, RepositoryManager};
pub use tree::{CollapsibleState, NodeId, RefreshSender, TreeEvent, TreeItem, TreeNode};
pub use widget::{TreeSnapshot, TreeWidget};
