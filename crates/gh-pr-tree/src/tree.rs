//! Tree node contract
//!
//! The host view owns rendering and decides when to ask a node for its
//! children. A node only describes itself ([`TreeItem`]) and produces its
//! children on demand. Nodes that want to be re-queried send a
//! [`TreeEvent::Refresh`] through the [`RefreshSender`] they were given.

use async_trait::async_trait;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique node identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    /// Allocate a fresh identifier
    pub fn next() -> Self {
        NodeId(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node-{}", self.0)
    }
}

/// Whether and how a node can be expanded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CollapsibleState {
    /// Leaf, never has children
    #[default]
    None,
    Collapsed,
    Expanded,
}

/// Renderable description of a node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeItem {
    pub label: String,
    /// Secondary text shown after the label
    pub description: Option<String>,
    pub tooltip: Option<String>,
    pub collapsible_state: CollapsibleState,
}

impl TreeItem {
    pub fn new(label: impl Into<String>, collapsible_state: CollapsibleState) -> Self {
        Self {
            label: label.into(),
            collapsible_state,
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }
}

/// A unit of the pull request explorer tree
#[async_trait]
pub trait TreeNode: Send + Sync {
    fn id(&self) -> NodeId;

    /// Renderable identity of this node. Never fails.
    fn tree_item(&self) -> TreeItem;

    /// Produce the children of this node. Failures surface as an empty list.
    async fn children(&self) -> Vec<Arc<dyn TreeNode>>;
}

/// Messages from nodes to the host view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeEvent {
    /// The node's children are stale and should be requested again
    Refresh(NodeId),
}

/// Sender half nodes use to ask the host for a refresh
#[derive(Debug, Clone)]
pub struct RefreshSender {
    tx: UnboundedSender<TreeEvent>,
}

impl RefreshSender {
    /// Create a sender and the receiver the host drains
    pub fn channel() -> (Self, UnboundedReceiver<TreeEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Ask the host to re-query `node`
    pub fn refresh(&self, node: NodeId) {
        if let Err(e) = self.tx.send(TreeEvent::Refresh(node)) {
            log::debug!("RefreshSender: host is gone, dropping refresh: {}", e);
        }
    }
}
