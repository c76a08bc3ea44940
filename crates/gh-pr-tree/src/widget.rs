//! Tree rendering
//!
//! [`TreeSnapshot`] materialises a node and its descendants; [`TreeWidget`]
//! draws a snapshot with indentation and expand markers.

use crate::tree::{CollapsibleState, TreeItem, TreeNode};
use ratatui::prelude::*;
use ratatui::widgets::{Paragraph, Widget};
use std::future::Future;
use std::pin::Pin;

/// A node's item together with the snapshots of its children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeSnapshot {
    pub item: TreeItem,
    pub children: Vec<TreeSnapshot>,
}

impl TreeSnapshot {
    /// Snapshot of a node with no children materialised
    pub fn leaf(item: TreeItem) -> Self {
        Self {
            item,
            children: Vec::new(),
        }
    }

    /// Expand every expandable node below `node` and record the result
    pub fn capture<'a>(node: &'a dyn TreeNode) -> Pin<Box<dyn Future<Output = Self> + Send + 'a>> {
        Box::pin(async move {
            if node.tree_item().collapsible_state == CollapsibleState::None {
                return Self::leaf(node.tree_item());
            }

            let mut children = Vec::new();
            for child in node.children().await {
                children.push(Self::capture(child.as_ref()).await);
            }

            // The item is read after expansion so it reflects the new state
            Self {
                item: node.tree_item(),
                children,
            }
        })
    }

    /// Flatten into (depth, item) rows, depth-first
    pub fn rows(&self) -> Vec<(usize, &TreeItem)> {
        let mut rows = Vec::new();
        self.collect_rows(0, &mut rows);
        rows
    }

    fn collect_rows<'a>(&'a self, depth: usize, rows: &mut Vec<(usize, &'a TreeItem)>) {
        rows.push((depth, &self.item));
        if self.item.collapsible_state == CollapsibleState::Expanded {
            for child in &self.children {
                child.collect_rows(depth + 1, rows);
            }
        }
    }

    /// Number of rendered lines
    pub fn height(&self) -> usize {
        self.rows().len()
    }

    /// Rendered lines without styling, for output that is not a terminal
    pub fn plain_lines(&self) -> Vec<String> {
        self.rows()
            .into_iter()
            .map(|(depth, item)| {
                let mut line = format!(
                    "{}{}{}",
                    "  ".repeat(depth),
                    marker(item.collapsible_state),
                    item.label
                );
                if let Some(description) = &item.description {
                    line.push(' ');
                    line.push_str(description);
                }
                line
            })
            .collect()
    }
}

fn marker(state: CollapsibleState) -> &'static str {
    match state {
        CollapsibleState::None => "  ",
        CollapsibleState::Collapsed => "▸ ",
        CollapsibleState::Expanded => "▾ ",
    }
}

/// Widget for rendering a tree snapshot
pub struct TreeWidget<'a> {
    snapshot: &'a TreeSnapshot,
}

impl<'a> TreeWidget<'a> {
    pub fn new(snapshot: &'a TreeSnapshot) -> Self {
        Self { snapshot }
    }

    fn lines(&self) -> Vec<Line<'a>> {
        self.snapshot
            .rows()
            .into_iter()
            .map(|(depth, item)| {
                let mut spans = vec![
                    Span::raw("  ".repeat(depth)),
                    Span::styled(marker(item.collapsible_state), Style::default().fg(Color::DarkGray)),
                    Span::styled(item.label.as_str(), Style::default().add_modifier(Modifier::BOLD)),
                ];
                if let Some(description) = &item.description {
                    spans.push(Span::raw(" "));
                    spans.push(Span::styled(
                        description.as_str(),
                        Style::default().fg(Color::Gray),
                    ));
                }
                Line::from(spans)
            })
            .collect()
    }
}

impl Widget for TreeWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.lines()).render(area, buf);
    }
}
