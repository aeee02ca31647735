//! The seam to the rendering service.
//!
//! The engine treats the service as the single source of truth for node
//! visibility and for which edges currently exist. It never caches either.

use boardgraph_core::{EdgeColor, EdgeId, EdgeSpec, NodeId, NodeKind};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("Unknown node: {0}")]
    UnknownNode(NodeId),
    #[error("Unknown edge: {0}")]
    UnknownEdge(EdgeId),
    #[error("Render service rejected the operation: {0}")]
    Rejected(String),
    #[error("Render service unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeView {
    pub id: NodeId,
    pub kind: NodeKind,
    pub label: String,
    pub hidden: bool,
    /// Greyed out and inert to expansion clicks
    pub muted: bool,
}

/// Partial node update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodePatch {
    pub hidden: Option<bool>,
    pub label: Option<String>,
    pub muted: Option<bool>,
}

impl NodePatch {
    pub fn hidden(hidden: bool) -> Self {
        Self {
            hidden: Some(hidden),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeView {
    pub id: EdgeId,
    pub from: NodeId,
    pub to: NodeId,
    pub color: EdgeColor,
    pub dashes: bool,
}

impl EdgeView {
    pub fn connects(&self, from: &NodeId, to: &NodeId) -> bool {
        &self.from == from && &self.to == to
    }
}

/// Partial edge update; `None` fields are left untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgePatch {
    pub color: Option<EdgeColor>,
    pub dashes: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FocusOptions {
    pub scale: f32,
    pub animation: Duration,
}

impl Default for FocusOptions {
    fn default() -> Self {
        Self {
            scale: 1.5,
            animation: Duration::from_millis(1000),
        }
    }
}

/// Node and edge CRUD plus viewport focus.
pub trait RenderService {
    /// Called once before the engine is built. An error here is a fatal
    /// start-up failure.
    fn ensure_available(&self) -> Result<(), RenderError> {
        Ok(())
    }

    fn node(&self, id: &NodeId) -> Option<NodeView>;

    /// All nodes in insertion order.
    fn nodes(&self) -> Vec<NodeView>;

    fn update_node(&mut self, id: &NodeId, patch: NodePatch) -> Result<(), RenderError>;

    /// Edges accepted by `filter`, oldest first.
    fn edges(&self, filter: &dyn Fn(&EdgeView) -> bool) -> Vec<EdgeView>;

    fn edge_count(&self) -> usize;

    fn add_edge(&mut self, edge: EdgeSpec) -> Result<EdgeId, RenderError>;

    fn update_edge(&mut self, id: EdgeId, patch: EdgePatch) -> Result<(), RenderError>;

    fn remove_edges(&mut self, ids: &[EdgeId]) -> Result<(), RenderError>;

    fn clear_edges(&mut self);

    fn focus(&mut self, id: &NodeId, options: FocusOptions) -> Result<(), RenderError>;

    fn is_hidden(&self, id: &NodeId) -> bool {
        self.node(id).is_none_or(|n| n.hidden)
    }

    fn visible_node_count(&self) -> usize {
        self.nodes().iter().filter(|n| !n.hidden).count()
    }
}
