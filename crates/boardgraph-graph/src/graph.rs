use crate::render::{
    EdgePatch, EdgeView, FocusOptions, NodePatch, NodeView, RenderError, RenderService,
};
use boardgraph_core::{Dataset, EdgeId, EdgeSpec, Node, NodeId};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::ops::{Index, IndexMut};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeIndex(pub usize);

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// In-memory render service: the node data set and the edge data set,
/// without layout or drawing.
#[derive(Debug, Default)]
pub struct GraphModel {
    nodes: Vec<NodeView>,
    node_map: HashMap<NodeId, NodeIndex>,
    // Ids are handed out monotonically, so map order is insertion order.
    edges: BTreeMap<EdgeId, EdgeView>,
    next_edge_id: u64,
    focused: Option<(NodeId, FocusOptions)>,
}

impl GraphModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// One node per dataset node, all visible, no edges.
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let mut model = Self::new();
        for node in dataset.nodes() {
            model.add_node(node.clone());
        }
        model
    }

    pub fn add_node(&mut self, node: Node) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(&node.id) {
            tracing::warn!("Ignoring duplicate node {}", node.id);
            return idx;
        }
        let idx = NodeIndex(self.nodes.len());
        self.node_map.insert(node.id.clone(), idx);
        self.nodes.push(NodeView {
            id: node.id,
            kind: node.kind,
            label: node.label,
            hidden: false,
            muted: false,
        });
        idx
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node_index(&self, id: &NodeId) -> Option<NodeIndex> {
        self.node_map.get(id).copied()
    }

    /// Last viewport focus request.
    pub fn focused(&self) -> Option<&(NodeId, FocusOptions)> {
        self.focused.as_ref()
    }

    fn require_node(&self, id: &NodeId) -> Result<NodeIndex, RenderError> {
        self.node_index(id)
            .ok_or_else(|| RenderError::UnknownNode(id.clone()))
    }
}

impl Index<NodeIndex> for GraphModel {
    type Output = NodeView;
    fn index(&self, index: NodeIndex) -> &Self::Output {
        &self.nodes[index.0]
    }
}

impl IndexMut<NodeIndex> for GraphModel {
    fn index_mut(&mut self, index: NodeIndex) -> &mut Self::Output {
        &mut self.nodes[index.0]
    }
}

impl RenderService for GraphModel {
    fn node(&self, id: &NodeId) -> Option<NodeView> {
        self.node_index(id).map(|idx| self[idx].clone())
    }

    fn nodes(&self) -> Vec<NodeView> {
        self.nodes.clone()
    }

    fn update_node(&mut self, id: &NodeId, patch: NodePatch) -> Result<(), RenderError> {
        let idx = self.require_node(id)?;
        let node = &mut self[idx];
        if let Some(hidden) = patch.hidden {
            node.hidden = hidden;
        }
        if let Some(label) = patch.label {
            node.label = label;
        }
        if let Some(muted) = patch.muted {
            node.muted = muted;
        }
        Ok(())
    }

    fn edges(&self, filter: &dyn Fn(&EdgeView) -> bool) -> Vec<EdgeView> {
        self.edges.values().filter(|e| filter(e)).cloned().collect()
    }

    fn edge_count(&self) -> usize {
        self.edges.len()
    }

    fn add_edge(&mut self, edge: EdgeSpec) -> Result<EdgeId, RenderError> {
        self.require_node(&edge.from)?;
        self.require_node(&edge.to)?;
        self.next_edge_id += 1;
        let id = EdgeId(self.next_edge_id);
        self.edges.insert(
            id,
            EdgeView {
                id,
                from: edge.from,
                to: edge.to,
                color: edge.color,
                dashes: edge.dashes,
            },
        );
        Ok(id)
    }

    fn update_edge(&mut self, id: EdgeId, patch: EdgePatch) -> Result<(), RenderError> {
        let edge = self.edges.get_mut(&id).ok_or(RenderError::UnknownEdge(id))?;
        if let Some(color) = patch.color {
            edge.color = color;
        }
        if let Some(dashes) = patch.dashes {
            edge.dashes = dashes;
        }
        Ok(())
    }

    fn remove_edges(&mut self, ids: &[EdgeId]) -> Result<(), RenderError> {
        // All-or-nothing, like a data set removal.
        if let Some(missing) = ids.iter().find(|id| !self.edges.contains_key(*id)) {
            return Err(RenderError::UnknownEdge(*missing));
        }
        for id in ids {
            self.edges.remove(id);
        }
        Ok(())
    }

    fn clear_edges(&mut self) {
        self.edges.clear();
    }

    fn focus(&mut self, id: &NodeId, options: FocusOptions) -> Result<(), RenderError> {
        self.require_node(id)?;
        self.focused = Some((id.clone(), options));
        Ok(())
    }
}
