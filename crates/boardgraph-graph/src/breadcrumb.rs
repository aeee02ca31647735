//! Breadcrumb trail derived from the last interaction.

use crate::render::RenderService;
use boardgraph_core::{Dataset, NodeId, NodeKind, base_label};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Title shown on entries that cannot be expanded further.
pub const NO_EXPANSION_TITLE: &str = "No further expansion available";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionKind {
    Companies,
    Directors,
    None,
}

impl ConnectionKind {
    /// What the counterparts of a node are: a director's are companies,
    /// anything else lists directors.
    pub fn for_focus(kind: Option<NodeKind>) -> Self {
        match kind {
            Some(NodeKind::Director) => Self::Companies,
            _ => Self::Directors,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreadcrumbEntry {
    pub node_id: NodeId,
    pub label: String,
    pub clickable: bool,
    pub muted: bool,
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breadcrumb {
    pub focus: BreadcrumbEntry,
    /// Website of the focus company, if any
    pub website: Option<String>,
    pub kind: ConnectionKind,
    pub entries: Vec<BreadcrumbEntry>,
}

impl Breadcrumb {
    /// Projects a trail for `focus` over `connected`. An empty `connected`
    /// yields no trail.
    pub fn build<R: RenderService + ?Sized>(
        dataset: &Dataset,
        render: &R,
        focus: &NodeId,
        connected: &[NodeId],
        kind: ConnectionKind,
    ) -> Option<Self> {
        if connected.is_empty() {
            return None;
        }

        let focus_entry = BreadcrumbEntry {
            node_id: focus.clone(),
            label: display_label(dataset, render, focus),
            clickable: true,
            muted: false,
            title: None,
        };

        let entries = connected
            .iter()
            .map(|id| {
                let muted = dataset.is_no_expand(id);
                BreadcrumbEntry {
                    node_id: id.clone(),
                    label: display_label(dataset, render, id),
                    clickable: !muted,
                    muted,
                    title: muted.then(|| NO_EXPANSION_TITLE.to_string()),
                }
            })
            .collect();

        Some(Self {
            focus: focus_entry,
            website: dataset.url(focus).map(str::to_string),
            kind,
            entries,
        })
    }

    pub fn entry(&self, id: &NodeId) -> Option<&BreadcrumbEntry> {
        if &self.focus.node_id == id {
            return Some(&self.focus);
        }
        self.entries.iter().find(|e| &e.node_id == id)
    }
}

impl fmt::Display for Breadcrumb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.focus.label)?;
        if let Some(website) = &self.website {
            write!(f, " [{website}]")?;
        }
        write!(f, " \u{2192} ")?;
        for (idx, entry) in self.entries.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", entry.label)?;
        }
        Ok(())
    }
}

fn display_label<R: RenderService + ?Sized>(dataset: &Dataset, render: &R, id: &NodeId) -> String {
    render
        .node(id)
        .map(|n| base_label(&n.label).to_string())
        .or_else(|| dataset.node(id).map(|n| base_label(&n.label).to_string()))
        .unwrap_or_else(|| id.to_string())
}
