//! Edge bookkeeping on top of the render service.
//!
//! Invariants kept here:
//! - at most one directed edge per unordered node pair (adding A->B drops B->A),
//! - at most one edge per ordered pair (re-adding updates metadata in place),
//! - an orange edge into a company is dashed iff two or more orange edges
//!   end at that company.
//!
//! A rejected render-service call is logged and skipped. Helpers report what
//! actually happened so callers never assume a mutation went through.

use crate::render::{EdgePatch, EdgeView, RenderService};
use boardgraph_core::{EdgeColor, EdgeSpec, NodeId};
use std::collections::BTreeSet;

#[derive(Debug, Default)]
pub struct EdgeLedger {
    /// Companies whose incoming orange edges changed since the last refresh.
    touched: BTreeSet<NodeId>,
}

impl EdgeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn edges_from<R: RenderService + ?Sized>(render: &R, node: &NodeId) -> Vec<EdgeView> {
        render.edges(&|e| &e.from == node)
    }

    pub fn edges_between<R: RenderService + ?Sized>(
        render: &R,
        from: &NodeId,
        to: &NodeId,
    ) -> Vec<EdgeView> {
        render.edges(&|e| e.connects(from, to))
    }

    pub fn has_edge<R: RenderService + ?Sized>(render: &R, from: &NodeId, to: &NodeId) -> bool {
        !Self::edges_between(render, from, to).is_empty()
    }

    pub fn has_colored_edge<R: RenderService + ?Sized>(
        render: &R,
        from: &NodeId,
        to: &NodeId,
        color: EdgeColor,
    ) -> bool {
        !render
            .edges(&|e| e.connects(from, to) && e.color == color)
            .is_empty()
    }

    /// Adds `wanted`, first removing any edge running the other way between
    /// the same two nodes. An existing edge in the same direction is updated
    /// instead of duplicated. Returns whether the edge exists afterwards.
    pub fn add_directed<R: RenderService + ?Sized>(
        &mut self,
        render: &mut R,
        wanted: EdgeSpec,
    ) -> bool {
        let reverse = Self::edges_between(render, &wanted.to, &wanted.from);
        if !reverse.is_empty() && !self.remove(render, reverse) {
            // Adding now would leave arrows both ways.
            return false;
        }

        let existing = Self::edges_between(render, &wanted.from, &wanted.to);
        if let Some(edge) = existing.first() {
            if edge.color != wanted.color || edge.dashes != wanted.dashes {
                let patch = EdgePatch {
                    color: Some(wanted.color),
                    dashes: Some(wanted.dashes),
                };
                if let Err(err) = render.update_edge(edge.id, patch) {
                    tracing::warn!(
                        "Updating edge {} -> {} failed: {err}",
                        wanted.from,
                        wanted.to
                    );
                }
                self.touch(edge);
                self.touch_wanted(&wanted);
            }
            return true;
        }

        self.touch_wanted(&wanted);
        match render.add_edge(wanted.clone()) {
            Ok(_) => true,
            Err(err) => {
                tracing::warn!("Adding edge {} -> {} failed: {err}", wanted.from, wanted.to);
                false
            }
        }
    }

    /// Removes the given edges. Returns false if the render service refused.
    pub fn remove<R: RenderService + ?Sized>(
        &mut self,
        render: &mut R,
        edges: Vec<EdgeView>,
    ) -> bool {
        if edges.is_empty() {
            return true;
        }
        let ids: Vec<_> = edges.iter().map(|e| e.id).collect();
        match render.remove_edges(&ids) {
            Ok(()) => {
                for edge in &edges {
                    self.touch(edge);
                }
                true
            }
            Err(err) => {
                tracing::warn!("Removing {} edge(s) failed: {err}", ids.len());
                false
            }
        }
    }

    /// Removes every `from -> to` edge, optionally only those of one color.
    pub fn remove_between<R: RenderService + ?Sized>(
        &mut self,
        render: &mut R,
        from: &NodeId,
        to: &NodeId,
        color: Option<EdgeColor>,
    ) -> bool {
        let edges = render.edges(&|e| e.connects(from, to) && color.is_none_or(|c| e.color == c));
        self.remove(render, edges)
    }

    pub fn clear<R: RenderService + ?Sized>(&mut self, render: &mut R) {
        render.clear_edges();
        self.touched.clear();
    }

    /// Marks a company for dash recomputation.
    pub fn touch_company(&mut self, company: &NodeId) {
        self.touched.insert(company.clone());
    }

    /// Recomputes dashed status for every touched company.
    pub fn refresh_dashes<R: RenderService + ?Sized>(&mut self, render: &mut R) {
        let touched = std::mem::take(&mut self.touched);
        for company in &touched {
            Self::update_dashes(render, company);
        }
    }

    pub fn update_dashes<R: RenderService + ?Sized>(render: &mut R, company: &NodeId) {
        let oranges = render.edges(&|e| &e.to == company && e.color == EdgeColor::Orange);
        let dashed = oranges.len() >= 2;
        for edge in oranges.iter().filter(|e| e.dashes != dashed) {
            let patch = EdgePatch {
                dashes: Some(dashed),
                ..Default::default()
            };
            if let Err(err) = render.update_edge(edge.id, patch) {
                tracing::warn!("Updating dashes on edge {} failed: {err}", edge.id);
            }
        }
    }

    fn touch(&mut self, edge: &EdgeView) {
        if edge.color == EdgeColor::Orange {
            self.touched.insert(edge.to.clone());
        }
    }

    fn touch_wanted(&mut self, wanted: &EdgeSpec) {
        if wanted.color == EdgeColor::Orange {
            self.touched.insert(wanted.to.clone());
        }
    }
}
