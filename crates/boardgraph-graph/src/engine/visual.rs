use super::{GraphEngine, TrailUpdate};
use crate::breadcrumb::ConnectionKind;
use crate::ledger::EdgeLedger;
use crate::render::RenderService;
use boardgraph_core::{ConsistencyWarning, EdgeColor, EdgeSpec, NodeId, NodeKind};
use std::collections::BTreeSet;
use std::time::Instant;

impl<R: RenderService> GraphEngine<R> {
    pub(super) fn visual_click(&mut self, id: &NodeId, now: Instant) -> TrailUpdate {
        let update = self.toggle(id, now);

        // A node outside both relations that still has outgoing edges.
        if !self.dataset.has_directorships(id)
            && !self.dataset.has_board(id)
            && !EdgeLedger::edges_from(&self.render, id).is_empty()
        {
            self.collapse_subtree(id);
        }
        update
    }

    /// Visual expansion toggle for a company with a board or a director with
    /// at least one company. Single-company directors only raise a notice.
    pub(super) fn toggle(&mut self, id: &NodeId, now: Instant) -> TrailUpdate {
        if self.dataset.is_no_expand(id) {
            self.notify_no_expansion(id, now);
            return TrailUpdate::Keep;
        }

        let kind = self.render.node(id).map(|n| n.kind);
        if kind == Some(NodeKind::Company) && self.dataset.has_board(id) {
            self.toggle_company(id)
        } else if !self.dataset.companies_of(id).is_empty() {
            self.toggle_director(id)
        } else {
            TrailUpdate::Keep
        }
    }

    fn toggle_company(&mut self, company: &NodeId) -> TrailUpdate {
        let board = self.dataset.board(company).to_vec();

        if !self.expansion.is_company_open(company) {
            for member in &board {
                self.set_hidden(member, false);
                if !EdgeLedger::has_edge(&self.render, company, member) {
                    self.ledger
                        .add_directed(&mut self.render, EdgeSpec::blue(company, member));
                }
            }
            self.expansion.set_company_open(company, true);
            tracing::debug!("Opened board of {company} ({} directors)", board.len());
            return TrailUpdate::Show {
                focus: company.clone(),
                connected: board,
                kind: ConnectionKind::Directors,
            };
        }

        for member in &board {
            self.ledger
                .remove_between(&mut self.render, company, member, None);
            self.ledger.remove_between(
                &mut self.render,
                member,
                company,
                Some(EdgeColor::Orange),
            );

            let on_other_board = self
                .expansion
                .open_companies()
                .any(|other| other != company && self.dataset.board(other).contains(member));
            if on_other_board {
                continue;
            }
            if !self.expansion.is_director_open(member) && !self.expansion.is_pinned(member) {
                self.set_hidden(member, true);
            }
            self.collapse_subtree(member);
            self.expansion.set_director_open(member, false);
        }
        self.expansion.set_company_open(company, false);
        tracing::debug!("Closed board of {company}");
        TrailUpdate::Clear
    }

    fn toggle_director(&mut self, director: &NodeId) -> TrailUpdate {
        let companies = self.dataset.companies_of(director).to_vec();
        for company in &companies {
            self.ledger.touch_company(company);
        }

        let update = if self.expansion.is_director_open(director) {
            for company in &companies {
                self.ledger.remove_between(
                    &mut self.render,
                    director,
                    company,
                    Some(EdgeColor::Orange),
                );
                if self.expansion.is_company_open(company) {
                    continue;
                }
                self.collapse_subtree(company);
                // Only the company's own pin protects it here.
                let other_edges = self.render.edges(&|e| {
                    (&e.from == company && &e.to != director)
                        || (&e.to == company && &e.from != director)
                });
                if other_edges.is_empty() && !self.expansion.is_pinned(company) {
                    self.set_hidden(company, true);
                }
            }
            self.expansion.set_director_open(director, false);
            tracing::debug!("Closed directorships of {director}");
            TrailUpdate::Clear
        } else {
            // Companies already showing this director on their board are
            // left out of the trail.
            let trail: Vec<NodeId> = companies
                .iter()
                .filter(|company| {
                    !EdgeLedger::has_colored_edge(
                        &self.render,
                        company,
                        director,
                        EdgeColor::Blue,
                    )
                })
                .cloned()
                .collect();

            for company in &companies {
                self.set_hidden(company, false);
                if !EdgeLedger::has_edge(&self.render, director, company) {
                    self.ledger
                        .add_directed(&mut self.render, EdgeSpec::orange(director, company));
                }
            }
            self.expansion.set_director_open(director, true);
            tracing::debug!("Opened directorships of {director} ({} companies)", companies.len());

            if trail.is_empty() {
                TrailUpdate::Keep
            } else {
                TrailUpdate::Show {
                    focus: director.clone(),
                    connected: trail,
                    kind: ConnectionKind::Companies,
                }
            }
        };

        if companies.len() > 1 {
            self.set_hidden(director, false);
        }
        update
    }

    /// Hides and disconnects everything reachable over outgoing edges,
    /// sparing list-pinned nodes from hiding.
    pub(crate) fn collapse_subtree(&mut self, root: &NodeId) {
        let mut on_path = BTreeSet::new();
        self.collapse_from(root, &mut on_path);
    }

    fn collapse_from(&mut self, node: &NodeId, on_path: &mut BTreeSet<NodeId>) {
        on_path.insert(node.clone());
        for edge in EdgeLedger::edges_from(&self.render, node) {
            // Removed while collapsing an earlier sibling.
            if !EdgeLedger::has_edge(&self.render, &edge.from, &edge.to) {
                continue;
            }
            if self.render.node(&edge.to).is_none() {
                continue;
            }
            if !self.expansion.is_pinned(&edge.to) {
                self.set_hidden(&edge.to, true);
            }
            let target = edge.to.clone();
            if !self.ledger.remove(&mut self.render, vec![edge]) {
                continue;
            }
            if on_path.contains(&target) {
                tracing::warn!("Cycle while collapsing subtree at {target}");
                self.consistency
                    .warnings
                    .push(ConsistencyWarning::CollapseCycle(target));
                continue;
            }
            self.collapse_from(&target, on_path);
        }
        on_path.remove(node);
    }
}
