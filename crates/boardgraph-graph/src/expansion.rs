use boardgraph_core::NodeId;
use std::collections::BTreeSet;

/// Engine-side expansion bookkeeping.
///
/// - `open_companies`: companies whose board was expanded by a visual click.
/// - `visible_directors`: directors whose other directorships are expanded.
/// - `pinned`: nodes revealed in list mode. Only grows until [`reset`].
///
/// [`reset`]: ExpansionState::reset
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    open_companies: BTreeSet<NodeId>,
    visible_directors: BTreeSet<NodeId>,
    pinned: BTreeSet<NodeId>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_company_open(&self, company: &NodeId) -> bool {
        self.open_companies.contains(company)
    }

    pub fn set_company_open(&mut self, company: &NodeId, open: bool) {
        if open {
            self.open_companies.insert(company.clone());
        } else {
            self.open_companies.remove(company);
        }
    }

    pub fn open_companies(&self) -> impl Iterator<Item = &NodeId> {
        self.open_companies.iter()
    }

    pub fn is_director_open(&self, director: &NodeId) -> bool {
        self.visible_directors.contains(director)
    }

    pub fn set_director_open(&mut self, director: &NodeId, open: bool) {
        if open {
            self.visible_directors.insert(director.clone());
        } else {
            self.visible_directors.remove(director);
        }
    }

    pub fn visible_directors(&self) -> impl Iterator<Item = &NodeId> {
        self.visible_directors.iter()
    }

    pub fn is_pinned(&self, node: &NodeId) -> bool {
        self.pinned.contains(node)
    }

    pub fn pin(&mut self, node: &NodeId) {
        self.pinned.insert(node.clone());
    }

    pub fn pinned(&self) -> &BTreeSet<NodeId> {
        &self.pinned
    }

    /// Back to the start-up state. The only way pins are dropped.
    pub(crate) fn reset(&mut self) {
        self.open_companies.clear();
        self.visible_directors.clear();
        self.pinned.clear();
    }
}
