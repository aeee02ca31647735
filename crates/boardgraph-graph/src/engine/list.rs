use super::{GraphEngine, TrailUpdate};
use crate::render::RenderService;
use boardgraph_core::NodeId;

impl<R: RenderService> GraphEngine<R> {
    /// Shows and pins the node and its counterparts. Never touches edges and
    /// never hides anything.
    pub(super) fn reveal(&mut self, id: &NodeId) -> TrailUpdate {
        self.set_hidden(id, false);
        self.expansion.pin(id);

        let counterparts = self.dataset.counterparts(id).to_vec();
        for counterpart in &counterparts {
            self.set_hidden(counterpart, false);
            self.expansion.pin(counterpart);
        }
        tracing::debug!("Revealed {id} with {} counterparts", counterparts.len());

        TrailUpdate::counterparts(&self.dataset, id)
    }
}
