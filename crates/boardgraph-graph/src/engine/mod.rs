//! The graph expansion engine.
//!
//! Owns the expansion state, the edge ledger and the breadcrumb, and is the
//! only writer to the render service. Every interaction runs as one linear
//! pipeline: mutate nodes and edges, refresh dashes for touched companies,
//! apply the breadcrumb update, recompute stats.

mod list;
mod search;
mod visual;

#[cfg(test)]
mod tests;

use crate::breadcrumb::{Breadcrumb, ConnectionKind};
use crate::expansion::ExpansionState;
use crate::graph::GraphModel;
use crate::ledger::EdgeLedger;
use crate::notice::{Notice, NoticeBoard};
use crate::render::{NodePatch, NodeView, RenderError, RenderService};
use boardgraph_core::{
    ConsistencyReport, Dataset, EngineSettings, ExplorationMode, NodeId, NodeKind, URL_MARKER,
    base_label,
};
use boardgraph_events::{Event, EventListener};
use boardgraph_search::{Debouncer, SearchEngine, SearchMatch, SuggestionList};
use std::collections::HashSet;
use std::fmt;
use std::time::Instant;

/// Visible counts shown in the stats pill.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub visible_nodes: usize,
    pub visible_edges: usize,
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} nodes \u{2022} {} edges visible",
            self.visible_nodes, self.visible_edges
        )
    }
}

/// Hover card for a company node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tooltip {
    pub label: String,
    pub url: Option<String>,
}

impl fmt::Display for Tooltip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.url {
            Some(url) => write!(f, "{}: {url}", self.label),
            None => write!(f, "{}: No website available", self.label),
        }
    }
}

/// What an interaction wants done with the breadcrumb once edges settle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TrailUpdate {
    Keep,
    Clear,
    Show {
        focus: NodeId,
        connected: Vec<NodeId>,
        kind: ConnectionKind,
    },
}

impl TrailUpdate {
    /// Trail for a node over its counterparts. A node without any carries
    /// no connection kind, and the trail is cleared.
    fn counterparts(dataset: &Dataset, focus: &NodeId) -> Self {
        let connected = dataset.counterparts(focus).to_vec();
        let kind = if connected.is_empty() {
            ConnectionKind::None
        } else {
            ConnectionKind::for_focus(dataset.kind(focus))
        };
        Self::Show {
            focus: focus.clone(),
            connected,
            kind,
        }
    }
}

pub struct GraphEngine<R: RenderService> {
    dataset: Dataset,
    render: R,
    settings: EngineSettings,
    mode: ExplorationMode,
    expansion: ExpansionState,
    ledger: EdgeLedger,
    breadcrumb: Option<Breadcrumb>,
    notices: NoticeBoard,
    consistency: ConsistencyReport,
    search: SearchEngine,
    search_input: String,
    suggestions: SuggestionList,
    debouncer: Debouncer,
    tooltip: Option<Tooltip>,
    stats: Stats,
}

impl GraphEngine<GraphModel> {
    /// Engine over the in-memory render model.
    pub fn in_memory(dataset: Dataset, settings: EngineSettings) -> Result<Self, RenderError> {
        let model = GraphModel::from_dataset(&dataset);
        Self::new(dataset, model, settings)
    }
}

impl<R: RenderService> GraphEngine<R> {
    /// Builds the engine on top of a render service that already holds one
    /// node per dataset node. Fails only if the service is unavailable.
    pub fn new(dataset: Dataset, render: R, settings: EngineSettings) -> Result<Self, RenderError> {
        render.ensure_available()?;

        let consistency = ConsistencyReport::check(&dataset);
        let search = SearchEngine::new(&dataset);
        let mut engine = Self {
            notices: NoticeBoard::new(settings.notice_duration()),
            debouncer: Debouncer::new(settings.suggestion_debounce()),
            mode: settings.initial_mode,
            dataset,
            render,
            settings,
            expansion: ExpansionState::new(),
            ledger: EdgeLedger::new(),
            breadcrumb: None,
            consistency,
            search,
            search_input: String::new(),
            suggestions: SuggestionList::new(),
            tooltip: None,
            stats: Stats::default(),
        };

        for seed in &engine.settings.seed_companies {
            if !engine.dataset.contains(seed) {
                tracing::warn!("Seed company {seed} is not in the dataset");
            }
        }

        engine.decorate_nodes();
        if !engine.consistency.is_clean() {
            let lines = engine
                .consistency
                .display_lines(engine.settings.warning_display_limit);
            engine.notices.warning(lines.join("\n"), Instant::now());
        }
        engine.reset();
        tracing::info!(
            "Graph engine ready: {} nodes, mode {}",
            engine.dataset.nodes().len(),
            engine.mode
        );
        Ok(engine)
    }

    /// Exactly one URL marker on companies with a website and none on the
    /// rest, muted styling on directors that cannot expand.
    fn decorate_nodes(&mut self) {
        let companies: Vec<NodeView> = self
            .render
            .nodes()
            .into_iter()
            .filter(|n| n.kind == NodeKind::Company)
            .collect();
        for node in companies {
            let id = node.id;
            let base = base_label(&node.label);
            let label = match self.dataset.url(&id) {
                Some(_) => format!("{base}{URL_MARKER}"),
                None => base.to_string(),
            };
            if label != node.label {
                let patch = NodePatch {
                    label: Some(label),
                    ..Default::default()
                };
                if let Err(err) = self.render.update_node(&id, patch) {
                    tracing::warn!("Failed to update label of {id}: {err}");
                }
            }
        }

        let inert: Vec<NodeId> = self
            .dataset
            .director_entries()
            .filter(|(id, _)| self.dataset.is_no_expand(id))
            .map(|(id, _)| id.clone())
            .collect();
        for id in inert {
            if self.render.node(&id).is_none() {
                continue;
            }
            let patch = NodePatch {
                muted: Some(true),
                ..Default::default()
            };
            if let Err(err) = self.render.update_node(&id, patch) {
                tracing::warn!("Failed to mute {id}: {err}");
            }
        }
    }

    // Accessors

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn render(&self) -> &R {
        &self.render
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn mode(&self) -> ExplorationMode {
        self.mode
    }

    pub fn expansion(&self) -> &ExpansionState {
        &self.expansion
    }

    pub fn breadcrumb(&self) -> Option<&Breadcrumb> {
        self.breadcrumb.as_ref()
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn notice(&self, now: Instant) -> Option<&Notice> {
        self.notices.current_at(now)
    }

    pub fn dismiss_notice(&mut self) {
        self.notices.dismiss();
    }

    /// Load-time warnings plus any found while collapsing.
    pub fn consistency(&self) -> &ConsistencyReport {
        &self.consistency
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    pub fn suggestions(&self) -> &SuggestionList {
        &self.suggestions
    }

    // Interactions

    pub fn set_mode(&mut self, mode: ExplorationMode, now: Instant) {
        self.mode = mode;
        self.notices.status(format!("Explore mode: {mode}"), now);
    }

    pub fn click(&mut self, id: &NodeId, now: Instant) {
        if self.render.node(id).is_none() {
            tracing::debug!("Ignoring click on unknown node {id}");
            return;
        }
        let update = match self.mode {
            ExplorationMode::List => self.reveal(id),
            ExplorationMode::Visual => self.visual_click(id, now),
        };
        self.finish(update);
    }

    /// Re-dispatches a breadcrumb entry through the current mode. Muted
    /// entries only raise a notice.
    pub fn breadcrumb_click(&mut self, id: &NodeId, now: Instant) {
        let muted = self
            .breadcrumb
            .as_ref()
            .and_then(|b| b.entry(id))
            .is_some_and(|e| e.muted);
        if muted {
            self.notify_no_expansion(id, now);
            return;
        }
        if self.render.node(id).is_none() {
            return;
        }
        let update = match self.mode {
            ExplorationMode::List => self.reveal(id),
            ExplorationMode::Visual => self.toggle(id, now),
        };
        self.finish(update);
    }

    pub fn clear_breadcrumb(&mut self) {
        self.breadcrumb = None;
    }

    pub fn hover_start(&mut self, id: &NodeId) {
        self.tooltip = self
            .render
            .node(id)
            .filter(|n| n.kind == NodeKind::Company)
            .map(|n| Tooltip {
                label: base_label(&n.label).to_string(),
                url: self.dataset.url(id).map(str::to_string),
            });
    }

    pub fn hover_end(&mut self) {
        self.tooltip = None;
    }

    /// Seed companies only, no edges, nothing open or pinned.
    pub fn reset(&mut self) {
        let seeds: HashSet<NodeId> = self.settings.seed_companies.iter().cloned().collect();
        for node in self.render.nodes() {
            let hidden = !seeds.contains(&node.id);
            if node.hidden != hidden {
                self.set_hidden(&node.id, hidden);
            }
        }
        self.ledger.clear(&mut self.render);
        self.expansion.reset();
        self.breadcrumb = None;
        self.search_input.clear();
        self.suggestions.clear();
        self.debouncer.cancel();
        self.tooltip = None;
        self.refresh_stats();
        tracing::debug!("Reset to {} seed companies", seeds.len());
    }

    // Pipeline

    fn finish(&mut self, update: TrailUpdate) {
        self.ledger.refresh_dashes(&mut self.render);
        match update {
            TrailUpdate::Keep => {}
            TrailUpdate::Clear => self.breadcrumb = None,
            TrailUpdate::Show {
                focus,
                connected,
                kind,
            } => {
                self.breadcrumb =
                    Breadcrumb::build(&self.dataset, &self.render, &focus, &connected, kind);
            }
        }
        self.refresh_stats();
    }

    fn refresh_stats(&mut self) {
        self.stats = Stats {
            visible_nodes: self.render.visible_node_count(),
            visible_edges: self.render.edge_count(),
        };
    }

    fn set_hidden(&mut self, id: &NodeId, hidden: bool) {
        if let Err(err) = self.render.update_node(id, NodePatch::hidden(hidden)) {
            tracing::warn!("Failed to set hidden={hidden} on {id}: {err}");
        }
    }

    fn notify_no_expansion(&mut self, id: &NodeId, now: Instant) {
        let label = self
            .render
            .node(id)
            .map(|n| base_label(&n.label).to_string())
            .unwrap_or_else(|| id.to_string());
        self.notices
            .info(format!("No further expansion for \"{label}\""), now);
    }

    fn apply_pick(&mut self, picked: SearchMatch, now: Instant) {
        self.search_input = picked.label.clone();
        self.debouncer.cancel();
        self.submit_search(&picked.label, now);
    }
}

impl<R: RenderService> EventListener for GraphEngine<R> {
    fn handle_event(&mut self, event: &Event) {
        let now = Instant::now();
        match event {
            Event::NodeClick { id } => self.click(id, now),
            Event::HoverStart { id } => self.hover_start(id),
            Event::HoverEnd => self.hover_end(),
            Event::BreadcrumbClick { id } => self.breadcrumb_click(id, now),
            Event::ClearBreadcrumb => self.clear_breadcrumb(),
            Event::SearchInput { query } => self.input_search(query, now),
            Event::SearchSubmit { query } => self.submit_search(query, now),
            Event::SuggestionKey(key) => self.suggestion_key(*key, now),
            Event::SuggestionPick { index } => self.pick_suggestion(*index, now),
            Event::ModeChange(mode) => self.set_mode(*mode, now),
            Event::ResetRequested => self.reset(),
        }
    }
}
