use super::{GraphEngine, TrailUpdate};
use crate::render::{FocusOptions, RenderService};
use boardgraph_core::ExplorationMode;
use boardgraph_events::NavigationKey;
use boardgraph_search::SuggestionAction;
use std::time::{Duration, Instant};

impl<R: RenderService> GraphEngine<R> {
    /// Search input changed. Suggestions are computed once the quiet period
    /// passes, see [`GraphEngine::poll_suggestions`].
    pub fn input_search(&mut self, query: &str, now: Instant) {
        self.search_input = query.to_string();
        let trimmed = query.trim();
        if trimmed.is_empty() {
            self.debouncer.cancel();
            self.suggestions.clear();
        } else {
            self.debouncer.input(trimmed, now);
        }
    }

    /// Releases a debounced suggestion computation. Returns whether the
    /// suggestion list changed.
    pub fn poll_suggestions(&mut self, now: Instant) -> bool {
        let Some(query) = self.debouncer.poll(now) else {
            return false;
        };
        let items = self
            .search
            .suggestions(&query, self.settings.suggestion_limit);
        self.suggestions.set_suggestions(items);
        true
    }

    /// Time left before pending suggestions are due, if any are pending.
    pub fn suggestions_due_in(&self, now: Instant) -> Option<Duration> {
        self.debouncer.time_until_due(now)
    }

    pub fn suggestion_key(&mut self, key: NavigationKey, now: Instant) {
        match self.suggestions.handle_key(key) {
            SuggestionAction::None => {}
            SuggestionAction::Pick(picked) => self.apply_pick(picked, now),
            SuggestionAction::Submit => {
                let query = self.search_input.clone();
                self.submit_search(&query, now);
            }
        }
    }

    pub fn pick_suggestion(&mut self, index: usize, now: Instant) {
        if let Some(picked) = self.suggestions.pick(index) {
            self.apply_pick(picked, now);
        }
    }

    /// Finds the best match for `query`. List mode reveals it like a click;
    /// visual mode shows it, focuses the viewport on it and shows its
    /// counterparts without touching edges.
    pub fn submit_search(&mut self, query: &str, now: Instant) {
        let query = query.trim();
        if query.is_empty() {
            return;
        }
        self.debouncer.cancel();
        self.suggestions.hide();

        let Some(target) = self.search.select_target(query) else {
            self.notices
                .alert(format!("No nodes found matching \"{query}\""), now);
            return;
        };
        let id = target.node_id;
        tracing::debug!("Search {query:?} selected {id}");

        let update = match self.mode {
            ExplorationMode::List => self.reveal(&id),
            ExplorationMode::Visual => {
                self.set_hidden(&id, false);
                let options = FocusOptions {
                    scale: self.settings.focus_scale,
                    animation: self.settings.focus_animation(),
                };
                if let Err(err) = self.render.focus(&id, options) {
                    tracing::warn!("Failed to focus {id}: {err}");
                }
                TrailUpdate::counterparts(&self.dataset, &id)
            }
        };
        self.finish(update);
    }
}
