use boardgraph_core::{Dataset, NodeId, NodeKind, base_label};
use nucleo_matcher::pattern::{Atom, AtomKind, CaseMatching, Normalization};
use nucleo_matcher::{Config, Matcher, Utf32String};
use std::cmp::Ordering;

pub mod debounce;
pub mod suggestions;

pub use debounce::Debouncer;
pub use suggestions::{SuggestionAction, SuggestionList};

/// A node that matched a label query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMatch {
    pub node_id: NodeId,
    /// Label without the URL marker
    pub label: String,
    pub kind: NodeKind,
    /// Label equals the query, ignoring case
    pub exact: bool,
}

struct Entry {
    node_id: NodeId,
    label: String,
    kind: NodeKind,
    haystack: Utf32String,
}

pub struct SearchEngine {
    // Nucleo matcher, used for case-insensitive substring atoms only
    matcher: Matcher,
    // Entries in dataset order
    entries: Vec<Entry>,
}

impl SearchEngine {
    pub fn new(dataset: &Dataset) -> Self {
        let entries = dataset
            .nodes()
            .iter()
            .map(|node| {
                let label = base_label(&node.label).to_string();
                Entry {
                    node_id: node.id.clone(),
                    haystack: Utf32String::from(label.as_str()),
                    label,
                    kind: node.kind,
                }
            })
            .collect();

        Self {
            matcher: Matcher::new(Config::DEFAULT),
            entries,
        }
    }

    /// All nodes whose label contains `query` (case-insensitive), in dataset
    /// order. Whitespace inside the query is matched literally.
    pub fn matches(&mut self, query: &str) -> Vec<SearchMatch> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        let atom = Atom::new(
            query,
            CaseMatching::Ignore,
            Normalization::Never,
            AtomKind::Substring,
            false,
        );
        let lowered = query.to_lowercase();

        let mut found = Vec::new();
        for entry in &self.entries {
            if atom.score(entry.haystack.slice(..), &mut self.matcher).is_some() {
                found.push(SearchMatch {
                    node_id: entry.node_id.clone(),
                    label: entry.label.clone(),
                    kind: entry.kind,
                    exact: entry.label.to_lowercase() == lowered,
                });
            }
        }
        found
    }

    /// Picks the node a search submit focuses: an exact label match, else
    /// the first company, else the first match.
    pub fn select_target(&mut self, query: &str) -> Option<SearchMatch> {
        let found = self.matches(query);
        let idx = found
            .iter()
            .position(|m| m.exact)
            .or_else(|| found.iter().position(|m| m.kind == NodeKind::Company))
            .or_else(|| (!found.is_empty()).then_some(0))?;
        found.into_iter().nth(idx)
    }

    /// The first `limit` matches in dataset order, ranked exact-first, then
    /// companies before directors, then by label.
    pub fn suggestions(&mut self, query: &str, limit: usize) -> Vec<SearchMatch> {
        let mut found = self.matches(query);
        tracing::trace!("{} matches for {query:?}", found.len());
        found.truncate(limit);
        found.sort_by(rank);
        found
    }
}

fn rank(a: &SearchMatch, b: &SearchMatch) -> Ordering {
    b.exact
        .cmp(&a.exact)
        .then_with(|| kind_order(a.kind).cmp(&kind_order(b.kind)))
        .then_with(|| a.label.to_lowercase().cmp(&b.label.to_lowercase()))
        .then_with(|| a.label.cmp(&b.label))
}

fn kind_order(kind: NodeKind) -> u8 {
    match kind {
        NodeKind::Company => 0,
        NodeKind::Director => 1,
    }
}
