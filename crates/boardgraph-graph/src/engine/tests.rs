use super::*;
use crate::notice::NoticeLevel;
use crate::render::{EdgePatch, EdgeView, FocusOptions, NodeView};
use boardgraph_core::{
    ConsistencyWarning, DatasetFile, DirectorEntry, EdgeColor, EdgeId, EdgeSpec, Node,
};
use boardgraph_events::{EventBus, NavigationKey};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

fn id(s: &str) -> NodeId {
    NodeId::from(s)
}

fn entry(director: &str, companies: &[&str]) -> DirectorEntry {
    DirectorEntry {
        director: id(director),
        companies: companies.iter().map(|c| id(c)).collect(),
    }
}

// Boards: Singtel [A, B], UOL [A, E, F], Seatrium [B, G], Keppel [F, G].
// E sits on one board only.
fn dataset() -> Dataset {
    Dataset::new(DatasetFile {
        nodes: vec![
            Node::company("Singtel Optus", "Singtel Optus"),
            Node::company("Singtel", "Singtel"),
            Node::company("UOL", "UOL"),
            Node::company("Seatrium", "Seatrium"),
            Node::company("Keppel", "Keppel"),
            Node::director("A", "Alice"),
            Node::director("B", "Bob"),
            Node::director("E", "Eve"),
            Node::director("F", "Frank"),
            Node::director("G", "Grace"),
        ],
        director_companies: vec![
            entry("A", &["Singtel", "UOL"]),
            entry("B", &["Singtel", "Seatrium"]),
            entry("E", &["UOL"]),
            entry("F", &["UOL", "Keppel"]),
            entry("G", &["Keppel", "Seatrium"]),
        ],
        company_urls: BTreeMap::from([(
            "Singtel".to_string(),
            "https://www.singtel.com".to_string(),
        )]),
    })
}

fn engine() -> GraphEngine<GraphModel> {
    GraphEngine::in_memory(dataset(), EngineSettings::default()).unwrap()
}

fn visible(engine: &GraphEngine<GraphModel>) -> BTreeSet<String> {
    engine
        .render()
        .nodes()
        .into_iter()
        .filter(|n| !n.hidden)
        .map(|n| n.id.to_string())
        .collect()
}

fn edge_set(engine: &GraphEngine<GraphModel>) -> BTreeSet<(String, String, EdgeColor, bool)> {
    engine
        .render()
        .edges(&|_| true)
        .into_iter()
        .map(|e| (e.from.to_string(), e.to.to_string(), e.color, e.dashes))
        .collect()
}

fn names(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn has(engine: &GraphEngine<GraphModel>, from: &str, to: &str, color: EdgeColor) -> bool {
    EdgeLedger::has_colored_edge(engine.render(), &id(from), &id(to), color)
}

#[test]
fn test_seed_state() {
    let engine = engine();
    assert_eq!(visible(&engine), names(&["Singtel", "UOL", "Seatrium"]));
    assert_eq!(engine.render().edge_count(), 0);
    assert_eq!(engine.stats().to_string(), "3 nodes \u{2022} 0 edges visible");
    assert!(engine.breadcrumb().is_none());
    assert_eq!(engine.mode(), ExplorationMode::Visual);
}

#[test]
fn test_start_up_decorations() {
    let engine = engine();
    let singtel = engine.render().node(&id("Singtel")).unwrap();
    assert_eq!(singtel.label, "Singtel \u{1F517}");
    assert!(engine.render().node(&id("E")).unwrap().muted);
    assert!(!engine.render().node(&id("A")).unwrap().muted);

    // A second pass never stacks markers.
    let mut again = engine;
    again.decorate_nodes();
    assert_eq!(
        again.render().node(&id("Singtel")).unwrap().label,
        "Singtel \u{1F517}"
    );
}

#[test]
fn test_stale_url_marker_is_removed() {
    let data = Dataset::new(DatasetFile {
        nodes: vec![Node::company("UOL", "UOL \u{1F517}")],
        ..Default::default()
    });
    let engine = GraphEngine::in_memory(data, EngineSettings::default()).unwrap();
    assert_eq!(engine.render().node(&id("UOL")).unwrap().label, "UOL");
}

#[test]
fn test_company_toggle_open_and_close() {
    let mut engine = engine();
    let now = Instant::now();

    engine.click(&id("Singtel"), now);
    assert_eq!(
        visible(&engine),
        names(&["Singtel", "UOL", "Seatrium", "A", "B"])
    );
    assert!(has(&engine, "Singtel", "A", EdgeColor::Blue));
    assert!(has(&engine, "Singtel", "B", EdgeColor::Blue));
    assert_eq!(
        engine.breadcrumb().unwrap().to_string(),
        "Singtel [https://www.singtel.com] \u{2192} Alice, Bob"
    );
    assert!(engine.expansion().is_company_open(&id("Singtel")));

    engine.click(&id("Singtel"), now);
    assert_eq!(visible(&engine), names(&["Singtel", "UOL", "Seatrium"]));
    assert_eq!(engine.render().edge_count(), 0);
    assert!(engine.breadcrumb().is_none());
    assert!(!engine.expansion().is_company_open(&id("Singtel")));
}

#[test]
fn test_toggle_twice_restores_state() {
    let mut engine = engine();
    let now = Instant::now();
    engine.click(&id("UOL"), now);
    engine.click(&id("A"), now);
    let nodes_before = visible(&engine);
    let edges_before = edge_set(&engine);

    engine.click(&id("Seatrium"), now);
    engine.click(&id("Seatrium"), now);

    assert_eq!(visible(&engine), nodes_before);
    assert_eq!(edge_set(&engine), edges_before);
    assert!(engine.breadcrumb().is_none());
}

#[test]
fn test_director_trail_skips_companies_already_showing_it() {
    let mut engine = engine();
    let now = Instant::now();
    engine.click(&id("Singtel"), now);
    engine.click(&id("A"), now);

    assert!(has(&engine, "A", "Singtel", EdgeColor::Orange));
    assert!(has(&engine, "A", "UOL", EdgeColor::Orange));
    // The orange edge replaced the blue one.
    assert!(!EdgeLedger::has_edge(engine.render(), &id("Singtel"), &id("A")));

    let crumb = engine.breadcrumb().unwrap();
    assert_eq!(crumb.kind, ConnectionKind::Companies);
    assert_eq!(crumb.to_string(), "Alice \u{2192} UOL");
    assert!(engine.expansion().is_director_open(&id("A")));
}

#[test]
fn test_director_toggle_off_hides_unreferenced_companies() {
    let mut engine = engine();
    let now = Instant::now();
    engine.click(&id("F"), now);
    assert!(visible(&engine).contains("Keppel"));
    assert!(visible(&engine).contains("F"));

    engine.click(&id("F"), now);
    assert!(!visible(&engine).contains("Keppel"));
    // Seed company with no remaining edges is hidden too.
    assert!(!visible(&engine).contains("UOL"));
    assert!(visible(&engine).contains("F"));
    assert_eq!(engine.render().edge_count(), 0);
    assert!(engine.breadcrumb().is_none());
}

#[test]
fn test_director_toggle_off_keeps_open_companies() {
    let mut engine = engine();
    let now = Instant::now();
    engine.click(&id("Keppel"), now);
    engine.click(&id("G"), now);
    engine.click(&id("G"), now);

    // Keppel is open, so it is neither collapsed nor hidden.
    assert!(visible(&engine).contains("Keppel"));
    assert!(has(&engine, "Keppel", "F", EdgeColor::Blue));
    assert!(!EdgeLedger::has_edge(engine.render(), &id("G"), &id("Keppel")));
}

#[test]
fn test_orange_edges_dash_with_two_directors() {
    let mut engine = engine();
    let now = Instant::now();
    engine.click(&id("A"), now);
    assert!(
        engine
            .render()
            .edges(&|e| e.to == id("UOL"))
            .iter()
            .all(|e| !e.dashes)
    );

    engine.click(&id("F"), now);
    let into_uol = engine.render().edges(&|e| e.to == id("UOL"));
    assert_eq!(into_uol.len(), 2);
    assert!(into_uol.iter().all(|e| e.dashes));
    assert!(!EdgeLedger::edges_between(engine.render(), &id("F"), &id("Keppel"))[0].dashes);

    engine.click(&id("F"), now);
    let into_uol = engine.render().edges(&|e| e.to == id("UOL"));
    assert_eq!(into_uol.len(), 1);
    assert!(!into_uol[0].dashes);
}

#[test]
fn test_no_expand_click_is_inert() {
    let mut engine = engine();
    let now = Instant::now();
    engine.click(&id("UOL"), now);
    let nodes_before = visible(&engine);
    let edges_before = edge_set(&engine);
    let crumb_before = engine.breadcrumb().cloned();

    engine.click(&id("E"), now);
    assert_eq!(visible(&engine), nodes_before);
    assert_eq!(edge_set(&engine), edges_before);
    assert_eq!(engine.breadcrumb().cloned(), crumb_before);
    assert!(!engine.expansion().is_director_open(&id("E")));

    let notice = engine.notice(now).unwrap();
    assert_eq!(notice.level, NoticeLevel::Info);
    assert_eq!(notice.message, "No further expansion for \"Eve\"");
    assert!(engine.notice(now + Duration::from_millis(2500)).is_none());
}

#[test]
fn test_muted_breadcrumb_entry_only_notifies() {
    let mut engine = engine();
    let now = Instant::now();
    engine.click(&id("UOL"), now);
    let crumb = engine.breadcrumb().unwrap().clone();
    assert!(crumb.entry(&id("E")).unwrap().muted);
    let edges_before = edge_set(&engine);

    engine.breadcrumb_click(&id("E"), now);
    assert_eq!(edge_set(&engine), edges_before);
    assert_eq!(engine.breadcrumb(), Some(&crumb));
    assert_eq!(
        engine.notice(now).unwrap().message,
        "No further expansion for \"Eve\""
    );
}

#[test]
fn test_list_mode_reveals_without_edges_until_reset() {
    let mut engine = engine();
    let now = Instant::now();
    engine.set_mode(ExplorationMode::List, now);
    assert_eq!(engine.notice(now).unwrap().message, "Explore mode: list");

    engine.click(&id("Keppel"), now);
    assert_eq!(
        visible(&engine),
        names(&["Singtel", "UOL", "Seatrium", "Keppel", "F", "G"])
    );
    assert_eq!(engine.render().edge_count(), 0);
    assert!(engine.expansion().is_pinned(&id("Keppel")));
    assert!(engine.expansion().is_pinned(&id("G")));
    let crumb = engine.breadcrumb().unwrap();
    assert_eq!(crumb.kind, ConnectionKind::Directors);
    assert_eq!(crumb.to_string(), "Keppel \u{2192} Frank, Grace");

    engine.reset();
    assert_eq!(visible(&engine), names(&["Singtel", "UOL", "Seatrium"]));
    assert!(engine.expansion().pinned().is_empty());
    assert!(engine.breadcrumb().is_none());
}

#[test]
fn test_list_mode_reveal_of_director_lists_companies() {
    let mut engine = engine();
    let now = Instant::now();
    engine.set_mode(ExplorationMode::List, now);
    engine.click(&id("G"), now);
    let crumb = engine.breadcrumb().unwrap();
    assert_eq!(crumb.kind, ConnectionKind::Companies);
    assert_eq!(crumb.to_string(), "Grace \u{2192} Keppel, Seatrium");

    // A company without a board reveals itself and clears the trail.
    engine.click(&id("Singtel Optus"), now);
    assert!(visible(&engine).contains("Singtel Optus"));
    assert!(engine.breadcrumb().is_none());
}

#[test]
fn test_trail_without_counterparts_has_no_connection_kind() {
    let data = dataset();
    assert_eq!(
        TrailUpdate::counterparts(&data, &id("Singtel Optus")),
        TrailUpdate::Show {
            focus: id("Singtel Optus"),
            connected: Vec::new(),
            kind: ConnectionKind::None,
        }
    );
    assert!(matches!(
        TrailUpdate::counterparts(&data, &id("UOL")),
        TrailUpdate::Show {
            kind: ConnectionKind::Directors,
            ..
        }
    ));
}

#[test]
fn test_search_for_node_without_counterparts_clears_trail() {
    let mut engine = engine();
    let now = Instant::now();
    engine.click(&id("Singtel"), now);
    assert!(engine.breadcrumb().is_some());

    engine.submit_search("singtel optus", now);
    assert!(visible(&engine).contains("Singtel Optus"));
    assert!(engine.breadcrumb().is_none());
    // Edges from the earlier click are untouched.
    assert!(has(&engine, "Singtel", "A", EdgeColor::Blue));
}

#[test]
fn test_pins_survive_visual_collapse() {
    let mut engine = engine();
    let now = Instant::now();
    engine.set_mode(ExplorationMode::List, now);
    engine.click(&id("UOL"), now);
    engine.set_mode(ExplorationMode::Visual, now);

    engine.click(&id("Singtel"), now);
    engine.click(&id("Singtel"), now);
    // A is pinned, B is not.
    assert!(visible(&engine).contains("A"));
    assert!(!visible(&engine).contains("B"));
}

#[test]
fn test_mode_switch_keeps_graph_and_redirects_breadcrumbs() {
    let mut engine = engine();
    let now = Instant::now();
    engine.set_mode(ExplorationMode::List, now);
    engine.click(&id("Singtel"), now);
    let nodes_before = visible(&engine);

    engine.set_mode(ExplorationMode::Visual, now);
    assert_eq!(visible(&engine), nodes_before);

    engine.breadcrumb_click(&id("B"), now);
    assert!(has(&engine, "B", "Singtel", EdgeColor::Orange));
    assert!(has(&engine, "B", "Seatrium", EdgeColor::Orange));
}

#[test]
fn test_breadcrumb_click_in_list_mode_reveals() {
    let mut engine = engine();
    let now = Instant::now();
    engine.click(&id("Seatrium"), now);
    engine.set_mode(ExplorationMode::List, now);
    engine.breadcrumb_click(&id("G"), now);

    assert!(visible(&engine).contains("Keppel"));
    assert!(engine.expansion().is_pinned(&id("Keppel")));
    assert_eq!(
        engine.breadcrumb().unwrap().to_string(),
        "Grace \u{2192} Keppel, Seatrium"
    );
    // Edges from the visual click are untouched.
    assert!(has(&engine, "Seatrium", "G", EdgeColor::Blue));
}

#[test]
fn test_reset_round_trip() {
    let mut engine = engine();
    let now = Instant::now();
    let sequence = ["Singtel", "A", "Keppel", "G", "Singtel"];

    for node in sequence {
        engine.click(&id(node), now);
    }
    let nodes_first = visible(&engine);
    let edges_first = edge_set(&engine);

    engine.reset();
    assert_eq!(engine.render().edge_count(), 0);
    for node in sequence {
        engine.click(&id(node), now);
    }
    assert_eq!(visible(&engine), nodes_first);
    assert_eq!(edge_set(&engine), edges_first);
}

#[test]
fn test_reset_clears_search_state() {
    let mut engine = engine();
    let now = Instant::now();
    engine.input_search("sin", now);
    engine.poll_suggestions(now + Duration::from_millis(150));
    assert!(engine.suggestions().is_visible());

    engine.reset();
    assert_eq!(engine.search_input(), "");
    assert!(!engine.suggestions().is_visible());
    assert!(!engine.poll_suggestions(now + Duration::from_secs(1)));
}

#[test]
fn test_search_prefers_exact_label() {
    let mut engine = engine();
    let now = Instant::now();
    engine.submit_search("singtel", now);

    let (focused, options) = engine.render().focused().unwrap();
    assert_eq!(focused, &id("Singtel"));
    assert_eq!(options.scale, 1.5);
    assert_eq!(options.animation, Duration::from_millis(1000));
    assert_eq!(
        engine.breadcrumb().unwrap().to_string(),
        "Singtel [https://www.singtel.com] \u{2192} Alice, Bob"
    );
    // Showing the trail does not toggle edges.
    assert_eq!(engine.render().edge_count(), 0);
    assert!(visible(&engine).contains("Singtel"));
}

#[test]
fn test_search_in_visual_mode_unhides_target() {
    let mut engine = engine();
    let now = Instant::now();
    engine.submit_search("grace", now);
    assert!(visible(&engine).contains("G"));
    assert!(!visible(&engine).contains("Keppel"));
    assert_eq!(engine.render().focused().unwrap().0, id("G"));
}

#[test]
fn test_search_in_list_mode_pins_without_focus() {
    let mut engine = engine();
    let now = Instant::now();
    engine.set_mode(ExplorationMode::List, now);
    engine.submit_search("kepp", now);

    assert!(engine.render().focused().is_none());
    assert!(engine.expansion().is_pinned(&id("Keppel")));
    assert!(engine.expansion().is_pinned(&id("F")));
    assert!(visible(&engine).contains("G"));
}

#[test]
fn test_search_without_match_raises_alert() {
    let mut engine = engine();
    let now = Instant::now();
    let nodes_before = visible(&engine);
    engine.submit_search("  zzz ", now);

    let notice = engine.notice(now + Duration::from_secs(10)).unwrap();
    assert!(notice.is_blocking());
    assert_eq!(notice.message, "No nodes found matching \"zzz\"");
    assert_eq!(visible(&engine), nodes_before);

    engine.dismiss_notice();
    assert!(engine.notice(now).is_none());
}

#[test]
fn test_blank_search_does_nothing() {
    let mut engine = engine();
    let now = Instant::now();
    engine.submit_search("   ", now);
    assert!(engine.notice(now).is_none());
    assert!(engine.render().focused().is_none());
}

#[test]
fn test_suggestions_are_debounced_and_ranked() {
    let mut engine = engine();
    let start = Instant::now();
    engine.input_search("s", start);
    engine.input_search("si", start + Duration::from_millis(100));

    assert!(!engine.poll_suggestions(start + Duration::from_millis(200)));
    assert!(engine.poll_suggestions(start + Duration::from_millis(250)));

    let labels: Vec<&str> = engine
        .suggestions()
        .items()
        .iter()
        .map(|m| m.label.as_str())
        .collect();
    assert_eq!(labels, vec!["Singtel", "Singtel Optus"]);
}

#[test]
fn test_keyboard_pick_runs_search() {
    let mut engine = engine();
    let start = Instant::now();
    engine.input_search("e", start);
    engine.poll_suggestions(start + Duration::from_millis(150));
    let first = engine.suggestions().items()[0].clone();

    engine.suggestion_key(NavigationKey::Down, start);
    engine.suggestion_key(NavigationKey::Enter, start);

    assert_eq!(engine.search_input(), first.label);
    assert!(!engine.suggestions().is_visible());
    assert_eq!(engine.render().focused().unwrap().0, first.node_id);
}

#[test]
fn test_enter_without_selection_submits_input() {
    let mut engine = engine();
    let now = Instant::now();
    engine.input_search("Keppel", now);
    engine.suggestion_key(NavigationKey::Enter, now);
    assert_eq!(engine.render().focused().unwrap().0, id("Keppel"));
}

#[test]
fn test_pick_suggestion_by_index() {
    let mut engine = engine();
    let start = Instant::now();
    engine.input_search("ob", start);
    engine.poll_suggestions(start + Duration::from_millis(150));
    engine.pick_suggestion(0, start);
    assert_eq!(engine.search_input(), "Bob");
    assert_eq!(engine.render().focused().unwrap().0, id("B"));
}

#[test]
fn test_hover_tooltip() {
    let mut engine = engine();
    engine.hover_start(&id("Singtel"));
    assert_eq!(
        engine.tooltip().unwrap().to_string(),
        "Singtel: https://www.singtel.com"
    );
    engine.hover_start(&id("UOL"));
    assert_eq!(engine.tooltip().unwrap().to_string(), "UOL: No website available");
    engine.hover_start(&id("A"));
    assert!(engine.tooltip().is_none());
    engine.hover_start(&id("UOL"));
    engine.hover_end();
    assert!(engine.tooltip().is_none());
}

#[test]
fn test_collapse_records_cycles() {
    let mut engine = engine();
    for (from, to) in [("Keppel", "F"), ("F", "UOL"), ("UOL", "A"), ("A", "Keppel")] {
        engine
            .render
            .add_edge(EdgeSpec::blue(&id(from), &id(to)))
            .unwrap();
    }

    engine.collapse_subtree(&id("Keppel"));
    assert_eq!(engine.render().edge_count(), 0);
    assert!(
        engine
            .consistency()
            .warnings
            .contains(&ConsistencyWarning::CollapseCycle(id("Keppel")))
    );
}

#[test]
fn test_consistency_warnings_are_posted_at_start_up() {
    let data = Dataset::new(DatasetFile {
        nodes: vec![Node::company("UOL", "UOL"), Node::director("D", "Dan")],
        director_companies: vec![entry("D", &["UOL", "Ghost"])],
        company_urls: BTreeMap::from([("Nowhere".to_string(), "https://x.test".to_string())]),
    });
    let engine = GraphEngine::in_memory(data, EngineSettings::default()).unwrap();
    assert_eq!(engine.consistency().warnings.len(), 2);

    let notice = engine.notice(Instant::now() + Duration::from_secs(60)).unwrap();
    assert_eq!(notice.level, NoticeLevel::Warning);
    assert!(notice.message.contains("Ghost"));
}

#[test]
fn test_events_drive_engine() {
    let mut engine = engine();
    let bus = EventBus::new();
    bus.publish(Event::NodeClick { id: id("Singtel") });
    bus.publish(Event::HoverStart { id: id("Singtel") });
    bus.publish(Event::ClearBreadcrumb);
    assert_eq!(bus.dispatch_to(&mut engine), 3);

    assert!(engine.breadcrumb().is_none());
    assert!(engine.tooltip().is_some());
    assert_eq!(engine.stats().visible_edges, 2);

    bus.publish(Event::ModeChange(ExplorationMode::List));
    bus.publish(Event::ResetRequested);
    bus.dispatch_to(&mut engine);
    assert_eq!(engine.mode(), ExplorationMode::List);
    assert_eq!(engine.stats().visible_edges, 0);
}

/// Render service that refuses every edge mutation.
struct RejectingRender(GraphModel);

impl RenderService for RejectingRender {
    fn node(&self, id: &NodeId) -> Option<NodeView> {
        self.0.node(id)
    }

    fn nodes(&self) -> Vec<NodeView> {
        self.0.nodes()
    }

    fn update_node(&mut self, id: &NodeId, patch: NodePatch) -> Result<(), RenderError> {
        self.0.update_node(id, patch)
    }

    fn edges(&self, filter: &dyn Fn(&EdgeView) -> bool) -> Vec<EdgeView> {
        self.0.edges(filter)
    }

    fn edge_count(&self) -> usize {
        self.0.edge_count()
    }

    fn add_edge(&mut self, _edge: EdgeSpec) -> Result<EdgeId, RenderError> {
        Err(RenderError::Rejected("read-only".to_string()))
    }

    fn update_edge(&mut self, _id: EdgeId, _patch: EdgePatch) -> Result<(), RenderError> {
        Err(RenderError::Rejected("read-only".to_string()))
    }

    fn remove_edges(&mut self, _ids: &[EdgeId]) -> Result<(), RenderError> {
        Err(RenderError::Rejected("read-only".to_string()))
    }

    fn clear_edges(&mut self) {
        self.0.clear_edges();
    }

    fn focus(&mut self, id: &NodeId, options: FocusOptions) -> Result<(), RenderError> {
        self.0.focus(id, options)
    }
}

#[test]
fn test_rejected_edge_mutations_are_skipped() {
    let data = dataset();
    let render = RejectingRender(GraphModel::from_dataset(&data));
    let mut engine = GraphEngine::new(data, render, EngineSettings::default()).unwrap();
    let now = Instant::now();

    engine.click(&id("Singtel"), now);
    assert_eq!(engine.render().edge_count(), 0);
    assert_eq!(engine.stats().visible_edges, 0);
    engine.click(&id("Singtel"), now);
    engine.click(&id("A"), now);
    assert_eq!(engine.render().edge_count(), 0);
}

struct Unavailable;

impl RenderService for Unavailable {
    fn ensure_available(&self) -> Result<(), RenderError> {
        Err(RenderError::Unavailable("no renderer".to_string()))
    }

    fn node(&self, _id: &NodeId) -> Option<NodeView> {
        None
    }

    fn nodes(&self) -> Vec<NodeView> {
        Vec::new()
    }

    fn update_node(&mut self, id: &NodeId, _patch: NodePatch) -> Result<(), RenderError> {
        Err(RenderError::UnknownNode(id.clone()))
    }

    fn edges(&self, _filter: &dyn Fn(&EdgeView) -> bool) -> Vec<EdgeView> {
        Vec::new()
    }

    fn edge_count(&self) -> usize {
        0
    }

    fn add_edge(&mut self, _edge: EdgeSpec) -> Result<EdgeId, RenderError> {
        Err(RenderError::Unavailable("no renderer".to_string()))
    }

    fn update_edge(&mut self, id: EdgeId, _patch: EdgePatch) -> Result<(), RenderError> {
        Err(RenderError::UnknownEdge(id))
    }

    fn remove_edges(&mut self, _ids: &[EdgeId]) -> Result<(), RenderError> {
        Ok(())
    }

    fn clear_edges(&mut self) {}

    fn focus(&mut self, id: &NodeId, _options: FocusOptions) -> Result<(), RenderError> {
        Err(RenderError::UnknownNode(id.clone()))
    }
}

#[test]
fn test_unavailable_render_service_is_fatal() {
    let result = GraphEngine::new(dataset(), Unavailable, EngineSettings::default());
    assert!(matches!(result, Err(RenderError::Unavailable(_))));
}

// Property tests

#[derive(Debug, Clone)]
enum Op {
    Click(usize),
    Crumb(usize),
    Search(usize),
    Mode(bool),
    Reset,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => (0usize..10).prop_map(Op::Click),
        2 => (0usize..4).prop_map(Op::Crumb),
        1 => (0usize..10).prop_map(Op::Search),
        1 => any::<bool>().prop_map(Op::Mode),
        1 => Just(Op::Reset),
    ]
}

fn apply(engine: &mut GraphEngine<GraphModel>, op: &Op, now: Instant) {
    let nodes = engine.dataset().nodes().to_vec();
    match op {
        Op::Click(i) => engine.click(&nodes[*i % nodes.len()].id, now),
        Op::Crumb(i) => {
            let target = engine
                .breadcrumb()
                .and_then(|b| b.entries.get(*i))
                .map(|e| e.node_id.clone());
            if let Some(target) = target {
                engine.breadcrumb_click(&target, now);
            }
        }
        Op::Search(i) => {
            let label = nodes[*i % nodes.len()].label.clone();
            engine.submit_search(&label, now);
        }
        Op::Mode(list) => {
            let mode = if *list {
                ExplorationMode::List
            } else {
                ExplorationMode::Visual
            };
            engine.set_mode(mode, now);
        }
        Op::Reset => engine.reset(),
    }
}

fn check_edges(engine: &GraphEngine<GraphModel>) -> Result<(), TestCaseError> {
    let edges = engine.render().edges(&|_| true);
    let mut pairs = BTreeSet::new();
    for edge in &edges {
        prop_assert!(
            pairs.insert((edge.from.clone(), edge.to.clone())),
            "parallel edge {} -> {}",
            edge.from,
            edge.to
        );
    }
    for (from, to) in &pairs {
        prop_assert!(
            !pairs.contains(&(to.clone(), from.clone())),
            "edges both ways between {from} and {to}"
        );
    }

    for edge in &edges {
        let oranges_in = edges
            .iter()
            .filter(|e| e.to == edge.to && e.color == EdgeColor::Orange)
            .count();
        if edge.color == EdgeColor::Orange {
            prop_assert_eq!(edge.dashes, oranges_in >= 2);
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn prop_edge_invariants_hold_after_every_interaction(
        ops in prop::collection::vec(op_strategy(), 1..40)
    ) {
        let mut engine = engine();
        let now = Instant::now();
        for op in &ops {
            apply(&mut engine, op, now);
            check_edges(&engine)?;
            prop_assert_eq!(engine.stats().visible_edges, engine.render().edge_count());
        }
    }

    #[test]
    fn prop_pins_only_grow_between_resets(
        ops in prop::collection::vec(op_strategy(), 1..40)
    ) {
        let mut engine = engine();
        let now = Instant::now();
        let mut previous = engine.expansion().pinned().clone();
        for op in &ops {
            apply(&mut engine, op, now);
            let current = engine.expansion().pinned().clone();
            if !matches!(op, Op::Reset) {
                prop_assert!(current.is_superset(&previous));
            }
            for pinned in &current {
                prop_assert!(!engine.render().is_hidden(pinned));
            }
            previous = current;
        }
    }

    #[test]
    fn prop_no_expand_directors_stay_inert(
        ops in prop::collection::vec(op_strategy(), 1..40)
    ) {
        let mut engine = engine();
        let now = Instant::now();
        let inert = id("E");
        for op in &ops {
            apply(&mut engine, op, now);
            prop_assert!(EdgeLedger::edges_from(engine.render(), &inert).is_empty());
            prop_assert!(!engine.expansion().is_director_open(&inert));
        }
    }

    #[test]
    fn prop_reset_replay_is_deterministic(
        ops in prop::collection::vec(op_strategy(), 1..30)
    ) {
        let ops: Vec<Op> = ops
            .into_iter()
            .filter(|op| !matches!(op, Op::Mode(true) | Op::Reset))
            .collect();
        let mut engine = engine();
        let now = Instant::now();
        for op in &ops {
            apply(&mut engine, op, now);
        }
        let nodes_first = visible(&engine);
        let edges_first = edge_set(&engine);

        engine.reset();
        for op in &ops {
            apply(&mut engine, op, now);
        }
        prop_assert_eq!(visible(&engine), nodes_first);
        prop_assert_eq!(edge_set(&engine), edges_first);
    }
}
