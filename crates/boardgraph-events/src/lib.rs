use boardgraph_core::{ExplorationMode, NodeId};
use crossbeam_channel::{unbounded, Receiver, Sender};
use serde::{Deserialize, Serialize};

/// Keys that drive the suggestion list while the search input has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigationKey {
    Up,
    Down,
    Enter,
    Escape,
}

/// Interactions dispatched by the UI shell. Each one is handled to
/// completion before the next is taken off the bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // Graph
    NodeClick {
        id: NodeId,
    },
    HoverStart {
        id: NodeId,
    },
    HoverEnd,

    // Breadcrumb
    BreadcrumbClick {
        id: NodeId,
    },
    ClearBreadcrumb,

    // Search
    /// Search input text changed; suggestions follow after the quiet period.
    SearchInput {
        query: String,
    },
    SearchSubmit {
        query: String,
    },
    SuggestionKey(NavigationKey),
    /// A suggestion was picked directly (mouse click).
    SuggestionPick {
        index: usize,
    },

    // Controls
    ModeChange(ExplorationMode),
    ResetRequested,
}

#[derive(Clone)]
pub struct EventBus {
    tx: Sender<Event>,
    rx: Receiver<Event>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    pub fn sender(&self) -> Sender<Event> {
        self.tx.clone()
    }

    pub fn receiver(&self) -> Receiver<Event> {
        self.rx.clone()
    }

    pub fn publish(&self, event: Event) {
        let _ = self.tx.send(event);
    }

    /// Dispatch all pending events to a listener, in publish order.
    pub fn dispatch_to<L: EventListener>(&self, listener: &mut L) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.rx.try_recv() {
            listener.handle_event(&event);
            handled += 1;
        }
        handled
    }
}

/// Trait for components that respond to events.
/// Implement this to receive events from the EventBus.
pub trait EventListener {
    fn handle_event(&mut self, event: &Event);
}
