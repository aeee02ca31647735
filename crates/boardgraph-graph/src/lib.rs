pub mod breadcrumb;
pub mod engine;
pub mod expansion;
pub mod graph;
pub mod ledger;
pub mod notice;
pub mod render;

pub use breadcrumb::{Breadcrumb, BreadcrumbEntry, ConnectionKind, NO_EXPANSION_TITLE};
pub use engine::{GraphEngine, Stats, Tooltip};
pub use expansion::ExpansionState;
pub use graph::{GraphModel, NodeIndex};
pub use ledger::EdgeLedger;
pub use notice::{Notice, NoticeBoard, NoticeLevel};
pub use render::{
    EdgePatch, EdgeView, FocusOptions, NodePatch, NodeView, RenderError, RenderService,
};
