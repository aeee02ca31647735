use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub mod consistency;
pub mod dataset;
pub mod error;
pub mod settings;

pub use consistency::{ConsistencyReport, ConsistencyWarning};
pub use dataset::{BoardSummary, Dataset, DatasetFile, DirectorEntry, SummaryLine};
pub use error::DatasetError;
pub use settings::EngineSettings;

/// Marker appended to the display label of companies that have a website.
pub const URL_MARKER: &str = " 🔗";

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeId(pub u64);

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Node category. Datasets exported for the web viewer encode it as a
/// shape, so `box` and `ellipse` are accepted as aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    #[serde(rename = "company", alias = "box")]
    Company,
    #[serde(rename = "director", alias = "ellipse")]
    Director,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    #[serde(alias = "shape")]
    pub kind: NodeKind,
    pub label: String,
}

impl Node {
    pub fn company(id: &str, label: &str) -> Self {
        Self {
            id: NodeId::from(id),
            kind: NodeKind::Company,
            label: label.to_string(),
        }
    }

    pub fn director(id: &str, label: &str) -> Self {
        Self {
            id: NodeId::from(id),
            kind: NodeKind::Director,
            label: label.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeColor {
    /// Company -> Director: board membership shown.
    Blue,
    /// Director -> Company: the director's other directorships shown.
    Orange,
}

impl EdgeColor {
    pub fn as_str(self) -> &'static str {
        match self {
            EdgeColor::Blue => "blue",
            EdgeColor::Orange => "orange",
        }
    }
}

/// A directed edge as requested by the engine, before the render service
/// assigns it an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeSpec {
    pub from: NodeId,
    pub to: NodeId,
    pub color: EdgeColor,
    pub dashes: bool,
}

impl EdgeSpec {
    /// Arrow style is fixed: every edge points at its target.
    pub const ARROWS: &'static str = "to";

    pub fn blue(from: &NodeId, to: &NodeId) -> Self {
        Self {
            from: from.clone(),
            to: to.clone(),
            color: EdgeColor::Blue,
            dashes: false,
        }
    }

    pub fn orange(from: &NodeId, to: &NodeId) -> Self {
        Self {
            from: from.clone(),
            to: to.clone(),
            color: EdgeColor::Orange,
            dashes: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExplorationMode {
    /// Clicks toggle edges and visibility.
    #[default]
    Visual,
    /// Clicks only reveal and pin nodes.
    List,
}

impl ExplorationMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ExplorationMode::Visual => "visual",
            ExplorationMode::List => "list",
        }
    }
}

impl fmt::Display for ExplorationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid exploration mode: {0}")]
pub struct InvalidModeError(pub String);

impl FromStr for ExplorationMode {
    type Err = InvalidModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "visual" => Ok(ExplorationMode::Visual),
            "list" => Ok(ExplorationMode::List),
            other => Err(InvalidModeError(other.to_string())),
        }
    }
}

/// Strips a trailing URL marker from a display label.
pub fn base_label(label: &str) -> &str {
    label.strip_suffix(URL_MARKER).unwrap_or(label)
}
