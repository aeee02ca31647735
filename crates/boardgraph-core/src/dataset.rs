//! The immutable company/director dataset.
//!
//! `director_companies` is the authoritative relation. The inverse
//! `company_directors` is derived once at construction: duplicate-free per
//! company, in first-seen order.

use crate::{DatasetError, Node, NodeId, NodeKind};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

/// On-disk shape of a dataset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatasetFile {
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub director_companies: Vec<DirectorEntry>,
    #[serde(default)]
    pub company_urls: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DirectorEntry {
    pub director: NodeId,
    pub companies: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct Dataset {
    nodes: Vec<Node>,
    node_index: HashMap<NodeId, usize>,
    directors: Vec<NodeId>,
    director_companies: HashMap<NodeId, Vec<NodeId>>,
    company_directors: HashMap<NodeId, Vec<NodeId>>,
    company_urls: BTreeMap<NodeId, String>,
}

impl Dataset {
    pub fn new(file: DatasetFile) -> Self {
        let mut node_index = HashMap::new();
        for (idx, node) in file.nodes.iter().enumerate() {
            node_index.entry(node.id.clone()).or_insert(idx);
        }

        let mut directors = Vec::new();
        let mut director_companies: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
        for entry in file.director_companies {
            if director_companies
                .insert(entry.director.clone(), entry.companies)
                .is_none()
            {
                directors.push(entry.director);
            } else {
                tracing::warn!(
                    "Duplicate director entry {}; the later entry wins",
                    entry.director
                );
            }
        }

        let mut company_directors: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
        for director in &directors {
            for company in &director_companies[director] {
                let board = company_directors.entry(company.clone()).or_default();
                if !board.contains(director) {
                    board.push(director.clone());
                }
            }
        }

        let company_urls = file
            .company_urls
            .into_iter()
            .map(|(k, v)| (NodeId(k), v))
            .collect();

        Self {
            nodes: file.nodes,
            node_index,
            directors,
            director_companies,
            company_directors,
            company_urls,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, DatasetError> {
        let file: DatasetFile = serde_json::from_str(json)?;
        Ok(Self::new(file))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DatasetError::Environment(format!(
                "dataset file {} does not exist",
                path.display()
            )));
        }
        let content = fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// All nodes in dataset order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.node_index.get(id).map(|&idx| &self.nodes[idx])
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn kind(&self, id: &NodeId) -> Option<NodeKind> {
        self.node(id).map(|n| n.kind)
    }

    /// Directors in relation order, paired with their companies.
    pub fn director_entries(&self) -> impl Iterator<Item = (&NodeId, &[NodeId])> {
        self.directors
            .iter()
            .map(|d| (d, self.director_companies[d].as_slice()))
    }

    /// Whether the node has an entry in the director relation.
    pub fn has_directorships(&self, id: &NodeId) -> bool {
        self.director_companies.contains_key(id)
    }

    pub fn companies_of(&self, director: &NodeId) -> &[NodeId] {
        self.director_companies
            .get(director)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether the node is a company with a derived board entry.
    pub fn has_board(&self, id: &NodeId) -> bool {
        self.company_directors.contains_key(id)
    }

    pub fn board(&self, company: &NodeId) -> &[NodeId] {
        self.company_directors
            .get(company)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Counterpart set used by list mode, search and breadcrumbs: the board
    /// of a company, the companies of a director.
    pub fn counterparts(&self, id: &NodeId) -> &[NodeId] {
        match self.kind(id) {
            Some(NodeKind::Company) => self.board(id),
            Some(NodeKind::Director) => self.companies_of(id),
            None => &[],
        }
    }

    /// Directors on exactly one board are never expandable.
    pub fn is_no_expand(&self, id: &NodeId) -> bool {
        self.director_companies
            .get(id)
            .is_some_and(|companies| companies.len() == 1)
    }

    pub fn url(&self, company: &NodeId) -> Option<&str> {
        self.company_urls.get(company).map(String::as_str)
    }

    pub fn company_urls(&self) -> impl Iterator<Item = (&NodeId, &str)> {
        self.company_urls.iter().map(|(k, v)| (k, v.as_str()))
    }

    /// Looks up an exact (case-insensitive) company name and lists its
    /// directors that also sit on other boards.
    pub fn board_summary(&self, query: &str) -> BoardSummary {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return BoardSummary::EmptyQuery;
        }

        let Some(company) = self.summary_companies().find(|c| c.0.to_lowercase() == needle)
        else {
            return BoardSummary::UnknownCompany(query.trim().to_string());
        };

        let lines: Vec<SummaryLine> = self
            .board(company)
            .iter()
            .filter_map(|director| {
                let boards = self.companies_of(director);
                (boards.len() > 1).then(|| SummaryLine {
                    director: director.clone(),
                    boards: boards.to_vec(),
                })
            })
            .collect();

        if lines.is_empty() {
            BoardSummary::NoSharedDirectors(company.clone())
        } else {
            BoardSummary::Shared {
                company: company.clone(),
                lines,
            }
        }
    }

    /// Company names for the summary lookup, alphabetically, filtered by a
    /// case-insensitive substring.
    pub fn summary_suggestions(&self, query: &str, limit: usize) -> Vec<NodeId> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        let mut names: Vec<&NodeId> = self.summary_companies().collect();
        names.sort();
        names
            .into_iter()
            .filter(|c| c.0.to_lowercase().contains(&needle))
            .take(limit)
            .cloned()
            .collect()
    }

    fn summary_companies(&self) -> impl Iterator<Item = &NodeId> {
        self.directors
            .iter()
            .flat_map(|d| self.director_companies[d].iter())
            .filter(|c| self.company_directors.contains_key(*c))
            .scan(std::collections::HashSet::new(), |seen, c| {
                Some(seen.insert(c).then_some(c))
            })
            .flatten()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryLine {
    pub director: NodeId,
    pub boards: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardSummary {
    EmptyQuery,
    UnknownCompany(String),
    NoSharedDirectors(NodeId),
    Shared {
        company: NodeId,
        lines: Vec<SummaryLine>,
    },
}
