//! Load-time data consistency check. Problems are collected as warnings and
//! never abort start-up.

use crate::{Dataset, NodeId};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsistencyWarning {
    #[error("company URL key missing node: \"{0}\"")]
    UrlKeyMissingNode(NodeId),
    #[error("director entry missing node: \"{0}\"")]
    DirectorMissingNode(NodeId),
    #[error("company referenced by director relation missing node: \"{company}\" (from {director})")]
    CompanyMissingNode { company: NodeId, director: NodeId },
    #[error("cycle detected while collapsing subtree at \"{0}\"")]
    CollapseCycle(NodeId),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsistencyReport {
    pub warnings: Vec<ConsistencyWarning>,
}

impl ConsistencyReport {
    pub fn check(dataset: &Dataset) -> Self {
        let mut warnings = Vec::new();

        for (key, _) in dataset.company_urls() {
            if !dataset.contains(key) {
                warnings.push(ConsistencyWarning::UrlKeyMissingNode(key.clone()));
            }
        }

        for (director, companies) in dataset.director_entries() {
            if !dataset.contains(director) {
                warnings.push(ConsistencyWarning::DirectorMissingNode(director.clone()));
            }
            for company in companies {
                if !dataset.contains(company) {
                    warnings.push(ConsistencyWarning::CompanyMissingNode {
                        company: company.clone(),
                        director: director.clone(),
                    });
                }
            }
        }

        if !warnings.is_empty() {
            let joined: Vec<String> = warnings.iter().map(ToString::to_string).collect();
            tracing::warn!("Data consistency warnings:\n{}", joined.join("\n"));
        }

        Self { warnings }
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Lines for the notice area: the first `limit` warnings, then a count
    /// of the remainder.
    pub fn display_lines(&self, limit: usize) -> Vec<String> {
        let mut lines: Vec<String> = self
            .warnings
            .iter()
            .take(limit)
            .map(|w| format!("\u{26A0} {w}"))
            .collect();
        if self.warnings.len() > limit {
            lines.push(format!("...and {} more", self.warnings.len() - limit));
        }
        lines
    }
}
