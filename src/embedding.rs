use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::errors::BopError;
use crate::normalize::NormalizedPartition;

/// Partition x edge-identifier incidence matrix.
///
/// `header` lists every identifier once, in first-seen order; `rows[p][c]`
/// is 1 when partition `p` contains identifier `c`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embedding {
    pub header: Vec<String>,
    pub rows: Vec<Vec<u8>>,
}

impl Embedding {
    /// Each row as ascending column indices of its set cells.
    pub fn transactions(&self) -> Vec<Vec<usize>> {
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .filter(|(_, cell)| **cell == 1)
                    .map(|(col, _)| col)
                    .collect()
            })
            .collect()
    }

    pub fn decode_row(&self, row: usize) -> Result<Vec<&str>, BopError> {
        let cells = self
            .rows
            .get(row)
            .ok_or_else(|| BopError::not_found(format!("embedding row {row}")))?;
        Ok(cells
            .iter()
            .zip(&self.header)
            .filter(|(cell, _)| **cell == 1)
            .map(|(_, identifier)| identifier.as_str())
            .collect())
    }

    pub fn decode_items(&self, items: &[usize]) -> Result<Vec<String>, BopError> {
        items
            .iter()
            .map(|item| {
                self.header.get(*item).cloned().ok_or_else(|| {
                    BopError::invariant(format!("column {item} outside embedding header"))
                })
            })
            .collect()
    }
}

pub fn embed_partitions(partitions: &[NormalizedPartition]) -> Embedding {
    let header: IndexSet<&str> = partitions
        .iter()
        .flat_map(NormalizedPartition::edge_identifiers)
        .collect();
    let rows = partitions
        .iter()
        .map(|partition| {
            let present: IndexSet<&str> = partition.edge_identifiers().collect();
            header
                .iter()
                .map(|identifier| u8::from(present.contains(identifier)))
                .collect()
        })
        .collect();
    tracing::debug!(
        partitions = partitions.len(),
        columns = header.len(),
        "embedded partitions"
    );
    Embedding {
        header: header.into_iter().map(str::to_string).collect(),
        rows,
    }
}
