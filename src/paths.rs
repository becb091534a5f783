use std::cmp::Ordering;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::PathParams;
use crate::errors::BopError;
use crate::graph::{AttributedGraph, EdgeId, NodeId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepWeight {
    /// Number of parallel edges forming the step.
    EdgeCount,
    Constant,
}

impl StepWeight {
    pub fn weigh(self, edges: &[EdgeId]) -> f64 {
        match self {
            StepWeight::EdgeCount => edges.len() as f64,
            StepWeight::Constant => 1.0,
        }
    }
}

/// How step weights are reduced to a path weight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PathWeight {
    None,
    #[serde(alias = "step-sum")]
    Sum,
    #[serde(alias = "step-product")]
    Product,
    Length,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathWeightValue {
    Total(f64),
    Steps(Vec<f64>),
}

impl PathWeightValue {
    /// Vector weights collapse to their sum.
    pub fn scalar(&self) -> f64 {
        match self {
            PathWeightValue::Total(value) => *value,
            PathWeightValue::Steps(values) => values.iter().sum(),
        }
    }

    /// Totals compare numerically, vectors lexicographically.
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (PathWeightValue::Total(a), PathWeightValue::Total(b)) => a.total_cmp(b),
            (PathWeightValue::Steps(a), PathWeightValue::Steps(b)) => {
                for (x, y) in a.iter().zip(b) {
                    let ordering = x.total_cmp(y);
                    if ordering != Ordering::Equal {
                        return ordering;
                    }
                }
                a.len().cmp(&b.len())
            }
            _ => self.scalar().total_cmp(&other.scalar()),
        }
    }
}

pub fn reduce_weights(weights: &[f64], policy: PathWeight) -> PathWeightValue {
    match policy {
        PathWeight::None => PathWeightValue::Steps(weights.to_vec()),
        PathWeight::Sum => PathWeightValue::Total(weights.iter().sum()),
        PathWeight::Product => PathWeightValue::Total(weights.iter().product()),
        PathWeight::Length => PathWeightValue::Total(weights.len() as f64),
    }
}

/// One node of a path. `edges` holds every parallel edge from the previous
/// node; `via` is the first of them. The start step has neither.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathStep {
    pub node: NodeId,
    pub via: Option<EdgeId>,
    pub edges: Vec<EdgeId>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    pub steps: Vec<PathStep>,
    pub step_weights: Vec<f64>,
    pub weight: PathWeightValue,
}

impl Path {
    pub fn start(&self) -> NodeId {
        self.steps[0].node
    }

    /// Number of edges traversed.
    pub fn len(&self) -> usize {
        self.steps.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.steps.iter().map(|step| step.node)
    }
}

pub fn collect_paths(graph: &AttributedGraph, params: &PathParams) -> Result<Vec<Path>, BopError> {
    let step_weight = params.step_weight;
    collect_paths_with(graph, params, |_, edges| step_weight.weigh(edges))
}

/// Collects maximal paths from every node using a caller-supplied step weight.
pub fn collect_paths_with<W>(
    graph: &AttributedGraph,
    params: &PathParams,
    weigh: W,
) -> Result<Vec<Path>, BopError>
where
    W: Fn(&AttributedGraph, &[EdgeId]) -> f64,
{
    if params.max_path_length < params.min_path_length {
        return Err(BopError::invalid_parameter(format!(
            "maxPathLength ({}) is below minPathLength ({})",
            params.max_path_length, params.min_path_length
        )));
    }
    let mut raw: Vec<Vec<PathStep>> = Vec::new();
    for start in graph.node_ids() {
        let mut steps = vec![PathStep {
            node: start,
            via: None,
            edges: Vec::new(),
        }];
        extend(graph, params, &mut steps, &mut raw);
    }

    let mut paths: Vec<Path> = raw
        .into_iter()
        .filter(|steps| steps.len() - 1 >= params.min_path_length)
        .map(|steps| {
            let step_weights: Vec<f64> = steps[1..]
                .iter()
                .map(|step| weigh(graph, &step.edges))
                .collect();
            let weight = reduce_weights(&step_weights, params.path_weight);
            Path {
                steps,
                step_weights,
                weight,
            }
        })
        .collect();

    paths.sort_by(|a, b| {
        let by_weight = match params.order {
            SortOrder::Desc => b.weight.compare(&a.weight),
            SortOrder::Asc => a.weight.compare(&b.weight),
        };
        by_weight.then_with(|| a.len().cmp(&b.len()))
    });
    if let Ok(limit) = usize::try_from(params.max_paths) {
        paths.truncate(limit);
    }
    tracing::debug!(
        nodes = graph.node_count(),
        paths = paths.len(),
        "collected paths"
    );
    Ok(paths)
}

fn extend(
    graph: &AttributedGraph,
    params: &PathParams,
    steps: &mut Vec<PathStep>,
    out: &mut Vec<Vec<PathStep>>,
) {
    if steps.len() - 1 >= params.max_path_length {
        out.push(steps.clone());
        return;
    }
    let Some(last) = steps.last().map(|step| step.node) else {
        return;
    };
    let mut groups: IndexMap<NodeId, Vec<EdgeId>> = IndexMap::new();
    for edge in graph.outgoing(last) {
        let target = graph.edge(*edge).target;
        if !params.allow_cycles && steps.iter().any(|step| step.node == target) {
            continue;
        }
        groups.entry(target).or_default().push(*edge);
    }
    if groups.is_empty() {
        out.push(steps.clone());
        return;
    }
    for (target, edges) in groups {
        steps.push(PathStep {
            node: target,
            via: edges.first().copied(),
            edges,
        });
        extend(graph, params, steps, out);
        steps.pop();
    }
}
