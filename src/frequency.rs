use std::cmp::Ordering;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::FrequencyParams;
use crate::mining::MinedPattern;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PatternOrder {
    AbsoluteFrequency,
    ModelFrequency,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternWithFrequency {
    pub pattern: Vec<String>,
    /// Summed support over all graphs.
    pub absolute_frequency: usize,
    /// Number of graphs the pattern was mined from.
    pub model_frequency: usize,
}

/// Merges per-graph patterns, filters by both minimums, ranks and truncates.
pub fn calculate_frequencies<'a, I>(per_graph: I, params: &FrequencyParams) -> Vec<PatternWithFrequency>
where
    I: IntoIterator<Item = &'a [MinedPattern]>,
{
    let mut merged: IndexMap<Vec<String>, (PatternWithFrequency, usize)> = IndexMap::new();
    for (graph, patterns) in per_graph.into_iter().enumerate() {
        for mined in patterns {
            let (entry, last_graph) = merged.entry(mined.pattern.clone()).or_insert_with(|| {
                (
                    PatternWithFrequency {
                        pattern: mined.pattern.clone(),
                        absolute_frequency: 0,
                        model_frequency: 0,
                    },
                    usize::MAX,
                )
            });
            entry.absolute_frequency += mined.support;
            if *last_graph != graph {
                entry.model_frequency += 1;
                *last_graph = graph;
            }
        }
    }
    let total = merged.len();
    let mut ranked: Vec<PatternWithFrequency> = merged
        .into_values()
        .map(|(entry, _)| entry)
        .filter(|entry| {
            entry.absolute_frequency >= params.min_absolute_frequency
                && entry.model_frequency >= params.min_model_frequency
        })
        .collect();
    ranked.sort_by(|a, b| compare_ranked(a, b, params.pattern_order));
    ranked.truncate(params.max_patterns);
    tracing::debug!(distinct = total, kept = ranked.len(), "ranked patterns");
    ranked
}

/// Primary metric, secondary metric, pattern length; all descending.
fn compare_ranked(a: &PatternWithFrequency, b: &PatternWithFrequency, order: PatternOrder) -> Ordering {
    let absolute = b.absolute_frequency.cmp(&a.absolute_frequency);
    let model = b.model_frequency.cmp(&a.model_frequency);
    let (primary, secondary) = match order {
        PatternOrder::AbsoluteFrequency => (absolute, model),
        PatternOrder::ModelFrequency => (model, absolute),
    };
    primary
        .then(secondary)
        .then_with(|| b.pattern.len().cmp(&a.pattern.len()))
}
