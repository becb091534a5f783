//! Top-k sequential pattern mining (PrefixSpan) with optional closed-pattern
//! checks.
//!
//! A match `(seq, end)` records that the pattern was found in sequence
//! `seq` with its last item at position `end - 1`.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::config::MiningParams;
use crate::embedding::Embedding;
use crate::errors::BopError;

type Match = (usize, usize);
type Candidate = (usize, Vec<usize>, Vec<Match>);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinedPattern {
    pub support: usize,
    pub pattern: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TopKOptions {
    pub closed: bool,
    pub min_length: usize,
    pub max_length: usize,
}

/// The `k` most supported patterns of `db`, by support descending then pattern.
pub fn top_k(db: &[Vec<usize>], k: usize, options: TopKOptions) -> Vec<(usize, Vec<usize>)> {
    if k == 0 {
        return Vec::new();
    }
    let mut miner = TopK {
        db,
        k,
        options,
        results: BinaryHeap::new(),
    };
    let initial: Vec<Match> = (0..db.len()).map(|seq| (seq, 0)).collect();
    miner.search(Vec::new(), initial);

    let mut results: Vec<(usize, Vec<usize>)> = miner
        .results
        .into_iter()
        .map(|Reverse((support, pattern, _))| (support, pattern))
        .collect();
    results.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
    results
}

struct TopK<'a> {
    db: &'a [Vec<usize>],
    k: usize,
    options: TopKOptions,
    results: BinaryHeap<Reverse<Candidate>>,
}

impl TopK<'_> {
    /// True once the heap is full and `support` cannot displace its minimum.
    fn can_pass(&self, support: usize) -> bool {
        match self.results.peek() {
            Some(Reverse((min, _, _))) => self.results.len() == self.k && support <= *min,
            None => false,
        }
    }

    fn verify(&mut self, pattern: &[usize], matches: &[Match]) {
        let support = matches.len();
        if self.can_pass(support) {
            return;
        }
        if self.options.closed && !is_closed(self.db, pattern, matches) {
            return;
        }
        self.results
            .push(Reverse((support, pattern.to_vec(), matches.to_vec())));
        if self.results.len() > self.k {
            self.results.pop();
        }
    }

    fn search(&mut self, pattern: Vec<usize>, matches: Vec<Match>) {
        if pattern.len() >= self.options.min_length {
            self.verify(&pattern, &matches);
            if pattern.len() == self.options.max_length {
                return;
            }
        }
        for (item, next_matches) in sorted_occurrences(next_entries(self.db, &matches)) {
            if self.can_pass(next_matches.len()) {
                break;
            }
            let mut next_pattern = pattern.clone();
            next_pattern.push(item);
            if self.options.closed && can_closed_prune(self.db, &next_pattern, &next_matches) {
                continue;
            }
            self.search(next_pattern, next_matches);
        }
    }
}

/// First occurrence of every item after each match, keyed by item.
fn next_entries(db: &[Vec<usize>], matches: &[Match]) -> BTreeMap<usize, Vec<Match>> {
    let mut index: BTreeMap<usize, Vec<Match>> = BTreeMap::new();
    for (seq, end) in matches {
        let Some(sequence) = db.get(*seq) else {
            continue;
        };
        for (pos, item) in sequence.iter().enumerate().skip(*end) {
            let slot = index.entry(*item).or_default();
            if slot.last().is_some_and(|(last_seq, _)| last_seq == seq) {
                continue;
            }
            slot.push((*seq, pos + 1));
        }
    }
    index
}

/// Orders extensions by support descending, then by their match lists.
fn sorted_occurrences(index: BTreeMap<usize, Vec<Match>>) -> Vec<(usize, Vec<Match>)> {
    let mut entries: Vec<(usize, Vec<Match>)> = index.into_iter().collect();
    entries.sort_by(|a, b| b.1.len().cmp(&a.1.len()).then_with(|| a.1.cmp(&b.1)));
    entries
}

/// No item can extend the pattern on either side in every match.
pub fn is_closed(db: &[Vec<usize>], pattern: &[usize], matches: &[Match]) -> bool {
    let mut bounded: Vec<Option<usize>> = Vec::with_capacity(pattern.len() + 2);
    bounded.push(None);
    bounded.extend(pattern.iter().copied().map(Some));
    bounded.push(None);
    let uppers: Vec<Match> = matches
        .iter()
        .map(|(seq, _)| (*seq, db.get(*seq).map_or(0, Vec::len)))
        .collect();
    !reverse_scan(db, &bounded, uppers) && !forward_scan(db, matches)
}

/// Some item occurs before a pattern item in every match, so a longer
/// closed pattern subsumes this branch.
pub fn can_closed_prune(db: &[Vec<usize>], pattern: &[usize], matches: &[Match]) -> bool {
    let mut bounded: Vec<Option<usize>> = Vec::with_capacity(pattern.len() + 1);
    bounded.push(None);
    bounded.extend(pattern.iter().copied().map(Some));
    let uppers: Vec<Match> = matches
        .iter()
        .map(|(seq, end)| (*seq, end.saturating_sub(1)))
        .collect();
    reverse_scan(db, &bounded, uppers)
}

fn forward_scan(db: &[Vec<usize>], matches: &[Match]) -> bool {
    let mut closed: Option<AHashSet<usize>> = None;
    for (seq, end) in matches {
        let local: AHashSet<usize> = db
            .get(*seq)
            .map(|sequence| sequence.iter().skip(*end).copied().collect())
            .unwrap_or_default();
        closed = Some(match closed {
            None => local,
            Some(acc) => acc.intersection(&local).copied().collect(),
        });
    }
    closed.is_some_and(|items| !items.is_empty())
}

/// `uppers[k].1` is the exclusive upper bound of the backward scan in match
/// `k`; it moves down to each pattern item found.
fn reverse_scan(db: &[Vec<usize>], pattern: &[Option<usize>], mut uppers: Vec<Match>) -> bool {
    let Some((_, head)) = pattern.split_last() else {
        return false;
    };
    for previous in head.iter().rev() {
        let mut closed: Option<AHashSet<usize>> = None;
        for (seq, upper) in uppers.iter_mut() {
            let mut local = AHashSet::new();
            if let Some(sequence) = db.get(*seq) {
                for pos in (0..(*upper).min(sequence.len())).rev() {
                    let item = sequence[pos];
                    if Some(item) == *previous {
                        *upper = pos;
                        break;
                    }
                    local.insert(item);
                }
            }
            closed = Some(match closed {
                None => local,
                Some(acc) => acc.intersection(&local).copied().collect(),
            });
        }
        if closed.is_some_and(|items| !items.is_empty()) {
            return true;
        }
    }
    false
}

/// Mines the partition transactions of one graph.
pub fn mine_patterns(
    embedding: &Embedding,
    params: &MiningParams,
) -> Result<Vec<MinedPattern>, BopError> {
    if params.min_pattern_length == 0 {
        return Err(BopError::invalid_parameter(
            "minPatternLength must be at least 1",
        ));
    }
    if params.max_pattern_length < params.min_pattern_length {
        return Err(BopError::invalid_parameter(
            "maxPatternLength is below minPatternLength",
        ));
    }
    let db = embedding.transactions();
    let options = TopKOptions {
        closed: params.closed_patterns,
        min_length: params.min_pattern_length,
        max_length: params.max_pattern_length,
    };
    let mined = top_k(&db, params.max_patterns_per_partition, options);
    tracing::debug!(
        transactions = db.len(),
        patterns = mined.len(),
        "mined patterns"
    );
    mined
        .into_iter()
        .map(|(support, items)| {
            Ok(MinedPattern {
                support,
                pattern: embedding.decode_items(&items)?,
            })
        })
        .collect()
}
