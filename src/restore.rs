use crate::errors::BopError;
use crate::graph::AttributedGraph;
use crate::partition::Partition;

/// Adds every node one incoming or outgoing edge away from the partition.
///
/// Nothing is removed, so the result is a superset of `partition` with the
/// original members first.
pub fn restore_partition(
    graph: &AttributedGraph,
    partition: &Partition,
) -> Result<Partition, BopError> {
    let mut restored = partition.clone();
    for node in partition {
        let record = graph.get_node(*node)?;
        for edge in &record.outgoing {
            restored.insert(graph.edge(*edge).target);
        }
        for edge in &record.incoming {
            restored.insert(graph.edge(*edge).source);
        }
    }
    Ok(restored)
}

pub fn restore_partitions(
    graph: &AttributedGraph,
    partitions: &[Partition],
) -> Result<Vec<Partition>, BopError> {
    partitions
        .iter()
        .map(|partition| restore_partition(graph, partition))
        .collect()
}
