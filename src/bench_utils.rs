use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::errors::BopError;
use crate::graph::{AttributedGraph, ElementSpec, GraphBuilder};

/// Type labels drawn for generated nodes.
pub const NODE_TYPES: [&str; 4] = ["class", "method", "field", "package"];

#[derive(Clone, Debug)]
pub enum GraphShape {
    Line,
    Star,
    Grid2D { width: usize, height: usize },
    RandomErdosRenyi { edges: usize },
    ScaleFree { m: usize },
}

impl GraphShape {
    fn tag(&self) -> &'static str {
        match self {
            GraphShape::Line => "line",
            GraphShape::Star => "star",
            GraphShape::Grid2D { .. } => "grid",
            GraphShape::RandomErdosRenyi { .. } => "er",
            GraphShape::ScaleFree { .. } => "sf",
        }
    }
}

/// Deterministic synthetic graph: node `i` gets id `n{i}` and a seeded type.
pub fn generate_graph(
    shape: GraphShape,
    node_count: usize,
    seed: u64,
) -> Result<AttributedGraph, BopError> {
    if node_count < 2 {
        return Err(BopError::invalid_parameter("node_count must exceed 1"));
    }
    let tag = shape.tag();
    let mut pairs = match shape {
        GraphShape::Line => line_pairs(node_count),
        GraphShape::Star => star_pairs(node_count),
        GraphShape::Grid2D { width, height } => grid_pairs(width, height, node_count)?,
        GraphShape::RandomErdosRenyi { edges } => random_pairs(node_count, edges, seed)?,
        GraphShape::ScaleFree { m } => scale_free_pairs(node_count, m, seed)?,
    };
    pairs.sort_unstable();

    let mut rng = StdRng::seed_from_u64(seed ^ 0x5eed);
    let mut builder = GraphBuilder::new();
    let mut handles = Vec::with_capacity(node_count);
    for idx in 0..node_count {
        let type_label = NODE_TYPES[rng.gen_range(0..NODE_TYPES.len())];
        handles.push(
            builder.add_node(
                ElementSpec::new(type_label)
                    .with_id(format!("n{idx}"))
                    .with_name(format!("Node{idx}"))
                    .with_type(type_label)
                    .with_attr("idx", idx.to_string()),
            )?,
        );
    }
    for (from, to) in pairs {
        builder.edge(handles[from], handles[to], tag)?;
    }
    Ok(builder.build())
}

fn line_pairs(count: usize) -> Vec<(usize, usize)> {
    (0..count - 1).map(|idx| (idx, idx + 1)).collect()
}

fn star_pairs(count: usize) -> Vec<(usize, usize)> {
    (1..count).map(|leaf| (0, leaf)).collect()
}

fn grid_pairs(width: usize, height: usize, node_count: usize) -> Result<Vec<(usize, usize)>, BopError> {
    if width * height != node_count {
        return Err(BopError::invalid_parameter(
            "grid dimensions must match node count",
        ));
    }
    let mut pairs = Vec::with_capacity(width * height * 2);
    for y in 0..height {
        for x in 0..width {
            let base = y * width + x;
            if x + 1 < width {
                pairs.push((base, base + 1));
            }
            if y + 1 < height {
                pairs.push((base, base + width));
            }
        }
    }
    Ok(pairs)
}

fn random_pairs(node_count: usize, edge_count: usize, seed: u64) -> Result<Vec<(usize, usize)>, BopError> {
    let total_pairs = pair_count(node_count);
    if edge_count as u128 > total_pairs {
        return Err(BopError::invalid_parameter("edge_count exceeds possible pairs"));
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut pairs = Vec::with_capacity(edge_count);
    let mut idx = 0u64;
    let mut remaining_edges = edge_count as u64;
    while remaining_edges > 0 && idx < total_pairs as u64 {
        let remaining_pairs = total_pairs as u64 - idx;
        let p = remaining_edges as f64 / remaining_pairs as f64;
        idx += sample_geometric(&mut rng, p);
        if idx >= total_pairs as u64 {
            break;
        }
        let (from, to) = pair_from_index(idx, node_count as u64);
        pairs.push((from as usize, to as usize));
        idx += 1;
        remaining_edges -= 1;
    }
    Ok(pairs)
}

/// Preferential attachment: each new node links to `m` distinct earlier nodes.
fn scale_free_pairs(node_count: usize, m: usize, seed: u64) -> Result<Vec<(usize, usize)>, BopError> {
    if m == 0 || node_count <= m + 1 {
        return Err(BopError::invalid_parameter(
            "scale-free graphs need m > 0 and node_count > m + 1",
        ));
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut degrees = vec![0usize; node_count];
    let mut pairs = Vec::new();
    let seed_nodes = m + 1;
    for u in 0..seed_nodes {
        for v in (u + 1)..seed_nodes {
            pairs.push((u, v));
            degrees[u] += 1;
            degrees[v] += 1;
        }
    }
    let mut total_degree: usize = degrees.iter().sum();
    for new_node in seed_nodes..node_count {
        let mut targets: Vec<usize> = Vec::with_capacity(m);
        while targets.len() < m {
            let pick = rng.gen_range(0..total_degree);
            let mut cumulative = 0usize;
            for (candidate, degree) in degrees.iter().enumerate().take(new_node) {
                cumulative += degree;
                if pick < cumulative {
                    if !targets.contains(&candidate) {
                        targets.push(candidate);
                    }
                    break;
                }
            }
        }
        targets.sort_unstable();
        for target in targets {
            pairs.push((target, new_node));
            degrees[target] += 1;
            degrees[new_node] += 1;
            total_degree += 2;
        }
    }
    Ok(pairs)
}

fn pair_count(nodes: usize) -> u128 {
    let n = nodes as u128;
    n * (n - 1) / 2
}

fn sample_geometric(rng: &mut StdRng, p: f64) -> u64 {
    if p >= 1.0 {
        return 0;
    }
    let u = rng.r#gen::<f64>().max(f64::MIN_POSITIVE);
    ((u.ln() / (1.0 - p).ln()).floor().max(0.0)) as u64
}

fn pair_from_index(idx: u64, nodes: u64) -> (u64, u64) {
    let mut left = 0;
    let mut start = 0u64;
    while left < nodes - 1 {
        let remaining = nodes - left - 1;
        if idx < start + remaining {
            return (left, left + 1 + (idx - start));
        }
        start += remaining;
        left += 1;
    }
    (nodes - 2, nodes - 1)
}
