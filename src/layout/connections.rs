//! Derivation of the graph's connection set from the current node snapshot.
//!
//! Connections are a pure function of nodes + paths: fully rebuilt on every
//! change, never incrementally patched, never persisted. Deleting a node
//! therefore removes every edge touching it for free. The result is a
//! best-effort heuristic graph, not a guaranteed-correct dependency graph.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::node::KnowledgeNode;
use crate::path::LearningPath;

/// Spring strength for a shared-related-topic edge.
const RELATED_STRENGTH: f32 = 0.5;
/// Spring strength for a prerequisite edge.
const PREREQUISITE_STRENGTH: f32 = 0.8;
/// Spring strength for a consecutive-in-path edge.
const NEXT_STEP_STRENGTH: f32 = 0.7;

/// Why two nodes are connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionKind {
    Related,
    Prerequisite,
    NextStep,
}

/// One derived edge between two node ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConnection {
    pub source: String,
    pub target: String,
    /// Spring strength, 0–1.
    pub strength: f32,
    #[serde(rename = "type")]
    pub kind: ConnectionKind,
}

/// Rebuild the full connection set.
///
/// 1. Every distinct pair whose `related_topics` sets intersect gets a
///    `related` edge.
/// 2. Every prerequisite string that appears (case-insensitive substring) in
///    another node's title gets a `prerequisite` edge from the prerequisite
///    node to the dependent one.
/// 3. Every consecutive pair inside a learning path gets a `next_step` edge.
pub fn derive_connections(
    nodes: &[KnowledgeNode],
    paths: &[&LearningPath],
) -> Vec<GraphConnection> {
    let mut connections = Vec::new();

    for (i, a) in nodes.iter().enumerate() {
        for b in &nodes[i + 1..] {
            if topics_intersect(a, b) {
                connections.push(GraphConnection {
                    source: a.id.clone(),
                    target: b.id.clone(),
                    strength: RELATED_STRENGTH,
                    kind: ConnectionKind::Related,
                });
            }
        }
    }

    for dependent in nodes {
        for prereq in &dependent.prerequisites {
            let needle = prereq.to_lowercase();
            let found = nodes
                .iter()
                .find(|n| n.id != dependent.id && n.title.to_lowercase().contains(&needle));
            if let Some(provider) = found {
                connections.push(GraphConnection {
                    source: provider.id.clone(),
                    target: dependent.id.clone(),
                    strength: PREREQUISITE_STRENGTH,
                    kind: ConnectionKind::Prerequisite,
                });
            }
        }
    }

    // Path membership can momentarily reference ids mid-cascade; only live
    // endpoints produce edges.
    let live: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    for path in paths {
        for pair in path.nodes.windows(2) {
            if live.contains(pair[0].as_str()) && live.contains(pair[1].as_str()) {
                connections.push(GraphConnection {
                    source: pair[0].clone(),
                    target: pair[1].clone(),
                    strength: NEXT_STEP_STRENGTH,
                    kind: ConnectionKind::NextStep,
                });
            }
        }
    }

    connections
}

fn topics_intersect(a: &KnowledgeNode, b: &KnowledgeNode) -> bool {
    a.related_topics
        .iter()
        .any(|t| b.related_topics.contains(t))
}
