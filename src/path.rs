//! Per-topic learning paths, built incrementally as nodes arrive.
//!
//! A path is created lazily on the first node for its topic and never deleted
//! automatically. Progress is count-based by design — `min(10 × nodes, 100)` —
//! not mastery-weighted; that formula is a documented behavior, not a defect.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::node::KnowledgeNode;

/// Aggregation of the nodes sharing one topic.
///
/// `nodes` holds ids in discovery order; the path never owns node state.
/// Serialized in camelCase for compatibility with the pre-existing blob format.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningPath {
    /// The topic string doubles as the path id.
    pub id: String,
    pub nodes: Vec<String>,
    /// 0–100, `min(10 × node count, 100)`.
    pub progress: u8,
    /// Sum of member nodes' `time_spent` at the moment each was aggregated.
    pub total_time_spent: u64,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl LearningPath {
    fn new(topic: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: topic.to_string(),
            nodes: Vec::new(),
            progress: 0,
            total_time_spent: 0,
            created_at: now,
            last_updated: now,
        }
    }

    fn recompute_progress(&mut self) {
        self.progress = (self.nodes.len() as u64 * 10).min(100) as u8;
    }
}

/// Maintains one [`LearningPath`] per topic, keyed with insertion order
/// preserved so the persisted blob round-trips deterministically.
#[derive(Debug, Default)]
pub struct PathBuilder {
    paths: HashMap<String, LearningPath>,
    order: Vec<String>,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from a persisted collection (ordered id→path pairs).
    pub fn from_pairs(pairs: Vec<(String, LearningPath)>) -> Self {
        let mut builder = Self::new();
        for (id, path) in pairs {
            builder.order.push(id.clone());
            builder.paths.insert(id, path);
        }
        builder
    }

    /// Lazily create the topic's path and fold the node into it.
    ///
    /// `total_time_spent` accumulates `credited_secs` — the engagement
    /// credited by this click — not the node's running `time_spent` total,
    /// which would re-count earlier credits on every revisit. Re-observed
    /// nodes are not appended twice, but the revisit still credits into
    /// `total_time_spent` and refreshes `last_updated`.
    pub fn ensure_and_update(&mut self, topic: &str, node: &KnowledgeNode, credited_secs: u64) {
        let now = Utc::now();
        let path = match self.paths.entry(topic.to_string()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                self.order.push(topic.to_string());
                entry.insert(LearningPath::new(topic, now))
            }
        };
        if !path.nodes.iter().any(|id| id == &node.id) {
            path.nodes.push(node.id.clone());
        }
        path.total_time_spent += credited_secs;
        path.recompute_progress();
        path.last_updated = now;
    }

    /// Drop every reference to a deleted node. Paths themselves survive,
    /// possibly empty.
    pub fn remove_node(&mut self, node_id: &str) {
        for path in self.paths.values_mut() {
            let before = path.nodes.len();
            path.nodes.retain(|id| id != node_id);
            if path.nodes.len() != before {
                path.recompute_progress();
                path.last_updated = Utc::now();
            }
        }
    }

    pub fn get(&self, topic: &str) -> Option<&LearningPath> {
        self.paths.get(topic)
    }

    /// All paths in creation order.
    pub fn all(&self) -> Vec<&LearningPath> {
        self.order.iter().filter_map(|id| self.paths.get(id)).collect()
    }

    /// Ordered id→path pairs for the persistence blob.
    pub fn to_pairs(&self) -> Vec<(String, LearningPath)> {
        self.order
            .iter()
            .filter_map(|id| self.paths.get(id).map(|p| (id.clone(), p.clone())))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
