//! The canonical knowledge-node collection.
//!
//! [`KnowledgeStore`] exclusively owns node identity and lifecycle. Nodes live
//! in a dense vector (the physics loop iterates them contiguously) with an
//! id→index map kept alongside for point lookups. Everything else — paths,
//! insights, layout — holds ids into this store, never node state.

use std::collections::{HashMap, HashSet};

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::classify;
use crate::error::InputError;
use crate::node::{CLICK_CREDIT_SECS, KnowledgeNode, Understanding, node_id};
use crate::search::SearchResult;

/// Whether a click landed on a new node or an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackOutcome {
    Created,
    /// The +30 s revisit credit can itself cross an understanding threshold.
    Revisited {
        transition: Option<(Understanding, Understanding)>,
    },
}

/// Result of a successful `update_time_spent` on a live node.
#[derive(Debug, Clone)]
pub struct TimeUpdate {
    pub node: KnowledgeNode,
    /// Present when the credited time crossed an understanding threshold.
    pub transition: Option<(Understanding, Understanding)>,
}

/// Aggregate view over the whole store, for the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeStats {
    pub total_nodes: usize,
    pub total_time_spent: u64,
    pub topics_explored: usize,
    /// Share of nodes at mastered, 0–100. Zero for an empty store.
    pub mastery_percent: f32,
    /// Consecutive recent days with at least one click.
    pub learning_streak_days: u32,
}

/// Owns the canonical set of knowledge nodes.
#[derive(Debug, Default)]
pub struct KnowledgeStore {
    nodes: Vec<KnowledgeNode>,
    index: HashMap<String, usize>,
}

impl KnowledgeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from a persisted collection (ordered id→node pairs).
    ///
    /// Pairs whose key disagrees with the node's own id are trusted on the
    /// node side; the key exists only for blob-format compatibility.
    pub fn from_pairs(pairs: Vec<(String, KnowledgeNode)>) -> Self {
        let mut store = Self::new();
        for (_, node) in pairs {
            store.index.insert(node.id.clone(), store.nodes.len());
            store.nodes.push(node);
        }
        store
    }

    /// Ordered id→node pairs for the persistence blob.
    pub fn to_pairs(&self) -> Vec<(String, KnowledgeNode)> {
        self.nodes
            .iter()
            .map(|n| (n.id.clone(), n.clone()))
            .collect()
    }

    /// Record a click on a search result under a topic.
    ///
    /// Validates the record first — a bad url is a typed soft failure and no
    /// node is created. A first click classifies and creates the node with
    /// 30 s credited; a repeat click folds into the existing node: +30 s,
    /// refreshed `clicked_at`, no duplicate.
    pub fn track_click(
        &mut self,
        result: &SearchResult,
        topic: &str,
    ) -> Result<(KnowledgeNode, TrackOutcome), InputError> {
        result.validate()?;
        let id = node_id(topic, &result.url);

        if let Some(&slot) = self.index.get(&id) {
            let node = &mut self.nodes[slot];
            let transition = node.add_time(CLICK_CREDIT_SECS);
            node.clicked_at = Utc::now();
            return Ok((node.clone(), TrackOutcome::Revisited { transition }));
        }

        let node = KnowledgeNode {
            id: id.clone(),
            title: result.title.clone(),
            url: result.url.clone(),
            domain: result.domain.clone(),
            snippet: result.snippet.clone(),
            topic: topic.to_string(),
            difficulty: classify::assess_difficulty(result),
            category: classify::categorize(result).to_string(),
            clicked_at: Utc::now(),
            time_spent: CLICK_CREDIT_SECS,
            understanding: Understanding::Explored,
            related_topics: classify::extract_related_topics(result),
            prerequisites: classify::identify_prerequisites(result, topic),
            next_steps: classify::suggest_next_steps(result, topic),
        };
        self.index.insert(id, self.nodes.len());
        self.nodes.push(node.clone());
        Ok((node, TrackOutcome::Created))
    }

    /// Credit engagement seconds against a node.
    ///
    /// Silently a no-op when the node no longer exists: reading-time callbacks
    /// are externally scheduled and may race a deletion.
    pub fn update_time_spent(&mut self, id: &str, secs: u64) -> Option<TimeUpdate> {
        let slot = *self.index.get(id)?;
        let node = &mut self.nodes[slot];
        let transition = node.add_time(secs);
        Some(TimeUpdate {
            node: node.clone(),
            transition,
        })
    }

    /// Remove a node. Returns whether it existed. The caller cascades the
    /// removal into paths and the derived connection set.
    pub fn delete_node(&mut self, id: &str) -> bool {
        let Some(slot) = self.index.remove(id) else {
            return false;
        };
        self.nodes.swap_remove(slot);
        if let Some(moved) = self.nodes.get(slot) {
            self.index.insert(moved.id.clone(), slot);
        }
        true
    }

    pub fn get(&self, id: &str) -> Option<&KnowledgeNode> {
        self.index.get(id).map(|&slot| &self.nodes[slot])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// The dense node slice, in storage order.
    pub fn all_nodes(&self) -> &[KnowledgeNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether any node under `topic` is already mastered.
    pub fn topic_has_mastery(&self, topic: &str) -> bool {
        self.nodes
            .iter()
            .any(|n| n.topic == topic && n.understanding == Understanding::Mastered)
    }

    /// Aggregate stats as of `today` (injectable for tests).
    pub fn stats_as_of(&self, today: NaiveDate) -> KnowledgeStats {
        let total_nodes = self.nodes.len();
        let total_time_spent = self.nodes.iter().map(|n| n.time_spent).sum();
        let topics: HashSet<&str> = self.nodes.iter().map(|n| n.topic.as_str()).collect();
        let mastered = self
            .nodes
            .iter()
            .filter(|n| n.understanding == Understanding::Mastered)
            .count();
        let mastery_percent = if total_nodes == 0 {
            0.0
        } else {
            mastered as f32 / total_nodes as f32 * 100.0
        };
        let active_days: HashSet<NaiveDate> =
            self.nodes.iter().map(|n| n.clicked_at.date_naive()).collect();
        KnowledgeStats {
            total_nodes,
            total_time_spent,
            topics_explored: topics.len(),
            mastery_percent,
            learning_streak_days: learning_streak_days(&active_days, today),
        }
    }

    pub fn stats(&self) -> KnowledgeStats {
        self.stats_as_of(Utc::now().date_naive())
    }
}

/// Count consecutive active days walking back from `today`.
///
/// A streak that hasn't been extended today still counts if yesterday was
/// active — it only breaks once a full day is missed.
pub fn learning_streak_days(active_days: &HashSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut cursor = if active_days.contains(&today) {
        today
    } else {
        let yesterday = today.pred_opt().unwrap_or(today);
        if !active_days.contains(&yesterday) {
            return 0;
        }
        yesterday
    };
    let mut streak = 0;
    while active_days.contains(&cursor) {
        streak += 1;
        match cursor.pred_opt() {
            Some(prev) => cursor = prev,
            None => break,
        }
    }
    streak
}
