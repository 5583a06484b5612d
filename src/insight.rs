//! Advisory insights derived from node creation and understanding changes.
//!
//! Insights are best-effort nudges, never load-bearing state. They live in a
//! fixed-capacity ring buffer (oldest evicted first) so a long-lived session
//! cannot grow the collection without bound.

use std::collections::{HashSet, VecDeque};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::node::{Difficulty, KnowledgeNode, Understanding};

/// Default ring-buffer capacity.
pub const DEFAULT_INSIGHT_CAP: usize = 50;

/// What kind of advice an insight carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    Prerequisite,
    NextTopic,
    Gap,
    Achievement,
}

/// How urgently the advice should surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightPriority {
    Low,
    Medium,
    High,
}

/// One advisory record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeInsight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    pub priority: InsightPriority,
    pub created_at: DateTime<Utc>,
}

/// Evaluates insight rules and holds the capped buffer.
///
/// Rules fire independently: a single event may emit anywhere from zero to
/// three insights.
#[derive(Debug)]
pub struct InsightEngine {
    buffer: VecDeque<KnowledgeInsight>,
    cap: usize,
    /// Node ids that already produced an achievement, so repeated
    /// recomputations once mastered stay silent.
    achieved: HashSet<String>,
}

impl InsightEngine {
    pub fn new(cap: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(cap),
            cap,
            achieved: HashSet::new(),
        }
    }

    /// Rebuild from a persisted insight list (oldest first).
    pub fn from_list(cap: usize, list: Vec<KnowledgeInsight>) -> Self {
        let mut engine = Self::new(cap);
        for insight in list {
            engine.push(insight);
        }
        engine
    }

    fn push(&mut self, insight: KnowledgeInsight) {
        if self.buffer.len() == self.cap {
            self.buffer.pop_front();
        }
        self.buffer.push_back(insight);
    }

    fn emit(
        &mut self,
        kind: InsightKind,
        priority: InsightPriority,
        message: String,
        action: Option<String>,
    ) {
        self.push(KnowledgeInsight {
            kind,
            message,
            action,
            priority,
            created_at: Utc::now(),
        });
    }

    /// Evaluate the creation rules for a freshly tracked node.
    ///
    /// `topic_has_mastery` reports whether any existing node under the same
    /// topic is already mastered; it feeds the gap rule.
    pub fn on_node_created(&mut self, node: &KnowledgeNode, topic_has_mastery: bool) {
        if !node.prerequisites.is_empty() {
            self.emit(
                InsightKind::Prerequisite,
                InsightPriority::Medium,
                format!(
                    "Before diving into \"{}\", consider reviewing: {}",
                    node.title,
                    node.prerequisites.join(", ")
                ),
                Some(node.prerequisites[0].clone()),
            );
        }
        if !node.next_steps.is_empty() {
            self.emit(
                InsightKind::NextTopic,
                InsightPriority::High,
                format!("After \"{}\", a natural next step: {}", node.title, node.next_steps.join(", ")),
                Some(node.next_steps[0].clone()),
            );
        }
        if node.difficulty == Difficulty::Advanced && !topic_has_mastery {
            self.emit(
                InsightKind::Gap,
                InsightPriority::Medium,
                format!(
                    "\"{}\" is advanced material and nothing under \"{}\" is mastered yet — \
                     shoring up the fundamentals first may help",
                    node.title, node.topic
                ),
                Some(format!("{} fundamentals", node.topic)),
            );
        }
    }

    /// Evaluate the transition rule when a node's understanding moves.
    ///
    /// Only the arrival at mastered emits; the guard set keeps it to exactly
    /// one achievement per node even across restarts of the transition.
    pub fn on_understanding_changed(&mut self, node: &KnowledgeNode, to: Understanding) {
        if to == Understanding::Mastered && self.achieved.insert(node.id.clone()) {
            self.emit(
                InsightKind::Achievement,
                InsightPriority::High,
                format!("You mastered \"{}\" — {} seconds of focused time", node.title, node.time_spent),
                None,
            );
        }
    }

    /// Most-recent-first, optionally capped at `limit`.
    pub fn insights(&self, limit: Option<usize>) -> Vec<KnowledgeInsight> {
        let take = limit.unwrap_or(self.buffer.len());
        self.buffer.iter().rev().take(take).cloned().collect()
    }

    /// Oldest-first plain list for the persistence blob.
    pub fn to_list(&self) -> Vec<KnowledgeInsight> {
        self.buffer.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new(DEFAULT_INSIGHT_CAP)
    }
}
