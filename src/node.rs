//! The knowledge node: one observed, classified piece of content.
//!
//! Identity is a deterministic function of `(topic, url)` so repeated clicks
//! on the same result fold into one node. Understanding is derived solely from
//! cumulative engagement time against fixed thresholds and never regresses
//! while time only grows.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Seconds of engagement credited per click.
pub const CLICK_CREDIT_SECS: u64 = 30;

/// Cumulative seconds at which a node moves from explored to learning.
pub const LEARNING_THRESHOLD_SECS: u64 = 300;

/// Cumulative seconds at which a node moves from learning to mastered.
pub const MASTERED_THRESHOLD_SECS: u64 = 900;

/// Length of the url fragment inside a node id.
const URL_FRAGMENT_LEN: usize = 12;

/// Difficulty band assigned by the heuristic classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

/// How well the learner knows this node, derived from `time_spent` alone.
///
/// Ordering matters: later variants compare greater, which is what makes
/// "understanding never regresses" expressible as a plain `>=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Understanding {
    Explored,
    Learning,
    Mastered,
}

impl Understanding {
    /// Map cumulative engagement seconds onto an understanding level.
    pub fn from_time_spent(secs: u64) -> Self {
        if secs >= MASTERED_THRESHOLD_SECS {
            Self::Mastered
        } else if secs >= LEARNING_THRESHOLD_SECS {
            Self::Learning
        } else {
            Self::Explored
        }
    }
}

/// Derive the stable node id for a `(topic, url)` pair.
///
/// `topic + '-' + first 12 chars of url-safe base64(url)`. Short and
/// non-cryptographic: two distinct urls can in theory truncate to the same
/// fragment. That collision window is an accepted limitation, kept because
/// the encoding is stable across restarts and cheap to recompute.
pub fn node_id(topic: &str, url: &str) -> String {
    let encoded = URL_SAFE_NO_PAD.encode(url.as_bytes());
    let fragment = &encoded[..encoded.len().min(URL_FRAGMENT_LEN)];
    format!("{topic}-{fragment}")
}

/// One classified, tracked piece of observed content.
///
/// Field names serialize in camelCase: the persisted blob format predates
/// this implementation and stays compatible with it. Layout state (position,
/// velocity, pin) is deliberately *not* here — the layout engine owns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeNode {
    pub id: String,
    pub title: String,
    pub url: String,
    pub domain: String,
    pub snippet: String,
    /// The query/topic context this node was discovered under.
    pub topic: String,
    pub difficulty: Difficulty,
    pub category: String,
    /// Timestamp of the most recent click.
    pub clicked_at: DateTime<Utc>,
    /// Cumulative engagement seconds. Monotonically non-decreasing.
    pub time_spent: u64,
    pub understanding: Understanding,
    pub related_topics: Vec<String>,
    pub prerequisites: Vec<String>,
    pub next_steps: Vec<String>,
}

impl KnowledgeNode {
    /// Credit additional engagement seconds and recompute understanding.
    ///
    /// Returns `Some((from, to))` when the level changed. Levels only move
    /// forward because `time_spent` only grows.
    pub fn add_time(&mut self, secs: u64) -> Option<(Understanding, Understanding)> {
        let before = self.understanding;
        self.time_spent += secs;
        let after = Understanding::from_time_spent(self.time_spent);
        self.understanding = after;
        (before != after).then_some((before, after))
    }
}
