//! Engine facade: top-level API for the sebayt subsystem.
//!
//! `SebaytEngine` owns all components — knowledge store, path builder,
//! insight engine, layout engine, change bus, optional archive — and wires
//! the data flow: click → classify → store → paths/insights/layout → bus →
//! persist. Construct it once at application start and inject it into
//! consumers; all mutation flows through `&mut self`, so there is exactly one
//! writer.

use std::path::PathBuf;

use crate::bus::{ChangeBus, KnowledgeEvent, Subscription};
use crate::error::SebaytResult;
use crate::insight::{DEFAULT_INSIGHT_CAP, InsightEngine, KnowledgeInsight};
use crate::layout::{GraphLayoutEngine, LayoutSnapshot, PointerState, SimConfig};
use crate::node::KnowledgeNode;
use crate::path::{LearningPath, PathBuilder};
use crate::persist::KnowledgeArchive;
use crate::search::SearchResult;
use crate::store::{KnowledgeStats, KnowledgeStore, TrackOutcome};

/// Configuration for the sebayt engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Data directory for persistence. `None` for memory-only mode.
    pub data_dir: Option<PathBuf>,
    /// Insight ring-buffer capacity.
    pub insight_capacity: usize,
    /// Physics and canvas constants for the layout engine.
    pub sim: SimConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            insight_capacity: DEFAULT_INSIGHT_CAP,
            sim: SimConfig::default(),
        }
    }
}

/// The knowledge tracking and graph-layout engine.
pub struct SebaytEngine {
    store: KnowledgeStore,
    paths: PathBuilder,
    insights: InsightEngine,
    layout: GraphLayoutEngine,
    bus: ChangeBus,
    archive: Option<KnowledgeArchive>,
}

impl SebaytEngine {
    /// Open an engine, restoring persisted state when a data directory is
    /// configured.
    ///
    /// Each of the three blobs loads independently; a blob that fails to load
    /// is logged and its store starts empty. Only a failure to open the
    /// archive itself is surfaced.
    pub fn open(config: EngineConfig) -> SebaytResult<Self> {
        let archive = match &config.data_dir {
            Some(dir) => Some(KnowledgeArchive::open(dir)?),
            None => None,
        };

        let mut store = KnowledgeStore::new();
        let mut paths = PathBuilder::new();
        let mut insights = InsightEngine::new(config.insight_capacity);

        if let Some(archive) = &archive {
            match archive.load_nodes() {
                Ok(Some(pairs)) => store = KnowledgeStore::from_pairs(pairs),
                Ok(None) => {}
                Err(e) => tracing::warn!(error = %e, "node blob failed to load, starting empty"),
            }
            match archive.load_paths() {
                Ok(Some(pairs)) => paths = PathBuilder::from_pairs(pairs),
                Ok(None) => {}
                Err(e) => tracing::warn!(error = %e, "path blob failed to load, starting empty"),
            }
            match archive.load_insights() {
                Ok(Some(list)) => insights = InsightEngine::from_list(config.insight_capacity, list),
                Ok(None) => {}
                Err(e) => tracing::warn!(error = %e, "insight blob failed to load, starting empty"),
            }
        }

        tracing::info!(
            nodes = store.len(),
            paths = paths.len(),
            persistent = archive.is_some(),
            "sebayt engine ready"
        );

        let mut layout = GraphLayoutEngine::new(config.sim.clone());
        layout.refresh(store.all_nodes(), &paths.all());

        Ok(Self {
            store,
            paths,
            insights,
            layout,
            bus: ChangeBus::new(),
            archive,
        })
    }

    // -- mutations ----------------------------------------------------------

    /// Record a search-result click under a topic.
    ///
    /// First click creates and classifies a node; repeat clicks fold into the
    /// existing one. A record with an unparseable url is a typed soft failure
    /// and leaves every store untouched.
    pub fn track_click(
        &mut self,
        result: &SearchResult,
        topic: &str,
    ) -> SebaytResult<KnowledgeNode> {
        let (node, outcome) = self.store.track_click(result, topic)?;
        self.paths
            .ensure_and_update(topic, &node, crate::node::CLICK_CREDIT_SECS);

        match outcome {
            TrackOutcome::Created => {
                // The fresh node is explored; mastery can only come from the
                // topic's other nodes.
                let topic_has_mastery = self.store.topic_has_mastery(topic);
                self.insights.on_node_created(&node, topic_has_mastery);
                self.bus
                    .notify(&KnowledgeEvent::NodeCreated { node: node.clone() });
            }
            TrackOutcome::Revisited { transition } => {
                if let Some((from, to)) = transition {
                    self.insights.on_understanding_changed(&node, to);
                    self.bus.notify(&KnowledgeEvent::UnderstandingChanged {
                        id: node.id.clone(),
                        from,
                        to,
                    });
                }
                self.bus
                    .notify(&KnowledgeEvent::NodeRevisited { node: node.clone() });
            }
        }

        self.refresh_layout();
        self.persist_nodes();
        self.persist_paths();
        self.persist_insights();
        Ok(node)
    }

    /// Credit engagement seconds against a node.
    ///
    /// A missing id is a silent no-op: reading-time callbacks are scheduled
    /// externally and may arrive after the node was deleted.
    pub fn update_time_spent(&mut self, id: &str, secs: u64) {
        let Some(update) = self.store.update_time_spent(id, secs) else {
            return;
        };
        if let Some((from, to)) = update.transition {
            self.insights.on_understanding_changed(&update.node, to);
            self.bus.notify(&KnowledgeEvent::UnderstandingChanged {
                id: update.node.id.clone(),
                from,
                to,
            });
            self.persist_insights();
        }
        self.persist_nodes();
    }

    /// Delete a node, cascading into path references and derived connections.
    /// Missing ids are a no-op.
    pub fn delete_node(&mut self, id: &str) {
        if !self.store.delete_node(id) {
            return;
        }
        self.paths.remove_node(id);
        self.refresh_layout();
        self.bus
            .notify(&KnowledgeEvent::NodeDeleted { id: id.to_string() });
        self.persist_nodes();
        self.persist_paths();
    }

    // -- reads --------------------------------------------------------------

    pub fn get_node(&self, id: &str) -> Option<&KnowledgeNode> {
        self.store.get(id)
    }

    pub fn all_nodes(&self) -> &[KnowledgeNode] {
        self.store.all_nodes()
    }

    pub fn all_learning_paths(&self) -> Vec<&LearningPath> {
        self.paths.all()
    }

    /// Most-recent-first insights, optionally capped at `limit`.
    pub fn insights(&self, limit: Option<usize>) -> Vec<KnowledgeInsight> {
        self.insights.insights(limit)
    }

    pub fn knowledge_stats(&self) -> KnowledgeStats {
        self.store.stats()
    }

    // -- layout & interaction ----------------------------------------------

    /// Advance the force simulation one animation tick.
    pub fn tick(&mut self) {
        self.layout.tick();
    }

    /// Read-only position/connection snapshot for the renderer.
    pub fn layout_snapshot(&self) -> LayoutSnapshot {
        self.layout.snapshot()
    }

    /// Pointer pressed; returns the grabbed node id when a drag started.
    pub fn pointer_down(&mut self, x: f32, y: f32) -> Option<String> {
        self.layout.pointer_down(x, y)
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.layout.pointer_move(x, y);
    }

    pub fn pointer_up(&mut self) {
        self.layout.pointer_up();
    }

    pub fn wheel(&mut self, delta_y: f32) {
        self.layout.wheel(delta_y);
    }

    pub fn pointer_state(&self) -> &PointerState {
        self.layout.pointer_state()
    }

    // -- change propagation -------------------------------------------------

    /// Subscribe to knowledge events. Drop the returned handle (or call
    /// `unsubscribe`) to stop receiving them.
    pub fn subscribe(
        &self,
        listener: impl Fn(&KnowledgeEvent) + Send + Sync + 'static,
    ) -> Subscription {
        self.bus.subscribe(listener)
    }

    // -- internals ----------------------------------------------------------

    fn refresh_layout(&mut self) {
        self.layout
            .refresh(self.store.all_nodes(), &self.paths.all());
    }

    // Persistence is fire-and-forget: failures are logged and in-memory state
    // keeps operating. The three blobs save independently; one failing never
    // rolls back the others.

    fn persist_nodes(&self) {
        if let Some(archive) = &self.archive {
            if let Err(e) = archive.save_nodes(&self.store.to_pairs()) {
                tracing::warn!(error = %e, "failed to persist node collection");
            }
        }
    }

    fn persist_paths(&self) {
        if let Some(archive) = &self.archive {
            if let Err(e) = archive.save_paths(&self.paths.to_pairs()) {
                tracing::warn!(error = %e, "failed to persist path collection");
            }
        }
    }

    fn persist_insights(&self) {
        if let Some(archive) = &self.archive {
            if let Err(e) = archive.save_insights(&self.insights.to_list()) {
                tracing::warn!(error = %e, "failed to persist insight list");
            }
        }
    }
}

impl std::fmt::Debug for SebaytEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SebaytEngine")
            .field("nodes", &self.store.len())
            .field("paths", &self.paths.len())
            .field("insights", &self.insights.len())
            .field("persistent", &self.archive.is_some())
            .finish()
    }
}
