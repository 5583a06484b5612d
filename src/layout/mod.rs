//! Interactive force-directed layout for the knowledge graph.
//!
//! [`GraphLayoutEngine`] composes three parts:
//!
//! - [`connections`] — the derived edge set, fully rebuilt on node changes
//! - [`sim`] — the per-tick physics (repulsion, springs, damping, bounds)
//! - [`interact`] — pointer state machine, pan, and zoom
//!
//! The engine owns an internal position buffer updated every tick; the
//! renderer reads a read-only [`LayoutSnapshot`] at whatever cadence it
//! likes, decoupled from the physics rate.

pub mod connections;
pub mod interact;
pub mod sim;

use serde::{Deserialize, Serialize};

use crate::node::KnowledgeNode;
use crate::path::LearningPath;

pub use connections::{ConnectionKind, GraphConnection, derive_connections};
pub use interact::{InteractionController, PointerState, Viewport};
pub use sim::{LayoutNode, SimConfig, Simulation};

/// Read-only per-tick view for the renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSnapshot {
    pub positions: Vec<NodePosition>,
    pub connections: Vec<GraphConnection>,
    pub pan_x: f32,
    pub pan_y: f32,
    pub zoom: f32,
}

/// One node's world-space position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodePosition {
    pub id: String,
    pub x: f32,
    pub y: f32,
}

/// Owns the derived connection set and all layout-only node state.
#[derive(Debug, Default)]
pub struct GraphLayoutEngine {
    config: SimConfig,
    simulation: Simulation,
    connections: Vec<GraphConnection>,
    interaction: InteractionController,
}

impl GraphLayoutEngine {
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            simulation: Simulation::new(),
            connections: Vec::new(),
            interaction: InteractionController::new(),
        }
    }

    /// React to a change in the canonical node set: reconcile the position
    /// buffer and rebuild the connection set from scratch.
    pub fn refresh(&mut self, nodes: &[KnowledgeNode], paths: &[&LearningPath]) {
        let removed = self.simulation.sync(nodes, &self.config);
        self.interaction.node_removed(&removed);
        self.connections = derive_connections(nodes, paths);
    }

    /// Advance the physics one animation tick.
    pub fn tick(&mut self) {
        self.simulation.step(&self.connections, &self.config);
    }

    /// Cheap read-only view for the renderer.
    pub fn snapshot(&self) -> LayoutSnapshot {
        let viewport = self.interaction.viewport();
        LayoutSnapshot {
            positions: self
                .simulation
                .nodes()
                .iter()
                .map(|n| NodePosition {
                    id: n.id.clone(),
                    x: n.x,
                    y: n.y,
                })
                .collect(),
            connections: self.connections.clone(),
            pan_x: viewport.pan_x,
            pan_y: viewport.pan_y,
            zoom: viewport.zoom,
        }
    }

    pub fn connections(&self) -> &[GraphConnection] {
        &self.connections
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) -> Option<String> {
        self.interaction.pointer_down(x, y, &mut self.simulation)
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.interaction.pointer_move(x, y, &mut self.simulation);
    }

    pub fn pointer_up(&mut self) {
        self.interaction.pointer_up(&mut self.simulation);
    }

    pub fn wheel(&mut self, delta_y: f32) {
        self.interaction.wheel(delta_y);
    }

    pub fn pointer_state(&self) -> &PointerState {
        self.interaction.state()
    }
}
