//! Force-directed simulation over the layout node buffer.
//!
//! One [`Simulation::step`] per animation tick: pairwise repulsion, spring
//! attraction along the derived connections, velocity damping, Euler
//! integration, bounds clamp. Pinned nodes skip the physics and take the
//! pointer-derived position, clamped to the same bounds as free nodes. The
//! repulsion pass is O(n²) per tick,
//! fine at the expected scale of tens to low hundreds of nodes; spatial
//! partitioning is a future optimization, not part of this design.

use std::collections::HashMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::node::KnowledgeNode;

use super::connections::GraphConnection;

/// Physics and viewport constants for the simulation.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Canvas extent in pixels.
    pub width: f32,
    pub height: f32,
    /// Positions are clamped this far inside the canvas edges.
    pub margin: f32,
    /// Repulsion constant `k` in `k / d²`.
    pub repulsion: f32,
    /// Per-tick velocity multiplier.
    pub damping: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            margin: 40.0,
            repulsion: 2000.0,
            damping: 0.9,
        }
    }
}

/// Layout-only state for one node. Owned here, never by the knowledge store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutNode {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Pointer-derived target while the user drags this node.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pin: Option<(f32, f32)>,
}

/// Dense node buffer plus the physics stepper.
#[derive(Debug, Default)]
pub struct Simulation {
    nodes: Vec<LayoutNode>,
    index: HashMap<String, usize>,
}

impl Simulation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconcile the buffer with the store's current node snapshot.
    ///
    /// Surviving nodes keep their position and velocity; new nodes spawn
    /// jittered around the canvas center so coincident spawns don't stack;
    /// deleted nodes drop out (a drag pin on a deleted node disappears with
    /// it). Returns the ids that were removed.
    pub fn sync(&mut self, current: &[KnowledgeNode], config: &SimConfig) -> Vec<String> {
        let mut rng = rand::thread_rng();
        let mut next_nodes = Vec::with_capacity(current.len());
        let mut next_index = HashMap::with_capacity(current.len());

        for node in current {
            let layout = match self.index.get(&node.id) {
                Some(&slot) => self.nodes[slot].clone(),
                None => LayoutNode {
                    id: node.id.clone(),
                    x: config.width / 2.0 + rng.gen_range(-60.0..60.0),
                    y: config.height / 2.0 + rng.gen_range(-60.0..60.0),
                    vx: 0.0,
                    vy: 0.0,
                    pin: None,
                },
            };
            next_index.insert(node.id.clone(), next_nodes.len());
            next_nodes.push(layout);
        }

        let removed = self
            .nodes
            .iter()
            .filter(|n| !next_index.contains_key(&n.id))
            .map(|n| n.id.clone())
            .collect();

        self.nodes = next_nodes;
        self.index = next_index;
        removed
    }

    /// Pin a node to a pointer-derived position. Returns false when the node
    /// no longer exists (deleted mid-drag).
    pub fn pin(&mut self, id: &str, x: f32, y: f32) -> bool {
        match self.index.get(id) {
            Some(&slot) => {
                self.nodes[slot].pin = Some((x, y));
                true
            }
            None => false,
        }
    }

    /// Hand a node back to the simulation.
    pub fn unpin(&mut self, id: &str) {
        if let Some(&slot) = self.index.get(id) {
            self.nodes[slot].pin = None;
            self.nodes[slot].vx = 0.0;
            self.nodes[slot].vy = 0.0;
        }
    }

    pub fn get(&self, id: &str) -> Option<&LayoutNode> {
        self.index.get(id).map(|&slot| &self.nodes[slot])
    }

    pub fn nodes(&self) -> &[LayoutNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Advance the simulation one tick.
    pub fn step(&mut self, connections: &[GraphConnection], config: &SimConfig) {
        let n = self.nodes.len();

        for i in 0..n {
            if let Some((px, py)) = self.nodes[i].pin {
                // Pointer positions obey the same bounds as free nodes.
                self.nodes[i].x = px.clamp(config.margin, config.width - config.margin);
                self.nodes[i].y = py.clamp(config.margin, config.height - config.margin);
                self.nodes[i].vx = 0.0;
                self.nodes[i].vy = 0.0;
                continue;
            }

            let (mut fx, mut fy) = (0.0f32, 0.0f32);

            // Repulsion from every other node.
            for j in 0..n {
                if i == j {
                    continue;
                }
                let (ux, uy, dist) = separation(&self.nodes[i], &self.nodes[j], i, j);
                let force = config.repulsion / (dist * dist);
                fx += ux * force;
                fy += uy * force;
            }

            // Spring attraction along every connection touching this node.
            let id = &self.nodes[i].id;
            for conn in connections {
                let other = if &conn.source == id {
                    &conn.target
                } else if &conn.target == id {
                    &conn.source
                } else {
                    continue;
                };
                let Some(&slot) = self.index.get(other) else {
                    continue;
                };
                let dx = self.nodes[slot].x - self.nodes[i].x;
                let dy = self.nodes[slot].y - self.nodes[i].y;
                let dist = (dx * dx + dy * dy).sqrt().max(1.0);
                let force = conn.strength * dist * 0.01;
                fx += dx / dist * force;
                fy += dy / dist * force;
            }

            let node = &mut self.nodes[i];
            node.vx = (node.vx + fx) * config.damping;
            node.vy = (node.vy + fy) * config.damping;
            node.x += node.vx;
            node.y += node.vy;
            node.x = node.x.clamp(config.margin, config.width - config.margin);
            node.y = node.y.clamp(config.margin, config.height - config.margin);
        }
    }
}

/// Unit vector from `b` toward `a`, plus distance.
///
/// Coincident nodes get a deterministic pseudo-random direction derived from
/// their indices so they push apart instead of dividing by zero.
fn separation(a: &LayoutNode, b: &LayoutNode, ai: usize, bi: usize) -> (f32, f32, f32) {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    let dist_sq = dx * dx + dy * dy;
    if dist_sq < 1e-6 {
        let angle = (ai * 31 + bi * 17) as f32;
        return (angle.cos(), angle.sin(), 1.0);
    }
    let dist = dist_sq.sqrt();
    (dx / dist, dy / dist, dist)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Difficulty, Understanding, node_id};
    use chrono::Utc;

    fn knowledge_node(title: &str) -> KnowledgeNode {
        KnowledgeNode {
            id: node_id("rust", title),
            title: title.into(),
            url: format!("https://example.com/{title}"),
            domain: "example.com".into(),
            snippet: "s".into(),
            topic: "rust".into(),
            difficulty: Difficulty::Intermediate,
            category: "General Knowledge".into(),
            clicked_at: Utc::now(),
            time_spent: 30,
            understanding: Understanding::Explored,
            related_topics: vec![],
            prerequisites: vec![],
            next_steps: vec![],
        }
    }

    fn place(sim: &mut Simulation, id: &str, x: f32, y: f32) {
        let slot = sim.index[id];
        sim.nodes[slot].x = x;
        sim.nodes[slot].y = y;
        sim.nodes[slot].vx = 0.0;
        sim.nodes[slot].vy = 0.0;
    }

    fn dist(sim: &Simulation, a: &str, b: &str) -> f32 {
        let a = sim.get(a).unwrap();
        let b = sim.get(b).unwrap();
        ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
    }

    #[test]
    fn sync_keeps_survivors_adds_new_drops_gone() {
        let config = SimConfig::default();
        let mut sim = Simulation::new();
        let a = knowledge_node("a");
        let b = knowledge_node("b");
        sim.sync(&[a.clone(), b.clone()], &config);
        place(&mut sim, &a.id, 100.0, 100.0);

        let c = knowledge_node("c");
        let removed = sim.sync(&[a.clone(), c.clone()], &config);
        assert_eq!(removed, vec![b.id.clone()]);
        assert_eq!(sim.len(), 2);
        // Survivor keeps its position.
        let kept = sim.get(&a.id).unwrap();
        assert_eq!((kept.x, kept.y), (100.0, 100.0));
        assert!(sim.get(&c.id).is_some());
    }

    #[test]
    fn coincident_nodes_separate_after_one_tick() {
        let config = SimConfig::default();
        let mut sim = Simulation::new();
        let a = knowledge_node("a");
        let b = knowledge_node("b");
        sim.sync(&[a.clone(), b.clone()], &config);
        place(&mut sim, &a.id, 600.0, 400.0);
        place(&mut sim, &b.id, 600.0, 400.0);

        assert_eq!(dist(&sim, &a.id, &b.id), 0.0);
        sim.step(&[], &config);
        assert!(dist(&sim, &a.id, &b.id) > 0.0);
    }

    #[test]
    fn nearby_nodes_repel() {
        let config = SimConfig::default();
        let mut sim = Simulation::new();
        let a = knowledge_node("a");
        let b = knowledge_node("b");
        sim.sync(&[a.clone(), b.clone()], &config);
        place(&mut sim, &a.id, 590.0, 400.0);
        place(&mut sim, &b.id, 610.0, 400.0);

        let before = dist(&sim, &a.id, &b.id);
        sim.step(&[], &config);
        assert!(dist(&sim, &a.id, &b.id) > before);
    }

    #[test]
    fn connected_distant_nodes_attract() {
        let config = SimConfig::default();
        let mut sim = Simulation::new();
        let a = knowledge_node("a");
        let b = knowledge_node("b");
        sim.sync(&[a.clone(), b.clone()], &config);
        place(&mut sim, &a.id, 100.0, 400.0);
        place(&mut sim, &b.id, 1100.0, 400.0);

        let spring = GraphConnection {
            source: a.id.clone(),
            target: b.id.clone(),
            strength: 1.0,
            kind: super::super::connections::ConnectionKind::Related,
        };
        let before = dist(&sim, &a.id, &b.id);
        sim.step(std::slice::from_ref(&spring), &config);
        assert!(dist(&sim, &a.id, &b.id) < before);
    }

    #[test]
    fn positions_never_leave_the_margin() {
        let config = SimConfig {
            repulsion: 1_000_000.0,
            ..Default::default()
        };
        let mut sim = Simulation::new();
        let nodes: Vec<_> = (0..8).map(|i| knowledge_node(&format!("n{i}"))).collect();
        sim.sync(&nodes, &config);

        for _ in 0..200 {
            sim.step(&[], &config);
        }
        for node in sim.nodes() {
            assert!(node.x >= config.margin && node.x <= config.width - config.margin);
            assert!(node.y >= config.margin && node.y <= config.height - config.margin);
        }
    }

    #[test]
    fn pinned_node_takes_pointer_position() {
        let config = SimConfig::default();
        let mut sim = Simulation::new();
        let a = knowledge_node("a");
        let b = knowledge_node("b");
        sim.sync(&[a.clone(), b.clone()], &config);
        place(&mut sim, &b.id, 650.0, 400.0);

        assert!(sim.pin(&a.id, 300.0, 200.0));
        sim.step(&[], &config);
        let pinned = sim.get(&a.id).unwrap();
        assert_eq!((pinned.x, pinned.y), (300.0, 200.0));

        sim.unpin(&a.id);
        sim.step(&[], &config);
        let freed = sim.get(&a.id).unwrap();
        // Back under simulation control: repulsion from b moves it.
        assert_ne!((freed.x, freed.y), (300.0, 200.0));
    }

    #[test]
    fn dragging_outside_the_canvas_clamps_to_margin() {
        let config = SimConfig::default();
        let mut sim = Simulation::new();
        let a = knowledge_node("a");
        sim.sync(std::slice::from_ref(&a), &config);

        assert!(sim.pin(&a.id, -500.0, 10_000.0));
        sim.step(&[], &config);
        let pinned = sim.get(&a.id).unwrap();
        assert_eq!(
            (pinned.x, pinned.y),
            (config.margin, config.height - config.margin)
        );
    }

    #[test]
    fn pin_on_missing_node_reports_false() {
        let mut sim = Simulation::new();
        assert!(!sim.pin("ghost", 0.0, 0.0));
    }

    #[test]
    fn damping_settles_an_isolated_node() {
        let config = SimConfig::default();
        let mut sim = Simulation::new();
        let a = knowledge_node("a");
        sim.sync(std::slice::from_ref(&a), &config);
        let slot = sim.index[&a.id];
        sim.nodes[slot].vx = 50.0;
        sim.nodes[slot].vy = -50.0;

        for _ in 0..100 {
            sim.step(&[], &config);
        }
        let node = sim.get(&a.id).unwrap();
        assert!(node.vx.abs() < 0.01 && node.vy.abs() < 0.01);
    }
}
