//! Pointer interaction: hit-testing, node dragging, panning, and zoom.
//!
//! A three-state machine drives it: `Idle`, `DraggingNode`, `Panning`.
//! Pointer-down hit-tests against node positions; a hit starts a drag (select
//! and pin), a miss starts a pan. Pointer-up always lands back in `Idle`.
//! Deleting the dragged node mid-drag also resets to `Idle` — never a panic.

use super::sim::Simulation;

/// Hit-test radius around a node's screen position, in pixels.
pub const HIT_RADIUS_PX: f32 = 20.0;

/// Zoom bounds.
pub const MIN_ZOOM: f32 = 0.5;
pub const MAX_ZOOM: f32 = 2.0;

/// Multiplicative zoom step per wheel notch.
const ZOOM_STEP: f32 = 1.1;

/// Pan offset and zoom scalar applied between world and screen space.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub pan_x: f32,
    pub pan_y: f32,
    pub zoom: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            pan_x: 0.0,
            pan_y: 0.0,
            zoom: 1.0,
        }
    }
}

impl Viewport {
    /// Screen → world.
    pub fn to_world(&self, sx: f32, sy: f32) -> (f32, f32) {
        ((sx - self.pan_x) / self.zoom, (sy - self.pan_y) / self.zoom)
    }

    /// World → screen.
    pub fn to_screen(&self, wx: f32, wy: f32) -> (f32, f32) {
        (wx * self.zoom + self.pan_x, wy * self.zoom + self.pan_y)
    }
}

/// Where the pointer state machine currently is.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerState {
    Idle,
    DraggingNode {
        id: String,
        /// World-space offset from the pointer to the node's center at grab
        /// time, so the node doesn't jump under the cursor.
        grab_dx: f32,
        grab_dy: f32,
    },
    Panning {
        start_x: f32,
        start_y: f32,
        origin_pan_x: f32,
        origin_pan_y: f32,
    },
}

/// Pointer state machine plus the viewport it manipulates.
#[derive(Debug)]
pub struct InteractionController {
    state: PointerState,
    viewport: Viewport,
}

impl InteractionController {
    pub fn new() -> Self {
        Self {
            state: PointerState::Idle,
            viewport: Viewport::default(),
        }
    }

    pub fn state(&self) -> &PointerState {
        &self.state
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Pointer pressed at screen coordinates.
    ///
    /// Returns the id of the node the drag grabbed, if any.
    pub fn pointer_down(&mut self, sx: f32, sy: f32, sim: &mut Simulation) -> Option<String> {
        let hit = hit_test(sx, sy, &self.viewport, sim)
            .and_then(|id| sim.get(&id).map(|n| (id, n.x, n.y)));
        match hit {
            Some((id, px, py)) => {
                let (wx, wy) = self.viewport.to_world(sx, sy);
                sim.pin(&id, px, py);
                self.state = PointerState::DraggingNode {
                    id: id.clone(),
                    grab_dx: px - wx,
                    grab_dy: py - wy,
                };
                Some(id)
            }
            None => {
                self.state = PointerState::Panning {
                    start_x: sx,
                    start_y: sy,
                    origin_pan_x: self.viewport.pan_x,
                    origin_pan_y: self.viewport.pan_y,
                };
                None
            }
        }
    }

    /// Pointer moved to screen coordinates.
    pub fn pointer_move(&mut self, sx: f32, sy: f32, sim: &mut Simulation) {
        match &self.state {
            PointerState::DraggingNode { id, grab_dx, grab_dy } => {
                let (wx, wy) = self.viewport.to_world(sx, sy);
                if !sim.pin(id, wx + grab_dx, wy + grab_dy) {
                    // Node deleted mid-drag; the drag dissolves quietly.
                    self.state = PointerState::Idle;
                }
            }
            PointerState::Panning {
                start_x,
                start_y,
                origin_pan_x,
                origin_pan_y,
            } => {
                self.viewport.pan_x = origin_pan_x + (sx - start_x);
                self.viewport.pan_y = origin_pan_y + (sy - start_y);
            }
            PointerState::Idle => {}
        }
    }

    /// Pointer released: hand a dragged node back to the simulation.
    pub fn pointer_up(&mut self, sim: &mut Simulation) {
        if let PointerState::DraggingNode { id, .. } = &self.state {
            sim.unpin(id);
        }
        self.state = PointerState::Idle;
    }

    /// Wheel scroll: adjust zoom, clamped to `[0.5, 2.0]`. State is untouched.
    pub fn wheel(&mut self, delta_y: f32) {
        let factor = if delta_y < 0.0 { ZOOM_STEP } else { 1.0 / ZOOM_STEP };
        self.viewport.zoom = (self.viewport.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Called by the layout engine after a sync removed nodes: a drag whose
    /// node vanished returns to `Idle`.
    pub fn node_removed(&mut self, removed: &[String]) {
        if let PointerState::DraggingNode { id, .. } = &self.state {
            if removed.iter().any(|r| r == id) {
                self.state = PointerState::Idle;
            }
        }
    }
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new()
    }
}

/// Nearest node within [`HIT_RADIUS_PX`] of the screen point, if any.
fn hit_test(sx: f32, sy: f32, viewport: &Viewport, sim: &Simulation) -> Option<String> {
    let mut best: Option<(f32, &str)> = None;
    for node in sim.nodes() {
        let (nx, ny) = viewport.to_screen(node.x, node.y);
        let d = ((nx - sx).powi(2) + (ny - sy).powi(2)).sqrt();
        if d <= HIT_RADIUS_PX && best.is_none_or(|(bd, _)| d < bd) {
            best = Some((d, &node.id));
        }
    }
    best.map(|(_, id)| id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::sim::SimConfig;
    use crate::node::{Difficulty, KnowledgeNode, Understanding, node_id};
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

    fn sim_with(positions: &[(&str, f32, f32)]) -> (Simulation, Vec<String>) {
        let config = SimConfig::default();
        let mut sim = Simulation::new();
        let nodes: Vec<_> = positions.iter().map(|(t, _, _)| knowledge_node(t)).collect();
        sim.sync(&nodes, &config);
        let mut ids = Vec::new();
        for (node, (_, x, y)) in nodes.iter().zip(positions) {
            sim.pin(&node.id, *x, *y);
            sim.step(&[], &config);
            sim.unpin(&node.id);
            ids.push(node.id.clone());
        }
        (sim, ids)
    }

    #[test]
    fn down_on_node_starts_drag_and_pins() {
        let (mut sim, ids) = sim_with(&[("a", 300.0, 300.0)]);
        let mut ctl = InteractionController::new();
        let grabbed = ctl.pointer_down(305.0, 295.0, &mut sim);
        assert_eq!(grabbed.as_deref(), Some(ids[0].as_str()));
        assert!(matches!(ctl.state(), PointerState::DraggingNode { .. }));
        assert!(sim.get(&ids[0]).unwrap().pin.is_some());
    }

    #[test]
    fn down_on_empty_space_starts_pan() {
        let (mut sim, _) = sim_with(&[("a", 300.0, 300.0)]);
        let mut ctl = InteractionController::new();
        assert!(ctl.pointer_down(800.0, 100.0, &mut sim).is_none());
        assert!(matches!(ctl.state(), PointerState::Panning { .. }));
    }

    #[test]
    fn drag_moves_node_with_grab_offset() {
        let (mut sim, ids) = sim_with(&[("a", 300.0, 300.0)]);
        let mut ctl = InteractionController::new();
        // Grab 5px off-center; the offset must be preserved while dragging.
        ctl.pointer_down(305.0, 300.0, &mut sim);
        ctl.pointer_move(405.0, 350.0, &mut sim);
        let node = sim.get(&ids[0]).unwrap();
        assert_eq!(node.pin, Some((400.0, 350.0)));
    }

    #[test]
    fn up_unpins_and_returns_to_idle() {
        let (mut sim, ids) = sim_with(&[("a", 300.0, 300.0)]);
        let mut ctl = InteractionController::new();
        ctl.pointer_down(300.0, 300.0, &mut sim);
        ctl.pointer_up(&mut sim);
        assert_eq!(*ctl.state(), PointerState::Idle);
        assert!(sim.get(&ids[0]).unwrap().pin.is_none());
    }

    #[test]
    fn deleting_dragged_node_resets_to_idle() {
        let (mut sim, ids) = sim_with(&[("a", 300.0, 300.0)]);
        let mut ctl = InteractionController::new();
        ctl.pointer_down(300.0, 300.0, &mut sim);
        // Node deleted while the drag is live.
        sim.sync(&[], &SimConfig::default());
        ctl.node_removed(&ids);
        assert_eq!(*ctl.state(), PointerState::Idle);
        // Further moves must not panic or resurrect the drag.
        ctl.pointer_move(500.0, 500.0, &mut sim);
        assert_eq!(*ctl.state(), PointerState::Idle);
    }

    #[test]
    fn pan_shifts_viewport() {
        let (mut sim, _) = sim_with(&[("a", 300.0, 300.0)]);
        let mut ctl = InteractionController::new();
        ctl.pointer_down(800.0, 100.0, &mut sim);
        ctl.pointer_move(850.0, 140.0, &mut sim);
        ctl.pointer_up(&mut sim);
        let v = ctl.viewport();
        assert_eq!((v.pan_x, v.pan_y), (50.0, 40.0));
    }

    #[test]
    fn hit_test_respects_pan_and_zoom() {
        let (mut sim, ids) = sim_with(&[("a", 300.0, 300.0)]);
        let mut ctl = InteractionController::new();
        // Pan by (100, 0): the node now renders at screen x=400.
        ctl.pointer_down(800.0, 700.0, &mut sim);
        ctl.pointer_move(900.0, 700.0, &mut sim);
        ctl.pointer_up(&mut sim);
        let grabbed = ctl.pointer_down(400.0, 300.0, &mut sim);
        assert_eq!(grabbed.as_deref(), Some(ids[0].as_str()));
        ctl.pointer_up(&mut sim);
    }

    #[test]
    fn nearest_node_wins_the_hit() {
        let (mut sim, ids) = sim_with(&[("a", 300.0, 300.0), ("b", 318.0, 300.0)]);
        let mut ctl = InteractionController::new();
        let grabbed = ctl.pointer_down(315.0, 300.0, &mut sim);
        assert_eq!(grabbed.as_deref(), Some(ids[1].as_str()));
    }

    #[test]
    fn wheel_zoom_clamps() {
        let mut ctl = InteractionController::new();
        for _ in 0..30 {
            ctl.wheel(-1.0);
        }
        assert_eq!(ctl.viewport().zoom, MAX_ZOOM);
        for _ in 0..60 {
            ctl.wheel(1.0);
        }
        assert_eq!(ctl.viewport().zoom, MIN_ZOOM);
        // Zooming never disturbs the state machine.
        assert_eq!(*ctl.state(), PointerState::Idle);
    }

    #[test]
    fn world_screen_round_trip() {
        let v = Viewport {
            pan_x: 120.0,
            pan_y: -40.0,
            zoom: 1.5,
        };
        let (wx, wy) = v.to_world(300.0, 200.0);
        let (sx, sy) = v.to_screen(wx, wy);
        assert!((sx - 300.0).abs() < 1e-3);
        assert!((sy - 200.0).abs() < 1e-3);
    }
}
