use crate::capability::Positionable;
use crate::config::LayoutConfig;
use crate::error::{Error, Result};
use crate::geom::{Point, Viewport};
use crate::node::{Node, NodeOptions};
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use serde::Serialize;
use tracing::{debug, trace};

mod force;

use force::Body;

/// Size-derived constants of the repulsion law.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutParameters {
    /// Count the constants were derived from (after any floor the caller applied).
    pub node_count: usize,
    /// `C = ln(n) / 3 * radius / 2`.
    pub spacing: f64,
    /// `k = C * sqrt(width / n)`, the equilibrium spacing.
    pub optimal_distance: f64,
}

impl LayoutParameters {
    /// Raw formula. `node_count` is treated as at least 1.
    pub fn derive(node_count: usize, width: f64, node_radius: f64) -> Self {
        let n = node_count.max(1) as f64;
        let spacing = (n.ln() / 3.0) * (node_radius / 2.0);
        let optimal_distance = spacing * (width / n).sqrt();
        Self {
            node_count,
            spacing,
            optimal_distance,
        }
    }
}

/// Owns the beads and advances the simulation one tick at a time.
///
/// Every `&mut self` method runs to completion before the next one starts, so a tick never
/// observes a half-updated node set. Drivers on several threads wrap the engine in a mutex.
#[derive(Debug)]
pub struct LayoutEngine {
    config: LayoutConfig,
    viewport: Viewport,
    nodes: IndexMap<String, Node, FxBuildHasher>,
    energy: f64,
    params: LayoutParameters,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig, viewport: Viewport) -> Result<Self> {
        config.validate()?;
        let mut engine = Self {
            energy: config.initial_energy,
            params: LayoutParameters::derive(0, viewport.width(), config.node_radius),
            config,
            viewport,
            nodes: IndexMap::default(),
        };
        engine.refresh_parameters();
        Ok(engine)
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn midpoint(&self) -> Point {
        self.viewport.midpoint()
    }

    pub fn energy(&self) -> f64 {
        self.energy
    }

    pub fn parameters(&self) -> LayoutParameters {
        self.params
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Options pre-filled from this engine's config; the caller still supplies the view.
    pub fn node_options(&self) -> NodeOptions {
        NodeOptions::from_config(&self.config)
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn positions(&self) -> impl Iterator<Item = (&str, Point)> {
        self.nodes.values().map(|n| (n.id(), n.position))
    }

    pub fn add_node(&mut self, node: Node) -> Result<()> {
        if self.nodes.contains_key(node.id()) {
            return Err(Error::invalid_state(format!(
                "node `{}` is already in the layout",
                node.id()
            )));
        }
        debug!(id = node.id(), "adding node");
        self.nodes.insert(node.id().to_string(), node);
        self.refresh_parameters();
        Ok(())
    }

    /// Removes a node and any edges pointing at it. Absent ids are a no-op.
    pub fn remove_node(&mut self, id: &str) -> Option<Node> {
        let removed = self.nodes.shift_remove(id)?;
        for other in self.nodes.values_mut() {
            other.remove_edge(id);
        }
        debug!(id, "removed node");
        self.refresh_parameters();
        Some(removed)
    }

    /// Records a symmetric edge between two present nodes.
    pub fn link(&mut self, a: &str, b: &str) -> Result<()> {
        if a == b {
            return Err(Error::invalid_argument(format!(
                "cannot link `{a}` to itself"
            )));
        }
        for id in [a, b] {
            if !self.nodes.contains_key(id) {
                return Err(Error::invalid_argument(format!("unknown node `{id}`")));
            }
        }
        if let Some(n) = self.nodes.get_mut(a) {
            n.add_edge(b);
        }
        if let Some(n) = self.nodes.get_mut(b) {
            n.add_edge(a);
        }
        Ok(())
    }

    /// Returns whether an edge existed on either side.
    pub fn unlink(&mut self, a: &str, b: &str) -> bool {
        let left = self.nodes.get_mut(a).is_some_and(|n| n.remove_edge(b));
        let right = self.nodes.get_mut(b).is_some_and(|n| n.remove_edge(a));
        left || right
    }

    /// Changes the bounds and pulls every node the engine owns back inside them. Held nodes
    /// belong to the input layer and are left where they are.
    pub fn set_viewport(&mut self, width: f64, height: f64) -> Result<()> {
        let viewport = Viewport::new(width, height)?;
        self.viewport = viewport;
        let mut clamped = 0usize;
        for node in self.nodes.values_mut() {
            if node.held || viewport.contains(node.position) {
                continue;
            }
            let p = viewport.clamp(node.position);
            node.set_position(p.x, p.y, true);
            clamped += 1;
        }
        debug!(width, height, clamped, "viewport changed");
        self.refresh_parameters();
        Ok(())
    }

    /// Restores the initial energy so a perturbed layout can take large steps again.
    pub fn reset_energy(&mut self) {
        self.energy = self.config.initial_energy;
        debug!(energy = self.energy, "energy reset");
    }

    /// One cooling step: `t <- max(0, t - t^2 * coefficient)`.
    pub fn cool(&mut self) {
        let t = self.energy;
        let next = t - t * t * self.config.cooling_coefficient;
        self.energy = if next.is_nan() { 0.0 } else { next.max(0.0) };
    }

    pub fn is_settled(&self) -> bool {
        self.energy <= self.config.settle_energy
    }

    /// One tick followed by one cool. This is the cadence drivers are expected to use.
    pub fn step(&mut self) {
        self.tick();
        self.cool();
    }

    /// Steps until settled or `max_ticks` is reached. Returns the number of steps taken.
    pub fn run_until_settled(&mut self, max_ticks: usize) -> usize {
        let mut taken = 0;
        while taken < max_ticks && !self.is_settled() {
            self.step();
            taken += 1;
        }
        taken
    }

    /// Advances every free, non-ignored node by one annealed step. Held nodes are computed but
    /// never written.
    pub fn tick(&mut self) {
        self.refresh_parameters();
        if self.nodes.is_empty() {
            return;
        }

        let bodies: Vec<Body> = self
            .nodes
            .values()
            .map(|n| Body {
                position: n.position,
                repulse: n.repulse,
                ignore: n.ignore,
            })
            .collect();
        let targets = force::repulsion_targets(
            &bodies,
            self.params.optimal_distance,
            self.viewport.midpoint(),
            self.config.min_distance,
        );
        for (node, target) in self.nodes.values_mut().zip(targets) {
            if let Some(target) = target {
                node.target = target;
            }
        }

        let mut moved = 0usize;
        for node in self.nodes.values_mut() {
            if node.ignore {
                continue;
            }
            let Some(next) =
                force::step_towards(node.position, node.target, self.config.speed, self.energy)
            else {
                continue;
            };
            let next = self.viewport.clamp(next);
            if node.held {
                continue;
            }
            node.set_position(next.x, next.y, true);
            moved += 1;
        }

        trace!(
            nodes = self.nodes.len(),
            moved,
            energy = self.energy,
            spacing = self.params.spacing,
            optimal_distance = self.params.optimal_distance,
            "tick"
        );
    }

    fn refresh_parameters(&mut self) {
        let count = self.nodes.len().max(self.config.min_node_count);
        self.params =
            LayoutParameters::derive(count, self.viewport.width(), self.config.node_radius);
    }
}
