use crate::capability::{Draggable, Positionable};
use crate::config::LayoutConfig;
use crate::error::{Error, Result};
use crate::geom::Point;
use crate::render::{NodeView, Transform};
use indexmap::IndexSet;
use rustc_hash::FxBuildHasher;

/// Construction data for a [`Node`].
#[derive(Debug)]
pub struct NodeOptions {
    /// Required. A node without something to position cannot exist.
    pub view: Option<Box<dyn NodeView>>,
    pub radius: f64,
    pub scale: f64,
    pub ignore: bool,
    pub rest_repulse: f64,
    pub held_repulse: f64,
}

impl Default for NodeOptions {
    fn default() -> Self {
        Self::from_config(&LayoutConfig::default())
    }
}

impl NodeOptions {
    pub fn from_config(config: &LayoutConfig) -> Self {
        Self {
            view: None,
            radius: config.node_radius,
            scale: 1.0,
            ignore: false,
            rest_repulse: config.rest_repulse,
            held_repulse: config.held_repulse,
        }
    }

    pub fn with_view(mut self, view: impl NodeView + 'static) -> Self {
        self.view = Some(Box::new(view));
        self
    }

    pub fn ignored(mut self, ignore: bool) -> Self {
        self.ignore = ignore;
        self
    }
}

/// One bead: simulation state plus the view it drives.
#[derive(Debug)]
pub struct Node {
    id: String,
    pub(crate) position: Point,
    // Scratch accumulator, only meaningful inside a tick.
    pub(crate) target: Point,
    pub(crate) repulse: f64,
    rest_repulse: f64,
    held_repulse: f64,
    pub(crate) held: bool,
    pub(crate) ignore: bool,
    edges: IndexSet<String, FxBuildHasher>,
    radius: f64,
    scale: f64,
    view: Box<dyn NodeView>,
}

impl Node {
    /// Creates a free node and commits its initial position to the view.
    pub fn new(id: impl Into<String>, position: Point, options: NodeOptions) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(Error::invalid_argument("node needs a non-empty id"));
        }
        let Some(view) = options.view else {
            return Err(Error::invalid_argument(format!(
                "node `{id}` needs a view to position"
            )));
        };
        if !position.is_finite() {
            return Err(Error::invalid_argument(format!(
                "node `{id}` has a non-finite position ({}, {})",
                position.x, position.y
            )));
        }
        let factors = [options.rest_repulse, options.held_repulse, options.scale];
        if factors.iter().any(|v| !(v.is_finite() && *v > 0.0)) {
            return Err(Error::invalid_argument(format!(
                "node `{id}` needs positive repulse factors and scale"
            )));
        }
        if !(options.radius.is_finite() && options.radius >= 0.0) {
            return Err(Error::invalid_argument(format!(
                "node `{id}` has an invalid radius {}",
                options.radius
            )));
        }

        let mut node = Self {
            id,
            position,
            target: Point::default(),
            repulse: options.rest_repulse,
            rest_repulse: options.rest_repulse,
            held_repulse: options.held_repulse,
            held: false,
            ignore: options.ignore,
            edges: IndexSet::default(),
            radius: options.radius,
            scale: options.scale,
            view,
        };
        node.commit_position();
        Ok(node)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn repulse_factor(&self) -> f64 {
        self.repulse
    }

    pub fn is_ignored(&self) -> bool {
        self.ignore
    }

    pub fn set_ignore(&mut self, ignore: bool) {
        self.ignore = ignore;
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f64) -> Result<()> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(Error::invalid_argument(format!(
                "node `{}` needs a positive scale, got {scale}",
                self.id
            )));
        }
        self.scale = scale;
        Ok(())
    }

    pub fn edges(&self) -> impl Iterator<Item = &str> {
        self.edges.iter().map(String::as_str)
    }

    pub fn has_edge(&self, peer: &str) -> bool {
        self.edges.contains(peer)
    }

    /// Records adjacency. Carries no force.
    pub fn add_edge(&mut self, peer: impl Into<String>) -> bool {
        let peer = peer.into();
        if peer == self.id {
            return false;
        }
        self.edges.insert(peer)
    }

    pub fn remove_edge(&mut self, peer: &str) -> bool {
        self.edges.shift_remove(peer)
    }

    pub fn transform(&self) -> Transform {
        Transform::for_bead(self.position, self.radius, self.scale)
    }
}

impl Positionable for Node {
    fn position(&self) -> Point {
        self.position
    }

    fn set_position(&mut self, x: f64, y: f64, commit: bool) {
        self.position = Point::new(x, y);
        if commit {
            self.commit_position();
        }
    }

    fn commit_position(&mut self) {
        let transform = self.transform();
        self.view.apply_transform(transform);
    }
}

impl Draggable for Node {
    fn begin_hold(&mut self) {
        self.held = true;
        self.repulse = self.held_repulse;
    }

    fn end_hold(&mut self) {
        self.held = false;
        self.repulse = self.rest_repulse;
    }

    fn is_held(&self) -> bool {
        self.held
    }
}

#[cfg(test)]
mod tests {
    use super::{Node, NodeOptions};
    use crate::capability::{Draggable, Positionable};
    use crate::geom::Point;
    use crate::Error;
    use crate::render::RecordingView;

    #[test]
    fn new_node_is_free_and_committed() {
        let view = RecordingView::new();
        let node = Node::new(
            "a",
            Point::new(40.0, 50.0),
            NodeOptions::default().with_view(view.clone()),
        )
        .unwrap();

        assert!(!node.is_held());
        assert!(!node.is_ignored());
        assert_eq!(node.repulse_factor(), 0.4);
        assert_eq!(view.commit_count(), 1);
        let t = view.last_transform().unwrap();
        assert_eq!((t.translate_x, t.translate_y), (20.0, 30.0));
    }

    #[test]
    fn missing_id_or_view_is_an_invalid_argument() {
        let err = Node::new(
            "",
            Point::new(1.0, 1.0),
            NodeOptions::default().with_view(RecordingView::new()),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));

        let err = Node::new("a", Point::new(1.0, 1.0), NodeOptions::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));
    }

    #[test]
    fn hold_swaps_repulse_factor_and_back() {
        let mut node = Node::new(
            "a",
            Point::new(1.0, 1.0),
            NodeOptions::default().with_view(RecordingView::new()),
        )
        .unwrap();
        node.begin_hold();
        assert!(node.is_held());
        assert_eq!(node.repulse_factor(), 1.4);
        node.end_hold();
        assert!(!node.is_held());
        assert_eq!(node.repulse_factor(), 0.4);
    }

    #[test]
    fn uncommitted_set_position_skips_the_view() {
        let view = RecordingView::new();
        let mut node = Node::new(
            "a",
            Point::new(10.0, 10.0),
            NodeOptions::default().with_view(view.clone()),
        )
        .unwrap();

        node.set_position(90.0, 70.0, false);
        assert_eq!(node.position(), Point::new(90.0, 70.0));
        assert_eq!(view.commit_count(), 1);

        node.commit_position();
        assert_eq!(view.commit_count(), 2);
        assert_eq!(view.last_transform().unwrap().translate_x, 70.0);
    }

    #[test]
    fn bad_scale_is_rejected_and_kept() {
        let mut node = Node::new(
            "a",
            Point::new(1.0, 1.0),
            NodeOptions::default().with_view(RecordingView::new()),
        )
        .unwrap();
        for bad in [0.0, -2.0, f64::NAN, f64::INFINITY] {
            let err = node.set_scale(bad).unwrap_err();
            assert!(matches!(err, Error::InvalidArgument { .. }));
        }
        assert_eq!(node.scale(), 1.0);
        node.set_scale(1.5).unwrap();
        assert_eq!(node.scale(), 1.5);
        assert_eq!(node.transform().scale, 1.5);
    }

    #[test]
    fn edges_are_a_set_without_self_loops() {
        let mut node = Node::new(
            "a",
            Point::new(1.0, 1.0),
            NodeOptions::default().with_view(RecordingView::new()),
        )
        .unwrap();
        assert!(node.add_edge("b"));
        assert!(!node.add_edge("b"));
        assert!(!node.add_edge("a"));
        assert!(node.add_edge("c"));
        assert_eq!(node.edges().collect::<Vec<_>>(), vec!["b", "c"]);
        assert!(node.remove_edge("b"));
        assert!(!node.has_edge("b"));
    }
}
