//! Drag hand-off between the input layer and the engine.
//!
//! `Start` takes the node out of the simulation, `Move` places it, `End` places it a last time and
//! hands it back.

use crate::capability::{Draggable, Positionable};
use crate::engine::LayoutEngine;
use crate::error::{Error, Result};
use crate::node::Node;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Gesture {
    Start,
    Move { x: f64, y: f64 },
    End { x: f64, y: f64 },
}

impl LayoutEngine {
    pub fn apply_gesture(&mut self, id: &str, gesture: Gesture) -> Result<()> {
        match gesture {
            Gesture::Start => self.begin_hold(id),
            Gesture::Move { x, y } => self.drag_to(id, x, y),
            Gesture::End { x, y } => self.end_hold(id, x, y),
        }
    }

    pub fn begin_hold(&mut self, id: &str) -> Result<()> {
        self.known_node(id)?.begin_hold();
        debug!(id, "hold started");
        Ok(())
    }

    /// Places a node at absolute viewport coordinates and commits it.
    pub fn drag_to(&mut self, id: &str, x: f64, y: f64) -> Result<()> {
        check_finite(id, x, y)?;
        self.known_node(id)?.set_position(x, y, true);
        Ok(())
    }

    pub fn end_hold(&mut self, id: &str, x: f64, y: f64) -> Result<()> {
        check_finite(id, x, y)?;
        let node = self.known_node(id)?;
        node.set_position(x, y, true);
        node.end_hold();
        debug!(id, x, y, "hold released");
        Ok(())
    }

    fn known_node(&mut self, id: &str) -> Result<&mut Node> {
        self.node_mut(id)
            .ok_or_else(|| Error::invalid_argument(format!("unknown node `{id}`")))
    }
}

fn check_finite(id: &str, x: f64, y: f64) -> Result<()> {
    if x.is_finite() && y.is_finite() {
        Ok(())
    } else {
        Err(Error::invalid_argument(format!(
            "node `{id}` dragged to a non-finite point ({x}, {y})"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::Gesture;
    use crate::capability::{Draggable, Positionable};
    use crate::config::LayoutConfig;
    use crate::engine::LayoutEngine;
    use crate::geom::{Point, Viewport};
    use crate::node::Node;
    use crate::render::RecordingView;

    fn engine_with(view: RecordingView) -> LayoutEngine {
        let mut e =
            LayoutEngine::new(LayoutConfig::default(), Viewport::new(500.0, 500.0).unwrap())
                .unwrap();
        let node = Node::new("a", Point::new(100.0, 100.0), e.node_options().with_view(view))
            .unwrap();
        e.add_node(node).unwrap();
        e
    }

    #[test]
    fn gesture_sequence_holds_then_releases() {
        let view = RecordingView::new();
        let mut e = engine_with(view.clone());

        e.apply_gesture("a", Gesture::Start).unwrap();
        assert!(e.node("a").unwrap().is_held());

        e.apply_gesture("a", Gesture::Move { x: 300.0, y: 200.0 }).unwrap();
        e.tick();
        assert_eq!(e.node("a").unwrap().position(), Point::new(300.0, 200.0));

        e.apply_gesture("a", Gesture::End { x: 310.0, y: 210.0 }).unwrap();
        let node = e.node("a").unwrap();
        assert!(!node.is_held());
        assert_eq!(node.position(), Point::new(310.0, 210.0));
        assert_eq!(node.repulse_factor(), 0.4);
        // construction + move + end
        assert_eq!(view.commit_count(), 3);
    }

    #[test]
    fn unknown_ids_and_non_finite_points_are_rejected() {
        let mut e = engine_with(RecordingView::new());
        assert!(e.apply_gesture("nope", Gesture::Start).is_err());
        assert!(e.drag_to("a", f64::NAN, 1.0).is_err());
        assert_eq!(e.node("a").unwrap().position(), Point::new(100.0, 100.0));
    }

    #[test]
    fn gestures_deserialize_from_tagged_json() {
        let g: Gesture = serde_json::from_str(r#"{ "kind": "move", "x": 1.5, "y": 2 }"#).unwrap();
        assert_eq!(g, Gesture::Move { x: 1.5, y: 2.0 });
        let g: Gesture = serde_json::from_str(r#"{ "kind": "start" }"#).unwrap();
        assert_eq!(g, Gesture::Start);
    }
}
