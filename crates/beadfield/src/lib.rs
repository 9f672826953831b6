#![forbid(unsafe_code)]

//! Headless force-directed layout for draggable beads.
//!
//! `beadfield` owns the simulation side only: pairwise repulsion, an annealed step size and the
//! hand-off between engine-controlled and user-controlled nodes. Rendering and input capture live
//! behind the [`NodeView`] seam and the [`Gesture`] protocol.

pub mod capability;
pub mod config;
pub mod engine;
pub mod error;
pub mod geom;
pub mod interaction;
pub mod node;
pub mod render;

pub use capability::{ClassList, Draggable, Positionable, Styleable};
pub use config::LayoutConfig;
pub use engine::{LayoutEngine, LayoutParameters};
pub use error::{Error, Result};
pub use geom::{Point, Viewport};
pub use interaction::Gesture;
pub use node::{Node, NodeOptions};
pub use render::{NodeView, RecordingView, Transform};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
