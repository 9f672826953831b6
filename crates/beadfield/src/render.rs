//! Rendering seam: the engine hands a [`Transform`] to whatever draws a node.

use crate::capability::{ClassList, Styleable};
use crate::geom::Point;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// Screen transform for one bead, anchored at the top-left corner of its bounding square.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
}

impl Transform {
    pub fn for_bead(center: Point, radius: f64, scale: f64) -> Self {
        Self {
            translate_x: center.x - radius,
            translate_y: center.y - radius,
            scale,
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "translate3d({}px,{}px, 0) scale3d({},{}, 1)",
            self.translate_x, self.translate_y, self.scale, self.scale
        )
    }
}

/// The rendering handle a node needs to exist. Receives every committed position.
pub trait NodeView: fmt::Debug + Send {
    fn apply_transform(&mut self, transform: Transform);
}

#[derive(Debug, Default)]
struct Recorded {
    last: Option<Transform>,
    commits: usize,
    classes: ClassList,
}

/// Headless view that remembers what it was told to draw.
///
/// Clones share state, so a caller can keep one handle while the node owns another.
#[derive(Debug, Clone, Default)]
pub struct RecordingView {
    inner: Arc<Mutex<Recorded>>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_transform(&self) -> Option<Transform> {
        self.with(|r| r.last)
    }

    pub fn commit_count(&self) -> usize {
        self.with(|r| r.commits)
    }

    pub fn classes(&self) -> Vec<String> {
        self.with(|r| r.classes.iter().map(str::to_string).collect())
    }

    fn with<T>(&self, f: impl FnOnce(&mut Recorded) -> T) -> T {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

impl NodeView for RecordingView {
    fn apply_transform(&mut self, transform: Transform) {
        self.with(|r| {
            r.last = Some(transform);
            r.commits += 1;
        });
    }
}

impl Styleable for RecordingView {
    fn add_class(&mut self, class: &str) -> bool {
        self.with(|r| r.classes.add_class(class))
    }

    fn remove_class(&mut self, class: &str) -> bool {
        self.with(|r| r.classes.remove_class(class))
    }

    fn toggle_class(&mut self, class: &str) -> bool {
        self.with(|r| r.classes.toggle_class(class))
    }

    fn has_class(&self, class: &str) -> bool {
        self.with(|r| r.classes.has_class(class))
    }
}
