//! Small capability traits a node or its renderer opts into.

use crate::geom::Point;
use indexmap::IndexSet;
use rustc_hash::FxBuildHasher;

/// Something with a position that can be set directly.
pub trait Positionable {
    fn position(&self) -> Point;

    /// Sets the position. With `commit` the rendering side effect runs immediately; otherwise the
    /// caller is expected to call [`Positionable::commit_position`] later.
    fn set_position(&mut self, x: f64, y: f64, commit: bool);

    fn commit_position(&mut self);
}

/// Something an external actor can take hold of and release.
pub trait Draggable: Positionable {
    fn begin_hold(&mut self);
    fn end_hold(&mut self);
    fn is_held(&self) -> bool;
}

/// Class-based visual state.
pub trait Styleable {
    /// Returns `true` if the class was not present before.
    fn add_class(&mut self, class: &str) -> bool;
    /// Returns `true` if the class was present.
    fn remove_class(&mut self, class: &str) -> bool;
    /// Returns whether the class is present afterwards.
    fn toggle_class(&mut self, class: &str) -> bool;
    fn has_class(&self, class: &str) -> bool;

    fn hover(&mut self, on: bool) {
        set_class(self, "hover", on);
    }

    fn press(&mut self, on: bool) {
        set_class(self, "pressed", on);
    }
}

fn set_class<S: Styleable + ?Sized>(target: &mut S, class: &str, on: bool) {
    if on {
        target.add_class(class);
    } else {
        target.remove_class(class);
    }
}

/// Insertion-ordered class set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassList {
    classes: IndexSet<String, FxBuildHasher>,
}

impl ClassList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl Styleable for ClassList {
    fn add_class(&mut self, class: &str) -> bool {
        self.classes.insert(class.to_string())
    }

    fn remove_class(&mut self, class: &str) -> bool {
        self.classes.shift_remove(class)
    }

    fn toggle_class(&mut self, class: &str) -> bool {
        if self.classes.shift_remove(class) {
            false
        } else {
            self.classes.insert(class.to_string());
            true
        }
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }
}
