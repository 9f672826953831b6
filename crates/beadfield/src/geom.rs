use crate::error::{Error, Result};
use nalgebra as na;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub(crate) fn to_vector(self) -> na::Vector2<f64> {
        na::Vector2::new(self.x, self.y)
    }
}

impl From<na::Vector2<f64>> for Point {
    fn from(v: na::Vector2<f64>) -> Self {
        Self { x: v.x, y: v.y }
    }
}

/// Layout bounds. Committed positions live in `[1, width - 1] x [1, height - 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    width: f64,
    height: f64,
}

impl Viewport {
    /// Smallest edge length that still leaves a non-empty clamp range.
    pub const MIN_EXTENT: f64 = 2.0;

    pub fn new(width: f64, height: f64) -> Result<Self> {
        if !(width.is_finite() && height.is_finite()) {
            return Err(Error::invalid_argument(format!(
                "viewport must be finite, got {width}x{height}"
            )));
        }
        if width < Self::MIN_EXTENT || height < Self::MIN_EXTENT {
            return Err(Error::invalid_argument(format!(
                "viewport must be at least {min}x{min}, got {width}x{height}",
                min = Self::MIN_EXTENT
            )));
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn midpoint(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn clamp(&self, p: Point) -> Point {
        Point::new(
            p.x.max(1.0).min(self.width - 1.0),
            p.y.max(1.0).min(self.height - 1.0),
        )
    }

    pub fn contains(&self, p: Point) -> bool {
        (1.0..=self.width - 1.0).contains(&p.x) && (1.0..=self.height - 1.0).contains(&p.y)
    }
}
