//! Boundary geometry for the primitive label shapes.

use crate::config::ShapeType;
use crate::geom::{Bounds, Point};
use serde::{Deserialize, Serialize};

/// Corner radius of a `Rounded` label, as a fraction of its shorter side.
pub const ROUNDED_CORNER_RATIO: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Rectangle,
    RoundedRectangle,
    Ellipse,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeSpec {
    pub kind: ShapeKind,
    pub center: Point,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f64>,
}

impl ShapeSpec {
    pub fn rectangle(center: Point, width: f64, height: f64) -> Self {
        Self {
            kind: ShapeKind::Rectangle,
            center,
            width,
            height,
            corner_radius: None,
        }
    }

    pub fn rounded_rectangle(center: Point, width: f64, height: f64, corner_radius: f64) -> Self {
        Self {
            kind: ShapeKind::RoundedRectangle,
            center,
            width,
            height,
            corner_radius: Some(corner_radius),
        }
    }

    pub fn ellipse(center: Point, width: f64, height: f64) -> Self {
        Self {
            kind: ShapeKind::Ellipse,
            center,
            width,
            height,
            corner_radius: None,
        }
    }

    /// The die line shape for a label of the given type, centered on `center`.
    pub fn for_label(shape: ShapeType, center: Point, width: f64, height: f64) -> Self {
        match shape {
            ShapeType::Squared => Self::rectangle(center, width, height),
            ShapeType::Rounded => Self::rounded_rectangle(
                center,
                width,
                height,
                width.min(height) * ROUNDED_CORNER_RATIO,
            ),
            ShapeType::Round => Self::ellipse(center, width, height),
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::from_center_size(self.center, self.width, self.height)
    }

    /// Corner radius clamped so opposite arcs never overlap.
    pub fn effective_corner_radius(&self) -> f64 {
        match self.kind {
            ShapeKind::RoundedRectangle => self
                .corner_radius
                .unwrap_or(0.0)
                .clamp(0.0, self.width.min(self.height) / 2.0),
            _ => 0.0,
        }
    }

    /// Same primitive grown (positive) or shrunk (negative) by `distance` on every side.
    pub fn offset(&self, distance: f64) -> Self {
        let width = (self.width + 2.0 * distance).max(0.0);
        let height = (self.height + 2.0 * distance).max(0.0);
        let corner_radius = match self.kind {
            ShapeKind::RoundedRectangle => Some((self.effective_corner_radius() + distance).max(0.0)),
            _ => None,
        };
        Self {
            kind: self.kind,
            center: self.center,
            width,
            height,
            corner_radius,
        }
    }
}
