//! Serializable snapshot of an in-memory document.
//!
//! This is the on-disk format of `MemorySurface::save_document` / `open_document` and the input
//! of the SVG exporter. Colors are referenced by spot name so a file stays readable on its own.

use crate::surface::{Cmyk, TextStyle};
use labelproof_core::geom::point;
use labelproof_core::{ArrowScale, Bounds, Point, ShapeSpec};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentModel {
    pub title: String,
    pub artboard: Bounds,
    #[serde(default)]
    pub spot_colors: Vec<SpotColorModel>,
    /// Topmost first.
    #[serde(default)]
    pub layers: Vec<LayerModel>,
}

impl DocumentModel {
    pub fn spot_color(&self, name: &str) -> Option<&SpotColorModel> {
        self.spot_colors.iter().find(|c| c.name == name)
    }

    /// Every item in the document, depth first, topmost first.
    pub fn items(&self) -> Vec<&ItemModel> {
        let mut out = Vec::new();
        for layer in &self.layers {
            layer.collect_items(&mut out);
        }
        out
    }

    pub fn layer(&self, name: &str) -> Option<&LayerModel> {
        self.layers.iter().find(|l| l.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotColorModel {
    pub name: String,
    pub cmyk: Cmyk,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerModel {
    pub name: String,
    #[serde(default)]
    pub locked: bool,
    /// Topmost first.
    #[serde(default)]
    pub items: Vec<ItemModel>,
    #[serde(default)]
    pub sublayers: Vec<LayerModel>,
}

impl LayerModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            locked: false,
            items: Vec::new(),
            sublayers: Vec::new(),
        }
    }

    fn collect_items<'a>(&'a self, out: &mut Vec<&'a ItemModel>) {
        out.extend(self.items.iter());
        for sub in &self.sublayers {
            sub.collect_items(out);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub geometry: Geometry,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<StrokeModel>,
    /// Spot color name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrowheads: Option<ArrowScale>,
}

impl ItemModel {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            name: None,
            geometry,
            stroke: None,
            fill: None,
            arrowheads: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeModel {
    /// Spot color name.
    pub color: String,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Geometry {
    Shape(ShapeSpec),
    Line {
        from: Point,
        to: Point,
    },
    Text {
        anchor: Point,
        text: String,
        style: TextStyle,
    },
    /// An external asset placed with its top-left corner at `anchor`.
    Placed {
        asset: PathBuf,
        anchor: Point,
        width: f64,
        height: f64,
    },
    /// Closed polygon.
    Path {
        points: Vec<Point>,
    },
}

impl Geometry {
    /// Geometric bounds. Text bounds are estimated from the font size.
    pub fn bounds(&self) -> Bounds {
        match self {
            Self::Shape(spec) => spec.bounds(),
            Self::Line { from, to } => Bounds::new(from.x, from.y, to.x, to.y),
            Self::Text {
                anchor,
                text,
                style,
            } => text_bounds(*anchor, text, style),
            Self::Placed {
                anchor,
                width,
                height,
                ..
            } => Bounds::new(
                anchor.x,
                anchor.y - height,
                anchor.x + width,
                anchor.y,
            ),
            Self::Path { points } => Bounds::from_points(points.iter().copied())
                .unwrap_or(Bounds::new(0.0, 0.0, 0.0, 0.0)),
        }
    }
}

/// Average advance of a glyph relative to the font size.
const GLYPH_ADVANCE: f64 = 0.55;

/// Box of a single line of text centered horizontally on `anchor` with its baseline through it,
/// rotated counter-clockwise about the anchor.
fn text_bounds(anchor: Point, text: &str, style: &TextStyle) -> Bounds {
    let half = text.chars().count() as f64 * style.size * GLYPH_ADVANCE / 2.0;
    let corners = [
        (-half, 0.0),
        (half, 0.0),
        (half, style.size),
        (-half, style.size),
    ];
    let (sin, cos) = style.rotation_degrees.to_radians().sin_cos();
    let rotated = corners
        .into_iter()
        .map(|(dx, dy)| point(anchor.x + dx * cos - dy * sin, anchor.y + dx * sin + dy * cos));
    Bounds::from_points(rotated).unwrap_or(Bounds::new(anchor.x, anchor.y, anchor.x, anchor.y))
}
