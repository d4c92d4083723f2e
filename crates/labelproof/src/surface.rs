//! The drawing-surface capability the proof engine drives.
//!
//! Documents, layers and objects live inside the surface; the engine only holds opaque handles
//! and calls the operations below, strictly in sequence. Every handle is scoped to the surface
//! that issued it.

use crate::Result;
use labelproof_core::{ArrowScale, Bounds, Point};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            pub const KIND: &'static str = $kind;
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", $kind, self.0)
            }
        }
    };
}

handle!(
    /// An open document.
    DocumentId,
    "document"
);
handle!(
    /// A layer (top-level or nested) of a document.
    LayerId,
    "layer"
);
handle!(
    /// Any drawable object: paths, lines, text and placed assets.
    ShapeId,
    "shape"
);
handle!(
    /// A spot color swatch.
    ColorId,
    "color"
);

/// Process color values in percent (0–100).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cmyk {
    pub cyan: f64,
    pub magenta: f64,
    pub yellow: f64,
    pub black: f64,
}

impl Cmyk {
    pub const fn new(cyan: f64, magenta: f64, yellow: f64, black: f64) -> Self {
        Self {
            cyan,
            magenta,
            yellow,
            black,
        }
    }

    /// Naive screen preview of the color (no ICC profile).
    pub fn to_rgb(self) -> (u8, u8, u8) {
        let k = 1.0 - (self.black / 100.0).clamp(0.0, 1.0);
        let channel = |v: f64| -> u8 {
            let v = 255.0 * (1.0 - (v / 100.0).clamp(0.0, 1.0)) * k;
            v.round() as u8
        };
        (channel(self.cyan), channel(self.magenta), channel(self.yellow))
    }
}

/// Where an object lands in its target layer's draw order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placement {
    /// Topmost.
    #[default]
    AtBeginning,
    /// Bottommost.
    AtEnd,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font: String,
    pub size: f64,
    /// Counter-clockwise rotation about the anchor.
    #[serde(default)]
    pub rotation_degrees: f64,
}

pub trait DrawingSurface {
    fn create_document(&mut self, width: f64, height: f64, title: &str) -> Result<DocumentId>;
    fn open_document(&mut self, path: &Path) -> Result<DocumentId>;

    /// Adds a top-level layer above all existing ones.
    fn add_layer(&mut self, doc: DocumentId, name: &str) -> Result<LayerId>;
    /// Top-level layers, topmost first.
    fn layers(&self, doc: DocumentId) -> Result<Vec<LayerId>>;
    fn sublayers(&self, layer: LayerId) -> Result<Vec<LayerId>>;
    fn layer_name(&self, layer: LayerId) -> Result<String>;
    /// Objects directly inside `layer`, topmost first.
    fn layer_items(&self, layer: LayerId) -> Result<Vec<ShapeId>>;
    fn remove_layer(&mut self, layer: LayerId) -> Result<()>;
    fn set_layer_locked(&mut self, layer: LayerId, locked: bool) -> Result<()>;
    fn send_layer_to_back(&mut self, layer: LayerId) -> Result<()>;

    fn draw_rectangle(&mut self, layer: LayerId, bounds: Bounds) -> Result<ShapeId>;
    fn draw_rounded_rectangle(
        &mut self,
        layer: LayerId,
        bounds: Bounds,
        corner_radius: f64,
    ) -> Result<ShapeId>;
    fn draw_ellipse(&mut self, layer: LayerId, bounds: Bounds) -> Result<ShapeId>;
    fn draw_line(&mut self, layer: LayerId, from: Point, to: Point) -> Result<ShapeId>;
    fn draw_text(
        &mut self,
        layer: LayerId,
        anchor: Point,
        text: &str,
        style: &TextStyle,
    ) -> Result<ShapeId>;

    fn apply_stroke(&mut self, shape: ShapeId, color: ColorId, width: f64) -> Result<()>;
    /// `None` clears the fill.
    fn set_fill(&mut self, shape: ShapeId, color: Option<ColorId>) -> Result<()>;
    fn set_arrowheads(&mut self, shape: ShapeId, scale: ArrowScale) -> Result<()>;
    fn set_name(&mut self, shape: ShapeId, name: &str) -> Result<()>;
    fn name_of(&self, shape: ShapeId) -> Result<Option<String>>;
    /// Geometric (stroke-independent) bounds.
    fn bounds_of(&self, shape: ShapeId) -> Result<Bounds>;
    fn duplicate(
        &mut self,
        shape: ShapeId,
        target: LayerId,
        placement: Placement,
    ) -> Result<ShapeId>;
    fn move_item(&mut self, shape: ShapeId, target: LayerId, placement: Placement) -> Result<()>;

    fn has_action(&self, action_set: &str, action: &str) -> bool;
    /// Runs a recorded offset action on `source` and returns the paths it produced.
    fn run_named_offset_operation(
        &mut self,
        source: ShapeId,
        action_set: &str,
        action: &str,
    ) -> Result<Vec<ShapeId>>;

    fn artboard_bounds(&self, doc: DocumentId) -> Result<Bounds>;
    fn set_artboard_bounds(&mut self, doc: DocumentId, bounds: Bounds) -> Result<()>;
    /// Places an external asset with its top-left corner at `anchor`.
    fn place_asset(&mut self, layer: LayerId, asset: &Path, anchor: Point) -> Result<ShapeId>;
    fn create_spot_color(&mut self, doc: DocumentId, name: &str, cmyk: Cmyk) -> Result<ColorId>;
}
