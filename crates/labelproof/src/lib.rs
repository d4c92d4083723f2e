#![forbid(unsafe_code)]

//! Label proof layout engine.
//!
//! The engine drives a [`DrawingSurface`] through the steps of a proof: drawing the die line,
//! classifying the contours produced by the offset action, resizing the artboard, organizing
//! layers, and annotating the result with dimension lines and a legend.
//!
//! [`MemorySurface`] is an in-process surface with JSON persistence, and [`svg`] renders its
//! documents for preview.

pub mod artboard;
pub mod builder;
pub mod dimension;
pub mod error;
pub mod layers;
pub mod legend;
pub mod memory;
pub mod offset;
pub mod surface;
pub mod svg;

pub use artboard::{adjust_artboard, artboard_scale};
pub use builder::{
    ProofContext, ProofOutcome, ProofWarning, SpotColor, create_proof, locate_dieline_by_name,
};
pub use dimension::{
    Axis, DimensionLine, DrawnDimension, draw_dimension_lines, plan_dimension_lines,
};
pub use error::{Error, Result};
pub use layers::{OrganizedLayers, organize_layers};
pub use legend::place_legend;
pub use memory::{DocumentModel, MemorySurface};
pub use offset::{
    ClassifiedPath, OFFSET_ACTION_SET, Role, classify_offset_paths, missing_offset_actions,
    offset_action_name,
};
pub use surface::{
    Cmyk, ColorId, DocumentId, DrawingSurface, LayerId, Placement, ShapeId, TextStyle,
};

pub use labelproof_core::{
    Bounds, DimensionTable, LabelType, LegendKey, LegendLibrary, Material, Mode, ProofConfig,
    ShapeType, SizeBand, WhiteInk,
};
