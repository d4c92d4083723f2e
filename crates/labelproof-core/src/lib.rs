#![forbid(unsafe_code)]

//! Label proof data model (headless).
//!
//! This crate holds everything about a proof that does not need a drawing surface:
//! - the proof configuration collected by the panel
//! - boundary geometry for the primitive label shapes
//! - size-band tables that drive dimension-line styling
//! - deterministic legend asset naming
//! - persisted preferences

pub mod config;
pub mod error;
pub mod geom;
pub mod legend;
pub mod prefs;
pub mod shape;
pub mod size_band;

pub use config::{
    LabelSize, LabelType, Material, Mode, ProofConfig, ProofRequest, ShapeType, WhiteInk,
};
pub use error::{Error, Result};
pub use geom::{Bounds, POINTS_PER_INCH, Point};
pub use legend::{LegendKey, LegendLibrary, legend_file_name};
pub use prefs::{Preferences, most_recent_template};
pub use shape::{ShapeKind, ShapeSpec};
pub use size_band::{ArrowScale, BandSelection, BandStyle, DimensionTable, SizeBand};
