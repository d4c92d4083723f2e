//! End-to-end proof construction.
//!
//! `create_proof` runs one of two flows against a [`DrawingSurface`]:
//!
//! - **Make** draws a fresh die line from the label size, offsets it into bleed/safe-zone/backer
//!   contours, resizes the artboard and organizes the layers.
//! - **Upload** opens an existing file and works from the object named `Dieline` inside it.
//!
//! Both optionally finish with the guidelines pass (backer rectangle, dimension lines, legend).
//! Steps run strictly in order and nothing is rolled back when one fails.

use crate::artboard::adjust_artboard;
use crate::dimension::{draw_dimension_lines, plan_dimension_lines};
use crate::layers::{
    ANNOTATIONS_LAYER, WHITE_BACKGROUND_LAYER, find_item_by_name, find_item_in_document,
    organize_layers,
};
use crate::legend::place_legend;
use crate::offset::{OFFSET_ACTION_SET, Role, classify_offset_paths, offset_action_name};
use crate::surface::{Cmyk, ColorId, DocumentId, DrawingSurface, LayerId, ShapeId};
use crate::{Error, Result};
use labelproof_core::geom::inches_to_points;
use labelproof_core::{
    Bounds, DimensionTable, LabelSize, LegendKey, LegendLibrary, ProofConfig,
    ProofRequest, ShapeKind, ShapeSpec, ShapeType, SizeBand,
};
use std::fmt;
use std::path::Path;

pub const DOCUMENT_TITLE: &str = "LabelProof";
pub const DIELINE_NAME: &str = "Dieline";
pub const WHITE_BACKER_NAME: &str = "White Backer";
pub const DIELINE_STROKE_WIDTH: f64 = 1.0;

/// A named spot swatch and its process equivalent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotColor {
    pub name: &'static str,
    pub cmyk: Cmyk,
}

pub const DIELINE_COLOR: SpotColor = SpotColor {
    name: "Dieline",
    cmyk: Cmyk::new(0.0, 100.0, 0.0, 0.0),
};
pub const DIMENSION_LINE_COLOR: SpotColor = SpotColor {
    name: "DimensionLine",
    cmyk: Cmyk::new(0.0, 100.0, 0.0, 0.0),
};
pub const BLEED_LINE_COLOR: SpotColor = SpotColor {
    name: "BleedLine",
    cmyk: Cmyk::new(100.0, 0.0, 0.0, 0.0),
};
pub const WHITE_BACKER_COLOR: SpotColor = SpotColor {
    name: "White Backer",
    cmyk: Cmyk::new(5.0, 3.0, 3.0, 0.0),
};

/// Everything a proof needs besides its config.
#[derive(Debug, Clone)]
pub struct ProofContext {
    pub dimension_table: DimensionTable,
    pub legends: LegendLibrary,
    pub action_set: String,
}

impl Default for ProofContext {
    fn default() -> Self {
        Self {
            dimension_table: DimensionTable::standard(),
            legends: LegendLibrary::new("legends"),
            action_set: OFFSET_ACTION_SET.to_string(),
        }
    }
}

impl ProofContext {
    pub fn with_legends(mut self, dir: impl Into<std::path::PathBuf>) -> Self {
        self.legends = LegendLibrary::new(dir);
        self
    }

    pub fn with_dimension_table(mut self, table: DimensionTable) -> Self {
        self.dimension_table = table;
        self
    }
}

/// Problems reported without aborting the proof.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProofWarning {
    LegendNotFound { file_name: String },
}

impl fmt::Display for ProofWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LegendNotFound { file_name } => write!(f, "Legend file not found: {file_name}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProofOutcome {
    pub document: DocumentId,
    /// The die line the proof was built around.
    pub dieline: ShapeId,
    pub warnings: Vec<ProofWarning>,
}

impl ProofOutcome {
    /// Status string reported back to the panel on success.
    pub fn status(&self) -> &'static str {
        "OK"
    }
}

/// Builds a proof document for `config` on `surface`.
pub fn create_proof<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    config: &ProofConfig,
    ctx: &ProofContext,
) -> Result<ProofOutcome> {
    let request = config.validate()?;
    tracing::info!(
        mode = ?config.mode,
        label_type = %config.label_type,
        guidelines = config.add_guidelines,
        "creating proof"
    );
    match request {
        ProofRequest::Make { shape, size } => make_proof(surface, config, ctx, shape, size),
        ProofRequest::Upload { die_line_file } => {
            upload_proof(surface, config, ctx, die_line_file)
        }
    }
}

/// The object named `Dieline` anywhere in `doc`, searching every layer recursively.
pub fn locate_dieline_by_name<S: DrawingSurface + ?Sized>(
    surface: &S,
    doc: DocumentId,
) -> Result<Option<ShapeId>> {
    find_item_in_document(surface, doc, DIELINE_NAME)
}

fn make_proof<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    config: &ProofConfig,
    ctx: &ProofContext,
    shape_type: ShapeType,
    size: LabelSize,
) -> Result<ProofOutcome> {
    let width = inches_to_points(size.width_inches);
    let height = inches_to_points(size.height_inches);
    let doc = surface.create_document(width, height, DOCUMENT_TITLE)?;

    let dieline_color = create_spot(surface, doc, &DIELINE_COLOR)?;
    let dimension_color = create_spot(surface, doc, &DIMENSION_LINE_COLOR)?;
    let bleed_color = create_spot(surface, doc, &BLEED_LINE_COLOR)?;

    let layer = match surface.layers(doc)?.first() {
        Some(layer) => *layer,
        None => surface.add_layer(doc, "Layer 1")?,
    };
    let center = surface.artboard_bounds(doc)?.center();
    let spec = ShapeSpec::for_label(shape_type, center, width, height);
    let shape = draw_shape(surface, layer, &spec)?;
    surface.apply_stroke(shape, dieline_color, DIELINE_STROKE_WIDTH)?;
    surface.set_fill(shape, None)?;
    surface.set_name(shape, DIELINE_NAME)?;
    tracing::debug!(kind = ?spec.kind, width, height, "drew die line");

    let action = offset_action_name(config.label_type);
    if !surface.has_action(&ctx.action_set, action) {
        return Err(Error::OffsetActionUnavailable {
            action_set: ctx.action_set.clone(),
            action: action.to_string(),
        });
    }
    let produced = surface.run_named_offset_operation(shape, &ctx.action_set, action)?;
    let mut measured = Vec::with_capacity(produced.len());
    for path in produced {
        measured.push((path, surface.bounds_of(path)?));
    }
    let classified = classify_offset_paths(&measured)?;
    tracing::debug!(action, paths = classified.len(), "ran offset action");

    // A lone offset path is not reclassified: the drawn shape stays the only `Dieline` and the
    // path is left unnamed.
    if classified.len() > 1 {
        for path in &classified {
            if let Some(name) = path.role.object_name() {
                surface.set_name(path.handle, name)?;
            }
            if path.role == Role::Bleed {
                surface.apply_stroke(path.handle, bleed_color, DIELINE_STROKE_WIDTH)?;
            }
            tracing::debug!(role = %path.role, area = path.area, "classified offset path");
        }
        let current = surface.artboard_bounds(doc)?;
        let adjusted = adjust_artboard(current, config.label_type, width, height);
        if adjusted != current {
            surface.set_artboard_bounds(doc, adjusted)?;
            tracing::debug!(
                width = adjusted.width(),
                height = adjusted.height(),
                "resized artboard"
            );
        }
    }

    let organized = organize_layers(surface, doc)?;

    let mut warnings = Vec::new();
    if config.add_guidelines {
        let dieline =
            find_item_by_name(surface, organized.guides, DIELINE_NAME)?.unwrap_or(shape);
        let dieline_bounds = surface.bounds_of(dieline)?;
        let bleed_bounds = match find_item_by_name(surface, organized.guides, "Bleed")? {
            Some(bleed) => Some(surface.bounds_of(bleed)?),
            None => None,
        };

        let white_layer = surface.add_layer(doc, WHITE_BACKGROUND_LAYER)?;
        surface.send_layer_to_back(white_layer)?;
        let white_color = create_spot(surface, doc, &WHITE_BACKER_COLOR)?;
        let backer = backer_bounds(dieline_bounds, size)?;
        let white_rect = surface.draw_rectangle(white_layer, backer)?;
        surface.set_fill(white_rect, Some(white_color))?;
        surface.set_name(white_rect, WHITE_BACKER_NAME)?;
        tracing::debug!(
            width = backer.width(),
            height = backer.height(),
            "drew white backer"
        );

        let annotations = surface.add_layer(doc, ANNOTATIONS_LAYER)?;
        add_guidelines(
            surface,
            annotations,
            dimension_color,
            config,
            ctx,
            dieline_bounds,
            bleed_bounds,
            backer,
            &mut warnings,
        )?;
        surface.set_layer_locked(white_layer, true)?;
        surface.set_layer_locked(annotations, true)?;
    }

    tracing::info!(document = %doc, warnings = warnings.len(), "proof ready");
    Ok(ProofOutcome {
        document: doc,
        dieline: shape,
        warnings,
    })
}

fn upload_proof<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    config: &ProofConfig,
    ctx: &ProofContext,
    die_line_file: &Path,
) -> Result<ProofOutcome> {
    if !die_line_file.is_file() {
        return Err(Error::DieLineFileNotFound {
            path: die_line_file.to_path_buf(),
        });
    }
    let doc = surface.open_document(die_line_file)?;
    let dieline = locate_dieline_by_name(surface, doc)?.ok_or(Error::DielineNotFound)?;
    let dimension_color = create_spot(surface, doc, &DIMENSION_LINE_COLOR)?;
    tracing::debug!(document = %doc, dieline = %dieline, "opened die line file");

    let mut warnings = Vec::new();
    if config.add_guidelines {
        let dieline_bounds = surface.bounds_of(dieline)?;
        let artboard = surface.artboard_bounds(doc)?;
        let annotations = surface.add_layer(doc, ANNOTATIONS_LAYER)?;
        add_guidelines(
            surface,
            annotations,
            dimension_color,
            config,
            ctx,
            dieline_bounds,
            None,
            artboard,
            &mut warnings,
        )?;
        surface.set_layer_locked(annotations, true)?;
    }

    tracing::info!(document = %doc, warnings = warnings.len(), "proof ready");
    Ok(ProofOutcome {
        document: doc,
        dieline,
        warnings,
    })
}

/// Dimension lines around `dieline` plus the legend at the top-left of `legend_reference`.
#[allow(clippy::too_many_arguments)]
fn add_guidelines<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    layer: LayerId,
    color: ColorId,
    config: &ProofConfig,
    ctx: &ProofContext,
    dieline: Bounds,
    bleed: Option<Bounds>,
    legend_reference: Bounds,
    warnings: &mut Vec<ProofWarning>,
) -> Result<()> {
    let lines = plan_dimension_lines(dieline, config.label_type, &ctx.dimension_table, bleed)?;
    draw_dimension_lines(surface, layer, &lines, color)?;

    let key = LegendKey::from_config(config);
    match place_legend(surface, layer, &ctx.legends, &key, legend_reference) {
        Ok(_) => Ok(()),
        Err(err) if !err.is_fatal() => {
            tracing::warn!(%err, "continuing without legend");
            warnings.push(ProofWarning::LegendNotFound {
                file_name: key.file_name(),
            });
            Ok(())
        }
        Err(err) => Err(err),
    }
}

/// White backer rectangle centered on the die line, each axis grown by the backer scale of the
/// label's size band on that axis.
fn backer_bounds(dieline: Bounds, size: LabelSize) -> Result<Bounds> {
    let width_scale = SizeBand::for_inches(size.width_inches)?.backer_scale();
    let height_scale = SizeBand::for_inches(size.height_inches)?.backer_scale();
    Ok(Bounds::from_center_size(
        dieline.center(),
        dieline.width() * width_scale,
        dieline.height() * height_scale,
    ))
}

fn create_spot<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    doc: DocumentId,
    spot: &SpotColor,
) -> Result<ColorId> {
    surface.create_spot_color(doc, spot.name, spot.cmyk)
}

fn draw_shape<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    layer: LayerId,
    spec: &ShapeSpec,
) -> Result<ShapeId> {
    let bounds = spec.bounds();
    match spec.kind {
        ShapeKind::Rectangle => surface.draw_rectangle(layer, bounds),
        ShapeKind::RoundedRectangle => {
            surface.draw_rounded_rectangle(layer, bounds, spec.effective_corner_radius())
        }
        ShapeKind::Ellipse => surface.draw_ellipse(layer, bounds),
    }
}
