//! Dimension lines for the width and height of a die line.
//!
//! The width line runs above the anchor bounds and the height line runs to their left, each
//! pushed out by the band's `dimLine` offset. The anchor is the target itself, or an auxiliary
//! contour (typically the bleed) when one is supplied, so die-cut proofs measure clear of the
//! bleed edge. Whatever the anchor, a line always spans exactly the target's extent on its axis.

use crate::Result;
use crate::surface::{ColorId, DrawingSurface, LayerId, ShapeId, TextStyle};
use labelproof_core::geom::{inches_to_points, point, points_to_inches};
use labelproof_core::{BandStyle, Bounds, DimensionTable, LabelType, Point, SizeBand};

pub const DIMENSION_FONT: &str = "Arial-BoldMT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Width,
    Height,
}

impl Axis {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Width => "Width",
            Self::Height => "Height",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DimensionLine {
    pub axis: Axis,
    pub measured_inches: f64,
    pub band: SizeBand,
    pub style: BandStyle,
    pub start: Point,
    pub end: Point,
    /// Extension lines from the anchor edge out to each end of the dimension line.
    pub witnesses: [(Point, Point); 2],
    pub label: String,
    pub label_anchor: Point,
    pub label_rotation: f64,
}

impl DimensionLine {
    pub fn length(&self) -> f64 {
        match self.axis {
            Axis::Width => self.end.x - self.start.x,
            Axis::Height => self.end.y - self.start.y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawnDimension {
    pub axis: Axis,
    pub line: ShapeId,
    pub witnesses: [ShapeId; 2],
    pub label: ShapeId,
}

/// `3"`, `2.125"`: inches rounded to 1/10000 with trailing zeros trimmed.
pub fn format_inches(inches: f64) -> String {
    let mut out = format!("{inches:.4}");
    while out.ends_with('0') {
        out.pop();
    }
    if out.ends_with('.') {
        out.pop();
    }
    if out == "-0" {
        out = "0".to_string();
    }
    out.push('"');
    out
}

/// Width and height dimension lines for `target`, styled by the size band each measured span
/// falls in for `label_type`.
pub fn plan_dimension_lines(
    target: Bounds,
    label_type: LabelType,
    table: &DimensionTable,
    auxiliary: Option<Bounds>,
) -> Result<[DimensionLine; 2]> {
    let anchor = auxiliary.unwrap_or(target);

    let width_in = points_to_inches(target.width());
    let width_sel = table.classify(label_type, width_in)?;
    let y = anchor.max_y + inches_to_points(width_sel.style.dim_line_offset);
    let width_start = point(target.min_x, y);
    let width_end = point(target.max_x, y);
    let width = DimensionLine {
        axis: Axis::Width,
        measured_inches: width_in,
        band: width_sel.band,
        style: width_sel.style,
        start: width_start,
        end: width_end,
        witnesses: [
            (point(target.min_x, anchor.max_y), width_start),
            (point(target.max_x, anchor.max_y), width_end),
        ],
        label: format_inches(width_in),
        label_anchor: point(
            target.center().x,
            y + inches_to_points(width_sel.style.text_offset),
        ),
        label_rotation: 0.0,
    };

    let height_in = points_to_inches(target.height());
    let height_sel = table.classify(label_type, height_in)?;
    let x = anchor.min_x - inches_to_points(height_sel.style.dim_line_offset);
    let height_start = point(x, target.min_y);
    let height_end = point(x, target.max_y);
    let height = DimensionLine {
        axis: Axis::Height,
        measured_inches: height_in,
        band: height_sel.band,
        style: height_sel.style,
        start: height_start,
        end: height_end,
        witnesses: [
            (point(anchor.min_x, target.min_y), height_start),
            (point(anchor.min_x, target.max_y), height_end),
        ],
        label: format_inches(height_in),
        label_anchor: point(
            x - inches_to_points(height_sel.style.text_offset),
            target.center().y,
        ),
        label_rotation: 90.0,
    };

    Ok([width, height])
}

/// Draws planned dimension lines onto `layer` in `color`.
pub fn draw_dimension_lines<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    layer: LayerId,
    lines: &[DimensionLine],
    color: ColorId,
) -> Result<Vec<DrawnDimension>> {
    let mut drawn = Vec::with_capacity(lines.len());
    for dim in lines {
        let line = surface.draw_line(layer, dim.start, dim.end)?;
        surface.apply_stroke(line, color, dim.style.stroke_width)?;
        surface.set_arrowheads(line, dim.style.arrow_action)?;
        surface.set_name(line, &format!("Dimension {}", dim.axis.as_str()))?;

        let mut witnesses = [line; 2];
        for (slot, (from, to)) in witnesses.iter_mut().zip(dim.witnesses) {
            let w = surface.draw_line(layer, from, to)?;
            surface.apply_stroke(w, color, dim.style.stroke_width)?;
            *slot = w;
        }

        let style = TextStyle {
            font: DIMENSION_FONT.to_string(),
            size: dim.style.font_size,
            rotation_degrees: dim.label_rotation,
        };
        let label = surface.draw_text(layer, dim.label_anchor, &dim.label, &style)?;
        surface.set_fill(label, Some(color))?;

        tracing::debug!(
            axis = dim.axis.as_str(),
            band = %dim.band,
            length = dim.length(),
            stroke = dim.style.stroke_width,
            "drew dimension line"
        );
        drawn.push(DrawnDimension {
            axis: dim.axis,
            line,
            witnesses,
            label,
        });
    }
    Ok(drawn)
}
