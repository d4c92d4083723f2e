//! SVG preview of a document snapshot.
//!
//! Document space is y-up in points; SVG space is y-down with the artboard's top-left at the
//! origin. Spot colors are previewed through a naive CMYK to RGB conversion.

use crate::memory::{DocumentModel, Geometry, ItemModel, LayerModel};
use labelproof_core::{ArrowScale, Bounds, Point, ShapeKind};
use std::collections::BTreeSet;
use std::fmt::Write as _;

/// Base arrowhead length in points, scaled by the line's arrow action.
const ARROWHEAD_SIZE: f64 = 6.0;

pub fn render_document(doc: &DocumentModel) -> String {
    let r = Renderer::new(doc);
    r.render()
}

struct Renderer<'a> {
    doc: &'a DocumentModel,
    artboard: Bounds,
}

impl<'a> Renderer<'a> {
    fn new(doc: &'a DocumentModel) -> Self {
        Self {
            doc,
            artboard: doc.artboard,
        }
    }

    fn x(&self, x: f64) -> Num {
        Num(x - self.artboard.min_x)
    }

    fn y(&self, y: f64) -> Num {
        Num(self.artboard.max_y - y)
    }

    fn color(&self, name: &str) -> String {
        match self.doc.spot_color(name) {
            Some(spot) => {
                let (r, g, b) = spot.cmyk.to_rgb();
                format!("#{r:02x}{g:02x}{b:02x}")
            }
            None => "#000000".to_string(),
        }
    }

    fn render(&self) -> String {
        let mut out = String::new();
        let w = Num(self.artboard.width());
        let h = Num(self.artboard.height());
        let _ = write!(
            &mut out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{w}pt" height="{h}pt" viewBox="0 0 {w} {h}">"#
        );
        let _ = write!(&mut out, "<title>{}</title>", escape_xml(&self.doc.title));

        let arrows: BTreeSet<u16> = self
            .doc
            .items()
            .into_iter()
            .filter_map(|item| item.arrowheads.map(ArrowScale::percent))
            .collect();
        if !arrows.is_empty() {
            out.push_str("<defs>");
            for percent in arrows {
                let size = Num(ARROWHEAD_SIZE * f64::from(percent) / 100.0);
                let _ = write!(
                    &mut out,
                    r#"<marker id="arrow-{percent}" viewBox="0 0 10 10" refX="10" refY="5" markerUnits="userSpaceOnUse" markerWidth="{size}" markerHeight="{size}" orient="auto-start-reverse"><path d="M0,0 L10,5 L0,10 z" fill="context-stroke"/></marker>"#
                );
            }
            out.push_str("</defs>");
        }

        // Bottom layer first so later output paints over it.
        for layer in self.doc.layers.iter().rev() {
            self.render_layer(&mut out, layer);
        }
        out.push_str("</svg>");
        out
    }

    fn render_layer(&self, out: &mut String, layer: &LayerModel) {
        let _ = write!(
            out,
            r#"<g class="layer" data-name="{}""#,
            escape_xml(&layer.name)
        );
        if layer.locked {
            out.push_str(r#" data-locked="true""#);
        }
        out.push('>');
        for sub in layer.sublayers.iter().rev() {
            self.render_layer(out, sub);
        }
        for item in layer.items.iter().rev() {
            self.render_item(out, item);
        }
        out.push_str("</g>");
    }

    fn paint(&self, item: &ItemModel) -> String {
        let mut attrs = String::new();
        match &item.fill {
            Some(fill) => {
                let _ = write!(&mut attrs, r#" fill="{}""#, self.color(fill));
            }
            None => attrs.push_str(r#" fill="none""#),
        }
        if let Some(stroke) = &item.stroke {
            let _ = write!(
                &mut attrs,
                r#" stroke="{}" stroke-width="{}""#,
                self.color(&stroke.color),
                Num(stroke.width)
            );
        }
        if let Some(name) = &item.name {
            let _ = write!(&mut attrs, r#" data-name="{}""#, escape_xml(name));
        }
        attrs
    }

    fn render_item(&self, out: &mut String, item: &ItemModel) {
        let paint = self.paint(item);
        match &item.geometry {
            Geometry::Shape(spec) => {
                let b = spec.bounds();
                match spec.kind {
                    ShapeKind::Rectangle | ShapeKind::RoundedRectangle => {
                        let _ = write!(
                            out,
                            r#"<rect x="{}" y="{}" width="{}" height="{}""#,
                            self.x(b.min_x),
                            self.y(b.max_y),
                            Num(b.width()),
                            Num(b.height())
                        );
                        let r = spec.effective_corner_radius();
                        if r > 0.0 {
                            let _ = write!(out, r#" rx="{0}" ry="{0}""#, Num(r));
                        }
                    }
                    ShapeKind::Ellipse => {
                        let _ = write!(
                            out,
                            r#"<ellipse cx="{}" cy="{}" rx="{}" ry="{}""#,
                            self.x(spec.center.x),
                            self.y(spec.center.y),
                            Num(spec.width / 2.0),
                            Num(spec.height / 2.0)
                        );
                    }
                }
                let _ = write!(out, "{paint}/>");
            }
            Geometry::Line { from, to } => {
                let _ = write!(
                    out,
                    r#"<line x1="{}" y1="{}" x2="{}" y2="{}"{paint}"#,
                    self.x(from.x),
                    self.y(from.y),
                    self.x(to.x),
                    self.y(to.y)
                );
                if let Some(scale) = item.arrowheads {
                    let p = scale.percent();
                    let _ = write!(
                        out,
                        r#" marker-start="url(#arrow-{p})" marker-end="url(#arrow-{p})""#
                    );
                }
                out.push_str("/>");
            }
            Geometry::Text {
                anchor,
                text,
                style,
            } => {
                let (x, y) = (self.x(anchor.x), self.y(anchor.y));
                let _ = write!(
                    out,
                    r#"<text x="{x}" y="{y}" font-family="{}" font-size="{}" text-anchor="middle""#,
                    escape_xml(&style.font),
                    Num(style.size)
                );
                if style.rotation_degrees != 0.0 {
                    // Counter-clockwise in document space is clockwise-negative in SVG space.
                    let _ = write!(
                        out,
                        r#" transform="rotate({} {x} {y})""#,
                        Num(-style.rotation_degrees)
                    );
                }
                let _ = write!(out, "{paint}>{}</text>", escape_xml(text));
            }
            Geometry::Placed {
                asset,
                anchor,
                width,
                height,
            } => {
                let _ = write!(
                    out,
                    r#"<image x="{}" y="{}" width="{}" height="{}" xlink:href="{}"{paint}/>"#,
                    self.x(anchor.x),
                    self.y(anchor.y),
                    Num(*width),
                    Num(*height),
                    escape_xml(&asset.to_string_lossy())
                );
            }
            Geometry::Path { points } => {
                out.push_str(r#"<polygon points=""#);
                for (i, p) in points.iter().enumerate() {
                    if i > 0 {
                        out.push(' ');
                    }
                    self.write_point(out, *p);
                }
                let _ = write!(out, r#""{paint}/>"#);
            }
        }
    }

    fn write_point(&self, out: &mut String, p: Point) {
        let _ = write!(out, "{},{}", self.x(p.x), self.y(p.y));
    }
}

/// Coordinates rounded to 1/1000 pt, without `-0` or trailing zeros.
#[derive(Debug, Clone, Copy)]
struct Num(f64);

impl std::fmt::Display for Num {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut v = self.0;
        if !v.is_finite() {
            return f.write_str("0");
        }
        v = (v * 1000.0).round() / 1000.0;
        if v == 0.0 {
            v = 0.0;
        }
        write!(f, "{v}")
    }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
