//! In-process drawing surface.
//!
//! `MemorySurface` keeps documents, layers, items and swatches in flat arenas keyed by handle.
//! Offset actions are recorded as lists of signed distances applied to the source primitive,
//! which is enough to stand in for the host's recorded `Proofer Actions`.

pub mod model;

pub use model::{DocumentModel, Geometry, ItemModel, LayerModel, SpotColorModel, StrokeModel};

use crate::offset::{OFFSET_ACTION_SET, offset_action_name};
use crate::surface::{
    Cmyk, ColorId, DocumentId, DrawingSurface, LayerId, Placement, ShapeId, TextStyle,
};
use crate::{Error, Result};
use indexmap::IndexMap;
use labelproof_core::geom::inches_to_points;
use labelproof_core::{ArrowScale, Bounds, LabelType, Point, ShapeSpec};
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};

/// Size given to placed assets; the surface does not read asset contents.
pub const PLACED_ASSET_SIZE: (f64, f64) = (144.0, 72.0);

/// Offsets (inches, positive grows outward) of the standard recorded actions.
pub fn standard_offsets(label_type: LabelType) -> &'static [f64] {
    match label_type {
        LabelType::Sheets | LabelType::Rolls => &[0.0625, -0.0625],
        LabelType::DieCut | LabelType::Custom => &[0.0625, -0.0625, -0.125],
    }
}

#[derive(Debug, Clone)]
struct DocumentEntry {
    title: String,
    artboard: Bounds,
    /// Topmost first.
    layers: Vec<LayerId>,
    colors: Vec<ColorId>,
}

#[derive(Debug, Clone)]
struct LayerEntry {
    doc: DocumentId,
    parent: Option<LayerId>,
    name: String,
    locked: bool,
    /// Topmost first.
    items: Vec<ShapeId>,
    sublayers: Vec<LayerId>,
}

#[derive(Debug, Clone)]
struct ItemEntry {
    layer: LayerId,
    name: Option<String>,
    geometry: Geometry,
    stroke: Option<(ColorId, f64)>,
    fill: Option<ColorId>,
    arrowheads: Option<ArrowScale>,
}

#[derive(Debug, Clone)]
struct ColorEntry {
    name: String,
    cmyk: Cmyk,
}

#[derive(Debug, Default)]
pub struct MemorySurface {
    next_id: u32,
    documents: FxHashMap<DocumentId, DocumentEntry>,
    layers: FxHashMap<LayerId, LayerEntry>,
    items: FxHashMap<ShapeId, ItemEntry>,
    colors: FxHashMap<ColorId, ColorEntry>,
    /// action set -> action -> offsets in points
    actions: IndexMap<String, IndexMap<String, Vec<f64>>>,
}

impl MemorySurface {
    /// A surface with no recorded actions.
    pub fn new() -> Self {
        Self::default()
    }

    /// A surface with the standard offset action for every label type in `Proofer Actions`.
    pub fn with_standard_actions() -> Self {
        let mut surface = Self::new();
        for label_type in LabelType::ALL {
            let offsets = standard_offsets(label_type)
                .iter()
                .map(|inches| inches_to_points(*inches))
                .collect();
            surface.register_action(OFFSET_ACTION_SET, offset_action_name(label_type), offsets);
        }
        surface
    }

    /// Records (or replaces) an offset action. `offsets` are in points, positive grows outward;
    /// the action produces one path per offset, in order.
    pub fn register_action(&mut self, action_set: &str, action: &str, offsets: Vec<f64>) {
        self.actions
            .entry(action_set.to_string())
            .or_default()
            .insert(action.to_string(), offsets);
    }

    pub fn remove_action(&mut self, action_set: &str, action: &str) -> bool {
        self.actions
            .get_mut(action_set)
            .is_some_and(|set| set.shift_remove(action).is_some())
    }

    pub fn documents(&self) -> Vec<DocumentId> {
        let mut out: Vec<_> = self.documents.keys().copied().collect();
        out.sort();
        out
    }

    pub fn is_layer_locked(&self, layer: LayerId) -> Result<bool> {
        let mut current = Some(layer);
        while let Some(id) = current {
            let entry = self.layer(id)?;
            if entry.locked {
                return Ok(true);
            }
            current = entry.parent;
        }
        Ok(false)
    }

    pub fn fill_of(&self, shape: ShapeId) -> Result<Option<ColorId>> {
        Ok(self.item(shape)?.fill)
    }

    pub fn stroke_of(&self, shape: ShapeId) -> Result<Option<(ColorId, f64)>> {
        Ok(self.item(shape)?.stroke)
    }

    pub fn arrowheads_of(&self, shape: ShapeId) -> Result<Option<ArrowScale>> {
        Ok(self.item(shape)?.arrowheads)
    }

    pub fn geometry_of(&self, shape: ShapeId) -> Result<&Geometry> {
        Ok(&self.item(shape)?.geometry)
    }

    pub fn layer_of(&self, shape: ShapeId) -> Result<LayerId> {
        Ok(self.item(shape)?.layer)
    }

    pub fn color_name(&self, color: ColorId) -> Result<&str> {
        Ok(&self.color(color)?.name)
    }

    pub fn spot_colors(&self, doc: DocumentId) -> Result<Vec<(String, Cmyk)>> {
        let entry = self.document(doc)?;
        entry
            .colors
            .iter()
            .map(|id| self.color(*id).map(|c| (c.name.clone(), c.cmyk)))
            .collect()
    }

    /// Snapshot of `doc` in the persisted format.
    pub fn document_model(&self, doc: DocumentId) -> Result<DocumentModel> {
        let entry = self.document(doc)?;
        let spot_colors = entry
            .colors
            .iter()
            .map(|id| {
                self.color(*id).map(|c| SpotColorModel {
                    name: c.name.clone(),
                    cmyk: c.cmyk,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let layers = entry
            .layers
            .iter()
            .map(|id| self.layer_model(*id))
            .collect::<Result<Vec<_>>>()?;
        Ok(DocumentModel {
            title: entry.title.clone(),
            artboard: entry.artboard,
            spot_colors,
            layers,
        })
    }

    /// Loads a snapshot as a new document.
    pub fn import_document(&mut self, model: &DocumentModel) -> Result<DocumentId> {
        let doc = DocumentId(self.next_id());
        self.documents.insert(
            doc,
            DocumentEntry {
                title: model.title.clone(),
                artboard: model.artboard,
                layers: Vec::new(),
                colors: Vec::new(),
            },
        );
        for spot in &model.spot_colors {
            self.create_spot_color(doc, &spot.name, spot.cmyk)?;
        }
        let mut top = Vec::with_capacity(model.layers.len());
        for layer in &model.layers {
            top.push(self.import_layer(doc, None, layer)?);
        }
        self.document_mut(doc)?.layers = top;
        Ok(doc)
    }

    /// Writes `doc` as pretty JSON.
    pub fn save_document(&self, doc: DocumentId, path: &Path) -> Result<()> {
        let model = self.document_model(doc)?;
        let text = serde_json::to_string_pretty(&model).map_err(labelproof_core::Error::from)?;
        std::fs::write(path, text).map_err(|source| {
            Error::from(labelproof_core::Error::Io {
                path: path.to_path_buf(),
                source,
            })
        })
    }

    fn next_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn document(&self, id: DocumentId) -> Result<&DocumentEntry> {
        self.documents.get(&id).ok_or(unknown(DocumentId::KIND, id.0))
    }

    fn document_mut(&mut self, id: DocumentId) -> Result<&mut DocumentEntry> {
        self.documents
            .get_mut(&id)
            .ok_or(unknown(DocumentId::KIND, id.0))
    }

    fn layer(&self, id: LayerId) -> Result<&LayerEntry> {
        self.layers.get(&id).ok_or(unknown(LayerId::KIND, id.0))
    }

    fn layer_mut(&mut self, id: LayerId) -> Result<&mut LayerEntry> {
        self.layers.get_mut(&id).ok_or(unknown(LayerId::KIND, id.0))
    }

    fn item(&self, id: ShapeId) -> Result<&ItemEntry> {
        self.items.get(&id).ok_or(unknown(ShapeId::KIND, id.0))
    }

    fn item_mut(&mut self, id: ShapeId) -> Result<&mut ItemEntry> {
        self.items.get_mut(&id).ok_or(unknown(ShapeId::KIND, id.0))
    }

    fn color(&self, id: ColorId) -> Result<&ColorEntry> {
        self.colors.get(&id).ok_or(unknown(ColorId::KIND, id.0))
    }

    fn ensure_unlocked(&self, layer: LayerId) -> Result<()> {
        if self.is_layer_locked(layer)? {
            return Err(Error::LayerLocked {
                layer: self.layer(layer)?.name.clone(),
            });
        }
        Ok(())
    }

    /// Mutable access to an item whose layer is editable.
    fn editable_item(&mut self, id: ShapeId) -> Result<&mut ItemEntry> {
        let layer = self.item(id)?.layer;
        self.ensure_unlocked(layer)?;
        self.item_mut(id)
    }

    fn insert_item(
        &mut self,
        layer: LayerId,
        mut entry: ItemEntry,
        placement: Placement,
    ) -> Result<ShapeId> {
        self.ensure_unlocked(layer)?;
        let id = ShapeId(self.next_id());
        entry.layer = layer;
        self.items.insert(id, entry);
        insert_placed(&mut self.layer_mut(layer)?.items, id, placement);
        Ok(id)
    }

    fn draw(&mut self, layer: LayerId, geometry: Geometry) -> Result<ShapeId> {
        self.insert_item(
            layer,
            ItemEntry {
                layer,
                name: None,
                geometry,
                stroke: None,
                fill: None,
                arrowheads: None,
            },
            Placement::AtBeginning,
        )
    }

    fn color_in_document(&self, color: ColorId, doc: DocumentId) -> Result<()> {
        self.color(color)?;
        if self.document(doc)?.colors.contains(&color) {
            Ok(())
        } else {
            Err(Error::surface(format!("{color} belongs to another document")))
        }
    }

    fn layer_model(&self, id: LayerId) -> Result<LayerModel> {
        let entry = self.layer(id)?;
        let mut items = Vec::with_capacity(entry.items.len());
        for item_id in &entry.items {
            let item = self.item(*item_id)?;
            let stroke = match item.stroke {
                Some((color, width)) => Some(StrokeModel {
                    color: self.color(color)?.name.clone(),
                    width,
                }),
                None => None,
            };
            let fill = match item.fill {
                Some(color) => Some(self.color(color)?.name.clone()),
                None => None,
            };
            items.push(ItemModel {
                name: item.name.clone(),
                geometry: item.geometry.clone(),
                stroke,
                fill,
                arrowheads: item.arrowheads,
            });
        }
        let sublayers = entry
            .sublayers
            .iter()
            .map(|id| self.layer_model(*id))
            .collect::<Result<Vec<_>>>()?;
        Ok(LayerModel {
            name: entry.name.clone(),
            locked: entry.locked,
            items,
            sublayers,
        })
    }

    fn import_layer(
        &mut self,
        doc: DocumentId,
        parent: Option<LayerId>,
        model: &LayerModel,
    ) -> Result<LayerId> {
        let id = LayerId(self.next_id());
        self.layers.insert(
            id,
            LayerEntry {
                doc,
                parent,
                name: model.name.clone(),
                locked: model.locked,
                items: Vec::new(),
                sublayers: Vec::new(),
            },
        );
        let mut items = Vec::with_capacity(model.items.len());
        for item in &model.items {
            let stroke = match &item.stroke {
                Some(s) => Some((self.find_color(doc, &s.color)?, s.width)),
                None => None,
            };
            let fill = match &item.fill {
                Some(name) => Some(self.find_color(doc, name)?),
                None => None,
            };
            let item_id = ShapeId(self.next_id());
            self.items.insert(
                item_id,
                ItemEntry {
                    layer: id,
                    name: item.name.clone(),
                    geometry: item.geometry.clone(),
                    stroke,
                    fill,
                    arrowheads: item.arrowheads,
                },
            );
            items.push(item_id);
        }
        let mut sublayers = Vec::with_capacity(model.sublayers.len());
        for sub in &model.sublayers {
            sublayers.push(self.import_layer(doc, Some(id), sub)?);
        }
        let entry = self.layer_mut(id)?;
        entry.items = items;
        entry.sublayers = sublayers;
        Ok(id)
    }

    fn find_color(&self, doc: DocumentId, name: &str) -> Result<ColorId> {
        for id in &self.document(doc)?.colors {
            if self.color(*id)?.name == name {
                return Ok(*id);
            }
        }
        Err(Error::surface(format!("unknown spot color `{name}`")))
    }

    fn forget_layer(&mut self, id: LayerId) -> Result<()> {
        let entry = self
            .layers
            .remove(&id)
            .ok_or(unknown(LayerId::KIND, id.0))?;
        for item in entry.items {
            self.items.remove(&item);
        }
        for sub in entry.sublayers {
            self.forget_layer(sub)?;
        }
        Ok(())
    }

    /// The list `layer` is stored in: its parent's sublayers or the document's layers.
    fn sibling_list(&mut self, layer: LayerId) -> Result<&mut Vec<LayerId>> {
        let (doc, parent) = {
            let entry = self.layer(layer)?;
            (entry.doc, entry.parent)
        };
        match parent {
            Some(parent) => Ok(&mut self.layer_mut(parent)?.sublayers),
            None => Ok(&mut self.document_mut(doc)?.layers),
        }
    }
}

fn unknown(kind: &'static str, id: u32) -> Error {
    Error::UnknownHandle { kind, id }
}

fn insert_placed<T>(list: &mut Vec<T>, value: T, placement: Placement) {
    match placement {
        Placement::AtBeginning => list.insert(0, value),
        Placement::AtEnd => list.push(value),
    }
}

impl DrawingSurface for MemorySurface {
    fn create_document(&mut self, width: f64, height: f64, title: &str) -> Result<DocumentId> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(Error::surface(format!(
                "document size must be positive, got {width} x {height}"
            )));
        }
        let doc = DocumentId(self.next_id());
        self.documents.insert(
            doc,
            DocumentEntry {
                title: title.to_string(),
                artboard: Bounds::from_origin_size(0.0, 0.0, width, height),
                layers: Vec::new(),
                colors: Vec::new(),
            },
        );
        self.add_layer(doc, "Layer 1")?;
        tracing::trace!(document = %doc, width, height, "created document");
        Ok(doc)
    }

    fn open_document(&mut self, path: &Path) -> Result<DocumentId> {
        let open_err = |message: String| Error::OpenDocument {
            path: path.to_path_buf(),
            message,
        };
        let text = std::fs::read_to_string(path).map_err(|e| open_err(e.to_string()))?;
        let model: DocumentModel =
            serde_json::from_str(&text).map_err(|e| open_err(e.to_string()))?;
        self.import_document(&model)
    }

    fn add_layer(&mut self, doc: DocumentId, name: &str) -> Result<LayerId> {
        self.document(doc)?;
        let id = LayerId(self.next_id());
        self.layers.insert(
            id,
            LayerEntry {
                doc,
                parent: None,
                name: name.to_string(),
                locked: false,
                items: Vec::new(),
                sublayers: Vec::new(),
            },
        );
        self.document_mut(doc)?.layers.insert(0, id);
        Ok(id)
    }

    fn layers(&self, doc: DocumentId) -> Result<Vec<LayerId>> {
        Ok(self.document(doc)?.layers.clone())
    }

    fn sublayers(&self, layer: LayerId) -> Result<Vec<LayerId>> {
        Ok(self.layer(layer)?.sublayers.clone())
    }

    fn layer_name(&self, layer: LayerId) -> Result<String> {
        Ok(self.layer(layer)?.name.clone())
    }

    fn layer_items(&self, layer: LayerId) -> Result<Vec<ShapeId>> {
        Ok(self.layer(layer)?.items.clone())
    }

    fn remove_layer(&mut self, layer: LayerId) -> Result<()> {
        self.ensure_unlocked(layer)?;
        self.sibling_list(layer)?.retain(|l| *l != layer);
        self.forget_layer(layer)
    }

    fn set_layer_locked(&mut self, layer: LayerId, locked: bool) -> Result<()> {
        self.layer_mut(layer)?.locked = locked;
        Ok(())
    }

    fn send_layer_to_back(&mut self, layer: LayerId) -> Result<()> {
        let siblings = self.sibling_list(layer)?;
        siblings.retain(|l| *l != layer);
        siblings.push(layer);
        Ok(())
    }

    fn draw_rectangle(&mut self, layer: LayerId, bounds: Bounds) -> Result<ShapeId> {
        let spec = ShapeSpec::rectangle(bounds.center(), bounds.width(), bounds.height());
        self.draw(layer, Geometry::Shape(spec))
    }

    fn draw_rounded_rectangle(
        &mut self,
        layer: LayerId,
        bounds: Bounds,
        corner_radius: f64,
    ) -> Result<ShapeId> {
        let spec = ShapeSpec::rounded_rectangle(
            bounds.center(),
            bounds.width(),
            bounds.height(),
            corner_radius,
        );
        self.draw(layer, Geometry::Shape(spec))
    }

    fn draw_ellipse(&mut self, layer: LayerId, bounds: Bounds) -> Result<ShapeId> {
        let spec = ShapeSpec::ellipse(bounds.center(), bounds.width(), bounds.height());
        self.draw(layer, Geometry::Shape(spec))
    }

    fn draw_line(&mut self, layer: LayerId, from: Point, to: Point) -> Result<ShapeId> {
        self.draw(layer, Geometry::Line { from, to })
    }

    fn draw_text(
        &mut self,
        layer: LayerId,
        anchor: Point,
        text: &str,
        style: &TextStyle,
    ) -> Result<ShapeId> {
        self.draw(
            layer,
            Geometry::Text {
                anchor,
                text: text.to_string(),
                style: style.clone(),
            },
        )
    }

    fn apply_stroke(&mut self, shape: ShapeId, color: ColorId, width: f64) -> Result<()> {
        let doc = self.layer(self.item(shape)?.layer)?.doc;
        self.color_in_document(color, doc)?;
        self.editable_item(shape)?.stroke = Some((color, width));
        Ok(())
    }

    fn set_fill(&mut self, shape: ShapeId, color: Option<ColorId>) -> Result<()> {
        if let Some(color) = color {
            let doc = self.layer(self.item(shape)?.layer)?.doc;
            self.color_in_document(color, doc)?;
        }
        self.editable_item(shape)?.fill = color;
        Ok(())
    }

    fn set_arrowheads(&mut self, shape: ShapeId, scale: ArrowScale) -> Result<()> {
        let item = self.editable_item(shape)?;
        if !matches!(item.geometry, Geometry::Line { .. }) {
            return Err(Error::surface(format!("{shape} is not an open line")));
        }
        item.arrowheads = Some(scale);
        Ok(())
    }

    fn set_name(&mut self, shape: ShapeId, name: &str) -> Result<()> {
        self.editable_item(shape)?.name = Some(name.to_string());
        Ok(())
    }

    fn name_of(&self, shape: ShapeId) -> Result<Option<String>> {
        Ok(self.item(shape)?.name.clone())
    }

    fn bounds_of(&self, shape: ShapeId) -> Result<Bounds> {
        Ok(self.item(shape)?.geometry.bounds())
    }

    fn duplicate(
        &mut self,
        shape: ShapeId,
        target: LayerId,
        placement: Placement,
    ) -> Result<ShapeId> {
        let entry = self.item(shape)?.clone();
        if self.layer(entry.layer)?.doc != self.layer(target)?.doc {
            return Err(Error::surface("cannot duplicate across documents"));
        }
        self.insert_item(target, entry, placement)
    }

    fn move_item(&mut self, shape: ShapeId, target: LayerId, placement: Placement) -> Result<()> {
        let source = self.item(shape)?.layer;
        if self.layer(source)?.doc != self.layer(target)?.doc {
            return Err(Error::surface("cannot move items across documents"));
        }
        self.ensure_unlocked(source)?;
        self.ensure_unlocked(target)?;
        self.layer_mut(source)?.items.retain(|i| *i != shape);
        insert_placed(&mut self.layer_mut(target)?.items, shape, placement);
        self.item_mut(shape)?.layer = target;
        Ok(())
    }

    fn has_action(&self, action_set: &str, action: &str) -> bool {
        self.actions
            .get(action_set)
            .is_some_and(|set| set.contains_key(action))
    }

    fn run_named_offset_operation(
        &mut self,
        source: ShapeId,
        action_set: &str,
        action: &str,
    ) -> Result<Vec<ShapeId>> {
        let Some(offsets) = self
            .actions
            .get(action_set)
            .and_then(|set| set.get(action))
            .cloned()
        else {
            return Err(Error::OffsetActionUnavailable {
                action_set: action_set.to_string(),
                action: action.to_string(),
            });
        };
        let entry = self.item(source)?.clone();
        let Geometry::Shape(spec) = entry.geometry else {
            return Err(Error::surface(format!(
                "{source} is not a closed primitive and cannot be offset"
            )));
        };

        let mut produced = Vec::with_capacity(offsets.len());
        for distance in offsets {
            let offset = spec.offset(distance);
            if offset.width <= 0.0 || offset.height <= 0.0 {
                tracing::trace!(distance, "offset collapsed the shape; skipped");
                continue;
            }
            let id = self.insert_item(
                entry.layer,
                ItemEntry {
                    layer: entry.layer,
                    name: None,
                    geometry: Geometry::Shape(offset),
                    stroke: entry.stroke,
                    fill: entry.fill,
                    arrowheads: None,
                },
                Placement::AtBeginning,
            )?;
            produced.push(id);
        }
        Ok(produced)
    }

    fn artboard_bounds(&self, doc: DocumentId) -> Result<Bounds> {
        Ok(self.document(doc)?.artboard)
    }

    fn set_artboard_bounds(&mut self, doc: DocumentId, bounds: Bounds) -> Result<()> {
        self.document_mut(doc)?.artboard = bounds;
        Ok(())
    }

    fn place_asset(&mut self, layer: LayerId, asset: &Path, anchor: Point) -> Result<ShapeId> {
        if !asset.is_file() {
            return Err(Error::surface(format!(
                "asset does not exist: {}",
                asset.display()
            )));
        }
        let (width, height) = PLACED_ASSET_SIZE;
        self.draw(
            layer,
            Geometry::Placed {
                asset: PathBuf::from(asset),
                anchor,
                width,
                height,
            },
        )
    }

    fn create_spot_color(&mut self, doc: DocumentId, name: &str, cmyk: Cmyk) -> Result<ColorId> {
        for id in &self.document(doc)?.colors {
            if self.color(*id)?.name == name {
                return Ok(*id);
            }
        }
        let id = ColorId(self.next_id());
        self.colors.insert(
            id,
            ColorEntry {
                name: name.to_string(),
                cmyk,
            },
        );
        self.document_mut(doc)?.colors.push(id);
        Ok(id)
    }
}
