//! Fixed layer structure of a finished proof.

use crate::Result;
use crate::offset::Role;
use crate::surface::{DocumentId, DrawingSurface, LayerId, Placement, ShapeId};

pub const ARTWORK_LAYER: &str = "Artwork";
pub const GUIDES_LAYER: &str = "Guides";
pub const WHITE_BACKGROUND_LAYER: &str = "White Background";
pub const ANNOTATIONS_LAYER: &str = "Annotations";

fn is_system_layer(name: &str) -> bool {
    name == ARTWORK_LAYER || name == GUIDES_LAYER
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrganizedLayers {
    pub artwork: LayerId,
    pub guides: LayerId,
    /// Reference copies placed on the guides layer, in creation order.
    pub guide_copies: Vec<(Role, ShapeId)>,
}

/// Collapses every layer of `doc` into `Artwork`, copies the reference contours to a locked
/// `Guides` layer, and removes the layers that were emptied.
pub fn organize_layers<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    doc: DocumentId,
) -> Result<OrganizedLayers> {
    let guides = surface.add_layer(doc, GUIDES_LAYER)?;
    let artwork = surface.add_layer(doc, ARTWORK_LAYER)?;

    // Bottom-up so every item placed at the top of Artwork keeps its relative order.
    let existing = surface.layers(doc)?;
    for layer in existing.into_iter().rev() {
        if layer == artwork || layer == guides {
            continue;
        }
        let name = surface.layer_name(layer)?;
        if is_system_layer(&name) {
            continue;
        }
        drain_layer(surface, layer, artwork)?;
    }

    let mut guide_copies = Vec::new();
    for item in surface.layer_items(artwork)? {
        let Some(name) = surface.name_of(item)? else {
            continue;
        };
        let Some(role) = Role::from_object_name(&name) else {
            continue;
        };
        let copy = surface.duplicate(item, guides, Placement::AtBeginning)?;
        guide_copies.push((role, copy));
    }
    surface.set_layer_locked(guides, true)?;

    tracing::debug!(
        artwork = %artwork,
        guides = %guides,
        copies = guide_copies.len(),
        "organized proof layers"
    );

    Ok(OrganizedLayers {
        artwork,
        guides,
        guide_copies,
    })
}

/// Moves everything in `layer` (sublayers included) into `target`, removing layers left empty.
fn drain_layer<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    layer: LayerId,
    target: LayerId,
) -> Result<()> {
    for sub in surface.sublayers(layer)?.into_iter().rev() {
        drain_layer(surface, sub, target)?;
    }
    for item in surface.layer_items(layer)?.into_iter().rev() {
        surface.move_item(item, target, Placement::AtBeginning)?;
    }
    if surface.layer_items(layer)?.is_empty() && surface.sublayers(layer)?.is_empty() {
        surface.remove_layer(layer)?;
    }
    Ok(())
}

/// First object named `name` in `layer` or any of its sublayers (depth first, top first).
pub fn find_item_by_name<S: DrawingSurface + ?Sized>(
    surface: &S,
    layer: LayerId,
    name: &str,
) -> Result<Option<ShapeId>> {
    for item in surface.layer_items(layer)? {
        if surface.name_of(item)?.as_deref() == Some(name) {
            return Ok(Some(item));
        }
    }
    for sub in surface.sublayers(layer)? {
        if let Some(found) = find_item_by_name(surface, sub, name)? {
            return Ok(Some(found));
        }
    }
    Ok(None)
}

/// First object named `name` anywhere in `doc`.
pub fn find_item_in_document<S: DrawingSurface + ?Sized>(
    surface: &S,
    doc: DocumentId,
    name: &str,
) -> Result<Option<ShapeId>> {
    for layer in surface.layers(doc)? {
        if let Some(found) = find_item_by_name(surface, layer, name)? {
            return Ok(Some(found));
        }
    }
    Ok(None)
}

/// First top-level layer named `name`.
pub fn find_layer_by_name<S: DrawingSurface + ?Sized>(
    surface: &S,
    doc: DocumentId,
    name: &str,
) -> Result<Option<LayerId>> {
    for layer in surface.layers(doc)? {
        if surface.layer_name(layer)? == name {
            return Ok(Some(layer));
        }
    }
    Ok(None)
}
