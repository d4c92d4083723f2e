use crate::Result;
use crate::surface::{DrawingSurface, LayerId, ShapeId};
use labelproof_core::{Bounds, LegendKey, LegendLibrary};

/// Name given to the placed legend object.
pub const LEGEND_OBJECT_NAME: &str = "Legend";

/// Places the legend asset for `key` with its top-left corner on the top-left of `reference`.
///
/// A missing asset surfaces as `labelproof_core::Error::LegendNotFound`, which callers treat as a
/// warning (see [`crate::Error::is_fatal`]).
pub fn place_legend<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    layer: LayerId,
    library: &LegendLibrary,
    key: &LegendKey,
    reference: Bounds,
) -> Result<ShapeId> {
    let path = library.resolve(key)?;
    let placed = surface.place_asset(layer, &path, reference.top_left())?;
    surface.set_name(placed, LEGEND_OBJECT_NAME)?;
    tracing::debug!(legend = %path.display(), "placed legend");
    Ok(placed)
}
