//! Classification of the contours produced by the offset action.
//!
//! Paths are ranked by the area of their axis-aligned bounding box, not by the true enclosed
//! area. Downstream tooling keys off the same approximation, so it is kept even though it can
//! misorder concave or rotated outlines.

use crate::surface::DrawingSurface;
use crate::{Error, Result};
use labelproof_core::{Bounds, LabelType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Action set that holds the recorded offset actions.
pub const OFFSET_ACTION_SET: &str = "Proofer Actions";

/// Semantic role of a contour in a proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Dieline,
    Bleed,
    Safezone,
    Backer,
    Unclassified,
}

impl Role {
    /// Roles that get a locked reference copy on the guides layer.
    pub const GUIDES: [Role; 4] = [Self::Dieline, Self::Bleed, Self::Safezone, Self::Backer];

    /// Object name carried by contours with this role.
    pub fn object_name(self) -> Option<&'static str> {
        match self {
            Self::Dieline => Some("Dieline"),
            Self::Bleed => Some("Bleed"),
            Self::Safezone => Some("Safezone"),
            Self::Backer => Some("Backer"),
            Self::Unclassified => None,
        }
    }

    pub fn from_object_name(name: &str) -> Option<Self> {
        Self::GUIDES
            .into_iter()
            .find(|role| role.object_name() == Some(name))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.object_name().unwrap_or("unclassified"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifiedPath<H> {
    pub handle: H,
    pub role: Role,
    pub area: f64,
}

/// Recorded action that offsets die lines of the given label type.
pub fn offset_action_name(label_type: LabelType) -> &'static str {
    match label_type {
        LabelType::Sheets => "Sheet Offset",
        LabelType::Rolls => "Roll Offset",
        LabelType::DieCut => "Die-Cut Offset",
        LabelType::Custom => "Custom",
    }
}

/// Offset actions the surface is missing, as `"<set> > <action>"` entries.
pub fn missing_offset_actions<S: DrawingSurface + ?Sized>(
    surface: &S,
    action_set: &str,
) -> Vec<String> {
    let mut missing = Vec::new();
    for label_type in LabelType::ALL {
        let action = offset_action_name(label_type);
        if !surface.has_action(action_set, action) {
            missing.push(format!("{action_set} > {action}"));
        }
    }
    missing
}

/// Ranks `paths` by descending bounding-box area and assigns roles.
///
/// - no paths: `EmptyOffsetResult`
/// - one path: it keeps the `Dieline` role
/// - otherwise: Bleed, Safezone, then Backer; anything past the third stays unclassified
///
/// Ties keep their input order.
pub fn classify_offset_paths<H: Copy>(paths: &[(H, Bounds)]) -> Result<Vec<ClassifiedPath<H>>> {
    if paths.is_empty() {
        return Err(Error::EmptyOffsetResult);
    }

    let mut ranked: Vec<ClassifiedPath<H>> = paths
        .iter()
        .map(|(handle, bounds)| ClassifiedPath {
            handle: *handle,
            role: Role::Unclassified,
            area: bounds.area(),
        })
        .collect();

    if ranked.len() == 1 {
        ranked[0].role = Role::Dieline;
        return Ok(ranked);
    }

    // `sort_by` is stable, which is what keeps equal areas in input order.
    ranked.sort_by(|a, b| b.area.total_cmp(&a.area));
    for (path, role) in ranked
        .iter_mut()
        .zip([Role::Bleed, Role::Safezone, Role::Backer])
    {
        path.role = role;
    }
    Ok(ranked)
}
