use labelproof_core::{Bounds, LabelType};

/// Canvas growth factor for label types that need room around the die line.
pub fn artboard_scale(label_type: LabelType) -> Option<f64> {
    match label_type {
        LabelType::DieCut => Some(1.125),
        LabelType::Custom => Some(1.0625),
        LabelType::Sheets | LabelType::Rolls => None,
    }
}

/// New artboard bounds: `scale × base` in each axis, centered on the *current* artboard's center
/// (not the die line's). Sheets and Rolls keep their artboard.
pub fn adjust_artboard(
    current: Bounds,
    label_type: LabelType,
    base_width: f64,
    base_height: f64,
) -> Bounds {
    let Some(scale) = artboard_scale(label_type) else {
        return current;
    };
    let center = current.center();
    let half_w = base_width * scale / 2.0;
    let half_h = base_height * scale / 2.0;
    Bounds {
        min_x: center.x - half_w,
        min_y: center.y - half_h,
        max_x: center.x + half_w,
        max_y: center.y + half_h,
    }
}
