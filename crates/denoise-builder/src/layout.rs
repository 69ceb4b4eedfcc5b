//! Layout engine: where generated nodes go.
//!
//! Pure functions over locations. Nothing here affects what the graph computes.

use denoise_core::{LayoutConfig, PassKey};
use denoise_graph::Location;

/// Mean of `points`, or `None` when there are none.
pub fn mean(points: &[Location]) -> Option<Location> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f32;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Some(Location::new(sx / n, sy / n))
}

/// Location for a node fed by nodes at `inputs`: their mean shifted by `step`.
///
/// With a positive `step.0` the result is strictly right of every input's mean, so
/// dependency order reads left to right.
pub fn place_after(inputs: &[Location], step: (f32, f32)) -> Option<Location> {
    mean(inputs).map(|m| Location::new(m.x + step.0, m.y + step.1))
}

/// Offset of the denoise node for `key` relative to the source node.
pub fn denoise_offset(layout: &LayoutConfig, key: PassKey) -> (f32, f32) {
    (layout.denoise_dx, layout.row(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use denoise_core::{LightType, PassType};

    #[test]
    fn place_after_steps_from_the_mean() {
        let a = Location::new(300.0, 0.0);
        let b = Location::new(300.0, -50.0);
        let p = place_after(&[a, b], (300.0, 0.0)).unwrap();
        assert_eq!(p, Location::new(600.0, -25.0));
    }

    #[test]
    fn no_inputs_no_location() {
        assert!(place_after(&[], (300.0, 0.0)).is_none());
    }

    #[test]
    fn denoise_rows_never_collide() {
        let layout = LayoutConfig::default();
        let mut rows: Vec<f32> = PassKey::all().map(|k| denoise_offset(&layout, k).1).collect();
        rows.sort_by(|a, b| a.partial_cmp(b).unwrap());
        rows.dedup();
        assert_eq!(rows.len(), 9);

        let key = PassKey::new(PassType::Glossy, LightType::Color);
        assert_eq!(denoise_offset(&layout, key), (300.0, -400.0));
    }
}
