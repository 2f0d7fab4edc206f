use crate::core::{BezPath, HORIZON, Point, Rect, merge_paths, polygon};
use crate::flora::{ForestLayer, mirrored_pine_outline};
use crate::terrain::right_slope_ridge;

/// Water-line curve: the top edge of the animated water band.
///
/// Every reflection anchors to this exact curve; the water-band builder and
/// the reflection builders must always evaluate the same formula, so they all
/// call this one function.
pub fn lake_top_y(x: f64) -> f64 {
    HORIZON - 12.0 + (x * 0.025 + 1.0).sin() * 3.0 + (x * 0.01 + 2.0).sin() * 2.0
}

/// Wavy boundary between the water band and the deep floor band.
fn lake_bottom_wave(x: f64) -> f64 {
    (x * 0.04).sin() * 3.0 + (x * 0.02 + 1.0).sin() * 2.0
}

/// Right-side shoreline: the floor band curves up to meet the horizon.
fn shoreline_rise(x: f64) -> f64 {
    if x > 60.0 {
        let t = (x - 60.0) / 90.0;
        t.powf(1.5) * 45.0
    } else {
        0.0
    }
}

/// Deepest band, from the bottom of the frame up to the wavy floor edge.
pub fn floor_band_path() -> BezPath {
    let mut points = vec![Point::new(-150.0, -55.0)];
    let mut x = -150.0;
    while x <= 150.0 {
        points.push(Point::new(
            x,
            HORIZON - 44.0 + lake_bottom_wave(x) + shoreline_rise(x),
        ));
        x += 5.0;
    }
    points.push(Point::new(150.0, -55.0));
    polygon(&points)
}

/// Animated water band between the floor edge and the water line.
pub fn water_band_path() -> BezPath {
    polygon(&water_band_outline())
}

pub(crate) fn water_band_outline() -> Vec<Point> {
    let mut points = Vec::new();
    let mut x = -150.0;
    while x <= 150.0 {
        points.push(Point::new(x, HORIZON - 44.0 + lake_bottom_wave(x)));
        x += 5.0;
    }
    let mut x = 150.0;
    while x >= -150.0 {
        points.push(Point::new(x, lake_top_y(x)));
        x -= 5.0;
    }
    points
}

/// Dark shore band between the water line and the horizon; its lower edge is
/// raised on the left where the tree reflections sit.
pub fn shore_band_path() -> BezPath {
    let mut points = vec![Point::new(-150.0, HORIZON - 10.0)];
    let mut x: f64 = -150.0;
    while x <= 150.0 {
        let wave = (x * 0.03 + 0.5).sin() * 4.0 + (x * 0.015).sin() * 3.0;
        let bottom_raise = if x < 50.0 { (50.0 - x) / 200.0 * 8.0 } else { 0.0 };
        points.push(Point::new(x, HORIZON - 15.0 + wave + bottom_raise));
        x += 5.0;
    }
    points.push(Point::new(150.0, HORIZON));
    points.push(Point::new(-150.0, HORIZON));
    polygon(&points)
}

/// All mirrored pines plus a gap-filling strip along the water line, merged
/// into a single path so the translucent reflection shading never stacks.
pub fn tree_reflections_path(layers: &[ForestLayer]) -> BezPath {
    let mut paths = Vec::new();

    for layer in layers {
        for tree in &layer.trees {
            // The slope under a tree adds to its apparent height on the shore;
            // the reflection carries half of that.
            let height = tree.height + tree.slope_height * 0.5;
            let mut jitter = tree.jitter;
            let outline = mirrored_pine_outline(
                tree.x,
                lake_top_y(tree.x),
                height,
                tree.width,
                &mut jitter,
            );
            paths.push(polygon(&outline));
        }
    }

    paths.push(reflection_base_strip());
    merge_paths(paths)
}

fn reflection_base_strip() -> BezPath {
    let mut points = Vec::new();
    let mut x = -150.0;
    while x <= 50.0 {
        points.push(Point::new(x, lake_top_y(x)));
        x += 2.0;
    }
    let mut x = 50.0;
    while x >= -150.0 {
        points.push(Point::new(x, lake_top_y(x) - 3.0));
        x -= 2.0;
    }
    polygon(&points)
}

/// The right hill mirrored beneath the water line.
pub fn mountain_reflection_path() -> BezPath {
    let ridge = right_slope_ridge();

    let mut points = vec![Point::new(30.0, lake_top_y(30.0))];
    let mut x = 30.0;
    while x <= 150.0 {
        points.push(Point::new(x, lake_top_y(x) - ridge.height(x)));
        x += 2.0;
    }
    points.push(Point::new(150.0, lake_top_y(150.0)));
    let mut x = 150.0;
    while x >= 30.0 {
        points.push(Point::new(x, lake_top_y(x)));
        x -= 5.0;
    }
    polygon(&points)
}

/// World rect of the moon-reflection shimmer plane (35x32, centered under the
/// moon's x).
pub fn moon_reflection_rect() -> Rect {
    Rect::new(17.5, -36.0, 52.5, -4.0)
}

#[cfg(test)]
mod tests {
    use kurbo::Shape as _;

    use super::*;
    use crate::flora::forest_placements;

    #[test]
    fn water_band_top_edge_follows_the_shared_curve() {
        let outline = water_band_outline();
        // The second half of the outline walks the water line right-to-left.
        let top_edge = &outline[61..];
        assert_eq!(top_edge.len(), 61);
        for p in top_edge {
            assert_eq!(p.y, lake_top_y(p.x), "top edge diverged at x={}", p.x);
        }
    }

    #[test]
    fn reflections_anchor_to_the_shared_curve() {
        let layers = forest_placements(12345);
        for layer in &layers {
            for tree in &layer.trees {
                let mut jitter = tree.jitter;
                let outline = mirrored_pine_outline(
                    tree.x,
                    lake_top_y(tree.x),
                    tree.height + tree.slope_height * 0.5,
                    tree.width,
                    &mut jitter,
                );
                // Trunk anchors sit exactly on the water line.
                let anchored = outline
                    .iter()
                    .filter(|p| p.y == lake_top_y(tree.x))
                    .count();
                assert_eq!(anchored, 2, "tree at x={} lost its anchors", tree.x);
            }
        }
    }

    #[test]
    fn reflection_replay_matches_forest_tree_for_tree() {
        let a = forest_placements(12345);
        let b = forest_placements(12345);
        let pa = tree_reflections_path(&a);
        let pb = tree_reflections_path(&b);
        assert_eq!(pa.elements(), pb.elements());
    }

    #[test]
    fn bands_are_closed_regions() {
        for path in [floor_band_path(), water_band_path(), shore_band_path()] {
            assert!(matches!(
                path.elements().last(),
                Some(kurbo::PathEl::ClosePath)
            ));
            assert!(path.bounding_box().area() > 0.0);
        }
    }

    #[test]
    fn mountain_reflection_stays_below_the_water_line() {
        let bbox = mountain_reflection_path().bounding_box();
        let max_water = (30..=150).map(|x| lake_top_y(x as f64)).fold(f64::NEG_INFINITY, f64::max);
        assert!(bbox.max_y() <= max_water + 1e-9);
        assert!(bbox.min_y() < -12.0);
    }

    #[test]
    fn shimmer_plane_sits_in_the_lake() {
        let r = moon_reflection_rect();
        assert_eq!(r.width(), 35.0);
        assert_eq!(r.height(), 32.0);
        assert!(r.max_y() < HORIZON);
    }
}
