use kurbo::Shape as _;

use crate::core::{Affine, BezPath, HORIZON, Point, merge_paths, polygon};
use crate::rng::SeededRng;
use crate::terrain::left_slope_ridge;

/// Jagged pine-cone silhouette: a tip, then 6-8 branch layers widening toward
/// the base, each layer jittering an outward/inward x-offset pair. The right
/// side is regenerated with fresh draws rather than mirrored, which is what
/// gives the trees their asymmetry.
pub fn pine_outline(
    center_x: f64,
    base_y: f64,
    height: f64,
    base_width: f64,
    rng: &mut SeededRng,
) -> Vec<Point> {
    let layers = 6 + (rng.next() * 3.0).floor() as usize;
    let mut points = Vec::with_capacity(4 * layers + 3);

    points.push(Point::new(center_x, base_y + height));

    for i in 1..=layers {
        let progress = i as f64 / layers as f64;
        let layer_y = base_y + height * (1.0 - progress);
        let layer_width = base_width * progress * 0.5;

        let tip_out = layer_width * (1.1 + rng.next() * 0.15);
        let tip_in = layer_width * (0.85 + rng.next() * 0.1);

        points.push(Point::new(center_x - tip_out, layer_y + height * 0.02));
        if i < layers {
            points.push(Point::new(center_x - tip_in, layer_y - height * 0.01));
        }
    }

    // Trunk base.
    points.push(Point::new(center_x - base_width * 0.08, base_y));
    points.push(Point::new(center_x + base_width * 0.08, base_y));

    for i in (1..=layers).rev() {
        let progress = i as f64 / layers as f64;
        let layer_y = base_y + height * (1.0 - progress);
        let layer_width = base_width * progress * 0.5;

        let tip_out = layer_width * (1.1 + rng.next() * 0.15);
        let tip_in = layer_width * (0.85 + rng.next() * 0.1);

        if i < layers {
            points.push(Point::new(center_x + tip_in, layer_y - height * 0.01));
        }
        points.push(Point::new(center_x + tip_out, layer_y + height * 0.02));
    }

    points
}

/// The pine silhouette flipped vertically about `water_y`, tip pointing down
/// into the lake. Layer widths get a quadratic boost toward the water line for
/// a softer reflection. Consumes exactly as many draws per layer as
/// [`pine_outline`], so both builders stay in lockstep on a shared seed.
pub fn mirrored_pine_outline(
    center_x: f64,
    water_y: f64,
    height: f64,
    base_width: f64,
    rng: &mut SeededRng,
) -> Vec<Point> {
    let layers = 6 + (rng.next() * 3.0).floor() as usize;
    let mut points = Vec::with_capacity(4 * layers + 3);

    points.push(Point::new(center_x, water_y - height));

    for i in 1..=layers {
        let progress = i as f64 / layers as f64;
        let layer_y = water_y - height * (1.0 - progress);
        let top_boost = 1.0 + progress * progress * 0.3;
        let layer_width = base_width * progress * 0.5 * top_boost;

        let tip_out = layer_width * (1.1 + rng.next() * 0.15);
        let tip_in = layer_width * (0.85 + rng.next() * 0.1);

        points.push(Point::new(center_x - tip_out, layer_y - height * 0.02));
        if i < layers {
            points.push(Point::new(center_x - tip_in, layer_y + height * 0.01));
        }
    }

    points.push(Point::new(center_x - base_width * 0.12, water_y));
    points.push(Point::new(center_x + base_width * 0.12, water_y));

    for i in (1..=layers).rev() {
        let progress = i as f64 / layers as f64;
        let layer_y = water_y - height * (1.0 - progress);
        let top_boost = 1.0 + progress * progress * 0.3;
        let layer_width = base_width * progress * 0.5 * top_boost;

        let tip_out = layer_width * (1.1 + rng.next() * 0.15);
        let tip_in = layer_width * (0.85 + rng.next() * 0.1);

        if i < layers {
            points.push(Point::new(center_x + tip_in, layer_y + height * 0.01));
        }
        points.push(Point::new(center_x + tip_out, layer_y - height * 0.02));
    }

    points
}

/// One placed tree, with its branch-jitter generator forked off the placement
/// sequence so the forest and its reflection derive identical silhouettes.
#[derive(Clone, Debug)]
pub struct TreePlacement {
    pub x: f64,
    /// Tree height above its base (left-of--60 reduction already applied).
    pub height: f64,
    pub width: f64,
    /// Clamped left-slope height under the trunk.
    pub slope_height: f64,
    pub z: f64,
    pub jitter: SeededRng,
}

/// One depth band of the forest.
#[derive(Clone, Debug)]
pub struct ForestLayer {
    /// How far the trunk bases sink below the slope ridge.
    pub base_drop: f64,
    pub trees: Vec<TreePlacement>,
}

struct LayerSpec {
    start_x: f64,
    end_x: f64,
    spacing: (f64, f64),
    base_drop: f64,
    x_factor: (f64, f64), // (offset, span) for the rightward height gain
    height: (f64, f64, f64), // (base, jitter, x gain)
    width: (f64, f64),
    z: (f64, f64),
}

const LAYER_SPECS: [LayerSpec; 3] = [
    // Back band: smaller, shorter trees on the ridge.
    LayerSpec {
        start_x: -140.0,
        end_x: 30.0,
        spacing: (2.0, 2.0),
        base_drop: 1.0,
        x_factor: (140.0, 170.0),
        height: (3.0, 2.0, 4.0),
        width: (4.0, 2.5),
        z: (-0.3, 0.2),
    },
    LayerSpec {
        start_x: -145.0,
        end_x: 25.0,
        spacing: (2.5, 2.5),
        base_drop: 2.0,
        x_factor: (145.0, 170.0),
        height: (4.0, 3.0, 5.0),
        width: (4.5, 3.0),
        z: (0.1, 0.2),
    },
    // Front band: tallest trees for the prominent silhouette.
    LayerSpec {
        start_x: -142.0,
        end_x: 20.0,
        spacing: (3.0, 3.0),
        base_drop: 3.0,
        x_factor: (142.0, 162.0),
        height: (5.0, 4.0, 6.0),
        width: (5.0, 3.5),
        z: (0.5, 0.2),
    },
];

/// Deterministic forest layout: every quantity, including per-tree branch
/// jitter, is drawn from the single seeded sequence. The reflection builder
/// replays the same placements, which is what keeps each mirrored tree in
/// visual correspondence with its original.
pub fn forest_placements(seed: u64) -> Vec<ForestLayer> {
    let slope = left_slope_ridge();
    let mut rng = SeededRng::new(seed);

    LAYER_SPECS
        .iter()
        .map(|spec| {
            let mut trees = Vec::new();
            let mut x = spec.start_x;
            while x < spec.end_x {
                let x_factor = ((x + spec.x_factor.0) / spec.x_factor.1).max(0.0);
                // Trees past the far-left edge shrink a little.
                let reduction = if x < -60.0 { 0.9 } else { 1.0 };
                let height = (spec.height.0
                    + rng.next() * spec.height.1
                    + x_factor * spec.height.2)
                    * reduction;
                let width = spec.width.0 + rng.next() * spec.width.1;
                let z = spec.z.0 + rng.next() * spec.z.1;
                trees.push(TreePlacement {
                    x,
                    height,
                    width,
                    slope_height: slope.height(x),
                    z,
                    jitter: rng.fork(),
                });
                x += spec.spacing.0 + rng.next() * spec.spacing.1;
            }
            ForestLayer {
                base_drop: spec.base_drop,
                trees,
            }
        })
        .collect()
}

/// Upright silhouette polygon for a placed tree.
pub fn forest_tree_path(layer: &ForestLayer, tree: &TreePlacement) -> BezPath {
    let base_y = HORIZON + tree.slope_height - layer.base_drop;
    let mut jitter = tree.jitter;
    polygon(&pine_outline(
        tree.x,
        base_y,
        tree.height,
        tree.width,
        &mut jitter,
    ))
}

/// Rounded deciduous tree for the right hill: a trunk rectangle plus three
/// overlapping canopy circles, merged into one silhouette.
pub fn round_tree_path(trunk_h: f64, canopy_r: f64) -> BezPath {
    let trunk_w = canopy_r * 0.2;
    let trunk = kurbo::Rect::new(-trunk_w, 0.0, trunk_w, trunk_h).to_path(0.1);

    let circles = [
        (0.0, trunk_h + canopy_r * 0.6, canopy_r),
        (-canopy_r * 0.4, trunk_h + canopy_r * 0.3, canopy_r * 0.6),
        (canopy_r * 0.4, trunk_h + canopy_r * 0.3, canopy_r * 0.6),
    ];
    let canopy = circles
        .iter()
        .map(|&(cx, cy, r)| kurbo::Circle::new(Point::new(cx, cy), r).to_path(0.1));

    merge_paths(std::iter::once(trunk).chain(canopy))
}

/// Fixed grove on the right shore, in world coordinates.
pub fn round_tree_grove() -> Vec<BezPath> {
    // (x, base_y, trunk_h, canopy_r)
    let grove = [
        (65.0, 12.0, 5.0, 4.0),
        (72.0, 14.0, 7.0, 5.0),
        (80.0, 15.0, 10.0, 7.0),
        (88.0, 14.0, 8.0, 6.0),
        (75.0, 14.5, 6.0, 4.0),
        (84.0, 15.0, 7.0, 5.0),
    ];
    grove
        .iter()
        .map(|&(x, base_y, trunk_h, canopy_r)| {
            let mut path = round_tree_path(trunk_h, canopy_r);
            path.apply_affine(Affine::translate((x, HORIZON + base_y)));
            path
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use kurbo::Shape as _;

    use super::*;

    #[test]
    fn pine_outline_is_deterministic_for_a_seed() {
        let mut a = SeededRng::new(42);
        let mut b = SeededRng::new(42);
        let pa = pine_outline(0.0, 0.0, 8.0, 5.0, &mut a);
        let pb = pine_outline(0.0, 0.0, 8.0, 5.0, &mut b);
        assert_eq!(pa, pb);
        assert_eq!(a.state(), b.state());
    }

    #[test]
    fn pine_and_mirror_consume_identical_draw_counts() {
        for seed in [1u64, 7, 99, 54321] {
            let mut up = SeededRng::new(seed);
            let mut down = SeededRng::new(seed);
            pine_outline(0.0, 0.0, 8.0, 5.0, &mut up);
            mirrored_pine_outline(0.0, -12.0, 8.0, 5.0, &mut down);
            assert_eq!(up.state(), down.state(), "draw counts diverged for seed {seed}");
        }
    }

    #[test]
    fn pine_layer_count_is_six_to_eight() {
        for seed in 0..64u64 {
            let mut rng = SeededRng::new(seed);
            let layers = 6 + (rng.next() * 3.0).floor() as usize;
            assert!((6..=8).contains(&layers));
        }
    }

    #[test]
    fn pine_outline_spans_tip_to_base() {
        let mut rng = SeededRng::new(3);
        let pts = pine_outline(10.0, 2.0, 8.0, 5.0, &mut rng);
        assert_eq!(pts[0], Point::new(10.0, 10.0));
        let min_y = pts.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        assert_eq!(min_y, 2.0);
    }

    #[test]
    fn mirrored_outline_hangs_below_the_water_line() {
        let mut rng = SeededRng::new(3);
        let pts = mirrored_pine_outline(10.0, -12.0, 8.0, 5.0, &mut rng);
        assert_eq!(pts[0], Point::new(10.0, -20.0));
        let max_y = pts.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
        assert!(max_y <= -12.0 + 1e-9);
    }

    #[test]
    fn placements_are_reproducible_and_populated() {
        let a = forest_placements(12345);
        let b = forest_placements(12345);
        assert_eq!(a.len(), 3);
        for (la, lb) in a.iter().zip(&b) {
            assert!(!la.trees.is_empty());
            assert_eq!(la.trees.len(), lb.trees.len());
            for (ta, tb) in la.trees.iter().zip(&lb.trees) {
                assert_eq!(ta.x, tb.x);
                assert_eq!(ta.height, tb.height);
                assert_eq!(ta.jitter, tb.jitter);
            }
        }
    }

    #[test]
    fn placement_heights_shrink_left_of_the_ridge_edge() {
        let layers = forest_placements(12345);
        for layer in &layers {
            for tree in &layer.trees {
                assert!(tree.height > 0.0);
                assert!(tree.width > 0.0);
                assert!(tree.slope_height >= 2.0);
            }
        }
    }

    #[test]
    fn round_tree_grove_sits_on_the_right_hill() {
        let grove = round_tree_grove();
        assert_eq!(grove.len(), 6);
        for path in &grove {
            let bbox = path.bounding_box();
            assert!(bbox.min_x() > 50.0);
            assert!(bbox.min_y() > HORIZON);
        }
    }
}
