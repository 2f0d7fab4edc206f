use std::f64::consts::PI;

use kurbo::Shape as _;

use crate::core::{BezPath, HORIZON, Point, Rect, polygon};
use crate::error::MoonlakeResult;
use crate::flora;
use crate::lake;
use crate::palette::Palette;
use crate::rng::SeededRng;
use crate::scene::{Layer, LayerId, Scene, TwinkleEntry};
use crate::shading::Shading;
use crate::terrain;

/// World position of the moon disc; the flight animation targets its screen
/// projection.
pub const MOON_POSITION: Point = Point::new(35.0, 28.0);

/// Everything the builder needs to produce a scene. Identical params produce
/// an identical scene.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SceneParams {
    pub palette: Palette,
    /// Seed for star placement.
    pub star_seed: u64,
    /// Seed for forest placement; the reflections replay it.
    pub forest_seed: u64,
    pub tree_reflection_alpha: f64,
    pub mountain_reflection_alpha: f64,
}

impl Default for SceneParams {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            star_seed: 54321,
            forest_seed: 12345,
            tree_reflection_alpha: 0.45,
            mountain_reflection_alpha: 0.5,
        }
    }
}

/// Build the full scene once: sky, stars, moon, mountain ranges, forest,
/// lake bands, and the lake reflections, in depth order. The returned
/// [`Scene`] is the only state the render loop touches.
#[tracing::instrument(skip(params))]
pub fn build_scene(params: &SceneParams) -> MoonlakeResult<Scene> {
    let pal = &params.palette;
    let mut layers = Vec::new();
    let mut twinkles = Vec::new();

    // Sky backdrop.
    let sky_rect = Rect::new(-150.0, 0.0, 150.0, 100.0);
    layers.push(Layer {
        name: "sky".to_string(),
        path: sky_rect.to_path(0.1),
        uv_rect: sky_rect,
        shading: Shading::Sky {
            top: pal.sky_top,
            mid: pal.sky_mid,
            horizon: pal.sky_horizon,
            glow: pal.horizon_glow,
        },
        z: -20.0,
        opacity: 1.0,
    });

    build_stars(params, &mut layers, &mut twinkles);
    build_moon(params, &mut layers);

    // Far range, gradient-shaded.
    let far = terrain::far_mountain_ridge();
    let far_path = far.to_path(-150.0, 150.0, 2.0);
    layers.push(Layer {
        name: "far-mountain".to_string(),
        uv_rect: far_path.bounding_box(),
        path: far_path,
        shading: Shading::MountainGradient {
            top: pal.mountain_top,
            bottom: pal.mountain_base,
        },
        z: -8.0,
        opacity: 1.0,
    });

    // Near silhouettes: the forested slope on the left, the hill on the right.
    let left = terrain::left_slope_ridge().to_path(-150.0, 40.0, 2.0);
    layers.push(Layer {
        name: "near-mountain-left".to_string(),
        uv_rect: left.bounding_box(),
        path: left,
        shading: Shading::Flat(pal.silhouette),
        z: -6.0,
        opacity: 1.0,
    });
    let right = terrain::right_slope_ridge().to_path(30.0, 150.0, 2.0);
    layers.push(Layer {
        name: "near-mountain-right".to_string(),
        uv_rect: right.bounding_box(),
        path: right,
        shading: Shading::Flat(pal.silhouette),
        z: -6.0,
        opacity: 1.0,
    });

    for (i, path) in flora::round_tree_grove().into_iter().enumerate() {
        layers.push(Layer {
            name: format!("round-tree-{i}"),
            uv_rect: path.bounding_box(),
            path,
            shading: Shading::Flat(pal.silhouette),
            z: -5.9,
            opacity: 1.0,
        });
    }

    let forest = flora::forest_placements(params.forest_seed);
    build_forest(params, &forest, &mut layers);
    build_lake(params, &forest, &mut layers);

    let scene = Scene {
        layers,
        twinkles,
        time: 0.0,
    };
    scene.validate()?;
    tracing::debug!(
        layers = scene.layers.len(),
        twinkles = scene.twinkles.len(),
        "scene built"
    );
    Ok(scene)
}

fn circle_path(center: Point, radius: f64) -> BezPath {
    kurbo::Circle::new(center, radius).to_path(0.1)
}

fn build_stars(params: &SceneParams, layers: &mut Vec<Layer>, twinkles: &mut Vec<TwinkleEntry>) {
    let mut rng = SeededRng::new(params.star_seed);
    let star_color = params.palette.star;

    // Main field across the whole sky; mostly tiny, a few larger.
    for _ in 0..150 {
        let x = (rng.next() - 0.5) * 250.0;
        let y = rng.next() * 42.0 + 8.0;

        let size_rand = rng.next();
        let size = if size_rand > 0.97 {
            0.35 + rng.next() * 0.15
        } else if size_rand > 0.85 {
            0.2 + rng.next() * 0.1
        } else {
            0.08 + rng.next() * 0.1
        };

        push_star(layers, twinkles, &mut rng, star_color, x, y, size);
    }

    // Extra density in the upper-left corner.
    for _ in 0..25 {
        let x = -125.0 + rng.next() * 80.0;
        let y = 30.0 + rng.next() * 20.0;

        let size_rand = rng.next();
        let size = if size_rand > 0.9 {
            0.25 + rng.next() * 0.15
        } else {
            0.08 + rng.next() * 0.12
        };

        push_star(layers, twinkles, &mut rng, star_color, x, y, size);
    }
}

fn push_star(
    layers: &mut Vec<Layer>,
    twinkles: &mut Vec<TwinkleEntry>,
    rng: &mut SeededRng,
    color: crate::core::Rgba,
    x: f64,
    y: f64,
    size: f64,
) {
    let base_opacity = 0.3 + rng.next() * 0.5;
    let path = circle_path(Point::new(x, y), size);
    layers.push(Layer {
        name: format!("star-{}", layers.len()),
        uv_rect: path.bounding_box(),
        path,
        shading: Shading::Flat(color),
        z: -15.0,
        opacity: base_opacity,
    });
    // A sparse subset of stars twinkle.
    if rng.next() < 0.15 {
        twinkles.push(TwinkleEntry {
            layer: LayerId(layers.len() - 1),
            base_opacity,
            speed: 1.5 + rng.next() * 2.5,
            phase: rng.next() * PI * 2.0,
        });
    }
}

fn build_moon(params: &SceneParams, layers: &mut Vec<Layer>) {
    let pal = &params.palette;

    let outer = circle_path(MOON_POSITION, 20.0);
    layers.push(Layer {
        name: "moon-glow-outer".to_string(),
        uv_rect: outer.bounding_box(),
        path: outer,
        shading: Shading::Glow {
            color: pal.moon_glow_outer,
            exponent: 3.0,
            strength: 0.2,
        },
        z: -12.0,
        opacity: 1.0,
    });

    let inner = circle_path(MOON_POSITION, 12.0);
    layers.push(Layer {
        name: "moon-glow-inner".to_string(),
        uv_rect: inner.bounding_box(),
        path: inner,
        shading: Shading::Glow {
            color: pal.moon_glow_inner,
            exponent: 2.0,
            strength: 0.4,
        },
        z: -11.0,
        opacity: 1.0,
    });

    let disc = circle_path(MOON_POSITION, 8.0);
    layers.push(Layer {
        name: "moon".to_string(),
        uv_rect: disc.bounding_box(),
        path: disc,
        shading: Shading::Flat(pal.moon),
        z: -10.0,
        opacity: 1.0,
    });
}

fn build_forest(params: &SceneParams, forest: &[flora::ForestLayer], layers: &mut Vec<Layer>) {
    let pal = &params.palette;

    // Solid strip along the ridge so trunk bottoms never show gaps.
    let slope = terrain::left_slope_ridge();
    let mut strip = vec![Point::new(-150.0, HORIZON), Point::new(-150.0, HORIZON + 2.0)];
    let mut x = -150.0;
    while x <= 35.0 {
        strip.push(Point::new(x, HORIZON + slope.height(x) - 2.0));
        x += 2.0;
    }
    strip.push(Point::new(35.0, HORIZON));
    layers.push(Layer {
        name: "forest-base".to_string(),
        path: polygon(&strip),
        uv_rect: Rect::new(-150.0, HORIZON, 35.0, HORIZON + 18.0),
        shading: Shading::Flat(pal.silhouette),
        z: -4.7,
        opacity: 1.0,
    });

    for (band, layer) in forest.iter().enumerate() {
        for (i, tree) in layer.trees.iter().enumerate() {
            let path = flora::forest_tree_path(layer, tree);
            layers.push(Layer {
                name: format!("pine-{band}-{i}"),
                uv_rect: path.bounding_box(),
                path,
                shading: Shading::Flat(pal.silhouette),
                z: -5.5 + tree.z,
                opacity: 1.0,
            });
        }
    }
}

fn build_lake(params: &SceneParams, forest: &[flora::ForestLayer], layers: &mut Vec<Layer>) {
    let pal = &params.palette;

    let floor = lake::floor_band_path();
    layers.push(Layer {
        name: "lake-floor".to_string(),
        uv_rect: floor.bounding_box(),
        path: floor,
        shading: Shading::Flat(pal.lake_floor),
        z: -2.0,
        opacity: 1.0,
    });

    let water = lake::water_band_path();
    layers.push(Layer {
        name: "lake-water".to_string(),
        uv_rect: water.bounding_box(),
        path: water,
        shading: Shading::Water {
            base: pal.water_base,
            highlight: pal.water_highlight,
            shimmer: pal.water_shimmer,
        },
        z: -3.0,
        opacity: 1.0,
    });

    let shore = lake::shore_band_path();
    layers.push(Layer {
        name: "lake-shore".to_string(),
        uv_rect: shore.bounding_box(),
        path: shore,
        shading: Shading::Flat(pal.silhouette),
        z: -5.0,
        opacity: 1.0,
    });

    let reflections = lake::tree_reflections_path(forest);
    layers.push(Layer {
        name: "tree-reflections".to_string(),
        uv_rect: reflections.bounding_box(),
        path: reflections,
        shading: Shading::ReflectionGradient {
            top: pal.reflection_top,
            mid: pal.reflection_mid,
            bottom: pal.reflection_bottom,
            alpha: params.tree_reflection_alpha,
        },
        z: 1.0,
        opacity: 1.0,
    });

    let mountain = lake::mountain_reflection_path();
    layers.push(Layer {
        name: "mountain-reflection".to_string(),
        uv_rect: mountain.bounding_box(),
        path: mountain,
        shading: Shading::ReflectionGradient {
            top: pal.reflection_top,
            mid: pal.reflection_mid,
            bottom: pal.reflection_bottom,
            alpha: params.mountain_reflection_alpha,
        },
        z: 0.8,
        opacity: 1.0,
    });

    let shimmer_rect = lake::moon_reflection_rect();
    layers.push(Layer {
        name: "moon-shimmer".to_string(),
        path: shimmer_rect.to_path(0.1),
        uv_rect: shimmer_rect,
        shading: Shading::MoonShimmer {
            color: pal.moon_reflection,
            core: pal.moon_reflection_core,
        },
        z: 2.0,
        opacity: 1.0,
    });
}
