use crate::core::{BezPath, Rect};
use crate::error::{MoonlakeError, MoonlakeResult};
use crate::shading::Shading;

/// Index of a layer within [`Scene::layers`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct LayerId(pub usize);

/// One generated surface: a closed outline plus its shading rule and depth.
/// Built once at startup; only `opacity` (twinkling stars) mutates afterwards.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Layer {
    pub name: String,
    pub path: BezPath,
    /// World rect the shading's uv coordinates are normalized against.
    pub uv_rect: Rect,
    pub shading: Shading,
    pub z: f64,
    pub opacity: f64,
}

/// Animation descriptor for a star whose opacity pulses over time.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct TwinkleEntry {
    pub layer: LayerId,
    pub base_opacity: f64,
    pub speed: f64,
    pub phase: f64,
}

/// The built scene: the explicit context handed from the builder to the
/// render loop. Layer cardinality is fixed for the process lifetime.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Scene {
    pub layers: Vec<Layer>,
    pub twinkles: Vec<TwinkleEntry>,
    /// Elapsed seconds, pushed into the animated shadings each frame.
    pub time: f64,
}

impl Scene {
    pub fn validate(&self) -> MoonlakeResult<()> {
        for layer in &self.layers {
            if layer.path.elements().is_empty() {
                return Err(MoonlakeError::validation(format!(
                    "layer '{}' has an empty path",
                    layer.name
                )));
            }
            if layer.uv_rect.width() <= 0.0 || layer.uv_rect.height() <= 0.0 {
                return Err(MoonlakeError::validation(format!(
                    "layer '{}' has a degenerate uv rect",
                    layer.name
                )));
            }
            if !(0.0..=1.0).contains(&layer.opacity) {
                return Err(MoonlakeError::validation(format!(
                    "layer '{}' opacity out of range",
                    layer.name
                )));
            }
        }
        for tw in &self.twinkles {
            if tw.layer.0 >= self.layers.len() {
                return Err(MoonlakeError::validation(format!(
                    "twinkle entry references missing layer {}",
                    tw.layer.0
                )));
            }
            if tw.base_opacity <= 0.0 || tw.speed <= 0.0 {
                return Err(MoonlakeError::validation(
                    "twinkle base opacity and speed must be > 0",
                ));
            }
        }
        Ok(())
    }

    /// Advance the animated uniforms to the given elapsed time. Twinkling
    /// stars pulse between 20% and 100% of their base opacity.
    pub fn advance(&mut self, time: f64) {
        self.time = time;
        let Self { layers, twinkles, .. } = self;
        for tw in twinkles.iter() {
            let twinkle = (time * tw.speed + tw.phase).sin() * 0.5 + 0.5;
            layers[tw.layer.0].opacity = tw.base_opacity * (0.2 + 0.8 * twinkle);
        }
    }

    /// Layer indices back-to-front.
    pub fn draw_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.layers.len()).collect();
        order.sort_by(|&a, &b| {
            self.layers[a]
                .z
                .total_cmp(&self.layers[b].z)
                .then(a.cmp(&b))
        });
        order
    }
}
