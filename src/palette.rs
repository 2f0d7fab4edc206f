use crate::core::Rgba;

/// Named color roles for the scene, loaded once and never mutated.
///
/// The default is the reference sunset palette (pinkish maroon/purple dusk).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Palette {
    pub sky_top: Rgba,
    pub sky_mid: Rgba,
    pub sky_horizon: Rgba,
    pub horizon_glow: Rgba,

    /// Far ridge gradient, peak color.
    pub mountain_top: Rgba,
    /// Far ridge gradient, base color.
    pub mountain_base: Rgba,

    /// Near mountains, pine trees, lake shore band.
    pub silhouette: Rgba,

    /// Deepest water band at the bottom of the frame.
    pub lake_floor: Rgba,
    pub water_base: Rgba,
    pub water_highlight: Rgba,
    pub water_shimmer: Rgba,

    pub moon: Rgba,
    pub moon_glow_outer: Rgba,
    pub moon_glow_inner: Rgba,
    pub moon_reflection: Rgba,
    pub moon_reflection_core: Rgba,

    pub reflection_top: Rgba,
    pub reflection_mid: Rgba,
    pub reflection_bottom: Rgba,

    pub star: Rgba,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            sky_top: Rgba::from_rgb8(0x4a, 0x18, 0x40),
            sky_mid: Rgba::from_rgb8(0x80, 0x30, 0x58),
            sky_horizon: Rgba::from_rgb8(0xb0, 0x68, 0x78),
            horizon_glow: Rgba::from_rgb8(0xc8, 0x80, 0x88),

            mountain_top: Rgba::from_rgb8(0x7a, 0x30, 0x58),
            mountain_base: Rgba::from_rgb8(0xc8, 0x78, 0x8a),

            silhouette: Rgba::from_rgb8(0x2e, 0x07, 0x18),

            lake_floor: Rgba::from_rgb8(0x1c, 0x05, 0x10),
            water_base: Rgba::from_rgb8(0x3a, 0x10, 0x18),
            water_highlight: Rgba::from_rgb8(0x7a, 0x38, 0x50),
            water_shimmer: Rgba::from_rgb8(0x8a, 0x40, 0x58),

            moon: Rgba::from_rgb8(0xff, 0xf8, 0xfc),
            moon_glow_outer: Rgba::from_rgb8(0xff, 0xc8, 0xd8),
            moon_glow_inner: Rgba::from_rgb8(0xff, 0xe8, 0xe8),
            moon_reflection: Rgba::from_rgb8(0xff, 0xb8, 0xd0),
            moon_reflection_core: Rgba::from_rgb8(0xff, 0xe8, 0xe8),

            reflection_top: Rgba::from_rgb8(0x4c, 0x0f, 0x34),
            reflection_mid: Rgba::from_rgb8(0x61, 0x13, 0x42),
            reflection_bottom: Rgba::from_rgb8(0x69, 0x15, 0x48),

            star: Rgba::WHITE,
        }
    }
}
