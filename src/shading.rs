use crate::core::{Point, Rgba, Vec2};

/// Inputs to a shade evaluation. `world` is the scene-space position, `uv` the
/// normalized 0..=1 position within the layer's uv rect (y up, like the plane
/// geometry the formulas were authored against), `time` the elapsed seconds.
#[derive(Clone, Copy, Debug)]
pub struct ShadeInput {
    pub world: Point,
    pub uv: Point,
    pub time: f64,
}

/// Per-layer shading rule. Evaluation is pure and stateless; animated
/// families read `time` and nothing else.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub enum Shading {
    Flat(Rgba),
    Sky {
        top: Rgba,
        mid: Rgba,
        horizon: Rgba,
        glow: Rgba,
    },
    MountainGradient {
        top: Rgba,
        bottom: Rgba,
    },
    /// Radial halo; alpha falls off as `(1 - smoothstep(d))^exponent * strength`.
    Glow {
        color: Rgba,
        exponent: f64,
        strength: f64,
    },
    Water {
        base: Rgba,
        highlight: Rgba,
        shimmer: Rgba,
    },
    MoonShimmer {
        color: Rgba,
        core: Rgba,
    },
    /// Three-stop vertical gradient used by the lake reflections.
    ReflectionGradient {
        top: Rgba,
        mid: Rgba,
        bottom: Rgba,
        alpha: f64,
    },
}

impl Shading {
    /// Whether `eval` depends on `time` (the render loop's animated uniforms).
    pub fn depends_on_time(&self) -> bool {
        matches!(self, Self::Water { .. } | Self::MoonShimmer { .. })
    }

    pub fn eval(&self, input: ShadeInput) -> Rgba {
        match *self {
            Self::Flat(color) => color,
            Self::Sky {
                top,
                mid,
                horizon,
                glow,
            } => shade_sky(input, top, mid, horizon, glow),
            Self::MountainGradient { top, bottom } => {
                let t = smoothstep(-2.0, 30.0, input.world.y);
                bottom.mix(top, t)
            }
            Self::Glow {
                color,
                exponent,
                strength,
            } => {
                let d = (input.uv - Point::new(0.5, 0.5)).hypot() * 2.0;
                let a = (1.0 - smoothstep(0.0, 1.0, d)).powf(exponent) * strength;
                color.with_alpha(a)
            }
            Self::Water {
                base,
                highlight,
                shimmer,
            } => shade_water(input, base, highlight, shimmer),
            Self::MoonShimmer { color, core } => shade_moon_shimmer(input, color, core),
            Self::ReflectionGradient {
                top,
                mid,
                bottom,
                alpha,
            } => {
                let t = smoothstep(-28.0, -8.0, input.world.y);
                let color = if t < 0.5 {
                    bottom.mix(mid, t * 2.0)
                } else {
                    mid.mix(top, (t - 0.5) * 2.0)
                };
                color.with_alpha(alpha)
            }
        }
    }
}

fn shade_sky(input: ShadeInput, top: Rgba, mid: Rgba, horizon: Rgba, glow: Rgba) -> Rgba {
    let y = input.uv.y;

    let mut color = glow.mix(horizon, smoothstep(0.0, 0.25, y));
    color = color.mix(mid, smoothstep(0.15, 0.5, y));
    color = color.mix(top, smoothstep(0.4, 0.9, y));

    // Warm lobe spreading from the lower center of the sky.
    let x_center = (input.uv.x - 0.5).abs() * 2.0;
    let glow_x = 1.0 - smoothstep(0.0, 0.85, x_center);
    let glow_y = 1.0 - smoothstep(0.0, 0.4, y);
    color.mix(glow, glow_x * glow_y * 0.6)
}

fn shade_water(input: ShadeInput, base: Rgba, highlight: Rgba, shimmer: Rgba) -> Rgba {
    let p = Vec2::new(input.world.x, input.world.y);
    let time = input.time;

    // Noise-driven domain distortion keeps the ripple bands organic.
    let distort_x = fbm(p * 0.08 + Vec2::new(time * 0.1, time * 0.1)) * 8.0;
    let distort_y = fbm(p * 0.06 - Vec2::new(time * 0.08, time * 0.08)) * 5.0;
    let dp = p + Vec2::new(distort_x, distort_y);

    let mut ripple1 = (dp.y * 0.4 + dp.x * 0.02 + time * 0.3).sin();
    ripple1 += (dp.y * 0.25 + time * 0.2).sin() * 0.5;
    let ripple1 = ripple1 * 0.5 + 0.5;

    let mut ripple2 = (dp.y * 0.8 - dp.x * 0.04 + time * 0.5).sin();
    ripple2 += fbm(dp * 0.15 + Vec2::new(time * 0.2, time * 0.2)) * 0.6;
    let ripple2 = ripple2 * 0.5 + 0.5;

    // Soft bands instead of hard grid lines.
    let band1 = smoothstep(0.35, 0.5, ripple1) * smoothstep(0.65, 0.5, ripple1);
    let band2 = smoothstep(0.4, 0.55, ripple2) * smoothstep(0.7, 0.55, ripple2);

    // Stronger near the horizon, fading toward the bottom of the lake.
    let depth_fade = smoothstep(-50.0, -15.0, p.y);
    let ripples = (band1 * 0.6 + band2 * 0.4) * 0.35 * depth_fade;

    let surface_noise = fbm(p * 0.2 + Vec2::new(time * 0.05, time * 0.05)) * 0.15;

    let mut color = base.mix(highlight, ripples + surface_noise * depth_fade);

    // Diffuse shimmer column under the moon.
    let moon_x = smoothstep(20.0, 35.0, p.x) * smoothstep(50.0, 35.0, p.x);
    let moon_shimmer = fbm(Vec2::new(p.x * 0.1, p.y * 0.3 + time * 0.4)) * 0.5 + 0.5;
    color = color.mix(shimmer, moon_x * moon_shimmer * 0.25 * depth_fade);

    color.with_alpha(1.0)
}

fn shade_moon_shimmer(input: ShadeInput, color: Rgba, core: Rgba) -> Rgba {
    // Only visible below the water line.
    if input.world.y > -10.0 {
        return color.with_alpha(0.0);
    }
    let clip_fade = smoothstep(-10.0, -14.0, input.world.y);

    let x_center = (input.uv.x - 0.5) * 2.0;
    let x_dist = x_center.abs();
    let y_pos = input.uv.y;

    // Wider at the bottom, narrowing toward the water line.
    let width_factor = lerp(0.8, 0.15, y_pos);
    let x_fade = (-(x_dist / width_factor).powi(2) * 2.0).exp();
    let y_fade = smoothstep(0.0, 0.4, y_pos) * smoothstep(1.0, 0.4, y_pos);

    let wave1 = (y_pos * 25.0 + input.time * 1.2 + x_center * 3.0).sin() * 0.5 + 0.5;
    let wave2 = (y_pos * 15.0 - input.time * 0.8 + x_center * 2.0).sin() * 0.5 + 0.5;
    let wave3 = (y_pos * 40.0 + input.time * 2.0).sin() * 0.5 + 0.5;
    let shimmer = smoothstep(0.3, 0.7, wave1 * 0.4 + wave2 * 0.35 + wave3 * 0.25);

    let core_fade = (-(x_dist / (width_factor * 0.5)).powi(2) * 3.0).exp();

    let mut alpha = x_fade * y_fade * (0.3 + shimmer * 0.4);
    alpha += core_fade * y_fade * shimmer * 0.3;
    alpha *= clip_fade;

    color.mix(core, core_fade * 0.6).with_alpha(alpha * 0.6)
}

pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Hermite step between the two edges. Reversed edges (`e0 > e1`) produce the
/// descending ramp, which several of the band windows rely on.
pub fn smoothstep(e0: f64, e1: f64, x: f64) -> f64 {
    let t = ((x - e0) / (e1 - e0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

pub fn fract(x: f64) -> f64 {
    x - x.floor()
}

fn hash2(p: Vec2) -> f64 {
    fract((p.x * 127.1 + p.y * 311.7).sin() * 43758.5453)
}

/// Bilinear value noise over the integer lattice, smoothed per axis.
pub fn value_noise(p: Vec2) -> f64 {
    let i = Vec2::new(p.x.floor(), p.y.floor());
    let f = Vec2::new(fract(p.x), fract(p.y));
    let fx = f.x * f.x * (3.0 - 2.0 * f.x);
    let fy = f.y * f.y * (3.0 - 2.0 * f.y);

    let a = hash2(i);
    let b = hash2(i + Vec2::new(1.0, 0.0));
    let c = hash2(i + Vec2::new(0.0, 1.0));
    let d = hash2(i + Vec2::new(1.0, 1.0));

    lerp(lerp(a, b, fx), lerp(c, d, fx), fy)
}

/// Four-octave fractal noise, amplitude halving and frequency doubling per
/// octave.
pub fn fbm(p: Vec2) -> f64 {
    let mut value = 0.0;
    let mut amplitude = 0.5;
    let mut p = p;
    for _ in 0..4 {
        value += amplitude * value_noise(p);
        p = p * 2.0;
        amplitude *= 0.5;
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(world: (f64, f64), uv: (f64, f64), time: f64) -> ShadeInput {
        ShadeInput {
            world: Point::new(world.0, world.1),
            uv: Point::new(uv.0, uv.1),
            time,
        }
    }

    #[test]
    fn smoothstep_endpoints_and_reversal() {
        assert_eq!(smoothstep(0.0, 1.0, -1.0), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 2.0), 1.0);
        assert_eq!(smoothstep(0.0, 1.0, 0.5), 0.5);
        // Reversed edges descend.
        assert_eq!(smoothstep(1.0, 0.0, 0.0), 1.0);
        assert_eq!(smoothstep(1.0, 0.0, 1.0), 0.0);
    }

    #[test]
    fn fbm_stays_in_unit_range() {
        for ix in -8..8 {
            for iy in -8..8 {
                let v = fbm(Vec2::new(ix as f64 * 0.73, iy as f64 * 1.19));
                assert!((0.0..1.0).contains(&v), "fbm out of range: {v}");
            }
        }
    }

    #[test]
    fn shading_is_pure() {
        let s = Shading::Water {
            base: Rgba::from_rgb8(0x3a, 0x10, 0x18),
            highlight: Rgba::from_rgb8(0x7a, 0x38, 0x50),
            shimmer: Rgba::from_rgb8(0x8a, 0x40, 0x58),
        };
        let i = input((10.0, -30.0), (0.5, 0.5), 1.25);
        assert_eq!(s.eval(i).to_rgba8(), s.eval(i).to_rgba8());
    }

    #[test]
    fn water_is_opaque() {
        let s = Shading::Water {
            base: Rgba::from_rgb8(0x3a, 0x10, 0x18),
            highlight: Rgba::from_rgb8(0x7a, 0x38, 0x50),
            shimmer: Rgba::from_rgb8(0x8a, 0x40, 0x58),
        };
        assert_eq!(s.eval(input((0.0, -20.0), (0.5, 0.5), 0.0)).a, 1.0);
    }

    #[test]
    fn moon_shimmer_clips_above_water_line() {
        let s = Shading::MoonShimmer {
            color: Rgba::from_rgb8(0xff, 0xb8, 0xd0),
            core: Rgba::from_rgb8(0xff, 0xe8, 0xe8),
        };
        let above = s.eval(input((35.0, -5.0), (0.5, 0.9), 0.0));
        assert_eq!(above.a, 0.0);
        let below = s.eval(input((35.0, -20.0), (0.5, 0.5), 0.0));
        assert!(below.a >= 0.0);
    }

    #[test]
    fn reflection_gradient_is_continuous_at_midpoint() {
        let s = Shading::ReflectionGradient {
            top: Rgba::from_rgb8(0x4c, 0x0f, 0x34),
            mid: Rgba::from_rgb8(0x61, 0x13, 0x42),
            bottom: Rgba::from_rgb8(0x69, 0x15, 0x48),
            alpha: 0.5,
        };
        // y where smoothstep(-28, -8, y) == 0.5 is the midpoint of the edges.
        let lo = s.eval(input((0.0, -18.0001), (0.0, 0.0), 0.0));
        let hi = s.eval(input((0.0, -17.9999), (0.0, 0.0), 0.0));
        assert!((lo.r - hi.r).abs() < 1e-3);
        assert_eq!(lo.a, 0.5);
    }

    #[test]
    fn glow_fades_to_zero_at_rim() {
        let s = Shading::Glow {
            color: Rgba::from_rgb8(0xff, 0xc8, 0xd8),
            exponent: 3.0,
            strength: 0.2,
        };
        let center = s.eval(input((0.0, 0.0), (0.5, 0.5), 0.0));
        let rim = s.eval(input((0.0, 0.0), (1.0, 0.5), 0.0));
        assert!(center.a > 0.19);
        assert!(rim.a.abs() < 1e-12);
    }

    #[test]
    fn time_dependence_flags() {
        assert!(
            Shading::Water {
                base: Rgba::WHITE,
                highlight: Rgba::WHITE,
                shimmer: Rgba::WHITE,
            }
            .depends_on_time()
        );
        assert!(!Shading::Flat(Rgba::WHITE).depends_on_time());
    }
}
