use crate::error::{MoonlakeError, MoonlakeResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// World-space y of the water line; everything above is sky/land, below is lake.
pub const HORIZON: f64 = 0.0;

/// Linear RGBA color, channels in 0..=1. Alpha is straight (not premultiplied).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0, 1.0)
    }

    /// Parse `#rrggbb` (alpha 1.0).
    pub fn from_hex(hex: &str) -> MoonlakeResult<Self> {
        let s = hex.strip_prefix('#').unwrap_or(hex);
        if s.len() != 6 || !s.is_ascii() {
            return Err(MoonlakeError::validation(format!(
                "expected #rrggbb color, got '{hex}'"
            )));
        }
        let byte = |i: usize| -> MoonlakeResult<f64> {
            u8::from_str_radix(&s[i..i + 2], 16)
                .map(|v| f64::from(v) / 255.0)
                .map_err(|_| MoonlakeError::validation(format!("invalid hex color '{hex}'")))
        };
        Ok(Self::new(byte(0)?, byte(2)?, byte(4)?, 1.0))
    }

    pub fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    /// Linear blend toward `other` by `t` in 0..=1 (GLSL `mix`).
    pub fn mix(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }

    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    /// Premultiplied RGBA8, the byte layout the CPU rasterizer composites in.
    pub fn to_rgba8_premul(self) -> [u8; 4] {
        let a = self.a.clamp(0.0, 1.0);
        let q = |c: f64| (c.clamp(0.0, 1.0) * a * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), (a * 255.0).round() as u8]
    }
}

/// Output pixel dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> MoonlakeResult<Self> {
        if width == 0 || height == 0 {
            return Err(MoonlakeError::validation("viewport width/height must be > 0"));
        }
        Ok(Self { width, height })
    }

    pub fn aspect(self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }
}

/// Orthographic world window. The reference frame is y-up with the water line
/// at y=0; pixels are y-down, so `to_pixels` flips the vertical axis.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OrthoCamera {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Default for OrthoCamera {
    fn default() -> Self {
        Self {
            left: -100.0,
            right: 100.0,
            top: 50.0,
            bottom: -50.0,
        }
    }
}

impl OrthoCamera {
    /// Fixed vertical extent of ±50 world units, horizontal extent scaled by
    /// the viewport aspect ratio (matches the resize behavior of the scene).
    pub fn with_aspect(aspect: f64) -> Self {
        Self {
            left: -50.0 * aspect,
            right: 50.0 * aspect,
            top: 50.0,
            bottom: -50.0,
        }
    }

    pub fn width(self) -> f64 {
        self.right - self.left
    }

    pub fn height(self) -> f64 {
        self.top - self.bottom
    }

    /// World -> pixel affine for the given viewport.
    pub fn to_pixels(self, viewport: Viewport) -> Affine {
        let sx = f64::from(viewport.width) / self.width();
        let sy = f64::from(viewport.height) / self.height();
        // x' = (x - left) * sx, y' = (top - y) * sy
        Affine::new([sx, 0.0, 0.0, -sy, -self.left * sx, self.top * sy])
    }

    /// Project a world point to pixel coordinates.
    pub fn project(self, p: Point, viewport: Viewport) -> Point {
        self.to_pixels(viewport) * p
    }
}

/// Close an ordered point run into a filled polygon path.
pub fn polygon(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let mut iter = points.iter();
    if let Some(first) = iter.next() {
        path.move_to(*first);
        for p in iter {
            path.line_to(*p);
        }
        path.close_path();
    }
    path
}

/// Concatenate several closed paths into one, so a whole group fills as a
/// single surface (translucent shading must not stack where shapes overlap).
pub fn merge_paths(paths: impl IntoIterator<Item = BezPath>) -> BezPath {
    let mut merged = BezPath::new();
    for path in paths {
        merged.extend(path);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polygon_closes_the_outline() {
        let path = polygon(&[
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(0.5, 1.0),
        ]);
        let els: Vec<_> = path.elements().to_vec();
        assert_eq!(els.len(), 4);
        assert!(matches!(els.last(), Some(kurbo::PathEl::ClosePath)));
    }

    #[test]
    fn merge_paths_keeps_all_subpaths() {
        let a = polygon(&[Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(0.0, 1.0)]);
        let b = polygon(&[Point::new(2.0, 0.0), Point::new(3.0, 0.0), Point::new(2.0, 1.0)]);
        let merged = merge_paths([a.clone(), b.clone()]);
        assert_eq!(merged.elements().len(), a.elements().len() + b.elements().len());
    }

    #[test]
    fn hex_parse_roundtrip() {
        let c = Rgba::from_hex("#ff8000").unwrap();
        assert_eq!(c.to_rgba8(), [255, 128, 0, 255]);
        assert!(Rgba::from_hex("nope").is_err());
        assert!(Rgba::from_hex("#12345").is_err());
    }

    #[test]
    fn premul_scales_color_channels() {
        let c = Rgba::new(1.0, 0.5, 0.0, 0.5);
        assert_eq!(c.to_rgba8_premul(), [128, 64, 0, 128]);
    }

    #[test]
    fn mix_endpoints() {
        let a = Rgba::new(0.0, 0.0, 0.0, 1.0);
        let b = Rgba::new(1.0, 1.0, 1.0, 1.0);
        assert_eq!(a.mix(b, 0.0), a);
        assert_eq!(a.mix(b, 1.0), b);
    }

    #[test]
    fn camera_projects_moon_to_expected_screen_fraction() {
        // Moon sits at (35, 28); with the default window that is 67.5% across
        // and 22% down.
        let cam = OrthoCamera::default();
        let vp = Viewport::new(200, 100).unwrap();
        let px = cam.project(Point::new(35.0, 28.0), vp);
        assert!((px.x - 135.0).abs() < 1e-9);
        assert!((px.y - 22.0).abs() < 1e-9);
    }

    #[test]
    fn aspect_camera_keeps_vertical_extent() {
        let cam = OrthoCamera::with_aspect(2.0);
        assert_eq!(cam.top, 50.0);
        assert_eq!(cam.bottom, -50.0);
        assert_eq!(cam.left, -100.0);
        assert_eq!(cam.right, 100.0);
    }
}
