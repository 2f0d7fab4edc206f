use crate::core::{BezPath, HORIZON, Point, polygon};

/// One Gaussian bump contributing to a ridgeline.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct Peak {
    pub height: f64,
    pub center: f64,
    pub spread: f64,
    /// Per-peak exponent inside the soft-max blend.
    pub exponent: f64,
}

impl Peak {
    pub fn bump(&self, x: f64) -> f64 {
        self.height * (-((x - self.center) / self.spread).powi(2)).exp()
    }
}

/// A ridgeline as a soft-max blend of Gaussian bumps:
/// `(Σ bump_i^exponent_i)^(1/norm_exponent)`, clamped to a strictly positive
/// floor so the closed polygon below it never degenerates.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Ridge {
    pub peaks: Vec<Peak>,
    pub norm_exponent: f64,
    pub floor: f64,
}

impl Ridge {
    pub fn height(&self, x: f64) -> f64 {
        let sum: f64 = self
            .peaks
            .iter()
            .map(|p| p.bump(x).powf(p.exponent))
            .sum();
        sum.powf(1.0 / self.norm_exponent).max(self.floor)
    }

    /// Sample the ridge over [x0, x1] at the given step, as world points above
    /// the horizon.
    pub fn sample(&self, x0: f64, x1: f64, step: f64) -> Vec<Point> {
        let mut points = Vec::new();
        let mut x = x0;
        while x <= x1 {
            points.push(Point::new(x, HORIZON + self.height(x)));
            x += step;
        }
        points
    }

    /// Sampled ridge closed down to the horizon into a filled region.
    pub fn to_path(&self, x0: f64, x1: f64, step: f64) -> BezPath {
        close_to_horizon(&self.sample(x0, x1, step))
    }
}

/// Close a ridge point run down to the water line.
pub fn close_to_horizon(ridge: &[Point]) -> BezPath {
    let Some(first) = ridge.first() else {
        return BezPath::new();
    };
    let last = ridge[ridge.len() - 1];

    let mut points = Vec::with_capacity(ridge.len() + 2);
    points.push(Point::new(first.x, HORIZON));
    points.extend_from_slice(ridge);
    points.push(Point::new(last.x, HORIZON));
    polygon(&points)
}

/// Far range behind the moon: three wide peaks with shallow blended valleys.
pub fn far_mountain_ridge() -> Ridge {
    Ridge {
        peaks: vec![
            Peak {
                height: 22.0,
                center: -70.0,
                spread: 32.0,
                exponent: 1.8,
            },
            Peak {
                height: 28.0,
                center: 0.0,
                spread: 34.0,
                exponent: 1.55,
            },
            Peak {
                height: 20.0,
                center: 75.0,
                spread: 30.0,
                exponent: 1.6,
            },
        ],
        norm_exponent: 1.6,
        floor: 0.5,
    }
}

/// Forested slope on the left of the lake.
pub fn left_slope_ridge() -> Ridge {
    Ridge {
        peaks: vec![Peak {
            height: 18.0,
            center: -60.0,
            spread: 40.0,
            exponent: 1.0,
        }],
        norm_exponent: 1.0,
        floor: 2.0,
    }
}

/// Hill on the right shore; its profile is also mirrored into the lake.
pub fn right_slope_ridge() -> Ridge {
    Ridge {
        peaks: vec![Peak {
            height: 15.0,
            center: 70.0,
            spread: 35.0,
            exponent: 1.0,
        }],
        norm_exponent: 1.0,
        floor: 2.0,
    }
}
