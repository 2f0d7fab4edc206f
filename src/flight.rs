use std::f64::consts::PI;
use std::time::Duration;

use crate::compose::MOON_POSITION;
use crate::core::{OrthoCamera, Point, Viewport};
use crate::ease::Ease;

/// Minimum gap between sparkles along the trail.
const SPARKLE_INTERVAL: Duration = Duration::from_millis(80);
/// No sparkles once the letter is nearly at the moon.
const SPARKLE_CUTOFF_PROGRESS: f64 = 0.9;

/// The letter-to-moon flourish: a fixed-duration eased interpolation along a
/// cubic Bezier arc in screen space. It runs to completion and cannot be
/// interrupted; it touches no scene state, so it needs no coordination with
/// the render loop.
#[derive(Clone, Copy, Debug)]
pub struct Flight {
    start: Point,
    cp1: Point,
    cp2: Point,
    target: Point,
    duration: Duration,
}

/// Pose of the flying letter at some point along the arc.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlightSample {
    pub position: Point,
    /// Shrinks from 1.0 to 0.1 as the letter approaches the moon.
    pub scale: f64,
    /// Gentle wobble plus a slow lean, in degrees.
    pub rotation_deg: f64,
    pub progress: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FlightStatus {
    Active(FlightSample),
    Done,
}

impl Flight {
    pub const DURATION: Duration = Duration::from_secs(2);

    /// Arc from `start` to `target` (both in pixels): up first, then a high
    /// curve toward the target.
    pub fn new(start: Point, target: Point) -> Self {
        let cp1 = Point::new(start.x + (target.x - start.x) * 0.1, start.y - 200.0);
        let cp2 = Point::new(
            start.x + (target.x - start.x) * 0.6,
            start.y.min(target.y) - 150.0,
        );
        Self {
            start,
            cp1,
            cp2,
            target,
            duration: Self::DURATION,
        }
    }

    /// Arc from `start` to the moon's screen-projected position.
    pub fn to_moon(start: Point, camera: OrthoCamera, viewport: Viewport) -> Self {
        Self::new(start, camera.project(MOON_POSITION, viewport))
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn sample(&self, elapsed: Duration) -> FlightStatus {
        let progress = (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0);
        if progress >= 1.0 {
            return FlightStatus::Done;
        }

        let eased = Ease::OutQuart.apply(progress);
        let position = cubic_bezier(eased, self.start, self.cp1, self.cp2, self.target);
        let scale = 1.0 - progress * 0.9;
        let rotation_deg = (progress * PI * 8.0).sin() * 5.0 + progress * -15.0;

        FlightStatus::Active(FlightSample {
            position,
            scale,
            rotation_deg,
            progress,
        })
    }

    /// Whether the trail should emit a sparkle now, given when the last one
    /// was emitted.
    pub fn sparkle_due(&self, last_emit: Option<Duration>, elapsed: Duration) -> bool {
        let progress = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        if progress >= SPARKLE_CUTOFF_PROGRESS {
            return false;
        }
        match last_emit {
            None => true,
            Some(last) => elapsed.saturating_sub(last) >= SPARKLE_INTERVAL,
        }
    }
}

fn cubic_bezier(t: f64, p0: Point, p1: Point, p2: Point, p3: Point) -> Point {
    let u = 1.0 - t;
    let c0 = u * u * u;
    let c1 = 3.0 * u * u * t;
    let c2 = 3.0 * u * t * t;
    let c3 = t * t * t;
    Point::new(
        c0 * p0.x + c1 * p1.x + c2 * p2.x + c3 * p3.x,
        c0 * p0.y + c1 * p1.y + c2 * p2.y + c3 * p3.y,
    )
}
