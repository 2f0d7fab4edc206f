use std::time::Instant;

use crate::core::{OrthoCamera, Viewport};
use crate::error::MoonlakeResult;
use crate::render::{FrameRGBA, RenderBackend};
use crate::scene::Scene;

/// The render loop. It owns the scene and has exactly one state: running.
/// There is no pause or stop; a draw failure propagates and ends the process.
pub struct RenderLoop {
    scene: Scene,
    camera: OrthoCamera,
    viewport: Viewport,
    started: Instant,
}

impl RenderLoop {
    pub fn new(scene: Scene, viewport: Viewport) -> Self {
        Self {
            scene,
            camera: OrthoCamera::with_aspect(viewport.aspect()),
            viewport,
            started: Instant::now(),
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> OrthoCamera {
        self.camera
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Seconds since the loop started.
    pub fn elapsed(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    /// Recompute the camera window for a new output size, keeping the fixed
    /// vertical extent.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.camera = OrthoCamera::with_aspect(viewport.aspect());
    }

    /// Push the given elapsed time into the animated uniforms and render one
    /// frame. Deterministic for a fixed time.
    pub fn render_at(
        &mut self,
        time: f64,
        backend: &mut dyn RenderBackend,
    ) -> MoonlakeResult<FrameRGBA> {
        self.scene.advance(time);
        backend.render(&self.scene, self.camera, self.viewport)
    }

    /// One wall-clock frame.
    pub fn tick(&mut self, backend: &mut dyn RenderBackend) -> MoonlakeResult<FrameRGBA> {
        self.render_at(self.elapsed(), backend)
    }

    /// Run forever, handing each frame to `present`.
    pub fn run(
        mut self,
        backend: &mut dyn RenderBackend,
        mut present: impl FnMut(FrameRGBA) -> MoonlakeResult<()>,
    ) -> MoonlakeResult<std::convert::Infallible> {
        loop {
            let frame = self.tick(backend)?;
            present(frame)?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Point, Rect, Rgba, polygon};
    use crate::scene::Layer;
    use crate::shading::Shading;

    struct Probe {
        seen_times: Vec<f64>,
    }

    impl RenderBackend for Probe {
        fn render(
            &mut self,
            scene: &Scene,
            _camera: OrthoCamera,
            viewport: Viewport,
        ) -> MoonlakeResult<FrameRGBA> {
            self.seen_times.push(scene.time);
            Ok(FrameRGBA {
                width: viewport.width,
                height: viewport.height,
                data: vec![0; (viewport.width * viewport.height * 4) as usize],
                premultiplied: true,
            })
        }
    }

    fn tiny_scene() -> Scene {
        Scene {
            layers: vec![Layer {
                name: "dot".to_string(),
                path: polygon(&[
                    Point::new(0.0, 0.0),
                    Point::new(1.0, 0.0),
                    Point::new(0.5, 1.0),
                ]),
                uv_rect: Rect::new(0.0, 0.0, 1.0, 1.0),
                shading: Shading::Flat(Rgba::WHITE),
                z: 0.0,
                opacity: 1.0,
            }],
            twinkles: vec![],
            time: 0.0,
        }
    }

    #[test]
    fn render_at_pushes_time_before_drawing() {
        let viewport = Viewport::new(8, 8).unwrap();
        let mut rloop = RenderLoop::new(tiny_scene(), viewport);
        let mut probe = Probe { seen_times: vec![] };
        rloop.render_at(1.5, &mut probe).unwrap();
        rloop.render_at(3.0, &mut probe).unwrap();
        assert_eq!(probe.seen_times, vec![1.5, 3.0]);
    }

    #[test]
    fn resize_recomputes_the_camera_window() {
        let mut rloop = RenderLoop::new(tiny_scene(), Viewport::new(100, 100).unwrap());
        assert_eq!(rloop.camera().right, 50.0);
        rloop.resize(Viewport::new(200, 100).unwrap());
        assert_eq!(rloop.camera().right, 100.0);
        assert_eq!(rloop.camera().top, 50.0);
        assert_eq!(rloop.viewport().width, 200);
    }

    #[test]
    fn elapsed_is_monotonic() {
        let rloop = RenderLoop::new(tiny_scene(), Viewport::new(8, 8).unwrap());
        let a = rloop.elapsed();
        let b = rloop.elapsed();
        assert!(b >= a);
    }
}
