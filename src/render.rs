use crate::core::{OrthoCamera, Viewport};
use crate::error::MoonlakeResult;
use crate::scene::Scene;

/// Settings shared by all backends.
#[derive(Clone, Debug)]
pub struct RenderSettings {
    /// Straight RGBA fill applied before the scene is drawn; `None` leaves the
    /// target transparent.
    pub clear_rgba: Option<[u8; 4]>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            clear_rgba: Some([18, 20, 28, 255]),
        }
    }
}

/// One rendered frame, premultiplied RGBA8.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

/// The graphics collaborator boundary: geometry and shading in, pixels out.
pub trait RenderBackend {
    fn render(
        &mut self,
        scene: &Scene,
        camera: OrthoCamera,
        viewport: Viewport,
    ) -> MoonlakeResult<FrameRGBA>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendKind {
    Cpu,
}

pub fn create_backend(
    kind: BackendKind,
    settings: &RenderSettings,
) -> MoonlakeResult<Box<dyn RenderBackend>> {
    match kind {
        BackendKind::Cpu => Ok(Box::new(crate::render_cpu::CpuBackend::new(
            settings.clone(),
        ))),
    }
}
