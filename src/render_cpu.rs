use crate::core::{Affine, OrthoCamera, Point, Viewport};
use crate::error::{MoonlakeError, MoonlakeResult};
use crate::render::{FrameRGBA, RenderBackend, RenderSettings};
use crate::scene::{Layer, Scene};
use crate::shading::{ShadeInput, Shading};

/// CPU rasterizer. Flat layers fill their path with a solid paint; every
/// other shading family is evaluated per pixel over the layer's device
/// bounding box and painted through the path.
pub struct CpuBackend {
    settings: RenderSettings,
}

impl CpuBackend {
    pub fn new(settings: RenderSettings) -> Self {
        Self { settings }
    }
}

impl RenderBackend for CpuBackend {
    fn render(
        &mut self,
        scene: &Scene,
        camera: OrthoCamera,
        viewport: Viewport,
    ) -> MoonlakeResult<FrameRGBA> {
        let width_u16: u16 = viewport
            .width
            .try_into()
            .map_err(|_| MoonlakeError::geometry("viewport width exceeds u16"))?;
        let height_u16: u16 = viewport
            .height
            .try_into()
            .map_err(|_| MoonlakeError::geometry("viewport height exceeds u16"))?;

        let mut pixmap = vello_cpu::Pixmap::new(width_u16, height_u16);
        if let Some([r, g, b, a]) = self.settings.clear_rgba {
            clear_pixmap(&mut pixmap, premul_rgba8(r, g, b, a));
        }

        let world_to_px = camera.to_pixels(viewport);

        let mut ctx = vello_cpu::RenderContext::new(width_u16, height_u16);
        for idx in scene.draw_order() {
            let layer = &scene.layers[idx];
            if layer.opacity <= 0.0 {
                continue;
            }
            draw_layer(&mut ctx, layer, scene.time, world_to_px, viewport)?;
        }
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);

        Ok(FrameRGBA {
            width: viewport.width,
            height: viewport.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

fn draw_layer(
    ctx: &mut vello_cpu::RenderContext,
    layer: &Layer,
    time: f64,
    world_to_px: Affine,
    viewport: Viewport,
) -> MoonlakeResult<()> {
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

    match &layer.shading {
        Shading::Flat(color) => {
            ctx.set_transform(affine_to_cpu(world_to_px));
            let [r, g, b, a] = color.to_rgba8();
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
            if layer.opacity < 1.0 {
                ctx.push_opacity_layer(layer.opacity as f32);
            }
            ctx.fill_path(&bezpath_to_cpu(&layer.path));
            if layer.opacity < 1.0 {
                ctx.pop_layer();
            }
        }
        shading => {
            let Some((image, origin)) = rasterize_shading(layer, shading, time, world_to_px, viewport)?
            else {
                return Ok(());
            };

            // Draw in device space: the evaluated texture is anchored at the
            // layer's device bounding-box origin and clipped by the path.
            let mut device_path = layer.path.clone();
            device_path.apply_affine(world_to_px);

            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint_transform(vello_cpu::kurbo::Affine::translate((origin.x, origin.y)));
            ctx.set_paint(image);
            if layer.opacity < 1.0 {
                ctx.push_opacity_layer(layer.opacity as f32);
            }
            ctx.fill_path(&bezpath_to_cpu(&device_path));
            if layer.opacity < 1.0 {
                ctx.pop_layer();
            }
        }
    }
    Ok(())
}

/// Evaluate a procedural shading over the layer's visible device bounds.
/// Returns the premultiplied texture and its device-space origin, or `None`
/// when the layer is entirely off screen.
fn rasterize_shading(
    layer: &Layer,
    shading: &Shading,
    time: f64,
    world_to_px: Affine,
    viewport: Viewport,
) -> MoonlakeResult<Option<(vello_cpu::Image, Point)>> {
    use kurbo::Shape as _;

    let device_bbox = world_to_px.transform_rect_bbox(layer.path.bounding_box());
    let x0 = device_bbox.min_x().floor().max(0.0);
    let y0 = device_bbox.min_y().floor().max(0.0);
    let x1 = device_bbox.max_x().ceil().min(f64::from(viewport.width));
    let y1 = device_bbox.max_y().ceil().min(f64::from(viewport.height));
    if x1 <= x0 || y1 <= y0 {
        return Ok(None);
    }

    let w = (x1 - x0) as usize;
    let h = (y1 - y0) as usize;
    let w_u16: u16 = w
        .try_into()
        .map_err(|_| MoonlakeError::geometry("shading tile width exceeds u16"))?;
    let h_u16: u16 = h
        .try_into()
        .map_err(|_| MoonlakeError::geometry("shading tile height exceeds u16"))?;

    let px_to_world = world_to_px.inverse();
    let uv = layer.uv_rect;

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(w * h);
    for py in 0..h {
        for px in 0..w {
            let device = Point::new(x0 + px as f64 + 0.5, y0 + py as f64 + 0.5);
            let world = px_to_world * device;
            let input = ShadeInput {
                world,
                uv: Point::new(
                    (world.x - uv.min_x()) / uv.width(),
                    (world.y - uv.min_y()) / uv.height(),
                ),
                time,
            };
            let [r, g, b, a] = shading.eval(input).to_rgba8_premul();
            may_have_opacities |= a != 255;
            pixels.push(vello_cpu::peniko::color::PremulRgba8 { r, g, b, a });
        }
    }

    let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w_u16, h_u16, may_have_opacities);
    let image = vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(std::sync::Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    };
    Ok(Some((image, Point::new(x0, y0))))
}

fn premul_rgba8(r: u8, g: u8, b: u8, a: u8) -> [u8; 4] {
    let af = (a as u16) + 1;
    let premul = |c: u8| -> u8 { (((c as u16) * af) >> 8) as u8 };
    [premul(r), premul(g), premul(b), a]
}

fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap, rgba: [u8; 4]) {
    let data = pixmap.data_as_u8_slice_mut();
    for px in data.chunks_exact_mut(4) {
        px.copy_from_slice(&rgba);
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &crate::core::BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}
