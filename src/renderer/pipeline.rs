//! WebGPU render pipeline setup

use wgpu::util::DeviceExt;

use super::shapes::frame_vertices;
use super::vertex::Vertex;
use crate::sim::{BACKGROUND, DrawPrimitive};

/// Scale `(width, height)` down uniformly so neither side exceeds `max_dim`.
///
/// Sizes already within the limit come back unchanged.
pub fn fit_surface_size(width: u32, height: u32, max_dim: u32) -> (u32, u32) {
    let largest = width.max(height);
    if largest <= max_dim || max_dim == 0 {
        return (width, height);
    }
    let fit = |v: u32| (v as u64 * max_dim as u64 / largest as u64) as u32;
    (fit(width), fit(height))
}

/// Paints dot primitives onto a surface
pub struct DotRenderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    /// Surface size in pixels, already fitted to the device limit
    size: (u32, u32),
}

impl DotRenderer {
    /// Build the renderer. The requested size is fitted to the device's
    /// texture limit; read the result back with [`DotRenderer::size`].
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Self {
        // WebGL2 baseline, but let the surface grow as large as the adapter allows
        let required_limits =
            wgpu::Limits::downlevel_webgl2_defaults().using_resolution(adapter.limits());
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("halftone-device"),
                required_features: wgpu::Features::empty(),
                required_limits,
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await
            .expect("Failed to create device");

        let max_dim = device.limits().max_texture_dimension_2d;
        let size = fit_surface_size(width, height, max_dim);
        if size != (width, height) {
            log::warn!(
                "Surface {}x{} exceeds device limit {}, using {}x{}",
                width,
                height,
                max_dim,
                size.0,
                size.1
            );
        }

        let surface_caps = surface.get_capabilities(adapter);
        log::info!("Surface formats: {:?}", surface_caps.formats);

        // Dot colors are sRGB values; blend them the way a 2D canvas would
        let format = surface_caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);
        log::info!("Using surface format: {:?}", format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.0.max(1),
            height: size.1.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let pipeline = create_dot_pipeline(&device, format);

        Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            size,
        }
    }

    /// Current surface size in pixels
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Largest width or height the surface may be configured with
    pub fn max_dimension(&self) -> u32 {
        self.device.limits().max_texture_dimension_2d
    }

    /// Reconfigure for a new size, fitted to the device limit.
    ///
    /// Returns the size actually in use.
    pub fn resize(&mut self, width: u32, height: u32) -> (u32, u32) {
        self.size = fit_surface_size(width, height, self.max_dimension());
        if self.size.0 > 0 && self.size.1 > 0 {
            self.config.width = self.size.0;
            self.config.height = self.size.1;
            self.surface.configure(&self.device, &self.config);
        }
        self.size
    }

    /// Reapply the current configuration after the surface was lost
    pub fn reconfigure(&mut self) {
        let (width, height) = self.size;
        self.resize(width, height);
    }

    /// Clear to the background and draw one frame of dots
    pub fn render(&mut self, primitives: &[DrawPrimitive]) -> Result<(), wgpu::SurfaceError> {
        if self.size.0 == 0 || self.size.1 == 0 {
            return Ok(());
        }

        let vertices = frame_vertices(primitives, self.size);
        // Dot counts swing with every impulse, so the buffer is rebuilt per frame
        let vertex_buffer = (!vertices.is_empty()).then(|| {
            self.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("dot_vertices"),
                    contents: bytemuck::cast_slice(&vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                })
        });

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("dot_encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("dot_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: BACKGROUND.r,
                            g: BACKGROUND.g,
                            b: BACKGROUND.b,
                            a: BACKGROUND.a,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if let Some(buffer) = &vertex_buffer {
                pass.set_pipeline(&self.pipeline);
                pass.set_vertex_buffer(0, buffer.slice(..));
                pass.draw(0..vertices.len() as u32, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

/// Alpha-blended triangle list over pass-through NDC vertices
fn create_dot_pipeline(device: &wgpu::Device, format: wgpu::TextureFormat) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("dot_shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
    });

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("dot_pipeline_layout"),
        bind_group_layouts: &[],
        immediate_size: 0,
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("dot_pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::desc()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}
