//! wgpu render sink and winit session runner.
//!
//! [`WindowSink`] keeps the two drawing layers as retained geometry: the
//! persistent layer is an append-only list of point vertices, the overlay a
//! line-segment list rebuilt on every cursor refresh. Presenting draws the
//! point list first and the segment list on top -- the persistent-then-
//! overlay composite order -- both with additive blending onto a black
//! clear.
//!
//! [`run_windowed`] owns the winit event loop. Winit 0.30 requires window
//! creation inside `ApplicationHandler::resumed`, so the runner is a
//! two-phase state machine: the turtle script executes once right after
//! window + GPU init (every motion command presents synchronously as it
//! runs), then the loop blocks until the window is closed -- the session's
//! paused state.

use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{WindowAttributes, WindowId};

use crate::geom::Vec2;
use crate::turtle::Rgba;
use crate::world::{RenderSink, World, WorldConfig};
use crate::RenderError;

// ---------------------------------------------------------------------------
// Vertex
// ---------------------------------------------------------------------------

/// A single vertex with canvas position and RGBA color, sent to the GPU.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck_derive::Pod, bytemuck_derive::Zeroable)]
struct Vertex {
    position: [f32; 2],
    color: [f32; 4],
}

impl Vertex {
    /// Vertex buffer layout for the shader.
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Column-major orthographic matrix mapping canvas pixels to clip space.
///
/// X spans `[0, w]` left to right; Y spans `[0, h]` top to bottom (canvas
/// coordinates grow downward, clip space grows upward).
fn canvas_matrix(width: u32, height: u32) -> [f32; 16] {
    let sx = 2.0 / width.max(1) as f32;
    let sy = -2.0 / height.max(1) as f32;
    [
        sx, 0.0, 0.0, 0.0, // column 0
        0.0, sy, 0.0, 0.0, // column 1
        0.0, 0.0, 1.0, 0.0, // column 2
        -1.0, 1.0, 0.0, 1.0, // column 3
    ]
}

/// Additive blending for both layers, matching the canvas contract.
const ADDITIVE: wgpu::BlendState = wgpu::BlendState {
    color: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
    alpha: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
};

/// Initial vertex-buffer capacity; buffers reallocate at double size when
/// the retained geometry outgrows them.
const INITIAL_VERTEX_CAPACITY: usize = 4096;

// ---------------------------------------------------------------------------
// WindowSink
// ---------------------------------------------------------------------------

/// wgpu-backed render sink over a winit window.
// Field order is drop order: layers, then GPU pipeline objects, then the
// surface, then the window.
pub struct WindowSink {
    /// Persistent layer: every plotted pixel, append-only for the session.
    point_vertices: Vec<Vertex>,
    /// Overlay layer: cursor glyph segments, rebuilt per refresh.
    line_vertices: Vec<Vertex>,
    point_buffer: wgpu::Buffer,
    point_capacity: usize,
    line_buffer: wgpu::Buffer,
    line_capacity: usize,
    point_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    config: wgpu::SurfaceConfiguration,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    window: Arc<winit::window::Window>,
}

impl WindowSink {
    /// Initialize wgpu over the window: surface, device, queue, pipelines.
    ///
    /// Async because wgpu adapter/device selection is asynchronous; call
    /// with `.await` or `pollster::block_on`.
    ///
    /// # Errors
    ///
    /// Returns an error if no suitable GPU adapter or device is available.
    pub async fn new(window: Arc<winit::window::Window>) -> Result<Self, anyhow::Error> {
        let size = window.inner_size();
        let width = size.width.max(1);
        let height = size.height.max(1);

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("no suitable GPU adapter found"))?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("terrapin_window_sink"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader_source = include_str!("shaders.wgsl");
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("terrapin_shader"),
            source: wgpu::ShaderSource::Wgsl(shader_source.into()),
        });

        let camera_matrix = canvas_matrix(width, height);
        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("camera_uniform"),
            size: std::mem::size_of::<[f32; 16]>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        queue.write_buffer(&camera_buffer, 0, bytemuck::cast_slice(&camera_matrix));

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("camera_bind_group_layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("camera_bind_group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("terrapin_pipeline_layout"),
            bind_group_layouts: &[&camera_bind_group_layout],
            push_constant_ranges: &[],
        });

        let make_pipeline = |label: &str, topology: wgpu::PrimitiveTopology| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[Vertex::desc()],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: config.format,
                        blend: Some(ADDITIVE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState {
                    count: 1,
                    mask: !0,
                    alpha_to_coverage_enabled: false,
                },
                multiview: None,
                cache: None,
            })
        };

        let point_pipeline = make_pipeline("persistent_layer", wgpu::PrimitiveTopology::PointList);
        let line_pipeline = make_pipeline("overlay_layer", wgpu::PrimitiveTopology::LineList);

        let point_buffer = create_vertex_buffer(&device, "persistent_vertices", INITIAL_VERTEX_CAPACITY);
        let line_buffer = create_vertex_buffer(&device, "overlay_vertices", INITIAL_VERTEX_CAPACITY);

        Ok(Self {
            point_vertices: Vec::new(),
            line_vertices: Vec::new(),
            point_buffer,
            point_capacity: INITIAL_VERTEX_CAPACITY,
            line_buffer,
            line_capacity: INITIAL_VERTEX_CAPACITY,
            point_pipeline,
            line_pipeline,
            camera_buffer,
            camera_bind_group,
            config,
            surface,
            device,
            queue,
            window,
        })
    }

    /// Reconfigure the surface when the window size changes.
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            let matrix = canvas_matrix(new_size.width, new_size.height);
            self.queue
                .write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&matrix));
        }
    }

    pub fn window(&self) -> &winit::window::Window {
        &self.window
    }
}

/// Allocate an uninitialized vertex buffer holding `capacity` vertices.
fn create_vertex_buffer(device: &wgpu::Device, label: &str, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: (capacity * std::mem::size_of::<Vertex>()) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Upload `vertices`, reallocating the buffer at double capacity first if
/// the retained geometry has outgrown it.
fn upload_vertices(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    buffer: &mut wgpu::Buffer,
    capacity: &mut usize,
    label: &str,
    vertices: &[Vertex],
) {
    if vertices.len() > *capacity {
        let mut new_capacity = *capacity * 2;
        while new_capacity < vertices.len() {
            new_capacity *= 2;
        }
        tracing::debug!(label, new_capacity, "growing vertex buffer");
        *buffer = create_vertex_buffer(device, label, new_capacity);
        *capacity = new_capacity;
    }
    if !vertices.is_empty() {
        queue.write_buffer(buffer, 0, bytemuck::cast_slice(vertices));
    }
}

impl RenderSink for WindowSink {
    fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    fn draw_point(&mut self, x: i32, y: i32, color: Rgba) {
        // Pixel centers sit at half-integer canvas coordinates.
        self.point_vertices.push(Vertex {
            position: [x as f32 + 0.5, y as f32 + 0.5],
            color: color.to_f32(),
        });
    }

    fn clear_overlay(&mut self) {
        self.line_vertices.clear();
    }

    fn overlay_polyline(&mut self, points: &[Vec2], color: Rgba) {
        let color = color.to_f32();
        for pair in points.windows(2) {
            for p in pair {
                self.line_vertices.push(Vertex {
                    position: [p.x as f32, p.y as f32],
                    color,
                });
            }
        }
    }

    fn present(&mut self) -> Result<(), RenderError> {
        upload_vertices(
            &self.device,
            &self.queue,
            &mut self.point_buffer,
            &mut self.point_capacity,
            "persistent_vertices",
            &self.point_vertices,
        );
        upload_vertices(
            &self.device,
            &self.queue,
            &mut self.line_buffer,
            &mut self.line_capacity,
            "overlay_vertices",
            &self.line_vertices,
        );

        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::debug!("surface lost, reconfiguring and skipping frame");
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                return Err(RenderError::OutOfMemory);
            }
            Err(e) => {
                tracing::warn!(error = %e, "skipping frame after surface error");
                return Ok(());
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("terrapin_encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("terrapin_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_bind_group(0, &self.camera_bind_group, &[]);

            // Persistent layer first, overlay on top.
            if !self.point_vertices.is_empty() {
                pass.set_pipeline(&self.point_pipeline);
                pass.set_vertex_buffer(0, self.point_buffer.slice(..));
                pass.draw(0..self.point_vertices.len() as u32, 0..1);
            }
            if !self.line_vertices.is_empty() {
                pass.set_pipeline(&self.line_pipeline);
                pass.set_vertex_buffer(0, self.line_buffer.slice(..));
                pass.draw(0..self.line_vertices.len() as u32, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Windowed session runner
// ---------------------------------------------------------------------------

/// Open a window, run `script` against a world drawing into it, then block
/// until the user closes the window.
///
/// The window is requested at `width` x `height`; the OS may negotiate a
/// different size, and the world uses whatever the window actually got.
/// The script runs synchronously right after GPU init -- in animated mode
/// every pixel and degree step presents a frame as it executes.
///
/// # Errors
///
/// Returns an error if the event loop, window, or GPU device cannot be
/// created, or if the script fails with a fatal render error.
pub fn run_windowed<F>(script: F, title: &str, width: u32, height: u32) -> Result<(), anyhow::Error>
where
    F: FnOnce(&mut World<WindowSink>) -> Result<(), RenderError>,
{
    let event_loop = EventLoop::new()?;
    // Blocking wait: after the script finishes the session is paused until
    // a close request arrives.
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App {
        state: AppState::Pending {
            script: Some(script),
            title: title.to_owned(),
            width,
            height,
        },
        failed: false,
    };

    event_loop.run_app(&mut app)?;

    if app.failed {
        return Err(anyhow::anyhow!(
            "windowed turtle session failed (see logs for details)"
        ));
    }

    Ok(())
}

/// Internal state of the windowed session.
///
/// Winit 0.30 requires window creation inside `resumed`, so the runner is a
/// two-phase machine: `Pending` before window creation, `Running` once the
/// world exists and the script has been executed.
enum AppState<F> {
    Pending {
        script: Option<F>,
        title: String,
        width: u32,
        height: u32,
    },
    Running {
        world: World<WindowSink>,
    },
}

struct App<F> {
    state: AppState<F>,
    failed: bool,
}

impl<F> ApplicationHandler for App<F>
where
    F: FnOnce(&mut World<WindowSink>) -> Result<(), RenderError>,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let AppState::Pending {
            script,
            title,
            width,
            height,
        } = &mut self.state
        else {
            return;
        };
        let Some(script) = script.take() else {
            return;
        };
        let (requested_w, requested_h) = (*width, *height);

        let attrs = WindowAttributes::default()
            .with_title(title.clone())
            .with_inner_size(winit::dpi::PhysicalSize::new(requested_w, requested_h));

        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                tracing::error!(error = %e, "failed to create window -- exiting");
                self.failed = true;
                event_loop.exit();
                return;
            }
        };

        let sink = match pollster::block_on(WindowSink::new(window.clone())) {
            Ok(sink) => sink,
            Err(e) => {
                tracing::error!(error = %e, "failed to initialize render backend -- exiting");
                self.failed = true;
                event_loop.exit();
                return;
            }
        };

        let (actual_w, actual_h) = sink.size();
        tracing::info!(
            requested_width = requested_w,
            requested_height = requested_h,
            width = actual_w,
            height = actual_h,
            "turtle window created"
        );

        let mut world = World::new(sink, WorldConfig::default());
        if let Err(e) = script(&mut world) {
            tracing::error!(error = %e, "turtle script failed -- exiting");
            self.failed = true;
            event_loop.exit();
            return;
        }
        // Present the finished drawing before entering the paused state.
        if let Err(e) = world.sink_mut().present() {
            tracing::error!(error = %e, "final present failed -- exiting");
            self.failed = true;
            event_loop.exit();
            return;
        }

        window.request_redraw();
        self.state = AppState::Running { world };
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let AppState::Running { world } = &mut self.state else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                tracing::info!(turtles = world.turtle_count(), "window close requested -- shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                tracing::debug!(
                    width = new_size.width,
                    height = new_size.height,
                    "window resized"
                );
                world.sink_mut().resize(new_size);
                world.sink_mut().window().request_redraw();
            }
            WindowEvent::RedrawRequested => match world.sink_mut().present() {
                Ok(()) => {}
                Err(RenderError::OutOfMemory) => {
                    tracing::error!("GPU out of memory -- exiting");
                    self.failed = true;
                    event_loop.exit();
                }
                Err(e) => {
                    tracing::warn!(error = %e, "error during redraw");
                }
            },
            _ => {}
        }
    }
}
