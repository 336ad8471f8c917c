//! GPU state and the per-frame render path.
//!
//! One render pass draws the three layers back to front: the opaque globe,
//! the translucent atmosphere shell, then the additive wind particles.
//! Everything dynamic flows through two small uniform writes per layer; no
//! vertex data is touched after startup.

mod globe_pass;
mod wind_pass;

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::camera::OrbitCamera;
use crate::config::AppConfig;
use crate::error::GpuError;
use crate::time::Clock;
use crate::wind;

use globe_pass::{AtmospherePass, GlobePass};
use wind_pass::WindPass;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// The atmosphere and wind shells spin slightly faster than the globe so
/// the stack does not read as one rigid body.
const ATMOSPHERE_SPIN: f32 = 1.02;
const WIND_SPIN: f32 = 1.01;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct SceneUniforms {
    view_proj: [[f32; 4]; 4],
    camera_pos: [f32; 4],
    resolution: [f32; 2],
    time: f32,
    _padding: f32,
}

/// Per-layer spin angles in radians.
struct LayerRotation {
    globe: f32,
    atmosphere: f32,
    wind: f32,
}

impl LayerRotation {
    fn advance(&mut self, step: f32) {
        self.globe += step;
        self.atmosphere += step * ATMOSPHERE_SPIN;
        self.wind += step * WIND_SPIN;
    }
}

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    depth_texture: wgpu::TextureView,
    scene_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,
    globe: GlobePass,
    atmosphere: AtmospherePass,
    wind: WindPass,
    pub camera: OrbitCamera,
    clock: Clock,
    rotation: LayerRotation,
    auto_rotate: bool,
    rotation_speed: f32,
}

impl GpuState {
    pub async fn new(window: Arc<Window>, app_config: &AppConfig) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter.request_device(&device_descriptor()).await?;

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
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture = create_depth_texture(&device, &config);

        let scene_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Scene Uniform Buffer"),
            contents: bytemuck::bytes_of(&SceneUniforms::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let scene_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Scene Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Bind Group"),
            layout: &scene_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: scene_buffer.as_entire_binding(),
            }],
        });

        let mut rng = SmallRng::from_entropy();
        let particles = wind::generate_particles(&app_config.wind, &mut rng);
        log::info!(
            "wind layer: {} particles on shell radius {:.3}",
            particles.len(),
            app_config.wind.shell_radius
        );

        let globe = GlobePass::new(
            &device,
            &queue,
            surface_format,
            &scene_layout,
            &app_config.globe,
        );
        let atmosphere =
            AtmospherePass::new(&device, surface_format, &scene_layout, &app_config.globe);
        let wind = WindPass::new(
            &device,
            surface_format,
            &scene_layout,
            &app_config.wind,
            &particles,
        );

        let camera = OrbitCamera::new(app_config.camera.clone(), app_config.auto_rotate);
        let rotation = LayerRotation {
            globe: app_config.start_yaw(),
            atmosphere: 0.0,
            wind: 0.0,
        };

        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_texture,
            scene_buffer,
            scene_bind_group,
            globe,
            atmosphere,
            wind,
            camera,
            clock: Clock::default(),
            rotation,
            auto_rotate: app_config.auto_rotate,
            rotation_speed: app_config.rotation_speed,
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_texture = create_depth_texture(&self.device, &self.config);
        }
    }

    /// Freeze or resume the wind flow. Layer spin is unaffected.
    pub fn toggle_wind_pause(&mut self) {
        self.clock.toggle_pause();
        log::info!(
            "wind flow {}",
            if self.clock.is_paused() { "frozen" } else { "running" }
        );
    }

    fn update_uniforms(&mut self, time: f32) {
        let aspect = self.config.width as f32 / self.config.height as f32;
        let scene = SceneUniforms {
            view_proj: self.camera.view_projection(aspect).to_cols_array_2d(),
            camera_pos: self.camera.position().extend(1.0).to_array(),
            resolution: [self.config.width as f32, self.config.height as f32],
            time,
            _padding: 0.0,
        };
        self.queue
            .write_buffer(&self.scene_buffer, 0, bytemuck::bytes_of(&scene));

        self.globe
            .set_model(&self.queue, Mat4::from_rotation_y(self.rotation.globe));
        self.atmosphere
            .set_model(&self.queue, Mat4::from_rotation_y(self.rotation.atmosphere));
        self.wind
            .set_model(&self.queue, Mat4::from_rotation_y(self.rotation.wind));
    }

    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let time = self.clock.tick();
        self.camera.update(self.clock.step());
        if self.auto_rotate && !self.camera.is_dragging() {
            self.rotation.advance(self.rotation_speed);
        }
        if self.clock.frame() % 600 == 0 {
            log::debug!("{:.1} fps", self.clock.fps());
        }
        self.update_uniforms(time);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.02,
                            g: 0.02,
                            b: 0.05,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_bind_group(0, &self.scene_bind_group, &[]);

            render_pass.set_pipeline(&self.globe.pipeline);
            render_pass.set_bind_group(1, &self.globe.bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.globe.vertex_buffer.slice(..));
            render_pass
                .set_index_buffer(self.globe.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..self.globe.index_count, 0, 0..1);

            render_pass.set_pipeline(&self.atmosphere.pipeline);
            render_pass.set_bind_group(1, &self.atmosphere.bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.atmosphere.vertex_buffer.slice(..));
            render_pass.set_index_buffer(
                self.atmosphere.index_buffer.slice(..),
                wgpu::IndexFormat::Uint32,
            );
            render_pass.draw_indexed(0..self.atmosphere.index_count, 0, 0..1);

            render_pass.set_pipeline(&self.wind.pipeline);
            render_pass.set_bind_group(1, &self.wind.bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.wind.particle_buffer.slice(..));
            render_pass.draw(0..6, 0..self.wind.particle_count);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

/// Device request used at startup: no optional features, default limits.
fn device_descriptor() -> wgpu::DeviceDescriptor<'static> {
    wgpu::DeviceDescriptor {
        label: Some("Device"),
        required_features: wgpu::Features::empty(),
        required_limits: wgpu::Limits::default(),
        memory_hints: Default::default(),
        trace: Default::default(),
    }
}

fn create_depth_texture(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
