//! Wind particle render pass.
//!
//! Particles are uploaded once as an instance buffer; all motion happens in
//! the vertex shader from the rest position, the speed attribute, and the
//! animation time. Each instance is expanded into a 6-vertex quad and shaded
//! as a soft additive dot.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::config::WindConfig;
use crate::wind::WindParticle;

use super::DEPTH_FORMAT;

pub(crate) const WIND_SHADER: &str = r#"
const WIND_AXIS: vec3<f32> = vec3<f32>(0.3, 1.0, 0.6);

struct SceneUniforms {
    view_proj: mat4x4<f32>,
    camera_pos: vec4<f32>,
    resolution: vec2<f32>,
    time: f32,
    _pad: f32,
};

struct WindUniforms {
    model: mat4x4<f32>,
    color_a: vec4<f32>,
    color_b: vec4<f32>,
    color_c: vec4<f32>,
    shell_radius: f32,
    displacement: f32,
    osc_frequency: f32,
    phase_stagger: f32,
    swirl_base: f32,
    swirl_amp: f32,
    _pad: vec2<f32>,
};

@group(0) @binding(0) var<uniform> scene: SceneUniforms;
@group(1) @binding(0) var<uniform> wind: WindUniforms;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec3<f32>,
    @location(1) quad_pos: vec2<f32>,
};

@vertex
fn vs_main(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) position: vec3<f32>,
    @location(1) speed: f32,
) -> VertexOutput {
    var quad_vertices = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, -1.0),
        vec2<f32>(-1.0, 1.0),
        vec2<f32>(-1.0, 1.0),
        vec2<f32>(1.0, -1.0),
        vec2<f32>(1.0, 1.0),
    );
    let quad_pos = quad_vertices[vertex_index];

    // Tangential flow direction. A particle sitting exactly on the swirl
    // axis has no tangent and stays put.
    let n = normalize(position);
    var tdir = cross(n, WIND_AXIS);
    let tlen = length(tdir);
    if (tlen > 1e-6) {
        tdir = tdir / tlen;
    } else {
        tdir = vec3<f32>(0.0);
    }

    let lat = asin(clamp(n.y, -1.0, 1.0));
    let swirl = wind.swirl_base + wind.swirl_amp * cos(2.0 * lat);
    let osc = sin(wind.osc_frequency * scene.time + wind.phase_stagger * dot(n, WIND_AXIS));
    let offset = wind.displacement * speed * swirl * osc;
    let displaced = normalize(position + tdir * offset) * wind.shell_radius;

    let world_pos = (wind.model * vec4<f32>(displaced, 1.0)).xyz;
    var clip_pos = scene.view_proj * vec4<f32>(world_pos, 1.0);

    // Expand the quad in clip space so the sprite covers `size` pixels.
    let size = 1.4 + 1.6 * speed;
    clip_pos.x += quad_pos.x * size / scene.resolution.x * clip_pos.w;
    clip_pos.y += quad_pos.y * size / scene.resolution.y * clip_pos.w;

    // Color is fixed per particle: latitude bands from the rest position.
    let mix_factor = abs(n.y);
    var color = mix(wind.color_a.rgb, wind.color_b.rgb, mix_factor);
    color = mix(color, wind.color_c.rgb, smoothstep(0.3, 0.9, mix_factor));

    var out: VertexOutput;
    out.clip_position = clip_pos;
    out.color = color;
    out.quad_pos = quad_pos;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    // Distance from the sprite center, 0.5 at the inscribed circle.
    let d = length(in.quad_pos) * 0.5;
    if (d > 0.5) {
        discard;
    }
    let alpha = smoothstep(0.5, 0.0, d) * 0.9;
    return vec4<f32>(in.color, alpha);
}
"#;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub(crate) struct WindUniforms {
    model: [[f32; 4]; 4],
    color_a: [f32; 4],
    color_b: [f32; 4],
    color_c: [f32; 4],
    shell_radius: f32,
    displacement: f32,
    osc_frequency: f32,
    phase_stagger: f32,
    swirl_base: f32,
    swirl_amp: f32,
    _padding: [f32; 2],
}

impl WindUniforms {
    fn from_config(config: &WindConfig) -> Self {
        Self {
            model: Mat4::IDENTITY.to_cols_array_2d(),
            color_a: config.color_a.extend(1.0).to_array(),
            color_b: config.color_b.extend(1.0).to_array(),
            color_c: config.color_c.extend(1.0).to_array(),
            shell_radius: config.shell_radius,
            displacement: config.displacement,
            osc_frequency: config.osc_frequency,
            phase_stagger: config.phase_stagger,
            swirl_base: config.swirl_base,
            swirl_amp: config.swirl_amp,
            _padding: [0.0; 2],
        }
    }
}

pub(crate) struct WindPass {
    pub pipeline: wgpu::RenderPipeline,
    pub particle_buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub particle_count: u32,
    uniform_buffer: wgpu::Buffer,
    uniforms: WindUniforms,
}

impl WindPass {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        scene_layout: &wgpu::BindGroupLayout,
        config: &WindConfig,
        particles: &[WindParticle],
    ) -> Self {
        let particle_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Wind Particle Buffer"),
            contents: bytemuck::cast_slice(particles),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let uniforms = WindUniforms::from_config(config);
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Wind Uniform Buffer"),
            contents: bytemuck::bytes_of(&uniforms),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Wind Bind Group Layout"),
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

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Wind Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Wind Shader"),
            source: wgpu::ShaderSource::Wgsl(WIND_SHADER.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Wind Pipeline Layout"),
            bind_group_layouts: &[scene_layout, &bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Wind Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[WindParticle::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState {
                        color: wgpu::BlendComponent {
                            src_factor: wgpu::BlendFactor::SrcAlpha,
                            dst_factor: wgpu::BlendFactor::One,
                            operation: wgpu::BlendOperation::Add,
                        },
                        alpha: wgpu::BlendComponent {
                            src_factor: wgpu::BlendFactor::One,
                            dst_factor: wgpu::BlendFactor::One,
                            operation: wgpu::BlendOperation::Add,
                        },
                    }),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            // Additive glow reads depth but never writes it, so particles
            // never occlude each other or the globe.
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            particle_buffer,
            bind_group,
            particle_count: particles.len() as u32,
            uniform_buffer,
            uniforms,
        }
    }

    /// Update the layer rotation for this frame.
    pub fn set_model(&mut self, queue: &wgpu::Queue, model: Mat4) {
        self.uniforms.model = model.to_cols_array_2d();
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&self.uniforms));
    }
}
