/// Instance data stride in bytes: 32 bytes per glyph quad.
///
/// Layout:
///   [0..8]   pos:      vec2<f32>  (bottom-left corner, local units)
///   [8..16]  size:     vec2<f32>  (local units)
///   [16..24] `uv_min`: vec2<f32>  (atlas UV top-left)
///   [24..32] `uv_max`: vec2<f32>  (atlas UV bottom-right)
pub const INSTANCE_STRIDE: u64 = 32;

/// Camera uniform size: projection + view, two `mat4x4<f32>`.
pub const CAMERA_UNIFORM_SIZE: u64 = 128;

/// Per-block uniform size.
///
/// Layout (96 bytes):
///   [0..64]  transform: mat4x4<f32>
///   [64..80] color: vec4<f32> (straight alpha)
///   [80..84] scale: f32
///   [84..88] `distance_range`: f32
///   [88..96] _padding
pub const BLOCK_UNIFORM_SIZE: u64 = 96;

const INSTANCE_ATTRS: [wgpu::VertexAttribute; 4] = [
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x2,
        offset: 0,
        shader_location: 0,
    },
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x2,
        offset: 8,
        shader_location: 1,
    },
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x2,
        offset: 16,
        shader_location: 2,
    },
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x2,
        offset: 24,
        shader_location: 3,
    },
];

pub fn instance_buffer_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: INSTANCE_STRIDE,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &INSTANCE_ATTRS,
    }
}

// --- WGSL Shader ---

const MSDF_SHADER_SRC: &str = "
struct Camera {
    projection: mat4x4<f32>,
    view: mat4x4<f32>,
}

struct Block {
    transform: mat4x4<f32>,
    color: vec4<f32>,
    scale: f32,
    distance_range: f32,
    _pad: vec2<f32>,
}

@group(0) @binding(0) var<uniform> camera: Camera;
@group(1) @binding(0) var atlas_texture: texture_2d<f32>;
@group(1) @binding(1) var atlas_sampler: sampler;
@group(2) @binding(0) var<uniform> block: Block;

struct GlyphInput {
    @location(0) pos: vec2<f32>,
    @location(1) size: vec2<f32>,
    @location(2) uv_min: vec2<f32>,
    @location(3) uv_max: vec2<f32>,
}

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
}

@vertex
fn vs_main(@builtin(vertex_index) vi: u32, input: GlyphInput) -> VertexOutput {
    let corner = vec2<f32>(f32(vi & 1u), f32((vi >> 1u) & 1u));
    let local = (input.pos + input.size * corner) * block.scale;

    var out: VertexOutput;
    out.position = camera.projection * camera.view * block.transform * vec4<f32>(local, 0.0, 1.0);
    // Local y grows up, texture v grows down.
    out.uv = vec2<f32>(
        mix(input.uv_min.x, input.uv_max.x, corner.x),
        mix(input.uv_max.y, input.uv_min.y, corner.y),
    );
    return out;
}

fn median(r: f32, g: f32, b: f32) -> f32 {
    return max(min(r, g), min(max(r, g), b));
}

@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    let msd = textureSample(atlas_texture, atlas_sampler, input.uv).rgb;

    // Distance range in screen pixels, at least one so tiny text stays antialiased.
    let unit_range = vec2<f32>(block.distance_range) / vec2<f32>(textureDimensions(atlas_texture, 0));
    let screen_tex_size = vec2<f32>(1.0) / fwidth(input.uv);
    let screen_px_range = max(0.5 * dot(unit_range, screen_tex_size), 1.0);

    let sd = median(msd.r, msd.g, msd.b);
    let coverage = clamp(screen_px_range * (sd - 0.5) + 0.5, 0.0, 1.0);
    if (coverage <= 0.001) {
        discard;
    }

    // Premultiplied alpha output
    let a = coverage * block.color.a;
    return vec4<f32>(block.color.rgb * a, a);
}
";

// --- Pipeline creation ---

/// Camera bind group layout: group(0) binding(0) = projection + view.
pub fn create_camera_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("camera_bind_group_layout"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: wgpu::BufferSize::new(CAMERA_UNIFORM_SIZE),
            },
            count: None,
        }],
    })
}

/// Atlas texture bind group layout: group(1) binding(0) = texture, binding(1) = sampler.
pub fn create_atlas_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("atlas_bind_group_layout"),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    })
}

/// Block uniform bind group layout: group(2) binding(0) = transform, color, scale.
pub fn create_block_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("block_bind_group_layout"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: wgpu::BufferSize::new(BLOCK_UNIFORM_SIZE),
            },
            count: None,
        }],
    })
}

/// Depth state for text: tested against the scene, written only on request.
pub fn depth_stencil_state(
    format: wgpu::TextureFormat,
    compare: wgpu::CompareFunction,
    write: bool,
) -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format,
        depth_write_enabled: write,
        depth_compare: compare,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

/// MSDF text pipeline: instanced glyph quads with premultiplied alpha blending.
pub fn create_text_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    depth_stencil: Option<wgpu::DepthStencilState>,
    camera_layout: &wgpu::BindGroupLayout,
    atlas_layout: &wgpu::BindGroupLayout,
    block_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("msdf_text_shader"),
        source: wgpu::ShaderSource::Wgsl(MSDF_SHADER_SRC.into()),
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("msdf_text_pipeline_layout"),
        bind_group_layouts: &[camera_layout, atlas_layout, block_layout],
        immediate_size: 0,
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("msdf_text_pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            buffers: &[instance_buffer_layout()],
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState {
                    // Premultiplied alpha: shader outputs (rgb * a, a)
                    color: wgpu::BlendComponent {
                        src_factor: wgpu::BlendFactor::One,
                        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
                        operation: wgpu::BlendOperation::Add,
                    },
                    alpha: wgpu::BlendComponent {
                        src_factor: wgpu::BlendFactor::One,
                        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
                        operation: wgpu::BlendOperation::Add,
                    },
                }),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleStrip,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // Mirrored transforms flip the winding; text stays visible from both sides.
            cull_mode: None,
            unclipped_depth: false,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
        },
        depth_stencil,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}
