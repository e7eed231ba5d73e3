//! WGSL for the point-sprite pass and its uniform block.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

/// Uniform block shared with `POINT_SHADER`. 16-byte aligned.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Uniforms {
    pub view_proj: [[f32; 4]; 4],
    /// Surface size in pixels.
    pub viewport: [f32; 2],
    /// Sprite diameter in pixels.
    pub point_size: f32,
    pub _padding: f32,
}

impl Uniforms {
    pub fn new(view_proj: Mat4, viewport: (u32, u32), point_size: f32) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            viewport: [viewport.0.max(1) as f32, viewport.1.max(1) as f32],
            point_size,
            _padding: 0.0,
        }
    }
}

/// Instanced quads: one instance per point, six vertices per quad.
///
/// Location 0 is the per-frame position buffer, location 1 the color
/// buffer uploaded once. Sprites are screen-space sized and never smaller
/// than one pixel.
pub const POINT_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    viewport: vec2<f32>,
    point_size: f32,
    _padding: f32,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
    @location(1) uv: vec2<f32>,
};

@vertex
fn vs_main(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) point_pos: vec3<f32>,
    @location(1) point_color: vec4<f32>,
) -> VertexOutput {
    var quad_vertices = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>( 1.0,  1.0),
    );

    let quad_pos = quad_vertices[vertex_index];
    let size_px = max(uniforms.point_size, 1.0);

    var clip_pos = uniforms.view_proj * vec4<f32>(point_pos, 1.0);
    // Half the diameter in NDC is size_px / viewport
    let offset = quad_pos * size_px / uniforms.viewport;
    clip_pos.x += offset.x * clip_pos.w;
    clip_pos.y += offset.y * clip_pos.w;

    var out: VertexOutput;
    out.clip_position = clip_pos;
    out.color = point_color;
    out.uv = quad_pos;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let dist = length(in.uv);
    if dist > 1.0 {
        discard;
    }
    let alpha = 1.0 - smoothstep(0.7, 1.0, dist);
    return vec4<f32>(in.color.rgb, in.color.a * alpha);
}
"#;
