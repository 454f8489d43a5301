//! WGSL sources for the native renderer.

/// Instanced glowing sprites: particles, elves and the star.
///
/// Each instance is a model matrix plus an sRGB color whose `w` carries the
/// sprite's half-size in local units. Output is premultiplied for additive
/// blending.
pub const SCENE_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec3<f32>,
    @location(1) uv: vec2<f32>,
};

@vertex
fn vs_main(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) model_0: vec4<f32>,
    @location(1) model_1: vec4<f32>,
    @location(2) model_2: vec4<f32>,
    @location(3) model_3: vec4<f32>,
    @location(4) color: vec4<f32>,
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
    let model = mat4x4<f32>(model_0, model_1, model_2, model_3);
    let corner = vec4<f32>(quad_pos * color.w, 0.0, 1.0);

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * model * corner;
    // sRGB in, linear out; the surface re-encodes.
    out.color = pow(color.rgb, vec3<f32>(2.2));
    out.uv = quad_pos;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let dist = length(in.uv);
    if dist > 1.0 {
        discard;
    }
    let glow = 1.0 - smoothstep(0.3, 1.0, dist);
    return vec4<f32>(in.color * glow, glow);
}
"#;

/// Textured photo quad with a thin gold frame.
pub const PHOTO_SHADER: &str = r#"
struct PhotoUniforms {
    transform: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> photo: PhotoUniforms;
@group(0) @binding(1)
var photo_texture: texture_2d<f32>;
@group(0) @binding(2)
var photo_sampler: sampler;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(@builtin(vertex_index) vertex_index: u32) -> VertexOutput {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(-0.5, -0.5),
        vec2<f32>( 0.5, -0.5),
        vec2<f32>(-0.5,  0.5),
        vec2<f32>(-0.5,  0.5),
        vec2<f32>( 0.5, -0.5),
        vec2<f32>( 0.5,  0.5),
    );

    let corner = corners[vertex_index];
    var out: VertexOutput;
    out.clip_position = photo.transform * vec4<f32>(corner, 0.0, 1.0);
    out.clip_position.z = 0.0;
    out.uv = vec2<f32>(corner.x + 0.5, 0.5 - corner.y);
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let texel = textureSample(photo_texture, photo_sampler, in.uv);
    let edge = min(min(in.uv.x, 1.0 - in.uv.x), min(in.uv.y, 1.0 - in.uv.y));
    // #FFD700, linearized.
    let gold = vec4<f32>(1.0, 0.68, 0.0, 1.0);
    return select(texel, gold, edge < 0.006);
}
"#;
