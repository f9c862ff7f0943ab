//! Renders a textured, vertex-colored cube with its wireframe and corner
//! points into a PNG.
//!
//! Usage: `softpipe [output.png] [texture-image]`

use std::any::Any;
use std::error::Error;
use std::f32::consts::FRAC_PI_3;
use std::sync::Arc;

use softpipe::prelude::*;

const WIDTH: u32 = 640;
const HEIGHT: u32 = 480;

/// Uniform slots shared by every program below.
const MVP_SLOT: usize = 0;
const TEXTURE_SLOT: usize = 1;

/// Varying slots written by the vertex stage.
const COLOR_VARYING: usize = 0;
const UV_VARYING: usize = 1;

/// Position, color, texture coordinates.
fn layout() -> VertexLayout {
    VertexLayout::new()
        .with_attribute(3)
        .with_attribute(3)
        .with_attribute(2)
}

const FACES: [[[f32; 3]; 4]; 6] = [
    [[-1.0, -1.0, 1.0], [1.0, -1.0, 1.0], [1.0, 1.0, 1.0], [-1.0, 1.0, 1.0]],
    [[1.0, -1.0, -1.0], [-1.0, -1.0, -1.0], [-1.0, 1.0, -1.0], [1.0, 1.0, -1.0]],
    [[1.0, -1.0, 1.0], [1.0, -1.0, -1.0], [1.0, 1.0, -1.0], [1.0, 1.0, 1.0]],
    [[-1.0, -1.0, -1.0], [-1.0, -1.0, 1.0], [-1.0, 1.0, 1.0], [-1.0, 1.0, -1.0]],
    [[-1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, -1.0], [-1.0, 1.0, -1.0]],
    [[-1.0, -1.0, -1.0], [1.0, -1.0, -1.0], [1.0, -1.0, 1.0], [-1.0, -1.0, 1.0]],
];

const FACE_COLORS: [[f32; 3]; 6] = [
    [1.0, 0.3, 0.3],
    [0.3, 1.0, 0.3],
    [0.3, 0.3, 1.0],
    [1.0, 1.0, 0.3],
    [0.3, 1.0, 1.0],
    [1.0, 0.3, 1.0],
];

const QUAD_UVS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

fn push_vertex(out: &mut Vec<f32>, position: [f32; 3], color: [f32; 3], uv: [f32; 2]) {
    out.extend_from_slice(&position);
    out.extend_from_slice(&color);
    out.extend_from_slice(&uv);
}

/// Two counter-clockwise triangles per face.
fn cube_triangles() -> Vec<f32> {
    let mut out = Vec::new();
    for (face, color) in FACES.iter().zip(FACE_COLORS) {
        for i in [0, 1, 2, 0, 2, 3] {
            push_vertex(&mut out, face[i], color, QUAD_UVS[i]);
        }
    }
    out
}

/// Every face outline as a line list.
fn cube_edges() -> Vec<f32> {
    let mut out = Vec::new();
    for face in &FACES {
        for i in 0..4 {
            push_vertex(&mut out, face[i], [1.0; 3], [0.0; 2]);
            push_vertex(&mut out, face[(i + 1) % 4], [1.0; 3], [0.0; 2]);
        }
    }
    out
}

fn cube_corners() -> Vec<f32> {
    let mut out = Vec::new();
    for &x in &[-1.0, 1.0] {
        for &y in &[-1.0, 1.0] {
            for &z in &[-1.0, 1.0] {
                push_vertex(&mut out, [x, y, z], [1.0, 0.8, 0.0], [0.0; 2]);
            }
        }
    }
    out
}

fn checkerboard(size: u32) -> Result<Texture, softpipe::TextureError> {
    let mut bytes = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let value = if (x + y) % 2 == 0 { 255 } else { 96 };
            bytes.extend_from_slice(&[value, value, value, 255]);
        }
    }
    Texture::from_rgba8(size, size, bytes)
}

fn transform_vertex(record: &[u8], varyings: &mut Varyings, uniforms: &Uniforms) -> Vec4 {
    let layout = layout();
    let mvp = uniforms[MVP_SLOT]
        .as_user::<Mat4>()
        .copied()
        .unwrap_or_default();

    if let Some(color) = layout.read(record, 1) {
        varyings.set(COLOR_VARYING, color);
    }
    if let Some(uv) = layout.read(record, 2) {
        varyings.set(UV_VARYING, Vec2::new(uv.x, uv.y));
    }
    let position = layout.read(record, 0).unwrap_or(Vec4::ZERO);
    mvp * position
}

fn textured(varyings: &Varyings, uniforms: &Uniforms, _: Vec2) -> Option<Vec4> {
    let color = varyings[COLOR_VARYING].as_vec4()?;
    let uv = varyings[UV_VARYING].as_vec2()?;
    let texel = match uniforms[TEXTURE_SLOT].as_texture() {
        Some(texture) => texture.sample(uv.x, uv.y),
        None => Vec4::ONE,
    };
    Some(Vec4::new(
        color.x * texel.x,
        color.y * texel.y,
        color.z * texel.z,
        1.0,
    ))
}

fn flat(varyings: &Varyings, _: &Uniforms, _: Vec2) -> Option<Vec4> {
    varyings[COLOR_VARYING].as_vec4()
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let output = args.next().unwrap_or_else(|| "softpipe.png".to_string());
    let texture = match args.next() {
        Some(path) => Texture::from_file(path)?,
        None => checkerboard(8)?,
    };

    let model = Mat4::rotation_y(0.6) * Mat4::rotation_x(0.4);
    let view = Mat4::translation(0.0, 0.0, -5.0);
    let projection = Mat4::perspective(FRAC_PI_3, WIDTH as f32 / HEIGHT as f32, 0.1, 100.0);
    let mvp: Arc<dyn Any + Send + Sync> = Arc::new(projection * view * model);

    let stride = layout().stride();
    let surface = ShaderProgram::new(transform_vertex, textured, stride)
        .with_uniform(MVP_SLOT, ShaderParameter::User(Arc::clone(&mvp)))
        .with_uniform(TEXTURE_SLOT, Arc::new(texture));
    let outline = ShaderProgram::new(transform_vertex, flat, stride)
        .with_uniform(MVP_SLOT, ShaderParameter::User(mvp));

    let mut fb = Framebuffer::new(WIDTH, HEIGHT)?;
    fb.clear_color(20, 20, 30);
    fb.clear_depth(Framebuffer::FAR_DEPTH);

    let mut pipeline = Pipeline::default();
    pipeline.set_cull_mode(CullMode::Back);

    let triangles = encode_floats(&cube_triangles());
    let stats = pipeline.draw(
        PrimitiveKind::Triangle,
        &triangles,
        triangles.len() / stride,
        &surface,
        &mut fb,
    );
    log::info!(
        "cube: {} triangles, {} culled, {} fragments written",
        stats.primitives,
        stats.culled,
        stats.fragments.written
    );

    let edges = encode_floats(&cube_edges());
    pipeline.draw(PrimitiveKind::Line, &edges, edges.len() / stride, &outline, &mut fb);

    pipeline.set_point_size(2);
    let corners = encode_floats(&cube_corners());
    pipeline.draw(PrimitiveKind::Point, &corners, corners.len() / stride, &outline, &mut fb);

    fb.to_image().save(&output)?;
    log::info!("wrote {}x{} image to {}", WIDTH, HEIGHT, output);

    Ok(())
}
