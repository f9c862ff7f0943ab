use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use softpipe::prelude::*;
use softpipe::render::rasterizer::{rasterize_line, rasterize_triangle, ScreenVertex};

const BUFFER_WIDTH: u32 = 800;
const BUFFER_HEIGHT: u32 = 600;

type VertexFn = fn(&[u8], &mut Varyings, &Uniforms) -> Vec4;
type FragmentFn = fn(&Varyings, &Uniforms, Vec2) -> Option<Vec4>;

fn position_only(record: &[u8], _: &mut Varyings, _: &Uniforms) -> Vec4 {
    VertexLayout::new()
        .with_attribute(4)
        .read(record, 0)
        .unwrap_or(Vec4::ZERO)
}

fn red(_: &Varyings, _: &Uniforms, _: Vec2) -> Option<Vec4> {
    Some(Vec4::rgb(1.0, 0.0, 0.0))
}

fn from_varying(varyings: &Varyings, _: &Uniforms, _: Vec2) -> Option<Vec4> {
    varyings[0].as_vec4()
}

fn program(fragment: FragmentFn) -> ShaderProgram<VertexFn, FragmentFn> {
    ShaderProgram::new(position_only as VertexFn, fragment, 16)
}

fn create_buffer() -> Framebuffer {
    Framebuffer::new(BUFFER_WIDTH, BUFFER_HEIGHT).expect("framebuffer allocation")
}

fn colored(x: f32, y: f32, color: Vec4) -> ScreenVertex {
    let mut varyings = Varyings::new();
    varyings.set(0, color);
    ScreenVertex::new(Vec3::new(x, y, 0.5), varyings)
}

fn triangle(points: [(f32, f32); 3]) -> [ScreenVertex; 3] {
    [
        colored(points[0].0, points[0].1, Vec4::rgb(1.0, 0.0, 0.0)),
        colored(points[1].0, points[1].1, Vec4::rgb(0.0, 1.0, 0.0)),
        colored(points[2].0, points[2].1, Vec4::rgb(0.0, 0.0, 1.0)),
    ]
}

fn benchmark_single_triangle(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_triangle");

    for (name, points) in [
        ("small", [(100.0, 100.0), (120.0, 100.0), (110.0, 120.0)]),
        ("medium", [(100.0, 100.0), (300.0, 100.0), (200.0, 300.0)]),
        ("large", [(50.0, 50.0), (750.0, 100.0), (400.0, 550.0)]),
    ] {
        let tri = triangle(points);

        group.bench_with_input(BenchmarkId::new("flat", name), &tri, |b, tri| {
            let mut fb = create_buffer();
            let program = program(red);
            b.iter(|| {
                fb.clear_depth(Framebuffer::FAR_DEPTH);
                rasterize_triangle(black_box([&tri[0], &tri[1], &tri[2]]), &program, &mut fb)
            });
        });

        group.bench_with_input(BenchmarkId::new("interpolated", name), &tri, |b, tri| {
            let mut fb = create_buffer();
            let program = program(from_varying);
            b.iter(|| {
                fb.clear_depth(Framebuffer::FAR_DEPTH);
                rasterize_triangle(black_box([&tri[0], &tri[1], &tri[2]]), &program, &mut fb)
            });
        });
    }

    group.finish();
}

fn benchmark_lines(c: &mut Criterion) {
    let mut group = c.benchmark_group("lines");

    // Spokes around the buffer center, covering every octant.
    let center = colored(400.0, 300.0, Vec4::ONE);
    let spokes: Vec<ScreenVertex> = (0..64)
        .map(|i| {
            let angle = i as f32 / 64.0 * std::f32::consts::TAU;
            colored(400.0 + angle.cos() * 280.0, 300.0 + angle.sin() * 280.0, Vec4::ONE)
        })
        .collect();

    group.bench_function("64_spokes", |b| {
        let mut fb = create_buffer();
        let program = program(from_varying);
        b.iter(|| {
            fb.clear_depth(Framebuffer::FAR_DEPTH);
            for end in &spokes {
                rasterize_line(black_box(&center), end, &program, &mut fb);
            }
        });
    });

    group.finish();
}

fn benchmark_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");

    // Grid of small clip-space triangles, some straddling the border.
    let floats: Vec<f32> = (0..20)
        .flat_map(|row| {
            (0..20).flat_map(move |col| {
                let x = col as f32 * 0.11 - 1.1;
                let y = row as f32 * 0.11 - 1.1;
                [
                    x, y, 0.0, 1.0,
                    x + 0.1, y, 0.0, 1.0,
                    x + 0.05, y + 0.1, 0.0, 1.0,
                ]
            })
        })
        .collect();
    let vertices = encode_floats(&floats);
    let vertex_count = floats.len() / 4;

    group.bench_function("draw_400_triangles", |b| {
        let mut fb = create_buffer();
        let program = program(red);
        let pipeline = Pipeline::default();
        b.iter(|| {
            fb.clear_depth(Framebuffer::FAR_DEPTH);
            pipeline.draw(
                PrimitiveKind::Triangle,
                black_box(&vertices),
                vertex_count,
                &program,
                &mut fb,
            )
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_single_triangle, benchmark_lines, benchmark_pipeline);
criterion_main!(benches);
