//! Draw call entry point: vertex stage, clipping, viewport transform and
//! rasterization.
//!
//! The [`Pipeline`] struct holds the fixed-function settings; each
//! [`Pipeline::draw`] call consumes a raw vertex buffer, a
//! [`ShaderProgram`] and a [`Framebuffer`] and runs to completion before
//! returning.

use std::fmt;

use crate::clipper::{is_visible, ClipSpaceClipper, ClipSpacePolygon, ClipSpaceVertex};
use crate::render::framebuffer::Framebuffer;
use crate::render::rasterizer::{
    edge_function, rasterize_line, rasterize_point, rasterize_triangle, FragmentStats,
    ScreenVertex,
};
use crate::render::shader::{FragmentShader, ShaderProgram, Varyings, VertexShader};
use crate::viewport::Viewport;

/// How consecutive vertices are grouped into primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    Point,
    Line,
    Triangle,
}

impl PrimitiveKind {
    /// Vertices consumed per primitive.
    pub fn vertex_count(self) -> usize {
        match self {
            PrimitiveKind::Point => 1,
            PrimitiveKind::Line => 2,
            PrimitiveKind::Triangle => 3,
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimitiveKind::Point => write!(f, "points"),
            PrimitiveKind::Line => write!(f, "lines"),
            PrimitiveKind::Triangle => write!(f, "triangles"),
        }
    }
}

/// Which triangles to drop based on their screen-space winding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CullMode {
    /// Draw every triangle.
    #[default]
    None,
    /// Drop triangles facing away from the viewer.
    Back,
    /// Drop triangles facing the viewer.
    Front,
}

/// Winding, as seen in NDC with y up, that marks a front-facing triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrontFace {
    #[default]
    CounterClockwise,
    Clockwise,
}

/// Fixed-function settings applied to every draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PipelineConfig {
    /// Half-size in pixels of the square stamped for each point; 0 draws a
    /// single pixel.
    pub point_size: u32,
    pub cull_mode: CullMode,
    pub front_face: FrontFace,
}

/// Counters describing what a draw call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrawStats {
    /// Complete primitives assembled from the vertex buffer.
    pub primitives: usize,
    /// Primitives rejected entirely by the visibility test or clipping.
    pub clipped: usize,
    /// Input triangles dropped by face culling.
    pub culled: usize,
    /// Input triangles whose clipped polygon has zero screen-space area.
    /// Zero-area slivers in the fan of an otherwise visible triangle are
    /// skipped without being counted.
    pub degenerate: usize,
    pub fragments: FragmentStats,
}

pub struct Pipeline {
    config: PipelineConfig,
    clipper: ClipSpaceClipper,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            clipper: ClipSpaceClipper::new(),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn set_point_size(&mut self, half_size: u32) {
        self.config.point_size = half_size;
    }

    pub fn set_cull_mode(&mut self, mode: CullMode) {
        self.config.cull_mode = mode;
    }

    pub fn set_front_face(&mut self, front_face: FrontFace) {
        self.config.front_face = front_face;
    }

    /// Draws `vertex_count` vertices from `vertices` as `kind` primitives.
    ///
    /// Record `i` is the `program.vertex_stride` bytes starting at
    /// `i * vertex_stride`. A trailing group too small to form a primitive is
    /// ignored. Malformed calls never panic: a zero stride or a released
    /// framebuffer makes the call a no-op, and a buffer holding fewer
    /// records than `vertex_count` is truncated to the records it holds.
    pub fn draw<V, F>(
        &self,
        kind: PrimitiveKind,
        vertices: &[u8],
        vertex_count: usize,
        program: &ShaderProgram<V, F>,
        fb: &mut Framebuffer,
    ) -> DrawStats
    where
        V: VertexShader,
        F: FragmentShader,
    {
        let mut stats = DrawStats::default();

        if fb.is_released() {
            log::warn!("draw {}: framebuffer has been released, ignoring", kind);
            return stats;
        }
        let stride = program.vertex_stride;
        if stride == 0 {
            log::warn!("draw {}: vertex stride is zero, ignoring", kind);
            return stats;
        }

        let available = vertices.len() / stride;
        let vertex_count = if vertex_count > available {
            log::warn!(
                "draw {}: {} vertices requested but buffer holds {}, truncating",
                kind,
                vertex_count,
                available
            );
            available
        } else {
            vertex_count
        };

        let group = kind.vertex_count();
        stats.primitives = vertex_count / group;
        if vertex_count % group != 0 {
            log::trace!(
                "draw {}: ignoring {} trailing vertices",
                kind,
                vertex_count % group
            );
        }

        let viewport = Viewport::new(fb.width(), fb.height());
        let run_vertex_stage = |index: usize| {
            let record = &vertices[index * stride..(index + 1) * stride];
            let mut varyings = Varyings::new();
            let position = program
                .vertex_shader
                .shade(record, &mut varyings, &program.uniforms);
            ClipSpaceVertex::new(position, varyings)
        };

        for primitive in 0..stats.primitives {
            let first = primitive * group;
            match kind {
                PrimitiveKind::Point => {
                    let v = run_vertex_stage(first);
                    self.draw_point(v, &viewport, program, fb, &mut stats);
                }
                PrimitiveKind::Line => {
                    let a = run_vertex_stage(first);
                    let b = run_vertex_stage(first + 1);
                    self.draw_line(&a, &b, &viewport, program, fb, &mut stats);
                }
                PrimitiveKind::Triangle => {
                    let polygon = ClipSpacePolygon::from_triangle(
                        run_vertex_stage(first),
                        run_vertex_stage(first + 1),
                        run_vertex_stage(first + 2),
                    );
                    self.draw_triangle(polygon, &viewport, program, fb, &mut stats);
                }
            }
        }

        log::debug!(
            "draw {}: {} primitives, {} clipped, {} culled, {} degenerate, {}/{} fragments written",
            kind,
            stats.primitives,
            stats.clipped,
            stats.culled,
            stats.degenerate,
            stats.fragments.written,
            stats.fragments.shaded
        );

        stats
    }

    fn draw_point<V, F>(
        &self,
        v: ClipSpaceVertex,
        viewport: &Viewport,
        program: &ShaderProgram<V, F>,
        fb: &mut Framebuffer,
        stats: &mut DrawStats,
    ) where
        V: VertexShader,
        F: FragmentShader,
    {
        if !is_visible(v.position) || v.position.w <= 0.0 {
            stats.clipped += 1;
            return;
        }
        let point = to_screen(&v, viewport);
        stats.fragments += rasterize_point(&point, self.config.point_size, program, fb);
    }

    fn draw_line<V, F>(
        &self,
        a: &ClipSpaceVertex,
        b: &ClipSpaceVertex,
        viewport: &Viewport,
        program: &ShaderProgram<V, F>,
        fb: &mut Framebuffer,
        stats: &mut DrawStats,
    ) where
        V: VertexShader,
        F: FragmentShader,
    {
        let Some((a, b)) = self.clipper.clip_line(a, b) else {
            stats.clipped += 1;
            return;
        };
        let (a, b) = (to_screen(&a, viewport), to_screen(&b, viewport));
        stats.fragments += rasterize_line(&a, &b, program, fb);
    }

    fn draw_triangle<V, F>(
        &self,
        polygon: ClipSpacePolygon,
        viewport: &Viewport,
        program: &ShaderProgram<V, F>,
        fb: &mut Framebuffer,
        stats: &mut DrawStats,
    ) where
        V: VertexShader,
        F: FragmentShader,
    {
        let clipped = self.clipper.clip_polygon(polygon);
        if clipped.is_empty() {
            stats.clipped += 1;
            return;
        }

        let mut with_area = 0;
        let mut culled = 0;
        for triangle in clipped.triangulate() {
            let screen = triangle.map(|v| to_screen(v, viewport));
            let triangle = [&screen[0], &screen[1], &screen[2]];
            let area = edge_function(
                triangle[0].position.xy(),
                triangle[1].position.xy(),
                triangle[2].position.xy(),
            );

            if area == 0.0 {
                log::trace!("skipping zero-area triangle {:?}", triangle.map(|v| v.position));
                continue;
            }
            with_area += 1;
            if self.is_culled(area) {
                culled += 1;
                continue;
            }

            stats.fragments += rasterize_triangle(triangle, program, fb);
        }

        if with_area == 0 {
            stats.degenerate += 1;
        } else if culled == with_area {
            stats.culled += 1;
        }
    }

    /// Screen space has y pointing down, so a triangle that winds
    /// counter-clockwise in NDC has a negative screen-space area.
    fn is_culled(&self, screen_area: f32) -> bool {
        let ndc_ccw = screen_area < 0.0;
        let front = match self.config.front_face {
            FrontFace::CounterClockwise => ndc_ccw,
            FrontFace::Clockwise => !ndc_ccw,
        };
        match self.config.cull_mode {
            CullMode::None => false,
            CullMode::Back => !front,
            CullMode::Front => front,
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

/// Perspective divide followed by the viewport transform.
fn to_screen(v: &ClipSpaceVertex, viewport: &Viewport) -> ScreenVertex {
    let ndc = v.position.perspective_divide().to_vec3();
    ScreenVertex::new(viewport.to_screen(ndc), v.varyings.clone())
}

/// Draws with the default [`PipelineConfig`]: single-pixel points and no
/// face culling.
pub fn draw<V, F>(
    kind: PrimitiveKind,
    vertices: &[u8],
    vertex_count: usize,
    program: &ShaderProgram<V, F>,
    fb: &mut Framebuffer,
) -> DrawStats
where
    V: VertexShader,
    F: FragmentShader,
{
    Pipeline::default().draw(kind, vertices, vertex_count, program, fb)
}
