//! Ties the gasket geometry to the GPU.
//!
//! A request rebuilds the geometry buffer, uploads it once, and from then on every frame draws
//! whatever was last uploaded. While a gasket is being subdivided, [`SinkFlush`] also uploads and
//! draws the partial buffer at each internal node (unless the flush policy says otherwise).

use gasket_core::geometry::chaos::{self, Pcg32};
use gasket_core::geometry::BASE_TRIANGLE;
use gasket_core::{Flush, FlushPolicy, GasketError, GasketResult, GasketSubdivider, GeometryBuffer, Point3, RenderStats};

use crate::graphics::opengl::*;
use crate::graphics::utils::drain_gl_errors;
use crate::graphics::{GraphicsError, FRAGMENT_SHADER, VERTEX_SHADER};
use crate::interface::cli::{Mode, Settings};

/// Where vertex data goes to be drawn.
pub trait VertexSink {
    /// Replaces everything the sink holds with `data`.
    fn upload(&self, data: &[f32]);

    /// Draws the first `vertex_count` vertices of the last upload.
    fn draw(&self, primitive: Primitive, vertex_count: usize) -> GasketResult<()>;
}

/// The program, vertex buffer and vertex array that gasket triangles are drawn with.
pub struct GlSink<'a> {
    program: &'a GlProgram,
    vbo: &'a GlVertexBuffer,
    vao: &'a GlVertexArray,
    usage: BufferUsage,
}

impl<'a> VertexSink for GlSink<'a> {
    fn upload(&self, data: &[f32]) {
        self.vbo.upload(data, self.usage);
    }

    fn draw(&self, primitive: Primitive, vertex_count: usize) -> GasketResult<()> {
        self.program.set_used();
        self.vao.bind();
        draw_arrays(primitive, vertex_count);

        match drain_gl_errors("flush") {
            0 => Ok(()),
            n => Err(GasketError::Flush(format!("{} OpenGL errors while drawing {} vertices", n, vertex_count))),
        }
    }
}

/// Uploads and draws the buffer from inside the recursion.
pub struct SinkFlush<'a, S: VertexSink + ?Sized> {
    sink: &'a S,
}

impl<'a, S: VertexSink + ?Sized> Flush for SinkFlush<'a, S> {
    fn flush(&mut self, buffer: &GeometryBuffer) -> GasketResult<()> {
        self.sink.upload(buffer.as_floats());
        self.sink.draw(Primitive::Triangles, buffer.vertex_count())
    }
}

/// Renders a gasket of `depth` into `buffer`, drawing partial gaskets through `sink` as they
/// fill in, and leaves `sink` holding exactly what `buffer` holds afterwards.
///
/// If the request fails, `buffer` still has the previous gasket but `sink` may have been handed
/// half of the new one, so the previous gasket is uploaded again.
pub fn render_into<S: VertexSink + ?Sized>(
    subdivider: &GasketSubdivider,
    corners: [Point3; 3],
    depth: i32,
    buffer: &mut GeometryBuffer,
    sink: &S
) -> GasketResult<RenderStats> {
    let result = subdivider.render(corners, depth, buffer, &mut SinkFlush { sink });
    sink.upload(buffer.as_floats());
    result
}

/// How many chaos game points key `level` asks for, at `points` per level.
pub fn chaos_point_count(points: usize, level: i32) -> GasketResult<usize> {
    if level < 0 {
        return Err(GasketError::InvalidArgument(format!("level must not be negative (got {})", level)));
    }

    match points.checked_mul(level as usize) {
        Some(count) if count <= chaos::MAX_POINTS => Ok(count),
        _ => Err(GasketError::InvalidArgument(
            format!("{} points per level at level {} is over the limit of {} points", points, level, chaos::MAX_POINTS)
        )),
    }
}

pub struct GasketRenderer {
    program: GlProgram,
    vbo: GlVertexBuffer,
    vao: GlVertexArray,
    buffer: GeometryBuffer,
    primitive: Primitive,
    usage: BufferUsage,
    subdivider: GasketSubdivider,
    corners: [Point3; 3],
    mode: Mode,
    points: usize,
    rng: Pcg32,
}

impl GasketRenderer {
    /// Compiles the shaders and creates the GPU buffers. Needs a current OpenGL context.
    pub fn new(settings: &Settings) -> Result<Self, GraphicsError> {
        let shaders = [
            GlShader::from_vert_source(VERTEX_SHADER)?,
            GlShader::from_frag_source(FRAGMENT_SHADER)?,
        ];
        let program = GlProgram::from_shaders(&shaders)?;

        // Legacy flushing re-uploads hundreds of times per request
        let usage = match settings.flush {
            FlushPolicy::EveryInternalNode => BufferUsage::Dynamic,
            FlushPolicy::Once => BufferUsage::Static,
        };

        let vbo = GlVertexBuffer::init(&[], usage);
        let vao = GlVertexArray::with_buffer(&vbo, 0, 3);

        let subdivider = GasketSubdivider::new()
            .max_depth(settings.max_depth)
            .policy(settings.flush);

        Ok(Self {
            program,
            vbo,
            vao,
            buffer: GeometryBuffer::new(),
            primitive: Primitive::Triangles,
            usage,
            subdivider,
            corners: BASE_TRIANGLE,
            mode: settings.mode,
            points: settings.points,
            rng: Pcg32::new(settings.seed),
        })
    }

    /// Handles a "draw at level N" request. On failure the GPU is left holding the previous
    /// picture, which stays up.
    pub fn request(&mut self, level: i32) -> Result<(), GraphicsError> {
        match self.mode {
            Mode::Subdivide => self.subdivide(level),
            Mode::Chaos => self.scatter(level),
        }
    }

    fn subdivide(&mut self, depth: i32) -> Result<(), GraphicsError> {
        let sink = GlSink {
            program: &self.program,
            vbo: &self.vbo,
            vao: &self.vao,
            usage: self.usage,
        };
        let stats = render_into(&self.subdivider, self.corners, depth, &mut self.buffer, &sink)?;

        self.primitive = Primitive::Triangles;
        info!("depth {}: {} triangles, {} intermediate draws", depth, stats.triangles, stats.flushes);

        Ok(())
    }

    fn scatter(&mut self, level: i32) -> Result<(), GraphicsError> {
        let count = chaos_point_count(self.points, level)?;

        let mut next = GeometryBuffer::with_capacity(count / 3 + 1);
        chaos::scatter(self.corners, count, &mut self.rng, &mut next)?;
        next.seal();
        self.buffer = next;

        self.vbo.upload(self.buffer.as_floats(), self.usage);
        self.primitive = Primitive::Points;
        info!("level {}: {} chaos game points", level, count);

        Ok(())
    }

    /// Draws the last uploaded geometry. Called once per frame.
    pub fn draw(&self) {
        clear(1.0, 1.0, 1.0);

        if self.buffer.is_empty() {
            return;
        }

        self.program.set_used();
        self.vao.bind();
        draw_arrays(self.primitive, self.buffer.vertex_count());
    }
}

#[cfg(test)]
mod test {
    use std::cell::{Cell, RefCell};

    use gasket_core::geometry::chaos::MAX_POINTS;
    use gasket_core::geometry::BASE_TRIANGLE;
    use gasket_core::{GasketError, GasketResult, GasketSubdivider, GeometryBuffer};

    use super::*;

    /// Remembers every upload, and starts failing draws after `draws_left` of them.
    struct RecordingSink {
        uploads: RefCell<Vec<Vec<f32>>>,
        draws_left: Cell<usize>,
    }

    impl RecordingSink {
        fn new(draws_left: usize) -> Self {
            Self { uploads: RefCell::new(Vec::new()), draws_left: Cell::new(draws_left) }
        }

        fn holding(&self) -> Vec<f32> {
            self.uploads.borrow().last().cloned().unwrap_or_default()
        }
    }

    impl VertexSink for RecordingSink {
        fn upload(&self, data: &[f32]) {
            self.uploads.borrow_mut().push(data.to_vec());
        }

        fn draw(&self, _primitive: Primitive, _vertex_count: usize) -> GasketResult<()> {
            match self.draws_left.get() {
                0 => Err(GasketError::Flush("context lost".to_string())),
                n => {
                    self.draws_left.set(n - 1);
                    Ok(())
                }
            }
        }
    }

    #[test]
    fn sink_ends_up_holding_the_new_gasket() {
        let subdivider = GasketSubdivider::new();
        let mut buffer = GeometryBuffer::new();
        let sink = RecordingSink::new(usize::MAX);

        let stats = render_into(&subdivider, BASE_TRIANGLE, 2, &mut buffer, &sink).unwrap();

        assert_eq!(stats.flushes, 4);
        assert_eq!(sink.uploads.borrow().len(), 5);
        assert_eq!(sink.holding(), buffer.as_floats());
    }

    #[test]
    fn failed_draw_puts_the_previous_gasket_back() {
        let subdivider = GasketSubdivider::new();
        let mut buffer = GeometryBuffer::new();
        render_into(&subdivider, BASE_TRIANGLE, 1, &mut buffer, &RecordingSink::new(usize::MAX)).unwrap();
        let before = buffer.clone();

        // Two partial gaskets reach the sink before the third draw fails
        let sink = RecordingSink::new(2);
        let result = render_into(&subdivider, BASE_TRIANGLE, 3, &mut buffer, &sink);

        assert_eq!(result, Err(GasketError::Flush("context lost".to_string())));
        assert_eq!(buffer, before);
        assert_eq!(sink.uploads.borrow().len(), 4);
        assert_eq!(sink.holding(), before.as_floats());
    }

    #[test]
    fn chaos_point_count_is_bounded() {
        assert_eq!(chaos_point_count(5000, 0), Ok(0));
        assert_eq!(chaos_point_count(5000, 9), Ok(45000));
        assert!(chaos_point_count(5000, -1).is_err());
        assert!(chaos_point_count(MAX_POINTS, 2).is_err());

        match chaos_point_count(usize::MAX, 9) {
            Err(GasketError::InvalidArgument(_)) => {},
            other => panic!("expected InvalidArgument, got {:?}", other),
        }
    }
}
