//! Recursive Sierpinski subdivision.
//!
//! A triangle at depth `n` is split along its edge midpoints into four smaller triangles, and the
//! middle one is thrown away. The remaining three are split again at depth `n - 1`, and so on until
//! the depth runs out, at which point the triangle is written to the buffer. So a gasket of depth
//! `n` is made of `3^n` triangles.
//!
//! ```text
//!            v1
//!            /\
//!           /  \
//!     mid01 ---- mid12
//!         / \  / \
//!        /   \/   \
//!      v0 -mid20-- v2
//! ```
//!
//! Every time a non-leaf call finishes its three children, the buffer is handed to a [`Flush`] so
//! the renderer can upload and draw what's there so far. That's `(3^n - 1) / 2` flushes for a
//! single gasket, which is how the gasket has always been drawn (you can see it fill in on slow
//! hardware). [`FlushPolicy::Once`] turns that off and flushes a single time at the end instead.

use std::str::FromStr;

use super::buffer::GeometryBuffer;
use super::point::Point3;
use crate::error::{GasketError, GasketResult};

/// Depth used when nobody asks for anything else. A depth-8 gasket is 6561 triangles.
pub const DEFAULT_MAX_DEPTH: u32 = 8;

/// No configuration may raise the depth limit past this. 3^12 triangles is already ~19 MiB of
/// vertex data.
pub const DEPTH_CEILING: u32 = 12;

/// Receives the buffer whenever the subdivider has new content ready to draw.
pub trait Flush {
    fn flush(&mut self, buffer: &GeometryBuffer) -> GasketResult<()>;
}

impl<F> Flush for F where F: FnMut(&GeometryBuffer) {
    fn flush(&mut self, buffer: &GeometryBuffer) -> GasketResult<()> {
        self(buffer);
        Ok(())
    }
}

/// Discards every flush.
#[derive(Debug, Copy, Clone, Default)]
pub struct NoFlush;

impl Flush for NoFlush {
    fn flush(&mut self, _buffer: &GeometryBuffer) -> GasketResult<()> {
        Ok(())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FlushPolicy {
    /// Flush after each internal node of the recursion finishes.
    EveryInternalNode,

    /// Only flush once the whole gasket is in the buffer.
    Once,
}

impl Default for FlushPolicy {
    fn default() -> Self {
        FlushPolicy::EveryInternalNode
    }
}

impl FromStr for FlushPolicy {
    type Err = GasketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "every-node" => Ok(FlushPolicy::EveryInternalNode),
            "once" => Ok(FlushPolicy::Once),
            other => Err(GasketError::InvalidArgument(
                format!("unknown flush policy \"{}\" (expected \"every-node\" or \"once\")", other)
            )),
        }
    }
}

/// What a finished request produced.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RenderStats {
    pub triangles: usize,
    pub flushes: usize,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GasketSubdivider {
    pub max_depth: u32,
    pub policy: FlushPolicy,
}

impl Default for GasketSubdivider {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            policy: FlushPolicy::default(),
        }
    }
}

impl GasketSubdivider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the deepest recursion a request may ask for. Anything past [`DEPTH_CEILING`] is
    /// clamped to it.
    pub fn max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth.min(DEPTH_CEILING);
        self
    }

    pub fn policy(mut self, policy: FlushPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Subdivides the triangle `(v0, v1, v2)` `depth` times, appending every leaf triangle to
    /// `buffer`, and returns the number of triangles appended.
    ///
    /// This does *not* clear the buffer first: subdividing twice leaves both gaskets in it. Use
    /// [`GasketSubdivider::render`] for a fresh gasket.
    ///
    /// Fails without touching the buffer if `depth` is negative or over the limit, if a corner
    /// isn't finite, or if the buffer is sealed. Anything that goes wrong partway through (a flush
    /// failing, say) rolls the buffer back to the length it had on entry.
    pub fn subdivide<F>(
        &self,
        v0: Point3,
        v1: Point3,
        v2: Point3,
        depth: i32,
        buffer: &mut GeometryBuffer,
        flush: &mut F
    ) -> GasketResult<usize>
        where F: Flush + ?Sized
    {
        let depth = self.check_depth(depth)?;
        check_corners(&[v0, v1, v2])?;
        buffer.check_writable()?;

        let start = buffer.len();
        self.recurse(v0, v1, v2, depth, buffer, flush).map_err(|e| {
            buffer.truncate(start);
            e
        })
    }

    /// Handles one "draw a gasket of depth N" request from start to finish.
    ///
    /// The depth and corners are validated before anything happens, so a bad request leaves the
    /// previous gasket in `buffer` exactly as it was. Otherwise the buffer ends up holding only the
    /// new gasket, sealed so nothing appends to it before the next request.
    pub fn render<F>(
        &self,
        corners: [Point3; 3],
        depth: i32,
        buffer: &mut GeometryBuffer,
        flush: &mut F
    ) -> GasketResult<RenderStats>
        where F: Flush + ?Sized
    {
        let checked = self.check_depth(depth)?;
        check_corners(&corners)?;

        let mut next = GeometryBuffer::with_capacity(leaf_triangles(checked));
        let mut counter = CountingFlush { inner: flush, count: 0 };
        let [v0, v1, v2] = corners;

        let triangles = self.recurse(v0, v1, v2, checked, &mut next, &mut counter)?;

        if self.policy == FlushPolicy::Once {
            counter.flush(&next)?;
        }

        next.seal();
        *buffer = next;

        debug!("rendered gasket of depth {}: {} triangles, {} flushes", depth, triangles, counter.count);

        Ok(RenderStats { triangles, flushes: counter.count })
    }

    fn recurse<F>(
        &self,
        v0: Point3,
        v1: Point3,
        v2: Point3,
        depth: u32,
        buffer: &mut GeometryBuffer,
        flush: &mut F
    ) -> GasketResult<usize>
        where F: Flush + ?Sized
    {
        if depth == 0 {
            buffer.append_triangle(v0, v1, v2)?;
            return Ok(1);
        }

        let mid01 = Point3::midpoint(v0, v1);
        let mid12 = Point3::midpoint(v1, v2);
        let mid20 = Point3::midpoint(v2, v0);

        let triangles = self.recurse(v0, mid01, mid20, depth - 1, buffer, flush)?
            + self.recurse(mid01, v1, mid12, depth - 1, buffer, flush)?
            + self.recurse(mid20, mid12, v2, depth - 1, buffer, flush)?;

        if self.policy == FlushPolicy::EveryInternalNode {
            trace!("flushing {} vertices at depth {}", buffer.vertex_count(), depth);
            flush.flush(buffer)?;
        }

        Ok(triangles)
    }

    fn check_depth(&self, depth: i32) -> GasketResult<u32> {
        if depth < 0 {
            return Err(GasketError::InvalidArgument(
                format!("depth must not be negative (got {})", depth)
            ));
        }

        // `max_depth` is public, so the builder's clamp alone isn't enough
        let limit = self.max_depth.min(DEPTH_CEILING);
        let depth = depth as u32;
        if depth > limit {
            return Err(GasketError::InvalidArgument(
                format!("depth {} is over the limit of {}", depth, limit)
            ));
        }

        Ok(depth)
    }
}

/// Number of triangles in a gasket of the given depth.
pub fn leaf_triangles(depth: u32) -> usize {
    3usize.pow(depth)
}

/// Number of non-leaf calls (and so legacy flushes) in a gasket of the given depth.
pub fn internal_nodes(depth: u32) -> usize {
    (leaf_triangles(depth) - 1) / 2
}

pub(crate) fn check_corners(corners: &[Point3]) -> GasketResult<()> {
    match corners.iter().find(|p| !p.is_finite()) {
        Some(p) => Err(GasketError::DataError(format!("non-finite corner {}", p))),
        None => Ok(()),
    }
}

struct CountingFlush<'a, F: Flush + ?Sized> {
    inner: &'a mut F,
    count: usize,
}

impl<'a, F: Flush + ?Sized> Flush for CountingFlush<'a, F> {
    fn flush(&mut self, buffer: &GeometryBuffer) -> GasketResult<()> {
        self.count += 1;
        self.inner.flush(buffer)
    }
}
