//! The vertex accumulator that the subdivider writes into and the renderer uploads from.
//!
//! Vertices are stored flattened, three `f32`s per vertex and nothing else, which is exactly the
//! layout a `glVertexAttribPointer(0, 3, GL_FLOAT, GL_FALSE, 0, 0)` expects. No interleaving, no
//! padding, so the backing `Vec` can be handed to the GPU as-is.

use super::point::Point3;
use crate::error::{GasketError, GasketResult};

pub const FLOATS_PER_VERTEX: usize = 3;
pub const FLOATS_PER_TRIANGLE: usize = 3 * FLOATS_PER_VERTEX;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryBuffer {
    data: Vec<f32>,
    // Set once a request has finished filling the buffer and the renderer owns the contents.
    sealed: bool,
}

impl GeometryBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preallocates room for `triangles` triangles.
    pub fn with_capacity(triangles: usize) -> Self {
        Self {
            data: Vec::with_capacity(triangles * FLOATS_PER_TRIANGLE),
            sealed: false,
        }
    }

    /// Empties the buffer and makes it writable again. Keeps the allocation.
    pub fn reset(&mut self) {
        self.data.clear();
        self.sealed = false;
    }

    pub fn append_triangle(&mut self, v0: Point3, v1: Point3, v2: Point3) -> GasketResult<()> {
        self.check_writable()?;
        for v in &[v0, v1, v2] {
            check_finite(v)?;
        }

        self.data.extend_from_slice(&[
            v0.x(), v0.y(), v0.z(),
            v1.x(), v1.y(), v1.z(),
            v2.x(), v2.y(), v2.z(),
        ]);

        Ok(())
    }

    /// Appends a lone vertex. Used for point clouds, which are drawn with `GL_POINTS`.
    pub fn append_point(&mut self, p: Point3) -> GasketResult<()> {
        self.check_writable()?;
        check_finite(&p)?;
        self.data.extend_from_slice(&p.to_array());
        Ok(())
    }

    pub fn vertex_count(&self) -> usize {
        self.data.len() / FLOATS_PER_VERTEX
    }

    pub fn triangle_count(&self) -> usize {
        self.data.len() / FLOATS_PER_TRIANGLE
    }

    /// Number of scalars, not vertices.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_floats(&self) -> &[f32] {
        &self.data
    }

    /// The contents as raw bytes in native endianness, four per scalar.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }

    /// Marks the contents as finished. Writes fail until the next `reset`.
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Drops everything past the first `len` floats.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.data.truncate(len);
    }

    pub(crate) fn check_writable(&self) -> GasketResult<()> {
        if self.sealed {
            return Err(GasketError::InvalidState(
                "geometry buffer holds a finished request; reset it before writing".to_string(),
            ));
        }

        Ok(())
    }
}

fn check_finite(p: &Point3) -> GasketResult<()> {
    if p.is_finite() {
        Ok(())
    } else {
        Err(GasketError::DataError(format!("non-finite coordinate in vertex {}", p)))
    }
}
