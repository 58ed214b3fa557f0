#[macro_use] extern crate log;

pub mod error;
pub mod geometry;

pub use error::{GasketError, GasketResult};
pub use geometry::buffer::GeometryBuffer;
pub use geometry::point::Point3;
pub use geometry::subdivide::{Flush, FlushPolicy, GasketSubdivider, NoFlush, RenderStats};
