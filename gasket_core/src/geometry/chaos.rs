//! The "chaos game" way of drawing a Sierpinski gasket: start somewhere, pick a corner at random,
//! jump halfway to it, plot the point, repeat. After a few hundred points the gasket shows up
//! without any recursion at all.

use super::buffer::GeometryBuffer;
use super::point::Point3;
use super::subdivide::check_corners;
use crate::error::{GasketError, GasketResult};

/// Seed used when nobody asks for a specific one.
pub const DEFAULT_SEED: u64 = 0x5EED_6A5C;

/// Most points a single scatter may write. That's ~114 MiB of vertex data.
pub const MAX_POINTS: usize = 10_000_000;

/// PCG random number generator (32-bit output, 64-bit state)
#[derive(Debug, Copy, Clone)]
pub struct Pcg32 {
    state: u64,
    inc: u64,
}

impl Pcg32 {
    // Must be odd
    const DEFAULT_INC: u64 = 1442695040888963407;
    const MULTIPLIER: u64 = 6364136223846793005;

    pub fn new(seed: u64) -> Self {
        let mut rng = Self { state: 0, inc: Self::DEFAULT_INC };
        rng.state = seed.wrapping_add(rng.inc);
        rng.step();
        rng
    }

    fn step(&mut self) {
        self.state = self.state.wrapping_mul(Self::MULTIPLIER).wrapping_add(self.inc);
    }

    pub fn next_u32(&mut self) -> u32 {
        let old_state = self.state;
        self.step();

        let xorshifted = (((old_state >> 18) ^ old_state) >> 27) as u32;
        let rot = (old_state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    /// A uniformly distributed number in `[0, bound)`. Rejects the low end of the range so small
    /// bounds aren't biased.
    pub fn next_below(&mut self, bound: u32) -> u32 {
        let threshold = bound.wrapping_neg() % bound;
        loop {
            let r = self.next_u32();
            if r >= threshold {
                return r % bound;
            }
        }
    }
}

/// Plays `count` rounds of the chaos game on `corners`, appending one vertex per round to
/// `buffer`. Returns the number of points written.
///
/// Fails without touching the buffer if `count` is over [`MAX_POINTS`], if a corner isn't finite,
/// or if the buffer is sealed.
///
/// The walk starts at `v0 + (v1 + v2) / 2`, which for `BASE_TRIANGLE` is the origin.
pub fn scatter(
    corners: [Point3; 3],
    count: usize,
    rng: &mut Pcg32,
    buffer: &mut GeometryBuffer
) -> GasketResult<usize> {
    if count > MAX_POINTS {
        return Err(GasketError::InvalidArgument(
            format!("{} points is over the limit of {}", count, MAX_POINTS)
        ));
    }
    check_corners(&corners)?;
    buffer.check_writable()?;
    if count == 0 {
        return Ok(0);
    }

    let start = buffer.len();
    walk(corners, count, rng, buffer).map_err(|e| {
        buffer.truncate(start);
        e
    })?;

    debug!("scattered {} chaos game points", count);

    Ok(count)
}

fn walk(corners: [Point3; 3], count: usize, rng: &mut Pcg32, buffer: &mut GeometryBuffer) -> GasketResult<()> {
    let [v0, v1, v2] = corners;
    let mut p = v0 + Point3::midpoint(v1, v2);
    buffer.append_point(p)?;

    for _ in 1..count {
        let corner = corners[rng.next_below(3) as usize];
        p = Point3::midpoint(p, corner);
        buffer.append_point(p)?;
    }

    Ok(())
}
