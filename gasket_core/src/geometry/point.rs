use std::fmt;
use std::ops::{Add, Mul};

/// A position in model space. OpenGL's default clip volume runs from -1 to 1 on every axis, so
/// that's the range most of these end up in.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Point3 {
    x: f32,
    y: f32,
    z: f32,
}

impl Point3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn z(&self) -> f32 {
        self.z
    }

    /// The point halfway along the edge from `a` to `b`. Each end is halved before adding, so two
    /// finite points always have a finite midpoint.
    pub fn midpoint(a: Point3, b: Point3) -> Point3 {
        a * 0.5 + b * 0.5
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

impl Add for Point3 {
    type Output = Point3;

    fn add(self, rhs: Point3) -> Point3 {
        Point3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Mul<f32> for Point3 {
    type Output = Point3;

    fn mul(self, scalar: f32) -> Point3 {
        Point3::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }
}

impl From<[f32; 3]> for Point3 {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl fmt::Display for Point3 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}
