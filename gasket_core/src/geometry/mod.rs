pub mod buffer;
pub mod chaos;
pub mod point;
pub mod subdivide;

use self::point::Point3;

/// The triangle every gasket starts from, filling the default clip volume. Listed
/// counter-clockwise, which OpenGL treats as front-facing.
pub const BASE_TRIANGLE: [Point3; 3] = [
    Point3::new(0.0, 1.0, 0.0),
    Point3::new(-1.0, -1.0, 0.0),
    Point3::new(1.0, -1.0, 0.0),
];
