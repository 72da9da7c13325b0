//! Math utilities and types
//!
//! Provides the vector types shared by zones, particles and renderers, plus
//! the small set of vector helpers emitters rely on.

pub use nalgebra::Vector3;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// 2 * Pi
    pub const TAU: f32 = 2.0 * PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

/// Convert degrees to radians
pub fn degree_transform(degrees: f32) -> f32 {
    degrees * constants::DEG_TO_RAD
}

/// Format a number as a `#`-prefixed lowercase hex string without padding
pub fn to_color16(value: u32) -> String {
    format!("#{value:x}")
}

/// Interpolate from `b` towards `a` by `energy`
///
/// `energy == 1.0` yields `a`, `energy == 0.0` yields `b`.
pub fn lerp(a: f32, b: f32, energy: f32) -> f32 {
    b + (a - b) * energy
}

/// Build a unit vector normal to `v` in its XY projection
///
/// Axis-aligned and zero vectors take fixed fallback directions so the
/// result is always defined:
/// - zero vector: `(1, 0, 1)`
/// - pure Z vector: `(1, 1, -y/z)`
/// - zero X with non-zero Y: `(1, 0, 1)`
/// - otherwise: `(-y/x, 1, 1)`
#[allow(clippy::float_cmp)]
pub fn get_normal(v: &Vec3) -> Vec3 {
    let n = if v.x == 0.0 && v.y == 0.0 {
        if v.z == 0.0 {
            Vec3::new(1.0, 0.0, 1.0)
        } else {
            Vec3::new(1.0, 1.0, -v.y / v.z)
        }
    } else if v.x == 0.0 {
        Vec3::new(1.0, 0.0, 1.0)
    } else {
        Vec3::new(-v.y / v.x, 1.0, 1.0)
    };

    n.normalize()
}

/// Rotate `v` around the unit axis `k` by `angle` radians
///
/// Rodrigues' rotation formula:
/// `v' = v cos θ + (k × v) sin θ + k (k · v)(1 - cos θ)`
pub fn axis_rotate(v: &Vec3, k: &Vec3, angle: f32) -> Vec3 {
    let (sin, cos) = angle.sin_cos();
    let p = k.dot(v) * (1.0 - cos);

    k.cross(v) * sin + v * cos + k * p
}
