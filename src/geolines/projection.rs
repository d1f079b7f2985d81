//! Latitude/longitude to globe coordinates.
//!
//! The globe is centered at the origin with +Y through the north pole (the
//! renderer's up axis). With `phi = 90° - lat` and `theta = lon + 180°`:
//!
//! ```text
//! x = -r · sin(phi) · cos(theta)
//! y =  r · cos(phi)
//! z =  r · sin(phi) · sin(theta)
//! ```
//!
//! so (0°, 0°) lands on +X and (0°, 90°E) on -Z. Every line layer goes
//! through [`project_point`]; anything placed on the same globe must use the
//! same convention.

use serde::Serialize;

/// A point in globe space.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn distance(&self, other: &Point3) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn as_f32_array(self) -> [f32; 3] {
        [self.x as f32, self.y as f32, self.z as f32]
    }
}

/// Project a latitude/longitude in degrees onto a sphere of `radius`.
pub fn project_point(lat: f64, lon: f64, radius: f64) -> Point3 {
    let phi = (90.0 - lat).to_radians();
    let theta = (lon + 180.0).to_radians();
    Point3::new(
        -radius * phi.sin() * theta.cos(),
        radius * phi.cos(),
        radius * phi.sin() * theta.sin(),
    )
}

/// Inverse of [`project_point`]: `(lat, lon)` in degrees, longitude in `[-180, 180)`.
pub fn unproject_point(point: &Point3) -> (f64, f64) {
    let radius = point.length();
    if radius == 0.0 {
        return (0.0, 0.0);
    }
    let lat = 90.0 - (point.y / radius).clamp(-1.0, 1.0).acos().to_degrees();
    let theta = point.z.atan2(-point.x).to_degrees();
    (lat, normalize_longitude(theta - 180.0))
}

/// Normalize a longitude value to the range [-180, 180)
pub fn normalize_longitude(lon: f64) -> f64 {
    let mut normalized = ((lon + 180.0) % 360.0 + 360.0) % 360.0 - 180.0;

    // Exactly 180.0 belongs to -180.0 in the normalized form
    if normalized == 180.0 {
        normalized = -180.0;
    }

    normalized
}
