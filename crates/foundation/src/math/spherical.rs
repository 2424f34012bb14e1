use std::f64::consts::{FRAC_PI_2, TAU};

use super::Vec3;

/// Position on the viewing sphere, in radians.
///
/// Convention (viewer space, y up):
/// - longitude 0 looks down `-z`, increasing clockwise seen from above
///   (longitude π/2 is `+x`);
/// - latitude is positive above the horizon.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Spherical {
    pub longitude: f64,
    pub latitude: f64,
}

impl Spherical {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    pub fn from_degrees(longitude_deg: f64, latitude_deg: f64) -> Self {
        Self::new(longitude_deg.to_radians(), latitude_deg.to_radians())
    }
}

/// Wrap a longitude into `[0, 2π)`.
pub fn normalize_longitude(longitude: f64) -> f64 {
    let lon = longitude.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs.
    if lon >= TAU { 0.0 } else { lon }
}

/// Clamp a latitude into `[-π/2, π/2]`.
pub fn clamp_latitude(latitude: f64) -> f64 {
    latitude.clamp(-FRAC_PI_2, FRAC_PI_2)
}

pub fn spherical_to_vector(position: Spherical) -> Vec3 {
    let (sin_lat, cos_lat) = position.latitude.sin_cos();
    let (sin_lon, cos_lon) = position.longitude.sin_cos();
    Vec3::new(cos_lat * sin_lon, sin_lat, -cos_lat * cos_lon)
}

/// Inverse of [`spherical_to_vector`]. The input does not need to be unit
/// length; a zero vector maps to the origin of the sphere's coordinates.
pub fn vector_to_spherical(v: Vec3) -> Spherical {
    let Some(n) = v.normalize() else {
        return Spherical::default();
    };
    let latitude = n.y.clamp(-1.0, 1.0).asin();
    let longitude = normalize_longitude(n.x.atan2(-n.z));
    Spherical::new(longitude, latitude)
}

/// Angle between two directions, via the spherical law of cosines.
///
/// Inputs are normalized internally; degenerate inputs give `NaN`.
pub fn angle_between(a: Vec3, b: Vec3) -> f64 {
    let denom = a.length() * b.length();
    if denom <= 0.0 {
        return f64::NAN;
    }
    (a.dot(b) / denom).clamp(-1.0, 1.0).acos()
}
