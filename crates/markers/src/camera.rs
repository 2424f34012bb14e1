use std::f64::consts::FRAC_PI_2;
use std::time::Duration;

use foundation::bounds::Size;
use foundation::math::{
    Spherical, Vec2, Vec3, clamp_latitude, normalize_longitude, spherical_to_vector,
    vector_to_spherical,
};

use crate::viewer::Viewer;

/// Keeps the camera basis well defined when looking straight up or down.
const MAX_PITCH: f64 = FRAC_PI_2 - 1e-6;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Animation {
    pub target: Spherical,
    pub duration: Duration,
}

/// Perspective camera at the centre of the panorama sphere.
///
/// Animations complete immediately; the last request is kept for inspection.
#[derive(Debug, Clone, PartialEq)]
pub struct SphereCamera {
    longitude: f64,
    latitude: f64,
    roll: f64,
    horizontal_fov: f64,
    viewport: Size,
    gyroscope: bool,
    last_animation: Option<Animation>,
}

impl SphereCamera {
    pub fn new(viewport: Size, horizontal_fov: f64) -> Self {
        Self {
            longitude: 0.0,
            latitude: 0.0,
            roll: 0.0,
            horizontal_fov,
            viewport,
            gyroscope: false,
            last_animation: None,
        }
    }

    pub fn with_direction(mut self, target: Spherical) -> Self {
        self.look_at(target);
        self
    }

    pub fn look_at(&mut self, target: Spherical) {
        self.longitude = normalize_longitude(target.longitude);
        self.latitude = clamp_latitude(target.latitude).clamp(-MAX_PITCH, MAX_PITCH);
    }

    pub fn direction(&self) -> Spherical {
        Spherical::new(self.longitude, self.latitude)
    }

    /// Roll in radians, only applied while orientation tracking is enabled.
    pub fn set_roll(&mut self, roll: f64) {
        self.roll = roll;
    }

    pub fn set_gyroscope(&mut self, enabled: bool) {
        self.gyroscope = enabled;
    }

    pub fn set_horizontal_fov(&mut self, horizontal_fov: f64) {
        self.horizontal_fov = horizontal_fov;
    }

    pub fn resize(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    pub fn last_animation(&self) -> Option<Animation> {
        self.last_animation
    }

    fn effective_roll(&self) -> f64 {
        if self.gyroscope { self.roll } else { 0.0 }
    }

    /// `(forward, right, up)` unit vectors.
    fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let forward = spherical_to_vector(self.direction());
        let right = forward.cross(Vec3::UP).normalize().unwrap_or(Vec3::new(
            self.longitude.cos(),
            0.0,
            self.longitude.sin(),
        ));
        let up = right.cross(forward);

        let (sin_r, cos_r) = self.effective_roll().sin_cos();
        let rolled_right = right * cos_r + up * sin_r;
        let rolled_up = up * cos_r - right * sin_r;
        (forward, rolled_right, rolled_up)
    }
}

impl Viewer for SphereCamera {
    fn project_to_screen(&self, direction: Vec3) -> Vec2 {
        let (forward, right, up) = self.basis();
        let depth = direction.dot(forward);
        let depth = if depth.abs() < 1e-12 {
            1e-12_f64.copysign(depth)
        } else {
            depth
        };
        let tan_h = (self.horizontal_fov * 0.5).tan();
        let tan_v = (self.vertical_fov() * 0.5).tan();
        let ndc_x = direction.dot(right) / (depth * tan_h);
        let ndc_y = direction.dot(up) / (depth * tan_v);
        Vec2::new(
            (1.0 + ndc_x) * self.viewport.width * 0.5,
            (1.0 - ndc_y) * self.viewport.height * 0.5,
        )
    }

    fn vector_to_spherical(&self, direction: Vec3) -> Spherical {
        vector_to_spherical(direction)
    }

    fn spherical_to_vector(&self, position: Spherical) -> Vec3 {
        spherical_to_vector(position)
    }

    fn view_direction(&self) -> Vec3 {
        spherical_to_vector(self.direction())
    }

    fn viewport_size(&self) -> Size {
        self.viewport
    }

    fn horizontal_fov(&self) -> f64 {
        self.horizontal_fov
    }

    fn vertical_fov(&self) -> f64 {
        if self.viewport.width <= 0.0 || self.viewport.height <= 0.0 {
            return self.horizontal_fov;
        }
        let aspect = self.viewport.height / self.viewport.width;
        2.0 * ((self.horizontal_fov * 0.5).tan() * aspect).atan()
    }

    fn longitude(&self) -> f64 {
        self.longitude
    }

    fn latitude(&self) -> f64 {
        self.latitude
    }

    fn roll_degrees(&self) -> f64 {
        self.effective_roll().to_degrees()
    }

    fn animate_to(&mut self, target: Spherical, duration: Duration) {
        self.last_animation = Some(Animation { target, duration });
        self.look_at(target);
    }
}
