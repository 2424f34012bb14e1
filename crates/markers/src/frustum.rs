use std::f64::consts::{FRAC_PI_2, TAU};

use foundation::bounds::{Aabb2, Size};
use foundation::math::{Spherical, Vec2, Vec3, clamp_latitude, normalize_longitude};

use crate::viewer::Viewer;

/// Visible angular window of one frame.
///
/// Built once per projection pass from the viewer's camera state and passed by
/// reference to the projection routines; it is never kept across frames.
#[derive(Debug, Clone, PartialEq)]
pub struct FovBounds {
    /// Left longitude bound in `[0, 2π)`.
    pub longitude1: f64,
    /// Right longitude bound in `[0, 2π)`.
    pub longitude2: f64,
    pub latitude1: f64,
    pub latitude2: f64,
    /// The longitude window crosses the 0/2π seam.
    pub longitude_wraps: bool,
    /// Every longitude is inside the window (it spans 2π or reaches a pole).
    pub full_longitude: bool,
    /// Top-left, top-right, bottom-right, bottom-left.
    pub corners: [Vec3; 4],
    pub view_direction: Vec3,
    pub viewport: Size,
    pub roll_degrees: f64,
}

impl FovBounds {
    pub fn from_viewer<V: Viewer + ?Sized>(viewer: &V) -> Self {
        let half_h = viewer.horizontal_fov() * 0.5;
        let half_v = viewer.vertical_fov() * 0.5;
        let lon = viewer.longitude();
        let lat = viewer.latitude();

        let longitude1 = normalize_longitude(lon - half_h);
        let longitude2 = normalize_longitude(lon + half_h);
        let raw_lat1 = lat - half_v;
        let raw_lat2 = lat + half_v;
        let latitude1 = clamp_latitude(raw_lat1);
        let latitude2 = clamp_latitude(raw_lat2);

        let full_longitude =
            half_h * 2.0 >= TAU || raw_lat1 <= -FRAC_PI_2 || raw_lat2 >= FRAC_PI_2;
        let longitude_wraps = !full_longitude && longitude1 > longitude2;

        let corner = |lon, lat| viewer.spherical_to_vector(Spherical::new(lon, lat));
        let corners = [
            corner(longitude1, latitude2),
            corner(longitude2, latitude2),
            corner(longitude2, latitude1),
            corner(longitude1, latitude1),
        ];

        FovBounds {
            longitude1,
            longitude2,
            latitude1,
            latitude2,
            longitude_wraps,
            full_longitude,
            corners,
            view_direction: viewer.view_direction(),
            viewport: viewer.viewport_size(),
            roll_degrees: viewer.roll_degrees(),
        }
    }

    /// Strict inclusion test against the window.
    pub fn contains(&self, position: Spherical) -> bool {
        if !(position.latitude > self.latitude1 && position.latitude < self.latitude2) {
            return false;
        }
        if self.full_longitude {
            return true;
        }
        let lon = normalize_longitude(position.longitude);
        if self.longitude_wraps {
            lon > self.longitude1 || lon < self.longitude2
        } else {
            lon > self.longitude1 && lon < self.longitude2
        }
    }

    /// Boundary arcs in order: top, right, bottom, left.
    pub fn edges(&self) -> [(Vec3, Vec3); 4] {
        let [tl, tr, br, bl] = self.corners;
        [(tl, tr), (tr, br), (br, bl), (bl, tl)]
    }

    pub fn viewport_box(&self) -> Aabb2 {
        Aabb2::from_origin_size(Vec2::ZERO, self.viewport)
    }
}

#[cfg(test)]
mod tests {
    use super::FovBounds;
    use crate::camera::SphereCamera;
    use crate::viewer::Viewer;
    use foundation::bounds::Size;
    use foundation::math::Spherical;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn camera() -> SphereCamera {
        SphereCamera::new(Size::new(800.0, 600.0), 90f64.to_radians())
    }

    #[test]
    fn window_around_seam_wraps() {
        let bounds = FovBounds::from_viewer(&camera());
        assert_close(bounds.longitude1, 315f64.to_radians(), 1e-12);
        assert_close(bounds.longitude2, 45f64.to_radians(), 1e-12);
        assert!(bounds.longitude_wraps);
        assert!(!bounds.full_longitude);
        assert_close(bounds.latitude2, 0.75f64.atan(), 1e-12);
        assert_close(bounds.latitude1, -(0.75f64.atan()), 1e-12);
    }

    #[test]
    fn wrapped_window_includes_both_sides_of_seam() {
        let bounds = FovBounds::from_viewer(&camera());
        assert!(bounds.contains(Spherical::from_degrees(10.0, 0.0)));
        assert!(bounds.contains(Spherical::from_degrees(-10.0, 5.0)));
        assert!(bounds.contains(Spherical::from_degrees(350.0, -5.0)));
        assert!(!bounds.contains(Spherical::from_degrees(60.0, 0.0)));
        assert!(!bounds.contains(Spherical::from_degrees(180.0, 0.0)));
        assert!(!bounds.contains(Spherical::from_degrees(0.0, 40.0)));
    }

    #[test]
    fn inclusion_is_strict_at_the_bounds() {
        let bounds = FovBounds::from_viewer(&camera());
        assert!(!bounds.contains(Spherical::new(bounds.longitude2, 0.0)));
        assert!(!bounds.contains(Spherical::new(0.0, bounds.latitude2)));
    }

    #[test]
    fn unwrapped_window_uses_both_bounds() {
        let cam = camera().with_direction(Spherical::from_degrees(180.0, 0.0));
        let bounds = FovBounds::from_viewer(&cam);
        assert!(!bounds.longitude_wraps);
        assert!(bounds.contains(Spherical::from_degrees(170.0, 0.0)));
        assert!(!bounds.contains(Spherical::from_degrees(10.0, 0.0)));
    }

    #[test]
    fn window_reaching_a_pole_spans_all_longitudes() {
        let cam = camera().with_direction(Spherical::from_degrees(0.0, 70.0));
        let bounds = FovBounds::from_viewer(&cam);
        assert!(bounds.full_longitude);
        assert!(!bounds.longitude_wraps);
        assert_close(bounds.latitude2, std::f64::consts::FRAC_PI_2, 1e-12);
        assert!(bounds.contains(Spherical::from_degrees(180.0, 80.0)));
    }

    #[test]
    fn corners_and_frame_state_follow_viewer() {
        let cam = camera();
        let bounds = FovBounds::from_viewer(&cam);
        let tl = cam.vector_to_spherical(bounds.corners[0]);
        assert_close(tl.longitude, bounds.longitude1, 1e-9);
        assert_close(tl.latitude, bounds.latitude2, 1e-9);
        assert_eq!(bounds.viewport, Size::new(800.0, 600.0));
        assert_eq!(bounds.view_direction, cam.view_direction());
        assert_eq!(bounds.edges()[1], (bounds.corners[1], bounds.corners[2]));
    }
}
