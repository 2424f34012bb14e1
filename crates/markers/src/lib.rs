pub mod camera;
pub mod clipping;
pub mod config;
pub mod error;
pub mod events;
pub mod frustum;
pub mod interaction;
pub mod marker;
pub mod projection;
pub mod properties;
pub mod recording;
pub mod registry;
pub mod surface;
pub mod viewer;

pub use config::HudConfig;
pub use error::MarkerError;
pub use events::{HudEvent, Notifier};
pub use marker::{Anchor, AsMarkerId, Marker, MarkerId, MarkerKind, Measured, Tooltip, TooltipSide};
pub use properties::{MarkerProperties, markers_from_json_str};
pub use recording::RecordingHud;
pub use registry::{MarkersHud, Render};

#[cfg(test)]
pub(crate) mod testing {
    use foundation::bounds::Size;
    use foundation::math::Spherical;

    use crate::camera::SphereCamera;
    use crate::config::HudConfig;
    use crate::recording::RecordingHud;

    pub fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    /// 800x600 viewport, 90° horizontal FOV, looking at (0, 0).
    pub fn camera() -> SphereCamera {
        SphereCamera::new(Size::new(800.0, 600.0), 90f64.to_radians())
    }

    pub fn hud() -> RecordingHud {
        RecordingHud::recording(camera(), HudConfig::default())
    }

    /// Square outline centred on `(lon, lat)`, clockwise on screen from the
    /// top-left corner. Degrees in, radians out.
    pub fn square(lon: f64, lat: f64, half: f64) -> Vec<Spherical> {
        vec![
            Spherical::from_degrees(lon - half, lat + half),
            Spherical::from_degrees(lon + half, lat + half),
            Spherical::from_degrees(lon + half, lat - half),
            Spherical::from_degrees(lon - half, lat - half),
        ]
    }
}
