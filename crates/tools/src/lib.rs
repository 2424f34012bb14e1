//! Scene loading and reporting behind the `hud` binary.

use std::fs;
use std::path::Path;
use std::time::Duration;

use foundation::bounds::Size;
use foundation::math::{Spherical, Vec2};
use markers::camera::SphereCamera;
use markers::viewer::Viewer;
use markers::{HudConfig, Marker, MarkerProperties, RecordingHud, Render};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Camera setup of a scene file. Angles in degrees.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub width: f64,
    pub height: f64,
    pub fov_deg: f64,
    pub longitude_deg: f64,
    pub latitude_deg: f64,
    pub roll_deg: f64,
    pub gyroscope: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            fov_deg: 90.0,
            longitude_deg: 0.0,
            latitude_deg: 0.0,
            roll_deg: 0.0,
            gyroscope: false,
        }
    }
}

impl ViewerConfig {
    pub fn camera(&self) -> SphereCamera {
        let mut camera = SphereCamera::new(Size::new(self.width, self.height), self.fov_deg.to_radians())
            .with_direction(Spherical::from_degrees(self.longitude_deg, self.latitude_deg));
        camera.set_roll(self.roll_deg.to_radians());
        camera.set_gyroscope(self.gyroscope);
        camera
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub viewer: ViewerConfig,
    #[serde(default)]
    pub config: HudConfig,
    pub markers: Vec<MarkerProperties>,
}

impl Scene {
    pub fn from_json_str(s: &str) -> Result<Self, String> {
        serde_json::from_str(s).map_err(|e| format!("scene json: {e}"))
    }

    pub fn load(path: &Path) -> Result<Self, String> {
        let text = fs::read_to_string(path).map_err(|e| format!("read {path:?}: {e}"))?;
        Self::from_json_str(&text)
    }

    /// Build a HUD with every marker added and one pass run.
    pub fn build_hud(&self) -> Result<RecordingHud, String> {
        let mut hud = RecordingHud::recording(self.viewer.camera(), self.config.clone());
        for props in &self.markers {
            hud.add(props.clone(), Render::Deferred)
                .map_err(|e| e.to_string())?;
        }
        hud.update_positions();
        info!(markers = hud.len(), "scene loaded");
        Ok(hud)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerReport {
    pub id: String,
    pub polygon: bool,
    pub visible: bool,
    pub position2d: Option<[f64; 2]>,
    pub size: [f64; 2],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameReport {
    pub frame: u64,
    pub longitude_deg: f64,
    pub latitude_deg: f64,
    pub visible: usize,
    pub markers: Vec<MarkerReport>,
}

fn xy(v: Vec2) -> [f64; 2] {
    [v.x, v.y]
}

fn marker_report(hud: &RecordingHud, marker: &Marker) -> MarkerReport {
    let visible = marker.position2d().is_some();
    let points = match hud.surface().get(marker.element()) {
        Some(el) if visible && marker.is_polygon() => el.points().iter().copied().map(xy).collect(),
        _ => Vec::new(),
    };
    MarkerReport {
        id: marker.id().to_string(),
        polygon: marker.is_polygon(),
        visible,
        position2d: marker.position2d().map(xy),
        size: [marker.width(), marker.height()],
        points,
    }
}

pub fn frame_report(hud: &RecordingHud) -> FrameReport {
    let markers: Vec<MarkerReport> = hud.iter().map(|m| marker_report(hud, m)).collect();
    FrameReport {
        frame: hud.frame().index,
        longitude_deg: hud.viewer().longitude().to_degrees(),
        latitude_deg: hud.viewer().latitude().to_degrees(),
        visible: markers.iter().filter(|m| m.visible).count(),
        markers,
    }
}

/// Report the current state, then `frames - 1` render ticks, yawing the
/// camera by `yaw_step_deg` before each.
pub fn run_frames(hud: &mut RecordingHud, frames: u32, yaw_step_deg: f64, dt: Duration) -> Vec<FrameReport> {
    let mut reports = Vec::with_capacity(frames as usize);
    if frames == 0 {
        return reports;
    }
    reports.push(frame_report(hud));
    for _ in 1..frames {
        let camera = hud.viewer_mut();
        let target = Spherical::new(
            camera.longitude() + yaw_step_deg.to_radians(),
            camera.latitude(),
        );
        camera.look_at(target);
        hud.on_render(dt);
        debug!(frame = hud.frame().index, "frame projected");
        reports.push(frame_report(hud));
    }
    reports
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PickReport {
    pub x: f64,
    pub y: f64,
    pub marker: Option<String>,
    pub tooltip: Option<String>,
}

pub fn pick_report(hud: &RecordingHud, point: Vec2) -> PickReport {
    let hit = hud.pick(point);
    PickReport {
        x: point.x,
        y: point.y,
        marker: hit.map(|m| m.id().to_string()),
        tooltip: hit.and_then(|m| m.tooltip()).map(|t| t.content.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::{Scene, pick_report, run_frames};
    use foundation::math::Vec2;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    const DEMO: &str = include_str!("../assets/demo_scene.json");

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn demo_scene_loads_and_projects() {
        let scene = Scene::from_json_str(DEMO).expect("scene");
        assert_eq!(scene.markers.len(), 3);
        assert!(scene.config.click_event_on_marker);

        let mut hud = scene.build_hud().expect("hud");
        let reports = run_frames(&mut hud, 1, 0.0, Duration::from_millis(16));
        let report = &reports[0];

        let ids: Vec<&str> = report.markers.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["entrance", "stairs", "window"]);

        let entrance = &report.markers[0];
        let pos = entrance.position2d.expect("entrance visible");
        assert_close(pos[0], 384.0, 1e-9);
        assert_close(pos[1], 284.0, 1e-9);

        assert!(!report.markers[1].visible);

        let window = &report.markers[2];
        assert!(window.visible);
        assert_eq!(window.points.len(), 4);
        assert_eq!(report.visible, 2);
    }

    #[test]
    fn yawing_brings_markers_in_and_out_of_view() {
        let mut hud = Scene::from_json_str(DEMO).expect("scene").build_hud().expect("hud");
        let reports = run_frames(&mut hud, 3, 90.0, Duration::from_millis(16));
        assert_eq!(reports.len(), 3);
        assert_eq!(reports[2].frame, 2);
        assert_close(reports[2].longitude_deg, 180.0, 1e-9);

        let stairs = &reports[2].markers[1];
        assert_eq!(stairs.id, "stairs");
        assert!(stairs.visible);
        assert!(!reports[2].markers[0].visible);
    }

    #[test]
    fn pick_reports_marker_under_point() {
        let hud = Scene::from_json_str(DEMO).expect("scene").build_hud().expect("hud");
        let hit = pick_report(&hud, Vec2::new(400.0, 300.0));
        assert_eq!(hit.marker.as_deref(), Some("entrance"));
        assert_eq!(hit.tooltip.as_deref(), Some("Main entrance"));
        assert_eq!(pick_report(&hud, Vec2::new(10.0, 590.0)).marker, None);
    }

    #[test]
    fn invalid_scene_reports_marker_error() {
        let json = r#"{"markers": [{"id": "a"}]}"#;
        let err = Scene::from_json_str(json).expect("scene").build_hud().expect_err("no geometry");
        assert!(err.contains("marker `a`"), "{err}");
        assert!(Scene::from_json_str("{").is_err());
    }
}
