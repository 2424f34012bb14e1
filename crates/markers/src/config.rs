use serde::Deserialize;

/// HUD behaviour knobs.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HudConfig {
    /// Size of the tooltip arrow in pixels; polygon tooltips are offset by it
    /// so they do not sit under the cursor.
    pub tooltip_arrow_size: f64,
    /// Report the clicked marker on the click outcome instead of consuming
    /// the click.
    pub click_event_on_marker: bool,
}

impl Default for HudConfig {
    fn default() -> Self {
        Self {
            tooltip_arrow_size: 7.0,
            click_event_on_marker: false,
        }
    }
}

impl HudConfig {
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}
