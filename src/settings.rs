use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::theme::is_dark_theme;

/// Diagram viewer and graph view preferences, stored by the host as JSON.
/// Missing fields take their defaults, so older settings files keep loading.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ViewerSettings {
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub zoom_in_step: f64,
    pub zoom_out_step: f64,
    pub minimap_width: f64,
    pub minimap_height: f64,
    pub minimap_padding: f64,
    pub minimap_marker_min_width: f64,
    pub minimap_marker_min_height: f64,
    /// Horizontal space around the fullscreen viewer taken by window chrome.
    pub chrome_width: f64,
    /// Vertical space taken by the toolbar and window chrome.
    pub chrome_height: f64,
    pub center_offset_x: f64,
    pub center_offset_y: f64,
    pub theme: String,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            min_zoom: 0.1,
            max_zoom: 10.0,
            zoom_in_step: 1.25,
            zoom_out_step: 0.8,
            minimap_width: 184.0,
            minimap_height: 134.0,
            minimap_padding: 8.0,
            minimap_marker_min_width: 20.0,
            minimap_marker_min_height: 15.0,
            chrome_width: 40.0,
            chrome_height: 80.0,
            center_offset_x: 20.0,
            center_offset_y: 60.0,
            theme: "github-dark".to_string(),
        }
    }
}

impl ViewerSettings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load_or_default(json: Option<&str>) -> Self {
        match json {
            Some(json) => Self::from_json(json).unwrap_or_else(|e| {
                tracing::warn!("Falling back to default viewer settings: {}", e);
                Self::default()
            }),
            None => Self::default(),
        }
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn is_dark(&self) -> bool {
        is_dark_theme(&self.theme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn partial_json_keeps_defaults() {
        let settings =
            ViewerSettings::from_json(r#"{"max_zoom": 4.0, "theme": "one-light"}"#).unwrap();
        assert_eq!(settings.max_zoom, 4.0);
        assert_eq!(settings.min_zoom, 0.1);
        assert_eq!(settings.minimap_width, 184.0);
        assert!(!settings.is_dark());
    }

    #[test]
    fn empty_object_is_default() {
        assert_eq!(ViewerSettings::from_json("{}").unwrap(), ViewerSettings::default());
        assert!(ViewerSettings::default().is_dark());
    }

    #[test]
    fn bad_json_falls_back() {
        assert!(ViewerSettings::from_json("{ nope").is_err());
        assert_eq!(
            ViewerSettings::load_or_default(Some("{ nope")),
            ViewerSettings::default()
        );
        assert_eq!(ViewerSettings::load_or_default(None), ViewerSettings::default());
    }

    #[test]
    fn survives_a_save_and_load() {
        let settings = ViewerSettings {
            zoom_in_step: 1.5,
            ..ViewerSettings::default()
        };
        let json = settings.to_json().unwrap();
        assert_eq!(ViewerSettings::from_json(&json).unwrap(), settings);
    }
}
