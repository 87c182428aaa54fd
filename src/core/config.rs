//! Viewer configuration.
//!
//! Every external address the viewer talks to lives here. The defaults are
//! the production addresses; a JSON file can override any subset of fields.

use crate::core::constants::{
    DEFAULT_ATTRIBUTE_ENDPOINT, DEFAULT_BASE_IMAGERY_URL, DEFAULT_CENTER_LON_LAT, DEFAULT_ZOOM,
    MAX_TILE_ZOOM,
};
use crate::core::geo::LatLng;
use crate::layers::registry::{default_catalog, LayerDescriptor, LayerRegistry};
use crate::{MapError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Lookup service queried with `X`/`Y` on click
    pub attribute_endpoint: String,
    /// `{x}`/`{y}`/`{z}` template for the base imagery
    pub base_imagery_url: String,
    pub initial_center: LatLng,
    pub initial_zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Attribute lookup timeout; `None` keeps the transport default
    pub request_timeout_ms: Option<u64>,
    /// Font file able to render the Arabic labels
    pub font_path: Option<PathBuf>,
    /// Thematic layer catalog, in panel order
    pub layers: Vec<LayerDescriptor>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        let (lon, lat) = DEFAULT_CENTER_LON_LAT;
        Self {
            attribute_endpoint: DEFAULT_ATTRIBUTE_ENDPOINT.to_string(),
            base_imagery_url: DEFAULT_BASE_IMAGERY_URL.to_string(),
            initial_center: LatLng::new(lat, lon),
            initial_zoom: DEFAULT_ZOOM,
            min_zoom: 0.0,
            max_zoom: MAX_TILE_ZOOM as f64,
            request_timeout_ms: None,
            font_path: None,
            layers: default_catalog(),
        }
    }
}

impl ViewerConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::info!("loading viewer config from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        reqwest::Url::parse(&self.attribute_endpoint).map_err(|e| {
            MapError::Config(format!(
                "invalid attribute_endpoint '{}': {}",
                self.attribute_endpoint, e
            ))
        })?;
        for placeholder in ["{x}", "{y}", "{z}"] {
            if !self.base_imagery_url.contains(placeholder) {
                return Err(MapError::Config(format!(
                    "base_imagery_url is missing {}",
                    placeholder
                )));
            }
        }
        if !self.initial_center.is_valid() {
            return Err(MapError::Config(format!(
                "initial_center {:?} is out of range",
                self.initial_center
            )));
        }
        if self.min_zoom > self.max_zoom {
            return Err(MapError::Config(format!(
                "min_zoom {} is above max_zoom {}",
                self.min_zoom, self.max_zoom
            )));
        }
        LayerRegistry::new(self.layers.clone()).map(|_| ())
    }

    /// Validated registry built from [`Self::layers`]
    pub fn registry(&self) -> Result<LayerRegistry> {
        LayerRegistry::new(self.layers.clone())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ViewerConfig::default();
        config.validate().unwrap();

        assert_eq!(config.attribute_endpoint, "http://10.100.100.41:1000/API/basemap/");
        assert_eq!(config.initial_center, LatLng::new(31.0, 31.0));
        assert_eq!(config.initial_zoom, 5.7);
        assert_eq!(config.registry().unwrap().len(), 24);
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn test_partial_json_overrides_defaults() {
        let config = ViewerConfig::from_json_str(
            r#"{
                "attribute_endpoint": "http://localhost:8080/lookup",
                "request_timeout_ms": 2500,
                "layers": [
                    { "id": "gov", "label": "Governorates",
                      "endpoint": "http://localhost:8051/geoserver/gov/wms",
                      "remote_name": "gov" }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(config.attribute_endpoint, "http://localhost:8080/lookup");
        assert_eq!(config.request_timeout(), Some(Duration::from_millis(2500)));
        assert_eq!(config.base_imagery_url, DEFAULT_BASE_IMAGERY_URL);
        assert_eq!(config.registry().unwrap().ids().collect::<Vec<_>>(), vec!["gov"]);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(matches!(
            ViewerConfig::from_json_str(r#"{ "attribute_endpoint": "nope" }"#),
            Err(MapError::Config(_))
        ));
        assert!(matches!(
            ViewerConfig::from_json_str(r#"{ "base_imagery_url": "http://tiles/{z}/{x}.png" }"#),
            Err(MapError::Config(_))
        ));
        assert!(matches!(
            ViewerConfig::from_json_str(r#"{ "min_zoom": 10, "max_zoom": 2 }"#),
            Err(MapError::Config(_))
        ));
        assert!(matches!(
            ViewerConfig::from_json_str("{"),
            Err(MapError::Serialization(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            ViewerConfig::from_json_file("/definitely/not/here.json"),
            Err(MapError::Io(_))
        ));
    }
}
