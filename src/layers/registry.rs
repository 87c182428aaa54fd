//! The static catalog of toggleable thematic layers.

use crate::{prelude::HashMap, MapError, Result};
use serde::{Deserialize, Serialize};

/// Static description of one toggleable WMS layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerDescriptor {
    /// Stable identifier, also the tag carried by the attached layer
    pub id: String,
    /// Localized label shown next to the checkbox
    pub label: String,
    /// WMS service endpoint
    pub endpoint: String,
    /// Value of the `LAYERS` request parameter
    pub remote_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_zoom: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_zoom: Option<f64>,
}

impl LayerDescriptor {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        endpoint: impl Into<String>,
        remote_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            endpoint: endpoint.into(),
            remote_name: remote_name.into(),
            min_zoom: None,
            max_zoom: None,
        }
    }

    pub fn with_zoom_range(mut self, min_zoom: Option<f64>, max_zoom: Option<f64>) -> Self {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self
    }

    /// Label for display, falling back to the id when none is set
    pub fn display_label(&self) -> &str {
        if self.label.trim().is_empty() {
            &self.id
        } else {
            &self.label
        }
    }

    fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(MapError::Config("layer id must not be empty".to_string()));
        }
        if self.remote_name.is_empty() {
            return Err(MapError::Config(format!(
                "layer '{}' has no remote layer name",
                self.id
            )));
        }
        reqwest::Url::parse(&self.endpoint).map_err(|e| {
            MapError::Config(format!(
                "layer '{}' has invalid endpoint '{}': {}",
                self.id, self.endpoint, e
            ))
        })?;
        if let (Some(min), Some(max)) = (self.min_zoom, self.max_zoom) {
            if min > max {
                return Err(MapError::Config(format!(
                    "layer '{}' has min_zoom {} above max_zoom {}",
                    self.id, min, max
                )));
            }
        }
        Ok(())
    }
}

/// Ordered, validated set of [`LayerDescriptor`]s with unique ids
#[derive(Debug, Clone)]
pub struct LayerRegistry {
    descriptors: Vec<LayerDescriptor>,
    index: HashMap<String, usize>,
}

impl LayerRegistry {
    pub fn new(descriptors: Vec<LayerDescriptor>) -> Result<Self> {
        let mut index = HashMap::default();
        for (position, descriptor) in descriptors.iter().enumerate() {
            descriptor.validate()?;
            if index.insert(descriptor.id.clone(), position).is_some() {
                return Err(MapError::Config(format!(
                    "duplicate layer id '{}'",
                    descriptor.id
                )));
            }
        }
        Ok(Self { descriptors, index })
    }

    pub fn get(&self, id: &str) -> Option<&LayerDescriptor> {
        self.index.get(id).map(|&i| &self.descriptors[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Descriptors in registry order
    pub fn iter(&self) -> impl Iterator<Item = &LayerDescriptor> {
        self.descriptors.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.descriptors.iter().map(|d| d.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl Default for LayerRegistry {
    fn default() -> Self {
        let descriptors = default_catalog();
        let index = descriptors
            .iter()
            .enumerate()
            .map(|(i, d)| (d.id.clone(), i))
            .collect();
        Self { descriptors, index }
    }
}

const GEOSERVER_106: &str = "http://10.100.100.106:8051/geoserver";
const GEOSERVER_17_106: &str = "http://192.168.17.106:8051/geoserver";

fn geoserver(host: &str, id: &str, label: &str, remote_name: &str) -> LayerDescriptor {
    LayerDescriptor::new(
        id,
        label,
        format!("{}/{}/wms", host, remote_name),
        remote_name,
    )
}

/// The thematic layers the viewer ships with, in panel order
pub fn default_catalog() -> Vec<LayerDescriptor> {
    vec![
        geoserver(GEOSERVER_17_106, "totalM", "المباني", "total_m")
            .with_zoom_range(Some(15.0), Some(25.0)),
        geoserver(GEOSERVER_106, "gov", "المحافظات", "gov"),
        geoserver(GEOSERVER_106, "agriPoint", "نقاط زراعية", "agri_point"),
        LayerDescriptor::new(
            "country",
            "الدولة",
            "http://192.168.17.49:80/erdas-apollo/vector/country?service=WMS",
            "country",
        ),
        geoserver(GEOSERVER_17_106, "sec", "المراكز", "sec"),
        geoserver(GEOSERVER_17_106, "ssec", "الشياخات", "ssec"),
        geoserver(GEOSERVER_106, "agriLine", "خطوط زراعية", "agri_line"),
        geoserver(GEOSERVER_106, "landmarkPoint", "المعالم", "landmark_point"),
        geoserver(GEOSERVER_106, "portsAirportLine", "خطوط الموانئ والمطارات", "ports_airport_line"),
        geoserver(GEOSERVER_106, "portsAirportPoly", "مناطق الموانئ والمطارات", "ports_airport_poly"),
        geoserver(GEOSERVER_106, "agriArea", "مناطق زراعية", "agri_area"),
        geoserver(GEOSERVER_106, "railwayPoint", "نقاط السكك الحديدية", "railway_point"),
        geoserver(GEOSERVER_106, "railwayPoly", "مناطق السكك الحديدية", "railway_poly"),
        geoserver(GEOSERVER_106, "railwayLine", "خطوط السكك الحديدية", "railway_line"),
        geoserver(GEOSERVER_106, "egyptBoundaries", "حدود مصر", "egypt_boundaries"),
        geoserver(GEOSERVER_106, "transportationPoint", "نقاط النقل", "transportation_point"),
        geoserver(GEOSERVER_106, "transportationPoly", "مناطق النقل", "transportation_poly"),
        geoserver(GEOSERVER_106, "utilitiesLine", "خطوط المرافق", "utilities_line"),
        geoserver(GEOSERVER_106, "utilitiesPoint", "نقاط المرافق", "utilities_point"),
        geoserver(GEOSERVER_106, "utilitiesPoly", "مناطق المرافق", "utilities_poly"),
        geoserver(GEOSERVER_106, "waterbodyLine", "خطوط المياه", "waterbody_line"),
        geoserver(GEOSERVER_106, "waterbodyPoly", "مسطحات مائية", "waterbody_poly"),
        geoserver(GEOSERVER_106, "waterbodyPoint", "نقاط المياه", "waterbody_point"),
        geoserver(GEOSERVER_106, "roadsUpdate", "الطرق", "roads_update"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_is_valid() {
        let registry = LayerRegistry::new(default_catalog()).unwrap();
        assert_eq!(registry.len(), 24);
        assert_eq!(registry.ids().next(), Some("totalM"));
        assert_eq!(registry.ids().last(), Some("roadsUpdate"));
    }

    #[test]
    fn test_default_matches_validated_catalog() {
        let validated = LayerRegistry::new(default_catalog()).unwrap();
        let default = LayerRegistry::default();
        assert!(validated.iter().eq(default.iter()));
    }

    #[test]
    fn test_lookup_by_id() {
        let registry = LayerRegistry::default();
        let gov = registry.get("gov").unwrap();
        assert_eq!(gov.endpoint, "http://10.100.100.106:8051/geoserver/gov/wms");
        assert_eq!(gov.remote_name, "gov");
        assert_eq!(gov.min_zoom, None);

        let buildings = registry.get("totalM").unwrap();
        assert_eq!(buildings.remote_name, "total_m");
        assert_eq!(buildings.min_zoom, Some(15.0));
        assert_eq!(buildings.max_zoom, Some(25.0));

        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let layer = LayerDescriptor::new("gov", "", "http://host/wms", "gov");
        let err = LayerRegistry::new(vec![layer.clone(), layer]).unwrap_err();
        assert!(matches!(err, MapError::Config(msg) if msg.contains("duplicate")));
    }

    #[test]
    fn test_invalid_endpoint_rejected() {
        let layer = LayerDescriptor::new("gov", "", "not a url", "gov");
        assert!(matches!(
            LayerRegistry::new(vec![layer]),
            Err(MapError::Config(_))
        ));
    }

    #[test]
    fn test_inverted_zoom_range_rejected() {
        let layer = LayerDescriptor::new("gov", "", "http://host/wms", "gov")
            .with_zoom_range(Some(10.0), Some(5.0));
        assert!(LayerRegistry::new(vec![layer]).is_err());
    }

    #[test]
    fn test_display_label_falls_back_to_id() {
        let unlabeled = LayerDescriptor::new("gov", " ", "http://host/wms", "gov");
        assert_eq!(unlabeled.display_label(), "gov");

        let labeled = LayerDescriptor::new("gov", "المحافظات", "http://host/wms", "gov");
        assert_eq!(labeled.display_label(), "المحافظات");
    }
}
