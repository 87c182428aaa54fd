use crate::{
    core::geo::TileCoord,
    layers::registry::LayerDescriptor,
    tiles::source::{TileSource, WmsSource},
    Result,
};

/// A thematic overlay attached to a map surface, tagged with the id of the
/// descriptor it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct WmsLayer {
    id: String,
    name: String,
    source: WmsSource,
    min_zoom: Option<f64>,
    max_zoom: Option<f64>,
    opacity: f32,
}

impl WmsLayer {
    /// Builds the tiled WMS layer a descriptor describes
    pub fn from_descriptor(descriptor: &LayerDescriptor) -> Result<Self> {
        let source = WmsSource::new(&descriptor.endpoint, descriptor.remote_name.clone())?
            .with_tiled(true);
        Ok(Self {
            id: descriptor.id.clone(),
            name: descriptor.display_label().to_string(),
            source,
            min_zoom: descriptor.min_zoom,
            max_zoom: descriptor.max_zoom,
            opacity: 1.0,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &WmsSource {
        &self.source
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }

    /// Whether the layer draws at view zoom `zoom`: above `min_zoom`
    /// (exclusive) and up to `max_zoom` (inclusive).
    pub fn is_visible_at(&self, zoom: f64) -> bool {
        self.min_zoom.map_or(true, |min| zoom > min) && self.max_zoom.map_or(true, |max| zoom <= max)
    }

    pub fn tile_url(&self, coord: TileCoord) -> String {
        self.source.url(coord)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::registry::LayerRegistry;

    #[test]
    fn test_built_from_descriptor() {
        let registry = LayerRegistry::default();
        let layer = WmsLayer::from_descriptor(registry.get("gov").unwrap()).unwrap();

        assert_eq!(layer.id(), "gov");
        assert_eq!(layer.name(), "المحافظات");
        assert_eq!(layer.source().remote_name(), "gov");
        assert!(layer.tile_url(TileCoord::new(1, 0, 1)).contains("LAYERS=gov"));
    }

    #[test]
    fn test_zoom_bounds() {
        let registry = LayerRegistry::default();
        let buildings = WmsLayer::from_descriptor(registry.get("totalM").unwrap()).unwrap();

        assert!(!buildings.is_visible_at(5.7));
        assert!(!buildings.is_visible_at(15.0));
        assert!(buildings.is_visible_at(15.5));
        assert!(buildings.is_visible_at(25.0));
        assert!(!buildings.is_visible_at(25.1));

        let gov = WmsLayer::from_descriptor(registry.get("gov").unwrap()).unwrap();
        assert!(gov.is_visible_at(0.0));
        assert!(gov.is_visible_at(22.0));
    }

    #[test]
    fn test_opacity_is_clamped() {
        let registry = LayerRegistry::default();
        let mut layer = WmsLayer::from_descriptor(registry.get("sec").unwrap()).unwrap();
        layer.set_opacity(1.5);
        assert_eq!(layer.opacity(), 1.0);
    }
}
