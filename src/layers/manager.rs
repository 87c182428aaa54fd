use crate::{layers::wms::WmsLayer, prelude::HashMap, traits::MapSurface, MapError, Result};

/// In-memory layer stack: attached overlays indexed by id, drawn in attach
/// order (last attached on top).
#[derive(Debug, Default)]
pub struct LayerStack {
    /// All layers indexed by ID
    layers: HashMap<String, WmsLayer>,
    /// Ordered list of layer IDs for rendering, bottom first
    render_order: Vec<String>,
}

impl LayerStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets a reference to a layer by ID
    pub fn get_layer(&self, layer_id: &str) -> Option<&WmsLayer> {
        self.layers.get(layer_id)
    }

    /// Applies a function to a specific layer mutably
    pub fn with_layer_mut<F, R>(&mut self, layer_id: &str, f: F) -> Option<R>
    where
        F: FnOnce(&mut WmsLayer) -> R,
    {
        self.layers.get_mut(layer_id).map(f)
    }

    /// Gets all layers in render order
    pub fn layers(&self) -> Vec<&WmsLayer> {
        self.render_order
            .iter()
            .filter_map(|id| self.layers.get(id))
            .collect()
    }

    /// Gets the number of layers
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Checks if the stack is empty
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl MapSurface for LayerStack {
    fn has_layer(&self, id: &str) -> bool {
        self.layers.contains_key(id)
    }

    fn attached_ids(&self) -> Vec<String> {
        self.render_order.clone()
    }

    fn attach(&mut self, layer: WmsLayer) -> Result<()> {
        let layer_id = layer.id().to_string();
        if self.layers.contains_key(&layer_id) {
            return Err(MapError::DuplicateLayer(layer_id));
        }
        self.render_order.push(layer_id.clone());
        self.layers.insert(layer_id, layer);
        Ok(())
    }

    fn detach(&mut self, id: &str) -> Result<Option<WmsLayer>> {
        self.render_order.retain(|layer_id| layer_id != id);
        Ok(self.layers.remove(id))
    }
}
