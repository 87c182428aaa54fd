use crate::{layers::registry::LayerRegistry, prelude::HashMap, MapError, Result};

/// Which registry layers the user wants visible.
///
/// Every id starts hidden; [`LayerSelection::toggle`] is the only mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSelection {
    order: Vec<String>,
    states: HashMap<String, bool>,
}

impl LayerSelection {
    pub fn new(registry: &LayerRegistry) -> Self {
        let order: Vec<String> = registry.ids().map(str::to_string).collect();
        let states = order.iter().map(|id| (id.clone(), false)).collect();
        Self { order, states }
    }

    /// Flips one layer and returns its new state
    pub fn toggle(&mut self, id: &str) -> Result<bool> {
        let state = self
            .states
            .get_mut(id)
            .ok_or_else(|| MapError::UnknownLayer(id.to_string()))?;
        *state = !*state;
        Ok(*state)
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.states.get(id).copied().unwrap_or(false)
    }

    /// `(id, selected)` pairs in registry order
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.order
            .iter()
            .map(|id| (id.as_str(), self.is_selected(id)))
    }

    /// Ids currently marked visible, in registry order
    pub fn selected_ids(&self) -> Vec<&str> {
        self.iter()
            .filter_map(|(id, selected)| selected.then_some(id))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
