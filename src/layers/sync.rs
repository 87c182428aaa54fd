//! Reconciliation between the layer selection and a map surface.
//!
//! [`plan`] is the pure diff; [`LayerSynchronizer::sync`] applies the same
//! rules to a live surface, asking it about every id instead of trusting a
//! remembered attachment set.

use crate::{
    layers::{registry::LayerDescriptor, registry::LayerRegistry, selection::LayerSelection, wms::WmsLayer},
    prelude::HashSet,
    traits::MapSurface,
    Result,
};

/// What has to change for the attached set to equal the selected set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncPlan {
    /// Ids to attach, in registry order
    pub attach: Vec<String>,
    /// Ids to detach: registry order first, then ids the registry does not know
    pub detach: Vec<String>,
}

impl SyncPlan {
    pub fn is_empty(&self) -> bool {
        self.attach.is_empty() && self.detach.is_empty()
    }
}

/// Diffs the desired selection against the ids currently attached.
pub fn plan(registry: &LayerRegistry, selection: &LayerSelection, attached: &[String]) -> SyncPlan {
    let attached_set: HashSet<&str> = attached.iter().map(String::as_str).collect();
    let mut result = SyncPlan::default();

    for descriptor in registry.iter() {
        let id = descriptor.id.as_str();
        match (selection.is_selected(id), attached_set.contains(id)) {
            (true, false) => result.attach.push(id.to_string()),
            (false, true) => result.detach.push(id.to_string()),
            _ => {}
        }
    }

    let mut strays = HashSet::default();
    for id in attached {
        if !registry.contains(id) && strays.insert(id.as_str()) {
            result.detach.push(id.clone());
        }
    }

    result
}

/// Outcome of one [`LayerSynchronizer::sync`] pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub attached: Vec<String>,
    pub detached: Vec<String>,
    /// `(id, reason)` for layers that could not be built, attached or detached
    pub failed: Vec<(String, String)>,
}

impl SyncReport {
    /// No attach or detach happened
    pub fn is_noop(&self) -> bool {
        self.attached.is_empty() && self.detached.is_empty() && self.failed.is_empty()
    }
}

/// Builds the layer a descriptor describes
pub type LayerFactory = fn(&LayerDescriptor) -> Result<WmsLayer>;

/// Applies the selection to a map surface.
pub struct LayerSynchronizer {
    factory: LayerFactory,
}

impl LayerSynchronizer {
    pub fn new() -> Self {
        Self {
            factory: WmsLayer::from_descriptor,
        }
    }

    /// Use a custom layer constructor instead of [`WmsLayer::from_descriptor`]
    pub fn with_factory(factory: LayerFactory) -> Self {
        Self { factory }
    }

    /// Attach selected layers that are missing and detach attached layers
    /// that are not selected. Failures are logged and reported; they never
    /// stop the remaining layers from being processed.
    pub fn sync(
        &self,
        registry: &LayerRegistry,
        selection: &LayerSelection,
        surface: &mut dyn MapSurface,
    ) -> SyncReport {
        let mut report = SyncReport::default();

        for descriptor in registry.iter() {
            let id = descriptor.id.as_str();
            let wanted = selection.is_selected(id);
            let present = surface.has_layer(id);

            if wanted && !present {
                match (self.factory)(descriptor).and_then(|layer| surface.attach(layer)) {
                    Ok(()) => {
                        log::debug!("attached layer '{}'", id);
                        report.attached.push(id.to_string());
                    }
                    Err(e) => {
                        log::warn!("layer '{}' could not be attached: {}", id, e);
                        report.failed.push((id.to_string(), e.to_string()));
                    }
                }
            } else if !wanted && present {
                self.detach(surface, id, &mut report);
            }
        }

        for id in surface.attached_ids() {
            if !registry.contains(&id) {
                self.detach(surface, &id, &mut report);
            }
        }

        report
    }

    fn detach(&self, surface: &mut dyn MapSurface, id: &str, report: &mut SyncReport) {
        match surface.detach(id) {
            Ok(_) => {
                log::debug!("detached layer '{}'", id);
                report.detached.push(id.to_string());
            }
            Err(e) => {
                log::warn!("layer '{}' could not be detached: {}", id, e);
                report.failed.push((id.to_string(), e.to_string()));
            }
        }
    }
}

impl Default for LayerSynchronizer {
    fn default() -> Self {
        Self::new()
    }
}
