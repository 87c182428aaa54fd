//! Per-user viewer session: layer selection, popup state, and panel
//! visibility, updated one event at a time.
//!
//! The map surface is passed in rather than owned so the session can be
//! driven against any engine, or none at all in tests.

use crate::{
    core::{config::ViewerConfig, geo::Point},
    data::attributes::AttributeRecord,
    input::events::MapEvent,
    layers::{
        registry::LayerRegistry,
        selection::LayerSelection,
        sync::{LayerSynchronizer, SyncReport},
    },
    traits::{AttributeFetcher, MapSurface},
    ui::{
        content::PopupContent,
        popup::{FetchTicket, PopupController, PopupState, RequestToken},
    },
    Result,
};

pub struct ViewerSession {
    registry: LayerRegistry,
    selection: LayerSelection,
    synchronizer: LayerSynchronizer,
    popup: PopupController,
    sidebar_visible: bool,
}

impl ViewerSession {
    pub fn new(registry: LayerRegistry) -> Self {
        Self::with_synchronizer(registry, LayerSynchronizer::new())
    }

    pub fn with_synchronizer(registry: LayerRegistry, synchronizer: LayerSynchronizer) -> Self {
        let selection = LayerSelection::new(&registry);
        Self {
            registry,
            selection,
            synchronizer,
            popup: PopupController::new(),
            sidebar_visible: false,
        }
    }

    pub fn from_config(config: &ViewerConfig) -> Result<Self> {
        Ok(Self::new(config.registry()?))
    }

    pub fn registry(&self) -> &LayerRegistry {
        &self.registry
    }

    pub fn selection(&self) -> &LayerSelection {
        &self.selection
    }

    pub fn popup_state(&self) -> &PopupState {
        self.popup.state()
    }

    pub fn popup_content(&self) -> Option<PopupContent> {
        PopupContent::from_state(self.popup.state())
    }

    pub fn sidebar_visible(&self) -> bool {
        self.sidebar_visible
    }

    /// Dispatches one event. Returns the lookup to start when the event was
    /// a click.
    pub fn handle(
        &mut self,
        event: MapEvent,
        surface: &mut dyn MapSurface,
    ) -> Result<Option<FetchTicket>> {
        match event {
            MapEvent::Click { coordinate } => return Ok(Some(self.click(coordinate))),
            MapEvent::ToggleLayer { id } => {
                self.toggle_layer(&id, surface)?;
            }
            MapEvent::ClosePopup => self.close_popup(),
            MapEvent::ToggleSidebar => {
                self.toggle_sidebar();
            }
            MapEvent::FetchCompleted { token, result } => {
                self.complete_fetch(token, result);
            }
        }
        Ok(None)
    }

    /// Flips one layer and brings the surface in line with the new selection
    pub fn toggle_layer(&mut self, id: &str, surface: &mut dyn MapSurface) -> Result<SyncReport> {
        let visible = self.selection.toggle(id)?;
        log::info!("layer '{}' {}", id, if visible { "on" } else { "off" });
        Ok(self.sync(surface))
    }

    /// Reconciles a surface that just became available (or was rebuilt)
    pub fn sync(&self, surface: &mut dyn MapSurface) -> SyncReport {
        self.synchronizer.sync(&self.registry, &self.selection, surface)
    }

    pub fn click(&mut self, coordinate: Point) -> FetchTicket {
        let ticket = self.popup.click(coordinate);
        log::debug!("click {:?} at ({}, {})", ticket.token, coordinate.x, coordinate.y);
        ticket
    }

    /// Applies a lookup result; stale results are dropped
    pub fn complete_fetch(
        &mut self,
        token: RequestToken,
        result: Result<Option<AttributeRecord>>,
    ) -> bool {
        self.popup.resolve(token, result)
    }

    pub fn close_popup(&mut self) {
        self.popup.close();
    }

    pub fn toggle_sidebar(&mut self) -> bool {
        self.sidebar_visible = !self.sidebar_visible;
        self.sidebar_visible
    }
}

/// Runs the lookup for `ticket` and wraps the outcome as the event the
/// session expects back.
pub async fn run_lookup(fetcher: &dyn AttributeFetcher, ticket: FetchTicket) -> MapEvent {
    MapEvent::FetchCompleted {
        token: ticket.token,
        result: fetcher.fetch(ticket.coordinate).await,
    }
}
