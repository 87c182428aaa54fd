//! Trait seams between the viewer core and the outside world: the map
//! engine that holds live layers, and the service that answers clicks.

use crate::{
    core::geo::Point, data::attributes::AttributeRecord, layers::wms::WmsLayer, Result,
};
use async_trait::async_trait;

/// The live layer stack of a map engine.
///
/// Implementations must answer [`MapSurface::has_layer`] from their current
/// state; the synchronizer relies on it to avoid duplicate attachments.
pub trait MapSurface {
    /// Whether a layer tagged `id` is attached right now
    fn has_layer(&self, id: &str) -> bool;

    /// Ids of attached layers, bottom to top
    fn attached_ids(&self) -> Vec<String>;

    /// Attach a layer on top of the stack
    fn attach(&mut self, layer: WmsLayer) -> Result<()>;

    /// Detach the layer tagged `id`, returning it if it was attached
    fn detach(&mut self, id: &str) -> Result<Option<WmsLayer>>;
}

/// Looks up the attribute record under a clicked coordinate.
#[async_trait]
pub trait AttributeFetcher: Send + Sync {
    /// `Ok(None)` when the service knows nothing about the location
    async fn fetch(&self, coordinate: Point) -> Result<Option<AttributeRecord>>;
}
