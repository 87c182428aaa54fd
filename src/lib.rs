//! # layerview
//!
//! A thematic map viewer core: a catalog of WMS overlay layers, the
//! on/off selection the user edits, a synchronizer that keeps a map surface's
//! attached layers in step with that selection, and a click-to-inspect popup
//! backed by an HTTP attribute lookup.
//!
//! The map surface itself is a trait. [`layers::manager::LayerStack`] is the
//! in-memory implementation; with the `egui` feature the
//! [`ui::widget::MapCanvas`] draws base imagery and attached overlays.

pub mod core;
pub mod data;
pub mod input;
pub mod layers;
pub mod prelude;
pub mod runtime;
pub mod session;
pub mod tiles;
pub mod traits;
pub mod ui;
pub use crate::core::constants;

// Re-export public API
pub use core::{
    config::ViewerConfig,
    format::{format_hdms, format_xy},
    geo::{LatLng, Point, ProjectedBounds, TileCoord},
    viewport::Viewport,
};

pub use layers::{
    manager::LayerStack,
    registry::{LayerDescriptor, LayerRegistry},
    selection::LayerSelection,
    sync::{LayerSynchronizer, SyncPlan, SyncReport},
    wms::WmsLayer,
};

pub use data::attributes::{AttributeRecord, HttpAttributeFetcher};

pub use input::events::{MapEvent, PopupEvent};

pub use session::{run_lookup, ViewerSession};

pub use traits::{AttributeFetcher, MapSurface};

pub use ui::{
    content::PopupContent,
    popup::{FetchTicket, PopupController, PopupState, RequestToken},
};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Unknown layer: {0}")]
    UnknownLayer(String),

    #[error("Layer already attached: {0}")]
    DuplicateLayer(String),

    #[error("Layer error: {0}")]
    Layer(String),

    #[error("Config error: {0}")]
    Config(String),
}

/// Error type alias for convenience
pub type Error = MapError;
