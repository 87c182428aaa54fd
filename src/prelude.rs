//! Prelude module for common layerview types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use layerview::prelude::*;`

pub use crate::core::{
    config::ViewerConfig,
    format::{format_hdms, format_xy},
    geo::{LatLng, Point, ProjectedBounds, TileCoord},
    viewport::Viewport,
};

pub use crate::layers::{
    manager::LayerStack,
    registry::{LayerDescriptor, LayerRegistry},
    selection::LayerSelection,
    sync::{LayerSynchronizer, SyncPlan, SyncReport},
    wms::WmsLayer,
};

pub use crate::data::attributes::{AttributeRecord, HttpAttributeFetcher};

pub use crate::input::events::{MapEvent, PopupEvent};

pub use crate::session::{run_lookup, ViewerSession};

pub use crate::tiles::source::{TileSource, WmsSource, XyzSource};

pub use crate::traits::{AttributeFetcher, MapSurface};

pub use crate::ui::{
    content::PopupContent,
    popup::{FetchTicket, PopupController, PopupState, RequestToken},
};

#[cfg(feature = "egui")]
pub use crate::ui::{panel::LayerPanel, widget::MapCanvas};

pub use crate::runtime::{runtime, spawn, AsyncHandle, AsyncSpawner};

pub use crate::{Error as MapError, Result};

pub use std::{
    pin::Pin,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};

pub use futures::Future;
