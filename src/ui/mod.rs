pub mod content;
pub mod popup;

#[cfg(feature = "egui")]
pub mod panel;
#[cfg(feature = "egui")]
pub mod widget;

pub use content::{PopupBody, PopupContent};
pub use popup::{FetchTicket, PopupController, PopupState, RequestToken};

#[cfg(feature = "egui")]
pub use panel::LayerPanel;
#[cfg(feature = "egui")]
pub use widget::{CanvasResponse, MapCanvas};
