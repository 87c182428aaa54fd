use crate::{
    core::geo::Point,
    data::attributes::AttributeRecord,
    ui::popup::RequestToken,
    Result,
};

/// Discrete events the viewer session reacts to, one at a time.
#[derive(Debug)]
pub enum MapEvent {
    /// Single click on the map at a projected coordinate
    Click { coordinate: Point },
    /// Checkbox for a registry layer was flipped
    ToggleLayer { id: String },
    /// Close button on the popup
    ClosePopup,
    /// Show or hide the layer panel
    ToggleSidebar,
    /// An attribute lookup started by a click has finished
    FetchCompleted {
        token: RequestToken,
        result: Result<Option<AttributeRecord>>,
    },
}

/// Inputs of the popup state machine
#[derive(Debug, Clone, PartialEq)]
pub enum PopupEvent {
    /// A click issued `token`; the popup anchors at `coordinate`
    Click {
        token: RequestToken,
        coordinate: Point,
    },
    /// The lookup for `token` finished; failures arrive as `None`
    Resolved {
        token: RequestToken,
        record: Option<AttributeRecord>,
    },
    Close,
}
