//! Text shown inside the popup, derived from the popup state.

use crate::{
    core::{
        format::{format_hdms, format_xy},
        geo::Point,
    },
    data::attributes::AttributeRecord,
    ui::popup::PopupState,
};

pub const LOADING_TEXT: &str = "جارٍ تحميل البيانات...";
pub const RECORD_TITLE: &str = "معلومات المبنى";
pub const EMPTY_TEXT: &str = "لا توجد بيانات متاحة لهذه النقطة";
pub const UNAVAILABLE: &str = "غير متوفر";
pub const CLICKED_CAPTION: &str = "You clicked here:";

/// `(record field, row label)` in display order
pub const RECORD_ROWS: [(&str, &str); 4] = [
    ("seragid", "seragid"),
    ("gov_name", "المحافظة"),
    ("sec_name", "مركز"),
    ("ssec_name", "الشياخة"),
];

#[derive(Debug, Clone, PartialEq)]
pub enum PopupBody {
    Loading(&'static str),
    Record {
        title: &'static str,
        /// `(label, value)` pairs
        rows: Vec<(&'static str, String)>,
    },
    Empty(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PopupContent {
    pub body: PopupBody,
    pub caption: &'static str,
    /// Projected coordinate the popup is pinned to
    pub anchor: Point,
    pub x_line: String,
    pub y_line: String,
    pub hdms: String,
}

impl PopupContent {
    /// `None` while the popup is hidden
    pub fn from_state(state: &PopupState) -> Option<Self> {
        let anchor = state.anchor()?;
        let body = match state {
            PopupState::Hidden => return None,
            PopupState::Loading { .. } => PopupBody::Loading(LOADING_TEXT),
            PopupState::Shown { record, .. } => PopupBody::Record {
                title: RECORD_TITLE,
                rows: record_rows(record),
            },
            PopupState::ShownEmpty { .. } => PopupBody::Empty(EMPTY_TEXT),
        };
        let (x_line, y_line) = format_xy(anchor);

        Some(Self {
            body,
            caption: CLICKED_CAPTION,
            anchor,
            x_line,
            y_line,
            hdms: format_hdms(anchor, 0),
        })
    }
}

fn record_rows(record: &AttributeRecord) -> Vec<(&'static str, String)> {
    RECORD_ROWS
        .iter()
        .map(|(field, label)| {
            let value = record
                .display_value(field)
                .unwrap_or_else(|| UNAVAILABLE.to_string());
            (*label, value)
        })
        .collect()
}
