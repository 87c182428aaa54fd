pub mod events;

pub use events::{MapEvent, PopupEvent};
