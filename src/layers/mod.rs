pub mod manager;
pub mod registry;
pub mod selection;
pub mod sync;
pub mod wms;
