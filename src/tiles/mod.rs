pub mod loader;
pub mod source;

// Re-exports for convenience
pub use loader::{TileKey, TileLoader, TileResult};
pub use source::{TileSource, WmsSource, XyzSource};
