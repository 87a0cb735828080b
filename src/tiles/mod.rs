pub mod fetch;
pub mod loader;
pub mod source;

// Re-exports for convenience
pub use fetch::{HttpTileJsonClient, TileJsonClient};
pub use loader::{TileLoader, TileResult};
pub use source::{TemplateSource, TileSource};
