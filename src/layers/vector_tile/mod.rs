//! Vector tile overlay support
//!
//! - [`options`]: declarative layer options and their resolution
//! - [`style`]: per source-layer style rules
//! - [`adapter`]: the layer itself and the plugin seam
//! - [`remote`]: default plugin that downloads tiles for an external renderer

pub mod adapter;
pub mod options;
pub mod remote;
pub mod style;

pub use adapter::{
    EventSink, GridDiagnostics, GridEvent, VectorGrid, VectorTileLayer, VectorTilePlugin,
};
pub use options::{GridOptions, VectorTileLayerOptions, RECOGNIZED_KEYS};
pub use remote::{RemoteVectorGrid, RemoteVectorGridPlugin};
pub use style::{StyleRule, StyleTable};
