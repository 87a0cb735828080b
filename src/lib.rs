//! # tmsview
//!
//! A small map viewer for tile map services. The vector view reads a
//! TileJSON document from a tile server and builds a map from it; the raster
//! view is statically configured with a public basemap and a locally served
//! TMS raster layer.
//!
//! Tile decoding, vector-tile drawing and the tile server are collaborators
//! reached through traits ([`TileJsonClient`], [`VectorTilePlugin`],
//! [`TileSource`]).

pub mod core;
pub mod data;
pub mod layers;
pub mod prelude;
pub mod runtime;
pub mod tiles;
pub mod views;

#[cfg(feature = "egui")]
pub mod ui;

pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    config::ViewerConfig,
    geo::{LatLng, LatLngBounds, Point, TileCoord},
    map::Map,
    viewport::Viewport,
};

pub use data::tilejson::TileJson;

pub use layers::{
    base::LayerTrait,
    control::{ControlPosition, LayersControl, ScaleControl},
    tile::TileLayer,
    vector_tile::{VectorGrid, VectorTileLayer, VectorTileLayerOptions, VectorTilePlugin},
};

pub use tiles::{
    fetch::{HttpTileJsonClient, TileJsonClient},
    source::{TemplateSource, TileSource},
};

pub use views::{
    raster::RasterMapView,
    router::{Route, Router},
    vector::{FetchState, VectorMapView, ViewState},
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

    #[error("HTTP error! Status: {0}")]
    HttpStatus(u16),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Layer error: {0}")]
    Layer(#[from] LayerError),

    #[error("Runtime error: {0}")]
    Runtime(String),

    #[error("Unknown route: {0}")]
    UnknownRoute(String),
}

/// Errors raised while building or updating map layers
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayerError {
    #[error("failed to construct vector tile layer: {0}")]
    Construction(String),

    #[error("tile url template is empty")]
    EmptyUrl,

    #[error("invalid zoom range: min {min} > max {max}")]
    InvalidZoomRange { min: u8, max: u8 },

    #[error("extension option `{0}` collides with a recognized option")]
    ReservedOption(String),

    #[error("unknown layer: {0}")]
    UnknownLayer(String),
}

/// Error type alias for convenience
pub type Error = MapError;
