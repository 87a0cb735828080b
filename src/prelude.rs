//! Prelude module for common tmsview types and traits
//!
//! `use tmsview::prelude::*;`

pub use crate::core::{
    config::{FetchOptions, RasterLayerConfig, ViewerConfig},
    geo::{LatLng, LatLngBounds, Point, TileCoord},
    map::Map,
    viewport::Viewport,
};

pub use crate::data::tilejson::{is_vector_source, TileJson};

pub use crate::layers::{
    base::{LayerTrait, LayerType},
    control::{ControlPosition, LayersControl, ScaleBar, ScaleControl},
    manager::LayerManager,
    tile::{TileLayer, TileLayerOptions},
    vector_tile::{
        EventSink, GridEvent, GridOptions, RemoteVectorGridPlugin, StyleRule, StyleTable,
        VectorGrid, VectorTileLayer, VectorTileLayerOptions, VectorTilePlugin,
    },
};

pub use crate::tiles::{
    fetch::{HttpTileJsonClient, TileJsonClient},
    loader::TileLoader,
    source::{TemplateSource, TileSource},
};

pub use crate::runtime::{spawn, TaskHandle};

pub use crate::views::{FetchState, RasterMapView, Route, Router, VectorMapView, ViewState};

#[cfg(feature = "egui")]
pub use crate::ui::{MapWidget, TileTextures, UiMapExt};

pub use crate::{LayerError, MapError, Result};

pub use std::sync::Arc;
