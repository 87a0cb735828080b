//! View that builds its map from a TileJSON document
//!
//! Mounting starts exactly one fetch of
//! `{tile_service_base}/tileserver/{dataset}/vector-tiles`. The result is
//! picked up by [`VectorMapView::poll`] (UI thread, once per frame) or
//! awaited with [`VectorMapView::finish_fetch`]. Unmounting or dropping the
//! view aborts a fetch still in flight, so a late result is never applied.

use crate::{
    core::{config::ViewerConfig, geo::Point, map::Map},
    data::tilejson::{is_vector_source, TileJson},
    layers::{
        tile::TileLayer,
        vector_tile::{VectorTileLayer, VectorTileLayerOptions, VectorTilePlugin},
    },
    runtime::{self, TaskHandle},
    tiles::fetch::TileJsonClient,
    LayerError, MapError, Result,
};
use std::sync::Arc;
use tokio::sync::oneshot::{self, error::TryRecvError};

pub const BASE_LAYER_ID: &str = "osm";
pub const OVERLAY_LAYER_ID: &str = "vector-tiles";
pub const OVERLAY_LAYER_NAME: &str = "Vector Tiles";

/// Progress of the TileJSON request
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchState {
    #[default]
    Idle,
    Loading,
    Loaded(TileJson),
    Failed(String),
}

/// What the view should draw right now
pub enum ViewState<'a> {
    Loading,
    Error(&'a str),
    Map(&'a Map),
    Empty,
}

struct PendingFetch {
    _task: TaskHandle,
    result: oneshot::Receiver<Result<TileJson>>,
}

pub struct VectorMapView {
    config: ViewerConfig,
    plugin: Arc<dyn VectorTilePlugin>,
    state: FetchState,
    pending: Option<PendingFetch>,
    map: Option<Map>,
    overlay_error: Option<LayerError>,
    container_size: Point,
}

impl VectorMapView {
    pub fn new(config: ViewerConfig, plugin: Arc<dyn VectorTilePlugin>) -> Self {
        Self {
            config,
            plugin,
            state: FetchState::Idle,
            pending: None,
            map: None,
            overlay_error: None,
            container_size: Point::new(800.0, 600.0),
        }
    }

    /// Size the map is laid out in; applied to the map when it exists
    pub fn set_container_size(&mut self, size: Point) {
        self.container_size = size;
        if let Some(map) = self.map.as_mut() {
            map.set_size(size);
        }
    }

    /// Starts the TileJSON fetch; must be called inside a tokio runtime.
    ///
    /// A view fetches once per mount: calling this while a fetch is running
    /// or after it completed does nothing.
    pub fn mount(&mut self, client: Arc<dyn TileJsonClient>) -> Result<()> {
        if self.state != FetchState::Idle {
            log::debug!("vector view already mounted, not refetching");
            return Ok(());
        }

        let url = self.config.tilejson_url();
        let (tx, rx) = oneshot::channel();
        let task = runtime::spawn(async move {
            let result = client.fetch_tilejson(&url).await;
            // The receiver is gone when the view was unmounted
            let _ = tx.send(result);
        });

        match task {
            Ok(task) => {
                self.state = FetchState::Loading;
                self.pending = Some(PendingFetch {
                    _task: task,
                    result: rx,
                });
                Ok(())
            }
            Err(e) => {
                self.state = FetchState::Failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Applies the fetch result if it has arrived. Returns `true` when the
    /// state changed.
    pub fn poll(&mut self) -> bool {
        let Some(pending) = self.pending.as_mut() else {
            return false;
        };

        let outcome = match pending.result.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Closed) => Err(MapError::Runtime(
                "TileJSON fetch ended without a result".to_string(),
            )),
        };
        self.pending = None;
        self.complete(outcome);
        true
    }

    /// Waits for the in-flight fetch and applies its result
    pub async fn finish_fetch(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        let PendingFetch { _task, result } = pending;
        let outcome = result.await.unwrap_or_else(|_| {
            Err(MapError::Runtime(
                "TileJSON fetch ended without a result".to_string(),
            ))
        });
        self.complete(outcome);
    }

    fn complete(&mut self, outcome: Result<TileJson>) {
        match outcome {
            Ok(document) => {
                self.map = Some(self.build_map(&document));
                self.state = FetchState::Loaded(document);
            }
            Err(e) => {
                log::error!("Error fetching TileJSON data: {}", e);
                self.state = FetchState::Failed(e.to_string());
            }
        }
    }

    fn build_map(&mut self, document: &TileJson) -> Map {
        let mut map = Map::new(
            document.initial_center(),
            document.initial_zoom(),
            self.container_size,
        );

        if let Err(e) = map.add_base_layer(
            Box::new(TileLayer::openstreetmap(BASE_LAYER_ID, "OpenStreetMap")),
            true,
        ) {
            log::error!("failed to add base layer: {}", e);
        }

        match document.fit_bounds() {
            Some(bounds) => map.fit_bounds(&bounds, None),
            None => log::warn!("TileJSON has no usable bounds, keeping the initial view"),
        }

        let is_vector = is_vector_source(document.first_tile(), &self.config.vector_dataset);
        log::info!("Is vector: {}", is_vector);

        self.overlay_error = None;
        if let (true, Some(url)) = (is_vector, document.first_tile()) {
            let options = VectorTileLayerOptions::new(url)
                .with_zoom_bounds(document.min_zoom_level(), document.max_zoom_level())
                .with_styles(self.config.vector_styles.clone())
                .with_attribution(document.attribution_or_default());

            match VectorTileLayer::create(
                OVERLAY_LAYER_ID,
                OVERLAY_LAYER_NAME,
                options,
                self.plugin.as_ref(),
            ) {
                Ok(layer) => {
                    if let Err(e) = map.add_overlay(Box::new(layer), true) {
                        log::error!("failed to add vector overlay: {}", e);
                    }
                }
                Err(e) => {
                    log::error!("vector overlay unavailable: {}", e);
                    self.overlay_error = Some(e);
                }
            }
        }

        map
    }

    /// Render policy: loading, then error, then the map, otherwise nothing
    pub fn render(&self) -> ViewState<'_> {
        match (&self.state, &self.map) {
            (FetchState::Loading, _) => ViewState::Loading,
            (FetchState::Failed(message), _) => ViewState::Error(message),
            (FetchState::Loaded(_), Some(map)) => ViewState::Map(map),
            _ => ViewState::Empty,
        }
    }

    /// Tears the view down; an in-flight fetch is cancelled and the view can
    /// be mounted again
    pub fn unmount(&mut self) {
        if self.pending.take().is_some() {
            log::debug!("vector view unmounted with a fetch in flight");
        }
        self.state = FetchState::Idle;
        self.map = None;
        self.overlay_error = None;
    }

    pub fn is_loading(&self) -> bool {
        self.state == FetchState::Loading
    }

    pub fn state(&self) -> &FetchState {
        &self.state
    }

    /// The loaded document, once available
    pub fn tilejson(&self) -> Option<&TileJson> {
        match &self.state {
            FetchState::Loaded(document) => Some(document),
            _ => None,
        }
    }

    pub fn map(&self) -> Option<&Map> {
        self.map.as_ref()
    }

    pub fn map_mut(&mut self) -> Option<&mut Map> {
        self.map.as_mut()
    }

    /// Why the overlay could not be built, for a fallback notice
    pub fn overlay_error(&self) -> Option<&LayerError> {
        self.overlay_error.as_ref()
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }
}
