//! Bridge between the map's layer abstraction and a vector tile plugin
//!
//! The plugin owns decoding and drawing. This adapter turns declarative
//! [`VectorTileLayerOptions`] into the plugin's construction call, keeps the
//! live grid in sync when options change, and turns grid lifecycle events
//! into log records.

use super::options::{GridOptions, VectorTileLayerOptions};
use super::style::StyleTable;
use crate::{
    core::{geo::TileCoord, viewport::Viewport},
    layers::base::{LayerProperties, LayerTrait, LayerType},
    LayerError,
};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Lifecycle events a grid reports
#[derive(Debug, Clone, PartialEq)]
pub enum GridEvent {
    TileLoad(TileCoord),
    TileError { coord: TileCoord, detail: String },
    Error(String),
}

/// Callback a grid invokes for every event
pub type EventSink = Arc<dyn Fn(&GridEvent) + Send + Sync>;

/// A constructed vector tile renderer instance owned by a plugin
pub trait VectorGrid: Send {
    /// Installs the callback that receives lifecycle events
    fn set_event_sink(&mut self, sink: EventSink);

    fn set_url(&mut self, url: &str);
    fn set_zoom_bounds(&mut self, min_zoom: u8, max_zoom: u8);
    fn set_opacity(&mut self, opacity: f32);
    fn set_z_index(&mut self, z_index: i32);
    fn set_styles(&mut self, styles: &StyleTable);

    /// Sets (`Some`) or clears (`None`) a plugin-specific option
    fn set_option(&mut self, key: &str, value: Option<&Value>);

    /// Asks the grid to make `coords` available; results arrive as events
    fn request_tiles(&mut self, coords: &[TileCoord]);

    /// Dispatches pending work; called once per frame
    fn poll(&mut self) {}

    /// Tiles currently ready to draw
    fn ready_tiles(&self) -> Vec<TileCoord> {
        Vec::new()
    }
}

/// Factory for [`VectorGrid`] instances
pub trait VectorTilePlugin: Send + Sync {
    fn create_grid(&self, options: &GridOptions) -> Result<Box<dyn VectorGrid>, String>;
}

/// Counters fed by grid events; read-only for everyone else
#[derive(Debug, Default)]
pub struct GridDiagnostics {
    tiles_loaded: AtomicUsize,
    tile_errors: AtomicUsize,
    plugin_errors: AtomicUsize,
}

impl GridDiagnostics {
    pub fn tiles_loaded(&self) -> usize {
        self.tiles_loaded.load(Ordering::Relaxed)
    }

    pub fn tile_errors(&self) -> usize {
        self.tile_errors.load(Ordering::Relaxed)
    }

    pub fn plugin_errors(&self) -> usize {
        self.plugin_errors.load(Ordering::Relaxed)
    }

    fn record(&self, event: &GridEvent) {
        match event {
            GridEvent::TileLoad(coord) => {
                self.tiles_loaded.fetch_add(1, Ordering::Relaxed);
                log::debug!("vector tile loaded: {}", coord);
            }
            GridEvent::TileError { coord, detail } => {
                self.tile_errors.fetch_add(1, Ordering::Relaxed);
                log::warn!("vector tile error at {}: {}", coord, detail);
            }
            GridEvent::Error(detail) => {
                self.plugin_errors.fetch_add(1, Ordering::Relaxed);
                log::error!("vector grid error: {}", detail);
            }
        }
    }
}

/// Vector tile overlay backed by a plugin-owned [`VectorGrid`]
pub struct VectorTileLayer {
    properties: LayerProperties,
    options: VectorTileLayerOptions,
    resolved: GridOptions,
    grid: Box<dyn VectorGrid>,
    diagnostics: Arc<GridDiagnostics>,
}

impl VectorTileLayer {
    /// Builds the layer through `plugin`.
    ///
    /// Invalid options and plugin failures are returned, never swallowed.
    pub fn create(
        id: impl Into<String>,
        name: impl Into<String>,
        options: VectorTileLayerOptions,
        plugin: &dyn VectorTilePlugin,
    ) -> Result<Self, LayerError> {
        let resolved = options.resolve()?;

        let mut grid = plugin.create_grid(&resolved).map_err(|e| {
            log::error!("error creating vector tile layer for {}: {}", resolved.url, e);
            LayerError::Construction(e)
        })?;

        let diagnostics = Arc::new(GridDiagnostics::default());
        let sink_diagnostics = diagnostics.clone();
        grid.set_event_sink(Arc::new(move |event: &GridEvent| {
            sink_diagnostics.record(event)
        }));

        let mut properties = LayerProperties::new(id, name, LayerType::VectorTile);
        properties.opacity = resolved.opacity;
        properties.z_index = resolved.z_index;
        properties.attribution = Some(resolved.attribution.clone());

        log::info!(
            "vector tile layer `{}` created for {} (zoom {}..={})",
            properties.id,
            resolved.url,
            resolved.min_zoom,
            resolved.max_zoom
        );

        Ok(Self {
            properties,
            options,
            resolved,
            grid,
            diagnostics,
        })
    }

    pub fn options(&self) -> &VectorTileLayerOptions {
        &self.options
    }

    pub fn resolved_options(&self) -> &GridOptions {
        &self.resolved
    }

    pub fn diagnostics(&self) -> &GridDiagnostics {
        &self.diagnostics
    }

    pub fn grid(&self) -> &dyn VectorGrid {
        self.grid.as_ref()
    }

    /// Applies changed options to the live grid without rebuilding it
    pub fn update_options(&mut self, options: VectorTileLayerOptions) -> Result<(), LayerError> {
        let next = options.resolve()?;
        let prev = &self.resolved;

        if next.url != prev.url {
            self.grid.set_url(&next.url);
        }
        if (next.min_zoom, next.max_zoom) != (prev.min_zoom, prev.max_zoom) {
            self.grid.set_zoom_bounds(next.min_zoom, next.max_zoom);
        }
        if next.opacity != prev.opacity {
            self.grid.set_opacity(next.opacity);
        }
        if next.z_index != prev.z_index {
            self.grid.set_z_index(next.z_index);
        }
        if next.styles != prev.styles {
            self.grid.set_styles(&next.styles);
        }
        for (key, value) in &next.extensions {
            if prev.extensions.get(key) != Some(value) {
                self.grid.set_option(key, Some(value));
            }
        }
        for key in prev.extensions.keys() {
            if !next.extensions.contains_key(key) {
                self.grid.set_option(key, None);
            }
        }

        self.properties.opacity = next.opacity;
        self.properties.z_index = next.z_index;
        self.properties.attribution = Some(next.attribution.clone());
        self.resolved = next;
        self.options = options;
        Ok(())
    }

    /// Tiles covering the viewport, empty outside the layer's zoom range
    pub fn visible_tiles(&self, viewport: &Viewport) -> Vec<TileCoord> {
        let zoom = viewport.tile_zoom();
        if zoom < self.resolved.min_zoom || zoom > self.resolved.max_zoom {
            return Vec::new();
        }
        let (min, max) = viewport.tile_range(zoom);
        (min.y..=max.y)
            .flat_map(|y| (min.x..=max.x).map(move |x| TileCoord::new(x, y, zoom)))
            .collect()
    }

    /// Asks the grid for the tiles the viewport needs
    pub fn request_visible_tiles(&mut self, viewport: &Viewport) {
        if !self.properties.visible {
            return;
        }
        let coords = self.visible_tiles(viewport);
        if !coords.is_empty() {
            self.grid.request_tiles(&coords);
        }
    }
}

impl LayerTrait for VectorTileLayer {
    fn id(&self) -> &str {
        &self.properties.id
    }

    fn name(&self) -> &str {
        &self.properties.name
    }

    fn layer_type(&self) -> LayerType {
        self.properties.layer_type
    }

    fn z_index(&self) -> i32 {
        self.properties.z_index
    }

    fn set_z_index(&mut self, z_index: i32) {
        self.properties.z_index = z_index;
        self.resolved.z_index = z_index;
        self.grid.set_z_index(z_index);
    }

    fn opacity(&self) -> f32 {
        self.properties.opacity
    }

    fn set_opacity(&mut self, opacity: f32) {
        let opacity = opacity.clamp(0.0, 1.0);
        self.properties.opacity = opacity;
        self.resolved.opacity = opacity;
        self.grid.set_opacity(opacity);
    }

    fn is_visible(&self) -> bool {
        self.properties.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.properties.visible = visible;
    }

    fn attribution(&self) -> Option<&str> {
        self.properties.attribution.as_deref()
    }

    fn zoom_range(&self) -> (u8, u8) {
        (self.resolved.min_zoom, self.resolved.max_zoom)
    }

    fn update(&mut self) -> crate::Result<()> {
        self.grid.poll();
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
