//! Default vector tile plugin
//!
//! Downloads tile bytes so the overlay reports real load and error events,
//! and keeps the raw payloads for a renderer to decode. Decoding itself is
//! not done here.

use super::adapter::{EventSink, GridEvent, VectorGrid, VectorTilePlugin};
use super::options::GridOptions;
use super::style::StyleTable;
use crate::core::geo::TileCoord;
use crate::tiles::loader::TileLoader;
use crate::tiles::source::{TemplateSource, TileSource};
use fxhash::{FxHashMap, FxHashSet};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Builds [`RemoteVectorGrid`]s
#[derive(Debug, Default, Clone, Copy)]
pub struct RemoteVectorGridPlugin;

impl VectorTilePlugin for RemoteVectorGridPlugin {
    fn create_grid(&self, options: &GridOptions) -> Result<Box<dyn VectorGrid>, String> {
        if !options.url.contains("{z}") || !options.url.contains("{x}") {
            return Err(format!("`{}` is not a z/x/y tile template", options.url));
        }
        Ok(Box::new(RemoteVectorGrid::new(options)))
    }
}

pub struct RemoteVectorGrid {
    source: TemplateSource,
    min_zoom: u8,
    max_zoom: u8,
    opacity: f32,
    z_index: i32,
    styles: StyleTable,
    options: BTreeMap<String, Value>,
    loader: TileLoader,
    pending: FxHashSet<TileCoord>,
    ready: FxHashMap<TileCoord, Arc<Vec<u8>>>,
    failed: FxHashSet<TileCoord>,
    sink: Option<EventSink>,
}

impl RemoteVectorGrid {
    pub fn new(options: &GridOptions) -> Self {
        Self {
            source: TemplateSource::new(options.url.clone()),
            min_zoom: options.min_zoom,
            max_zoom: options.max_zoom,
            opacity: options.opacity,
            z_index: options.z_index,
            styles: options.styles.clone(),
            options: options.extensions.clone(),
            loader: TileLoader::new(),
            pending: FxHashSet::default(),
            ready: FxHashMap::default(),
            failed: FxHashSet::default(),
            sink: None,
        }
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn z_index(&self) -> i32 {
        self.z_index
    }

    /// Styles a renderer should apply when drawing the payloads
    pub fn styles(&self) -> &StyleTable {
        &self.styles
    }

    pub fn option(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// Raw payload of a downloaded tile
    pub fn tile_bytes(&self, coord: &TileCoord) -> Option<Arc<Vec<u8>>> {
        self.ready.get(coord).cloned()
    }

    fn emit(&self, event: GridEvent) {
        if let Some(sink) = &self.sink {
            sink(&event);
        }
    }

    fn reset(&mut self) {
        self.pending.clear();
        self.ready.clear();
        self.failed.clear();
        // Results still in flight belong to the old configuration
        self.loader = TileLoader::new();
    }
}

impl VectorGrid for RemoteVectorGrid {
    fn set_event_sink(&mut self, sink: EventSink) {
        self.sink = Some(sink);
    }

    fn set_url(&mut self, url: &str) {
        self.source = TemplateSource::new(url);
        self.reset();
    }

    fn set_zoom_bounds(&mut self, min_zoom: u8, max_zoom: u8) {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        let range = min_zoom..=max_zoom;
        self.ready.retain(|coord, _| range.contains(&coord.z));
    }

    fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity;
    }

    fn set_z_index(&mut self, z_index: i32) {
        self.z_index = z_index;
    }

    fn set_styles(&mut self, styles: &StyleTable) {
        self.styles = styles.clone();
    }

    fn set_option(&mut self, key: &str, value: Option<&Value>) {
        match value {
            Some(value) => {
                self.options.insert(key.to_string(), value.clone());
            }
            None => {
                self.options.remove(key);
            }
        }
    }

    /// `coords` is the full set the view needs; payloads and failures outside
    /// it are dropped, so a failed tile is retried once it comes back into view
    fn request_tiles(&mut self, coords: &[TileCoord]) {
        let wanted: FxHashSet<TileCoord> = coords.iter().copied().collect();
        self.ready.retain(|coord, _| wanted.contains(coord));
        self.failed.retain(|coord| wanted.contains(coord));
        self.pending.retain(|coord| wanted.contains(coord));

        for coord in coords {
            if !(self.min_zoom..=self.max_zoom).contains(&coord.z) || !coord.is_valid() {
                continue;
            }
            if self.ready.contains_key(coord)
                || self.pending.contains(coord)
                || self.failed.contains(coord)
            {
                continue;
            }
            self.pending.insert(*coord);
            self.loader.start_download(*coord, self.source.url(*coord));
        }
    }

    fn poll(&mut self) {
        for result in self.loader.drain() {
            if !self.pending.remove(&result.coord) {
                continue;
            }
            match result.data {
                Ok(bytes) => {
                    self.ready.insert(result.coord, Arc::new(bytes));
                    self.emit(GridEvent::TileLoad(result.coord));
                }
                Err(detail) => {
                    self.failed.insert(result.coord);
                    self.emit(GridEvent::TileError {
                        coord: result.coord,
                        detail,
                    });
                }
            }
        }
    }

    fn ready_tiles(&self) -> Vec<TileCoord> {
        self.ready.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::vector_tile::{StyleRule, VectorTileLayerOptions};
    use serde_json::json;

    fn grid_options(url: &str) -> GridOptions {
        VectorTileLayerOptions::new(url)
            .with_extension("buffer", json!(32))
            .resolve()
            .unwrap()
    }

    #[test]
    fn test_rejects_non_tile_template() {
        let plugin = RemoteVectorGridPlugin;
        assert!(plugin
            .create_grid(&grid_options("http://x/metadata.json"))
            .is_err());
        assert!(plugin
            .create_grid(&grid_options("http://x/{z}/{x}/{y}.pbf"))
            .is_ok());
    }

    #[test]
    fn test_options_are_tracked() {
        let mut grid = RemoteVectorGrid::new(&grid_options("http://x/{z}/{x}/{y}.pbf"));
        assert_eq!(grid.option("buffer"), Some(&json!(32)));

        grid.set_option("buffer", None);
        grid.set_option("interactive", Some(&json!(true)));
        grid.set_opacity(0.4);
        grid.set_styles(&StyleTable::new().with_fallback(StyleRule::default()));

        assert!(grid.option("buffer").is_none());
        assert_eq!(grid.styles().fallback, Some(StyleRule::default()));
        assert_eq!(grid.option("interactive"), Some(&json!(true)));
        assert_eq!(grid.opacity(), 0.4);
    }

    #[test]
    fn test_panning_keeps_only_current_tiles() {
        let mut grid = RemoteVectorGrid::new(&grid_options("http://x/{z}/{x}/{y}.pbf"));
        for x in 0..64 {
            let coord = TileCoord::new(x, 10, 10);
            // already downloaded, so no request goes out
            grid.ready.insert(coord, Arc::new(vec![1, 2, 3]));
            grid.request_tiles(&[coord]);
        }

        assert_eq!(grid.ready_tiles(), vec![TileCoord::new(63, 10, 10)]);
        assert!(grid.pending.is_empty());
    }

    #[test]
    fn test_failed_tile_forgotten_once_out_of_view() {
        let mut grid = RemoteVectorGrid::new(&grid_options("http://x/{z}/{x}/{y}.pbf"));
        let failed = TileCoord::new(1, 1, 10);
        let other = TileCoord::new(2, 1, 10);
        grid.failed.insert(failed);

        grid.request_tiles(&[failed]);
        assert!(grid.failed.contains(&failed));
        assert!(grid.pending.is_empty());

        grid.ready.insert(other, Arc::new(Vec::new()));
        grid.request_tiles(&[other]);
        assert!(grid.failed.is_empty());
    }

    #[test]
    fn test_out_of_range_requests_are_ignored() {
        let mut grid = RemoteVectorGrid::new(&grid_options("http://x/{z}/{x}/{y}.pbf"));
        grid.request_tiles(&[TileCoord::new(0, 0, 2), TileCoord::new(9, 0, 2)]);
        assert!(grid.pending.is_empty());
        assert!(grid.ready_tiles().is_empty());
    }
}
