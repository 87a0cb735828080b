//! Collaborator doubles shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tmsview::{
    layers::vector_tile::{EventSink, GridOptions, StyleTable, VectorGrid, VectorTilePlugin},
    MapError, Result, TileCoord, TileJson, TileJsonClient,
};

pub const SCENARIO: &str = r#"{
    "tilejson": "2.2.0",
    "tiles": ["http://x/{z}/{x}/{y}.pbf"],
    "bounds": [-2.2, 6.1, -2.1, 6.2],
    "center": [-2.15, 6.15],
    "minzoom": 6,
    "maxzoom": 14
}"#;

/// Routes library log records to the test harness; `RUST_LOG` picks the level
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Answers every request with a fixed body or status, counting calls
pub struct StubClient {
    response: std::result::Result<String, u16>,
    pub requests: Mutex<Vec<String>>,
}

impl StubClient {
    pub fn ok(body: &str) -> Arc<Self> {
        Arc::new(Self {
            response: Ok(body.to_string()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn status(code: u16) -> Arc<Self> {
        Arc::new(Self {
            response: Err(code),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl TileJsonClient for StubClient {
    async fn fetch_tilejson(&self, url: &str) -> Result<TileJson> {
        self.requests.lock().unwrap().push(url.to_string());
        match &self.response {
            Ok(body) => TileJson::from_slice(body.as_bytes()),
            Err(code) => Err(MapError::HttpStatus(*code)),
        }
    }
}

/// Sets `dropped` when the future holding it is torn down
pub struct DropFlag(pub Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

/// Never answers before `delay`; records whether its future was dropped
/// early and whether it ran to completion
pub struct SlowClient {
    pub delay: Duration,
    pub dropped: Arc<AtomicBool>,
    pub completed: Arc<AtomicBool>,
}

impl SlowClient {
    pub fn new(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay,
            dropped: Arc::new(AtomicBool::new(false)),
            completed: Arc::new(AtomicBool::new(false)),
        })
    }
}

#[async_trait]
impl TileJsonClient for SlowClient {
    async fn fetch_tilejson(&self, _url: &str) -> Result<TileJson> {
        let _guard = DropFlag(self.dropped.clone());
        tokio::time::sleep(self.delay).await;
        self.completed.store(true, Ordering::SeqCst);
        TileJson::from_slice(SCENARIO.as_bytes())
    }
}

/// Grid that accepts everything and draws nothing
pub struct NullGrid;

impl VectorGrid for NullGrid {
    fn set_event_sink(&mut self, _sink: EventSink) {}
    fn set_url(&mut self, _url: &str) {}
    fn set_zoom_bounds(&mut self, _min_zoom: u8, _max_zoom: u8) {}
    fn set_opacity(&mut self, _opacity: f32) {}
    fn set_z_index(&mut self, _z_index: i32) {}
    fn set_styles(&mut self, _styles: &StyleTable) {}
    fn set_option(&mut self, _key: &str, _value: Option<&serde_json::Value>) {}
    fn request_tiles(&mut self, _coords: &[TileCoord]) {}
}

/// Records every construction request
#[derive(Default)]
pub struct RecordingPlugin {
    pub created: Mutex<Vec<GridOptions>>,
    pub attempts: AtomicUsize,
    pub fail_with: Option<String>,
}

impl RecordingPlugin {
    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            fail_with: Some(message.to_string()),
            ..Default::default()
        })
    }

    pub fn created(&self) -> Vec<GridOptions> {
        self.created.lock().unwrap().clone()
    }
}

impl VectorTilePlugin for RecordingPlugin {
    fn create_grid(
        &self,
        options: &GridOptions,
    ) -> std::result::Result<Box<dyn VectorGrid>, String> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.fail_with {
            return Err(message.clone());
        }
        self.created.lock().unwrap().push(options.clone());
        Ok(Box::new(NullGrid))
    }
}
