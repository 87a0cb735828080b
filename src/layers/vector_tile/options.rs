use super::style::StyleTable;
use crate::constants::{DEFAULT_VECTOR_MAX_ZOOM, DEFAULT_VECTOR_MIN_ZOOM};
use crate::LayerError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Option names the adapter interprets itself; extensions may not reuse them.
pub const RECOGNIZED_KEYS: [&str; 7] = [
    "url",
    "min_zoom",
    "max_zoom",
    "style_rules",
    "attribution",
    "opacity",
    "z_index",
];

/// Declarative description of a vector tile overlay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorTileLayerOptions {
    pub url: String,
    #[serde(default)]
    pub min_zoom: Option<u8>,
    #[serde(default)]
    pub max_zoom: Option<u8>,
    #[serde(default)]
    pub style_rules: StyleTable,
    #[serde(default)]
    pub attribution: Option<String>,
    #[serde(default = "default_opacity")]
    pub opacity: f32,
    #[serde(default)]
    pub z_index: i32,
    /// Plugin-specific options forwarded untouched
    #[serde(default)]
    pub extensions: BTreeMap<String, Value>,
}

fn default_opacity() -> f32 {
    1.0
}

impl VectorTileLayerOptions {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            min_zoom: None,
            max_zoom: None,
            style_rules: StyleTable::default(),
            attribution: None,
            opacity: 1.0,
            z_index: 0,
            extensions: BTreeMap::new(),
        }
    }

    pub fn with_zoom_bounds(mut self, min_zoom: Option<u8>, max_zoom: Option<u8>) -> Self {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self
    }

    pub fn with_styles(mut self, styles: StyleTable) -> Self {
        self.style_rules = styles;
        self
    }

    pub fn with_attribution(mut self, attribution: impl Into<String>) -> Self {
        self.attribution = Some(attribution.into());
        self
    }

    pub fn with_extension(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extensions.insert(key.into(), value);
        self
    }

    /// Applies zoom defaults and checks the options before construction
    pub fn resolve(&self) -> Result<GridOptions, LayerError> {
        if self.url.trim().is_empty() {
            return Err(LayerError::EmptyUrl);
        }
        if let Some(key) = self
            .extensions
            .keys()
            .find(|key| RECOGNIZED_KEYS.contains(&key.as_str()))
        {
            return Err(LayerError::ReservedOption(key.clone()));
        }

        let min_zoom = self.min_zoom.unwrap_or(DEFAULT_VECTOR_MIN_ZOOM);
        let max_zoom = self.max_zoom.unwrap_or(DEFAULT_VECTOR_MAX_ZOOM);
        if min_zoom > max_zoom {
            return Err(LayerError::InvalidZoomRange {
                min: min_zoom,
                max: max_zoom,
            });
        }

        Ok(GridOptions {
            url: self.url.clone(),
            min_zoom,
            max_zoom,
            styles: self.style_rules.clone(),
            attribution: self.attribution.clone().unwrap_or_default(),
            opacity: self.opacity.clamp(0.0, 1.0),
            z_index: self.z_index,
            extensions: self.extensions.clone(),
        })
    }
}

/// Fully resolved options handed to a [`super::VectorTilePlugin`]
#[derive(Debug, Clone, PartialEq)]
pub struct GridOptions {
    pub url: String,
    pub min_zoom: u8,
    pub max_zoom: u8,
    pub styles: StyleTable,
    pub attribution: String,
    pub opacity: f32,
    pub z_index: i32,
    pub extensions: BTreeMap<String, Value>,
}
