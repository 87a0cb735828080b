//! Viewer configuration
//!
//! Everything that was a compile-time constant in earlier builds of the
//! viewer (tile service host, dataset name, request flags, overlay styles)
//! lives here. A configuration is resolved from defaults, then an optional
//! JSON file, then environment overrides.

use crate::{
    constants::{
        DEFAULT_STYLED_LAYER, DEFAULT_TILE_SERVICE_BASE, DEFAULT_VECTOR_DATASET, RASTER_MAX_ZOOM,
        RASTER_MIN_ZOOM,
    },
    layers::vector_tile::{StyleRule, StyleTable},
    MapError, Result,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Path of a JSON configuration file
pub const CONFIG_PATH_ENV: &str = "TMSVIEW_CONFIG";
/// Overrides [`ViewerConfig::tile_service_base`]
pub const TILE_SERVICE_ENV: &str = "TMSVIEW_TILE_SERVICE";
/// Overrides [`ViewerConfig::vector_dataset`]
pub const DATASET_ENV: &str = "TMSVIEW_DATASET";

/// Flags applied to the TileJSON request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchOptions {
    /// Send cookies with the request and keep the ones the server sets
    pub include_credentials: bool,
    /// Send `Content-Type: application/json` on the (bodyless) GET
    pub json_content_type: bool,
    /// Request timeout; `None` leaves it to the transport
    pub timeout_ms: Option<u64>,
}

impl FetchOptions {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            include_credentials: true,
            json_content_type: false,
            timeout_ms: None,
        }
    }
}

/// Settings of the locally served raster layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterLayerConfig {
    pub name: String,
    /// Path below the tile service base, with `{z}/{x}/{y}` placeholders
    pub path_template: String,
    pub tms: bool,
    pub min_zoom: u8,
    pub max_zoom: u8,
}

impl Default for RasterLayerConfig {
    fn default() -> Self {
        Self {
            name: "May Drone Capture".to_string(),
            path_template: "/tileserver/raster-tiles/{z}/{x}/{y}.png".to_string(),
            tms: true,
            min_zoom: RASTER_MIN_ZOOM,
            max_zoom: RASTER_MAX_ZOOM,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Scheme and host of the tile service, e.g. `http://127.0.0.1:8000`
    pub tile_service_base: String,
    /// Dataset file name served by the tile service
    pub vector_dataset: String,
    pub fetch: FetchOptions,
    pub raster: RasterLayerConfig,
    /// Per source-layer styles of the vector overlay
    pub vector_styles: StyleTable,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            tile_service_base: DEFAULT_TILE_SERVICE_BASE.to_string(),
            vector_dataset: DEFAULT_VECTOR_DATASET.to_string(),
            fetch: FetchOptions::default(),
            raster: RasterLayerConfig::default(),
            vector_styles: StyleTable::new()
                .with_rule(DEFAULT_STYLED_LAYER, StyleRule::default()),
        }
    }
}

impl ViewerConfig {
    /// Parses a configuration from JSON; missing keys take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        log::info!("loaded viewer configuration from {}", path.display());
        Self::from_json(&json)
    }

    /// Resolves defaults, the file named by `TMSVIEW_CONFIG`, then the
    /// `TMSVIEW_TILE_SERVICE` / `TMSVIEW_DATASET` overrides
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_json_file(path)?,
            Err(_) => Self::default(),
        };

        if let Ok(base) = std::env::var(TILE_SERVICE_ENV) {
            config.tile_service_base = base;
        }
        if let Ok(dataset) = std::env::var(DATASET_ENV) {
            config.vector_dataset = dataset;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let base = self.tile_service_base.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(MapError::Config(format!(
                "tile service base must be an http(s) URL, got `{}`",
                self.tile_service_base
            )));
        }
        if self.vector_dataset.is_empty() || self.vector_dataset.contains('/') {
            return Err(MapError::Config(format!(
                "invalid dataset name `{}`",
                self.vector_dataset
            )));
        }
        if self.raster.min_zoom > self.raster.max_zoom {
            return Err(MapError::Config(format!(
                "raster zoom range {}..{} is empty",
                self.raster.min_zoom, self.raster.max_zoom
            )));
        }
        Ok(())
    }

    fn base(&self) -> &str {
        self.tile_service_base.trim().trim_end_matches('/')
    }

    /// `{base}/tileserver/{dataset}/vector-tiles`
    pub fn tilejson_url(&self) -> String {
        format!("{}/tileserver/{}/vector-tiles", self.base(), self.vector_dataset)
    }

    /// Full tile template of the local raster layer
    pub fn raster_tile_template(&self) -> String {
        format!("{}{}", self.base(), self.raster.path_template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoints() {
        let config = ViewerConfig::default();
        assert_eq!(
            config.tilejson_url(),
            "http://127.0.0.1:8000/tileserver/merged_boundary.mbtiles/vector-tiles"
        );
        assert_eq!(
            config.raster_tile_template(),
            "http://127.0.0.1:8000/tileserver/raster-tiles/{z}/{x}/{y}.png"
        );
    }

    #[test]
    fn test_default_styles_bind_one_layer() {
        let styles = ViewerConfig::default().vector_styles;
        assert_eq!(styles.rules.len(), 1);

        let rule = styles.rule_for(DEFAULT_STYLED_LAYER).unwrap();
        assert_eq!(rule.weight, 1.0);
        assert_eq!(rule.color, "#3388ff");
        assert!(rule.fill);
        assert_eq!(rule.fill_opacity, 0.2);
        // other source layers keep the plugin's own style
        assert!(styles.rule_for("roads").is_none());
    }

    #[test]
    fn test_trailing_slash_in_base() {
        let config = ViewerConfig {
            tile_service_base: "https://tiles.example.org/".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.tilejson_url(),
            "https://tiles.example.org/tileserver/merged_boundary.mbtiles/vector-tiles"
        );
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ViewerConfig::from_json(
            r#"{"vector_dataset": "roads.mbtiles", "fetch": {"timeout_ms": 2500}}"#,
        )
        .unwrap();

        assert_eq!(config.vector_dataset, "roads.mbtiles");
        assert_eq!(config.fetch.timeout(), Some(Duration::from_millis(2500)));
        assert!(config.fetch.include_credentials);
        assert!(!config.fetch.json_content_type);
        assert_eq!(config.raster.min_zoom, 3);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        assert!(matches!(
            ViewerConfig::from_json(r#"{"tile_service_base": "ftp://x"}"#),
            Err(MapError::Config(_))
        ));
        assert!(matches!(
            ViewerConfig::from_json(r#"{"vector_dataset": "../etc/passwd"}"#),
            Err(MapError::Config(_))
        ));
        assert!(matches!(
            ViewerConfig::from_json(r#"{"raster": {"min_zoom": 12, "max_zoom": 4}}"#),
            Err(MapError::Config(_))
        ));
    }
}
