//! TileJSON metadata as served by the tile service
//!
//! Only the attributes the viewer acts on are typed; everything else in the
//! document is ignored on deserialization.

use crate::core::geo::{LatLng, LatLngBounds};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TileJson {
    /// TileJSON spec version, e.g. `2.2.0`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tilejson: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// `xyz` or `tms`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    /// Tile URL templates; only the first one is used
    #[serde(default)]
    pub tiles: Vec<String>,
    /// `[minLon, minLat, maxLon, maxLat]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Vec<f64>>,
    /// `[lon, lat, zoom]`; the zoom is optional
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minzoom: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxzoom: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribution: Option<String>,
}

impl TileJson {
    pub fn from_slice(bytes: &[u8]) -> crate::Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// The tile template the overlay is built from
    pub fn first_tile(&self) -> Option<&str> {
        self.tiles.first().map(String::as_str)
    }

    /// Attribution text, empty when the document has none
    pub fn attribution_or_default(&self) -> &str {
        self.attribution.as_deref().unwrap_or("")
    }

    /// Bounds to fit the viewport to, with lon/lat swapped into (lat, lng).
    ///
    /// `None` when `bounds` is missing or is not four finite numbers.
    pub fn fit_bounds(&self) -> Option<LatLngBounds> {
        self.bounds
            .as_deref()
            .and_then(LatLngBounds::from_lon_lat_bbox)
    }

    /// Initial center from the first two `center` values, read as (lon, lat).
    ///
    /// Falls back to the middle of [`Self::fit_bounds`], then to (0, 0).
    pub fn initial_center(&self) -> LatLng {
        match self.center.as_deref() {
            Some([lon, lat, ..]) if lon.is_finite() && lat.is_finite() => {
                LatLng::from_lon_lat(*lon, *lat)
            }
            _ => self
                .fit_bounds()
                .map(|bounds| bounds.center())
                .unwrap_or_default(),
        }
    }

    /// Initial zoom, which is the document's `minzoom`
    pub fn initial_zoom(&self) -> f64 {
        self.minzoom.filter(|z| z.is_finite()).unwrap_or(0.0)
    }

    pub fn min_zoom_level(&self) -> Option<u8> {
        self.minzoom.and_then(zoom_level)
    }

    pub fn max_zoom_level(&self) -> Option<u8> {
        self.maxzoom.and_then(zoom_level)
    }

    /// Whether tiles are addressed with TMS rows
    pub fn is_tms(&self) -> bool {
        self.scheme.as_deref() == Some("tms")
    }
}

fn zoom_level(zoom: f64) -> Option<u8> {
    zoom.is_finite().then(|| zoom.round().clamp(0.0, 30.0) as u8)
}

/// Decides whether the tile service delivers vector tiles.
///
/// This sniffs the upstream naming convention instead of reading a declared
/// content type: a template ending in `.pbf` or `.mvt`, or an `.mbtiles`
/// dataset, is treated as vector. Without a template there is nothing to
/// overlay.
pub fn is_vector_source(first_tile: Option<&str>, dataset: &str) -> bool {
    match first_tile {
        Some(template) => {
            template.ends_with(".pbf")
                || template.ends_with(".mvt")
                || dataset.ends_with(".mbtiles")
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "tilejson": "2.2.0",
        "version": "1.0.0",
        "tiles": ["http://x/{z}/{x}/{y}.pbf"],
        "bounds": [-2.2, 6.1, -2.1, 6.2],
        "center": [-2.15, 6.15],
        "minzoom": 6,
        "maxzoom": 14
    }"#;

    #[test]
    fn test_parse_server_document() {
        let doc: TileJson = serde_json::from_str(SAMPLE).unwrap();

        assert_eq!(doc.first_tile(), Some("http://x/{z}/{x}/{y}.pbf"));
        assert_eq!(doc.min_zoom_level(), Some(6));
        assert_eq!(doc.max_zoom_level(), Some(14));
        assert_eq!(doc.attribution_or_default(), "");
        assert_eq!(doc.tilejson.as_deref(), Some("2.2.0"));
    }

    #[test]
    fn test_fit_bounds_swaps_axes() {
        let doc: TileJson = serde_json::from_str(SAMPLE).unwrap();
        let bounds = doc.fit_bounds().unwrap();
        assert_eq!(bounds.to_corner_pairs(), [[6.1, -2.2], [6.2, -2.1]]);
    }

    #[test]
    fn test_invalid_bounds_skip_fit() {
        let doc = TileJson {
            bounds: Some(vec![1.0, 2.0, 3.0]),
            ..Default::default()
        };
        assert!(doc.fit_bounds().is_none());
        assert!(TileJson::default().fit_bounds().is_none());
    }

    #[test]
    fn test_center_reads_lon_lat() {
        let doc: TileJson = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(doc.initial_center(), LatLng::new(6.15, -2.15));
        assert_eq!(doc.initial_zoom(), 6.0);
    }

    #[test]
    fn test_center_with_zoom_component() {
        let doc = TileJson {
            center: Some(vec![10.0, 20.0, 7.0]),
            ..Default::default()
        };
        assert_eq!(doc.initial_center(), LatLng::new(20.0, 10.0));
    }

    #[test]
    fn test_missing_center_falls_back_to_bounds() {
        let doc = TileJson {
            bounds: Some(vec![0.0, 0.0, 10.0, 20.0]),
            ..Default::default()
        };
        assert_eq!(doc.initial_center(), LatLng::new(10.0, 5.0));
    }

    #[test]
    fn test_vector_sniffing() {
        assert!(is_vector_source(Some("http://x/{z}/{x}/{y}.pbf"), "a.tif"));
        assert!(is_vector_source(Some("http://x/{z}/{x}/{y}.mvt"), "a.tif"));
        assert!(is_vector_source(Some("http://x/{z}/{x}/{y}.png"), "a.mbtiles"));
        assert!(!is_vector_source(Some("http://x/{z}/{x}/{y}.png"), "a.tif"));
        assert!(!is_vector_source(None, "a.mbtiles"));
    }
}
