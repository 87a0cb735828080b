//! Engine-wide defaults: Leaflet conventions plus the endpoints of the
//! tile service the viewer talks to.

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// Hard zoom limits of the viewport.
pub const MIN_ZOOM: f64 = 0.0;
pub const MAX_ZOOM: f64 = 19.0;

/// Base URL of the tile service when none is configured.
pub const DEFAULT_TILE_SERVICE_BASE: &str = "http://127.0.0.1:8000";

/// Dataset served by the vector view when none is configured.
pub const DEFAULT_VECTOR_DATASET: &str = "merged_boundary.mbtiles";

/// Source layer of the default dataset that ships with a style binding.
pub const DEFAULT_STYLED_LAYER: &str = "tmp4957sosh";

/// Zoom bounds applied to a vector overlay that does not declare its own.
pub const DEFAULT_VECTOR_MIN_ZOOM: u8 = 6;
pub const DEFAULT_VECTOR_MAX_ZOOM: u8 = 18;

/// Public OpenStreetMap basemap.
pub const OSM_TILE_TEMPLATE: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const OSM_ATTRIBUTION: &str = "© OpenStreetMap contributors";
pub const OSM_SUBDOMAINS: [&str; 3] = ["a", "b", "c"];

/// Raster view defaults (drone capture area).
pub const RASTER_CENTER: (f64, f64) = (6.134511889744518, -2.187651559183602);
pub const RASTER_ZOOM: f64 = 17.0;
pub const RASTER_MIN_ZOOM: u8 = 3;
pub const RASTER_MAX_ZOOM: u8 = 19;

/// Widest the scale bar may be drawn, in pixels.
pub const SCALE_MAX_WIDTH: f64 = 100.0;
