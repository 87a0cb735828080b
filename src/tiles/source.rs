use crate::constants::{OSM_SUBDOMAINS, OSM_TILE_TEMPLATE};
use crate::core::geo::TileCoord;

/// Trait representing anything that can produce tile URLs for a given coordinate.
pub trait TileSource: Send + Sync {
    /// Build a URL for the requested `coord`.
    fn url(&self, coord: TileCoord) -> String;
}

/// Leaflet-style URL template.
///
/// Recognized placeholders are `{s}` (subdomain), `{z}`, `{x}`, `{y}` and
/// `{-y}`. With `tms` set, `{y}` receives the TMS row (`2^z - 1 - y`);
/// `{-y}` always does.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateSource {
    template: String,
    subdomains: Vec<String>,
    tms: bool,
}

impl TemplateSource {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            subdomains: Vec::new(),
            tms: false,
        }
    }

    /// The public OpenStreetMap basemap
    pub fn openstreetmap() -> Self {
        Self::new(OSM_TILE_TEMPLATE).with_subdomains(OSM_SUBDOMAINS)
    }

    pub fn with_subdomains<I, S>(mut self, subdomains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subdomains = subdomains.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tms(mut self, tms: bool) -> Self {
        self.tms = tms;
        self
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn is_tms(&self) -> bool {
        self.tms
    }

    fn subdomain(&self, coord: TileCoord) -> &str {
        if self.subdomains.is_empty() {
            return "";
        }
        let idx = ((coord.x as u64 + coord.y as u64) % self.subdomains.len() as u64) as usize;
        &self.subdomains[idx]
    }
}

impl TileSource for TemplateSource {
    fn url(&self, coord: TileCoord) -> String {
        let y = if self.tms { coord.tms_y() } else { coord.y };

        self.template
            .replace("{s}", self.subdomain(coord))
            .replace("{z}", &coord.z.to_string())
            .replace("{x}", &coord.x.to_string())
            .replace("{-y}", &coord.tms_y().to_string())
            .replace("{y}", &y.to_string())
    }
}
