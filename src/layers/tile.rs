//! Native raster tile layer

use crate::{
    constants::OSM_ATTRIBUTION,
    core::{geo::TileCoord, viewport::Viewport},
    layers::base::{LayerProperties, LayerTrait, LayerType},
    tiles::source::{TemplateSource, TileSource},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileLayerOptions {
    pub min_zoom: u8,
    pub max_zoom: u8,
    pub attribution: Option<String>,
    pub opacity: f32,
    pub z_index: i32,
    pub subdomains: Vec<String>,
    /// Rows are numbered from the south (TMS) instead of the north
    pub tms: bool,
}

impl Default for TileLayerOptions {
    fn default() -> Self {
        Self {
            min_zoom: 0,
            max_zoom: 18,
            attribution: None,
            opacity: 1.0,
            z_index: 1,
            subdomains: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            tms: false,
        }
    }
}

/// A tile the layer wants drawn in the current view
#[derive(Debug, Clone, PartialEq)]
pub struct TileRequest {
    pub coord: TileCoord,
    pub url: String,
}

pub struct TileLayer {
    properties: LayerProperties,
    options: TileLayerOptions,
    source: TemplateSource,
}

impl TileLayer {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        url_template: impl Into<String>,
        options: TileLayerOptions,
    ) -> Self {
        let mut properties = LayerProperties::new(id, name, LayerType::Tile);
        properties.z_index = options.z_index;
        properties.opacity = options.opacity;
        properties.attribution = options.attribution.clone();

        let source = TemplateSource::new(url_template)
            .with_subdomains(options.subdomains.clone())
            .with_tms(options.tms);

        Self {
            properties,
            options,
            source,
        }
    }

    /// The public OpenStreetMap basemap
    pub fn openstreetmap(id: impl Into<String>, name: impl Into<String>) -> Self {
        let options = TileLayerOptions {
            max_zoom: 19,
            attribution: Some(OSM_ATTRIBUTION.to_string()),
            ..Default::default()
        };
        let source = TemplateSource::openstreetmap();
        let template = source.template().to_string();
        Self::new(id, name, template, options)
    }

    pub fn options(&self) -> &TileLayerOptions {
        &self.options
    }

    pub fn source(&self) -> &TemplateSource {
        &self.source
    }

    pub fn url_template(&self) -> &str {
        self.source.template()
    }

    pub fn is_tms(&self) -> bool {
        self.options.tms
    }

    /// Whether the layer draws anything at `zoom`
    pub fn covers_zoom(&self, zoom: u8) -> bool {
        (self.options.min_zoom..=self.options.max_zoom).contains(&zoom)
    }

    /// Tiles needed to cover the viewport, empty outside the zoom range
    pub fn visible_tiles(&self, viewport: &Viewport) -> Vec<TileRequest> {
        let zoom = viewport.tile_zoom();
        if !self.covers_zoom(zoom) {
            return Vec::new();
        }

        let (min, max) = viewport.tile_range(zoom);
        let mut tiles = Vec::with_capacity(((max.x - min.x + 1) * (max.y - min.y + 1)) as usize);
        for y in min.y..=max.y {
            for x in min.x..=max.x {
                let coord = TileCoord::new(x, y, zoom);
                tiles.push(TileRequest {
                    coord,
                    url: self.source.url(coord),
                });
            }
        }
        tiles
    }
}

impl LayerTrait for TileLayer {
    crate::impl_layer_trait!(properties);

    fn zoom_range(&self) -> (u8, u8) {
        (self.options.min_zoom, self.options.max_zoom)
    }
}
