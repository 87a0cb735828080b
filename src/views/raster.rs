//! Statically configured raster view
//!
//! No metadata is fetched: the map is centered on the drone capture area and
//! offers the public basemap and the locally served TMS layer as mutually
//! exclusive base layers.

use crate::{
    constants::{RASTER_CENTER, RASTER_ZOOM},
    core::{config::ViewerConfig, geo::LatLng, geo::Point, map::Map},
    layers::{
        control::{ControlPosition, ScaleControl},
        tile::{TileLayer, TileLayerOptions},
    },
    Result,
};

pub const OSM_LAYER_ID: &str = "osm";
pub const DRONE_LAYER_ID: &str = "drone";

pub struct RasterMapView {
    map: Map,
}

impl RasterMapView {
    pub fn new(config: &ViewerConfig) -> Result<Self> {
        Self::with_size(config, Point::new(800.0, 600.0))
    }

    pub fn with_size(config: &ViewerConfig, size: Point) -> Result<Self> {
        let (lat, lng) = RASTER_CENTER;
        let raster = &config.raster;

        let mut map = Map::new(LatLng::new(lat, lng), RASTER_ZOOM, size)
            .with_layers_control(ControlPosition::TopRight)
            .with_scale_control(ScaleControl::new(ControlPosition::BottomLeft));

        map.add_base_layer(
            Box::new(TileLayer::openstreetmap(OSM_LAYER_ID, "OpenStreetMap")),
            false,
        )?;

        let drone = TileLayer::new(
            DRONE_LAYER_ID,
            raster.name.clone(),
            config.raster_tile_template(),
            TileLayerOptions {
                min_zoom: raster.min_zoom,
                max_zoom: raster.max_zoom,
                tms: raster.tms,
                subdomains: Vec::new(),
                ..Default::default()
            },
        );
        map.add_base_layer(Box::new(drone), true)?;

        log::info!(
            "raster view ready with `{}` from {}",
            raster.name,
            config.raster_tile_template()
        );
        Ok(Self { map })
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut Map {
        &mut self.map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::base::LayerTrait;

    #[test]
    fn test_default_layers() {
        let view = RasterMapView::new(&ViewerConfig::default()).unwrap();
        let map = view.map();

        assert_eq!(map.layers_control().active_base(), Some(DRONE_LAYER_ID));
        assert_eq!(
            map.layers_control().base_layers(),
            &[OSM_LAYER_ID.to_string(), DRONE_LAYER_ID.to_string()]
        );

        let drone = map.get_layer_as::<TileLayer>(DRONE_LAYER_ID).unwrap();
        assert_eq!(drone.name(), "May Drone Capture");
        assert_eq!(
            drone.url_template(),
            "http://127.0.0.1:8000/tileserver/raster-tiles/{z}/{x}/{y}.png"
        );
        assert!(drone.is_tms());
        assert_eq!(drone.zoom_range(), (3, 19));
    }

    #[test]
    fn test_initial_view_and_controls() {
        let view = RasterMapView::new(&ViewerConfig::default()).unwrap();
        let map = view.map();

        assert_eq!(map.viewport.zoom, 17.0);
        assert_eq!(
            map.viewport.center,
            LatLng::new(6.134511889744518, -2.187651559183602)
        );
        assert_eq!(map.layers_control().position(), ControlPosition::TopRight);
        assert_eq!(
            map.scale_control().map(|c| c.position),
            Some(ControlPosition::BottomLeft)
        );
    }

    #[test]
    fn test_switching_base_layers() {
        let mut view = RasterMapView::new(&ViewerConfig::default()).unwrap();
        view.map_mut().select_base_layer(OSM_LAYER_ID).unwrap();

        let active: Vec<&str> = view.map().active_layers().iter().map(|l| l.id()).collect();
        assert_eq!(active, vec![OSM_LAYER_ID]);
    }
}
