use crate::constants::{MAX_ZOOM, MIN_ZOOM, TILE_SIZE};
use crate::core::geo::{LatLng, LatLngBounds, Point, TileCoord, EARTH_RADIUS, MAX_LATITUDE};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Manages the current view of the map: center, zoom, and screen dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// The center of the map view in geographical coordinates
    pub center: LatLng,
    /// The current zoom level
    pub zoom: f64,
    /// The size of the viewport in pixels
    pub size: Point,
    /// The minimum allowed zoom level
    pub min_zoom: f64,
    /// The maximum allowed zoom level
    pub max_zoom: f64,
}

impl Viewport {
    /// Creates a new viewport
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        let mut viewport = Self {
            center,
            zoom: 0.0,
            size,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
        };
        viewport.set_center(center);
        viewport.set_zoom(zoom);
        viewport
    }

    /// Sets the center of the viewport, clamped to the Mercator square
    pub fn set_center(&mut self, center: LatLng) {
        self.center = LatLng::new(
            center.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE),
            center.lng.clamp(-180.0, 180.0),
        );
    }

    /// Sets the zoom level, clamping to valid range
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = if zoom.is_finite() {
            zoom.clamp(self.min_zoom, self.max_zoom)
        } else {
            self.min_zoom
        };
    }

    pub fn set_size(&mut self, size: Point) {
        self.size = size;
    }

    /// Sets the zoom limits
    pub fn set_zoom_limits(&mut self, min_zoom: f64, max_zoom: f64) {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom.max(min_zoom);
        self.zoom = self.zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Gets the scale factor for the current zoom level
    pub fn scale(&self) -> f64 {
        2_f64.powf(self.zoom)
    }

    /// Zoom rounded to the tile pyramid level used for fetching
    pub fn tile_zoom(&self) -> u8 {
        self.zoom.round().clamp(0.0, 30.0) as u8
    }

    /// Projects a LatLng to world pixel coordinates (EPSG:3857)
    pub fn project(&self, lat_lng: &LatLng, zoom: Option<f64>) -> Point {
        let z = zoom.unwrap_or(self.zoom);
        let scale = TILE_SIZE as f64 * 2_f64.powf(z);

        let lat = LatLng::clamp_lat(lat_lng.lat);
        let x = lat_lng.lng.to_radians() * EARTH_RADIUS;
        let y = (PI / 4.0 + lat.to_radians() / 2.0).tan().ln() * EARTH_RADIUS;

        let half_world = PI * EARTH_RADIUS;
        Point::new(
            (x + half_world) / (2.0 * half_world) * scale,
            (half_world - y) / (2.0 * half_world) * scale,
        )
    }

    /// Unprojects world pixel coordinates back to LatLng
    pub fn unproject(&self, pixel: &Point, zoom: Option<f64>) -> LatLng {
        let z = zoom.unwrap_or(self.zoom);
        let scale = TILE_SIZE as f64 * 2_f64.powf(z);

        let half_world = PI * EARTH_RADIUS;
        let x = pixel.x / scale * (2.0 * half_world) - half_world;
        let y = half_world - pixel.y / scale * (2.0 * half_world);

        let lng = (x / EARTH_RADIUS).to_degrees();
        let lat = (2.0 * (y / EARTH_RADIUS).exp().atan() - PI / 2.0).to_degrees();

        LatLng::new(lat, lng)
    }

    /// Converts a geographical coordinate to container pixel coordinates
    pub fn lat_lng_to_pixel(&self, lat_lng: &LatLng) -> Point {
        let origin = self.pixel_origin();
        self.project(lat_lng, None).subtract(&origin)
    }

    /// Converts container pixel coordinates back to a geographical coordinate
    pub fn pixel_to_lat_lng(&self, pixel: &Point) -> LatLng {
        let origin = self.pixel_origin();
        self.unproject(&pixel.add(&origin), None)
    }

    /// World pixel of the container's top-left corner
    fn pixel_origin(&self) -> Point {
        self.project(&self.center, None)
            .subtract(&self.size.multiply(0.5))
    }

    /// Gets the current viewport bounds in geographical coordinates
    pub fn bounds(&self) -> LatLngBounds {
        let nw = self.pixel_to_lat_lng(&Point::new(0.0, 0.0));
        let se = self.pixel_to_lat_lng(&self.size);

        LatLngBounds::new(LatLng::new(se.lat, nw.lng), LatLng::new(nw.lat, se.lng))
    }

    /// Tile range `(min, max)` covering the container at pyramid level `zoom`
    pub fn tile_range(&self, zoom: u8) -> (TileCoord, TileCoord) {
        let z = zoom as f64;
        let center = self.project(&self.center, Some(z));
        let half = self.size.multiply(0.5 * 2_f64.powf(z - self.zoom));
        let tile = TILE_SIZE as f64;
        let last = TileCoord::tiles_per_axis(zoom) as f64 - 1.0;

        let to_index = |v: f64| (v / tile).floor().clamp(0.0, last) as u32;

        (
            TileCoord::new(to_index(center.x - half.x), to_index(center.y - half.y), zoom),
            TileCoord::new(to_index(center.x + half.x), to_index(center.y + half.y), zoom),
        )
    }

    /// Container pixel rectangle `(top_left, bottom_right)` of a tile drawn
    /// at the current (possibly fractional) zoom
    pub fn tile_pixel_bounds(&self, coord: &TileCoord) -> (Point, Point) {
        let size = TILE_SIZE as f64 * 2_f64.powf(self.zoom - coord.z as f64);
        let top_left = Point::new(coord.x as f64 * size, coord.y as f64 * size)
            .subtract(&self.pixel_origin());
        (top_left, top_left.add(&Point::new(size, size)))
    }

    /// Pans the viewport by the given container pixel offset
    pub fn pan(&mut self, delta: Point) {
        let center_px = self.project(&self.center, None);
        let target = self.unproject(&center_px.add(&delta), None);
        self.set_center(target);
    }

    /// Zooms to `zoom`, keeping the geographic point under `focus` fixed
    pub fn zoom_to(&mut self, zoom: f64, focus: Option<Point>) {
        let new_zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() < 0.001 {
            return;
        }

        match focus {
            Some(focus) => {
                let anchor = self.pixel_to_lat_lng(&focus);
                self.zoom = new_zoom;
                let moved = self.lat_lng_to_pixel(&anchor);
                self.pan(moved.subtract(&focus));
            }
            None => self.zoom = new_zoom,
        }
    }

    /// Fits the viewport to contain the given bounds
    pub fn fit_bounds(&mut self, bounds: &LatLngBounds, padding: Option<f64>) {
        let padding = padding.unwrap_or(0.0);
        let available = Point::new(
            (self.size.x - 2.0 * padding).max(1.0),
            (self.size.y - 2.0 * padding).max(1.0),
        );

        self.set_center(bounds.center());

        // Highest integer zoom at which the bounds still fit
        let mut best_zoom = self.min_zoom;
        for test_zoom in (self.min_zoom.ceil() as i32)..=(self.max_zoom.floor() as i32) {
            let zoom = test_zoom as f64;
            let nw = self.project(&bounds.north_west(), Some(zoom));
            let se = self.project(&bounds.south_east(), Some(zoom));

            if (se.x - nw.x).abs() <= available.x && (se.y - nw.y).abs() <= available.y {
                best_zoom = zoom;
            } else {
                break;
            }
        }

        self.set_zoom(best_zoom);
    }

    /// Ground resolution in metres per pixel at the center latitude
    pub fn resolution(&self) -> f64 {
        let circumference = 2.0 * PI * EARTH_RADIUS;
        circumference * self.center.lat.to_radians().cos() / (TILE_SIZE as f64 * self.scale())
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(LatLng::new(0.0, 0.0), 0.0, Point::new(800.0, 600.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_creation() {
        let viewport = Viewport::new(
            LatLng::new(40.7128, -74.0060),
            10.0,
            Point::new(800.0, 600.0),
        );

        assert_eq!(viewport.zoom, 10.0);
        assert_eq!(viewport.center.lat, 40.7128);
        assert_eq!(viewport.size.x, 800.0);
    }

    #[test]
    fn test_coordinate_conversion() {
        let viewport = Viewport::new(LatLng::new(0.0, 0.0), 1.0, Point::new(512.0, 512.0));

        let center = viewport.pixel_to_lat_lng(&Point::new(256.0, 256.0));
        assert!(center.lat.abs() < 0.01);
        assert!(center.lng.abs() < 0.01);
    }

    #[test]
    fn test_tile_pixel_bounds() {
        // z1 over 512px: the four tiles fill the container exactly
        let viewport = Viewport::new(LatLng::new(0.0, 0.0), 1.0, Point::new(512.0, 512.0));
        let (min, max) = viewport.tile_pixel_bounds(&TileCoord::new(1, 0, 1));
        assert!((min.x - 256.0).abs() < 1e-6 && min.y.abs() < 1e-6);
        assert!((max.x - 512.0).abs() < 1e-6 && (max.y - 256.0).abs() < 1e-6);

        // the same tile viewed one level deeper is twice as large
        let viewport = Viewport::new(LatLng::new(0.0, 0.0), 2.0, Point::new(512.0, 512.0));
        let (min, max) = viewport.tile_pixel_bounds(&TileCoord::new(1, 0, 1));
        assert!((max.x - min.x - 512.0).abs() < 1e-6);
    }

    #[test]
    fn test_zoom_limits() {
        let mut viewport = Viewport::default();
        viewport.set_zoom_limits(2.0, 15.0);

        viewport.set_zoom(1.0);
        assert_eq!(viewport.zoom, 2.0);

        viewport.set_zoom(20.0);
        assert_eq!(viewport.zoom, 15.0);
    }

    #[test]
    fn test_pan_moves_center() {
        let mut viewport = Viewport::new(LatLng::new(0.0, 0.0), 1.0, Point::new(512.0, 512.0));
        viewport.pan(Point::new(10.0, 10.0));

        assert!(viewport.center.lng > 0.0);
        assert!(viewport.center.lat < 0.0);
    }

    #[test]
    fn test_fit_bounds_centers_and_contains() {
        let mut viewport = Viewport::new(LatLng::new(0.0, 0.0), 2.0, Point::new(800.0, 600.0));
        let bounds = LatLngBounds::from_coords(6.1, -2.2, 6.2, -2.1);
        viewport.fit_bounds(&bounds, None);

        assert!((viewport.center.lat - 6.15).abs() < 1e-9);
        assert!((viewport.center.lng + 2.15).abs() < 1e-9);
        // 0.1 degrees spans ~583px at z13 and ~1165px at z14
        assert_eq!(viewport.zoom, 13.0);
        let visible = viewport.bounds();
        assert!(visible.contains(&bounds.south_west));
        assert!(visible.contains(&bounds.north_east));
    }

    #[test]
    fn test_tile_range_single_tile_at_zoom_zero() {
        let viewport = Viewport::new(LatLng::new(0.0, 0.0), 0.0, Point::new(256.0, 256.0));
        let (min, max) = viewport.tile_range(0);
        assert_eq!(min, TileCoord::new(0, 0, 0));
        assert_eq!(max, TileCoord::new(0, 0, 0));
    }

    #[test]
    fn test_resolution_shrinks_with_zoom() {
        let mut viewport = Viewport::default();
        let coarse = viewport.resolution();
        viewport.set_zoom(10.0);
        assert!((coarse / viewport.resolution() - 1024.0).abs() < 1e-6);
    }
}
