//! egui frontend for maps and views

pub mod controls;
pub mod elements;
pub mod widget;

pub use controls::{BannerKind, LayerAction};
pub use elements::{anchor_rect, MapStyle};
pub use widget::{MapWidget, TileTextures};

use crate::{
    core::{geo::Point, map::Map},
    views::{RasterMapView, VectorMapView, ViewState},
};
use std::time::Duration;

pub trait UiMapExt {
    fn map_widget(&mut self, map: &mut Map, tiles: &mut TileTextures) -> egui::Response;

    /// Polls the view's fetch and draws whatever its render policy selects
    fn vector_view(&mut self, view: &mut VectorMapView, tiles: &mut TileTextures);

    fn raster_view(&mut self, view: &mut RasterMapView, tiles: &mut TileTextures) -> egui::Response;
}

enum Screen {
    Loading,
    Error(String),
    Map,
    Empty,
}

impl UiMapExt for egui::Ui {
    fn map_widget(&mut self, map: &mut Map, tiles: &mut TileTextures) -> egui::Response {
        self.add(MapWidget::new(map, tiles))
    }

    fn vector_view(&mut self, view: &mut VectorMapView, tiles: &mut TileTextures) {
        let size = self.available_size();
        view.set_container_size(Point::new(size.x as f64, size.y as f64));
        view.poll();

        let screen = match view.render() {
            ViewState::Loading => Screen::Loading,
            ViewState::Error(message) => Screen::Error(message.to_string()),
            ViewState::Map(_) => Screen::Map,
            ViewState::Empty => Screen::Empty,
        };
        let style = MapStyle::default();
        let area = self.available_rect_before_wrap();

        match screen {
            Screen::Loading => {
                controls::banner(self, area, "Loading...", BannerKind::Info, &style);
                self.ctx().request_repaint_after(Duration::from_millis(50));
            }
            Screen::Error(message) => {
                let text = format!("Error: {}", message);
                controls::banner(self, area, &text, BannerKind::Error, &style);
            }
            Screen::Map => {
                let notice = view
                    .overlay_error()
                    .map(|e| format!("Vector tiles unavailable: {}", e));
                if let Some(map) = view.map_mut() {
                    let response = self.map_widget(map, tiles);
                    if let Some(notice) = notice {
                        controls::banner(self, response.rect, &notice, BannerKind::Warning, &style);
                    }
                }
            }
            Screen::Empty => {}
        }
    }

    fn raster_view(
        &mut self,
        view: &mut RasterMapView,
        tiles: &mut TileTextures,
    ) -> egui::Response {
        self.map_widget(view.map_mut(), tiles)
    }
}
