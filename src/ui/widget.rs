use crate::{
    core::{
        geo::{Point, TileCoord},
        map::Map,
        viewport::Viewport,
    },
    layers::{
        base::LayerTrait,
        tile::TileLayer,
        vector_tile::{StyleRule, VectorTileLayer},
    },
    tiles::loader::TileLoader,
    ui::{
        controls::{self, LayerAction},
        elements::{parse_hex_color, MapStyle},
    },
};
use egui::{
    Color32, ColorImage, Pos2, Rect, Response, Sense, Stroke, TextureHandle, TextureOptions, Ui,
    Vec2, Widget,
};
use fxhash::{FxHashMap, FxHashSet};
use std::time::Duration;

/// Raster tiles of the current view, uploaded as textures.
///
/// Only tiles drawn in the last frame are kept.
pub struct TileTextures {
    loader: TileLoader,
    textures: FxHashMap<String, TextureHandle>,
    pending: FxHashSet<String>,
    failed: FxHashSet<String>,
}

impl TileTextures {
    pub fn new() -> Self {
        Self {
            loader: TileLoader::new(),
            textures: FxHashMap::default(),
            pending: FxHashSet::default(),
            failed: FxHashSet::default(),
        }
    }

    fn request(&mut self, coord: TileCoord, url: &str) {
        if self.textures.contains_key(url)
            || self.pending.contains(url)
            || self.failed.contains(url)
        {
            return;
        }
        self.pending.insert(url.to_string());
        self.loader.start_download(coord, url.to_string());
    }

    /// Uploads every tile that finished downloading since the last frame
    fn receive(&mut self, ctx: &egui::Context) {
        for result in self.loader.drain() {
            if !self.pending.remove(&result.url) {
                continue;
            }
            match result.data.and_then(|bytes| {
                decode_tile(&bytes).ok_or_else(|| "undecodable image".to_string())
            }) {
                Ok(image) => {
                    let texture =
                        ctx.load_texture(result.url.clone(), image, TextureOptions::LINEAR);
                    self.textures.insert(result.url, texture);
                }
                Err(e) => {
                    log::warn!("tile {} unavailable: {}", result.coord, e);
                    self.failed.insert(result.url);
                }
            }
        }
    }

    fn retain(&mut self, visible: &FxHashSet<String>) {
        self.textures.retain(|url, _| visible.contains(url));
        self.failed.retain(|url| visible.contains(url));
    }

    fn get(&self, url: &str) -> Option<&TextureHandle> {
        self.textures.get(url)
    }

    pub fn is_loading(&self) -> bool {
        !self.pending.is_empty()
    }
}

impl Default for TileTextures {
    fn default() -> Self {
        Self::new()
    }
}

/// Decodes PNG/JPEG tile bytes into an egui image
pub fn decode_tile(bytes: &[u8]) -> Option<ColorImage> {
    let rgba = image::load_from_memory(bytes).ok()?.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Some(ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}

fn to_screen(origin: Pos2, (min, max): (Point, Point)) -> Rect {
    Rect::from_min_max(
        origin + Vec2::new(min.x as f32, min.y as f32),
        origin + Vec2::new(max.x as f32, max.y as f32),
    )
}

/// Interactive map: draws the active layers and the map's controls, and
/// turns drag, wheel and button input into viewport changes
pub struct MapWidget<'a> {
    map: &'a mut Map,
    tiles: &'a mut TileTextures,
    style: MapStyle,
    interactive: bool,
}

impl<'a> MapWidget<'a> {
    pub fn new(map: &'a mut Map, tiles: &'a mut TileTextures) -> Self {
        Self {
            map,
            tiles,
            style: MapStyle::default(),
            interactive: true,
        }
    }

    pub fn style(mut self, style: MapStyle) -> Self {
        self.style = style;
        self
    }

    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }
}

fn handle_input(ui: &Ui, response: &Response, rect: Rect, map: &mut Map) {
    if response.dragged() {
        let delta = response.drag_delta();
        if delta.length_sq() > 0.0 {
            map.pan(Point::new(-delta.x as f64, -delta.y as f64));
        }
    }

    let focus = response
        .hover_pos()
        .map(|pos| Point::new((pos.x - rect.min.x) as f64, (pos.y - rect.min.y) as f64));

    if response.hovered() {
        let scroll = ui.input(|i| i.raw_scroll_delta.y);
        if scroll.abs() > 0.1 {
            let zoom = map.viewport.zoom + (scroll as f64 / 120.0).clamp(-1.0, 1.0);
            map.zoom_to(zoom, focus);
        }
    }

    if response.double_clicked() {
        let zoom = map.viewport.zoom.round() + 1.0;
        map.zoom_to(zoom, focus);
    }
}

fn draw_raster(
    painter: &egui::Painter,
    origin: Pos2,
    viewport: &Viewport,
    layer: &TileLayer,
    tiles: &mut TileTextures,
    visible: &mut FxHashSet<String>,
) {
    let tint = Color32::WHITE.gamma_multiply(layer.opacity());
    let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));

    for request in layer.visible_tiles(viewport) {
        tiles.request(request.coord, &request.url);
        if let Some(texture) = tiles.get(&request.url) {
            let rect = to_screen(origin, viewport.tile_pixel_bounds(&request.coord));
            painter.image(texture.id(), rect, uv, tint);
        }
        visible.insert(request.url);
    }
}

/// Outlines the tiles the vector grid has ready. Feature drawing belongs to
/// the plugin; this only shows coverage.
fn draw_vector_coverage(
    painter: &egui::Painter,
    origin: Pos2,
    viewport: &Viewport,
    layer: &VectorTileLayer,
) {
    let zoom = viewport.tile_zoom();
    let rule = layer
        .resolved_options()
        .styles
        .any_rule()
        .cloned()
        .unwrap_or_default();
    let stroke = stroke_for(&rule, layer.opacity());

    for coord in layer.grid().ready_tiles() {
        if coord.z != zoom {
            continue;
        }
        let rect = to_screen(origin, viewport.tile_pixel_bounds(&coord));
        painter.rect_stroke(rect, 0.0, stroke);
    }
}

fn stroke_for(rule: &StyleRule, layer_opacity: f32) -> Stroke {
    let color = parse_hex_color(&rule.color).unwrap_or(Color32::from_rgb(0x33, 0x88, 0xff));
    Stroke::new(rule.weight, color.gamma_multiply(rule.opacity * layer_opacity))
}

impl Widget for MapWidget<'_> {
    fn ui(self, ui: &mut Ui) -> Response {
        let MapWidget {
            map,
            tiles,
            style,
            interactive,
        } = self;

        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        map.set_size(Point::new(rect.width() as f64, rect.height() as f64));

        if interactive {
            handle_input(ui, &response, rect, map);
        }

        tiles.receive(ui.ctx());
        if let Err(e) = map.update_layers() {
            log::warn!("layer update failed: {}", e);
        }

        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, style.background);

        let viewport = map.viewport.clone();
        let mut visible = FxHashSet::default();
        for layer in map.active_layers() {
            if let Some(raster) = layer.as_any().downcast_ref::<TileLayer>() {
                draw_raster(&painter, rect.min, &viewport, raster, tiles, &mut visible);
            } else if let Some(vector) = layer.as_any().downcast_ref::<VectorTileLayer>() {
                draw_vector_coverage(&painter, rect.min, &viewport, vector);
            }
        }
        tiles.retain(&visible);

        if interactive {
            if let Some(step) = controls::zoom_buttons(ui, rect, &style) {
                let zoom = map.viewport.zoom.round() + step;
                map.zoom_to(zoom, None);
            }
        }

        if let (Some(control), Some(bar)) = (map.scale_control(), map.scale_bar()) {
            controls::scale_bar(ui, rect, &bar, control.position, &style);
        }
        controls::attribution(ui, rect, &map.attributions(), &style);

        let action = controls::layers_panel(ui, rect, map, &style);
        let outcome = match action {
            Some(LayerAction::SelectBase(id)) => map.select_base_layer(&id),
            Some(LayerAction::SetOverlay(id, enabled)) => map.set_overlay_enabled(&id, enabled),
            None => Ok(()),
        };
        if let Err(e) = outcome {
            log::warn!("layer switch rejected: {}", e);
        }

        if tiles.is_loading() {
            ui.ctx().request_repaint_after(Duration::from_millis(100));
        }
        response
    }
}
