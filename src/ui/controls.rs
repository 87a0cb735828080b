//! Map chrome: layer switcher, zoom buttons, scale bar, attribution and
//! status banners

use crate::{
    core::map::Map,
    layers::control::{ControlPosition, ScaleBar},
    ui::elements::{anchor_rect, MapStyle},
};
use egui::{Align2, FontId, Frame, Pos2, Rect, Sense, Stroke, Ui, Vec2};

/// A change requested through the layers control
#[derive(Debug, Clone, PartialEq)]
pub enum LayerAction {
    SelectBase(String),
    SetOverlay(String, bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Info,
    Warning,
    Error,
}

const ROW_HEIGHT: f32 = 22.0;
const PANEL_WIDTH: f32 = 190.0;

/// Radio buttons for base layers and checkboxes for overlays
pub fn layers_panel(
    ui: &mut Ui,
    container: Rect,
    map: &Map,
    style: &MapStyle,
) -> Option<LayerAction> {
    let control = map.layers_control();
    let rows = control.base_layers().len() + control.overlays().len();
    if rows == 0 {
        return None;
    }
    let separator = if control.overlays().is_empty() { 0.0 } else { 8.0 };
    let size = Vec2::new(PANEL_WIDTH, rows as f32 * ROW_HEIGHT + separator + 16.0);
    let rect = anchor_rect(control.position(), container, size, style.margin);

    let label = |id: &str| {
        map.get_layer(id)
            .map(|layer| layer.name().to_string())
            .unwrap_or_else(|| id.to_string())
    };

    let mut action = None;
    ui.allocate_ui_at_rect(rect, |ui| {
        Frame::popup(ui.style())
            .fill(style.panel_fill)
            .stroke(style.panel_stroke)
            .show(ui, |ui| {
                for id in control.base_layers() {
                    let selected = control.active_base() == Some(id.as_str());
                    if ui.radio(selected, label(id)).clicked() && !selected {
                        action = Some(LayerAction::SelectBase(id.clone()));
                    }
                }
                if !control.overlays().is_empty() {
                    ui.separator();
                }
                for id in control.overlays() {
                    let mut enabled = control.is_overlay_enabled(id);
                    if ui.checkbox(&mut enabled, label(id)).changed() {
                        action = Some(LayerAction::SetOverlay(id.clone(), enabled));
                    }
                }
            });
    });
    action
}

/// `+`/`-` buttons in the top-left corner; returns the requested zoom step
pub fn zoom_buttons(ui: &mut Ui, container: Rect, style: &MapStyle) -> Option<f64> {
    let button = Vec2::splat(30.0);
    let column = anchor_rect(
        ControlPosition::TopLeft,
        container,
        Vec2::new(button.x, button.y * 2.0),
        style.margin,
    );

    let mut step = None;
    for (i, (text, delta)) in [("+", 1.0), ("−", -1.0)].into_iter().enumerate() {
        let rect = Rect::from_min_size(column.min + Vec2::new(0.0, i as f32 * button.y), button);
        let response = ui.allocate_rect(rect, Sense::click());
        let fill = if response.hovered() {
            style.panel_fill.gamma_multiply(0.85)
        } else {
            style.panel_fill
        };
        ui.painter().rect_filled(rect, style.rounding, fill);
        ui.painter().rect_stroke(rect, style.rounding, style.panel_stroke);
        ui.painter().text(
            rect.center(),
            Align2::CENTER_CENTER,
            text,
            FontId::proportional(18.0),
            style.text_color,
        );
        if response.clicked() {
            step = Some(delta);
        }
    }
    step
}

/// Leaflet style scale bar: a bracket as wide as the rounded distance
pub fn scale_bar(
    ui: &Ui,
    container: Rect,
    bar: &ScaleBar,
    position: ControlPosition,
    style: &MapStyle,
) {
    if bar.width_px <= 0.0 {
        return;
    }
    let size = Vec2::new(bar.width_px as f32, 18.0);
    let rect = anchor_rect(position, container, size, style.margin);
    let painter = ui.painter();
    let stroke = Stroke::new(2.0, style.text_color);

    painter.rect_filled(rect, 0.0, style.panel_fill);
    painter.line_segment([rect.left_bottom(), rect.right_bottom()], stroke);
    painter.line_segment([rect.left_top() + Vec2::new(0.0, 6.0), rect.left_bottom()], stroke);
    painter.line_segment([rect.right_top() + Vec2::new(0.0, 6.0), rect.right_bottom()], stroke);
    painter.text(
        rect.left_center() + Vec2::new(4.0, 0.0),
        Align2::LEFT_CENTER,
        &bar.label,
        FontId::proportional(11.0),
        style.text_color,
    );
}

/// Attribution line in the bottom-right corner
pub fn attribution(ui: &Ui, container: Rect, texts: &[&str], style: &MapStyle) {
    if texts.is_empty() {
        return;
    }
    let text = texts.join(" | ");
    let font = FontId::proportional(11.0);
    let galley = ui
        .painter()
        .layout_no_wrap(text, font, style.text_color);
    let size = galley.size() + Vec2::new(8.0, 4.0);
    let rect = anchor_rect(ControlPosition::BottomRight, container, size, 0.0);

    ui.painter().rect_filled(rect, 0.0, style.panel_fill);
    ui.painter()
        .galley(rect.min + Vec2::new(4.0, 2.0), galley, style.text_color);
}

/// Centered message over the map area
pub fn banner(ui: &Ui, container: Rect, text: &str, kind: BannerKind, style: &MapStyle) {
    let color = match kind {
        BannerKind::Info => style.text_color,
        BannerKind::Warning => style.warning_color,
        BannerKind::Error => style.error_color,
    };
    let galley = ui
        .painter()
        .layout(text.to_string(), FontId::proportional(15.0), color, container.width() * 0.8);
    let size = galley.size() + Vec2::splat(24.0);
    let center = match kind {
        // warnings sit at the top so the map stays visible
        BannerKind::Warning => Pos2::new(container.center().x, container.min.y + size.y),
        _ => container.center(),
    };
    let rect = Rect::from_center_size(center, size);

    ui.painter().rect_filled(rect, style.rounding, style.panel_fill);
    ui.painter().rect_stroke(rect, style.rounding, Stroke::new(1.0, color));
    ui.painter().galley(rect.min + Vec2::splat(12.0), galley, color);
}
