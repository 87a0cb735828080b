use crate::layers::control::ControlPosition;
use egui::{Color32, Pos2, Rect, Rounding, Stroke, Vec2};

/// Colors and spacing shared by the map chrome
#[derive(Debug, Clone)]
pub struct MapStyle {
    pub background: Color32,
    pub panel_fill: Color32,
    pub panel_stroke: Stroke,
    pub text_color: Color32,
    pub error_color: Color32,
    pub warning_color: Color32,
    pub rounding: Rounding,
    pub margin: f32,
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            background: Color32::from_rgb(221, 221, 221),
            panel_fill: Color32::from_rgba_unmultiplied(255, 255, 255, 230),
            panel_stroke: Stroke::new(1.0, Color32::from_gray(170)),
            text_color: Color32::from_gray(30),
            error_color: Color32::from_rgb(176, 32, 32),
            warning_color: Color32::from_rgb(150, 100, 0),
            rounding: Rounding::same(4.0),
            margin: 10.0,
        }
    }
}

/// Rectangle of `size` placed in the `position` corner of `container`
pub fn anchor_rect(position: ControlPosition, container: Rect, size: Vec2, margin: f32) -> Rect {
    let min = match position {
        ControlPosition::TopLeft => container.min + Vec2::splat(margin),
        ControlPosition::TopRight => Pos2::new(
            container.max.x - margin - size.x,
            container.min.y + margin,
        ),
        ControlPosition::BottomLeft => Pos2::new(
            container.min.x + margin,
            container.max.y - margin - size.y,
        ),
        ControlPosition::BottomRight => container.max - Vec2::splat(margin) - size,
    };
    Rect::from_min_size(min, size)
}

/// Parses `#rgb`, `#rrggbb` or `#rrggbbaa`
pub fn parse_hex_color(hex: &str) -> Option<Color32> {
    let digits = hex.strip_prefix('#')?;
    let channel = |i: usize, len: usize| u8::from_str_radix(digits.get(i..i + len)?, 16).ok();

    match digits.len() {
        3 => {
            let r = channel(0, 1)?;
            let g = channel(1, 1)?;
            let b = channel(2, 1)?;
            Some(Color32::from_rgb(r * 17, g * 17, b * 17))
        }
        6 => Some(Color32::from_rgb(channel(0, 2)?, channel(2, 2)?, channel(4, 2)?)),
        8 => Some(Color32::from_rgba_unmultiplied(
            channel(0, 2)?,
            channel(2, 2)?,
            channel(4, 2)?,
            channel(6, 2)?,
        )),
        _ => None,
    }
}
