//! Map controls that carry state: layer selection and the scale bar

use crate::{constants::SCALE_MAX_WIDTH, core::viewport::Viewport, LayerError};
use fxhash::FxHashSet;

/// Corner of the map a control is anchored to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlPosition {
    TopLeft,
    #[default]
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Base-layer radio group plus overlay checkboxes.
///
/// Exactly one base layer is active once any has been added.
#[derive(Debug, Clone, Default)]
pub struct LayersControl {
    position: ControlPosition,
    base_layers: Vec<String>,
    overlays: Vec<String>,
    active_base: Option<String>,
    enabled_overlays: FxHashSet<String>,
}

impl LayersControl {
    pub fn new(position: ControlPosition) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn position(&self) -> ControlPosition {
        self.position
    }

    /// Registers a base layer; `checked` makes it the active one
    pub fn add_base_layer(&mut self, layer_id: impl Into<String>, checked: bool) {
        let layer_id = layer_id.into();
        if checked || self.active_base.is_none() {
            self.active_base = Some(layer_id.clone());
        }
        if !self.base_layers.contains(&layer_id) {
            self.base_layers.push(layer_id);
        }
    }

    pub fn add_overlay(&mut self, layer_id: impl Into<String>, checked: bool) {
        let layer_id = layer_id.into();
        if checked {
            self.enabled_overlays.insert(layer_id.clone());
        }
        if !self.overlays.contains(&layer_id) {
            self.overlays.push(layer_id);
        }
    }

    /// Makes `layer_id` the active base layer, deselecting the previous one
    pub fn select_base_layer(&mut self, layer_id: &str) -> Result<(), LayerError> {
        if !self.base_layers.iter().any(|id| id == layer_id) {
            return Err(LayerError::UnknownLayer(layer_id.to_string()));
        }
        self.active_base = Some(layer_id.to_string());
        Ok(())
    }

    pub fn set_overlay_enabled(&mut self, layer_id: &str, enabled: bool) -> Result<(), LayerError> {
        if !self.overlays.iter().any(|id| id == layer_id) {
            return Err(LayerError::UnknownLayer(layer_id.to_string()));
        }
        if enabled {
            self.enabled_overlays.insert(layer_id.to_string());
        } else {
            self.enabled_overlays.remove(layer_id);
        }
        Ok(())
    }

    pub fn base_layers(&self) -> &[String] {
        &self.base_layers
    }

    pub fn overlays(&self) -> &[String] {
        &self.overlays
    }

    pub fn active_base(&self) -> Option<&str> {
        self.active_base.as_deref()
    }

    pub fn is_overlay_enabled(&self, layer_id: &str) -> bool {
        self.enabled_overlays.contains(layer_id)
    }

    /// Whether the layer should currently be drawn
    pub fn is_active(&self, layer_id: &str) -> bool {
        self.active_base.as_deref() == Some(layer_id) || self.is_overlay_enabled(layer_id)
    }

    pub fn contains(&self, layer_id: &str) -> bool {
        self.base_layers.iter().chain(self.overlays.iter()).any(|id| id == layer_id)
    }

    pub(crate) fn remove(&mut self, layer_id: &str) {
        self.base_layers.retain(|id| id != layer_id);
        self.overlays.retain(|id| id != layer_id);
        self.enabled_overlays.remove(layer_id);
        if self.active_base.as_deref() == Some(layer_id) {
            self.active_base = self.base_layers.first().cloned();
        }
    }
}

/// Metric scale bar
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleControl {
    pub position: ControlPosition,
    pub max_width: f64,
}

/// A scale bar ready to draw
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleBar {
    pub width_px: f64,
    pub meters: f64,
    pub label: String,
}

impl ScaleControl {
    pub fn new(position: ControlPosition) -> Self {
        Self {
            position,
            max_width: SCALE_MAX_WIDTH,
        }
    }

    /// Largest round distance that fits in `max_width` at the viewport center
    pub fn measure(&self, viewport: &Viewport) -> ScaleBar {
        let max_meters = viewport.resolution() * self.max_width;
        let meters = round_distance(max_meters);
        let ratio = if max_meters > 0.0 { meters / max_meters } else { 0.0 };

        let label = if meters >= 1000.0 {
            format!("{} km", meters / 1000.0)
        } else {
            format!("{} m", meters)
        };

        ScaleBar {
            width_px: (self.max_width * ratio).round(),
            meters,
            label,
        }
    }
}

impl Default for ScaleControl {
    fn default() -> Self {
        Self::new(ControlPosition::BottomLeft)
    }
}

/// Rounds down to 1, 2, 3 or 5 times a power of ten
fn round_distance(meters: f64) -> f64 {
    if !meters.is_finite() || meters <= 0.0 {
        return 0.0;
    }
    let pow10 = 10_f64.powf(meters.log10().floor());
    let d = meters / pow10;
    let step = if d >= 10.0 {
        10.0
    } else if d >= 5.0 {
        5.0
    } else if d >= 3.0 {
        3.0
    } else if d >= 2.0 {
        2.0
    } else {
        1.0
    };
    pow10 * step
}
