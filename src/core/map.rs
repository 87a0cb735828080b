use crate::{
    core::{
        geo::{LatLng, LatLngBounds, Point},
        viewport::Viewport,
    },
    layers::{
        base::LayerTrait,
        control::{ControlPosition, LayersControl, ScaleBar, ScaleControl},
        manager::LayerManager,
        vector_tile::VectorTileLayer,
    },
    Result,
};

/// A map: one viewport, its layers and the controls that switch them
pub struct Map {
    pub viewport: Viewport,
    layer_manager: LayerManager,
    layers_control: LayersControl,
    scale_control: Option<ScaleControl>,
    /// Center and zoom the map was created with
    initial_view: (LatLng, f64),
    /// Bounds last passed to [`Map::fit_bounds`]; refitted on resize until
    /// the user moves the map
    fitted_bounds: Option<LatLngBounds>,
    interacted: bool,
}

impl Map {
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        Self {
            viewport: Viewport::new(center, zoom, size),
            layer_manager: LayerManager::new(),
            layers_control: LayersControl::new(ControlPosition::TopRight),
            scale_control: None,
            initial_view: (center, zoom),
            fitted_bounds: None,
            interacted: false,
        }
    }

    /// Restricts zooming and re-clamps the current zoom
    pub fn with_zoom_limits(mut self, min_zoom: f64, max_zoom: f64) -> Self {
        self.viewport.set_zoom_limits(min_zoom, max_zoom);
        let zoom = self.viewport.zoom;
        self.viewport.set_zoom(zoom);
        self
    }

    pub fn with_layers_control(mut self, position: ControlPosition) -> Self {
        self.layers_control = LayersControl::new(position);
        self
    }

    pub fn with_scale_control(mut self, control: ScaleControl) -> Self {
        self.scale_control = Some(control);
        self
    }

    pub fn initial_view(&self) -> (LatLng, f64) {
        self.initial_view
    }

    pub fn set_view(&mut self, center: LatLng, zoom: f64) {
        self.viewport.set_center(center);
        self.viewport.set_zoom(zoom);
    }

    /// Moves the map by a pixel delta (user drag)
    pub fn pan(&mut self, delta: Point) {
        self.interacted = true;
        self.viewport.pan(delta);
    }

    /// Zooms around `focus`, or the center when `None` (user wheel/buttons)
    pub fn zoom_to(&mut self, zoom: f64, focus: Option<Point>) {
        self.interacted = true;
        self.viewport.zoom_to(zoom, focus);
    }

    pub fn fit_bounds(&mut self, bounds: &LatLngBounds, padding: Option<f64>) {
        log::debug!("fitting map to {:?}", bounds.to_corner_pairs());
        self.viewport.fit_bounds(bounds, padding);
        self.fitted_bounds = Some(*bounds);
    }

    pub fn fitted_bounds(&self) -> Option<&LatLngBounds> {
        self.fitted_bounds.as_ref()
    }

    /// Resizes the container, refitting to the last fitted bounds while the
    /// user has not moved the map yet
    pub fn set_size(&mut self, size: Point) {
        if self.viewport.size == size {
            return;
        }
        self.viewport.set_size(size);
        if !self.interacted {
            if let Some(bounds) = self.fitted_bounds {
                self.viewport.fit_bounds(&bounds, None);
            }
        }
    }

    /// Adds a layer to the base-layer radio group
    pub fn add_base_layer(&mut self, layer: Box<dyn LayerTrait>, checked: bool) -> Result<()> {
        let layer_id = layer.id().to_string();
        self.layer_manager.add_layer(layer)?;
        self.layers_control.add_base_layer(layer_id, checked);
        self.sync_visibility();
        Ok(())
    }

    /// Adds a layer drawn on top of the base layer
    pub fn add_overlay(&mut self, layer: Box<dyn LayerTrait>, checked: bool) -> Result<()> {
        let layer_id = layer.id().to_string();
        self.layer_manager.add_layer(layer)?;
        self.layers_control.add_overlay(layer_id, checked);
        self.sync_visibility();
        Ok(())
    }

    pub fn remove_layer(&mut self, layer_id: &str) -> Option<Box<dyn LayerTrait>> {
        self.layers_control.remove(layer_id);
        let removed = self.layer_manager.remove_layer(layer_id);
        self.sync_visibility();
        removed
    }

    pub fn select_base_layer(&mut self, layer_id: &str) -> Result<()> {
        self.layers_control.select_base_layer(layer_id)?;
        log::debug!("base layer switched to `{}`", layer_id);
        self.sync_visibility();
        Ok(())
    }

    pub fn set_overlay_enabled(&mut self, layer_id: &str, enabled: bool) -> Result<()> {
        self.layers_control.set_overlay_enabled(layer_id, enabled)?;
        self.sync_visibility();
        Ok(())
    }

    fn sync_visibility(&mut self) {
        let control = &self.layers_control;
        self.layer_manager.for_each_layer_mut(|layer| {
            let active = control.is_active(layer.id());
            layer.set_visible(active);
        });
    }

    pub fn get_layer(&self, layer_id: &str) -> Option<&dyn LayerTrait> {
        self.layer_manager.get_layer(layer_id)
    }

    pub fn get_layer_as<T: 'static>(&self, layer_id: &str) -> Option<&T> {
        self.layer_manager.get_as::<T>(layer_id)
    }

    pub fn with_layer_mut<F, R>(&mut self, layer_id: &str, f: F) -> Option<R>
    where
        F: FnOnce(&mut dyn LayerTrait) -> R,
    {
        let result = self.layer_manager.with_layer_mut(layer_id, f);
        self.layer_manager.update_render_order();
        result
    }

    /// All layers in draw order
    pub fn layers(&self) -> Vec<&dyn LayerTrait> {
        self.layer_manager.layers()
    }

    /// Layers the controls currently switch on, in draw order.
    ///
    /// Overlays always come after base layers whatever their z-index; the
    /// z-index only orders layers within each group.
    pub fn active_layers(&self) -> Vec<&dyn LayerTrait> {
        let mut active: Vec<&dyn LayerTrait> = self
            .layer_manager
            .layers()
            .into_iter()
            .filter(|layer| layer.is_visible())
            .collect();
        let overlays = self.layers_control.overlays();
        active.sort_by_key(|layer| overlays.iter().any(|id| id == layer.id()));
        active
    }

    /// Attribution strings of the active layers, empty ones skipped
    pub fn attributions(&self) -> Vec<&str> {
        self.active_layers()
            .into_iter()
            .filter_map(|layer| layer.attribution())
            .filter(|text| !text.is_empty())
            .collect()
    }

    /// Per-frame work: requests the vector tiles the view needs and lets
    /// every layer drain its pending results
    pub fn update_layers(&mut self) -> Result<()> {
        let viewport = &self.viewport;
        self.layer_manager.for_each_layer_mut(|layer| {
            if let Some(vector) = layer.as_any_mut().downcast_mut::<VectorTileLayer>() {
                vector.request_visible_tiles(viewport);
            }
        });
        self.layer_manager.update_all()
    }

    pub fn layers_control(&self) -> &LayersControl {
        &self.layers_control
    }

    pub fn scale_control(&self) -> Option<&ScaleControl> {
        self.scale_control.as_ref()
    }

    /// Current scale bar, when the map has a scale control
    pub fn scale_bar(&self) -> Option<ScaleBar> {
        self.scale_control
            .as_ref()
            .map(|control| control.measure(&self.viewport))
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }
}
