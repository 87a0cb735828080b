use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerType {
    /// Raster tiles drawn natively
    Tile,
    /// Vector tiles drawn by a plugin
    VectorTile,
}

impl std::fmt::Display for LayerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayerType::Tile => write!(f, "tile"),
            LayerType::VectorTile => write!(f, "vector-tile"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayerProperties {
    pub id: String,
    pub name: String,
    pub layer_type: LayerType,
    pub z_index: i32,
    pub opacity: f32,
    pub visible: bool,
    pub attribution: Option<String>,
}

impl LayerProperties {
    pub fn new(id: impl Into<String>, name: impl Into<String>, layer_type: LayerType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            layer_type,
            z_index: 0,
            opacity: 1.0,
            visible: true,
            attribution: None,
        }
    }
}

/// Operations shared by every layer the map can hold
pub trait LayerTrait: Send {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn layer_type(&self) -> LayerType;

    fn z_index(&self) -> i32;
    fn set_z_index(&mut self, z_index: i32);

    fn opacity(&self) -> f32;
    fn set_opacity(&mut self, opacity: f32);

    fn is_visible(&self) -> bool;
    fn set_visible(&mut self, visible: bool);

    fn attribution(&self) -> Option<&str>;

    /// Zoom range the layer draws in
    fn zoom_range(&self) -> (u8, u8);

    /// Per-frame housekeeping (draining tile results, dispatching events)
    fn update(&mut self) -> Result<()> {
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any;
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_properties_defaults() {
        let props = LayerProperties::new("osm", "OpenStreetMap", LayerType::Tile);

        assert_eq!(props.id, "osm");
        assert_eq!(props.name, "OpenStreetMap");
        assert_eq!(props.z_index, 0);
        assert_eq!(props.opacity, 1.0);
        assert!(props.visible);
        assert!(props.attribution.is_none());
    }

    #[test]
    fn test_layer_type_display() {
        assert_eq!(LayerType::Tile.to_string(), "tile");
        assert_eq!(LayerType::VectorTile.to_string(), "vector-tile");
    }
}
