use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Path style applied to the features of one source layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleRule {
    pub weight: f32,
    pub color: String,
    pub opacity: f32,
    pub fill: bool,
    pub fill_color: String,
    pub fill_opacity: f32,
}

impl Default for StyleRule {
    fn default() -> Self {
        Self {
            weight: 1.0,
            color: "#3388ff".to_string(),
            opacity: 1.0,
            fill: true,
            fill_color: "#3388ff".to_string(),
            fill_opacity: 0.2,
        }
    }
}

/// Styles keyed by vector-tile source layer name.
///
/// Lookup order is the exact layer name, then `fallback`. When neither is
/// present no style is declared and the plugin's own default applies.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleTable {
    pub rules: BTreeMap<String, StyleRule>,
    pub fallback: Option<StyleRule>,
}

impl StyleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rule(mut self, layer_name: impl Into<String>, rule: StyleRule) -> Self {
        self.rules.insert(layer_name.into(), rule);
        self
    }

    pub fn with_fallback(mut self, rule: StyleRule) -> Self {
        self.fallback = Some(rule);
        self
    }

    pub fn rule_for(&self, layer_name: &str) -> Option<&StyleRule> {
        self.rules.get(layer_name).or(self.fallback.as_ref())
    }

    /// Rule for drawing that is not tied to one source layer, such as tile
    /// outlines: the fallback, else the first named rule
    pub fn any_rule(&self) -> Option<&StyleRule> {
        self.fallback.as_ref().or_else(|| self.rules.values().next())
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty() && self.fallback.is_none()
    }
}
