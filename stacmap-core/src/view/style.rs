//! Visual style state for item footprints.

use serde::{Deserialize, Serialize};

/// The style applied to one geometry.
///
/// Exactly one applies at any time and it always matches selection
/// membership and filter status; `Disabled` overrides `Selected`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureStyle {
    /// Loaded, interactive, not selected.
    #[default]
    Default,
    /// Loaded, interactive, selected.
    Selected,
    /// Filtered out by the date filter; not interactive.
    Disabled,
}

/// Concrete path styling for a footprint, in the renderer's vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathStyle {
    /// Stroke color.
    pub color: String,
    /// Stroke width in pixels.
    pub weight: f64,
    /// Stroke opacity.
    pub opacity: f64,
    /// Fill color.
    pub fill_color: String,
    /// Fill opacity.
    pub fill_opacity: f64,
}

/// The three concrete styles a renderer needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StylePalette {
    /// Style for [`FeatureStyle::Default`].
    pub default: PathStyle,
    /// Style for [`FeatureStyle::Selected`].
    pub selected: PathStyle,
    /// Style for [`FeatureStyle::Disabled`].
    pub disabled: PathStyle,
}

impl Default for StylePalette {
    fn default() -> Self {
        Self {
            default: PathStyle {
                color: "#3388FF".to_string(),
                weight: 2.0,
                opacity: 1.0,
                fill_color: "#3388FF".to_string(),
                fill_opacity: 0.2,
            },
            selected: PathStyle {
                color: "#FF0000".to_string(),
                weight: 3.0,
                opacity: 1.0,
                fill_color: "#FF0000".to_string(),
                fill_opacity: 0.4,
            },
            disabled: PathStyle {
                color: "#8A8A8A".to_string(),
                weight: 1.0,
                opacity: 1.0,
                fill_color: "#ADADAD".to_string(),
                fill_opacity: 0.6,
            },
        }
    }
}

impl StylePalette {
    /// The concrete style for a state.
    #[must_use]
    pub fn style_for(&self, style: FeatureStyle) -> &PathStyle {
        match style {
            FeatureStyle::Default => &self.default,
            FeatureStyle::Selected => &self.selected,
            FeatureStyle::Disabled => &self.disabled,
        }
    }
}
