use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::render::{GradientDescriptor, Layer};

/// One paint layer of a descriptor, bottom first.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct LayerDto {
    /// `radial`, `vignette` or `grain`.
    pub kind: String,
    pub css: String,
    /// Operator the layer is composited with.
    pub blend_mode: String,
}

/// Vector rendering of a session.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct DescriptorResponse {
    /// CSS `background-image` value, top layer first.
    pub css: String,
    /// CSS `background-blend-mode` value, one entry per item of `css`.
    pub blend_modes: String,
    /// Solid color painted under every layer.
    pub background: String,
    /// Layers in paint order, bottom first.
    pub layers: Vec<LayerDto>,
    /// Whether the point positions come from a running animation.
    pub animated: bool,
}

impl DescriptorResponse {
    pub fn new(descriptor: &GradientDescriptor, animated: bool) -> Self {
        Self {
            css: descriptor.to_css(),
            blend_modes: descriptor.to_blend_modes(),
            background: descriptor.background.to_string(),
            layers: descriptor
                .layers
                .iter()
                .map(|layer| LayerDto {
                    kind: match layer {
                        Layer::Radial(_) => "radial",
                        Layer::Vignette { .. } => "vignette",
                        Layer::Grain { .. } => "grain",
                    }
                    .to_string(),
                    css: layer.to_css(),
                    blend_mode: layer.blend_mode(descriptor.blend_mode).to_string(),
                })
                .collect(),
            animated,
        }
    }
}

/// Output size of a raster preview.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PreviewQuery {
    /// Width in pixels, 512 when omitted.
    pub width: Option<u32>,
    /// Height in pixels, 512 when omitted.
    pub height: Option<u32>,
}
