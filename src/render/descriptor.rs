use serde::Serialize;

use crate::{
    color::{BlendMode, HexColor, mix_many},
    error::GradientError,
    mesh::MeshPoint,
    render::EffectParameters,
};

/// Radius, relative to the half-diagonal, at which the vignette starts darkening.
pub const VIGNETTE_START: f32 = 0.5;

/// Operator the grain texture is composited with in both render targets.
pub const GRAIN_BLEND: BlendMode = BlendMode::Overlay;

/// One radial falloff centered on a mesh point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadialLayer {
    pub x: f32,
    pub y: f32,
    pub color: HexColor,
    /// Percentage of the gradient ray at which the color has faded to
    /// transparent.
    pub stop: f32,
}

impl RadialLayer {
    /// Fade radius in pixels on a `width` × `height` canvas.
    ///
    /// The gradient is a circle sized to the farthest corner from its center,
    /// which is what CSS uses for `radial-gradient(circle at …)`, and `stop`
    /// is a percentage of that ray.
    pub fn reach(&self, width: f32, height: f32) -> f32 {
        let (cx, cy) = (self.x / 100.0 * width, self.y / 100.0 * height);
        let ray = cx.max(width - cx).hypot(cy.max(height - cy));
        self.stop / 100.0 * ray
    }
}

/// A paint layer of the descriptor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Layer {
    Radial(RadialLayer),
    Vignette { strength: f32 },
    Grain { opacity: f32, uri: String },
}

impl Layer {
    /// CSS `background-image` item for this layer.
    pub fn to_css(&self) -> String {
        match self {
            Layer::Radial(layer) => format!(
                "radial-gradient(circle at {}% {}%, {} 0px, transparent {}%)",
                fmt_num(layer.x),
                fmt_num(layer.y),
                layer.color,
                fmt_num(layer.stop)
            ),
            Layer::Vignette { strength } => format!(
                "radial-gradient(circle at 50% 50%, transparent {}%, rgba(0, 0, 0, {}) 100%)",
                fmt_num(VIGNETTE_START * 100.0),
                fmt_num(*strength)
            ),
            Layer::Grain { uri, .. } => format!("url(\"{uri}\")"),
        }
    }

    /// Operator this layer is composited with when point layers use `points`.
    pub fn blend_mode(&self, points: BlendMode) -> BlendMode {
        match self {
            Layer::Radial(_) => points,
            Layer::Vignette { .. } => BlendMode::Normal,
            Layer::Grain { .. } => GRAIN_BLEND,
        }
    }
}

/// Layered radial-gradient description of a mesh, shared by both render targets.
///
/// `layers` is in paint order, back to front: point layers come in reverse
/// point order so the first point is painted last and ends up on top, then the
/// vignette, then the grain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradientDescriptor {
    pub layers: Vec<Layer>,
    /// Solid fill under every layer: the perceptual centroid of the point colors.
    pub background: HexColor,
    /// Operator the point layers are composited with.
    pub blend_mode: BlendMode,
}

impl GradientDescriptor {
    pub fn build(points: &[MeshPoint], params: &EffectParameters) -> Result<Self, GradientError> {
        if points.is_empty() {
            return Err(GradientError::InvalidParameter(
                "cannot render a mesh without points".into(),
            ));
        }

        let colors: Vec<HexColor> = points.iter().map(|point| point.color).collect();
        let background = mix_many(&colors, &vec![1.0; colors.len()])?;

        let mut layers: Vec<Layer> = points
            .iter()
            .map(|point| {
                Layer::Radial(RadialLayer {
                    x: point.x,
                    y: point.y,
                    color: point.color,
                    stop: params.effective_influence(point),
                })
            })
            .collect();
        layers.reverse();

        if params.vignette > 0.0 {
            layers.push(Layer::Vignette {
                strength: params.vignette.min(1.0),
            });
        }
        if params.grain > 0.0 {
            let opacity = params.grain.min(1.0);
            layers.push(Layer::Grain {
                opacity,
                uri: params.grain_type.data_uri(opacity),
            });
        }

        Ok(Self {
            layers,
            background,
            blend_mode: params.blend_mode,
        })
    }

    /// Radial layers in paint order.
    pub fn radial_layers(&self) -> impl Iterator<Item = &RadialLayer> {
        self.layers.iter().filter_map(|layer| match layer {
            Layer::Radial(radial) => Some(radial),
            _ => None,
        })
    }

    /// CSS `background-image` value. CSS lists the topmost layer first, so
    /// this walks the paint order backwards.
    pub fn to_css(&self) -> String {
        self.layers
            .iter()
            .rev()
            .map(Layer::to_css)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Full `background` shorthand including the solid fill.
    pub fn to_background(&self) -> String {
        format!("{}, {}", self.to_css(), self.background)
    }

    /// CSS `background-blend-mode` value, one entry per layer of [`to_css`](Self::to_css).
    pub fn to_blend_modes(&self) -> String {
        self.layers
            .iter()
            .rev()
            .map(|layer| layer.blend_mode(self.blend_mode).to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Declarations reproducing the raster output on an element.
    pub fn to_style(&self) -> String {
        format!(
            "background: {}; background-blend-mode: {};",
            self.to_background(),
            self.to_blend_modes()
        )
    }
}

/// Format with at most two decimals and no trailing zeros.
fn fmt_num(value: f32) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    let text = format!("{rounded:.2}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::GrainType;

    fn hex(s: &str) -> HexColor {
        HexColor::parse(s).unwrap()
    }

    fn points() -> Vec<MeshPoint> {
        vec![
            MeshPoint::new(0.0, 0.0, hex("#ff0000")),
            MeshPoint::new(100.0, 100.0, hex("#0000ff")),
        ]
    }

    #[test]
    fn css_lists_first_point_on_top() {
        let descriptor = GradientDescriptor::build(&points(), &EffectParameters::default()).unwrap();
        assert_eq!(
            descriptor.to_css(),
            "radial-gradient(circle at 0% 0%, #ff0000 0px, transparent 60%), \
             radial-gradient(circle at 100% 100%, #0000ff 0px, transparent 60%)"
        );
        // paint order is reversed relative to the point list
        let first = descriptor.radial_layers().next().unwrap();
        assert_eq!(first.color, hex("#0000ff"));
    }

    #[test]
    fn vignette_and_grain_sit_above_points() {
        let params = EffectParameters {
            vignette: 0.4,
            grain: 0.25,
            grain_type: GrainType::Paper,
            ..EffectParameters::default()
        };
        let descriptor = GradientDescriptor::build(&points(), &params).unwrap();
        assert_eq!(descriptor.layers.len(), 4);
        let css = descriptor.to_css();
        assert!(css.starts_with("url(\"data:image/svg+xml;base64,"));
        assert!(css.contains("rgba(0, 0, 0, 0.4) 100%"));
        assert!(css.find("rgba").unwrap() < css.find("#ff0000").unwrap());
    }

    #[test]
    fn blend_modes_follow_each_layer() {
        let params = EffectParameters {
            vignette: 0.4,
            grain: 0.6,
            blend_mode: BlendMode::Multiply,
            ..EffectParameters::default()
        };
        let descriptor = GradientDescriptor::build(&points(), &params).unwrap();
        assert_eq!(
            descriptor.to_blend_modes(),
            "overlay, normal, multiply, multiply"
        );
        let style = descriptor.to_style();
        assert!(style.starts_with("background: url(\"data:image/svg+xml;base64,"));
        assert!(style.ends_with("; background-blend-mode: overlay, normal, multiply, multiply;"));

        let plain = GradientDescriptor::build(&points(), &EffectParameters::default()).unwrap();
        assert_eq!(plain.to_blend_modes(), "normal, normal");
    }

    #[test]
    fn reach_extends_to_the_farthest_corner() {
        let layer = |x, y| RadialLayer {
            x,
            y,
            color: HexColor::WHITE,
            stop: 40.0,
        };
        assert!((layer(50.0, 50.0).reach(100.0, 100.0) - 28.284).abs() < 0.01);
        assert!((layer(0.0, 0.0).reach(100.0, 100.0) - 56.569).abs() < 0.01);
        // wide canvas, farthest corner 111.8 px from the center
        assert!((layer(50.0, 50.0).reach(200.0, 100.0) - 44.721).abs() < 0.01);
    }

    #[test]
    fn zero_effects_add_no_layers() {
        let descriptor = GradientDescriptor::build(&points(), &EffectParameters::default()).unwrap();
        assert!(descriptor.layers.iter().all(|l| matches!(l, Layer::Radial(_))));
    }

    #[test]
    fn point_influence_is_clamped_in_stop() {
        let mut pts = points();
        pts[0].influence = Some(2.0);
        pts[1].influence = Some(300.0);
        let descriptor = GradientDescriptor::build(&pts, &EffectParameters::default()).unwrap();
        let stops: Vec<f32> = descriptor.radial_layers().map(|l| l.stop).collect();
        assert_eq!(stops, vec![100.0, 5.0]);
    }

    #[test]
    fn background_is_perceptual_centroid() {
        let descriptor = GradientDescriptor::build(&points(), &EffectParameters::default()).unwrap();
        let expected = crate::color::mix(hex("#ff0000"), hex("#0000ff"), 0.5).unwrap();
        assert_eq!(descriptor.background, expected);
        assert!(descriptor.to_background().ends_with(&expected.to_string()));
    }

    #[test]
    fn empty_mesh_is_rejected() {
        assert!(matches!(
            GradientDescriptor::build(&[], &EffectParameters::default()),
            Err(GradientError::InvalidParameter(_))
        ));
    }

    #[test]
    fn numbers_are_trimmed() {
        assert_eq!(fmt_num(33.333_332), "33.33");
        assert_eq!(fmt_num(50.0), "50");
        assert_eq!(fmt_num(0.25), "0.25");
    }
}
