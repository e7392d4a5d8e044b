use serde::{Deserialize, Serialize};

use crate::{
    animation::MotionProfile,
    color::BlendMode,
    error::GradientError,
    mesh::MeshPoint,
    render::GrainType,
};

/// Lower bound of the effective influence used when rendering.
pub const MIN_INFLUENCE: f32 = 5.0;
/// Upper bound of the effective influence used when rendering.
pub const MAX_INFLUENCE: f32 = 100.0;

/// Session-wide render and animation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectParameters {
    /// Global spread radius in percent, overridable per point.
    pub influence: f32,
    /// Vignette strength; `0` disables the layer.
    pub vignette: f32,
    /// Grain opacity; `0` disables the overlay.
    pub grain: f32,
    pub grain_type: GrainType,
    pub blend_mode: BlendMode,
    /// Multiplier applied to elapsed animation time.
    pub animation_speed: f32,
    pub motion: MotionProfile,
    /// Pull points toward the pointer while animating.
    pub magnetism: bool,
}

impl Default for EffectParameters {
    fn default() -> Self {
        Self {
            influence: 60.0,
            vignette: 0.0,
            grain: 0.0,
            grain_type: GrainType::default(),
            blend_mode: BlendMode::default(),
            animation_speed: 1.0,
            motion: MotionProfile::default(),
            magnetism: false,
        }
    }
}

impl EffectParameters {
    /// Reject values outside the documented ranges.
    pub fn validate(&self) -> Result<(), GradientError> {
        check_range("influence", self.influence, 0.0, 100.0)?;
        check_range("vignette", self.vignette, 0.0, 1.0)?;
        check_range("grain", self.grain, 0.0, 1.0)?;
        if !self.animation_speed.is_finite() || self.animation_speed <= 0.0 {
            return Err(GradientError::InvalidParameter(format!(
                "animation_speed must be positive (got {})",
                self.animation_speed
            )));
        }
        Ok(())
    }

    /// The influence a point renders with: its own override or the global
    /// value, clamped to `[5, 100]`.
    pub fn effective_influence(&self, point: &MeshPoint) -> f32 {
        let raw = point.influence.unwrap_or(self.influence);
        if raw.is_finite() {
            raw.clamp(MIN_INFLUENCE, MAX_INFLUENCE)
        } else {
            self.influence.clamp(MIN_INFLUENCE, MAX_INFLUENCE)
        }
    }
}

fn check_range(name: &str, value: f32, min: f32, max: f32) -> Result<(), GradientError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(GradientError::InvalidParameter(format!(
            "{name} must be within [{min}, {max}] (got {value})"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::HexColor;

    #[test]
    fn effective_influence_prefers_point_override_and_clamps() {
        let params = EffectParameters::default();
        let mut point = MeshPoint::new(10.0, 10.0, HexColor::BLACK);
        assert_eq!(params.effective_influence(&point), 60.0);

        point.influence = Some(250.0);
        assert_eq!(params.effective_influence(&point), 100.0);
        point.influence = Some(0.0);
        assert_eq!(params.effective_influence(&point), 5.0);
        point.influence = Some(f32::NAN);
        assert_eq!(params.effective_influence(&point), 60.0);
    }

    #[test]
    fn validation_rejects_out_of_range_values() {
        assert!(EffectParameters::default().validate().is_ok());
        let too_much_grain = EffectParameters {
            grain: 1.5,
            ..EffectParameters::default()
        };
        assert!(too_much_grain.validate().is_err());
        let frozen = EffectParameters {
            animation_speed: 0.0,
            ..EffectParameters::default()
        };
        assert!(frozen.validate().is_err());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let params: EffectParameters =
            serde_json::from_str(r#"{"grain":0.3,"grain_type":"film","blend_mode":"soft-light"}"#)
                .unwrap();
        assert_eq!(params.grain_type, GrainType::Film);
        assert_eq!(params.blend_mode, BlendMode::SoftLight);
        assert_eq!(params.influence, 60.0);
    }
}
