//! Application-level configuration loading, including the built-in palette set.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::{info, warn};

use crate::{
    color::{HexColor, PaletteSet, PaletteShade},
    mesh::DEFAULT_MIRROR_TOLERANCE,
    render::EffectParameters,
};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "PRISM_BACK_CONFIG_PATH";

const DEFAULT_MAX_DENSITY: u8 = 5;
const DEFAULT_MAX_RASTER_SIZE: u32 = 4096;
const DEFAULT_ANIMATION_FPS: u32 = 30;
/// Upper bound on the frame stream rate, whatever the file says.
const MAX_ANIMATION_FPS: u32 = 60;

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    palettes: PaletteSet,
    defaults: EffectParameters,
    mirror_tolerance: f32,
    max_density: u8,
    max_raster_size: u32,
    animation_fps: u32,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to baked-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        families = app_config.palettes.families().len(),
                        max_density = app_config.max_density,
                        "loaded configuration"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Palette families offered to new sessions.
    pub fn palettes(&self) -> &PaletteSet {
        &self.palettes
    }

    /// Effect parameters a new session starts with.
    pub fn defaults(&self) -> EffectParameters {
        self.defaults
    }

    pub fn mirror_tolerance(&self) -> f32 {
        self.mirror_tolerance
    }

    pub fn max_density(&self) -> u8 {
        self.max_density
    }

    pub fn max_raster_size(&self) -> u32 {
        self.max_raster_size
    }

    pub fn animation_fps(&self) -> u32 {
        self.animation_fps
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            palettes: default_palettes(),
            defaults: EffectParameters::default(),
            mirror_tolerance: DEFAULT_MIRROR_TOLERANCE,
            max_density: DEFAULT_MAX_DENSITY,
            max_raster_size: DEFAULT_MAX_RASTER_SIZE,
            animation_fps: DEFAULT_ANIMATION_FPS,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    palettes: Option<PaletteSet>,
    defaults: Option<EffectParameters>,
    mirror_tolerance: Option<f32>,
    max_density: Option<u8>,
    max_raster_size: Option<u32>,
    animation_fps: Option<u32>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let fallback = AppConfig::default();

        let palettes = value
            .palettes
            .filter(|palettes| !palettes.is_empty())
            .unwrap_or(fallback.palettes);
        let defaults = match value.defaults {
            Some(defaults) => match defaults.validate() {
                Ok(()) => defaults,
                Err(err) => {
                    warn!(error = %err, "ignoring invalid default effect parameters");
                    fallback.defaults
                }
            },
            None => fallback.defaults,
        };
        let mirror_tolerance = value
            .mirror_tolerance
            .filter(|tolerance| tolerance.is_finite() && *tolerance >= 0.0)
            .unwrap_or(fallback.mirror_tolerance);

        Self {
            palettes,
            defaults,
            mirror_tolerance,
            max_density: value.max_density.unwrap_or(fallback.max_density).max(2),
            max_raster_size: value
                .max_raster_size
                .unwrap_or(fallback.max_raster_size)
                .max(1),
            animation_fps: value
                .animation_fps
                .unwrap_or(fallback.animation_fps)
                .clamp(1, MAX_ANIMATION_FPS),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[allow(clippy::cast_possible_truncation)]
const fn rgb(value: u32) -> HexColor {
    HexColor::new((value >> 16) as u8, (value >> 8) as u8, value as u8)
}

/// Built-in palette families shipped with the binary, shades 100 to 900.
fn default_palettes() -> PaletteSet {
    const FAMILIES: [(&str, [u32; 9]); 5] = [
        (
            "rose",
            [
                0xffe4e6, 0xfecdd3, 0xfda4af, 0xfb7185, 0xf43f5e, 0xe11d48, 0xbe123c, 0x9f1239,
                0x881337,
            ],
        ),
        (
            "violet",
            [
                0xede9fe, 0xddd6fe, 0xc4b5fd, 0xa78bfa, 0x8b5cf6, 0x7c3aed, 0x6d28d9, 0x5b21b6,
                0x4c1d95,
            ],
        ),
        (
            "sky",
            [
                0xe0f2fe, 0xbae6fd, 0x7dd3fc, 0x38bdf8, 0x0ea5e9, 0x0284c7, 0x0369a1, 0x075985,
                0x0c4a6e,
            ],
        ),
        (
            "emerald",
            [
                0xd1fae5, 0xa7f3d0, 0x6ee7b7, 0x34d399, 0x10b981, 0x059669, 0x047857, 0x065f46,
                0x064e3b,
            ],
        ),
        (
            "amber",
            [
                0xfef3c7, 0xfde68a, 0xfcd34d, 0xfbbf24, 0xf59e0b, 0xd97706, 0xb45309, 0x92400e,
                0x78350f,
            ],
        ),
    ];

    let families: IndexMap<String, Vec<PaletteShade>> = FAMILIES
        .iter()
        .map(|(name, values)| {
            let shades = values
                .iter()
                .zip((100u16..=900).step_by(100))
                .map(|(value, shade)| PaletteShade {
                    shade,
                    value: rgb(*value),
                })
                .collect();
            ((*name).to_string(), shades)
        })
        .collect();
    PaletteSet::new(families)
}
