//! Color math: canonical hex form, color-space conversion, interpolation and
//! perceptual mixing.

pub mod hex;
pub mod interpolate;
pub mod mix;
pub mod palette_set;
pub mod space;

pub use hex::HexColor;
pub use interpolate::{Duotone, Easing, duotone, interpolate, ramp};
pub use mix::{BlendMode, blend, mix, mix_many};
pub use palette_set::{PaletteSet, PaletteShade};
pub use space::{ColorSpace, from_perceptual, to_perceptual};
