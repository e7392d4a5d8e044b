//! Gradient renderer: turns a point set plus effect parameters into a vector
//! descriptor or a raster image.

pub mod descriptor;
pub mod grain;
pub mod params;
pub mod raster;

pub use descriptor::{GradientDescriptor, Layer, RadialLayer};
pub use grain::GrainType;
pub use params::EffectParameters;
pub use raster::{RasterImage, RasterSize, rasterize};
