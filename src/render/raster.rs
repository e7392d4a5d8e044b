//! Software rasterizer for a [`GradientDescriptor`].

use std::io::Cursor;

use image::{ImageFormat, Rgb, RgbImage};

use crate::{
    color::{BlendMode, HexColor, hex::quantize},
    error::GradientError,
    mesh::MeshPoint,
    render::{EffectParameters, GradientDescriptor, GrainType, Layer, descriptor::VIGNETTE_START},
};

/// Requested output size, checked against the configured limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterSize {
    width: u32,
    height: u32,
}

impl RasterSize {
    pub fn new(width: u32, height: u32, max: u32) -> Result<Self, GradientError> {
        for (name, value) in [("width", width), ("height", height)] {
            if value == 0 || value > max {
                return Err(GradientError::InvalidParameter(format!(
                    "{name} must be within 1..={max} (got {value})"
                )));
            }
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

/// Floating-point RGB canvas holding gamma-encoded channels in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    pixels: Vec<[f32; 3]>,
}

impl RasterImage {
    fn filled(size: RasterSize, color: HexColor) -> Self {
        let rgb = color.to_srgb();
        Self {
            width: size.width,
            height: size.height,
            pixels: vec![[rgb.red, rgb.green, rgb.blue]; pixel_count(size)],
        }
    }

    /// Inert white image served when a preview cannot be rendered.
    pub fn blank(size: RasterSize) -> Self {
        Self::filled(size, HexColor::WHITE)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<HexColor> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let [r, g, b] = self.pixels[self.index(x, y)];
        Some(HexColor::new(quantize(r), quantize(g), quantize(b)))
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Encode as a lossless 8-bit RGB PNG.
    pub fn encode_png(&self) -> Result<Vec<u8>, GradientError> {
        let image = RgbImage::from_fn(self.width, self.height, |x, y| {
            let [r, g, b] = self.pixels[self.index(x, y)];
            Rgb([quantize(r), quantize(g), quantize(b)])
        });
        let mut out = Cursor::new(Vec::new());
        image
            .write_to(&mut out, ImageFormat::Png)
            .map_err(|err| GradientError::Render(format!("png encode failed: {err}")))?;
        Ok(out.into_inner())
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn draw_falloff(&mut self, cx: f32, cy: f32, radius: f32, color: [f32; 3], mode: BlendMode) {
        if radius <= 0.0 {
            return;
        }
        let x0 = (cx - radius).floor().max(0.0) as u32;
        let y0 = (cy - radius).floor().max(0.0) as u32;
        let x1 = ((cx + radius).ceil() as u32).min(self.width - 1);
        let y1 = ((cy + radius).ceil() as u32).min(self.height - 1);
        if x0 > x1 || y0 > y1 {
            return;
        }

        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                let alpha = 1.0 - dx.hypot(dy) / radius;
                if alpha <= 0.0 {
                    continue;
                }
                let index = self.index(x, y);
                self.pixels[index] = mode.composite(self.pixels[index], color, alpha);
            }
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn apply_vignette(&mut self, strength: f32, mode: BlendMode) {
        let (cx, cy) = (self.width as f32 / 2.0, self.height as f32 / 2.0);
        let half_diagonal = cx.hypot(cy);
        for y in 0..self.height {
            for x in 0..self.width {
                let distance = (x as f32 + 0.5 - cx).hypot(y as f32 + 0.5 - cy) / half_diagonal;
                let ramp = ((distance - VIGNETTE_START) / (1.0 - VIGNETTE_START)).clamp(0.0, 1.0);
                if ramp > 0.0 {
                    let index = self.index(x, y);
                    self.pixels[index] =
                        mode.composite(self.pixels[index], [0.0; 3], ramp * strength);
                }
            }
        }
    }

    fn apply_grain(&mut self, grain: GrainType, opacity: f32, mode: BlendMode) {
        for y in 0..self.height {
            for x in 0..self.width {
                let value = grain.sample(x, y);
                let index = self.index(x, y);
                self.pixels[index] = mode.composite(self.pixels[index], [value; 3], opacity);
            }
        }
    }
}

fn pixel_count(size: RasterSize) -> usize {
    size.width as usize * size.height as usize
}

/// Draw `points` into a `size` canvas.
///
/// The descriptor's layers are drawn in paint order over its solid fill, each
/// with the operator the CSS output declares for it. A point becomes a circle
/// fading linearly from full color to nothing at [`RadialLayer::reach`], the
/// same geometry as its CSS `radial-gradient`.
///
/// [`RadialLayer::reach`]: crate::render::RadialLayer::reach
#[allow(clippy::cast_precision_loss)]
pub fn rasterize(
    points: &[MeshPoint],
    params: &EffectParameters,
    size: RasterSize,
) -> Result<RasterImage, GradientError> {
    let descriptor = GradientDescriptor::build(points, params)?;
    let mut canvas = RasterImage::filled(size, descriptor.background);

    let (width, height) = (size.width as f32, size.height as f32);
    for layer in &descriptor.layers {
        let mode = layer.blend_mode(descriptor.blend_mode);
        match layer {
            Layer::Radial(radial) => {
                let rgb = radial.color.to_srgb();
                canvas.draw_falloff(
                    radial.x / 100.0 * width,
                    radial.y / 100.0 * height,
                    radial.reach(width, height),
                    [rgb.red, rgb.green, rgb.blue],
                    mode,
                );
            }
            Layer::Vignette { strength } => canvas.apply_vignette(*strength, mode),
            Layer::Grain { opacity, .. } => canvas.apply_grain(params.grain_type, *opacity, mode),
        }
    }
    Ok(canvas)
}
