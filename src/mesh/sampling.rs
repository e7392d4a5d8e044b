//! Color sampling from an uploaded image, used by the image import.

use image::{GenericImageView, RgbImage};

use crate::{color::HexColor, error::GradientError};

/// Sampling window half-width as a fraction of the shorter image side.
const WINDOW_FRACTION: f32 = 0.02;

/// Decode `bytes` and return the average color around each relative position.
///
/// Positions use the mesh's 0–100 plane; each one maps onto the image and is
/// averaged over a small square window so a single noisy pixel does not
/// decide the color.
pub fn sample_image_colors(
    bytes: &[u8],
    positions: &[(f32, f32)],
) -> Result<Vec<HexColor>, GradientError> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|err| GradientError::InvalidParameter(format!("cannot decode image: {err}")))?;
    let (width, height) = decoded.dimensions();
    if width == 0 || height == 0 {
        return Err(GradientError::InvalidParameter("image has no pixels".into()));
    }
    let rgb = decoded.to_rgb8();

    Ok(positions
        .iter()
        .map(|&(x, y)| average_around(&rgb, x, y))
        .collect())
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn average_around(image: &RgbImage, x: f32, y: f32) -> HexColor {
    let (width, height) = image.dimensions();
    let to_pixel = |relative: f32, extent: u32| -> u32 {
        let relative = if relative.is_finite() { relative.clamp(0.0, 100.0) } else { 50.0 };
        ((relative / 100.0 * (extent - 1) as f32).round() as u32).min(extent - 1)
    };
    let (cx, cy) = (to_pixel(x, width), to_pixel(y, height));
    let radius = ((width.min(height) as f32 * WINDOW_FRACTION).round() as u32).max(1);

    let (x0, x1) = (cx.saturating_sub(radius), (cx + radius).min(width - 1));
    let (y0, y1) = (cy.saturating_sub(radius), (cy + radius).min(height - 1));

    let mut sums = [0u64; 3];
    let mut count = 0u64;
    for py in y0..=y1 {
        for px in x0..=x1 {
            let pixel = image.get_pixel(px, py);
            for (sum, channel) in sums.iter_mut().zip(pixel.0) {
                *sum += u64::from(channel);
            }
            count += 1;
        }
    }

    let [r, g, b] = sums.map(|sum| ((sum + count / 2) / count) as u8);
    HexColor::new(r, g, b)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::{ImageFormat, Rgb};

    use super::*;

    fn encode(image: &RgbImage) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        image.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    fn quadrants() -> Vec<u8> {
        let image = RgbImage::from_fn(100, 100, |x, y| match (x < 50, y < 50) {
            (true, true) => Rgb([255, 0, 0]),
            (false, true) => Rgb([0, 255, 0]),
            (true, false) => Rgb([0, 0, 255]),
            (false, false) => Rgb([255, 255, 255]),
        });
        encode(&image)
    }

    #[test]
    fn samples_each_quadrant() {
        let colors = sample_image_colors(
            &quadrants(),
            &[(10.0, 10.0), (90.0, 10.0), (10.0, 90.0), (90.0, 90.0)],
        )
        .unwrap();
        assert_eq!(
            colors,
            vec![
                HexColor::new(255, 0, 0),
                HexColor::new(0, 255, 0),
                HexColor::new(0, 0, 255),
                HexColor::WHITE,
            ]
        );
    }

    #[test]
    fn window_averages_across_edges() {
        let colors = sample_image_colors(&quadrants(), &[(50.0, 25.0)]).unwrap();
        let [r, g, _] = colors[0].channels();
        assert!(r > 0 && g > 0, "expected a red/green mix, got {}", colors[0]);
    }

    #[test]
    fn corner_positions_stay_inside_image() {
        let single = encode(&RgbImage::from_pixel(1, 1, Rgb([10, 20, 30])));
        let colors = sample_image_colors(&single, &[(0.0, 0.0), (100.0, 100.0), (f32::NAN, 300.0)]).unwrap();
        assert!(colors.iter().all(|c| *c == HexColor::new(10, 20, 30)));
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        assert!(matches!(
            sample_image_colors(b"not an image", &[(0.0, 0.0)]),
            Err(GradientError::InvalidParameter(_))
        ));
    }
}
