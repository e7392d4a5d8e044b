//! Validation helpers for DTOs.

use validator::ValidationError;

use crate::color::HexColor;

/// Validates that a color is a 3- or 6-digit hex string, with or without `#`.
///
/// # Examples
///
/// ```ignore
/// validate_hex_color("#3a7bd5") // Ok
/// validate_hex_color("fff")     // Ok
/// validate_hex_color("#12345")  // Err - five digits
/// ```
pub fn validate_hex_color(color: &str) -> Result<(), ValidationError> {
    HexColor::parse(color).map(|_| ()).map_err(|err| {
        let mut error = ValidationError::new("hex_color");
        error.message = Some(err.to_string().into());
        error
    })
}

/// Validates every entry of a color list with [`validate_hex_color`].
pub fn validate_hex_colors(colors: &[String]) -> Result<(), ValidationError> {
    for (index, color) in colors.iter().enumerate() {
        if let Err(mut error) = validate_hex_color(color) {
            error.add_param("index".into(), &index);
            return Err(error);
        }
    }
    Ok(())
}
