use egui::Color32;

use crate::error::ColorParseError;

/// Parse `#rrggbb` or `#rrggbbaa` into an unmultiplied color
pub fn parse_hex_color(text: &str) -> Result<Color32, ColorParseError> {
    let trimmed = text.trim();
    let digits = trimmed
        .strip_prefix('#')
        .ok_or_else(|| ColorParseError::MissingHash(text.to_owned()))?;

    if digits.len() != 6 && digits.len() != 8 {
        return Err(ColorParseError::InvalidLength(text.to_owned()));
    }

    let mut channels = [255u8; 4];
    for (i, channel) in channels.iter_mut().take(digits.len() / 2).enumerate() {
        let pair = digits
            .get(i * 2..i * 2 + 2)
            .ok_or_else(|| ColorParseError::InvalidDigit(text.to_owned()))?;
        *channel = u8::from_str_radix(pair, 16)
            .map_err(|_| ColorParseError::InvalidDigit(text.to_owned()))?;
    }

    let [r, g, b, a] = channels;
    Ok(Color32::from_rgba_unmultiplied(r, g, b, a))
}

/// Convert an egui color into a tiny-skia color, scaling its alpha by `opacity`
pub fn to_skia_color(color: Color32, opacity: f32) -> tiny_skia::Color {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    let alpha = (a as f32 / 255.0 * opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    tiny_skia::Color::from_rgba8(r, g, b, alpha)
}
