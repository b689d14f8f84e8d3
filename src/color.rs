use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::YesNo;

// ---------------------------------------------------------------------------
// Fixed colours for the closed category sets
// ---------------------------------------------------------------------------

pub const STAYED: Color32 = Color32::from_rgb(0x2c, 0xa0, 0x2c);
pub const LEFT: Color32 = Color32::from_rgb(0xd6, 0x27, 0x28);

/// Colours for the first two gender bars; further categories use the palette.
const GENDER: [Color32; 2] = [
    Color32::from_rgb(0x1f, 0x77, 0xb4),
    Color32::from_rgb(0xff, 0x7f, 0x0e),
];

/// Colour for an attrition value: green for stayed, red for left.
pub fn attrition_color(value: YesNo) -> Color32 {
    match value {
        YesNo::No => STAYED,
        YesNo::Yes => LEFT,
    }
}

/// Colour of the `index`-th bar in a chart with `n` gender categories.
pub fn gender_color(index: usize, n: usize) -> Color32 {
    GENDER
        .get(index)
        .copied()
        .unwrap_or_else(|| category_color(index, n))
}

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n).map(|i| category_color(i, n)).collect()
}

/// The `index`-th of `n` evenly spaced hues.
pub fn category_color(index: usize, n: usize) -> Color32 {
    let hue = (index as f32 / n.max(1) as f32) * 360.0;
    let hsl = Hsl::new(hue, 0.75, 0.55);
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}
