use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Color palette generators
// ---------------------------------------------------------------------------

fn to_color32(rgb: Srgb) -> Color32 {
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

/// Generates `n` colours with evenly spaced hues at the given saturation and
/// lightness.
pub fn hue_palette(n: usize, saturation: f32, lightness: f32) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let rgb: Srgb = Hsl::new(hue, saturation, lightness).into_color();
            to_color32(rgb)
        })
        .collect()
}

/// Soft, light colours for pie slices.
pub fn pastel_palette(n: usize) -> Vec<Color32> {
    hue_palette(n, 0.65, 0.78)
}

/// Anchor points of the viridis colour map, dark purple to yellow.
const VIRIDIS: [(f32, f32, f32); 5] = [
    (0.267, 0.005, 0.329),
    (0.231, 0.322, 0.545),
    (0.129, 0.569, 0.549),
    (0.369, 0.788, 0.384),
    (0.993, 0.906, 0.144),
];

/// `n` colours sampled evenly along viridis, interpolated in linear RGB.
pub fn viridis_palette(n: usize) -> Vec<Color32> {
    let anchors: Vec<LinSrgb> = VIRIDIS
        .iter()
        .map(|&(r, g, b)| Srgb::new(r, g, b).into_linear())
        .collect();
    let segments = (anchors.len() - 1) as f32;

    (0..n)
        .map(|i| {
            let t = if n > 1 { i as f32 / (n - 1) as f32 } else { 0.5 };
            let pos = t * segments;
            let lo = (pos.floor() as usize).min(anchors.len() - 2);
            let mixed = anchors[lo].mix(anchors[lo + 1], pos - lo as f32);
            to_color32(Srgb::from_linear(mixed))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: category value → Color32
// ---------------------------------------------------------------------------

/// Maps the values of a categorical column to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl Default for ColorMap {
    fn default() -> Self {
        ColorMap {
            mapping: BTreeMap::new(),
            default_color: Color32::GRAY,
        }
    }
}

impl ColorMap {
    fn from_palette(values: &[String], palette: Vec<Color32>) -> Self {
        ColorMap {
            mapping: values.iter().cloned().zip(palette).collect(),
            ..Default::default()
        }
    }

    /// Viridis colours in the order `values` are given.
    pub fn viridis(values: &[String]) -> Self {
        Self::from_palette(values, viridis_palette(values.len()))
    }

    /// Pastel colours in the order `values` are given.
    pub fn pastel(values: &[String]) -> Self {
        Self::from_palette(values, pastel_palette(values.len()))
    }

    /// Look up the colour for a given value.
    pub fn color_for(&self, value: &str) -> Color32 {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }
}
