use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: vehicle type string → Color32
// ---------------------------------------------------------------------------

/// Maps the distinct vehicle type strings of the loaded dataset to distinct
/// colours, so the type-breakdown chart keeps stable colours per type.
#[derive(Debug, Clone, Default)]
pub struct TypeColorMap {
    mapping: BTreeMap<String, Color32>,
}

impl TypeColorMap {
    /// Build a colour map from the dataset's distinct type strings.
    pub fn new(types: &[String]) -> Self {
        let palette = generate_palette(types.len());
        let mapping: BTreeMap<String, Color32> = types
            .iter()
            .cloned()
            .zip(palette.into_iter())
            .collect();
        TypeColorMap { mapping }
    }

    /// Look up the colour for a type string; unknown types render grey.
    pub fn color_for(&self, type_name: &str) -> Color32 {
        self.mapping
            .get(type_name)
            .copied()
            .unwrap_or(Color32::GRAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size_and_distinct_colors() {
        let palette = generate_palette(6);
        assert_eq!(palette.len(), 6);
        for (i, a) in palette.iter().enumerate() {
            for b in &palette[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn unknown_type_falls_back_to_grey() {
        let map = TypeColorMap::new(&["Battery Electric Vehicle (BEV)".to_string()]);
        assert_eq!(map.color_for("Unheard Of"), Color32::GRAY);
    }
}
