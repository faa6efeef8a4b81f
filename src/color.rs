use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Chart palette
// ---------------------------------------------------------------------------

/// Accent color shared by the trend line and highlighted UI elements.
pub const ACCENT: Color32 = Color32::from_rgb(59, 130, 246);

/// Generates an `n`-step blue ramp running dark to light, used so
/// neighboring bars and pie wedges stay distinguishable.
pub fn blue_ramp(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let t = if n == 1 { 0.0 } else { i as f32 / (n - 1) as f32 };
            let hsl = Hsl::new(221.0, 0.83, 0.33 + t * 0.52);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}
