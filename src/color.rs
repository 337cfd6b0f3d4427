use eframe::egui::Color32;
use palette::{named, Hsl, IntoColor, LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Fixed chart colours
// ---------------------------------------------------------------------------

/// Bars of the publications-by-year chart.
pub fn year_bars() -> Color32 {
    from_srgb8(named::SKYBLUE)
}

/// Bars of the source distribution chart.
pub fn source_bars() -> Color32 {
    from_srgb8(named::CORAL)
}

fn from_srgb8(c: Srgb<u8>) -> Color32 {
    Color32::from_rgb(c.red, c.green, c.blue)
}

fn to_color32(rgb: Srgb) -> Color32 {
    from_srgb8(rgb.into_format())
}

// ---------------------------------------------------------------------------
// Palette generators
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.45);
            to_color32(hsl.into_color())
        })
        .collect()
}

/// Stops of the viridis colour map: deep purple, teal, yellow.
const VIRIDIS_STOPS: [(u8, u8, u8); 3] = [(68, 1, 84), (33, 145, 140), (253, 231, 37)];

/// `n` colours sampled evenly along [`VIRIDIS_STOPS`], blended in linear
/// RGB. Used for ranked bars so rank reads as colour.
pub fn ranked_ramp(n: usize) -> Vec<Color32> {
    let stops: Vec<LinSrgb> = VIRIDIS_STOPS
        .iter()
        .map(|&(r, g, b)| Srgb::new(r, g, b).into_format::<f32>().into_linear())
        .collect();
    let last_segment = stops.len() - 2;

    (0..n)
        .map(|i| {
            let t = if n > 1 { i as f32 / (n - 1) as f32 } else { 0.0 };
            let scaled = t * (stops.len() - 1) as f32;
            let seg = (scaled.floor() as usize).min(last_segment);
            let lin = stops[seg].mix(stops[seg + 1], scaled - seg as f32);
            to_color32(Srgb::from_linear(lin))
        })
        .collect()
}
