//! Colour helpers for event chips and blocks.

/// Fallback background for events whose calendar has no colour.
pub const DEFAULT_EVENT_COLOR: &str = "#2563eb";

const DARK_TEXT: &str = "#0f172a";
const LIGHT_TEXT: &str = "#ffffff";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Parse a hex colour string.
///
/// # Arguments
/// * `hex` - `#RRGGBB` or `#RGB`, the `#` prefix is optional
///
/// # Returns
/// * `Some(Rgb)` if parsing succeeds
/// * `None` if the input is empty or invalid
pub fn parse_color(hex: &str) -> Option<Rgb> {
    let hex = hex.trim().trim_start_matches('#');
    let expanded: String = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 => hex.to_string(),
        _ => return None,
    };

    let r = u8::from_str_radix(expanded.get(0..2)?, 16).ok()?;
    let g = u8::from_str_radix(expanded.get(2..4)?, 16).ok()?;
    let b = u8::from_str_radix(expanded.get(4..6)?, 16).ok()?;

    Some(Rgb { r, g, b })
}

/// Pick a readable text colour for the given background.
pub fn text_color_for_background(color: Option<&str>) -> &'static str {
    let Some(rgb) = color.and_then(parse_color) else {
        return LIGHT_TEXT;
    };

    let luminance =
        (0.299 * rgb.r as f64 + 0.587 * rgb.g as f64 + 0.114 * rgb.b as f64) / 255.0;
    if luminance > 0.6 {
        DARK_TEXT
    } else {
        LIGHT_TEXT
    }
}
