//! Window badge: a two-letter label in the workspace color.

use crate::types::browser::Badge;

pub const LIGHT_TEXT: &str = "#FFFFFF";
pub const DARK_TEXT: &str = "#000000";

/// Validates a hex color string (e.g. "#2ea44f" or "#fff").
pub fn is_valid_hex_color(color: &str) -> bool {
    let Some(hex) = color.strip_prefix('#') else {
        return false;
    };
    matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
}

/// Parses `#rgb` / `#rrggbb` into its channels.
pub fn parse_hex_color(color: &str) -> Option<(u8, u8, u8)> {
    if !is_valid_hex_color(color) {
        return None;
    }
    let hex = &color[1..];
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    if hex.len() == 3 {
        let expand = |i: usize| channel(&hex[i..i + 1].repeat(2));
        Some((expand(0)?, expand(1)?, expand(2)?))
    } else {
        Some((channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?))
    }
}

/// Perceived brightness, 0..=255.
pub fn brightness(r: u8, g: u8, b: u8) -> f64 {
    0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64
}

/// Light text on dark backgrounds, dark text otherwise. Unparsable colors count as dark.
pub fn text_color_for(background: &str) -> &'static str {
    match parse_hex_color(background) {
        Some((r, g, b)) if brightness(r, g, b) >= 128.0 => DARK_TEXT,
        _ => LIGHT_TEXT,
    }
}

/// Initials of the first two words, or the first two letters of a single word.
pub fn abbreviate(name: &str) -> String {
    let words: Vec<&str> = name.split_whitespace().collect();
    let picked: String = match words.as_slice() {
        [] => String::new(),
        [single] => single.chars().take(2).collect(),
        [first, second, ..] => first.chars().take(1).chain(second.chars().take(1)).collect(),
    };
    picked.to_uppercase()
}

pub fn badge_for(name: &str, color: &str) -> Badge {
    Badge {
        text: abbreviate(name),
        background_color: color.to_string(),
        text_color: text_color_for(color).to_string(),
    }
}
