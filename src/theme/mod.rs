//! Deterministic track theming.
//!
//! A track's identity string ("artist-title") is reduced to a color theme in
//! one of two modes: `Preset` picks from a fixed palette table (with a mood
//! keyword lookup taking precedence), `Dynamic` maps the seed hash directly
//! into HSL space. Both paths are pure functions of the seed.

mod palette;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub use palette::Mood;

/// Opaque color components of the primary color, for translucent compositing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Parse a `#rrggbb` hex color. Returns `None` on malformed input.
    pub fn from_hex(hex: &str) -> Option<Rgb> {
        let digits = hex.strip_prefix('#')?;
        if digits.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
        let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
        let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
        Some(Rgb { r, g, b })
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// A color with an alpha channel, used for glows and translucent fills.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub fn from_rgb(rgb: Rgb, a: f32) -> Rgba {
        Rgba {
            r: rgb.r,
            g: rgb.g,
            b: rgb.b,
            a,
        }
    }

    pub fn with_alpha(self, a: f32) -> Rgba {
        Rgba { a, ..self }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub color: String,
    /// Stop position in percent along the gradient axis.
    pub position: u8,
}

/// Background gradient descriptor. Rendering (CSS, shader, whatever) is up
/// to the consumer; this is just the ordered stop list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundGradient {
    pub angle_deg: u16,
    pub stops: Vec<GradientStop>,
}

/// Visual theme derived from a track seed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeColor {
    pub primary: String,
    pub primary_rgb: Rgb,
    pub secondary: String,
    pub gradient: BackgroundGradient,
    pub glow_strong: Rgba,
    /// HSL hue angle of the primary color, 0-359.
    pub hue: u32,
    pub mood: Option<Mood>,
}

/// Theme generation mode. `Preset` (the default) consults the mood keyword
/// table first and falls back to the fixed palette table; `Dynamic` derives
/// colors directly from the seed hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeMode {
    Preset,
    Dynamic,
}

impl Default for ThemeMode {
    fn default() -> Self {
        ThemeMode::Preset
    }
}

/// djb2-xor string hash over UTF-16 code units, 32-bit wrapping.
///
/// Hashing code units rather than bytes keeps CJK seeds stable against any
/// future re-encoding of the seed source.
pub fn hash_seed(seed: &str) -> u32 {
    let mut hash: u32 = 5381;
    for unit in seed.encode_utf16() {
        hash = hash.wrapping_mul(33) ^ u32::from(unit);
    }
    hash
}

/// HSL to RGB, hue in [0,360), saturation and lightness in [0,100].
fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> Rgb {
    let s = saturation / 100.0;
    let l = lightness / 100.0;

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((hue / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = match hue {
        h if h < 60.0 => (c, x, 0.0),
        h if h < 120.0 => (x, c, 0.0),
        h if h < 180.0 => (0.0, c, x),
        h if h < 240.0 => (0.0, x, c),
        h if h < 300.0 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let channel = |n: f32| ((n + m) * 255.0).round() as u8;
    Rgb {
        r: channel(r),
        g: channel(g),
        b: channel(b),
    }
}

fn hsl_to_hex(hue: f32, saturation: f32, lightness: f32) -> String {
    hsl_to_rgb(hue, saturation, lightness).to_hex()
}

/// Hash-derived HSL theme. Saturation is clamped into 60-79% and lightness
/// into 50-64% so primaries never collapse toward black or white.
fn dynamic_theme(seed: &str) -> ThemeColor {
    let hash = hash_seed(seed);

    let hue = hash % 360;
    let saturation = (60 + hash % 20) as f32;
    let lightness = (50 + (hash >> 8) % 15) as f32;

    let primary_rgb = hsl_to_rgb(hue as f32, saturation, lightness);
    let primary = primary_rgb.to_hex();
    let secondary = hsl_to_hex(((hue + 30) % 360) as f32, saturation, lightness - 10.0);

    // Background runs complementary hues at low lightness.
    let bg_hue1 = ((hue + 180) % 360) as f32;
    let bg_hue2 = ((hue + 210) % 360) as f32;
    let gradient = BackgroundGradient {
        angle_deg: 135,
        stops: vec![
            GradientStop {
                color: hsl_to_hex(bg_hue1, 30.0, 10.0),
                position: 0,
            },
            GradientStop {
                color: hsl_to_hex(bg_hue2, 40.0, 15.0),
                position: 50,
            },
            GradientStop {
                color: hsl_to_hex(hue as f32, 50.0, 20.0),
                position: 100,
            },
        ],
    };

    ThemeColor {
        primary,
        primary_rgb,
        secondary,
        gradient,
        glow_strong: Rgba::from_rgb(primary_rgb, 0.7),
        hue,
        mood: None,
    }
}

/// Match the seed's artist/title text against the mood keyword table.
/// Case-insensitive substring match, first mood in table order wins.
fn infer_mood(title: &str, artist: &str) -> Option<Mood> {
    let text = format!("{} {}", title, artist).to_lowercase();

    for (mood, keywords) in palette::MOOD_KEYWORDS {
        if keywords.iter().any(|kw| text.contains(kw)) {
            return Some(*mood);
        }
    }
    None
}

/// Resolve a seed string to a theme. Same seed and mode always yield the
/// same theme; the empty or `"default"` seed maps to a fixed fallback.
pub fn generate(seed: &str, mode: ThemeMode) -> ThemeColor {
    if seed.is_empty() || seed == "default" {
        return palette::fallback();
    }

    let mut parts = seed.split('-');
    let artist = parts.next().unwrap_or("");
    let title = parts.next().unwrap_or("");

    // Mood palettes take precedence over hashing, but only in preset mode.
    if mode == ThemeMode::Preset {
        if let Some(mood) = infer_mood(title, artist) {
            return palette::mood_palette(mood);
        }
    }

    match mode {
        ThemeMode::Dynamic => dynamic_theme(seed),
        ThemeMode::Preset => {
            let hash = hash_seed(seed);
            palette::preset_palette(hash % palette::PRESET_COUNT, hash % 360)
        }
    }
}

/// Memoizing theme resolver. One computation per distinct (seed, mode).
#[derive(Default)]
pub struct ThemeCache {
    themes: HashMap<(String, ThemeMode), ThemeColor>,
}

impl ThemeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, seed: &str, mode: ThemeMode) -> &ThemeColor {
        self.themes
            .entry((seed.to_string(), mode))
            .or_insert_with(|| generate(seed, mode))
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic() {
        let seeds = ["a", "hello world", "黄霄雲-光之黎明", "", "default"];
        for seed in seeds {
            assert_eq!(hash_seed(seed), hash_seed(seed));
        }
    }

    #[test]
    fn generate_is_pure() {
        for mode in [ThemeMode::Preset, ThemeMode::Dynamic] {
            let a = generate("黄霄雲-光之黎明", mode);
            let b = generate("黄霄雲-光之黎明", mode);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn default_seed_maps_to_fallback_in_every_mode() {
        let preset = generate("default", ThemeMode::Preset);
        let dynamic = generate("default", ThemeMode::Dynamic);
        let empty = generate("", ThemeMode::Preset);
        assert_eq!(preset, dynamic);
        assert_eq!(preset, empty);
        assert_eq!(preset.hue, 187);
        assert_eq!(preset.primary, "#22d3ee");
    }

    #[test]
    fn dynamic_ranges_stay_tasteful() {
        // Exercise a spread of seeds; hue/saturation/lightness must stay in
        // the clamped bands for all of them.
        let seeds = [
            "a", "b-c", "周杰伦-稻香", "x-y-z", "0", "zzzzzzzz", "αβγ-δε", "black-bird",
        ];
        for seed in seeds {
            let hash = hash_seed(seed);
            let theme = dynamic_theme(seed);
            assert!(theme.hue < 360);
            let saturation = 60 + hash % 20;
            let lightness = 50 + (hash >> 8) % 15;
            assert!((60..=80).contains(&saturation));
            assert!((50..=65).contains(&lightness));
        }
    }

    #[test]
    fn mood_keywords_override_hash_in_preset_mode() {
        let theme = generate("someone-my love", ThemeMode::Preset);
        assert_eq!(theme.mood, Some(Mood::Romantic));

        // Dynamic mode ignores the mood table entirely.
        let dynamic = generate("someone-my love", ThemeMode::Dynamic);
        assert_eq!(dynamic.mood, None);
    }

    #[test]
    fn mood_table_order_breaks_keyword_ties() {
        // "dream" appears under both Mysterious and Dreamy; Mysterious is
        // earlier in the table.
        let theme = generate("artist-a dream", ThemeMode::Preset);
        assert_eq!(theme.mood, Some(Mood::Mysterious));
    }

    #[test]
    fn preset_without_mood_uses_hash_indexed_palette() {
        let theme = generate("qqqq-wwww", ThemeMode::Preset);
        let hash = hash_seed("qqqq-wwww");
        assert_eq!(theme.hue, hash % 360);
        assert_eq!(theme.mood, None);
    }

    #[test]
    fn secondary_uses_offset_hue_at_reduced_lightness() {
        let theme = dynamic_theme("qqqq-wwww");
        let hash = hash_seed("qqqq-wwww");
        let saturation = (60 + hash % 20) as f32;
        let lightness = (50 + (hash >> 8) % 15) as f32;
        let expected = hsl_to_hex(((theme.hue + 30) % 360) as f32, saturation, lightness - 10.0);
        assert_eq!(theme.secondary, expected);
    }

    #[test]
    fn hsl_primaries_convert_exactly() {
        assert_eq!(hsl_to_hex(0.0, 100.0, 50.0), "#ff0000");
        assert_eq!(hsl_to_hex(120.0, 100.0, 50.0), "#00ff00");
        assert_eq!(hsl_to_hex(240.0, 100.0, 50.0), "#0000ff");
        assert_eq!(hsl_to_hex(0.0, 0.0, 0.0), "#000000");
        assert_eq!(hsl_to_hex(0.0, 0.0, 100.0), "#ffffff");
    }

    #[test]
    fn rgb_hex_round_trip() {
        let rgb = Rgb { r: 34, g: 211, b: 238 };
        assert_eq!(Rgb::from_hex(&rgb.to_hex()), Some(rgb));
        assert_eq!(Rgb::from_hex("#zzzzzz"), None);
        assert_eq!(Rgb::from_hex("22d3ee"), None);
    }

    #[test]
    fn cache_memoizes_by_seed_and_mode() {
        let mut cache = ThemeCache::new();
        let first = cache.get("黄霄雲-光之黎明", ThemeMode::Preset).clone();
        let second = cache.get("黄霄雲-光之黎明", ThemeMode::Preset).clone();
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);

        cache.get("黄霄雲-光之黎明", ThemeMode::Dynamic);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn glow_tracks_primary_components() {
        let theme = dynamic_theme("any-seed");
        assert_eq!(theme.glow_strong.r, theme.primary_rgb.r);
        assert_eq!(theme.glow_strong.g, theme.primary_rgb.g);
        assert_eq!(theme.glow_strong.b, theme.primary_rgb.b);
        assert!((theme.glow_strong.a - 0.7).abs() < f32::EPSILON);
    }
}
