use serde::{Deserialize, Serialize};

use super::{BackgroundGradient, GradientStop, Rgb, Rgba, ThemeColor};

/// Track mood inferred from title/artist keywords. Each mood maps to a fixed
/// hand-tuned palette that takes precedence over hash-derived colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Passionate,
    Romantic,
    Melancholy,
    Energetic,
    Mysterious,
    Dreamy,
    Nostalgic,
    Pure,
}

/// Keyword table checked in order; the first mood with a matching keyword
/// wins, so overlapping vocabulary ("梦"/"dream" appears under both
/// Mysterious and Dreamy) resolves to the earlier entry.
pub(crate) const MOOD_KEYWORDS: &[(Mood, &[&str])] = &[
    (
        Mood::Passionate,
        &["摇滚", "rock", "电子", "electronic", "热血", "激情", "fire", "burn"],
    ),
    (
        Mood::Romantic,
        &["爱", "love", "情", "heart", "浪漫", "romantic", "恋", "kiss", "亲爱的"],
    ),
    (
        Mood::Melancholy,
        &[
            "伤", "sad", "泪", "cry", "别", "goodbye", "离", "leave", "孤独", "lonely", "想念",
        ],
    ),
    (
        Mood::Energetic,
        &["舞", "dance", "快乐", "happy", "狂欢", "party", "活力", "energy", "jump"],
    ),
    (
        Mood::Mysterious,
        &["夜", "night", "梦", "dream", "神秘", "mystery", "shadow", "dark"],
    ),
    (
        Mood::Dreamy,
        &["云", "cloud", "星", "star", "天空", "sky", "梦", "dream", "幻想"],
    ),
    (
        Mood::Nostalgic,
        &["老", "old", "经典", "classic", "回忆", "memory", "岁月", "year", "爵士", "jazz"],
    ),
    (
        Mood::Pure,
        &["钢琴", "piano", "小提琴", "violin", "纯音乐", "instrumental", "安静", "quiet"],
    ),
];

pub(crate) const PRESET_COUNT: u32 = 8;

fn build(
    primary: &str,
    rgb: (u8, u8, u8),
    secondary: &str,
    glow_alpha: f32,
    stops: &[(&str, u8)],
    hue: u32,
    mood: Option<Mood>,
) -> ThemeColor {
    let primary_rgb = Rgb {
        r: rgb.0,
        g: rgb.1,
        b: rgb.2,
    };
    ThemeColor {
        primary: primary.to_string(),
        primary_rgb,
        secondary: secondary.to_string(),
        gradient: BackgroundGradient {
            angle_deg: 135,
            stops: stops
                .iter()
                .map(|&(color, position)| GradientStop {
                    color: color.to_string(),
                    position,
                })
                .collect(),
        },
        glow_strong: Rgba {
            r: primary_rgb.r,
            g: primary_rgb.g,
            b: primary_rgb.b,
            a: glow_alpha,
        },
        hue,
        mood,
    }
}

pub(crate) fn mood_palette(mood: Mood) -> ThemeColor {
    match mood {
        Mood::Passionate => build(
            "#ef4444",
            (239, 68, 68),
            "#f97316",
            0.7,
            &[("#450a0a", 0), ("#7f1d1d", 50), ("#451a03", 100)],
            0,
            Some(mood),
        ),
        Mood::Romantic => build(
            "#ec4899",
            (236, 72, 153),
            "#fb7185",
            0.7,
            &[("#500724", 0), ("#831843", 50), ("#881337", 100)],
            330,
            Some(mood),
        ),
        Mood::Melancholy => build(
            "#7c3aed",
            (124, 58, 237),
            "#4f46e5",
            0.7,
            &[("#1e1b4b", 0), ("#312e81", 50), ("#2e1065", 100)],
            258,
            Some(mood),
        ),
        Mood::Energetic => build(
            "#10b981",
            (16, 185, 129),
            "#eab308",
            0.7,
            &[("#022c22", 0), ("#064e3b", 50), ("#422006", 100)],
            160,
            Some(mood),
        ),
        Mood::Mysterious => build(
            "#6b21a8",
            (107, 33, 168),
            "#1e40af",
            0.7,
            &[("#1e1b4b", 0), ("#312e81", 50), ("#172554", 100)],
            275,
            Some(mood),
        ),
        Mood::Dreamy => build(
            "#06b6d4",
            (6, 182, 212),
            "#22d3ee",
            0.7,
            &[("#0f172a", 0), ("#164e63", 50), ("#155e75", 100)],
            187,
            Some(mood),
        ),
        Mood::Nostalgic => build(
            "#a16207",
            (161, 98, 7),
            "#d97706",
            0.7,
            &[("#1c1917", 0), ("#292524", 50), ("#451a03", 100)],
            42,
            Some(mood),
        ),
        Mood::Pure => build(
            "#94a3b8",
            (148, 163, 184),
            "#93c5fd",
            0.6,
            &[("#0f172a", 0), ("#1e293b", 50), ("#1e3a8a", 100)],
            215,
            Some(mood),
        ),
    }
}

/// Preset palettes indexed by seed hash. Hue is supplied by the caller since
/// it is derived from the hash rather than stored with the palette.
pub(crate) fn preset_palette(index: u32, hue: u32) -> ThemeColor {
    match index % PRESET_COUNT {
        // Cyber neon - cyan/violet
        0 => build(
            "#22d3ee",
            (34, 211, 238),
            "#a855f7",
            0.8,
            &[("#0f172a", 0), ("#312e81", 100)],
            hue,
            None,
        ),
        // Midnight gold
        1 => build(
            "#fbbf24",
            (251, 191, 36),
            "#f59e0b",
            0.6,
            &[("#1c1917", 0), ("#451a03", 100)],
            hue,
            None,
        ),
        // Aurora - green/blue
        2 => build(
            "#34d399",
            (52, 211, 153),
            "#2dd4bf",
            0.6,
            &[("#022c22", 0), ("#115e59", 100)],
            hue,
            None,
        ),
        // Scarlet - red/dark red
        3 => build(
            "#f87171",
            (248, 113, 113),
            "#ef4444",
            0.6,
            &[("#450a0a", 0), ("#7f1d1d", 100)],
            hue,
            None,
        ),
        // Deep ocean
        4 => build(
            "#60a5fa",
            (96, 165, 250),
            "#3b82f6",
            0.6,
            &[("#172554", 0), ("#1e3a8a", 100)],
            hue,
            None,
        ),
        // Dreamy violet
        5 => build(
            "#c084fc",
            (192, 132, 252),
            "#e879f9",
            0.6,
            &[("#2e1065", 0), ("#4c1d95", 100)],
            hue,
            None,
        ),
        // Golden era - gold/amber
        6 => build(
            "#f59e0b",
            (245, 158, 11),
            "#fbbf24",
            0.7,
            &[("#1c1917", 0), ("#292524", 50), ("#422006", 100)],
            hue,
            None,
        ),
        // Jade mist - teal/cyan
        _ => build(
            "#14b8a6",
            (20, 184, 166),
            "#2dd4bf",
            0.7,
            &[("#042f2e", 0), ("#134e4a", 50), ("#164e63", 100)],
            hue,
            None,
        ),
    }
}

/// Theme used for the empty or "default" seed, in every mode.
pub(crate) fn fallback() -> ThemeColor {
    preset_palette(0, 187)
}
