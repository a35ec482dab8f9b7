//! Color themes and the position/intensity → color mapping.

/// A renderable color.
///
/// HSL saturation and lightness are percentages, hue is in degrees and may
/// exceed 360 (it wraps when converted).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    Rgba { r: u8, g: u8, b: u8, a: f32 },
    Hsl { h: f32, s: f32, l: f32 },
}

impl Color {
    /// Opaque RGB color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Rgba { r, g, b, a: 1.0 }
    }

    pub fn alpha(&self) -> f32 {
        match self {
            Color::Rgba { a, .. } => *a,
            Color::Hsl { .. } => 1.0,
        }
    }

    /// Same color with its alpha multiplied by `factor`.
    pub fn fade(self, factor: f32) -> Self {
        let (r, g, b) = self.to_rgb8();
        Color::Rgba {
            r,
            g,
            b,
            a: (self.alpha() * factor).clamp(0.0, 1.0),
        }
    }

    /// Convert to 8-bit RGB, dropping alpha.
    pub fn to_rgb8(&self) -> (u8, u8, u8) {
        match *self {
            Color::Rgba { r, g, b, .. } => (r, g, b),
            Color::Hsl { h, s, l } => hsl_to_rgb(h, s, l),
        }
    }
}

fn hsl_to_rgb(h: f32, s: f32, l: f32) -> (u8, u8, u8) {
    let h = h.rem_euclid(360.0) / 360.0;
    let s = (s / 100.0).clamp(0.0, 1.0);
    let l = (l / 100.0).clamp(0.0, 1.0);

    if s == 0.0 {
        let v = (l * 255.0).round() as u8;
        return (v, v, v);
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    let channel = |t: f32| {
        let t = t.rem_euclid(1.0);
        let v = if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 0.5 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        };
        (v * 255.0).round().clamp(0.0, 255.0) as u8
    };

    (channel(h + 1.0 / 3.0), channel(h), channel(h - 1.0 / 3.0))
}

/// A named palette (or hue sweep) used to color visual elements.
#[derive(Debug)]
pub struct ColorTheme {
    pub id: &'static str,
    pub name: &'static str,
    /// Ordered base colors, picked by element position
    pub palette: &'static [Color],
    /// Accent for bar caps
    pub highlight: Color,
    /// Shadow color for glow passes
    pub glow: Color,
    /// Sweep the hue across positions instead of using the palette
    pub hue_sweep: bool,
}

// Themes are registry constants, so identity is the id.
impl PartialEq for ColorTheme {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl ColorTheme {
    /// Horizontal gradient stops used for stroked traces.
    pub fn gradient(&self) -> Vec<(f32, Color)> {
        if self.hue_sweep {
            return (0..=6)
                .map(|i| {
                    let offset = i as f32 / 6.0;
                    (offset, Color::Hsl { h: offset * 360.0, s: 85.0, l: 60.0 })
                })
                .collect();
        }

        let last = self.palette.len().saturating_sub(1).max(1) as f32;
        self.palette
            .iter()
            .enumerate()
            .map(|(i, &c)| (i as f32 / last, c))
            .collect()
    }
}

pub const DEFAULT_THEME: &str = "neon";

/// Built-in themes. Adding a theme only needs a new entry here.
pub static THEMES: [ColorTheme; 6] = [
    ColorTheme {
        id: "neon",
        name: "Neon",
        palette: &[
            Color::rgb(0, 255, 255),
            Color::rgb(255, 0, 255),
            Color::rgb(120, 80, 255),
        ],
        highlight: Color::rgb(255, 255, 255),
        glow: Color::rgb(0, 200, 255),
        hue_sweep: false,
    },
    ColorTheme {
        id: "sunset",
        name: "Sunset",
        palette: &[
            Color::rgb(255, 94, 77),
            Color::rgb(255, 154, 0),
            Color::rgb(237, 117, 154),
        ],
        highlight: Color::rgb(255, 220, 150),
        glow: Color::rgb(255, 120, 60),
        hue_sweep: false,
    },
    ColorTheme {
        id: "ocean",
        name: "Ocean",
        palette: &[
            Color::rgb(0, 119, 182),
            Color::rgb(0, 180, 216),
            Color::rgb(144, 224, 239),
        ],
        highlight: Color::rgb(202, 240, 248),
        glow: Color::rgb(0, 150, 199),
        hue_sweep: false,
    },
    ColorTheme {
        id: "forest",
        name: "Forest",
        palette: &[
            Color::rgb(45, 106, 79),
            Color::rgb(64, 145, 108),
            Color::rgb(149, 213, 178),
        ],
        highlight: Color::rgb(216, 243, 220),
        glow: Color::rgb(82, 183, 136),
        hue_sweep: false,
    },
    ColorTheme {
        id: "ember",
        name: "Ember",
        palette: &[
            Color::rgb(157, 2, 8),
            Color::rgb(220, 47, 2),
            Color::rgb(244, 140, 6),
            Color::rgb(255, 186, 8),
        ],
        highlight: Color::rgb(255, 240, 200),
        glow: Color::rgb(232, 93, 4),
        hue_sweep: false,
    },
    ColorTheme {
        id: "rainbow",
        name: "Rainbow",
        palette: &[],
        highlight: Color::rgb(255, 255, 255),
        glow: Color::rgb(200, 200, 255),
        hue_sweep: true,
    },
];

/// Look up a theme by id.
pub fn find_theme(id: &str) -> Option<&'static ColorTheme> {
    THEMES.iter().find(|t| t.id.eq_ignore_ascii_case(id))
}

/// Look up a theme by id, falling back to the default theme.
pub fn theme(id: &str) -> &'static ColorTheme {
    find_theme(id).unwrap_or(&THEMES[0])
}

/// The theme after `id` in registry order (wrapping).
pub fn next_theme(id: &str) -> &'static ColorTheme {
    let idx = THEMES.iter().position(|t| t.id == theme(id).id).unwrap_or(0);
    &THEMES[(idx + 1) % THEMES.len()]
}

/// The theme before `id` in registry order (wrapping).
pub fn previous_theme(id: &str) -> &'static ColorTheme {
    let idx = THEMES.iter().position(|t| t.id == theme(id).id).unwrap_or(0);
    &THEMES[(idx + THEMES.len() - 1) % THEMES.len()]
}

/// Color for an element at `position` (0 = left/start, 1 = right/end) with
/// the given `intensity`.
pub fn color_for(theme: &ColorTheme, position: f32, intensity: f32) -> Color {
    let position = unit(position);
    let intensity = unit(intensity);

    if theme.hue_sweep || theme.palette.is_empty() {
        return Color::Hsl {
            h: position * 360.0,
            s: 70.0 + 30.0 * intensity,
            l: 50.0 + 20.0 * intensity,
        };
    }

    let len = theme.palette.len();
    let idx = ((position * len as f32) as usize).min(len - 1);
    let (r, g, b) = theme.palette[idx].to_rgb8();

    let warm = 0.7 + 0.6 * position;
    let bright = 0.7 + 0.3 * intensity;
    let scale = |c: u8, m: f32| (c as f32 * m).min(255.0) as u8;

    Color::Rgba {
        r: scale(r, warm),
        g: scale(g, bright),
        b: scale(b, bright),
        a: 0.7 + 0.3 * intensity,
    }
}

/// Hue interpolated between `hue_start` and `hue_end` by `intensity`, for
/// renderers that do not use a theme.
pub fn dynamic_color(intensity: f32, hue_start: f32, hue_end: f32) -> Color {
    let intensity = unit(intensity);
    Color::Hsl {
        h: hue_start + (hue_end - hue_start) * intensity,
        s: 70.0 + 30.0 * intensity,
        l: 60.0 + 20.0 * intensity,
    }
}

fn unit(v: f32) -> f32 {
    if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 }
}
