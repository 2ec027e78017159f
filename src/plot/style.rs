//! Series styling: colors, markers, line styles and user overrides.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use palette::{Hsl, IntoColor, Srgb};

/// 24-bit color shared by the raster and terminal surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const RED: Rgb = Rgb(255, 0, 0);
    pub const NAVY: Rgb = Rgb(0, 0, 128);
    pub const SKYBLUE: Rgb = Rgb(135, 206, 235);
    pub const DARKORANGE: Rgb = Rgb(255, 140, 0);
    pub const SEAGREEN: Rgb = Rgb(46, 139, 87);
    pub const PURPLE: Rgb = Rgb(128, 0, 128);
    pub const BLACK: Rgb = Rgb(0, 0, 0);

    fn named(name: &str) -> Option<Rgb> {
        let rgb = match name {
            "red" => Rgb::RED,
            "navy" => Rgb::NAVY,
            "skyblue" => Rgb::SKYBLUE,
            "darkorange" => Rgb::DARKORANGE,
            "orange" => Rgb(255, 165, 0),
            "seagreen" => Rgb::SEAGREEN,
            "green" => Rgb(0, 128, 0),
            "purple" => Rgb::PURPLE,
            "blue" => Rgb(0, 0, 255),
            "cyan" => Rgb(0, 255, 255),
            "magenta" => Rgb(255, 0, 255),
            "yellow" => Rgb(255, 255, 0),
            "gray" | "grey" => Rgb(128, 128, 128),
            "black" => Rgb::BLACK,
            "white" => Rgb(255, 255, 255),
            _ => return None,
        };
        Some(rgb)
    }
}

impl FromStr for Rgb {
    type Err = String;

    /// Accepts a color name (`navy`, `skyblue`, ...) or `#rrggbb`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        if let Some(hex) = s.strip_prefix('#') {
            if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(format!("invalid hex color '#{hex}'"));
            }
            let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|e| e.to_string());
            return Ok(Rgb(byte(0)?, byte(2)?, byte(4)?));
        }
        Rgb::named(&s).ok_or_else(|| format!("unknown color '{s}'"))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Point marker drawn at each sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Marker {
    None,
    Circle,
    Cross,
    Triangle,
    /// Single pixel dot.
    Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LineStyle {
    None,
    Solid,
    Dashed,
    Dotted,
}

/// Fully resolved style of one plotted series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStyle {
    pub color: Rgb,
    pub marker: Marker,
    pub marker_size: u32,
    pub line: LineStyle,
    pub line_width: u32,
}

impl SeriesStyle {
    /// Markers only, no connecting line (observations).
    pub fn markers(color: Rgb) -> Self {
        Self {
            color,
            marker: Marker::Circle,
            marker_size: 2,
            line: LineStyle::None,
            line_width: 1,
        }
    }

    /// Solid line, no markers (model output).
    pub fn line(color: Rgb) -> Self {
        Self {
            color,
            marker: Marker::None,
            marker_size: 2,
            line: LineStyle::Solid,
            line_width: 2,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.marker != Marker::None || self.line != LineStyle::None
    }
}

/// Colors handed out to model lines, in order.
const MODEL_COLORS: [Rgb; 5] = [
    Rgb::NAVY,
    Rgb::SKYBLUE,
    Rgb::DARKORANGE,
    Rgb::SEAGREEN,
    Rgb::PURPLE,
];

/// The `index`-th color of the model palette.
///
/// The first few are fixed named colors; beyond those, evenly spaced hues.
pub fn model_color(index: usize) -> Rgb {
    if let Some(c) = MODEL_COLORS.get(index) {
        return *c;
    }
    let extra = index - MODEL_COLORS.len();
    // Golden-angle hue steps keep successive colors apart without knowing the total.
    let hue = (extra as f32 * 137.508 + 20.0) % 360.0;
    let hsl = Hsl::new(hue, 0.70, 0.45);
    let rgb: Srgb = hsl.into_color();
    Rgb(
        (rgb.red * 255.0).round() as u8,
        (rgb.green * 255.0).round() as u8,
        (rgb.blue * 255.0).round() as u8,
    )
}

/// User override for one plotted series, addressed by its key.
///
/// CLI form: `TARGET:key=value,key=value`, with keys `color`, `marker`, `size`,
/// `line`, `width` and `label`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleOverride {
    pub target: String,
    pub color: Option<Rgb>,
    pub marker: Option<Marker>,
    pub marker_size: Option<u32>,
    pub line_style: Option<LineStyle>,
    pub line_width: Option<u32>,
    pub label: Option<String>,
}

impl StyleOverride {
    pub fn for_target(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            ..Self::default()
        }
    }

    /// Apply to a resolved style and label.
    pub fn apply(&self, style: &mut SeriesStyle, label: &mut String) {
        if let Some(c) = self.color {
            style.color = c;
        }
        if let Some(m) = self.marker {
            style.marker = m;
        }
        if let Some(s) = self.marker_size {
            style.marker_size = s;
        }
        if let Some(l) = self.line_style {
            style.line = l;
        }
        if let Some(w) = self.line_width {
            style.line_width = w;
        }
        if let Some(l) = &self.label {
            label.clone_from(l);
        }
    }
}

impl FromStr for StyleOverride {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // The target ends at the last ':' before the first '=', so both targets
        // and labels may contain colons.
        let head = s.find('=').map_or(s, |i| &s[..i]);
        let split = head
            .rfind(':')
            .ok_or_else(|| format!("expected TARGET:key=value[,key=value...], got '{s}'"))?;
        let (target, attrs) = (s[..split].trim(), &s[split + 1..]);
        if target.is_empty() {
            return Err("style target is empty".to_string());
        }

        let mut out = StyleOverride::for_target(target);
        let mut rest = attrs;
        while !rest.is_empty() {
            let (pair, tail) = rest.split_once(',').unwrap_or((rest, ""));
            let pair = pair.trim();
            if pair.is_empty() {
                rest = tail;
                continue;
            }
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| format!("expected key=value, got '{pair}'"))?;
            let value = value.trim();
            match key.trim().to_ascii_lowercase().as_str() {
                "color" => out.color = Some(value.parse()?),
                "marker" => out.marker = Some(Marker::from_str(value, true)?),
                "size" => out.marker_size = Some(parse_positive(value, "size")?),
                "line" => out.line_style = Some(LineStyle::from_str(value, true)?),
                "width" => out.line_width = Some(parse_positive(value, "width")?),
                "label" => {
                    // A label takes the rest of the argument, commas included.
                    let label = rest.split_once('=').map_or("", |(_, v)| v);
                    out.label = Some(label.trim().to_string());
                    break;
                }
                other => {
                    return Err(format!(
                        "unknown style key '{other}' (expected color, marker, size, line, width, label)"
                    ));
                }
            }
            rest = tail;
        }
        Ok(out)
    }
}

fn parse_positive(value: &str, key: &str) -> Result<u32, String> {
    match value.parse::<u32>() {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(format!("{key} must be a positive integer, got '{value}'")),
    }
}
