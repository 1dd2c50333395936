//! Parsing of user-facing color text.
//!
//! Accepted forms, first match wins:
//!
//! - a color name from a fixed table (`"red"`, `"sky blue"`, `"transparent"`, ...)
//! - six hex digits with or without a leading `#`
//! - `"R,G,B"` or `"rgb(R,G,B)"` with channels in `0..=255`
//! - any of the above followed by `,A` where `A` is an alpha in `0..=255`
//!
//! Parsing is case-insensitive and ignores surrounding whitespace.

use crate::foundation::core::Rgba8;
use crate::foundation::error::{LowerThirdError, LowerThirdResult};

/// Parsed color. `alpha` is `None` when the text carried no alpha component.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel, if specified.
    pub alpha: Option<u8>,
}

impl Color {
    /// RGB color without alpha.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r,
            g,
            b,
            alpha: None,
        }
    }

    /// RGBA color.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r,
            g,
            b,
            alpha: Some(a),
        }
    }

    /// Black, the default fallback.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// Whether an alpha channel is present.
    pub fn has_alpha(self) -> bool {
        self.alpha.is_some()
    }

    /// Straight RGBA, treating a missing alpha as opaque.
    pub fn to_rgba8(self) -> Rgba8 {
        Rgba8::new(self.r, self.g, self.b, self.alpha.unwrap_or(255))
    }

    /// Same RGB with the given alpha.
    pub fn with_alpha(self, a: u8) -> Self {
        Self::rgba(self.r, self.g, self.b, a)
    }
}

/// Options for [`ColorParser::parse_with`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// Alpha appended to RGB-only results when it differs from 255.
    pub default_alpha: u8,
    /// Returned when the input is missing or unparseable; defaults to black.
    pub fallback: Option<Color>,
    /// Fail with [`LowerThirdError::ColorParse`] instead of falling back.
    pub strict: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            default_alpha: 255,
            fallback: None,
            strict: false,
        }
    }
}

impl ParseOptions {
    /// Options with a specific default alpha.
    pub fn with_default_alpha(default_alpha: u8) -> Self {
        Self {
            default_alpha,
            ..Self::default()
        }
    }
}

const COLOR_NAMES: &[(&str, Color)] = &[
    ("black", Color::rgb(0, 0, 0)),
    ("white", Color::rgb(255, 255, 255)),
    ("red", Color::rgb(255, 0, 0)),
    ("green", Color::rgb(0, 255, 0)),
    ("blue", Color::rgb(0, 0, 255)),
    ("yellow", Color::rgb(255, 255, 0)),
    ("cyan", Color::rgb(0, 255, 255)),
    ("magenta", Color::rgb(255, 0, 255)),
    ("purple", Color::rgb(128, 0, 128)),
    ("orange", Color::rgb(255, 165, 0)),
    ("pink", Color::rgb(255, 192, 203)),
    ("gray", Color::rgb(128, 128, 128)),
    ("grey", Color::rgb(128, 128, 128)),
    ("brown", Color::rgb(165, 42, 42)),
    ("navy", Color::rgb(0, 0, 128)),
    ("teal", Color::rgb(0, 128, 128)),
    ("lime", Color::rgb(0, 255, 0)),
    ("maroon", Color::rgb(128, 0, 0)),
    ("olive", Color::rgb(128, 128, 0)),
    ("silver", Color::rgb(192, 192, 192)),
    ("gold", Color::rgb(255, 215, 0)),
    ("indigo", Color::rgb(75, 0, 130)),
    ("violet", Color::rgb(238, 130, 238)),
    ("turquoise", Color::rgb(64, 224, 208)),
    ("tan", Color::rgb(210, 180, 140)),
    ("salmon", Color::rgb(250, 128, 114)),
    ("sky blue", Color::rgb(135, 206, 235)),
    ("khaki", Color::rgb(240, 230, 140)),
    ("crimson", Color::rgb(220, 20, 60)),
    ("dark blue", Color::rgb(0, 0, 139)),
    ("dark green", Color::rgb(0, 100, 0)),
    ("dark red", Color::rgb(139, 0, 0)),
    ("dark gray", Color::rgb(169, 169, 169)),
    ("dark grey", Color::rgb(169, 169, 169)),
    ("light gray", Color::rgb(211, 211, 211)),
    ("light grey", Color::rgb(211, 211, 211)),
    ("light blue", Color::rgb(173, 216, 230)),
    ("light green", Color::rgb(144, 238, 144)),
    ("light red", Color::rgb(255, 102, 102)),
    ("transparent", Color::rgba(0, 0, 0, 0)),
];

/// Stateless color parser.
#[derive(Clone, Copy, Debug, Default)]
pub struct ColorParser;

impl ColorParser {
    /// Lenient parse with default options: unknown input logs a warning and yields black.
    pub fn parse(spec: &str) -> Color {
        Self::parse_lenient(Some(spec), ParseOptions::default())
    }

    /// Strict parse: unknown input is a [`LowerThirdError::ColorParse`].
    pub fn parse_strict(spec: &str) -> LowerThirdResult<Color> {
        Self::parse_with(
            Some(spec),
            ParseOptions {
                strict: true,
                ..ParseOptions::default()
            },
        )
    }

    /// Parse with explicit options. Only fails when `opts.strict` is set.
    pub fn parse_with(spec: Option<&str>, opts: ParseOptions) -> LowerThirdResult<Color> {
        let fallback = opts.fallback.unwrap_or(Color::BLACK);
        let Some(raw) = spec else {
            return Ok(fallback);
        };

        let normalized = raw.trim().to_lowercase();
        let Some(parsed) = parse_any(&normalized) else {
            if opts.strict {
                return Err(LowerThirdError::color_parse(raw));
            }
            tracing::warn!(color = raw, "color not recognized, using fallback");
            return Ok(fallback);
        };

        if parsed.alpha.is_none() && opts.default_alpha != 255 {
            return Ok(parsed.with_alpha(opts.default_alpha));
        }
        Ok(parsed)
    }

    /// [`ColorParser::parse_with`] for callers that never request strict mode.
    pub fn parse_lenient(spec: Option<&str>, opts: ParseOptions) -> Color {
        let fallback = opts.fallback.unwrap_or(Color::BLACK);
        Self::parse_with(
            spec,
            ParseOptions {
                strict: false,
                ..opts
            },
        )
        .unwrap_or(fallback)
    }

    /// Render the RGB part as `#RRGGBB`.
    pub fn to_hex(color: Color) -> String {
        format!("#{:02X}{:02X}{:02X}", color.r, color.g, color.b)
    }

    /// Attach (or replace) an alpha channel.
    pub fn add_alpha(color: Color, alpha: u8) -> Rgba8 {
        Rgba8::new(color.r, color.g, color.b, alpha)
    }

    /// Whether `name` is in the named-color table.
    pub fn is_valid_name(name: &str) -> bool {
        lookup_name(&name.trim().to_lowercase()).is_some()
    }

    /// All recognized color names, sorted.
    pub fn available_names() -> Vec<&'static str> {
        let mut names: Vec<_> = COLOR_NAMES.iter().map(|(n, _)| *n).collect();
        names.sort_unstable();
        names
    }
}

fn parse_any(s: &str) -> Option<Color> {
    lookup_name(s)
        .or_else(|| parse_hex(s))
        .or_else(|| parse_rgb(s))
        .or_else(|| parse_with_alpha(s))
}

fn lookup_name(s: &str) -> Option<Color> {
    COLOR_NAMES
        .iter()
        .find_map(|(name, c)| (*name == s).then_some(*c))
}

fn parse_hex(s: &str) -> Option<Color> {
    let digits = s.strip_prefix('#').unwrap_or(s);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some(Color::rgb(byte(0)?, byte(2)?, byte(4)?))
}

fn parse_rgb(s: &str) -> Option<Color> {
    let inner = s
        .strip_prefix("rgb(")
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or(s);
    let parts: Vec<&str> = inner.split(',').collect();
    let [r, g, b] = parts.as_slice() else {
        return None;
    };
    Some(Color::rgb(channel(r)?, channel(g)?, channel(b)?))
}

/// `<color>,<alpha>`; the color part may itself be any supported form.
fn parse_with_alpha(s: &str) -> Option<Color> {
    let (color_part, alpha_part) = s.rsplit_once(',')?;
    let alpha = channel(alpha_part)?;
    let color_part = color_part.trim();
    if color_part.is_empty() {
        return None;
    }
    let base = parse_any(color_part)?;
    Some(base.with_alpha(alpha))
}

fn channel(s: &str) -> Option<u8> {
    let s = s.trim();
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse::<u32>().ok().and_then(|v| u8::try_from(v).ok())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/color.rs"]
mod tests;
