use std::convert::Infallible;
use std::str::FromStr;

use crate::foundation::core::PixelPoint;

/// Measured text blocks plus the spacing that separates them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextDimensions {
    /// Width of the main block.
    pub main_width: u32,
    /// Height of the main block.
    pub main_height: u32,
    /// Width of the secondary block.
    pub secondary_width: u32,
    /// Height of the secondary block.
    pub secondary_height: u32,
    /// Distance from the canvas edges.
    pub padding: u32,
    /// Gap between the main and secondary blocks.
    pub vertical_spacing: u32,
}

/// Top-left corners of both text blocks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Placement {
    /// Main block origin.
    pub main: PixelPoint,
    /// Secondary block origin.
    pub secondary: PixelPoint,
}

/// Named anchor for the text block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Justification {
    /// Classic lower third on the left, resting on the bar.
    #[default]
    LowerLeft,
    /// Centered on the bar.
    LowerCenter,
    /// Right-aligned on the bar.
    LowerRight,
    /// Top-left corner.
    UpperLeft,
    /// Centered along the top edge.
    UpperCenter,
    /// Top-right corner.
    UpperRight,
    /// Centered on the canvas.
    CenterCenter,
}

const KEYWORDS: &[(&str, Justification)] = &[
    ("lower left", Justification::LowerLeft),
    ("lower right", Justification::LowerRight),
    ("lower center", Justification::LowerCenter),
    ("center bottom", Justification::LowerCenter),
    ("upper left", Justification::UpperLeft),
    ("upper right", Justification::UpperRight),
    ("upper center", Justification::UpperCenter),
    ("center top", Justification::UpperCenter),
    ("center center", Justification::CenterCenter),
    ("center", Justification::CenterCenter),
    ("left", Justification::LowerLeft),
    ("right", Justification::LowerRight),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Horizontal {
    Left,
    Center,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Vertical {
    Bar,
    Top,
    Middle,
}

impl Justification {
    /// Look up a placement keyword. Unknown input falls back to [`Justification::LowerLeft`].
    ///
    /// Matching ignores case, surrounding whitespace, and `-`/`_` separators.
    pub fn parse(s: &str) -> Self {
        let key = normalize(s);
        match KEYWORDS.iter().find(|(k, _)| *k == key) {
            Some((_, j)) => *j,
            None => {
                if !key.is_empty() {
                    tracing::debug!(justification = s, "unknown justification, using lower left");
                }
                Self::LowerLeft
            }
        }
    }

    /// Canonical keyword.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LowerLeft => "lower left",
            Self::LowerCenter => "lower center",
            Self::LowerRight => "lower right",
            Self::UpperLeft => "upper left",
            Self::UpperCenter => "upper center",
            Self::UpperRight => "upper right",
            Self::CenterCenter => "center center",
        }
    }

    fn axes(self) -> (Horizontal, Vertical) {
        match self {
            Self::LowerLeft => (Horizontal::Left, Vertical::Bar),
            Self::LowerCenter => (Horizontal::Center, Vertical::Bar),
            Self::LowerRight => (Horizontal::Right, Vertical::Bar),
            Self::UpperLeft => (Horizontal::Left, Vertical::Top),
            Self::UpperCenter => (Horizontal::Center, Vertical::Top),
            Self::UpperRight => (Horizontal::Right, Vertical::Top),
            Self::CenterCenter => (Horizontal::Center, Vertical::Middle),
        }
    }

    /// Place both blocks on a `canvas_width x canvas_height` canvas.
    ///
    /// Lower placements start `bar_padding` below `bar_y`. The secondary block always sits
    /// `main_height + vertical_spacing` below the main block. Blocks that fit the canvas are
    /// kept inside it; a stack overflowing the bottom edge moves up as a unit.
    pub fn place(
        self,
        dims: &TextDimensions,
        canvas_width: u32,
        canvas_height: u32,
        bar_y: i32,
        bar_padding: u32,
    ) -> Placement {
        let (h, v) = self.axes();
        let cw = i64::from(canvas_width);
        let ch = i64::from(canvas_height);
        let pad = i64::from(dims.padding);

        let x_for = |w: u32| -> i64 {
            let w = i64::from(w);
            let x = match h {
                Horizontal::Left => pad,
                Horizontal::Center => (cw - w).div_euclid(2),
                Horizontal::Right => cw - w - pad,
            };
            clamp_axis(x, w, cw)
        };
        let main_x = x_for(dims.main_width);
        let secondary_x = x_for(dims.secondary_width);

        let gap = i64::from(dims.main_height) + i64::from(dims.vertical_spacing);
        let block_h = gap + i64::from(dims.secondary_height);
        let top = match v {
            Vertical::Bar => i64::from(bar_y) + i64::from(bar_padding),
            Vertical::Top => pad,
            Vertical::Middle => (ch - block_h).div_euclid(2),
        };
        let top = clamp_axis(top, block_h, ch);

        let placement = Placement {
            main: point(main_x, top),
            secondary: point(secondary_x, top + gap),
        };
        tracing::debug!(justification = self.as_str(), ?placement, "text placed");
        placement
    }
}

impl FromStr for Justification {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl std::fmt::Display for Justification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every accepted justification keyword, sorted.
pub fn available_justifications() -> Vec<&'static str> {
    let mut out: Vec<_> = KEYWORDS.iter().map(|(k, _)| *k).collect();
    out.sort_unstable();
    out
}

fn normalize(s: &str) -> String {
    s.to_lowercase()
        .replace(['-', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

// Keeps `[pos, pos + len)` inside `[0, max)` when it fits; otherwise pins it to 0.
fn clamp_axis(pos: i64, len: i64, max: i64) -> i64 {
    if len >= max {
        return 0;
    }
    pos.clamp(0, max - len)
}

fn point(x: i64, y: i64) -> PixelPoint {
    let c = |v: i64| v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
    PixelPoint::new(c(x), c(y))
}

#[cfg(test)]
#[path = "../../tests/unit/layout/position.rs"]
mod tests;
