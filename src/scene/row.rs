use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::foundation::error::{LowerThirdError, LowerThirdResult};

/// One lower third to render: two texts, a placement keyword and optional per-row overrides.
///
/// Every `Option` field follows the same precedence: the row value when present, otherwise the
/// configuration value, otherwise a default derived from the canvas.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RowData {
    /// Primary (larger) text.
    pub main_text: String,
    /// Secondary text stacked under the main text.
    pub secondary_text: String,
    /// Placement keyword; empty selects the configured default.
    pub justification: String,
    /// Main font name or path.
    pub main_font: Option<String>,
    /// Secondary font name or path.
    pub secondary_font: Option<String>,
    /// Output file stem.
    pub file_name: Option<String>,
    /// Main font size.
    pub main_font_size: Option<u32>,
    /// Secondary font size.
    pub secondary_font_size: Option<u32>,
    /// Edge padding.
    pub padding: Option<u32>,
    /// Enable or disable wrapping for this row.
    pub wrap_text: Option<bool>,
    /// Wrap safe zone.
    pub wrap_padding: Option<u32>,
    /// Horizontal offset.
    pub position_offset_x: Option<i32>,
    /// Vertical offset.
    pub position_offset_y: Option<i32>,
    /// Main text color.
    pub main_color: Option<String>,
    /// Secondary text color.
    pub secondary_color: Option<String>,
    /// Background color.
    pub bg_color: Option<String>,
    /// Bar color.
    pub bar_color: Option<String>,
    /// Outline as `"WIDTH,COLOR[,OPACITY]"`; replaces the configured outline.
    pub text_outline: Option<String>,
    /// Force the drop shadow on.
    pub text_shadow: bool,
    /// Shadow color.
    pub shadow_color: Option<String>,
}

impl RowData {
    /// Build a validated row from its required fields.
    pub fn new(
        main_text: impl Into<String>,
        secondary_text: impl Into<String>,
        justification: impl Into<String>,
    ) -> LowerThirdResult<Self> {
        Self {
            main_text: main_text.into(),
            secondary_text: secondary_text.into(),
            justification: justification.into(),
            ..Self::default()
        }
        .normalized()
    }

    /// Trim texts, lowercase the justification, and reject rows with no text at all.
    pub fn normalized(mut self) -> LowerThirdResult<Self> {
        self.main_text = self.main_text.trim().to_owned();
        self.secondary_text = self.secondary_text.trim().to_owned();
        if self.main_text.is_empty() && self.secondary_text.is_empty() {
            return Err(LowerThirdError::invalid_row(
                "at least one of main_text or secondary_text must be provided",
            ));
        }
        self.justification = self.justification.trim().to_lowercase();
        Ok(self)
    }

    /// Any color override present.
    pub fn has_color_overrides(&self) -> bool {
        self.main_color.is_some()
            || self.secondary_color.is_some()
            || self.bg_color.is_some()
            || self.bar_color.is_some()
    }

    /// Any font size override present.
    pub fn has_font_size_overrides(&self) -> bool {
        self.main_font_size.is_some() || self.secondary_font_size.is_some()
    }

    /// Any effect override present.
    pub fn has_effect_overrides(&self) -> bool {
        self.text_outline.is_some() || self.text_shadow
    }

    /// Sanitized output stem: `file_name`, else the main text, else the secondary text.
    ///
    /// Returns `None` when sanitizing leaves nothing usable.
    pub fn output_stem(&self) -> Option<String> {
        let source = self
            .file_name
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .or_else(|| (!self.main_text.is_empty()).then_some(self.main_text.as_str()))
            .unwrap_or(self.secondary_text.as_str());
        let safe = sanitize_file_stem(source);
        (!safe.is_empty()).then_some(safe)
    }

    /// Parse a JSON array of rows, normalizing each one.
    pub fn list_from_json_str(s: &str) -> LowerThirdResult<Vec<Self>> {
        let rows: Vec<Self> = serde_json::from_str(s)
            .map_err(|e| LowerThirdError::invalid_row(format!("rows json parse failed: {e}")))?;
        rows.into_iter()
            .enumerate()
            .map(|(i, r)| {
                r.normalized()
                    .map_err(|e| LowerThirdError::invalid_row(format!("row {i}: {e}")))
            })
            .collect()
    }

    /// Parse a single JSON row object.
    pub fn from_json_str(s: &str) -> LowerThirdResult<Self> {
        let row: Self = serde_json::from_str(s)
            .map_err(|e| LowerThirdError::invalid_row(format!("row json parse failed: {e}")))?;
        row.normalized()
    }

    /// Load a JSON array of rows from disk.
    pub fn list_from_path(path: impl AsRef<Path>) -> LowerThirdResult<Vec<Self>> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read rows '{}'", path.display()))?;
        Self::list_from_json_str(&s)
    }
}

/// Replace path separators with `_` and drop everything but alphanumerics and `_-.`.
pub fn sanitize_file_stem(name: &str) -> String {
    name.chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .filter(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/scene/row.rs"]
mod tests;
