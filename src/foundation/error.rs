/// Convenience result type used across the crate.
pub type LowerThirdResult<T> = Result<T, LowerThirdError>;

/// Expected-format hint attached to color parse failures.
pub const COLOR_FORMAT_HINT: &str = "name, #RRGGBB, R,G,B, or R,G,B,A";

/// Top-level error taxonomy used by generation APIs.
#[derive(thiserror::Error, Debug)]
pub enum LowerThirdError {
    /// A color specification could not be parsed in strict mode.
    #[error("color parse error: invalid color '{spec}' (expected {expected})")]
    ColorParse {
        /// Offending color text.
        spec: String,
        /// Accepted formats.
        expected: String,
    },

    /// A font could not be resolved and fallback was not permitted.
    #[error("font load error: {}", describe_font_failure(.spec.as_deref(), .attempted))]
    FontLoad {
        /// Requested font specification, if any.
        spec: Option<String>,
        /// Paths tried before giving up.
        attempted: Vec<String>,
    },

    /// Any failure while composing an image, including builder misuse.
    #[error("image generation error: {message}{}{}", fmt_stage(.stage.as_deref()), fmt_details(.details.as_deref()))]
    ImageGeneration {
        /// Primary message.
        message: String,
        /// Builder stage or row that failed.
        stage: Option<String>,
        /// Underlying cause.
        details: Option<String>,
    },

    /// Encoding or writing an output image failed.
    #[error("image save error: {message} (path '{path}', format {format})")]
    ImageSave {
        /// Destination path.
        path: String,
        /// Output format name.
        format: String,
        /// Underlying cause.
        message: String,
    },

    /// Invalid configuration value.
    #[error("configuration error: {message}{}", fmt_key(.key.as_deref(), .value.as_deref()))]
    Configuration {
        /// Offending configuration key.
        key: Option<String>,
        /// Offending value, rendered as text.
        value: Option<String>,
        /// What is wrong with it.
        message: String,
    },

    /// Row data violating the ingestion contract.
    #[error("invalid row: {0}")]
    InvalidRow(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LowerThirdError {
    /// Build a [`LowerThirdError::ColorParse`] value with the standard format hint.
    pub fn color_parse(spec: impl Into<String>) -> Self {
        Self::ColorParse {
            spec: spec.into(),
            expected: COLOR_FORMAT_HINT.to_owned(),
        }
    }

    /// Build a [`LowerThirdError::FontLoad`] value.
    pub fn font_load(spec: Option<&str>, attempted: Vec<String>) -> Self {
        Self::FontLoad {
            spec: spec.map(str::to_owned),
            attempted,
        }
    }

    /// Build a [`LowerThirdError::ImageGeneration`] value without stage or details.
    pub fn generation(msg: impl Into<String>) -> Self {
        Self::ImageGeneration {
            message: msg.into(),
            stage: None,
            details: None,
        }
    }

    /// Build a [`LowerThirdError::ImageGeneration`] value tagged with the failing stage.
    pub fn generation_at(stage: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::ImageGeneration {
            message: msg.into(),
            stage: Some(stage.into()),
            details: None,
        }
    }

    /// Build a [`LowerThirdError::ImageSave`] value.
    pub fn save(
        path: impl Into<String>,
        format: impl Into<String>,
        msg: impl Into<String>,
    ) -> Self {
        Self::ImageSave {
            path: path.into(),
            format: format.into(),
            message: msg.into(),
        }
    }

    /// Build a [`LowerThirdError::Configuration`] value bound to a key.
    pub fn configuration(
        key: impl Into<String>,
        value: impl ToString,
        msg: impl Into<String>,
    ) -> Self {
        Self::Configuration {
            key: Some(key.into()),
            value: Some(value.to_string()),
            message: msg.into(),
        }
    }

    /// Build a [`LowerThirdError::Configuration`] value not tied to a single key.
    pub fn config_message(msg: impl Into<String>) -> Self {
        Self::Configuration {
            key: None,
            value: None,
            message: msg.into(),
        }
    }

    /// Build a [`LowerThirdError::InvalidRow`] value.
    pub fn invalid_row(msg: impl Into<String>) -> Self {
        Self::InvalidRow(msg.into())
    }
}

fn describe_font_failure(spec: Option<&str>, attempted: &[String]) -> String {
    let mut out = match spec {
        Some(s) => format!("failed to load font '{s}'"),
        None => "failed to load font".to_owned(),
    };
    if !attempted.is_empty() {
        let shown = attempted
            .iter()
            .take(3)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!(" (tried: {shown}"));
        if attempted.len() > 3 {
            out.push_str(&format!(" and {} more", attempted.len() - 3));
        }
        out.push(')');
    }
    out
}

fn fmt_stage(stage: Option<&str>) -> String {
    stage.map(|s| format!(" [{s}]")).unwrap_or_default()
}

fn fmt_details(details: Option<&str>) -> String {
    details.map(|d| format!(": {d}")).unwrap_or_default()
}

fn fmt_key(key: Option<&str>, value: Option<&str>) -> String {
    match (key, value) {
        (Some(k), Some(v)) => format!(" ({k} = {v})"),
        (Some(k), None) => format!(" ({k})"),
        _ => String::new(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
