//! Decoder options with TOML file support.
//!
//! Options serialize to/from TOML so a viewer deployment can pin decoding
//! behavior (for instance the projection scheme its API serves) without
//! code changes. All fields use `#[serde(default)]`, so partial files work.

use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::DecodeError;
use crate::scheme::SelectionScheme;

/// Frame count of a PCA projection payload.
pub const PROJECTION_FRAMES: usize = 20;

/// How the atom subset of a projection payload is determined.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum SchemeChoice {
    /// Compare payload size against backbone and heavy-atom counts.
    #[default]
    Infer,
    /// The payload is known to carry backbone atoms.
    Backbone,
    /// The payload is known to carry heavy atoms.
    Heavy,
}

impl SchemeChoice {
    /// The fixed scheme, or `None` when it must be inferred.
    #[must_use]
    pub fn fixed(self) -> Option<SelectionScheme> {
        match self {
            Self::Infer => None,
            Self::Backbone => Some(SelectionScheme::Backbone),
            Self::Heavy => Some(SelectionScheme::Heavy),
        }
    }
}

/// Top-level decoder options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[schemars(title = "Decode Options")]
#[serde(default)]
pub struct DecodeOptions {
    /// Number of frames in a projection payload.
    #[schemars(title = "Projection Frames")]
    pub projection_frames: usize,
    /// Projection atom-subset scheme.
    #[schemars(title = "Projection Scheme")]
    pub scheme: SchemeChoice,
    /// Fail instead of emitting zeroed frames when the scheme cannot be
    /// inferred.
    #[schemars(title = "Strict Scheme")]
    pub strict_scheme: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            projection_frames: PROJECTION_FRAMES,
            scheme: SchemeChoice::Infer,
            strict_scheme: false,
        }
    }
}

impl DecodeOptions {
    /// Generate JSON Schema describing the options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(DecodeOptions)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, DecodeError> {
        let content = std::fs::read_to_string(path).map_err(DecodeError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Parse options from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, DecodeError> {
        toml::from_str(content)
            .map_err(|e| DecodeError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), DecodeError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| DecodeError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(DecodeError::Io)?;
        }
        std::fs::write(path, content).map_err(DecodeError::Io)
    }
}
