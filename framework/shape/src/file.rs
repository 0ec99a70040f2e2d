use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::shape::{ShapeError, Stage, StagedShape};

/// The on-disk form of a [StagedShape], so a scenario can swap in a different ramp without
/// being recompiled:
///
/// ```toml
/// stop_at_end = true
///
/// [[stages]]
/// duration = 60
/// users = 19
/// spawn_rate = 19
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapeDocument {
    #[serde(default = "default_stop_at_end")]
    pub stop_at_end: bool,
    pub stages: Vec<Stage>,
}

fn default_stop_at_end() -> bool {
    true
}

impl From<&StagedShape> for ShapeDocument {
    fn from(shape: &StagedShape) -> Self {
        Self {
            stop_at_end: shape.stop_at_end(),
            stages: shape.stages().to_vec(),
        }
    }
}

impl TryFrom<ShapeDocument> for StagedShape {
    type Error = ShapeError;

    fn try_from(document: ShapeDocument) -> Result<Self, Self::Error> {
        Ok(StagedShape::new(document.stages)?.with_stop_at_end(document.stop_at_end))
    }
}

impl StagedShape {
    /// Parse a [ShapeDocument] and validate it through the same path as [StagedShape::new].
    pub fn from_toml_str(input: &str) -> Result<Self, ShapeError> {
        let document: ShapeDocument = toml::from_str(input)?;
        document.try_into()
    }

    /// Load a shape from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ShapeError> {
        let path = path.as_ref();
        let shape = Self::from_toml_str(&std::fs::read_to_string(path)?)?;

        log::debug!(
            "Loaded a shape with {} stages from {}",
            shape.stages().len(),
            path.display()
        );

        Ok(shape)
    }

    pub fn to_toml_string(&self) -> Result<String, ShapeError> {
        Ok(toml::to_string_pretty(&ShapeDocument::from(self))?)
    }
}
