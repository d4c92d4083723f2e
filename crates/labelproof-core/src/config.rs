use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    Make,
    Upload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LabelType {
    Sheets,
    Rolls,
    #[serde(rename = "Die-cut")]
    DieCut,
    Custom,
}

impl LabelType {
    pub const ALL: [LabelType; 4] = [Self::Sheets, Self::Rolls, Self::DieCut, Self::Custom];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sheets => "Sheets",
            Self::Rolls => "Rolls",
            Self::DieCut => "Die-cut",
            Self::Custom => "Custom",
        }
    }
}

impl fmt::Display for LabelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LabelType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sheets" | "sheet" => Ok(Self::Sheets),
            "rolls" | "roll" => Ok(Self::Rolls),
            "die-cut" | "diecut" | "die_cut" => Ok(Self::DieCut),
            "custom" => Ok(Self::Custom),
            other => Err(Error::invalid_config(format!("unknown label type `{other}`"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ShapeType {
    #[default]
    Squared,
    Rounded,
    Round,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Material {
    White,
    Clear,
    Metallic,
    Holographic,
}

impl Material {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::White => "White",
            Self::Clear => "Clear",
            Self::Metallic => "Metallic",
            Self::Holographic => "Holographic",
        }
    }
}

/// White-ink underprint and the orientation of its legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WhiteInk {
    #[default]
    None,
    Horizontal,
    Vertical,
}

impl WhiteInk {
    pub fn is_set(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Label size in inches after the orientation swap has been applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelSize {
    pub width_inches: f64,
    pub height_inches: f64,
}

/// The validated shape of a proof request, borrowed from its [`ProofConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProofRequest<'a> {
    Make { shape: ShapeType, size: LabelSize },
    Upload { die_line_file: &'a Path },
}

/// Options collected by the proof panel. Built once per invocation and never mutated by the
/// builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofConfig {
    pub mode: Mode,
    pub label_type: LabelType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape_type: Option<ShapeType>,
    #[serde(default)]
    pub material: Option<Material>,
    #[serde(default)]
    pub white_ink: WhiteInk,
    #[serde(default)]
    pub add_guidelines: bool,
    #[serde(default)]
    pub swap_orientation: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width_inches: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_inches: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub die_line_file: Option<PathBuf>,
}

impl ProofConfig {
    pub fn make(label_type: LabelType, shape: ShapeType, width_inches: f64, height_inches: f64) -> Self {
        Self {
            mode: Mode::Make,
            label_type,
            shape_type: Some(shape),
            material: None,
            white_ink: WhiteInk::None,
            add_guidelines: false,
            swap_orientation: false,
            width_inches: Some(width_inches),
            height_inches: Some(height_inches),
            die_line_file: None,
        }
    }

    pub fn upload(label_type: LabelType, die_line_file: impl Into<PathBuf>) -> Self {
        Self {
            mode: Mode::Upload,
            label_type,
            shape_type: None,
            material: None,
            white_ink: WhiteInk::None,
            add_guidelines: false,
            swap_orientation: false,
            width_inches: None,
            height_inches: None,
            die_line_file: Some(die_line_file.into()),
        }
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = Some(material);
        self
    }

    pub fn with_white_ink(mut self, white_ink: WhiteInk) -> Self {
        self.white_ink = white_ink;
        self
    }

    pub fn with_guidelines(mut self, add_guidelines: bool) -> Self {
        self.add_guidelines = add_guidelines;
        self
    }

    pub fn with_swapped_orientation(mut self, swap: bool) -> Self {
        self.swap_orientation = swap;
        self
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Checks the mode invariants: Make carries a positive size and no file, Upload carries a
    /// file and no size.
    pub fn validate(&self) -> Result<ProofRequest<'_>> {
        match self.mode {
            Mode::Make => {
                if self.die_line_file.is_some() {
                    return Err(Error::invalid_config("Make mode does not take a die line file"));
                }
                let (Some(w), Some(h)) = (self.width_inches, self.height_inches) else {
                    return Err(Error::invalid_config("Missing the label width or height."));
                };
                for (axis, v) in [("width", w), ("height", h)] {
                    if !(v.is_finite() && v > 0.0) {
                        return Err(Error::invalid_config(format!(
                            "label {axis} must be a positive number of inches, got {v}"
                        )));
                    }
                }
                let size = if self.swap_orientation {
                    LabelSize {
                        width_inches: h,
                        height_inches: w,
                    }
                } else {
                    LabelSize {
                        width_inches: w,
                        height_inches: h,
                    }
                };
                Ok(ProofRequest::Make {
                    shape: self.shape_type.unwrap_or_default(),
                    size,
                })
            }
            Mode::Upload => {
                if self.width_inches.is_some() || self.height_inches.is_some() {
                    return Err(Error::invalid_config(
                        "Upload mode takes its size from the die line file",
                    ));
                }
                match self.die_line_file.as_deref() {
                    Some(path) if !path.as_os_str().is_empty() => {
                        Ok(ProofRequest::Upload { die_line_file: path })
                    }
                    _ => Err(Error::invalid_config("No file specified for upload")),
                }
            }
        }
    }

    /// Applies the panel's option rules: sheet labels carry no material or white ink, die-cut and
    /// custom labels always get guidelines, and white ink implies guidelines plus a material.
    pub fn normalized(&self) -> Self {
        let mut out = self.clone();
        match out.label_type {
            LabelType::Sheets => {
                out.white_ink = WhiteInk::None;
                out.material = None;
            }
            LabelType::DieCut | LabelType::Custom => out.add_guidelines = true,
            LabelType::Rolls => {}
        }
        if out.white_ink.is_set() {
            out.add_guidelines = true;
            if out.material.is_none() {
                out.material = Some(Material::White);
            }
        }
        out
    }
}
