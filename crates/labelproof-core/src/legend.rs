use crate::config::{LabelType, Material, ProofConfig, WhiteInk};
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

pub const LEGEND_EXTENSION: &str = "ai";

/// The options that select a legend asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LegendKey {
    pub label_type: LabelType,
    pub material: Option<Material>,
    pub white_ink: WhiteInk,
}

impl LegendKey {
    pub fn new(label_type: LabelType, material: Option<Material>, white_ink: WhiteInk) -> Self {
        Self {
            label_type,
            material,
            white_ink,
        }
    }

    pub fn from_config(config: &ProofConfig) -> Self {
        Self::new(config.label_type, config.material, config.white_ink)
    }

    /// `<LabelType>[_<Material>][_WhiteHorizontal|_WhiteVertical].ai`
    pub fn file_name(&self) -> String {
        let mut out = String::from(self.label_type.as_str());
        if let Some(material) = self.material {
            out.push('_');
            out.push_str(material.as_str());
        }
        match self.white_ink {
            WhiteInk::None => {}
            WhiteInk::Horizontal => out.push_str("_WhiteHorizontal"),
            WhiteInk::Vertical => out.push_str("_WhiteVertical"),
        }
        out.push('.');
        out.push_str(LEGEND_EXTENSION);
        out
    }
}

pub fn legend_file_name(
    label_type: LabelType,
    material: Option<Material>,
    white_ink: WhiteInk,
) -> String {
    LegendKey::new(label_type, material, white_ink).file_name()
}

/// A directory of legend assets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendLibrary {
    dir: PathBuf,
}

impl LegendLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the asset for `key`, or `LegendNotFound` when the file is absent.
    pub fn resolve(&self, key: &LegendKey) -> Result<PathBuf> {
        let file_name = key.file_name();
        let path = self.dir.join(&file_name);
        if path.is_file() {
            Ok(path)
        } else {
            Err(Error::LegendNotFound { file_name, path })
        }
    }
}
