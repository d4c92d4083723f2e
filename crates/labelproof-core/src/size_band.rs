//! Physical size bands and the dimensioning style each band selects.
//!
//! A label dimension (in inches) falls into exactly one of seven bands. Bands are half-open
//! `[lo, hi)` intervals, the last one is unbounded, so together they partition `[0, ∞)`.
//! Each label type carries its own style row per band because cut tolerances differ: die-cut
//! proofs push dimension lines further out than sheet proofs.

use crate::config::LabelType;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SizeBand {
    #[serde(rename = "under0_5")]
    UnderHalf,
    #[serde(rename = "0_5to1")]
    HalfToOne,
    #[serde(rename = "1to2")]
    OneToTwo,
    #[serde(rename = "2to4")]
    TwoToFour,
    #[serde(rename = "4to6")]
    FourToSix,
    #[serde(rename = "6to10")]
    SixToTen,
    #[serde(rename = "over10")]
    OverTen,
}

impl SizeBand {
    /// Ascending evaluation order.
    pub const ALL: [SizeBand; 7] = [
        Self::UnderHalf,
        Self::HalfToOne,
        Self::OneToTwo,
        Self::TwoToFour,
        Self::FourToSix,
        Self::SixToTen,
        Self::OverTen,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::UnderHalf => "under0_5",
            Self::HalfToOne => "0_5to1",
            Self::OneToTwo => "1to2",
            Self::TwoToFour => "2to4",
            Self::FourToSix => "4to6",
            Self::SixToTen => "6to10",
            Self::OverTen => "over10",
        }
    }

    pub fn lower_bound(self) -> f64 {
        match self {
            Self::UnderHalf => 0.0,
            Self::HalfToOne => 0.5,
            Self::OneToTwo => 1.0,
            Self::TwoToFour => 2.0,
            Self::FourToSix => 4.0,
            Self::SixToTen => 6.0,
            Self::OverTen => 10.0,
        }
    }

    /// Exclusive upper bound in inches; `None` for the last band.
    pub fn upper_bound(self) -> Option<f64> {
        match self {
            Self::UnderHalf => Some(0.5),
            Self::HalfToOne => Some(1.0),
            Self::OneToTwo => Some(2.0),
            Self::TwoToFour => Some(4.0),
            Self::FourToSix => Some(6.0),
            Self::SixToTen => Some(10.0),
            Self::OverTen => None,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn for_inches(inches: f64) -> Result<Self> {
        if !(inches.is_finite() && inches >= 0.0) {
            return Err(Error::InvalidDimension { value: inches });
        }
        let band = Self::ALL
            .into_iter()
            .find(|band| band.upper_bound().is_none_or(|hi| inches < hi))
            .unwrap_or(Self::OverTen);
        Ok(band)
    }

    /// Multiplier applied to the die line when sizing the white backer rectangle.
    pub fn backer_scale(self) -> f64 {
        match self {
            Self::SixToTen => 2.0,
            Self::OverTen => 1.5,
            _ => 2.5,
        }
    }
}

impl fmt::Display for SizeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Arrowhead size as a percentage of the host's default arrowhead (`"50%"` in tables).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ArrowScale(u16);

impl ArrowScale {
    pub const HALF: ArrowScale = ArrowScale(50);
    pub const THREE_QUARTERS: ArrowScale = ArrowScale(75);

    pub fn from_percent(percent: u16) -> Self {
        Self(percent)
    }

    pub fn percent(self) -> u16 {
        self.0
    }

    pub fn factor(self) -> f64 {
        f64::from(self.0) / 100.0
    }
}

impl TryFrom<String> for ArrowScale {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        let raw = value.trim();
        let digits = raw.strip_suffix('%').unwrap_or(raw).trim();
        digits
            .parse::<u16>()
            .map(Self)
            .map_err(|_| format!("invalid arrow action `{value}` (expected e.g. \"50%\")"))
    }
}

impl From<ArrowScale> for String {
    fn from(value: ArrowScale) -> Self {
        format!("{}%", value.0)
    }
}

/// Dimension-line style for one band. Offsets are in inches, stroke width and font size in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BandStyle {
    #[serde(rename = "dimLine")]
    pub dim_line_offset: f64,
    #[serde(rename = "text")]
    pub text_offset: f64,
    pub stroke_width: f64,
    pub font_size: f64,
    pub arrow_action: ArrowScale,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BandSelection {
    pub band: SizeBand,
    pub style: BandStyle,
}

type RawTable = IndexMap<LabelType, IndexMap<SizeBand, BandStyle>>;

/// Per-label-type style rows, one entry per band. Always complete: every label type has a style
/// for every band, so lookups cannot miss once a table exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTable", into = "RawTable")]
pub struct DimensionTable {
    rows: IndexMap<LabelType, [BandStyle; 7]>,
}

impl Default for DimensionTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl DimensionTable {
    /// Production values used by the proof templates.
    pub fn standard() -> Self {
        let mut rows = IndexMap::new();
        rows.insert(
            LabelType::Rolls,
            standard_row([0.1875, 0.2, 0.2125, 0.2375, 0.3125, 0.3125, 0.3125]),
        );
        rows.insert(
            LabelType::Sheets,
            standard_row([0.25, 0.2625, 0.275, 0.3, 0.375, 0.375, 0.375]),
        );
        rows.insert(
            LabelType::DieCut,
            standard_row([0.3125, 0.325, 0.3375, 0.3625, 0.4375, 0.4375, 0.4375]),
        );
        rows.insert(
            LabelType::Custom,
            standard_row([0.25, 0.2625, 0.275, 0.3, 0.375, 0.375, 0.375]),
        );
        Self { rows }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_json(&text)
    }

    pub fn style(&self, label_type: LabelType, band: SizeBand) -> BandStyle {
        // Completeness is checked on construction.
        self.rows[&label_type][band.index()]
    }

    pub fn classify(&self, label_type: LabelType, inches: f64) -> Result<BandSelection> {
        let band = SizeBand::for_inches(inches)?;
        Ok(BandSelection {
            band,
            style: self.style(label_type, band),
        })
    }
}

fn standard_row(dim_lines: [f64; 7]) -> [BandStyle; 7] {
    const TEXT: [f64; 7] = [0.025, 0.0375, 0.0375, 0.0375, 0.0375, 0.0375, 0.0375];
    const STROKE: [f64; 7] = [0.5, 0.75, 0.75, 1.0, 1.0, 1.0, 1.0];
    const FONT: [f64; 7] = [4.0, 6.0, 8.0, 8.0, 12.0, 12.0, 12.0];
    std::array::from_fn(|i| BandStyle {
        dim_line_offset: dim_lines[i],
        text_offset: TEXT[i],
        stroke_width: STROKE[i],
        font_size: FONT[i],
        arrow_action: if i < 4 {
            ArrowScale::HALF
        } else {
            ArrowScale::THREE_QUARTERS
        },
    })
}

impl TryFrom<RawTable> for DimensionTable {
    type Error = Error;

    fn try_from(raw: RawTable) -> Result<Self> {
        let mut rows = IndexMap::new();
        for label_type in LabelType::ALL {
            let Some(bands) = raw.get(&label_type) else {
                return Err(Error::MissingTableEntry {
                    entry: label_type.to_string(),
                });
            };
            let mut row = Vec::with_capacity(SizeBand::ALL.len());
            for band in SizeBand::ALL {
                let Some(style) = bands.get(&band) else {
                    return Err(Error::MissingTableEntry {
                        entry: format!("{label_type}/{band}"),
                    });
                };
                row.push(*style);
            }
            let row: [BandStyle; 7] = row.try_into().map_err(|_| Error::MissingTableEntry {
                entry: label_type.to_string(),
            })?;
            rows.insert(label_type, row);
        }
        Ok(Self { rows })
    }
}

impl From<DimensionTable> for RawTable {
    fn from(table: DimensionTable) -> Self {
        table
            .rows
            .into_iter()
            .map(|(label_type, row)| {
                let bands = SizeBand::ALL.into_iter().zip(row).collect();
                (label_type, bands)
            })
            .collect()
    }
}
