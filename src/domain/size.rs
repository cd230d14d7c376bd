//! Size tier classification from parcel dimensions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Physical parcel measurements in centimetres and grams.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Parcel {
    pub length: f64,
    pub width: f64,
    pub thickness: f64,
    pub weight: u32,
}

impl Parcel {
    pub fn new(length: f64, width: f64, thickness: f64, weight: u32) -> Self {
        Self {
            length,
            width,
            thickness,
            weight,
        }
    }

    /// Three-side sum used by the box tiers.
    pub fn total_size(&self) -> f64 {
        self.length + self.width + self.thickness
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SizeCode {
    #[serde(rename = "compact")]
    Compact,
    #[serde(rename = "60")]
    S60,
    #[serde(rename = "80")]
    S80,
    #[serde(rename = "100")]
    S100,
    #[serde(rename = "120")]
    S120,
    #[serde(rename = "140")]
    S140,
    #[serde(rename = "160")]
    S160,
    #[serde(rename = "180")]
    S180,
    #[serde(rename = "200")]
    S200,
}

/// Upper bound of each summed-dimension band, smallest first.
const SIZE_BANDS: [(f64, SizeCode); 7] = [
    (60.0, SizeCode::S60),
    (80.0, SizeCode::S80),
    (100.0, SizeCode::S100),
    (120.0, SizeCode::S120),
    (140.0, SizeCode::S140),
    (160.0, SizeCode::S160),
    (180.0, SizeCode::S180),
];

impl SizeCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SizeCode::Compact => "compact",
            SizeCode::S60 => "60",
            SizeCode::S80 => "80",
            SizeCode::S100 => "100",
            SizeCode::S120 => "120",
            SizeCode::S140 => "140",
            SizeCode::S160 => "160",
            SizeCode::S180 => "180",
            SizeCode::S200 => "200",
        }
    }

    /// Price multiplier against the 60 tier. `None` for the compact box, which has its own table.
    pub fn multiplier(&self) -> Option<f64> {
        match self {
            SizeCode::Compact => None,
            SizeCode::S60 => Some(1.0),
            SizeCode::S80 => Some(1.28),
            SizeCode::S100 => Some(1.55),
            SizeCode::S120 => Some(1.81),
            SizeCode::S140 => Some(2.11),
            SizeCode::S160 => Some(2.33),
            SizeCode::S180 => Some(2.70),
            SizeCode::S200 => Some(3.05),
        }
    }

    pub fn is_box_tier(&self) -> bool {
        !matches!(self, SizeCode::Compact)
    }
}

impl fmt::Display for SizeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn fits_compact_box(parcel: &Parcel) -> bool {
    parcel.length <= 25.0 && parcel.width <= 20.0 && parcel.thickness <= 5.0
}

fn fits_thin_compact_box(parcel: &Parcel) -> bool {
    parcel.length <= 34.0 && parcel.width <= 24.8 && parcel.thickness <= 3.0
}

/// Classifies a parcel into a size tier. Weight never changes the tier.
pub fn size_category(parcel: &Parcel) -> SizeCode {
    if fits_compact_box(parcel) || fits_thin_compact_box(parcel) {
        return SizeCode::Compact;
    }

    let total = parcel.total_size();
    SIZE_BANDS
        .iter()
        .find(|(limit, _)| total <= *limit)
        .map(|(_, code)| *code)
        .unwrap_or(SizeCode::S200)
}
