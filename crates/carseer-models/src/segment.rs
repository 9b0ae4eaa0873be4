use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Market segment a make belongs to. Selects depreciation, mileage and range parameters.
///
/// Declaration order is the catalog scan order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Segment {
    Luxury,
    #[serde(rename = "Super Luxury")]
    SuperLuxury,
    Exotic,
    Premium,
    #[default]
    Mainstream,
}

impl Segment {
    pub const ALL: [Segment; 5] = [
        Segment::Luxury,
        Segment::SuperLuxury,
        Segment::Exotic,
        Segment::Premium,
        Segment::Mainstream,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Segment::Luxury => "Luxury",
            Segment::SuperLuxury => "Super Luxury",
            Segment::Exotic => "Exotic",
            Segment::Premium => "Premium",
            Segment::Mainstream => "Mainstream",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Segment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Segment::ALL
            .into_iter()
            .find(|segment| segment.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown segment: {s}"))
    }
}
