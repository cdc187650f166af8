use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The fixed color palette shared by snapshot color tags and tab groups.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum TagColor {
    #[default]
    Grey,
    Blue,
    Red,
    Yellow,
    Green,
    Pink,
    Purple,
    Cyan,
    Orange,
}

impl TagColor {
    /// Every palette entry, in palette order.
    pub const ALL: [TagColor; 9] = [
        TagColor::Grey,
        TagColor::Blue,
        TagColor::Red,
        TagColor::Yellow,
        TagColor::Green,
        TagColor::Pink,
        TagColor::Purple,
        TagColor::Cyan,
        TagColor::Orange,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TagColor::Grey => "grey",
            TagColor::Blue => "blue",
            TagColor::Red => "red",
            TagColor::Yellow => "yellow",
            TagColor::Green => "green",
            TagColor::Pink => "pink",
            TagColor::Purple => "purple",
            TagColor::Cyan => "cyan",
            TagColor::Orange => "orange",
        }
    }
}

impl fmt::Display for TagColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TagColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TagColor::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown color: {}", s))
    }
}
