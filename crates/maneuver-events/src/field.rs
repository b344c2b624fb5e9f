//! Measurement fields that can be tracked in a track log.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// A measurement column of a track sample, with its unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackedField {
    PosX,
    PosY,
    #[serde(rename = "alt", alias = "altitude")]
    Altitude,
    Speed,
    Heading,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown tracked field '{input}' (expected one of pos_x, pos_y, alt, speed, heading)")]
pub struct ParseFieldError {
    pub input: String,
}

impl TrackedField {
    pub const ALL: [Self; 5] = [
        Self::PosX,
        Self::PosY,
        Self::Altitude,
        Self::Speed,
        Self::Heading,
    ];

    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::PosX => "pos_x",
            Self::PosY => "pos_y",
            Self::Altitude => "alt",
            Self::Speed => "speed",
            Self::Heading => "heading",
        }
    }

    #[must_use]
    pub const fn unit(self) -> &'static str {
        match self {
            Self::PosX | Self::PosY | Self::Altitude => "ft",
            Self::Speed => "kts",
            Self::Heading => "deg",
        }
    }
}

impl fmt::Display for TrackedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.id(), f)
    }
}

impl FromStr for TrackedField {
    type Err = ParseFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "altitude" {
            return Ok(Self::Altitude);
        }
        Self::ALL
            .into_iter()
            .find(|field| field.id() == lower)
            .ok_or_else(|| ParseFieldError {
                input: s.to_owned(),
            })
    }
}
