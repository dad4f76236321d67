// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Cortical hemispheres
//!
//! Hemisphere-stacked data always places the left block first.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::GeometryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Hemisphere {
    #[serde(rename = "L")]
    Left,
    #[serde(rename = "R")]
    Right,
}

impl Hemisphere {
    /// Both hemispheres in stacking order
    pub const BOTH: [Hemisphere; 2] = [Hemisphere::Left, Hemisphere::Right];

    /// Single-letter code used in seed tables
    pub fn code(self) -> &'static str {
        match self {
            Hemisphere::Left => "L",
            Hemisphere::Right => "R",
        }
    }
}

impl fmt::Display for Hemisphere {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Hemisphere {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "L" | "l" | "left" | "Left" => Ok(Hemisphere::Left),
            "R" | "r" | "right" | "Right" => Ok(Hemisphere::Right),
            other => Err(GeometryError::UnknownHemisphere(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_codes() {
        assert_eq!("L".parse::<Hemisphere>().unwrap(), Hemisphere::Left);
        assert_eq!(" R ".parse::<Hemisphere>().unwrap(), Hemisphere::Right);
        assert!("X".parse::<Hemisphere>().is_err());
    }

    #[test]
    fn test_stacking_order() {
        assert_eq!(Hemisphere::BOTH, [Hemisphere::Left, Hemisphere::Right]);
        assert!(Hemisphere::Left < Hemisphere::Right);
    }
}
