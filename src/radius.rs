use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Search radius in kilometers, restricted to the values offered by the selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Radius(u32);

impl Radius {
    pub const OPTIONS_KM: [u32; 7] = [50, 70, 100, 120, 250, 500, 1000];
    pub const DEFAULT: Radius = Radius(100);

    pub fn km(self) -> u32 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = Radius> {
        Self::OPTIONS_KM.into_iter().map(Radius)
    }

    fn position(self) -> usize {
        Self::OPTIONS_KM
            .iter()
            .position(|&km| km == self.0)
            .unwrap_or_default()
    }

    /// Next larger option, staying on the largest one
    pub fn next(self) -> Radius {
        let idx = (self.position() + 1).min(Self::OPTIONS_KM.len() - 1);
        Radius(Self::OPTIONS_KM[idx])
    }

    /// Next smaller option, staying on the smallest one
    pub fn previous(self) -> Radius {
        Radius(Self::OPTIONS_KM[self.position().saturating_sub(1)])
    }
}

impl Default for Radius {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u32> for Radius {
    type Error = anyhow::Error;

    fn try_from(km: u32) -> Result<Self> {
        if Self::OPTIONS_KM.contains(&km) {
            Ok(Radius(km))
        } else {
            Err(anyhow!(
                "Unsupported radius {} km (expected one of {:?})",
                km,
                Self::OPTIONS_KM
            ))
        }
    }
}

impl From<Radius> for u32 {
    fn from(radius: Radius) -> Self {
        radius.0
    }
}

impl FromStr for Radius {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let km: u32 = trimmed
            .strip_suffix("km")
            .unwrap_or(trimmed)
            .trim()
            .parse()
            .map_err(|e| anyhow!("Invalid radius '{}': {}", s, e))?;
        Radius::try_from(km)
    }
}

impl fmt::Display for Radius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} km", self.0)
    }
}
