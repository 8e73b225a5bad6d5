use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Numeric band encoded as `"min-max"` in product payloads, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InclusiveRange {
    min: u32,
    max: u32,
}

impl InclusiveRange {
    pub fn new(min: u32, max: u32) -> Result<Self, RangeParseError> {
        if min > max {
            return Err(RangeParseError::Inverted { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn parse(raw: &str) -> Result<Self, RangeParseError> {
        let trimmed = raw.trim();
        let (min, max) = trimmed
            .split_once('-')
            .ok_or_else(|| RangeParseError::Malformed(raw.to_string()))?;

        let min = parse_bound(min, raw)?;
        let max = parse_bound(max, raw)?;
        Self::new(min, max)
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn contains(&self, value: u32) -> bool {
        self.min <= value && value <= self.max
    }

    pub fn overlaps(&self, other: &InclusiveRange) -> bool {
        self.min <= other.max && other.min <= self.max
    }
}

fn parse_bound(part: &str, raw: &str) -> Result<u32, RangeParseError> {
    part.trim()
        .parse::<u32>()
        .map_err(|_| RangeParseError::Malformed(raw.to_string()))
}

impl FromStr for InclusiveRange {
    type Err = RangeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for InclusiveRange {
    type Error = RangeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<InclusiveRange> for String {
    fn from(value: InclusiveRange) -> Self {
        value.to_string()
    }
}

impl fmt::Display for InclusiveRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeParseError {
    #[error("range '{0}' is not of the form min-max")]
    Malformed(String),
    #[error("range lower bound {min} exceeds upper bound {max}")]
    Inverted { min: u32, max: u32 },
}
