//! Compression ratios.
//!
//! A ratio of 1:20 asks for a summary roughly one twentieth the length of
//! the source. The ratio only selects the instruction template; chunking is
//! the same for every ratio.

use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// A concrete compression target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Ratio {
    /// 1:5
    OneTo5,
    /// 1:10
    OneTo10,
    /// 1:20
    OneTo20,
    /// 1:50
    OneTo50,
    /// 1:100
    OneTo100,
}

impl Ratio {
    /// Coarsest to finest. Both the `all` pass order and the report order.
    pub const DESCENDING: [Self; 5] = [
        Self::OneTo100,
        Self::OneTo50,
        Self::OneTo20,
        Self::OneTo10,
        Self::OneTo5,
    ];

    /// The `N` in `1:N`.
    #[must_use]
    pub const fn denominator(self) -> u32 {
        match self {
            Self::OneTo5 => 5,
            Self::OneTo10 => 10,
            Self::OneTo20 => 20,
            Self::OneTo50 => 50,
            Self::OneTo100 => 100,
        }
    }

    /// Parse a bare denominator.
    #[must_use]
    pub const fn from_denominator(n: u32) -> Option<Self> {
        match n {
            5 => Some(Self::OneTo5),
            10 => Some(Self::OneTo10),
            20 => Some(Self::OneTo20),
            50 => Some(Self::OneTo50),
            100 => Some(Self::OneTo100),
            _ => None,
        }
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "1:{}", self.denominator())
    }
}

impl FromStr for Ratio {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix("1:").unwrap_or(trimmed);
        digits
            .parse::<u32>()
            .ok()
            .and_then(Self::from_denominator)
            .ok_or_else(|| Error::InvalidRatio(s.to_string()))
    }
}

/// Which ratios a run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatioSelector {
    /// A single ratio.
    One(Ratio),
    /// Every ratio, coarsest first.
    All,
}

impl RatioSelector {
    /// The ratios to compute, in pass order.
    #[must_use]
    pub fn ratios(self) -> Vec<Ratio> {
        match self {
            Self::One(ratio) => vec![ratio],
            Self::All => Ratio::DESCENDING.to_vec(),
        }
    }

    /// Whether this selects more than one ratio.
    #[must_use]
    pub const fn is_all(self) -> bool {
        matches!(self, Self::All)
    }
}

impl From<Ratio> for RatioSelector {
    fn from(ratio: Ratio) -> Self {
        Self::One(ratio)
    }
}

impl fmt::Display for RatioSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::One(ratio) => ratio.fmt(f),
            Self::All => f.write_str("all"),
        }
    }
}

impl FromStr for RatioSelector {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            s.parse().map(Self::One)
        }
    }
}
