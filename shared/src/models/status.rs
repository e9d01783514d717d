//! Safety status levels and the overall status rule

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Safety status attached to each aggregate window, ordered by severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SafetyStatus {
    Safe,
    Caution,
    Unsafe,
}

/// Summary label across every location's latest record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OverallStatus {
    Safe,
    Caution,
    Unsafe,
    Unknown,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unrecognized safety status: {0}")]
pub struct ParseStatusError(pub String);

impl SafetyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SafetyStatus::Safe => "Safe",
            SafetyStatus::Caution => "Caution",
            SafetyStatus::Unsafe => "Unsafe",
        }
    }
}

impl fmt::Display for SafetyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SafetyStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Safe" => Ok(SafetyStatus::Safe),
            "Caution" => Ok(SafetyStatus::Caution),
            "Unsafe" => Ok(SafetyStatus::Unsafe),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

impl From<SafetyStatus> for OverallStatus {
    fn from(status: SafetyStatus) -> Self {
        match status {
            SafetyStatus::Safe => OverallStatus::Safe,
            SafetyStatus::Caution => OverallStatus::Caution,
            SafetyStatus::Unsafe => OverallStatus::Unsafe,
        }
    }
}

impl OverallStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverallStatus::Safe => "Safe",
            OverallStatus::Caution => "Caution",
            OverallStatus::Unsafe => "Unsafe",
            OverallStatus::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derive the overall status from per-location statuses.
///
/// The most severe status wins. An empty input yields `Unknown`.
pub fn derive_overall_status<I>(statuses: I) -> OverallStatus
where
    I: IntoIterator<Item = SafetyStatus>,
{
    statuses
        .into_iter()
        .max()
        .map(OverallStatus::from)
        .unwrap_or(OverallStatus::Unknown)
}
