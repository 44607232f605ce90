//! Storage entry status and item categories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a storage entry.
///
/// ```text
/// active ──claim──▶ claimed
///    │
///    └──expiry sweep──▶ expired
/// ```
///
/// `claimed` and `expired` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    Active,
    Claimed,
    Expired,
}

impl EntryStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Claimed => "claimed",
            Self::Expired => "expired",
        }
    }

    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Active, Self::Claimed) | (Self::Active, Self::Expired)
        )
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a stored status string is not one of the known values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown value {0:?}")]
pub struct UnknownVariant(pub String);

impl FromStr for EntryStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "claimed" => Ok(Self::Claimed),
            "expired" => Ok(Self::Expired),
            other => Err(UnknownVariant(other.to_owned())),
        }
    }
}

/// Category used by staff to shelve items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    Books,
    Electronics,
    Clothing,
    Stationery,
    Sports,
    #[default]
    Misc,
}

impl ItemCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Books => "books",
            Self::Electronics => "electronics",
            Self::Clothing => "clothing",
            Self::Stationery => "stationery",
            Self::Sports => "sports",
            Self::Misc => "misc",
        }
    }
}

impl FromStr for ItemCategory {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "books" => Ok(Self::Books),
            "electronics" => Ok(Self::Electronics),
            "clothing" => Ok(Self::Clothing),
            "stationery" => Ok(Self::Stationery),
            "sports" => Ok(Self::Sports),
            "misc" => Ok(Self::Misc),
            other => Err(UnknownVariant(other.to_owned())),
        }
    }
}
