use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Transit operator owning a slice of the schedule store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Agency {
    #[serde(rename = "stm")]
    Stm,
    #[serde(rename = "exo")]
    ExoBus,
    #[serde(rename = "train")]
    ExoTrain,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown agency {0:?}, expected one of stm, exo, train")]
pub struct ParseAgencyError(pub String);

impl Agency {
    pub const ALL: [Agency; 3] = [Agency::Stm, Agency::ExoBus, Agency::ExoTrain];

    /// Key used for the `agency` column of every store table.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Agency::Stm => "stm",
            Agency::ExoBus => "exo",
            Agency::ExoTrain => "train",
        }
    }

    pub const fn is_train(&self) -> bool {
        matches!(self, Agency::ExoTrain)
    }
}

impl fmt::Display for Agency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Agency {
    type Err = ParseAgencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Agency::ALL
            .into_iter()
            .find(|agency| agency.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseAgencyError(s.to_string()))
    }
}
