//! Board: a named market sub-segment from the external catalog.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Catalog category of a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardCategory {
    /// Industry classification board.
    Industry,
    /// Thematic / concept board.
    Concept,
}

impl BoardCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Industry => "industry",
            Self::Concept => "concept",
        }
    }

    pub fn all() -> [BoardCategory; 2] {
        [Self::Industry, Self::Concept]
    }
}

impl fmt::Display for BoardCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BoardCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "industry" => Ok(Self::Industry),
            "concept" => Ok(Self::Concept),
            other => Err(format!("unknown board category '{other}'")),
        }
    }
}

/// A board as listed in the catalog. Read-only for the whole run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub code: String,
    pub name: String,
    pub category: BoardCategory,
}

impl Board {
    pub fn new(code: impl Into<String>, name: impl Into<String>, category: BoardCategory) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            category,
        }
    }
}
