// src/models.rs
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::generators::GeneratorError;

/// Password strength preset. Each tier maps to a fixed alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Easy,
    Medium,
    Hard,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Easy, Tier::Medium, Tier::Hard];

    pub fn label(&self) -> &'static str {
        match self {
            Tier::Easy => "Easy      (letters + digits)",
            Tier::Medium => "Medium    (letters + digits + some special characters)",
            Tier::Hard => "Hard      (letters + digits + many special characters)",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Easy => write!(f, "easy"),
            Tier::Medium => write!(f, "medium"),
            Tier::Hard => write!(f, "hard"),
        }
    }
}

impl FromStr for Tier {
    type Err = GeneratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "easy" => Ok(Tier::Easy),
            "2" | "medium" => Ok(Tier::Medium),
            "3" | "hard" => Ok(Tier::Hard),
            _ => Err(GeneratorError::InvalidTier(s.to_string())),
        }
    }
}

// One persisted credential. Only the hash of the secret is ever stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub service: String,
    pub username: String,
    pub secret_hash: String,
    pub created_at: String,
}
