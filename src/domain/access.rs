use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::constants::{
    PACKAGE_FREE_GYM, PACKAGE_PERSONAL, PACKAGE_PERSONAL_TRAINING, PACKAGE_PILATES,
    PACKAGE_STANDARD,
};

/// Entrance category a reception scanner accepts a QR code for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QrCategory {
    FreeGym,
    Pilates,
    Personal,
}

impl QrCategory {
    /// Maps a package kind to its QR category. Kinds without a scanner
    /// category (e.g. "ultimate") yield `None`.
    pub fn for_package_kind(kind: &str) -> Option<Self> {
        match kind {
            PACKAGE_FREE_GYM | PACKAGE_STANDARD => Some(QrCategory::FreeGym),
            PACKAGE_PILATES => Some(QrCategory::Pilates),
            PACKAGE_PERSONAL_TRAINING | PACKAGE_PERSONAL => Some(QrCategory::Personal),
            _ => None,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            QrCategory::FreeGym => "free_gym",
            QrCategory::Pilates => "pilates",
            QrCategory::Personal => "personal",
        }
    }
}

impl fmt::Display for QrCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Current access of a single user, derived from their rows at one instant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessState {
    pub categories: BTreeSet<String>,
    pub has_any_access: bool,
    pub credits_by_category: BTreeMap<String, u64>,
}

impl AccessState {
    pub fn has_category(&self, kind: &str) -> bool {
        self.categories.contains(kind)
    }

    /// Usable credits for a package kind; 0 when no usable deposit exists.
    pub fn credits_for(&self, kind: &str) -> u64 {
        self.credits_by_category.get(kind).copied().unwrap_or(0)
    }

    pub fn total_credits(&self) -> u64 {
        self.credits_by_category.values().sum()
    }

    pub fn qr_categories(&self) -> BTreeSet<QrCategory> {
        self.categories
            .iter()
            .filter_map(|kind| QrCategory::for_package_kind(kind))
            .collect()
    }
}

/// Access evaluated at `start + offset_days`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Checkpoint {
    pub offset_days: i64,
    pub at: DateTime<Utc>,
    pub access: AccessState,
}
