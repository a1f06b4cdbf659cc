//! # Shared Value Types
//!
//! Small value types shared by the catalog, cart and pricing modules.
//!
//! ```text
//! ┌─────────────────┐   ┌──────────────────────────────┐
//! │      Rate       │   │          Variants            │
//! │  ─────────────  │   │  ──────────────────────────  │
//! │  bps (u32)      │   │  BTreeMap<String, String>    │
//! │  1900 = 19%     │   │  "volume" → "ln-rouge-50"    │
//! └─────────────────┘   └──────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

// =============================================================================
// Rate
// =============================================================================

/// A percentage represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1900 bps = 19% (German MwSt), 500 bps = 5% volume discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rate(u32);

impl Rate {
    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Rate(bps)
    }

    /// Creates a rate from a whole percentage (10 → 10%).
    #[inline]
    pub const fn from_percent(percent: u32) -> Self {
        Rate(percent * 100)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero rate.
    #[inline]
    pub const fn zero() -> Self {
        Rate(0)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for Rate {
    fn default() -> Self {
        Rate::zero()
    }
}

// =============================================================================
// Variants
// =============================================================================

/// Selected variants of a line item, keyed by variant name.
///
/// A `BTreeMap` keeps the keys ordered, so two selections with the same
/// entries compare equal regardless of the order they were chosen in. The
/// selection is part of a line item's identity.
pub type Variants = BTreeMap<String, String>;

// =============================================================================
// Unit Tests
// =============================================================================
