//! Business profile settings.

use super::cells;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::str::FromStr;

/// Deposit fraction used when settings carry no usable percentage.
pub const DEFAULT_DEPOSIT_FRACTION: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// Single settings record. Unknown keys are kept so they survive a round trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default, deserialize_with = "cells::text")]
    pub business_name: String,
    #[serde(default, deserialize_with = "cells::text")]
    pub phone: String,
    #[serde(default, deserialize_with = "cells::text")]
    pub address: String,
    #[serde(default, deserialize_with = "cells::text")]
    pub city_state_zip: String,
    #[serde(default, deserialize_with = "cells::text")]
    pub email: String,
    /// Percentage as entered, e.g. `"50"`.
    #[serde(default, deserialize_with = "cells::text")]
    pub default_deposit_percent: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Settings {
    /// Deposit as a fraction of total, falling back to one half.
    pub fn deposit_fraction(&self) -> Decimal {
        deposit_fraction(Some(self))
    }
}

/// Deposit fraction for optional settings.
pub fn deposit_fraction(settings: Option<&Settings>) -> Decimal {
    settings
        .map(|s| s.default_deposit_percent.trim().trim_end_matches('%').trim())
        .filter(|pct| !pct.is_empty())
        .and_then(|pct| Decimal::from_str(pct).ok())
        .filter(|pct| !pct.is_sign_negative())
        .map(|pct| pct / Decimal::ONE_HUNDRED)
        .unwrap_or(DEFAULT_DEPOSIT_FRACTION)
}
