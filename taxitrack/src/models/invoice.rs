//! Invoice model.

use super::cells;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Invoice status, derived from amount paid against total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvoiceStatus {
    Unpaid,
    #[serde(rename = "Deposit Paid")]
    DepositPaid,
    Paid,
}

impl InvoiceStatus {
    pub const ALL: [InvoiceStatus; 3] = [
        InvoiceStatus::Unpaid,
        InvoiceStatus::DepositPaid,
        InvoiceStatus::Paid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Unpaid => "Unpaid",
            InvoiceStatus::DepositPaid => "Deposit Paid",
            InvoiceStatus::Paid => "Paid",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvoiceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InvoiceStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown invoice status '{}'", s))
    }
}

/// Invoice document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    #[serde(deserialize_with = "cells::text")]
    pub invoice_id: String,
    #[serde(default, deserialize_with = "cells::opt_text", skip_serializing_if = "Option::is_none")]
    pub estimate_id: Option<String>,
    #[serde(deserialize_with = "cells::text")]
    pub customer_id: String,
    #[serde(default = "cells::epoch_date", deserialize_with = "cells::date")]
    pub date_created: NaiveDate,
    pub status: InvoiceStatus,
    #[serde(default, deserialize_with = "cells::decimal")]
    pub subtotal: Decimal,
    #[serde(default, deserialize_with = "cells::decimal")]
    pub tax_rate: Decimal,
    #[serde(default, deserialize_with = "cells::decimal")]
    pub total: Decimal,
    #[serde(default, deserialize_with = "cells::decimal")]
    pub deposit_required: Decimal,
    #[serde(default, deserialize_with = "cells::decimal")]
    pub amount_paid: Decimal,
    #[serde(default, deserialize_with = "cells::decimal")]
    pub balance_due: Decimal,
    #[serde(default, deserialize_with = "cells::flag")]
    pub is_archived: bool,
}
