//! Payment model.

use super::cells;
use super::service::non_negative;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// How a payment was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    Cash,
    Check,
    Card,
    Venmo,
    Other,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 5] = [
        PaymentMethod::Cash,
        PaymentMethod::Check,
        PaymentMethod::Card,
        PaymentMethod::Venmo,
        PaymentMethod::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Check => "Check",
            PaymentMethod::Card => "Card",
            PaymentMethod::Venmo => "Venmo",
            PaymentMethod::Other => "Other",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaymentMethod::ALL
            .into_iter()
            .find(|method| method.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown payment method '{}'", s))
    }
}

/// Payment received against an invoice. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    #[serde(deserialize_with = "cells::text")]
    pub payment_id: String,
    #[serde(deserialize_with = "cells::text")]
    pub invoice_id: String,
    #[serde(default = "cells::epoch_date", deserialize_with = "cells::date")]
    pub date: NaiveDate,
    #[serde(default, deserialize_with = "cells::decimal")]
    pub amount: Decimal,
    pub method: PaymentMethod,
    #[serde(default, deserialize_with = "cells::opt_text", skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default = "cells::epoch", deserialize_with = "cells::timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Input for recording a payment.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PaymentForm {
    #[validate(length(min = 1, message = "Invoice is required"))]
    pub invoice_id: String,
    #[validate(custom(function = "non_negative"))]
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl PaymentForm {
    pub fn into_payment(self, payment_id: String, created_at: DateTime<Utc>) -> Payment {
        Payment {
            payment_id,
            invoice_id: self.invoice_id,
            date: self.date,
            amount: self.amount,
            method: self.method,
            notes: self.notes,
            created_at,
        }
    }
}
