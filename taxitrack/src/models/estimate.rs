//! Estimate model.

use super::cells;
use super::line_item::LineItemForm;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// Estimate status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EstimateStatus {
    Draft,
    Sent,
    Approved,
    Declined,
    Converted,
}

impl EstimateStatus {
    pub const ALL: [EstimateStatus; 5] = [
        EstimateStatus::Draft,
        EstimateStatus::Sent,
        EstimateStatus::Approved,
        EstimateStatus::Declined,
        EstimateStatus::Converted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EstimateStatus::Draft => "Draft",
            EstimateStatus::Sent => "Sent",
            EstimateStatus::Approved => "Approved",
            EstimateStatus::Declined => "Declined",
            EstimateStatus::Converted => "Converted",
        }
    }
}

impl fmt::Display for EstimateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EstimateStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EstimateStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown estimate status '{}'", s))
    }
}

/// Estimate document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    #[serde(deserialize_with = "cells::text")]
    pub estimate_id: String,
    #[serde(deserialize_with = "cells::text")]
    pub customer_id: String,
    #[serde(default = "cells::epoch_date", deserialize_with = "cells::date")]
    pub date_created: NaiveDate,
    pub status: EstimateStatus,
    #[serde(default, deserialize_with = "cells::opt_text", skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "cells::decimal")]
    pub subtotal: Decimal,
    #[serde(default, deserialize_with = "cells::decimal")]
    pub tax_rate: Decimal,
    #[serde(default, deserialize_with = "cells::decimal")]
    pub total: Decimal,
    #[serde(default, deserialize_with = "cells::opt_text", skip_serializing_if = "Option::is_none")]
    pub converted_to_invoice_id: Option<String>,
    #[serde(default, deserialize_with = "cells::flag")]
    pub is_archived: bool,
}

/// Input for creating an estimate.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct EstimateForm {
    #[validate(length(min = 1, message = "Please select a customer"))]
    pub customer_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[validate(length(min = 1, message = "Please add at least one line item"), nested)]
    pub line_items: Vec<LineItemForm>,
}

/// Payload of the `updateEstimate` action: the estimate plus its new lines.
#[derive(Debug, Clone, Serialize)]
pub struct EstimateUpdate {
    #[serde(flatten)]
    pub estimate: Estimate,
    pub line_items: Vec<LineItemForm>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("approved".parse(), Ok(EstimateStatus::Approved));
        assert!("Pending".parse::<EstimateStatus>().is_err());
    }

    #[test]
    fn empty_form_fails_validation() {
        let form = EstimateForm::default();
        let errors = form.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("customer_id"));
        assert!(fields.contains_key("line_items"));
    }
}
