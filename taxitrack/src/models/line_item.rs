//! Line items shared by estimates and invoices.

use super::cells;
use super::service::non_negative;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Anything priced as quantity x unit price.
pub trait Priced {
    fn quantity(&self) -> Decimal;
    fn unit_price(&self) -> Decimal;
}

/// Line item on an estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateLineItem {
    #[serde(deserialize_with = "cells::text")]
    pub line_item_id: String,
    #[serde(deserialize_with = "cells::text")]
    pub estimate_id: String,
    #[serde(default, deserialize_with = "cells::opt_text", skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(default, deserialize_with = "cells::text")]
    pub description: String,
    #[serde(default, deserialize_with = "cells::opt_text", skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,
    #[serde(default, deserialize_with = "cells::opt_text", skip_serializing_if = "Option::is_none")]
    pub mount_type: Option<String>,
    #[serde(default, deserialize_with = "cells::decimal")]
    pub quantity: Decimal,
    #[serde(default, deserialize_with = "cells::decimal")]
    pub unit_price: Decimal,
    #[serde(default, deserialize_with = "cells::decimal")]
    pub line_total: Decimal,
    #[serde(default, deserialize_with = "cells::int")]
    pub sort_order: i32,
}

/// Line item on an invoice; same shape as [`EstimateLineItem`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceLineItem {
    #[serde(deserialize_with = "cells::text")]
    pub line_item_id: String,
    #[serde(deserialize_with = "cells::text")]
    pub invoice_id: String,
    #[serde(default, deserialize_with = "cells::opt_text", skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(default, deserialize_with = "cells::text")]
    pub description: String,
    #[serde(default, deserialize_with = "cells::opt_text", skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,
    #[serde(default, deserialize_with = "cells::opt_text", skip_serializing_if = "Option::is_none")]
    pub mount_type: Option<String>,
    #[serde(default, deserialize_with = "cells::decimal")]
    pub quantity: Decimal,
    #[serde(default, deserialize_with = "cells::decimal")]
    pub unit_price: Decimal,
    #[serde(default, deserialize_with = "cells::decimal")]
    pub line_total: Decimal,
    #[serde(default, deserialize_with = "cells::int")]
    pub sort_order: i32,
}

/// Line item as entered on the estimate form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct LineItemForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mount_type: Option<String>,
    #[validate(custom(function = "non_negative"))]
    pub quantity: Decimal,
    #[validate(custom(function = "non_negative"))]
    pub unit_price: Decimal,
}

impl Priced for EstimateLineItem {
    fn quantity(&self) -> Decimal {
        self.quantity
    }
    fn unit_price(&self) -> Decimal {
        self.unit_price
    }
}

impl Priced for InvoiceLineItem {
    fn quantity(&self) -> Decimal {
        self.quantity
    }
    fn unit_price(&self) -> Decimal {
        self.unit_price
    }
}

impl Priced for LineItemForm {
    fn quantity(&self) -> Decimal {
        self.quantity
    }
    fn unit_price(&self) -> Decimal {
        self.unit_price
    }
}
