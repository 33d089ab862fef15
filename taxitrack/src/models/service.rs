//! Price book entry.

use super::cells;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// A reusable catalog entry: category, species, mount type and base price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    #[serde(deserialize_with = "cells::text")]
    pub service_id: String,
    #[serde(default, deserialize_with = "cells::text")]
    pub category: String,
    #[serde(default, deserialize_with = "cells::text")]
    pub species: String,
    #[serde(default, deserialize_with = "cells::text")]
    pub mount_type: String,
    #[serde(default, deserialize_with = "cells::text")]
    pub description: String,
    #[serde(default, deserialize_with = "cells::decimal")]
    pub base_price: Decimal,
    #[serde(default = "active", deserialize_with = "cells::flag_default_true")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "cells::opt_date", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDate>,
}

fn active() -> bool {
    true
}

pub(crate) fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut err = ValidationError::new("non_negative");
        err.message = Some("Amount must not be negative".into());
        return Err(err);
    }
    Ok(())
}

/// Input for creating a price book entry.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServiceForm {
    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,
    pub species: String,
    pub mount_type: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(custom(function = "non_negative"))]
    pub base_price: Decimal,
}

impl ServiceForm {
    pub fn into_service(self, service_id: String, created_at: NaiveDate) -> Service {
        Service {
            service_id,
            category: self.category,
            species: self.species,
            mount_type: self.mount_type,
            description: self.description,
            base_price: self.base_price,
            is_active: true,
            created_at: Some(created_at),
        }
    }
}
