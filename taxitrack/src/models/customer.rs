//! Customer model.

use super::cells;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Customer record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(deserialize_with = "cells::text")]
    pub customer_id: String,
    #[serde(default, deserialize_with = "cells::text")]
    pub first_name: String,
    #[serde(default, deserialize_with = "cells::text")]
    pub last_name: String,
    #[serde(default, deserialize_with = "cells::text")]
    pub phone: String,
    #[serde(default, deserialize_with = "cells::opt_text", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "cells::opt_text", skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "cells::opt_text", skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "cells::opt_text", skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default = "cells::epoch_date", deserialize_with = "cells::date")]
    pub created_at: NaiveDate,
    #[serde(default, deserialize_with = "cells::flag")]
    pub is_archived: bool,
}

impl Customer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Case-insensitive name match or substring phone match.
    pub fn matches_search(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        query.is_empty()
            || self.first_name.to_lowercase().contains(&query)
            || self.last_name.to_lowercase().contains(&query)
            || self.phone.contains(&query)
    }
}

/// Input for creating a customer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CustomerForm {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CustomerForm {
    pub fn into_customer(self, customer_id: String, created_at: NaiveDate) -> Customer {
        Customer {
            customer_id,
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone,
            email: self.email,
            city: self.city,
            state: self.state,
            notes: self.notes,
            created_at,
            is_archived: false,
        }
    }
}
