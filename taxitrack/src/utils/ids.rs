//! Client-side record IDs.

use chrono::{DateTime, Utc};
use rand::Rng;
use std::fmt;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Record kinds that get a prefixed client ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdPrefix {
    Customer,
    Service,
    Species,
    Estimate,
    EstimateLineItem,
    Invoice,
    InvoiceLineItem,
    Payment,
}

impl IdPrefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdPrefix::Customer => "CUST",
            IdPrefix::Service => "SVC",
            IdPrefix::Species => "SP",
            IdPrefix::Estimate => "EST",
            IdPrefix::EstimateLineItem => "ELI",
            IdPrefix::Invoice => "INV",
            IdPrefix::InvoiceLineItem => "ILI",
            IdPrefix::Payment => "PAY",
        }
    }
}

impl fmt::Display for IdPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `PREFIX-` + last six digits of the epoch millis + four random base-36 chars.
pub fn generate_id(prefix: IdPrefix, now: DateTime<Utc>) -> String {
    let millis = now.timestamp_millis().rem_euclid(1_000_000);
    let mut rng = rand::thread_rng();
    let suffix: String = (0..4)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("{}-{:06}{}", prefix, millis, suffix)
}
