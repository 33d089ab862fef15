//! The full dataset and the composite results returned by remote actions.

use super::{
    Category, Customer, Estimate, EstimateLineItem, Invoice, InvoiceLineItem, MountType, Payment,
    Project, Service, Settings, Species,
};
use serde::{Deserialize, Deserializer, Serialize};

fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

/// Every collection the shop works with. Missing keys are empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default, deserialize_with = "null_as_default")]
    pub customers: Vec<Customer>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub services: Vec<Service>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub estimates: Vec<Estimate>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub estimate_line_items: Vec<EstimateLineItem>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub invoices: Vec<Invoice>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub invoice_line_items: Vec<InvoiceLineItem>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub payments: Vec<Payment>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub settings: Option<Settings>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub categories: Vec<Category>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub species: Vec<Species>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mount_types: Vec<MountType>,
}

/// Result of `testConnection`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStatus {
    pub connected: bool,
    #[serde(default)]
    pub needs_setup: bool,
    #[serde(default)]
    pub sheet_name: String,
}

/// Result of `setupDatabase`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupResult {
    pub setup: bool,
}

/// Everything an estimate conversion creates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversion {
    pub invoice: Invoice,
    #[serde(default, alias = "lineItems", alias = "invoiceLineItems")]
    pub line_items: Vec<InvoiceLineItem>,
    #[serde(default)]
    pub projects: Vec<Project>,
}

/// Result of `addPayment`: the stored payment and the recomputed invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentReceipt {
    pub payment: Payment,
    pub invoice: Invoice,
}
