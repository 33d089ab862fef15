//! Shared money and numbering rules.
//!
//! The optimistic path and the local conversion fallback both go through
//! these functions, so a total or a project number is computed one way only.

use crate::models::{
    EstimateLineItem, Invoice, InvoiceStatus, LineItemForm, Priced,
};
use crate::utils::{generate_id, IdPrefix};
use chrono::{DateTime, Datelike, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

/// Exact `quantity x unit_price`. Rounding happens only for display.
pub fn line_total(quantity: Decimal, unit_price: Decimal) -> Decimal {
    quantity * unit_price
}

/// Sum of line totals. Tax is carried on documents but not applied, so this is
/// both the subtotal and the total.
pub fn document_total<T: Priced>(items: &[T]) -> Decimal {
    items
        .iter()
        .map(|item| line_total(item.quantity(), item.unit_price()))
        .sum()
}

/// Status as a function of what was paid against the total.
pub fn invoice_status(amount_paid: Decimal, total: Decimal) -> InvoiceStatus {
    if amount_paid >= total {
        InvoiceStatus::Paid
    } else if amount_paid > Decimal::ZERO {
        InvoiceStatus::DepositPaid
    } else {
        InvoiceStatus::Unpaid
    }
}

/// `max(0, total - amount_paid)`.
pub fn balance_due(total: Decimal, amount_paid: Decimal) -> Decimal {
    (total - amount_paid).max(Decimal::ZERO)
}

/// Add `amount` to the invoice and recompute balance and status.
pub fn apply_payment(invoice: &mut Invoice, amount: Decimal) {
    invoice.amount_paid += amount;
    invoice.balance_due = balance_due(invoice.total, invoice.amount_paid);
    invoice.status = invoice_status(invoice.amount_paid, invoice.total);
}

/// Deposit suggested for `total`, rounded to cents with halves away from zero.
pub fn deposit_required(total: Decimal, deposit_fraction: Decimal) -> Decimal {
    (total * deposit_fraction)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Two-digit year used as the project number prefix.
pub fn project_year(now: DateTime<Utc>) -> u32 {
    now.year().rem_euclid(100) as u32
}

/// Highest counter already used for `year`. Malformed counters count as 0.
fn max_project_number<'a>(existing: impl IntoIterator<Item = &'a str>, year: u32) -> u32 {
    let prefix = format!("{:02}.", year);
    existing
        .into_iter()
        .filter_map(|id| id.strip_prefix(prefix.as_str()))
        .map(|nn| nn.trim().parse::<u32>().unwrap_or(0))
        .max()
        .unwrap_or(0)
}

/// Allocate `count` consecutive project IDs for `year`, after the highest
/// already in `existing`.
pub fn allocate_project_ids<'a>(
    existing: impl IntoIterator<Item = &'a str>,
    year: u32,
    count: usize,
) -> Vec<String> {
    let start = max_project_number(existing, year);
    (1..=count as u32)
        .map(|offset| format!("{:02}.{:02}", year, start + offset))
        .collect()
}

/// Estimate lines built from form input, numbered 1..N in the given order.
pub fn estimate_line_items(
    estimate_id: &str,
    forms: &[LineItemForm],
    now: DateTime<Utc>,
) -> Vec<EstimateLineItem> {
    forms
        .iter()
        .zip(1..)
        .map(|(form, sort_order)| EstimateLineItem {
            line_item_id: generate_id(IdPrefix::EstimateLineItem, now),
            estimate_id: estimate_id.to_string(),
            service_id: form.service_id.clone(),
            description: form.description.clone(),
            species: form.species.clone(),
            mount_type: form.mount_type.clone(),
            quantity: form.quantity,
            unit_price: form.unit_price,
            line_total: line_total(form.quantity, form.unit_price),
            sort_order,
        })
        .collect()
}
