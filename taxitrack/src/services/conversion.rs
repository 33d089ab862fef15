//! Estimate -> invoice -> projects conversion.
//!
//! `convert_estimate` builds every record a conversion creates without touching
//! the dataset; `apply_conversion` then folds a conversion (computed here or
//! returned by the remote store) into the snapshot.

use super::ledger;
use crate::models::{
    Conversion, EstimateLineItem, EstimateStatus, Invoice, InvoiceLineItem, InvoiceStatus,
    Project, ProjectStatus, Snapshot,
};
use crate::utils::{generate_id, IdPrefix};
use anyhow::anyhow;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use taxitrack_core::error::AppError;

/// Line items of `estimate_id` in stored sort order.
pub fn sorted_estimate_lines<'a>(
    snapshot: &'a Snapshot,
    estimate_id: &str,
) -> Vec<&'a EstimateLineItem> {
    let mut lines: Vec<_> = snapshot
        .estimate_line_items
        .iter()
        .filter(|li| li.estimate_id == estimate_id)
        .collect();
    lines.sort_by_key(|li| li.sort_order);
    lines
}

/// Copy estimate lines onto `invoice_id`.
pub fn invoice_line_items(
    lines: &[&EstimateLineItem],
    invoice_id: &str,
    now: DateTime<Utc>,
) -> Vec<InvoiceLineItem> {
    lines
        .iter()
        .map(|li| InvoiceLineItem {
            line_item_id: generate_id(IdPrefix::InvoiceLineItem, now),
            invoice_id: invoice_id.to_string(),
            service_id: li.service_id.clone(),
            description: li.description.clone(),
            species: li.species.clone(),
            mount_type: li.mount_type.clone(),
            quantity: li.quantity,
            unit_price: li.unit_price,
            line_total: ledger::line_total(li.quantity, li.unit_price),
            sort_order: li.sort_order,
        })
        .collect()
}

/// Everything converting `estimate_id` creates.
///
/// Fails with `NotFound` for an unknown estimate and `Conflict` when it was
/// already converted. Approval is not required.
pub fn convert_estimate(
    snapshot: &Snapshot,
    estimate_id: &str,
    deposit_fraction: Decimal,
    now: DateTime<Utc>,
) -> Result<Conversion, AppError> {
    let estimate = snapshot
        .estimates
        .iter()
        .find(|e| e.estimate_id == estimate_id)
        .ok_or_else(|| AppError::NotFound(anyhow!("Estimate {} not found", estimate_id)))?;

    if estimate.status == EstimateStatus::Converted || estimate.converted_to_invoice_id.is_some() {
        return Err(AppError::Conflict(anyhow!(
            "Estimate {} was already converted",
            estimate_id
        )));
    }

    let invoice_id = generate_id(IdPrefix::Invoice, now);
    let invoice = Invoice {
        invoice_id: invoice_id.clone(),
        estimate_id: Some(estimate.estimate_id.clone()),
        customer_id: estimate.customer_id.clone(),
        date_created: now.date_naive(),
        status: InvoiceStatus::Unpaid,
        subtotal: estimate.subtotal,
        tax_rate: estimate.tax_rate,
        total: estimate.total,
        deposit_required: ledger::deposit_required(estimate.total, deposit_fraction),
        amount_paid: Decimal::ZERO,
        balance_due: ledger::balance_due(estimate.total, Decimal::ZERO),
        is_archived: false,
    };

    let lines = sorted_estimate_lines(snapshot, estimate_id);
    let line_items = invoice_line_items(&lines, &invoice_id, now);

    let project_ids = ledger::allocate_project_ids(
        snapshot.projects.iter().map(|p| p.project_id.as_str()),
        ledger::project_year(now),
        lines.len(),
    );
    let projects = lines
        .iter()
        .zip(project_ids)
        .map(|(li, project_id)| Project {
            project_id,
            invoice_id: invoice_id.clone(),
            customer_id: estimate.customer_id.clone(),
            species: li.species.clone(),
            mount_type: li.mount_type.clone(),
            description: li.description.clone(),
            status: ProjectStatus::Received,
            status_updated_at: now,
            notes: None,
            completed_at: None,
            is_archived: false,
        })
        .collect();

    Ok(Conversion {
        invoice,
        line_items,
        projects,
    })
}

/// Fold `conversion` into the dataset and mark the source estimate converted.
/// Records already present under the same ID are replaced.
pub fn apply_conversion(snapshot: &mut Snapshot, estimate_id: &str, conversion: &Conversion) {
    let invoice_id = conversion.invoice.invoice_id.as_str();

    snapshot.invoices.retain(|i| i.invoice_id != invoice_id);
    snapshot.invoices.push(conversion.invoice.clone());

    snapshot
        .invoice_line_items
        .retain(|li| li.invoice_id != invoice_id);
    snapshot
        .invoice_line_items
        .extend(conversion.line_items.iter().cloned());

    snapshot.projects.retain(|p| {
        !conversion
            .projects
            .iter()
            .any(|new| new.project_id == p.project_id)
    });
    snapshot
        .projects
        .extend(conversion.projects.iter().cloned());

    if let Some(estimate) = snapshot
        .estimates
        .iter_mut()
        .find(|e| e.estimate_id == estimate_id)
    {
        estimate.status = EstimateStatus::Converted;
        estimate.converted_to_invoice_id = Some(invoice_id.to_string());
    }
}
