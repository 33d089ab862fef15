//! Dashboard and report figures over the current dataset.

use crate::models::{InvoiceStatus, ProjectStatus, Snapshot};
use crate::utils::days_since;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// Days without a status change before an active project counts as stale.
pub const STALE_AFTER_DAYS: i64 = 30;

const STALE_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusCount {
    pub status: ProjectStatus,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaleProject {
    pub project_id: String,
    pub customer: String,
    pub description: String,
    pub status: ProjectStatus,
    pub days_in_status: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusinessSummary {
    pub active_projects: usize,
    pub ready_for_pickup: usize,
    pub completed_projects: usize,
    pub outstanding_balance: Decimal,
    pub total_revenue: Decimal,
    pub customers: usize,
    pub invoices: usize,
    pub paid_invoices: usize,
    pub payments: usize,
    pub projects_by_status: Vec<StatusCount>,
    pub stale_projects: Vec<StaleProject>,
}

pub fn summarize(snapshot: &Snapshot, now: DateTime<Utc>) -> BusinessSummary {
    let active: Vec<_> = snapshot
        .projects
        .iter()
        .filter(|p| p.status.is_active())
        .collect();

    let projects_by_status = ProjectStatus::ALL
        .into_iter()
        .filter(ProjectStatus::is_active)
        .map(|status| StatusCount {
            status,
            count: active.iter().filter(|p| p.status == status).count(),
        })
        .collect();

    let mut stale: Vec<_> = active
        .iter()
        .map(|p| (p, days_since(p.status_updated_at, now)))
        .filter(|(_, days)| *days > STALE_AFTER_DAYS)
        .collect();
    stale.sort_by(|a, b| b.1.cmp(&a.1));
    let stale_projects = stale
        .into_iter()
        .take(STALE_LIMIT)
        .map(|(p, days)| StaleProject {
            project_id: p.project_id.clone(),
            customer: snapshot
                .customers
                .iter()
                .find(|c| c.customer_id == p.customer_id)
                .map(|c| c.full_name())
                .unwrap_or_else(|| "Unknown".to_string()),
            description: p.description.clone(),
            status: p.status,
            days_in_status: days,
        })
        .collect();

    BusinessSummary {
        active_projects: active.len(),
        ready_for_pickup: active
            .iter()
            .filter(|p| p.status == ProjectStatus::Ready)
            .count(),
        completed_projects: snapshot.projects.len() - active.len(),
        outstanding_balance: snapshot.invoices.iter().map(|i| i.balance_due).sum(),
        total_revenue: snapshot.payments.iter().map(|p| p.amount).sum(),
        customers: snapshot.customers.len(),
        invoices: snapshot.invoices.len(),
        paid_invoices: snapshot
            .invoices
            .iter()
            .filter(|i| i.status == InvoiceStatus::Paid)
            .count(),
        payments: snapshot.payments.len(),
        projects_by_status,
        stale_projects,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Project;
    use chrono::{Duration, TimeZone};

    fn project(id: &str, status: ProjectStatus, updated: DateTime<Utc>) -> Project {
        Project {
            project_id: id.to_string(),
            invoice_id: "INV-1".to_string(),
            customer_id: "CUST-1".to_string(),
            species: None,
            mount_type: None,
            description: format!("Project {}", id),
            status,
            status_updated_at: updated,
            notes: None,
            completed_at: None,
            is_archived: false,
        }
    }

    #[test]
    fn counts_and_stale_projects() {
        let now = Utc.with_ymd_and_hms(2026, 6, 30, 12, 0, 0).unwrap();
        let days_ago = |days| now - Duration::days(days);

        let snapshot = Snapshot {
            projects: vec![
                project("26.01", ProjectStatus::AtTannery, days_ago(90)),
                project("26.02", ProjectStatus::Received, days_ago(31)),
                project("26.03", ProjectStatus::Ready, days_ago(2)),
                project("26.04", ProjectStatus::Completed, days_ago(120)),
                project("26.05", ProjectStatus::InProgress, days_ago(30)),
            ],
            ..Snapshot::default()
        };

        let summary = summarize(&snapshot, now);
        assert_eq!(summary.active_projects, 4);
        assert_eq!(summary.ready_for_pickup, 1);
        assert_eq!(summary.completed_projects, 1);

        let stale: Vec<_> = summary
            .stale_projects
            .iter()
            .map(|s| s.project_id.as_str())
            .collect();
        assert_eq!(stale, vec!["26.01", "26.02"]);
        assert_eq!(summary.stale_projects[0].customer, "Unknown");

        let at_tannery = summary
            .projects_by_status
            .iter()
            .find(|c| c.status == ProjectStatus::AtTannery)
            .unwrap();
        assert_eq!(at_tannery.count, 1);
        assert_eq!(summary.projects_by_status.len(), 5);
    }
}
