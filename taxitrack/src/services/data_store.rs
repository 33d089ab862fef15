//! Client state container.
//!
//! `DataStore` holds the in-memory copy of every collection. Each mutation is
//! applied locally first, then sent to the remote store; a confirmed record
//! replaces the optimistic one, a failed call leaves the local change in place
//! and marks it failed in the sync tracker until the next refresh.

use super::conversion;
use super::ledger;
use super::metrics::LOCAL_FALLBACKS_TOTAL;
use super::remote::{actions, RemoteError, RemoteStore};
use super::snapshot_store::SnapshotStore;
use super::sync::{FailedRecord, RecordKind, SyncStatus, SyncTracker};
use crate::models::{
    deposit_fraction, ConnectionStatus, Conversion, Customer, CustomerForm, Estimate,
    EstimateForm, EstimateLineItem, EstimateStatus, EstimateUpdate, Invoice, InvoiceLineItem,
    LineItemForm, Payment, PaymentForm, Project, ProjectStatus, Service, ServiceForm, Settings,
    Snapshot, Species, SpeciesForm,
};
use crate::utils::{format_date, generate_id, IdPrefix};
use anyhow::anyhow;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;
use taxitrack_core::error::AppError;
use validator::Validate;

/// Source of "now" for IDs, dates and timestamps.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

pub struct DataStore {
    data: Snapshot,
    loading: bool,
    syncing: bool,
    connected: bool,
    remote: Arc<dyn RemoteStore>,
    cache: Arc<dyn SnapshotStore>,
    sync: SyncTracker,
    clock: Clock,
}

/// Replace the record matching `is_target`, or append it.
fn replace_or_push<T>(items: &mut Vec<T>, record: T, is_target: impl Fn(&T) -> bool) {
    match items.iter_mut().find(|item| is_target(item)) {
        Some(slot) => *slot = record,
        None => items.push(record),
    }
}

fn sorted_by_order<'a, T>(mut items: Vec<&'a T>, order: impl Fn(&T) -> i32) -> Vec<&'a T> {
    items.sort_by_key(|item| order(*item));
    items
}

impl DataStore {
    /// Seed from the snapshot store when it has something, so reads work
    /// before the first refresh.
    pub fn open(remote: Arc<dyn RemoteStore>, cache: Arc<dyn SnapshotStore>) -> Self {
        let cached = cache.load();
        let seeded = cached.is_some();
        if seeded {
            tracing::debug!("Seeded state from local snapshot");
        }

        Self {
            data: cached.unwrap_or_default(),
            loading: !seeded,
            syncing: false,
            connected: seeded,
            remote,
            cache,
            sync: SyncTracker::new(),
            clock: Arc::new(Utc::now),
        }
    }

    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        self.clock = Arc::new(clock);
        self
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    pub fn data(&self) -> &Snapshot {
        &self.data
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_syncing(&self) -> bool {
        self.syncing
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn deposit_fraction(&self) -> Decimal {
        deposit_fraction(self.data.settings.as_ref())
    }

    fn persist(&self) {
        if !self.loading && self.connected {
            self.cache.save(&self.data);
        }
    }

    /// Close out a remote call. Failures become "no result" and count as a
    /// local fallback for `action`.
    fn settle<T>(&mut self, action: &'static str, result: Result<T, RemoteError>) -> Option<T> {
        self.syncing = false;
        match result {
            Ok(value) => {
                self.connected = true;
                Some(value)
            }
            Err(e) => {
                LOCAL_FALLBACKS_TOTAL.with_label_values(&[action]).inc();
                tracing::warn!(action, error = %e, "Remote write failed, keeping local change");
                None
            }
        }
    }

    // ==================== Sync ====================

    /// Replace every collection with the remote dataset.
    pub async fn refresh(&mut self) -> Result<(), RemoteError> {
        self.syncing = true;
        let result = self.remote.get_all_data().await;
        self.syncing = false;
        self.loading = false;

        match result {
            Ok(data) => {
                self.data = data;
                self.connected = true;
                self.sync.clear();
                self.persist();
                tracing::info!(
                    customers = self.data.customers.len(),
                    estimates = self.data.estimates.len(),
                    invoices = self.data.invoices.len(),
                    projects = self.data.projects.len(),
                    "Dataset refreshed"
                );
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Refresh failed, keeping local state");
                Err(e)
            }
        }
    }

    pub async fn test_connection(&mut self) -> Result<ConnectionStatus, RemoteError> {
        self.syncing = true;
        let result = self.remote.test_connection().await;
        self.syncing = false;
        if let Ok(status) = &result {
            self.connected = status.connected;
        }
        result
    }

    pub async fn setup_database(&mut self) -> Result<bool, RemoteError> {
        self.syncing = true;
        let result = self.remote.setup_database().await;
        self.syncing = false;
        let setup = result?.setup;
        self.connected = true;
        Ok(setup)
    }

    pub async fn fetch_settings(&mut self) -> Result<Settings, RemoteError> {
        self.syncing = true;
        let result = self.remote.get_settings().await;
        self.syncing = false;
        let settings = result?;
        self.connected = true;
        self.data.settings = Some(settings.clone());
        self.persist();
        Ok(settings)
    }

    pub fn sync_status(&self, kind: RecordKind, id: &str) -> Option<SyncStatus> {
        self.sync.status(kind, id)
    }

    pub fn failed_records(&self) -> Vec<FailedRecord> {
        self.sync.failed_records()
    }

    // ==================== Customers ====================

    pub async fn add_customer(&mut self, form: CustomerForm) -> Result<Customer, AppError> {
        form.validate()?;
        let now = self.now();
        let local = form
            .clone()
            .into_customer(generate_id(IdPrefix::Customer, now), now.date_naive());
        let local_id = local.customer_id.clone();

        self.data.customers.push(local.clone());
        self.sync.pending(RecordKind::Customer, &local_id);
        self.persist();

        self.syncing = true;
        let result = self.remote.add_customer(&form).await;
        let customer = match self.settle(actions::ADD_CUSTOMER, result) {
            Some(confirmed) => {
                self.sync
                    .confirmed(RecordKind::Customer, &local_id, &confirmed.customer_id);
                replace_or_push(&mut self.data.customers, confirmed.clone(), |c| {
                    c.customer_id == local_id
                });
                confirmed
            }
            None => {
                self.sync.failed(RecordKind::Customer, &local_id);
                local
            }
        };
        self.persist();
        Ok(customer)
    }

    pub async fn update_customer(&mut self, customer: Customer) -> Result<Customer, AppError> {
        let id = customer.customer_id.clone();
        if self.customer(&id).is_none() {
            return Err(AppError::NotFound(anyhow!("Customer {} not found", id)));
        }

        replace_or_push(&mut self.data.customers, customer.clone(), |c| {
            c.customer_id == id
        });
        self.sync.pending(RecordKind::Customer, &id);
        self.persist();

        self.syncing = true;
        let result = self.remote.update_customer(&customer).await;
        let customer = match self.settle(actions::UPDATE_CUSTOMER, result) {
            Some(confirmed) => {
                self.sync
                    .confirmed(RecordKind::Customer, &id, &confirmed.customer_id);
                replace_or_push(&mut self.data.customers, confirmed.clone(), |c| {
                    c.customer_id == id
                });
                confirmed
            }
            None => {
                self.sync.failed(RecordKind::Customer, &id);
                customer
            }
        };
        self.persist();
        Ok(customer)
    }

    // ==================== Price book ====================

    pub async fn add_service(&mut self, form: ServiceForm) -> Result<Service, AppError> {
        form.validate()?;
        let now = self.now();
        let local = form
            .clone()
            .into_service(generate_id(IdPrefix::Service, now), now.date_naive());
        let local_id = local.service_id.clone();

        self.data.services.push(local.clone());
        self.sync.pending(RecordKind::Service, &local_id);
        self.persist();

        self.syncing = true;
        let result = self.remote.add_service(&form).await;
        let service = match self.settle(actions::ADD_SERVICE, result) {
            Some(confirmed) => {
                self.sync
                    .confirmed(RecordKind::Service, &local_id, &confirmed.service_id);
                replace_or_push(&mut self.data.services, confirmed.clone(), |s| {
                    s.service_id == local_id
                });
                confirmed
            }
            None => {
                self.sync.failed(RecordKind::Service, &local_id);
                local
            }
        };
        self.persist();
        Ok(service)
    }

    pub async fn update_service(&mut self, service: Service) -> Result<Service, AppError> {
        let id = service.service_id.clone();
        if !self.data.services.iter().any(|s| s.service_id == id) {
            return Err(AppError::NotFound(anyhow!("Service {} not found", id)));
        }

        replace_or_push(&mut self.data.services, service.clone(), |s| s.service_id == id);
        self.sync.pending(RecordKind::Service, &id);
        self.persist();

        self.syncing = true;
        let result = self.remote.update_service(&service).await;
        let service = match self.settle(actions::UPDATE_SERVICE, result) {
            Some(confirmed) => {
                self.sync
                    .confirmed(RecordKind::Service, &id, &confirmed.service_id);
                replace_or_push(&mut self.data.services, confirmed.clone(), |s| {
                    s.service_id == id
                });
                confirmed
            }
            None => {
                self.sync.failed(RecordKind::Service, &id);
                service
            }
        };
        self.persist();
        Ok(service)
    }

    /// Add a species to `category`. An existing species with the same name,
    /// ignoring case, is returned as is without a remote call.
    pub async fn add_species(&mut self, category: &str, name: &str) -> Result<Species, AppError> {
        let category = category.trim();
        let name = name.trim();
        if category.is_empty() || name.is_empty() {
            return Err(AppError::BadRequest(anyhow!(
                "Species needs a category and a name"
            )));
        }

        if let Some(existing) = self
            .data
            .species
            .iter()
            .find(|s| s.is_same(category, name))
        {
            return Ok(existing.clone());
        }

        let now = self.now();
        let sort_order = self
            .data
            .species
            .iter()
            .filter(|s| s.category == category)
            .map(|s| s.sort_order)
            .max()
            .unwrap_or(0)
            + 1;
        let local = Species {
            species_id: generate_id(IdPrefix::Species, now),
            category: category.to_string(),
            name: name.to_string(),
            sort_order,
        };
        let local_id = local.species_id.clone();

        self.data.species.push(local.clone());
        self.sync.pending(RecordKind::Species, &local_id);
        self.persist();

        let form = SpeciesForm {
            category: category.to_string(),
            name: name.to_string(),
        };
        self.syncing = true;
        let result = self.remote.add_species(&form).await;
        let species = match self.settle(actions::ADD_SPECIES, result) {
            Some(confirmed) => {
                self.sync
                    .confirmed(RecordKind::Species, &local_id, &confirmed.species_id);
                // The server may hand back a species it already had.
                self.data
                    .species
                    .retain(|s| s.species_id != local_id && s.species_id != confirmed.species_id);
                self.data.species.push(confirmed.clone());
                confirmed
            }
            None => {
                self.sync.failed(RecordKind::Species, &local_id);
                local
            }
        };
        self.persist();
        Ok(species)
    }

    // ==================== Estimates ====================

    /// Create a draft estimate and return its ID.
    pub async fn add_estimate(&mut self, form: EstimateForm) -> Result<String, AppError> {
        form.validate()?;
        let now = self.now();
        let local_id = generate_id(IdPrefix::Estimate, now);
        let total = ledger::document_total(&form.line_items);

        let estimate = Estimate {
            estimate_id: local_id.clone(),
            customer_id: form.customer_id.clone(),
            date_created: now.date_naive(),
            status: EstimateStatus::Draft,
            notes: form.notes.clone(),
            subtotal: total,
            tax_rate: Decimal::ZERO,
            total,
            converted_to_invoice_id: None,
            is_archived: false,
        };
        let lines = ledger::estimate_line_items(&local_id, &form.line_items, now);

        self.data.estimates.push(estimate);
        self.data.estimate_line_items.extend(lines);
        self.sync.pending(RecordKind::Estimate, &local_id);
        self.persist();

        self.syncing = true;
        let result = self.remote.add_estimate(&form).await;
        let estimate_id = match self.settle(actions::ADD_ESTIMATE, result) {
            Some(confirmed) => {
                let confirmed_id = confirmed.estimate_id.clone();
                if confirmed_id != local_id {
                    for line in self
                        .data
                        .estimate_line_items
                        .iter_mut()
                        .filter(|li| li.estimate_id == local_id)
                    {
                        line.estimate_id = confirmed_id.clone();
                    }
                }
                self.sync
                    .confirmed(RecordKind::Estimate, &local_id, &confirmed_id);
                replace_or_push(&mut self.data.estimates, confirmed, |e| {
                    e.estimate_id == local_id
                });
                confirmed_id
            }
            None => {
                self.sync.failed(RecordKind::Estimate, &local_id);
                local_id
            }
        };
        self.persist();
        Ok(estimate_id)
    }

    /// Replace an estimate's lines and recompute its totals.
    pub async fn update_estimate(
        &mut self,
        estimate: Estimate,
        line_items: Vec<LineItemForm>,
    ) -> Result<Estimate, AppError> {
        if line_items.is_empty() {
            return Err(AppError::BadRequest(anyhow!(
                "Please add at least one line item"
            )));
        }
        for line in &line_items {
            line.validate()?;
        }

        let id = estimate.estimate_id.clone();
        let current = self
            .estimate(&id)
            .ok_or_else(|| AppError::NotFound(anyhow!("Estimate {} not found", id)))?;
        if current.status == EstimateStatus::Converted {
            return Err(AppError::Conflict(anyhow!(
                "Estimate {} was already converted",
                id
            )));
        }
        if estimate.status == EstimateStatus::Converted {
            return Err(AppError::BadRequest(anyhow!(
                "Estimates are marked converted only by conversion"
            )));
        }

        let now = self.now();
        let total = ledger::document_total(&line_items);
        let local = Estimate {
            subtotal: total,
            total,
            converted_to_invoice_id: None,
            ..estimate
        };

        self.data.estimate_line_items.retain(|li| li.estimate_id != id);
        self.data
            .estimate_line_items
            .extend(ledger::estimate_line_items(&id, &line_items, now));
        replace_or_push(&mut self.data.estimates, local.clone(), |e| e.estimate_id == id);
        self.sync.pending(RecordKind::Estimate, &id);
        self.persist();

        let update = EstimateUpdate {
            estimate: local.clone(),
            line_items,
        };
        self.syncing = true;
        let result = self.remote.update_estimate(&update).await;
        let estimate = match self.settle(actions::UPDATE_ESTIMATE, result) {
            Some(confirmed) => {
                self.sync
                    .confirmed(RecordKind::Estimate, &id, &confirmed.estimate_id);
                replace_or_push(&mut self.data.estimates, confirmed.clone(), |e| {
                    e.estimate_id == id
                });
                confirmed
            }
            None => {
                self.sync.failed(RecordKind::Estimate, &id);
                local
            }
        };
        self.persist();
        Ok(estimate)
    }

    /// Move an estimate between Draft, Sent, Approved and Declined.
    pub async fn update_estimate_status(
        &mut self,
        estimate_id: &str,
        status: EstimateStatus,
    ) -> Result<Estimate, AppError> {
        if status == EstimateStatus::Converted {
            return Err(AppError::BadRequest(anyhow!(
                "Estimates are marked converted only by conversion"
            )));
        }

        let estimate = self
            .data
            .estimates
            .iter_mut()
            .find(|e| e.estimate_id == estimate_id)
            .ok_or_else(|| AppError::NotFound(anyhow!("Estimate {} not found", estimate_id)))?;
        if estimate.status == EstimateStatus::Converted {
            return Err(AppError::Conflict(anyhow!(
                "Estimate {} was already converted",
                estimate_id
            )));
        }
        estimate.status = status;
        let local = estimate.clone();

        self.sync.pending(RecordKind::Estimate, estimate_id);
        self.persist();

        self.syncing = true;
        let result = self.remote.update_estimate_status(estimate_id, status).await;
        let estimate = match self.settle(actions::UPDATE_ESTIMATE_STATUS, result) {
            Some(confirmed) => {
                self.sync
                    .confirmed(RecordKind::Estimate, estimate_id, &confirmed.estimate_id);
                replace_or_push(&mut self.data.estimates, confirmed.clone(), |e| {
                    e.estimate_id == estimate_id
                });
                confirmed
            }
            None => {
                self.sync.failed(RecordKind::Estimate, estimate_id);
                local
            }
        };
        self.persist();
        Ok(estimate)
    }

    /// Turn an estimate into an invoice with one project per line item.
    ///
    /// The remote store performs the conversion when it can; otherwise the
    /// same conversion is computed locally.
    pub async fn convert_estimate_to_invoice(
        &mut self,
        estimate_id: &str,
    ) -> Result<Conversion, AppError> {
        let now = self.now();
        let local = conversion::convert_estimate(
            &self.data,
            estimate_id,
            self.deposit_fraction(),
            now,
        )?;

        self.syncing = true;
        let result = self.remote.convert_estimate_to_invoice(estimate_id).await;
        let converted = match self.settle(actions::CONVERT_ESTIMATE, result) {
            Some(mut confirmed) => {
                if confirmed.line_items.is_empty() {
                    let lines = conversion::sorted_estimate_lines(&self.data, estimate_id);
                    confirmed.line_items =
                        conversion::invoice_line_items(&lines, &confirmed.invoice.invoice_id, now);
                }
                self.sync.confirmed(
                    RecordKind::Invoice,
                    &confirmed.invoice.invoice_id,
                    &confirmed.invoice.invoice_id,
                );
                for project in &confirmed.projects {
                    self.sync
                        .confirmed(RecordKind::Project, &project.project_id, &project.project_id);
                }
                confirmed
            }
            None => {
                self.sync
                    .failed(RecordKind::Invoice, &local.invoice.invoice_id);
                for project in &local.projects {
                    self.sync.failed(RecordKind::Project, &project.project_id);
                }
                local
            }
        };

        conversion::apply_conversion(&mut self.data, estimate_id, &converted);
        self.persist();
        tracing::info!(
            estimate_id,
            invoice_id = %converted.invoice.invoice_id,
            projects = converted.projects.len(),
            "Estimate converted"
        );
        Ok(converted)
    }

    // ==================== Payments ====================

    pub async fn add_payment(&mut self, form: PaymentForm) -> Result<Payment, AppError> {
        form.validate()?;
        let now = self.now();

        let invoice = self
            .data
            .invoices
            .iter_mut()
            .find(|i| i.invoice_id == form.invoice_id)
            .ok_or_else(|| AppError::NotFound(anyhow!("Invoice {} not found", form.invoice_id)))?;
        ledger::apply_payment(invoice, form.amount);

        let local = form
            .clone()
            .into_payment(generate_id(IdPrefix::Payment, now), now);
        let local_id = local.payment_id.clone();
        self.data.payments.push(local.clone());
        self.sync.pending(RecordKind::Payment, &local_id);
        self.persist();

        self.syncing = true;
        let result = self.remote.add_payment(&form).await;
        let payment = match self.settle(actions::ADD_PAYMENT, result) {
            Some(receipt) => {
                self.sync
                    .confirmed(RecordKind::Payment, &local_id, &receipt.payment.payment_id);
                replace_or_push(&mut self.data.payments, receipt.payment.clone(), |p| {
                    p.payment_id == local_id
                });
                let invoice_id = receipt.invoice.invoice_id.clone();
                replace_or_push(&mut self.data.invoices, receipt.invoice, |i| {
                    i.invoice_id == invoice_id
                });
                receipt.payment
            }
            None => {
                self.sync.failed(RecordKind::Payment, &local_id);
                local
            }
        };
        self.persist();
        Ok(payment)
    }

    // ==================== Projects ====================

    pub async fn update_project_status(
        &mut self,
        project_id: &str,
        status: ProjectStatus,
        notes: Option<&str>,
    ) -> Result<Project, AppError> {
        let now = self.now();
        let project = self
            .data
            .projects
            .iter_mut()
            .find(|p| p.project_id == project_id)
            .ok_or_else(|| AppError::NotFound(anyhow!("Project {} not found", project_id)))?;
        project.set_status(status, notes, now);
        let local = project.clone();

        self.sync.pending(RecordKind::Project, project_id);
        self.persist();

        self.syncing = true;
        let result = self
            .remote
            .update_project_status(project_id, status, notes)
            .await;
        let project = match self.settle(actions::UPDATE_PROJECT_STATUS, result) {
            Some(confirmed) => {
                self.sync
                    .confirmed(RecordKind::Project, project_id, &confirmed.project_id);
                replace_or_push(&mut self.data.projects, confirmed.clone(), |p| {
                    p.project_id == project_id
                });
                confirmed
            }
            None => {
                self.sync.failed(RecordKind::Project, project_id);
                local
            }
        };
        self.persist();
        Ok(project)
    }

    /// Apply the same status (and notes, when given) to every listed project.
    pub async fn batch_update_projects(
        &mut self,
        project_ids: &[String],
        status: ProjectStatus,
        notes: Option<&str>,
    ) -> Result<Vec<Project>, AppError> {
        if project_ids.is_empty() {
            return Ok(Vec::new());
        }
        if let Some(missing) = project_ids
            .iter()
            .find(|id| self.project(id.as_str()).is_none())
        {
            return Err(AppError::NotFound(anyhow!("Project {} not found", missing)));
        }

        let now = self.now();
        let mut local = Vec::with_capacity(project_ids.len());
        for project in self
            .data
            .projects
            .iter_mut()
            .filter(|p| project_ids.contains(&p.project_id))
        {
            project.set_status(status, notes, now);
            local.push(project.clone());
        }
        for id in project_ids {
            self.sync.pending(RecordKind::Project, id);
        }
        self.persist();

        self.syncing = true;
        let result = self
            .remote
            .batch_update_projects(project_ids, status, notes)
            .await;
        let projects = match self.settle(actions::BATCH_UPDATE_PROJECTS, result) {
            Some(confirmed) => {
                for project in &confirmed {
                    let id = project.project_id.clone();
                    self.sync.confirmed(RecordKind::Project, &id, &id);
                    replace_or_push(&mut self.data.projects, project.clone(), |p| {
                        p.project_id == id
                    });
                }
                confirmed
            }
            None => {
                for id in project_ids {
                    self.sync.failed(RecordKind::Project, id);
                }
                local
            }
        };
        self.persist();
        Ok(projects)
    }

    /// Move projects to At Tannery with a note naming the tannery and date.
    pub async fn send_to_tannery(
        &mut self,
        project_ids: &[String],
        tannery: &str,
        date: NaiveDate,
        notes: Option<&str>,
    ) -> Result<Vec<Project>, AppError> {
        let tannery = tannery.trim();
        if tannery.is_empty() {
            return Err(AppError::BadRequest(anyhow!("Tannery name is required")));
        }
        if project_ids.is_empty() {
            return Err(AppError::BadRequest(anyhow!(
                "Select at least one project"
            )));
        }
        for id in project_ids {
            let project = self
                .project(id)
                .ok_or_else(|| AppError::NotFound(anyhow!("Project {} not found", id)))?;
            if !project.status.can_send_to_tannery() {
                return Err(AppError::BadRequest(anyhow!(
                    "Project {} is {} and cannot go to the tannery",
                    id,
                    project.status.label()
                )));
            }
        }

        let mut note = format!("Sent to {} on {}", tannery, format_date(date));
        if let Some(extra) = notes.map(str::trim).filter(|n| !n.is_empty()) {
            note.push_str(" - ");
            note.push_str(extra);
        }

        self.batch_update_projects(project_ids, ProjectStatus::AtTannery, Some(&note))
            .await
    }

    // ==================== Settings ====================

    pub async fn update_settings(&mut self, settings: Settings) -> Result<Settings, AppError> {
        self.data.settings = Some(settings.clone());
        self.sync.pending(RecordKind::Settings, "settings");
        self.persist();

        self.syncing = true;
        let result = self.remote.update_settings(&settings).await;
        let settings = match self.settle(actions::UPDATE_SETTINGS, result) {
            Some(confirmed) => {
                self.sync
                    .confirmed(RecordKind::Settings, "settings", "settings");
                self.data.settings = Some(confirmed.clone());
                confirmed
            }
            None => {
                self.sync.failed(RecordKind::Settings, "settings");
                settings
            }
        };
        self.persist();
        Ok(settings)
    }

    // ==================== Lookups ====================

    pub fn customer(&self, customer_id: &str) -> Option<&Customer> {
        self.data
            .customers
            .iter()
            .find(|c| c.customer_id == customer_id)
    }

    /// Customers matching `query` by name or phone; all when blank.
    pub fn search_customers(&self, query: &str) -> Vec<&Customer> {
        self.data
            .customers
            .iter()
            .filter(|c| !c.is_archived && c.matches_search(query))
            .collect()
    }

    pub fn estimate(&self, estimate_id: &str) -> Option<&Estimate> {
        self.data
            .estimates
            .iter()
            .find(|e| e.estimate_id == estimate_id)
    }

    pub fn invoice(&self, invoice_id: &str) -> Option<&Invoice> {
        self.data
            .invoices
            .iter()
            .find(|i| i.invoice_id == invoice_id)
    }

    pub fn project(&self, project_id: &str) -> Option<&Project> {
        self.data
            .projects
            .iter()
            .find(|p| p.project_id == project_id)
    }

    pub fn estimate_line_items(&self, estimate_id: &str) -> Vec<&EstimateLineItem> {
        sorted_by_order(
            self.data
                .estimate_line_items
                .iter()
                .filter(|li| li.estimate_id == estimate_id)
                .collect(),
            |li| li.sort_order,
        )
    }

    pub fn invoice_line_items(&self, invoice_id: &str) -> Vec<&InvoiceLineItem> {
        sorted_by_order(
            self.data
                .invoice_line_items
                .iter()
                .filter(|li| li.invoice_id == invoice_id)
                .collect(),
            |li| li.sort_order,
        )
    }

    pub fn invoice_payments(&self, invoice_id: &str) -> Vec<&Payment> {
        self.data
            .payments
            .iter()
            .filter(|p| p.invoice_id == invoice_id)
            .collect()
    }

    pub fn invoice_projects(&self, invoice_id: &str) -> Vec<&Project> {
        self.data
            .projects
            .iter()
            .filter(|p| p.invoice_id == invoice_id)
            .collect()
    }
}
