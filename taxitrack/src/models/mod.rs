//! Domain models for taxitrack.

pub mod cells;
mod customer;
mod estimate;
mod invoice;
mod line_item;
mod lookup;
mod payment;
mod project;
mod service;
mod settings;
mod snapshot;

pub use customer::{Customer, CustomerForm};
pub use estimate::{Estimate, EstimateForm, EstimateStatus, EstimateUpdate};
pub use invoice::{Invoice, InvoiceStatus};
pub use line_item::{EstimateLineItem, InvoiceLineItem, LineItemForm, Priced};
pub use lookup::{Category, MountType, Species, SpeciesForm};
pub use payment::{Payment, PaymentForm, PaymentMethod};
pub use project::{Project, ProjectStatus};
pub use service::{Service, ServiceForm};
pub use settings::{deposit_fraction, Settings, DEFAULT_DEPOSIT_FRACTION};
pub use snapshot::{Conversion, ConnectionStatus, PaymentReceipt, SetupResult, Snapshot};
