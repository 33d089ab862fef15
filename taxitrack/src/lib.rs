//! TaxiTrack - customers, estimates, invoices and projects for a taxidermy shop,
//! kept in a spreadsheet behind a single HTTP endpoint.

pub mod config;
pub mod models;
pub mod services;
pub mod utils;
