//! Category -> species -> mount type navigation and the price book view.

use crate::models::{Category, LineItemForm, MountType, Service, Snapshot, Species};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// Group label for services without a species.
pub const OTHER_SPECIES: &str = "Other";

pub fn categories(snapshot: &Snapshot) -> Vec<&Category> {
    let mut categories: Vec<_> = snapshot.categories.iter().collect();
    categories.sort_by_key(|c| c.sort_order);
    categories
}

pub fn species_for<'a>(snapshot: &'a Snapshot, category: &str) -> Vec<&'a Species> {
    let mut species: Vec<_> = snapshot
        .species
        .iter()
        .filter(|s| s.category == category)
        .collect();
    species.sort_by_key(|s| s.sort_order);
    species
}

/// Mount types offered for a species, including the category-wide ones.
pub fn mount_types_for<'a>(
    snapshot: &'a Snapshot,
    category: &str,
    species: &str,
) -> Vec<&'a MountType> {
    let mut mount_types: Vec<_> = snapshot
        .mount_types
        .iter()
        .filter(|m| m.applies_to(category, species))
        .collect();
    mount_types.sort_by_key(|m| m.sort_order);
    mount_types
}

/// Price book filters. Empty fields match everything.
#[derive(Debug, Clone, Default)]
pub struct PriceBookFilter {
    pub search: String,
    pub category: Option<String>,
}

impl PriceBookFilter {
    fn matches(&self, service: &Service) -> bool {
        let search = self.search.trim().to_lowercase();
        let haystack = format!(
            "{} {} {}",
            service.description, service.species, service.mount_type
        )
        .to_lowercase();
        let category_ok = self
            .category
            .as_deref()
            .map_or(true, |category| service.category == category);
        category_ok && (search.is_empty() || haystack.contains(&search))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceBookGroup {
    pub species: String,
    pub services: Vec<Service>,
}

/// Active services grouped by species, groups in alphabetical order.
pub fn price_book(services: &[Service], filter: &PriceBookFilter) -> Vec<PriceBookGroup> {
    let mut groups: BTreeMap<String, Vec<Service>> = BTreeMap::new();
    for service in services
        .iter()
        .filter(|s| s.is_active && filter.matches(s))
    {
        let species = match service.species.trim() {
            "" => OTHER_SPECIES.to_string(),
            name => name.to_string(),
        };
        groups.entry(species).or_default().push(service.clone());
    }

    groups
        .into_iter()
        .map(|(species, services)| PriceBookGroup { species, services })
        .collect()
}

/// Estimate line pre-filled from a price book entry.
pub fn line_item_from_service(service: &Service, quantity: Decimal) -> LineItemForm {
    let optional = |value: &str| {
        let value = value.trim();
        (!value.is_empty()).then(|| value.to_string())
    };

    LineItemForm {
        service_id: Some(service.service_id.clone()),
        description: service.description.clone(),
        species: optional(&service.species),
        mount_type: optional(&service.mount_type),
        quantity,
        unit_price: service.base_price,
    }
}
