//! Lookup tables behind the category -> species -> mount type selector.

use super::cells;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(deserialize_with = "cells::text")]
    pub category_id: String,
    #[serde(deserialize_with = "cells::text")]
    pub name: String,
    #[serde(default, deserialize_with = "cells::text")]
    pub icon: String,
    #[serde(default, deserialize_with = "cells::int")]
    pub sort_order: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Species {
    #[serde(deserialize_with = "cells::text")]
    pub species_id: String,
    #[serde(deserialize_with = "cells::text")]
    pub category: String,
    #[serde(deserialize_with = "cells::text")]
    pub name: String,
    #[serde(default, deserialize_with = "cells::int")]
    pub sort_order: i32,
}

impl Species {
    /// Same category, name equal ignoring case.
    pub fn is_same(&self, category: &str, name: &str) -> bool {
        self.category == category && self.name.trim().to_lowercase() == name.trim().to_lowercase()
    }
}

/// Mount type. An empty `species` applies to every species in the category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MountType {
    #[serde(deserialize_with = "cells::text")]
    pub mount_type_id: String,
    #[serde(deserialize_with = "cells::text")]
    pub category: String,
    #[serde(default, deserialize_with = "cells::text")]
    pub species: String,
    #[serde(deserialize_with = "cells::text")]
    pub name: String,
    #[serde(default, deserialize_with = "cells::int")]
    pub sort_order: i32,
}

impl MountType {
    pub fn applies_to(&self, category: &str, species: &str) -> bool {
        self.category == category && (self.species.is_empty() || self.species == species)
    }
}

/// Input for the `addSpecies` action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesForm {
    pub category: String,
    pub name: String,
}
