//! Project model: one physical piece moving through the shop.

use super::cells;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fabrication pipeline status, in shop order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProjectStatus {
    Received,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "At Tannery")]
    AtTannery,
    Finishing,
    Ready,
    Completed,
    #[serde(rename = "Picked Up")]
    PickedUp,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 7] = [
        ProjectStatus::Received,
        ProjectStatus::InProgress,
        ProjectStatus::AtTannery,
        ProjectStatus::Finishing,
        ProjectStatus::Ready,
        ProjectStatus::Completed,
        ProjectStatus::PickedUp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Received => "Received",
            ProjectStatus::InProgress => "In Progress",
            ProjectStatus::AtTannery => "At Tannery",
            ProjectStatus::Finishing => "Finishing",
            ProjectStatus::Ready => "Ready",
            ProjectStatus::Completed => "Completed",
            ProjectStatus::PickedUp => "Picked Up",
        }
    }

    /// Label shown to people; `Ready` reads as "Ready for Pickup".
    pub fn label(&self) -> &'static str {
        match self {
            ProjectStatus::Ready => "Ready for Pickup",
            other => other.as_str(),
        }
    }

    /// Still in the shop's hands.
    pub fn is_active(&self) -> bool {
        !matches!(self, ProjectStatus::Completed | ProjectStatus::PickedUp)
    }

    /// Eligible for the bulk "send to tannery" action.
    pub fn can_send_to_tannery(&self) -> bool {
        matches!(
            self,
            ProjectStatus::Received | ProjectStatus::InProgress | ProjectStatus::Finishing
        )
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ProjectStatus::ALL
            .into_iter()
            .find(|status| {
                status.as_str().eq_ignore_ascii_case(wanted)
                    || status.label().eq_ignore_ascii_case(wanted)
                    || status.as_str().replace(' ', "-").eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| format!("unknown project status '{}'", s))
    }
}

/// Project record. IDs look like `26.07`: two-digit year, per-year counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(deserialize_with = "cells::text")]
    pub project_id: String,
    #[serde(deserialize_with = "cells::text")]
    pub invoice_id: String,
    #[serde(deserialize_with = "cells::text")]
    pub customer_id: String,
    #[serde(default, deserialize_with = "cells::opt_text", skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,
    #[serde(default, deserialize_with = "cells::opt_text", skip_serializing_if = "Option::is_none")]
    pub mount_type: Option<String>,
    #[serde(default, deserialize_with = "cells::text")]
    pub description: String,
    pub status: ProjectStatus,
    #[serde(default = "cells::epoch", deserialize_with = "cells::timestamp")]
    pub status_updated_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "cells::opt_text", skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "cells::opt_timestamp", skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "cells::flag")]
    pub is_archived: bool,
}

impl Project {
    /// Move to `status` at `now`. Notes are overwritten only when given; the
    /// first move to `Completed` stamps `completed_at`.
    pub fn set_status(&mut self, status: ProjectStatus, notes: Option<&str>, now: DateTime<Utc>) {
        self.status = status;
        self.status_updated_at = now;
        if let Some(notes) = notes {
            self.notes = Some(notes.to_string());
        }
        if status == ProjectStatus::Completed && self.completed_at.is_none() {
            self.completed_at = Some(now);
        }
    }
}
