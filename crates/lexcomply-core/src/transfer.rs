//! # Compliance Transfer
//!
//! A compliance's stored periodicity decides how it is transferred: a
//! dated obligation needs a new due date, an event-based one needs the
//! triggering event, an ongoing one needs nothing further.
//! [`TransferType::from_periodicity`] is the fixed lookup from the stored
//! periodicity to the preselected transfer type.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::validate::parse_date;

/// How a compliance is transferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferType {
    /// A single occurrence on a fixed date.
    OneTime,
    /// A recurring obligation with a due date.
    DueDate,
    /// Triggered by an event.
    EventBased,
    /// Continuous obligation with no date.
    Ongoing,
}

/// Stored periodicity (normalized) → transfer type.
const PERIODICITY_LOOKUP: &[(&str, TransferType)] = &[
    ("one time", TransferType::OneTime),
    ("onetime", TransferType::OneTime),
    ("once", TransferType::OneTime),
    ("due date", TransferType::DueDate),
    ("monthly", TransferType::DueDate),
    ("quarterly", TransferType::DueDate),
    ("half yearly", TransferType::DueDate),
    ("yearly", TransferType::DueDate),
    ("annual", TransferType::DueDate),
    ("annually", TransferType::DueDate),
    ("event based", TransferType::EventBased),
    ("event", TransferType::EventBased),
    ("ongoing", TransferType::Ongoing),
    ("on going", TransferType::Ongoing),
    ("continuous", TransferType::Ongoing),
];

impl TransferType {
    /// All transfer types.
    pub fn all() -> &'static [TransferType] {
        &[
            Self::OneTime,
            Self::DueDate,
            Self::EventBased,
            Self::Ongoing,
        ]
    }

    /// Wire value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneTime => "one_time",
            Self::DueDate => "due_date",
            Self::EventBased => "event_based",
            Self::Ongoing => "ongoing",
        }
    }

    /// Preselect a transfer type from a stored periodicity. Case, hyphens,
    /// underscores and repeated spaces are ignored. Unknown values yield
    /// `None` and the user has to choose.
    pub fn from_periodicity(raw: &str) -> Option<Self> {
        let normalized = raw
            .to_ascii_lowercase()
            .replace(['-', '_'], " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        PERIODICITY_LOOKUP
            .iter()
            .find(|(k, _)| *k == normalized)
            .map(|(_, t)| *t)
    }

    /// Whether step two asks for a due date.
    pub fn needs_due_date(&self) -> bool {
        matches!(self, Self::OneTime | Self::DueDate)
    }

    /// Whether step two asks for an event name and periodicity.
    pub fn needs_event(&self) -> bool {
        matches!(self, Self::EventBased)
    }
}

impl std::fmt::Display for TransferType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TransferType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| {
                format!("unknown transfer type \"{s}\" (expected one_time, due_date, event_based or ongoing)")
            })
    }
}

/// Body of `complianceMaster/complianceTransfer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    /// Compliance being transferred.
    pub compliance_id: String,
    /// Chosen transfer type.
    pub transfer_type: TransferType,
    /// New due date, `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    /// Triggering event name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
    /// Periodicity of the triggering event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_periodicity: Option<String>,
}

impl TransferRequest {
    /// Check that the fields the transfer type needs are present and well
    /// formed. Fields the type does not use must be absent.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.compliance_id.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "complianceId".into(),
                label: "Compliance".into(),
            });
        }
        let blank = |v: &Option<String>| v.as_deref().map(str::trim).unwrap_or("").is_empty();

        if self.transfer_type.needs_due_date() {
            let Some(date) = self.due_date.as_deref().filter(|d| !d.trim().is_empty()) else {
                return Err(ValidationError::Required {
                    field: "dueDate".into(),
                    label: "Due date".into(),
                });
            };
            if parse_date(date.trim()).is_none() {
                return Err(ValidationError::InvalidDate {
                    field: "dueDate".into(),
                    label: "Due date".into(),
                    value: date.to_string(),
                });
            }
        } else if !blank(&self.due_date) {
            return Err(ValidationError::Form(format!(
                "a due date does not apply to {} transfers",
                self.transfer_type
            )));
        }

        if self.transfer_type.needs_event() {
            if blank(&self.event_name) {
                return Err(ValidationError::Required {
                    field: "eventName".into(),
                    label: "Event name".into(),
                });
            }
            if blank(&self.event_periodicity) {
                return Err(ValidationError::Required {
                    field: "eventPeriodicity".into(),
                    label: "Event periodicity".into(),
                });
            }
        } else if !blank(&self.event_name) || !blank(&self.event_periodicity) {
            return Err(ValidationError::Form(format!(
                "event details do not apply to {} transfers",
                self.transfer_type
            )));
        }
        Ok(())
    }
}
