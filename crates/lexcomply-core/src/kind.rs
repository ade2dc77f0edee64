//! # Entity Kinds
//!
//! The closed set of record types the admin panel manages. Every schema,
//! list view and dialog is keyed by one of these variants; adding a kind
//! forces the registry `match` to grow with it.

use serde::{Deserialize, Serialize};

/// A kind of record managed through the admin panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
    /// Statutory act master.
    Act,
    /// Compliance obligation attached to an act.
    Compliance,
    /// Copy of a compliance onto another act.
    ComplianceCopy,
    /// Notification, circular or amendment document.
    Document,
    /// Statutory form with an attached template file.
    Form,
    /// Triggering event for event-based compliances.
    Event,
    /// Compliances linked to a selected event (read only).
    EventCompliance,
    /// News update / dossier entry.
    Dossier,
    /// Administrator account.
    Admin,
    /// State master.
    State,
    /// Act type master.
    ActType,
    /// Act category master.
    ActCategory,
}

impl EntityKind {
    /// All kinds, in menu order.
    pub fn all() -> &'static [EntityKind] {
        &[
            Self::Act,
            Self::Compliance,
            Self::ComplianceCopy,
            Self::Document,
            Self::Form,
            Self::Event,
            Self::EventCompliance,
            Self::Dossier,
            Self::Admin,
            Self::State,
            Self::ActType,
            Self::ActCategory,
        ]
    }

    /// Stable kebab-case name used by the CLI and in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Act => "act",
            Self::Compliance => "compliance",
            Self::ComplianceCopy => "compliance-copy",
            Self::Document => "document",
            Self::Form => "form",
            Self::Event => "event",
            Self::EventCompliance => "event-compliance",
            Self::Dossier => "dossier",
            Self::Admin => "admin",
            Self::State => "state",
            Self::ActType => "act-type",
            Self::ActCategory => "act-category",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        // "news" is what the panel's menu calls dossiers.
        if wanted == "news" {
            return Ok(Self::Dossier);
        }
        Self::all()
            .iter()
            .copied()
            .find(|k| k.as_str() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::all().iter().map(|k| k.as_str()).collect();
                format!("unknown entity kind \"{s}\" (expected one of: {})", known.join(", "))
            })
    }
}
