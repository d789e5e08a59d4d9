//! Read-only reference data: the emergency-type catalog, the default
//! directory of local emergency numbers and the safety tips shown on the
//! emergency screen.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmergencyType {
    Medical,
    Police,
    Fire,
    Lost,
    Accident,
    Other,
}

impl EmergencyType {
    pub const ALL: [EmergencyType; 6] = [
        Self::Medical,
        Self::Police,
        Self::Fire,
        Self::Lost,
        Self::Accident,
        Self::Other,
    ];

    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Medical => "medical",
            Self::Police => "police",
            Self::Fire => "fire",
            Self::Lost => "lost",
            Self::Accident => "accident",
            Self::Other => "other",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Medical => "Medical Emergency",
            Self::Police => "Police Assistance",
            Self::Fire => "Fire Emergency",
            Self::Lost => "Lost/Stranded",
            Self::Accident => "Accident",
            Self::Other => "Other Emergency",
        }
    }

    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Medical => "🏥",
            Self::Police => "👮",
            Self::Fire => "🚒",
            Self::Lost => "🗺️",
            Self::Accident => "🚨",
            Self::Other => "⚠️",
        }
    }

    /// Lenient lookup used by shells that only keep the string id around.
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        let id = id.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.id().eq_ignore_ascii_case(id))
    }

    #[must_use]
    pub fn entry(self) -> CatalogEntry {
        CatalogEntry {
            kind: self,
            id: self.id().to_string(),
            label: self.label().to_string(),
            icon: self.icon().to_string(),
        }
    }
}

impl fmt::Display for EmergencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Catalog row as handed to the shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub kind: EmergencyType,
    pub id: String,
    pub label: String,
    pub icon: String,
}

#[must_use]
pub fn catalog() -> Vec<CatalogEntry> {
    EmergencyType::ALL.into_iter().map(EmergencyType::entry).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub service: String,
    pub number: String,
    pub description: String,
}

impl EmergencyContact {
    pub fn new(
        service: impl Into<String>,
        number: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            service: service.into(),
            number: number.into(),
            description: description.into(),
        }
    }
}

const DEFAULT_DIRECTORY: &[(&str, &str, &str)] = &[
    ("Police", "100", "Emergency police assistance across India"),
    ("Fire Brigade", "101", "Fire emergency and rescue services"),
    ("Ambulance", "102", "Medical emergency and ambulance services"),
    ("Disaster Management", "108", "Emergency response and disaster management"),
    ("Women Helpline", "1091", "Women in distress helpline"),
    ("Child Helpline", "1098", "Child emergency and protection services"),
    ("Tourist Helpline", "1363", "Tourist assistance and information"),
    ("Railway Helpline", "139", "Railway passenger assistance and emergency"),
    ("Road Accident", "1073", "Road accident emergency response"),
    ("Senior Citizen Helpline", "14567", "Senior citizen assistance and support"),
    ("Anti-Corruption Helpline", "1031", "Report corruption and malpractices"),
    ("Cyber Crime Helpline", "1930", "Cyber crime reporting and assistance"),
];

#[must_use]
pub fn default_directory() -> Vec<EmergencyContact> {
    DEFAULT_DIRECTORY
        .iter()
        .map(|(service, number, description)| EmergencyContact::new(*service, *number, *description))
        .collect()
}

pub const SAFETY_TIPS: &[&str] = &[
    "Stay calm and assess the situation",
    "Move to a safe location if possible",
    "Call local emergency services immediately",
    "Share your location with trusted contacts",
    "Keep important documents accessible",
    "Stay in well-lit, populated areas",
];
