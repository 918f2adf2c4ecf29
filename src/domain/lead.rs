// src/domain/lead.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where a lead sits in the outreach lifecycle.
///
/// The usual order is `sourced -> message_generated -> contacted -> replied -> converted`,
/// but nothing enforces it: any status may be set from any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    #[default]
    Sourced,
    MessageGenerated,
    Contacted,
    Replied,
    Converted,
    Deleted,
    Failed,
    Bounced,
}

impl LeadStatus {
    pub const ALL: [LeadStatus; 8] = [
        LeadStatus::Sourced,
        LeadStatus::MessageGenerated,
        LeadStatus::Contacted,
        LeadStatus::Replied,
        LeadStatus::Converted,
        LeadStatus::Deleted,
        LeadStatus::Failed,
        LeadStatus::Bounced,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LeadStatus::Sourced => "sourced",
            LeadStatus::MessageGenerated => "message_generated",
            LeadStatus::Contacted => "contacted",
            LeadStatus::Replied => "replied",
            LeadStatus::Converted => "converted",
            LeadStatus::Deleted => "deleted",
            LeadStatus::Failed => "failed",
            LeadStatus::Bounced => "bounced",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LeadStatus::Sourced => "Sourced",
            LeadStatus::MessageGenerated => "Message Generated",
            LeadStatus::Contacted => "Contacted",
            LeadStatus::Replied => "Replied",
            LeadStatus::Converted => "Converted",
            LeadStatus::Deleted => "Deleted",
            LeadStatus::Failed => "Failed",
            LeadStatus::Bounced => "Bounced",
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeadStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LeadStatus::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| format!("unknown lead status: {s}"))
    }
}

/// Social profile links collected by the maps scraper.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SocialLinks {
    pub linked_ins: Vec<String>,
    pub twitters: Vec<String>,
    pub instagrams: Vec<String>,
    pub facebooks: Vec<String>,
    pub youtubes: Vec<String>,
    pub tiktoks: Vec<String>,
    pub pinterests: Vec<String>,
    pub discords: Vec<String>,
}

impl SocialLinks {
    /// (column name, values) pairs in a stable order, shared by the store and export code.
    pub fn columns(&self) -> [(&'static str, &Vec<String>); 8] {
        [
            ("LinkedIns", &self.linked_ins),
            ("Twitters", &self.twitters),
            ("Instagrams", &self.instagrams),
            ("Facebooks", &self.facebooks),
            ("Youtubes", &self.youtubes),
            ("Tiktoks", &self.tiktoks),
            ("Pinterests", &self.pinterests),
            ("Discords", &self.discords),
        ]
    }

    pub fn column_mut(&mut self, column: &str) -> Option<&mut Vec<String>> {
        match column {
            "LinkedIns" => Some(&mut self.linked_ins),
            "Twitters" => Some(&mut self.twitters),
            "Instagrams" => Some(&mut self.instagrams),
            "Facebooks" => Some(&mut self.facebooks),
            "Youtubes" => Some(&mut self.youtubes),
            "Tiktoks" => Some(&mut self.tiktoks),
            "Pinterests" => Some(&mut self.pinterests),
            "Discords" => Some(&mut self.discords),
            _ => None,
        }
    }
}

/// A prospective business contact.
///
/// `id` is assigned by the store on first persistence. Only `name` is validated;
/// everything else is best-effort data from the scraper or the operator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Lead {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,

    // Contact
    pub phone: String,
    pub phone_unformatted: String,
    pub website: String,
    pub domain: String,
    pub emails: Vec<String>,

    // Location
    pub address: String,
    pub street: String,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country_code: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    // Scrape provenance
    pub category_name: String,
    pub total_score: Option<f64>,
    pub reviews_count: Option<i64>,
    pub images_count: Option<i64>,
    pub place_id: String,
    pub image_url: String,
    pub rank: Option<i64>,
    pub claim_this_business: Option<bool>,
    pub permanently_closed: Option<bool>,
    pub temporarily_closed: Option<bool>,
    pub is_advertisement: Option<bool>,
    pub scraped_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub social: SocialLinks,

    // Outreach
    pub status: LeadStatus,
    pub message: String,
    pub sent_at: Option<DateTime<Utc>>,
    pub replied_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Lead {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// The only rule the system checks: a lead must have a name.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Name is required".into());
        }
        Ok(())
    }

    /// First address on file; outreach never goes to more than one.
    pub fn primary_email(&self) -> Option<&str> {
        self.emails
            .iter()
            .map(|e| e.trim())
            .find(|e| !e.is_empty())
    }

    pub fn has_message(&self) -> bool {
        !self.message.trim().is_empty()
    }

    /// Apply a sparse patch in place. Absent fields are left alone.
    pub fn apply(&mut self, patch: &LeadPatch) {
        macro_rules! take {
            ($($field:ident),*) => {
                $(if let Some(v) = &patch.$field { self.$field = v.clone(); })*
            };
        }
        take!(name, phone, website, address, city, state, postal_code, emails, message);

        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(sent_at) = patch.sent_at {
            self.sent_at = Some(sent_at);
        }
        if let Some(replied_at) = patch.replied_at {
            self.replied_at = Some(replied_at);
        }
    }
}

/// Sparse update: only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LeadPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emails: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<LeadStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replied_at: Option<DateTime<Utc>>,
}

impl LeadPatch {
    pub fn is_empty(&self) -> bool {
        *self == LeadPatch::default()
    }

    pub fn status(status: LeadStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn drafted(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            status: Some(LeadStatus::MessageGenerated),
            ..Default::default()
        }
    }

    pub fn contacted(at: DateTime<Utc>) -> Self {
        Self {
            status: Some(LeadStatus::Contacted),
            sent_at: Some(at),
            ..Default::default()
        }
    }

    /// A renamed lead must keep a non-empty name.
    pub fn validate(&self) -> Result<(), String> {
        match &self.name {
            Some(name) if name.trim().is_empty() => Err("Name cannot be empty".into()),
            _ => Ok(()),
        }
    }
}
