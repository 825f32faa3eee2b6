//! Fan profile domain types
//!
//! The basic fields edited on the form and the profile record owned by the
//! profile service. The client only keeps a cached copy of the record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Basic profile fields sent to `POST /profile`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileFormData {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub cpf: String,
    #[serde(default)]
    pub interests: String,
    #[serde(default)]
    pub activities_last_year: String,
    #[serde(default)]
    pub events_last_year: String,
    #[serde(default)]
    pub purchases_last_year: String,
}

/// Addressable basic form field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BasicField {
    FullName,
    Address,
    Cpf,
    Interests,
    ActivitiesLastYear,
    EventsLastYear,
    PurchasesLastYear,
}

impl BasicField {
    pub const ALL: [BasicField; 7] = [
        Self::FullName,
        Self::Address,
        Self::Cpf,
        Self::Interests,
        Self::ActivitiesLastYear,
        Self::EventsLastYear,
        Self::PurchasesLastYear,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullName => "full_name",
            Self::Address => "address",
            Self::Cpf => "cpf",
            Self::Interests => "interests",
            Self::ActivitiesLastYear => "activities_last_year",
            Self::EventsLastYear => "events_last_year",
            Self::PurchasesLastYear => "purchases_last_year",
        }
    }
}

impl fmt::Display for BasicField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BasicField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| format!("unknown profile field '{}'", s))
    }
}

impl ProfileFormData {
    pub fn get(&self, field: BasicField) -> &str {
        match field {
            BasicField::FullName => &self.full_name,
            BasicField::Address => &self.address,
            BasicField::Cpf => &self.cpf,
            BasicField::Interests => &self.interests,
            BasicField::ActivitiesLastYear => &self.activities_last_year,
            BasicField::EventsLastYear => &self.events_last_year,
            BasicField::PurchasesLastYear => &self.purchases_last_year,
        }
    }

    pub(crate) fn slot_mut(&mut self, field: BasicField) -> &mut String {
        match field {
            BasicField::FullName => &mut self.full_name,
            BasicField::Address => &mut self.address,
            BasicField::Cpf => &mut self.cpf,
            BasicField::Interests => &mut self.interests,
            BasicField::ActivitiesLastYear => &mut self.activities_last_year,
            BasicField::EventsLastYear => &mut self.events_last_year,
            BasicField::PurchasesLastYear => &mut self.purchases_last_year,
        }
    }

    /// Blank form that keeps only the given CPF
    pub fn only_cpf(cpf: impl Into<String>) -> Self {
        Self {
            cpf: cpf.into(),
            ..Self::default()
        }
    }
}

/// Fan profile record as returned by the profile service.
///
/// Every field except the CPF may be absent or null on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub cpf: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub interests: Option<String>,
    #[serde(default)]
    pub activities_last_year: Option<String>,
    #[serde(default)]
    pub events_last_year: Option<String>,
    #[serde(default)]
    pub purchases_last_year: Option<String>,
    #[serde(default)]
    pub document_path: Option<String>,
    #[serde(default)]
    pub document_validated: Option<bool>,
    /// JSON-encoded social links, stored as text by the service
    #[serde(default)]
    pub social_media_links: Option<String>,
    /// JSON-encoded eSports links, stored as text by the service
    #[serde(default)]
    pub esports_profile_links: Option<String>,
    #[serde(default)]
    pub esports_links_validated: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Profile {
    /// Form values for this record, missing fields as empty strings.
    pub fn to_form_data(&self) -> ProfileFormData {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        ProfileFormData {
            full_name: text(&self.full_name),
            address: text(&self.address),
            cpf: self.cpf.clone(),
            interests: text(&self.interests),
            activities_last_year: text(&self.activities_last_year),
            events_last_year: text(&self.events_last_year),
            purchases_last_year: text(&self.purchases_last_year),
        }
    }

    pub fn document_validated(&self) -> bool {
        self.document_validated.unwrap_or(false)
    }

    pub fn esports_links_validated(&self) -> bool {
        self.esports_links_validated.unwrap_or(false)
    }
}

/// Response of `POST /profile`
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertProfileResponse {
    pub message: String,
    pub profile: Profile,
}

/// Response of `POST /profile/{cpf}/upload_document`
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentUploadResponse {
    pub message: String,
    pub file_path: String,
    #[serde(default)]
    pub validated: bool,
}

/// Link columns of the profile echoed back by the link endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LinkedProfile {
    #[serde(default)]
    pub social_media_links: Option<String>,
    #[serde(default)]
    pub esports_profile_links: Option<String>,
    #[serde(default)]
    pub esports_links_validated: Option<bool>,
}

/// Response of `POST /profile/{cpf}/link_social`
#[derive(Debug, Clone, Deserialize)]
pub struct SocialLinksResponse {
    pub message: String,
    #[serde(default)]
    pub profile: LinkedProfile,
}

/// Response of `POST /profile/{cpf}/link_esports`
#[derive(Debug, Clone, Deserialize)]
pub struct EsportsLinksResponse {
    pub message: String,
    /// Relevance verdict per submitted site
    #[serde(default)]
    pub validation_results: BTreeMap<String, bool>,
    #[serde(default)]
    pub profile: LinkedProfile,
}
