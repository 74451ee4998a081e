use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use regdesk_core::ServiceError;

use super::RegistrationId;

/// Academic unit a student registers with. Closed set; the serde names are
/// the labels operators see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faculty {
    #[serde(rename = "Faculty of Agriculture")]
    Agriculture,
    #[serde(rename = "Fisheries")]
    Fisheries,
    #[serde(rename = "Veterinary Medicine")]
    VeterinaryMedicine,
    #[serde(rename = "Agricultural Economics")]
    AgriculturalEconomics,
    #[serde(rename = "Forestry and Environment")]
    ForestryAndEnvironment,
    #[serde(rename = "Engineering and Bioresource")]
    EngineeringAndBioresource,
    #[serde(rename = "Graduate Studies")]
    GraduateStudies,
}

impl Faculty {
    pub const ALL: [Faculty; 7] = [
        Faculty::Agriculture,
        Faculty::Fisheries,
        Faculty::VeterinaryMedicine,
        Faculty::AgriculturalEconomics,
        Faculty::ForestryAndEnvironment,
        Faculty::EngineeringAndBioresource,
        Faculty::GraduateStudies,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Faculty::Agriculture => "Faculty of Agriculture",
            Faculty::Fisheries => "Fisheries",
            Faculty::VeterinaryMedicine => "Veterinary Medicine",
            Faculty::AgriculturalEconomics => "Agricultural Economics",
            Faculty::ForestryAndEnvironment => "Forestry and Environment",
            Faculty::EngineeringAndBioresource => "Engineering and Bioresource",
            Faculty::GraduateStudies => "Graduate Studies",
        }
    }
}

impl fmt::Display for Faculty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Faculty {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Faculty::ALL
            .into_iter()
            .find(|f| f.as_str() == s.trim())
            .ok_or_else(|| ServiceError::Validation(format!("unknown faculty '{}'", s.trim())))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One student's record. PK = registration_id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    /// Never changes after creation.
    pub registration_id: RegistrationId,

    pub name: String,

    pub faculty: Faculty,

    /// Free-form cohort label, e.g. "2023/24".
    #[serde(default)]
    pub batch: String,

    pub gender: Gender,

    pub dob: NaiveDate,

    pub phone: String,

    pub email: String,

    /// Set once by the registration flow.
    pub created_at: DateTime<Utc>,

    /// Bumped by every edit.
    pub updated_at: DateTime<Utc>,
}

/// The operator's new-registration form.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRegistration {
    pub name: String,
    pub faculty: Faculty,
    #[serde(default)]
    pub batch: String,
    pub gender: Gender,
    pub dob: NaiveDate,
    pub phone: String,
    pub email: String,
}

impl NewRegistration {
    /// Trim text fields and check the required ones are present.
    pub fn validated(mut self) -> Result<Self, ServiceError> {
        self.name = required("name", &self.name)?;
        self.phone = required("phone", &self.phone)?;
        self.email = required("email", &self.email)?;
        self.batch = self.batch.trim().to_string();
        Ok(self)
    }
}

/// Partial update accepted by the record editor.
///
/// Only these fields can change. Anything else in the payload
/// (`registrationId`, `createdAt`, `updatedAt`, ...) is ignored, and a
/// `null` leaves the field as it was.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationPatch {
    pub name: Option<String>,
    pub faculty: Option<Faculty>,
    pub batch: Option<String>,
    pub gender: Option<Gender>,
    pub dob: Option<NaiveDate>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl RegistrationPatch {
    /// Check the patch without touching any record.
    pub fn validated(mut self) -> Result<Self, ServiceError> {
        if let Some(name) = &self.name {
            self.name = Some(required("name", name)?);
        }
        if let Some(phone) = &self.phone {
            self.phone = Some(required("phone", phone)?);
        }
        if let Some(email) = &self.email {
            self.email = Some(required("email", email)?);
        }
        if let Some(batch) = &self.batch {
            self.batch = Some(batch.trim().to_string());
        }
        Ok(self)
    }

    /// Merge onto `record`. Identity and timestamps are left to the caller.
    pub fn apply_to(self, record: &mut Registration) {
        if let Some(name) = self.name {
            record.name = name;
        }
        if let Some(faculty) = self.faculty {
            record.faculty = faculty;
        }
        if let Some(batch) = self.batch {
            record.batch = batch;
        }
        if let Some(gender) = self.gender {
            record.gender = gender;
        }
        if let Some(dob) = self.dob {
            record.dob = dob;
        }
        if let Some(phone) = self.phone {
            record.phone = phone;
        }
        if let Some(email) = self.email {
            record.email = email;
        }
    }
}

/// Decode a request body, reporting bad enum values and malformed dates as
/// validation failures rather than framework rejections.
pub fn from_json<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, ServiceError> {
    serde_json::from_value(value).map_err(|e| ServiceError::Validation(e.to_string()))
}

fn required(field: &str, value: &str) -> Result<String, ServiceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}
