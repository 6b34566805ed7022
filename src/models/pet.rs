//! Represents a pet listed for adoption.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single pet entry as persisted in the pets document.
///
/// Field names serialize in camelCase (`imageKey`, `createdAt`) so the stored
/// document stays readable by other tooling that shares the bucket.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PetRecord {
    /// Unique identifier assigned at creation.
    pub id: Uuid,

    /// Display name of the pet.
    pub name: String,

    /// Free-form breed description.
    pub breed: String,

    /// Age as entered by the submitter (e.g. "2 years").
    pub age: String,

    /// Storage key of the uploaded photo.
    pub image_key: String,

    /// When this record was created.
    pub created_at: DateTime<Utc>,
}

impl PetRecord {
    /// Build a fresh record with a new id and the current time.
    pub fn new(name: String, breed: String, age: String, image_key: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            breed,
            age,
            image_key,
            created_at: Utc::now(),
        }
    }
}

/// A record paired with a resolved, browser-usable photo URL.
#[derive(Serialize, Clone, Debug)]
pub struct PetView {
    #[serde(flatten)]
    pub record: PetRecord,
    pub image_url: String,
}
