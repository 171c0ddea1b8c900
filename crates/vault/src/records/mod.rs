//! Credential records: a site, a username, and an encrypted password.
//!
//! Handlers encrypt the password before building a [`CredentialRecord`] and
//! decrypt it after reading one back; the store itself only ever holds
//! [`CiphertextBundle`]s.

pub mod store;

pub use store::{InMemoryRecordStore, RecordStore, StoreError};
#[cfg(test)]
pub use store::MockRecordStore;

use common::protocol::RecordSummary;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::crypto::CiphertextBundle;

/// One stored credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub id: Uuid,
    pub site: String,
    pub username: String,
    /// Encrypted password; serialises in the canonical `v1.` bundle form.
    pub password: CiphertextBundle,
}

impl CredentialRecord {
    /// Create a record with a fresh random id.
    pub fn new(site: String, username: String, password: CiphertextBundle) -> Self {
        Self {
            id: Uuid::new_v4(),
            site,
            username,
            password,
        }
    }

    /// The listing view of this record, without the bundle.
    pub fn summary(&self) -> RecordSummary {
        RecordSummary {
            id: self.id,
            site: self.site.clone(),
            username: self.username.clone(),
        }
    }
}
