//! [`RecordStore`] and its in-memory implementation.

use std::{collections::HashMap, sync::Arc};

use arc_swap::ArcSwap;
use thiserror::Error;
use uuid::Uuid;

use super::CredentialRecord;

/// Errors from the record store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// No record has the given id.
    #[error("record {0} not found")]
    NotFound(Uuid),

    /// A record with the given id already exists.
    #[error("record {0} already exists")]
    Conflict(Uuid),
}

/// Persistence seam for credential records.
///
/// Implementations only ever see [`CredentialRecord`]s, whose password is an
/// encrypted bundle; plaintext never crosses this boundary.
#[cfg_attr(test, mockall::automock)]
pub trait RecordStore: Send + Sync {
    /// Store a new record.
    fn insert(&self, record: CredentialRecord) -> Result<(), StoreError>;

    /// Look up a record by id.
    fn get(&self, id: Uuid) -> Option<CredentialRecord>;

    /// All records, ordered by site then username.
    fn list(&self) -> Vec<CredentialRecord>;

    /// Replace an existing record wholesale.
    fn replace(&self, record: CredentialRecord) -> Result<(), StoreError>;

    /// Delete a record, returning it.
    fn remove(&self, id: Uuid) -> Result<CredentialRecord, StoreError>;

    /// Number of stored records.
    fn len(&self) -> usize;

    /// Returns `true` if no records are stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Shared, lock-free-read record store held in memory.
///
/// Internally backed by [`ArcSwap`]: readers load the current map without
/// blocking, and every write builds a new map and swaps it in with
/// [`ArcSwap::rcu`], retrying if another writer got there first.
#[derive(Clone, Debug, Default)]
pub struct InMemoryRecordStore {
    inner: Arc<ArcSwap<HashMap<Uuid, CredentialRecord>>>,
}

impl InMemoryRecordStore {
    /// Create a new, empty [`InMemoryRecordStore`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `update` to a copy of the current map and publish the result.
    ///
    /// `update` may run more than once under write contention, so it must
    /// only depend on the map it is given.
    fn update<F>(&self, mut update: F) -> Result<(), StoreError>
    where
        F: FnMut(&mut HashMap<Uuid, CredentialRecord>) -> Result<(), StoreError>,
    {
        let mut outcome = Ok(());
        self.inner.rcu(|current| {
            let mut next = HashMap::clone(current);
            outcome = update(&mut next);
            next
        });
        outcome
    }
}

impl RecordStore for InMemoryRecordStore {
    fn insert(&self, record: CredentialRecord) -> Result<(), StoreError> {
        self.update(|map| {
            if map.contains_key(&record.id) {
                return Err(StoreError::Conflict(record.id));
            }
            map.insert(record.id, record.clone());
            Ok(())
        })
    }

    fn get(&self, id: Uuid) -> Option<CredentialRecord> {
        self.inner.load().get(&id).cloned()
    }

    fn list(&self) -> Vec<CredentialRecord> {
        let mut records: Vec<_> = self.inner.load().values().cloned().collect();
        records.sort_by(|a, b| (&a.site, &a.username, a.id).cmp(&(&b.site, &b.username, b.id)));
        records
    }

    fn replace(&self, record: CredentialRecord) -> Result<(), StoreError> {
        self.update(|map| match map.get_mut(&record.id) {
            Some(slot) => {
                *slot = record.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound(record.id)),
        })
    }

    fn remove(&self, id: Uuid) -> Result<CredentialRecord, StoreError> {
        let mut removed = None;
        self.update(|map| {
            removed = map.remove(&id);
            if removed.is_some() {
                Ok(())
            } else {
                Err(StoreError::NotFound(id))
            }
        })?;
        removed.ok_or(StoreError::NotFound(id))
    }

    fn len(&self) -> usize {
        self.inner.load().len()
    }
}
