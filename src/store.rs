// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Interfaces to the record store and the audit log, along with in-memory
//! implementations of both.
//!
//! The library never persists anything itself.  Entity and connection
//! records are read and written through [`Store`], and audit entries are
//! appended through [`EventLog`].

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::Error;

/// A keyed record store for one kind of record.
pub trait Store<T>: Send + Sync {
    /// Creates an empty record and returns its newly assigned id.
    fn create(&self) -> Result<String, Error>;

    /// Returns the record with the given id, or `None` if it doesn't exist.
    fn read(&self, id: &str) -> Result<Option<T>, Error>;

    /// Applies `apply` to the record with the given id and stores the
    /// result.
    ///
    /// Returns an error if the record doesn't exist.
    fn update(&self, id: &str, apply: &dyn Fn(&mut T)) -> Result<(), Error>;

    /// Returns all records in the store.
    fn read_all(&self) -> Result<Vec<T>, Error>;
}

/// An append-only log of human readable events.
pub trait EventLog: Send + Sync {
    /// Appends an entry to the log and returns the id of the entry.
    fn append(&self, description: &str) -> Result<String, Error>;
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, Error> {
    mutex
        .lock()
        .map_err(|_| Error::store("In-memory store lock was poisoned."))
}

/// A [`Store`] keeping its records in memory.
///
/// Ids are random UUIDs, so they don't collide across stores.
pub struct InMemoryStore<T> {
    records: Mutex<BTreeMap<String, T>>,
}

impl<T> Default for InMemoryStore<T> {
    fn default() -> Self {
        Self {
            records: Mutex::new(BTreeMap::new()),
        }
    }
}

impl<T> InMemoryStore<T> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T> Store<T> for InMemoryStore<T>
where
    T: Clone + Default + Send,
{
    fn create(&self) -> Result<String, Error> {
        let id = Uuid::new_v4().to_string();
        lock(&self.records)?.insert(id.clone(), T::default());
        Ok(id)
    }

    fn read(&self, id: &str) -> Result<Option<T>, Error> {
        Ok(lock(&self.records)?.get(id).cloned())
    }

    fn update(&self, id: &str, apply: &dyn Fn(&mut T)) -> Result<(), Error> {
        let mut records = lock(&self.records)?;
        let record = records
            .get_mut(id)
            .ok_or_else(|| Error::entity_not_found(format!("Record with id {id} not found.")))?;
        apply(record);
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<T>, Error> {
        Ok(lock(&self.records)?.values().cloned().collect())
    }
}

/// An entry of the [`InMemoryEventLog`].
#[derive(Clone, Debug, PartialEq)]
pub struct LogEntry {
    pub id: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

/// An [`EventLog`] keeping its entries in memory, timestamped at the time
/// they were appended.
#[derive(Default)]
pub struct InMemoryEventLog {
    entries: Mutex<Vec<LogEntry>>,
}

impl InMemoryEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of all entries, oldest first.
    pub fn entries(&self) -> Result<Vec<LogEntry>, Error> {
        Ok(lock(&self.entries)?.clone())
    }
}

impl EventLog for InMemoryEventLog {
    fn append(&self, description: &str) -> Result<String, Error> {
        let entry = LogEntry {
            id: Uuid::new_v4().to_string(),
            description: description.to_string(),
            timestamp: Utc::now(),
        };
        let id = entry.id.clone();
        lock(&self.entries)?.push(entry);
        Ok(id)
    }
}
