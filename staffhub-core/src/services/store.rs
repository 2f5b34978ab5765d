//! Entity store - one record collection with write-through persistence

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use super::persistence::{Persistence, RawCollection};
use crate::domain::result::{Error, Result};
use crate::domain::{Entity, EntityKind, View};
use crate::ports::ViewHooks;

/// Why a collection was replaced by its seed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum SeedReason {
    Missing,
    Malformed(String),
}

/// What happened when a collection was loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LoadOutcome {
    Loaded { count: usize },
    Seeded { cause: SeedReason, count: usize },
}

impl LoadOutcome {
    pub fn was_seeded(&self) -> bool {
        matches!(self, LoadOutcome::Seeded { .. })
    }
}

/// Load outcome for one collection
#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    pub kind: EntityKind,
    #[serde(flatten)]
    pub outcome: LoadOutcome,
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            LoadOutcome::Loaded { count } => write!(f, "{}: loaded {} record(s)", self.kind, count),
            LoadOutcome::Seeded { cause: SeedReason::Missing, count } => {
                write!(f, "{}: nothing stored, seeded {} record(s)", self.kind, count)
            }
            LoadOutcome::Seeded { cause: SeedReason::Malformed(detail), count } => write!(
                f,
                "{}: stored data unreadable ({}), seeded {} record(s)",
                self.kind, detail, count
            ),
        }
    }
}

/// Views that display a collection
pub fn views_for(kind: EntityKind) -> &'static [View] {
    match kind {
        EntityKind::Account => &[View::Accounts],
        EntityKind::Department => &[View::Departments, View::DepartmentOptions],
        EntityKind::Employee => &[View::Employees],
        EntityKind::Request => &[View::MyRequests],
    }
}

/// An ordered collection of records of one kind
///
/// Every mutation writes the whole collection through to storage before
/// returning and then asks the views showing it to refresh. A failed
/// write restores the collection to its state before the mutation.
pub struct EntityStore<T: Entity> {
    records: Vec<T>,
    persistence: Arc<Persistence>,
    views: Arc<dyn ViewHooks>,
    seed: fn() -> Vec<T>,
}

impl<T: Entity> EntityStore<T> {
    /// Create a store and load its collection
    pub fn load(
        persistence: Arc<Persistence>,
        views: Arc<dyn ViewHooks>,
        seed: fn() -> Vec<T>,
    ) -> Result<(Self, LoadOutcome)> {
        let mut store = Self {
            records: Vec::new(),
            persistence,
            views,
            seed,
        };
        let outcome = store.load_all()?;
        Ok((store, outcome))
    }

    /// Re-read the collection from storage
    ///
    /// Missing or malformed data is replaced by the seed, which is
    /// persisted immediately. Records stored in an older shape (no id,
    /// staff number in `id`, no owner) are normalised and written back.
    pub fn load_all(&mut self) -> Result<LoadOutcome> {
        match self.persistence.read_collection(T::KIND)? {
            RawCollection::Missing => self.reseed(SeedReason::Missing),
            RawCollection::Malformed(detail) => self.reseed(SeedReason::Malformed(detail)),
            RawCollection::Json(value) => {
                match serde_json::from_value::<Vec<T>>(value.clone()) {
                    Ok(records) => {
                        self.records = records;
                        // Ids and defaults filled in on read must reach storage
                        if serde_json::to_value(&self.records)? != value {
                            self.persist()?;
                        }
                        Ok(LoadOutcome::Loaded {
                            count: self.records.len(),
                        })
                    }
                    Err(e) => self.reseed(SeedReason::Malformed(e.to_string())),
                }
            }
        }
    }

    fn reseed(&mut self, cause: SeedReason) -> Result<LoadOutcome> {
        self.records = (self.seed)();
        self.persist()?;
        Ok(LoadOutcome::Seeded {
            cause,
            count: self.records.len(),
        })
    }

    pub fn kind(&self) -> EntityKind {
        T::KIND
    }

    pub fn all(&self) -> &[T] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&T> {
        self.records.iter().find(|r| r.id() == id)
    }

    /// Current position of a record; positions change as records are removed
    pub fn position(&self, id: Uuid) -> Option<usize> {
        self.records.iter().position(|r| r.id() == id)
    }

    pub fn find(&self, predicate: impl Fn(&T) -> bool) -> Option<&T> {
        self.records.iter().find(|r| predicate(r))
    }

    /// Append a record
    ///
    /// A nil or already-used id is replaced by a fresh one.
    pub fn create(&mut self, mut record: T) -> Result<T> {
        if record.id().is_nil() || self.position(record.id()).is_some() {
            record.set_id(Uuid::new_v4());
        }

        let previous = self.records.clone();
        self.records.push(record.clone());
        self.write_through(previous)?;
        Ok(record)
    }

    /// Replace the record with `id`, keeping its id and position
    pub fn update(&mut self, id: Uuid, mut record: T) -> Result<T> {
        let index = self.index_of(id)?;
        record.set_id(id);

        let previous = self.records.clone();
        self.records[index] = record.clone();
        self.write_through(previous)?;
        Ok(record)
    }

    /// Remove the record with `id`
    pub fn delete(&mut self, id: Uuid) -> Result<T> {
        let index = self.index_of(id)?;

        let previous = self.records.clone();
        let removed = self.records.remove(index);
        self.write_through(previous)?;
        Ok(removed)
    }

    fn index_of(&self, id: Uuid) -> Result<usize> {
        self.position(id).ok_or_else(|| {
            Error::not_found(format!("no {} record with id {}", T::KIND, id))
        })
    }

    fn write_through(&mut self, previous: Vec<T>) -> Result<()> {
        if let Err(e) = self.persist() {
            self.records = previous;
            return Err(e);
        }
        for view in views_for(T::KIND) {
            self.views.refresh_view(*view);
        }
        Ok(())
    }

    fn persist(&self) -> Result<()> {
        let value = serde_json::to_value(&self.records)?;
        self.persistence.write_collection(T::KIND, value)
    }
}
