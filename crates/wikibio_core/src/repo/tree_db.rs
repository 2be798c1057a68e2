//! Read contract over a genealogy database.
//!
//! # Responsibility
//! - Define handle lookups for every record class consumed by the engine.
//! - Define backlink queries used for event participant resolution.
//!
//! # Invariants
//! - Lookups of unknown handles return `Ok(None)`, never an error.
//! - Backlinks are ordered by record class, then handle.

use crate::db::DbError;
use crate::model::citation::{Citation, Media, Source};
use crate::model::event::Event;
use crate::model::family::Family;
use crate::model::handle::{Handle, RecordClass};
use crate::model::note::Note;
use crate::model::person::Person;
use crate::model::place::Place;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for tree storage and lookups.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(Handle),
    InvalidData(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(handle) => write!(f, "record not found: {handle}"),
            Self::InvalidData(message) => write!(f, "invalid persisted tree data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "tree store requires schema version {expected_version}, got {actual_version}"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
            Self::UninitializedConnection { .. } => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// One record referencing a target handle.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Backlink {
    pub class: RecordClass,
    pub handle: Handle,
}

/// Read-only genealogy database capability.
pub trait TreeDatabase {
    fn person(&self, handle: &Handle) -> RepoResult<Option<Person>>;
    fn person_by_gramps_id(&self, gramps_id: &str) -> RepoResult<Option<Person>>;
    fn family(&self, handle: &Handle) -> RepoResult<Option<Family>>;
    fn event(&self, handle: &Handle) -> RepoResult<Option<Event>>;
    fn place(&self, handle: &Handle) -> RepoResult<Option<Place>>;
    fn note(&self, handle: &Handle) -> RepoResult<Option<Note>>;
    fn source(&self, handle: &Handle) -> RepoResult<Option<Source>>;
    fn citation(&self, handle: &Handle) -> RepoResult<Option<Citation>>;
    fn media(&self, handle: &Handle) -> RepoResult<Option<Media>>;
    /// All note handles, in storage order.
    fn note_handles(&self) -> RepoResult<Vec<Handle>>;
    /// Records of the given classes that reference `target`.
    fn backlinks(&self, target: &Handle, classes: &[RecordClass]) -> RepoResult<Vec<Backlink>>;
}

impl<T: TreeDatabase + ?Sized> TreeDatabase for &T {
    fn person(&self, handle: &Handle) -> RepoResult<Option<Person>> {
        (**self).person(handle)
    }

    fn person_by_gramps_id(&self, gramps_id: &str) -> RepoResult<Option<Person>> {
        (**self).person_by_gramps_id(gramps_id)
    }

    fn family(&self, handle: &Handle) -> RepoResult<Option<Family>> {
        (**self).family(handle)
    }

    fn event(&self, handle: &Handle) -> RepoResult<Option<Event>> {
        (**self).event(handle)
    }

    fn place(&self, handle: &Handle) -> RepoResult<Option<Place>> {
        (**self).place(handle)
    }

    fn note(&self, handle: &Handle) -> RepoResult<Option<Note>> {
        (**self).note(handle)
    }

    fn source(&self, handle: &Handle) -> RepoResult<Option<Source>> {
        (**self).source(handle)
    }

    fn citation(&self, handle: &Handle) -> RepoResult<Option<Citation>> {
        (**self).citation(handle)
    }

    fn media(&self, handle: &Handle) -> RepoResult<Option<Media>> {
        (**self).media(handle)
    }

    fn note_handles(&self) -> RepoResult<Vec<Handle>> {
        (**self).note_handles()
    }

    fn backlinks(&self, target: &Handle, classes: &[RecordClass]) -> RepoResult<Vec<Backlink>> {
        (**self).backlinks(target, classes)
    }
}
