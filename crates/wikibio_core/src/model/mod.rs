//! Genealogy domain model consumed by the biography engine.
//!
//! # Responsibility
//! - Define typed, read-only records for persons, families, events, places,
//!   citations, sources, media and notes.
//! - Expose the outgoing references of each record so stores can maintain
//!   backlinks.
//!
//! # Invariants
//! - Every record is identified by a stable `Handle`.
//! - Cross-record links are handles only; records never embed each other.

pub mod citation;
pub mod date;
pub mod event;
pub mod family;
pub mod handle;
pub mod note;
pub mod person;
pub mod place;

/// Outgoing handle references of a stored record.
///
/// Stores use this to answer backlink queries.
pub trait References {
    fn referenced_handles(&self) -> Vec<&handle::Handle>;
}
