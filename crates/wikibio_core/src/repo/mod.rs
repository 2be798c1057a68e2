//! Tree database contract and store implementations.
//!
//! # Responsibility
//! - Define the read-only lookup contract consumed by the biography engine.
//! - Provide in-memory and SQLite implementations of that contract.
//!
//! # Invariants
//! - Missing records are reported as `Ok(None)`; callers decide whether an
//!   absence is fatal.
//! - Store errors (`Db`, `InvalidData`) are never silently dropped.

pub mod memory_tree;
pub mod snapshot;
pub mod sqlite_tree;
pub mod tree_db;
